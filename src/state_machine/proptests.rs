//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across arbitrary event sequences.

use super::state::*;
use super::transition::*;
use super::*;
use crate::error::ChatError;
use crate::llm::LlmErrorKind;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_error_kind() -> impl Strategy<Value = LlmErrorKind> {
    prop_oneof![
        Just(LlmErrorKind::Network),
        Just(LlmErrorKind::RateLimit),
        Just(LlmErrorKind::ServerError),
        Just(LlmErrorKind::Auth),
        Just(LlmErrorKind::InvalidRequest),
        Just(LlmErrorKind::Unknown),
    ]
}

fn arb_chat_error() -> impl Strategy<Value = ChatError> {
    prop_oneof![
        Just(ChatError::EmptyResponse),
        (arb_error_kind(), "[a-zA-Z ]{1,30}")
            .prop_map(|(kind, message)| ChatError::RemoteCall { kind, message }),
    ]
}

/// Text that may be blank, padded, or ordinary
fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[ \t\n]{1,5}",
        "[ ]{0,3}[a-zA-Z0-9?+]{1,20}[ ]{0,3}",
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        Just(Event::Startup),
        Just(Event::SessionCreated),
        arb_chat_error().prop_map(|error| Event::SessionFailed { error }),
        arb_text().prop_map(|text| Event::UserMessage { text }),
        arb_text().prop_map(|reply| Event::ExchangeSucceeded { reply }),
        arb_chat_error().prop_map(|error| Event::ExchangeFailed { error }),
    ]
}

/// Drives a fresh state to `Ready`
fn ready_state() -> ChatState {
    let state = transition(&ChatState::default(), Event::Startup)
        .unwrap()
        .new_state;
    transition(&state, Event::SessionCreated).unwrap().new_state
}

fn is_valid_state(state: &ChatState) -> bool {
    match state.readiness {
        Readiness::Uninitialized | Readiness::Initializing => {
            !state.busy && state.conversation.is_empty()
        }
        Readiness::InitFailed => {
            !state.busy && state.conversation.is_empty() && state.banner.is_some()
        }
        Readiness::Ready => state
            .conversation
            .turns()
            .first()
            .is_some_and(|t| t.speaker() == Speaker::Assistant && t.text() == GREETING),
    }
}

/// After the greeting, turns alternate user/assistant; a trailing user turn
/// is allowed only while an exchange is in flight.
fn turns_alternate(state: &ChatState) -> bool {
    let turns = state.conversation.turns();
    let Some((_, rest)) = turns.split_first() else {
        return true;
    };
    let alternates = rest.iter().enumerate().all(|(i, turn)| {
        let expected = if i % 2 == 0 {
            Speaker::User
        } else {
            Speaker::Assistant
        };
        turn.speaker() == expected
    });
    let trailing_user = rest.len() % 2 == 1;
    alternates && trailing_user == state.busy
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Invariant 1: Valid state after any sequence of transitions
    #[test]
    fn prop_transitions_preserve_validity(events in proptest::collection::vec(arb_event(), 0..30)) {
        let mut state = ChatState::default();

        for event in events {
            if let Ok(result) = transition(&state, event) {
                state = result.new_state;
                prop_assert!(is_valid_state(&state), "Invalid state: {:?}", state);
                prop_assert!(turns_alternate(&state), "Turns out of order: {:?}", state);
            }
        }
    }

    // Invariant 2: The conversation only grows, and never by more than one turn
    #[test]
    fn prop_conversation_append_only(events in proptest::collection::vec(arb_event(), 0..30)) {
        let mut state = ChatState::default();

        for event in events {
            if let Ok(result) = transition(&state, event) {
                let before = state.conversation.turns();
                let after = result.new_state.conversation.turns();
                prop_assert!(after.len() == before.len() || after.len() == before.len() + 1);
                prop_assert_eq!(&after[..before.len()], before);
                state = result.new_state;
            }
        }
    }

    // Invariant 3: An accepted user message sets busy, appends the trimmed text,
    // and requests exactly one exchange
    #[test]
    fn prop_accepted_message_requests_one_exchange(text in "[ ]{0,3}[a-zA-Z0-9]{1,20}[ ]{0,3}") {
        let state = ready_state();
        let result = transition(&state, Event::UserMessage { text: text.clone() }).unwrap();

        prop_assert!(result.new_state.busy);
        let last = result.new_state.conversation.last().unwrap();
        prop_assert_eq!(last.speaker(), Speaker::User);
        prop_assert_eq!(last.text(), text.trim());
        prop_assert_eq!(result.effects, vec![Effect::request_exchange(text.trim())]);
    }

    // Invariant 4: Blank messages are rejected in every state
    #[test]
    fn prop_blank_message_rejected(
        blank in "[ \t\n]{0,5}",
        events in proptest::collection::vec(arb_event(), 0..10)
    ) {
        let mut state = ChatState::default();
        for event in events {
            if let Ok(result) = transition(&state, event) {
                state = result.new_state;
            }
        }
        prop_assert_eq!(
            transition(&state, Event::UserMessage { text: blank }).unwrap_err(),
            TransitionError::EmptyMessage
        );
    }

    // Invariant 5: No second message while busy
    #[test]
    fn prop_busy_rejects_messages(first in "[a-z]{1,10}", second in "[a-z]{1,10}") {
        let state = transition(&ready_state(), Event::UserMessage { text: first })
            .unwrap()
            .new_state;
        prop_assert_eq!(
            transition(&state, Event::UserMessage { text: second }).unwrap_err(),
            TransitionError::Busy
        );
    }

    // Invariant 6: Every completion clears busy and leaves an assistant turn
    #[test]
    fn prop_completion_clears_busy(outcome in prop_oneof![
        arb_text().prop_map(|reply| Event::ExchangeSucceeded { reply }),
        arb_chat_error().prop_map(|error| Event::ExchangeFailed { error }),
    ]) {
        let state = transition(&ready_state(), Event::UserMessage { text: "hi".into() })
            .unwrap()
            .new_state;
        let result = transition(&state, outcome).unwrap();

        prop_assert!(!result.new_state.busy);
        prop_assert!(result.effects.is_empty());
        let last = result.new_state.conversation.last().unwrap();
        prop_assert_eq!(last.speaker(), Speaker::Assistant);
        prop_assert!(!last.text().is_empty());
    }

    // Invariant 7: Failed initialization is terminal
    #[test]
    fn prop_init_failure_is_terminal(
        error in arb_chat_error(),
        events in proptest::collection::vec(arb_event(), 0..20)
    ) {
        let state = transition(&ChatState::default(), Event::Startup).unwrap().new_state;
        let failed = transition(&state, Event::SessionFailed { error }).unwrap().new_state;

        for event in events {
            prop_assert!(transition(&failed, event).is_err());
        }
    }
}
