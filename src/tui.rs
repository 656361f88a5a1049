//! Terminal front end
//!
//! Reads snapshots from the controller, draws them, and turns key presses
//! into `send` intents. The controller is never mutated from here.

mod composer;
mod render;

use crate::controller::ChatController;
use crate::session::SessionConnector;
use composer::{Composer, ComposerAction};
use crossterm::event::{self, Event as TermEvent};
use ratatui::DefaultTerminal;
use render::View;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};

const INPUT_POLL: Duration = Duration::from_millis(100);
const SPINNER_INTERVAL: Duration = Duration::from_millis(150);

/// Run the chat window until the user quits
pub async fn run<C>(controller: Arc<ChatController<C>>) -> io::Result<()>
where
    C: SessionConnector + 'static,
{
    let mut terminal = ratatui::try_init()?;
    let result = event_loop(&mut terminal, controller).await;
    ratatui::restore();
    result
}

async fn event_loop<C>(
    terminal: &mut DefaultTerminal,
    controller: Arc<ChatController<C>>,
) -> io::Result<()>
where
    C: SessionConnector + 'static,
{
    let mut state_rx = controller.subscribe();
    let mut term_rx = spawn_input_reader();
    let mut composer = Composer::default();
    let mut ticker = spinner_ticker();
    let (draft_tx, mut draft_rx) = mpsc::unbounded_channel::<String>();
    let mut tick = 0usize;

    if let Err(e) = controller.initialize().await {
        tracing::debug!(error = %e, "Initialize skipped");
    }

    loop {
        let state = state_rx.borrow_and_update().clone();
        terminal.draw(|frame| {
            render::draw(
                frame,
                &View {
                    state: &state,
                    composer: &composer,
                    model: &controller.settings().model,
                    tick,
                },
            );
        })?;

        tokio::select! {
            event = term_rx.recv() => {
                let Some(event) = event else {
                    // Input reader stopped; nothing can reach us anymore
                    break;
                };
                let TermEvent::Key(key) = event else {
                    // Resize and friends only need a redraw
                    continue;
                };
                match composer.handle_key(key, state.accepts_input()) {
                    ComposerAction::Quit => break,
                    ComposerAction::Submit(text) => {
                        let controller = controller.clone();
                        let draft_tx = draft_tx.clone();
                        tokio::spawn(async move {
                            if let Err(e) = controller.send(&text).await {
                                tracing::debug!(error = %e, "Send rejected, restoring draft");
                                let _ = draft_tx.send(text);
                            }
                        });
                    }
                    ComposerAction::None => {}
                }
            }
            changed = state_rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            Some(draft) = draft_rx.recv() => {
                composer.restore(draft);
            }
            _ = ticker.tick(), if state.busy => {
                tick = tick.wrapping_add(1);
            }
        }
    }

    Ok(())
}

/// Ticks missed while idle are dropped, not replayed
fn spinner_ticker() -> Interval {
    let mut ticker = tokio::time::interval(SPINNER_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

/// crossterm reads block, so they live on their own thread
fn spawn_input_reader() -> mpsc::UnboundedReceiver<TermEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        while !tx.is_closed() {
            match event::poll(INPUT_POLL) {
                Ok(true) => match event::read() {
                    Ok(event) => {
                        if tx.send(event).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to read terminal event");
                        break;
                    }
                },
                Ok(false) => {}
                Err(e) => {
                    tracing::error!(error = %e, "Failed to poll terminal");
                    break;
                }
            }
        }
    });
    rx
}
