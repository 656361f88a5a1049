//! Text entry for the chat window

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What the UI loop should do after a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposerAction {
    None,
    Submit(String),
    Quit,
}

/// Multi-line input buffer. Enter submits; Shift+Enter or Alt+Enter
/// inserts a newline (many terminals only report the Alt form).
#[derive(Debug, Default)]
pub struct Composer {
    text: String,
}

impl Composer {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }

    /// Put back a draft the controller refused. Anything typed since goes
    /// on the following line.
    pub fn restore(&mut self, draft: String) {
        if self.text.is_empty() {
            self.text = draft;
        } else {
            self.text = format!("{draft}\n{}", self.text);
        }
    }

    /// Handle a key. Editing and submission only happen while `enabled`.
    pub fn handle_key(&mut self, key: KeyEvent, enabled: bool) -> ComposerAction {
        if key.kind != KeyEventKind::Press {
            return ComposerAction::None;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return ComposerAction::Quit,
            KeyCode::Char('c' | 'd') if ctrl => return ComposerAction::Quit,
            _ => {}
        }

        if !enabled {
            return ComposerAction::None;
        }

        match key.code {
            KeyCode::Enter
                if key
                    .modifiers
                    .intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) =>
            {
                self.text.push('\n');
            }
            KeyCode::Enter => {
                if !self.text.trim().is_empty() {
                    return ComposerAction::Submit(std::mem::take(&mut self.text));
                }
            }
            KeyCode::Backspace => {
                self.text.pop();
            }
            KeyCode::Char('u') if ctrl => self.text.clear(),
            KeyCode::Char(c) if !ctrl => self.text.push(c),
            _ => {}
        }

        ComposerAction::None
    }
}
