//! Keyboard handling for the live display
//!
//! `c` opens a prompt for a new target, `q` quits. Keys are turned into
//! [`LoopCommand`]s; nothing here touches the control loop.

use crate::simulation::{parse_target, LoopCommand};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing a new target; holds the text so far
    EditingTarget(String),
}

/// Result of feeding one key to [`InputState`]
#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    Ignored,
    /// Prompt text changed, redraw
    Edited,
    Command(LoopCommand),
    /// The submitted text was not a temperature
    Rejected(String),
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub mode: InputMode,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of the open prompt, if any
    pub fn prompt(&self) -> Option<&str> {
        match &self.mode {
            InputMode::Normal => None,
            InputMode::EditingTarget(buffer) => Some(buffer.as_str()),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.kind == KeyEventKind::Release {
            return KeyOutcome::Ignored;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyOutcome::Command(LoopCommand::Quit);
        }

        match &mut self.mode {
            InputMode::Normal => match key.code {
                KeyCode::Char('q') | KeyCode::Char('Q') => KeyOutcome::Command(LoopCommand::Quit),
                KeyCode::Char('c') | KeyCode::Char('C') => {
                    self.mode = InputMode::EditingTarget(String::new());
                    KeyOutcome::Edited
                }
                _ => KeyOutcome::Ignored,
            },
            InputMode::EditingTarget(buffer) => match key.code {
                KeyCode::Char(ch) if ch.is_ascii_digit() || ch == '.' || ch == '-' => {
                    buffer.push(ch);
                    KeyOutcome::Edited
                }
                KeyCode::Backspace => {
                    buffer.pop();
                    KeyOutcome::Edited
                }
                KeyCode::Esc => {
                    self.mode = InputMode::Normal;
                    KeyOutcome::Edited
                }
                KeyCode::Enter => {
                    let text = std::mem::take(buffer);
                    self.mode = InputMode::Normal;
                    match parse_target(&text) {
                        Ok(target) => KeyOutcome::Command(LoopCommand::Retarget(target)),
                        Err(e) => KeyOutcome::Rejected(e),
                    }
                }
                _ => KeyOutcome::Ignored,
            },
        }
    }
}
