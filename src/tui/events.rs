//! Keyboard event handling.
//!
//! Terminal events are read with crossterm and turned into [`Action`]s. The
//! review screen uses [`KeyBindings`]; dialogs and prompts have small fixed
//! maps of their own.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::app::{Action, AppMode};
use super::keybindings::KeyBindings;

/// Errors reading terminal events.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// Polling or reading the terminal failed.
    #[error("Terminal event error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads terminal events and maps them to actions.
#[derive(Debug, Clone, Default)]
pub struct EventHandler {
    bindings: KeyBindings,
}

impl EventHandler {
    /// Create a handler with the default bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The review-screen bindings.
    #[must_use]
    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Wait up to `timeout` for a key and map it for `mode`.
    ///
    /// Returns `Ok(None)` on timeout, for non-key events and for unbound keys.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Io`] when the terminal cannot be read.
    pub fn next_action(
        &self,
        timeout: Duration,
        mode: AppMode,
    ) -> Result<Option<Action>, EventError> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) => Ok(self.map_key(&key, mode)),
            _ => Ok(None),
        }
    }

    /// Map one key press to an action in the given mode.
    #[must_use]
    pub fn map_key(&self, key: &KeyEvent, mode: AppMode) -> Option<Action> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match mode {
            AppMode::Scanning => match key.code {
                KeyCode::Esc => Some(Action::Cancel),
                KeyCode::Char('c') if ctrl => Some(Action::Cancel),
                KeyCode::Char('q') => Some(Action::Quit),
                _ => None,
            },
            AppMode::Prompting(_) => match key.code {
                KeyCode::Enter => Some(Action::Confirm),
                KeyCode::Esc => Some(Action::Cancel),
                KeyCode::Char('c') if ctrl => Some(Action::Cancel),
                KeyCode::Backspace => Some(Action::Backspace),
                KeyCode::Char(c) if !ctrl => Some(Action::Input(c)),
                _ => None,
            },
            AppMode::Confirming => match key.code {
                KeyCode::Char('y' | 'Y') | KeyCode::Enter => Some(Action::Confirm),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Action::Cancel),
                KeyCode::Char('c') if ctrl => Some(Action::Quit),
                _ => None,
            },
            AppMode::ShowingErrors => match key.code {
                KeyCode::Enter | KeyCode::Esc => Some(Action::Cancel),
                KeyCode::Char('q') => Some(Action::Quit),
                KeyCode::Char('c') if ctrl => Some(Action::Quit),
                _ => None,
            },
            AppMode::Reviewing => self.bindings.resolve(key),
            AppMode::Quitting => None,
        }
    }
}
