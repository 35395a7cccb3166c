//! Key bindings for the review screen.
//!
//! Vim-style keys and arrow keys both work. Dialogs and prompts are handled
//! in [`super::events`] because their keys depend on the mode.
//!
//! # Example
//!
//! ```
//! use simdupe::tui::keybindings::KeyBindings;
//! use simdupe::tui::Action;
//! use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
//!
//! let bindings = KeyBindings::default();
//!
//! let j_key = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
//! let down_key = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);
//!
//! assert_eq!(bindings.resolve(&j_key), Some(Action::NavigateDown));
//! assert_eq!(bindings.resolve(&down_key), Some(Action::NavigateDown));
//! ```

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::Action;

/// Mapping from review actions to the keys that trigger them.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    action_keys: HashMap<Action, Vec<KeyEvent>>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            action_keys: default_bindings(),
        }
    }
}

impl KeyBindings {
    /// Resolve a key event to an action.
    ///
    /// Key release events are ignored (some terminals send these).
    #[must_use]
    pub fn resolve(&self, key: &KeyEvent) -> Option<Action> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        self.action_keys
            .iter()
            .find(|(_, keys)| keys.iter().any(|k| key_matches(k, key)))
            .map(|(action, _)| *action)
    }

    /// Keys bound to `action`, or an empty slice.
    #[must_use]
    pub fn keys_for_action(&self, action: &Action) -> &[KeyEvent] {
        self.action_keys
            .get(action)
            .map_or(&[], |keys| keys.as_slice())
    }

    /// Human-readable name of the first key bound to `action`.
    #[must_use]
    pub fn key_hint(&self, action: &Action) -> String {
        self.keys_for_action(action)
            .first()
            .map_or_else(String::new, Self::format_key)
    }

    /// Format a key event as a human-readable string.
    #[must_use]
    pub fn format_key(key: &KeyEvent) -> String {
        let key_name = match key.code {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::PageUp => "PgUp".to_string(),
            KeyCode::PageDown => "PgDn".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::BackTab => "Shift+Tab".to_string(),
            KeyCode::Delete => "Delete".to_string(),
            _ => "?".to_string(),
        };

        // Uppercase letters already carry the shift
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", key_name)
        } else {
            key_name
        }
    }
}

/// Match code and modifiers, ignoring Shift. Terminals disagree on whether
/// they report it for uppercase letters and BackTab.
fn key_matches(target: &KeyEvent, actual: &KeyEvent) -> bool {
    target.code == actual.code
        && target.modifiers.difference(KeyModifiers::SHIFT)
            == actual.modifiers.difference(KeyModifiers::SHIFT)
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn chars(keys: &str) -> impl Iterator<Item = KeyEvent> + '_ {
    keys.chars().map(|c| key(KeyCode::Char(c)))
}

fn default_bindings() -> HashMap<Action, Vec<KeyEvent>> {
    let mut bindings: HashMap<Action, Vec<KeyEvent>> = HashMap::new();
    let mut bind = |action: Action, keys: Vec<KeyEvent>| {
        bindings.insert(action, keys);
    };

    bind(Action::NavigateDown, vec![key(KeyCode::Char('j')), key(KeyCode::Down)]);
    bind(Action::NavigateUp, vec![key(KeyCode::Char('k')), key(KeyCode::Up)]);
    bind(Action::NextGroup, chars("J").chain([key(KeyCode::Tab)]).collect());
    bind(
        Action::PreviousGroup,
        chars("K").chain([key(KeyCode::BackTab)]).collect(),
    );
    bind(
        Action::NextPage,
        chars("]").chain([key(KeyCode::PageDown)]).collect(),
    );
    bind(
        Action::PreviousPage,
        chars("[").chain([key(KeyCode::PageUp)]).collect(),
    );

    bind(Action::ToggleSelect, chars(" ").collect());
    bind(Action::SelectAllInGroup, chars("a").collect());
    bind(Action::DeselectGroup, chars("u").collect());
    bind(Action::InvertGroup, chars("i").collect());
    bind(Action::SelectAll, chars("A").collect());
    bind(Action::DeselectAll, chars("U").collect());
    bind(Action::InvertAll, chars("I").collect());
    bind(Action::KeepNewest, chars("n").collect());
    bind(Action::KeepOldest, chars("o").collect());
    bind(Action::SelectByPattern, chars("s").collect());
    bind(Action::KeepByPattern, chars("S").collect());
    bind(Action::Filter, chars("/").collect());

    bind(Action::CycleSort, chars("c").collect());
    bind(Action::ToggleScanMode, chars("m").collect());
    bind(Action::ToggleByName, chars("1").collect());
    bind(Action::ToggleBySize, chars("2").collect());
    bind(Action::ToggleByHash, chars("3").collect());
    bind(Action::ToggleDeleteMode, chars("t").collect());
    bind(Action::Rescan, chars("r").collect());

    bind(
        Action::Delete,
        chars("d").chain([key(KeyCode::Delete)]).collect(),
    );
    bind(Action::Cancel, vec![key(KeyCode::Esc)]);
    bind(
        Action::Quit,
        chars("q")
            .chain([KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)])
            .collect(),
    );

    bindings
}
