//! Raw key events as delivered by the host page

use once_cell::sync::Lazy;
use std::cell::Cell;
use std::collections::HashMap;

/// Legacy key codes for the keys the intent classifier looks at
pub mod codes {
    pub const SPACE: u32 = 32;
    pub const ARROW_LEFT: u32 = 37;
    pub const ARROW_UP: u32 = 38;
    pub const ARROW_RIGHT: u32 = 39;
    pub const ARROW_DOWN: u32 = 40;
    pub const A: u32 = 65;
    pub const D: u32 = 68;
    pub const Q: u32 = 81;
}

/// Named key labels (lower case) to legacy key codes
///
/// Letters and digits are filled in programmatically since their codes are
/// the ASCII values of the upper-case letter / digit.
static KEY_CODES: Lazy<HashMap<String, u32>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("backspace".to_string(), 8);
    m.insert("tab".to_string(), 9);
    m.insert("enter".to_string(), 13);
    m.insert("shift".to_string(), 16);
    m.insert("control".to_string(), 17);
    m.insert("alt".to_string(), 18);
    m.insert("escape".to_string(), 27);
    m.insert(" ".to_string(), codes::SPACE);
    m.insert("arrowleft".to_string(), codes::ARROW_LEFT);
    m.insert("arrowup".to_string(), codes::ARROW_UP);
    m.insert("arrowright".to_string(), codes::ARROW_RIGHT);
    m.insert("arrowdown".to_string(), codes::ARROW_DOWN);
    m.insert("delete".to_string(), 46);
    m.insert("meta".to_string(), 91);

    for c in 'a'..='z' {
        m.insert(c.to_string(), c.to_ascii_uppercase() as u32);
    }
    for c in '0'..='9' {
        m.insert(c.to_string(), c as u32);
    }

    m
});

/// Look up the legacy key code for a DOM key label (0 when unknown)
pub fn key_code_for(label: &str) -> u32 {
    KEY_CODES
        .get(&label.to_lowercase())
        .copied()
        .unwrap_or(0)
}

/// Which half of a key press this event is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyEventKind {
    Down,
    Up,
}

/// Modifier keys held while the event fired
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// No modifier held
    pub fn none(&self) -> bool {
        !(self.ctrl || self.shift || self.alt || self.meta)
    }
}

/// A keyboard event
///
/// Listeners receive a shared reference; the two flags use interior
/// mutability so any listener can mark the event handled.
#[derive(Debug, Clone)]
pub struct KeyEvent {
    pub kind: KeyEventKind,
    /// Key label as reported by the page (e.g. "ArrowLeft", "A", "1")
    pub key: String,
    /// Legacy numeric key code
    pub key_code: u32,
    pub modifiers: Modifiers,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
}

impl KeyEvent {
    /// Create an event, inferring the key code from the label
    pub fn new(kind: KeyEventKind, key: impl Into<String>) -> Self {
        let key = key.into();
        let key_code = key_code_for(&key);
        Self {
            kind,
            key,
            key_code,
            modifiers: Modifiers::default(),
            default_prevented: Cell::new(false),
            propagation_stopped: Cell::new(false),
        }
    }

    /// Key-down event for `key`
    pub fn down(key: impl Into<String>) -> Self {
        Self::new(KeyEventKind::Down, key)
    }

    /// Key-up event for `key`
    pub fn up(key: impl Into<String>) -> Self {
        Self::new(KeyEventKind::Up, key)
    }

    pub fn with_key_code(mut self, key_code: u32) -> Self {
        self.key_code = key_code;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_ctrl(mut self) -> Self {
        self.modifiers.ctrl = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.modifiers.alt = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.modifiers.meta = true;
        self
    }

    /// Key label lower-cased, the only layout normalization applied
    pub fn normalized_key(&self) -> String {
        self.key.to_lowercase()
    }

    pub fn is_down(&self) -> bool {
        self.kind == KeyEventKind::Down
    }

    /// Ask the host not to run the page's default action for this key
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    /// Skip every listener after the current one for this event
    pub fn stop_immediate_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_code_lookup() {
        assert_eq!(key_code_for("ArrowLeft"), codes::ARROW_LEFT);
        assert_eq!(key_code_for("a"), codes::A);
        assert_eq!(key_code_for("A"), codes::A);
        assert_eq!(key_code_for("1"), 49);
        assert_eq!(key_code_for(" "), codes::SPACE);
        assert_eq!(key_code_for("F13"), 0);
    }

    #[test]
    fn test_event_flags() {
        let event = KeyEvent::down("Q").with_ctrl().with_shift();
        assert_eq!(event.key_code, codes::Q);
        assert_eq!(event.normalized_key(), "q");
        assert!(!event.default_prevented());

        event.prevent_default();
        event.stop_immediate_propagation();
        assert!(event.default_prevented());
        assert!(event.propagation_stopped());
    }
}
