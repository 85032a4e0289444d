use std::collections::HashMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Abstract key produced by the keyboard decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    LineStart,
    LineEnd,
    Enter,
    Delete,
    Save,
    Load,
    New,
    /// Return focus to the application stack.
    Focus,
    Quit,
    Char(char),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Key::Up => "Up",
            Key::Down => "Down",
            Key::Left => "Left",
            Key::Right => "Right",
            Key::PageUp => "Page up",
            Key::PageDown => "Page down",
            Key::LineStart => "Line start",
            Key::LineEnd => "Line end",
            Key::Enter => "Enter",
            Key::Delete => "Delete",
            Key::Save => "Save",
            Key::Load => "Load",
            Key::New => "New",
            Key::Focus => "Back to apps",
            Key::Quit => "Quit",
            Key::Char(c) => return write!(f, "'{c}'"),
        };
        write!(f, "{}", s)
    }
}

/// The closed message vocabulary every widget understands a subset of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    PageLeft,
    PageRight,
    Enter,
    Del,
    Save,
    Load,
    New,
    Char(char),
}

impl Message {
    /// Translate a decoded key. Shell-level keys have no widget message.
    pub fn from_key(key: Key) -> Option<Self> {
        Some(match key {
            Key::Up => Message::Up,
            Key::Down => Message::Down,
            Key::Left => Message::Left,
            Key::Right => Message::Right,
            Key::PageUp => Message::PageUp,
            Key::PageDown => Message::PageDown,
            Key::LineStart => Message::PageLeft,
            Key::LineEnd => Message::PageRight,
            Key::Enter => Message::Enter,
            Key::Delete => Message::Del,
            Key::Save => Message::Save,
            Key::Load => Message::Load,
            Key::New => Message::New,
            Key::Char(c) => Message::Char(c),
            Key::Focus | Key::Quit => return None,
        })
    }

    /// The printable character carried by the message, if any.
    pub fn printable(&self) -> Option<char> {
        match self {
            Message::Char(c) if is_printable(*c) => Some(*c),
            _ => None,
        }
    }
}

pub fn is_printable(c: char) -> bool {
    !c.is_control()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        key.code == self.code && key.modifiers == self.mods
    }
}

/// Maps terminal key events onto the device's abstract keys.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<Key, Vec<KeyCombo>>,
}

impl KeyBindings {
    pub fn empty() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn add(&mut self, key: Key, combo: KeyCombo) {
        self.map.entry(key).or_default().push(combo);
    }

    /// Resolve a terminal key event. Unbound printable characters decode as
    /// `Key::Char`.
    pub fn key_for(&self, event: &KeyEvent) -> Option<Key> {
        for (key, list) in &self.map {
            if list.iter().any(|c| c.matches(event)) {
                return Some(*key);
            }
        }
        match event.code {
            KeyCode::Char(c)
                if !event
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                Some(Key::Char(c))
            }
            _ => None,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        use Key::*;
        let none = KeyModifiers::NONE;
        let ctrl = KeyModifiers::CONTROL;
        let mut kb = Self::empty();
        kb.add(Up, KeyCombo::new(KeyCode::Up, none));
        kb.add(Down, KeyCombo::new(KeyCode::Down, none));
        kb.add(Left, KeyCombo::new(KeyCode::Left, none));
        kb.add(Right, KeyCombo::new(KeyCode::Right, none));
        kb.add(PageUp, KeyCombo::new(KeyCode::PageUp, none));
        kb.add(PageDown, KeyCombo::new(KeyCode::PageDown, none));
        kb.add(LineStart, KeyCombo::new(KeyCode::Home, none));
        kb.add(LineEnd, KeyCombo::new(KeyCode::End, none));
        kb.add(Enter, KeyCombo::new(KeyCode::Enter, none));
        kb.add(Delete, KeyCombo::new(KeyCode::Backspace, none));
        kb.add(Delete, KeyCombo::new(KeyCode::Delete, none));
        kb.add(Save, KeyCombo::new(KeyCode::Char('s'), ctrl));
        kb.add(Load, KeyCombo::new(KeyCode::Char('l'), ctrl));
        kb.add(New, KeyCombo::new(KeyCode::Char('x'), ctrl));
        kb.add(Focus, KeyCombo::new(KeyCode::Tab, none));
        kb.add(Focus, KeyCombo::new(KeyCode::Esc, none));
        kb.add(Quit, KeyCombo::new(KeyCode::Char('c'), ctrl));
        kb.add(Quit, KeyCombo::new(KeyCode::Char('q'), ctrl));
        kb
    }
}
