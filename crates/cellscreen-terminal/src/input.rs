//! Crossterm input events to normalized keys.

use cellscreen_core::key::{
    function_key, BACKSPACE, CTRL, CTRL_ASCII, DELETE, DOWN, END, ESCAPE, HOME, INSERT, LEFT,
    PGDN, PGUP, RETURN, RIGHT, SHIFT, TAB, UP,
};
use cellscreen_core::{Key, KeyNamer, KeyQueue};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::trace;
use unicode_width::UnicodeWidthChar;

/// Registry of keys that have no symbolic code, named by terminfo capability.
///
/// Names are interned on first sight, so the same key always maps to the
/// same [`Key::extended`] value for the life of the display.
#[derive(Debug, Clone, Default)]
pub struct ExtendedKeys {
    names: Vec<String>,
}

impl ExtendedKeys {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Key for a capability name, allocating a new code if unseen.
    pub fn intern(&mut self, name: &str) -> Key {
        let idx = match self.names.iter().position(|n| n == name) {
            Some(idx) => idx,
            None => {
                self.names.push(name.to_string());
                self.names.len() - 1
            }
        };
        Key::extended(idx as u16)
    }

    /// Capability name of an extended key.
    #[must_use]
    pub fn name(&self, key: Key) -> Option<&str> {
        let idx = key.extended_index()?;
        self.names.get(idx as usize).map(String::as_str)
    }

    /// Number of interned names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if nothing was interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl KeyNamer for ExtendedKeys {
    fn raw_key_name(&self, key: Key) -> Option<&str> {
        self.name(key)
    }
}

/// Converts crossterm key and paste events into [`Key`]s.
///
/// A single event can produce more than one key (Alt+x is `ESCAPE` then `x`,
/// a paste is one key per character); the first is returned and the rest are
/// pushed onto the caller's queue.
#[derive(Debug, Default)]
pub struct InputDecoder {
    extended: ExtendedKeys,
}

impl InputDecoder {
    /// Create a decoder with an empty extended-key registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The extended-key registry.
    #[must_use]
    pub const fn extended(&self) -> &ExtendedKeys {
        &self.extended
    }

    /// Decode a key event. `None` means "nothing to deliver, keep reading".
    pub fn decode_key(&mut self, event: KeyEvent, queue: &mut KeyQueue) -> Option<Key> {
        if event.kind == KeyEventKind::Release {
            return None;
        }

        if event.modifiers.contains(KeyModifiers::ALT) {
            let mut mods = event.modifiers;
            mods.remove(KeyModifiers::ALT);
            let plain = KeyEvent::new(event.code, mods);
            let key = self.decode_key(plain, queue)?;
            trace!(?key, "alt synthesized as escape prefix");
            queue.push(key);
            return Some(Key::symbolic(ESCAPE, 0));
        }

        let key = self.classify(event.code, event.modifiers);
        trace!(code = ?event.code, modifiers = ?event.modifiers, ?key, "key classified");
        key
    }

    /// Decode a bracketed paste into one key per character.
    pub fn decode_paste(&self, text: &str, queue: &mut KeyQueue) -> Option<Key> {
        let mut keys = text
            .chars()
            .filter(|&c| c != '\n' || !text.contains('\r'))
            .filter_map(char_key);
        let first = keys.next()?;
        for key in keys {
            queue.push(key);
        }
        Some(first)
    }

    fn classify(&mut self, code: KeyCode, mods: KeyModifiers) -> Option<Key> {
        let shift = if mods.contains(KeyModifiers::SHIFT) { SHIFT } else { 0 };
        let ctrl = if mods.contains(KeyModifiers::CONTROL) { CTRL } else { 0 };
        let named = |c: i32| Some(Key::symbolic(c, shift | ctrl));

        match code {
            KeyCode::Char(c) if mods.contains(KeyModifiers::CONTROL) => ctrl_char(c, shift),
            KeyCode::Char(c) => char_key(c),
            KeyCode::Null => Some(Key::ctrl_ascii(0)),
            KeyCode::Enter => named(RETURN),
            KeyCode::Tab => named(TAB),
            KeyCode::BackTab => Some(Key::symbolic(TAB, SHIFT | ctrl)),
            KeyCode::Backspace => named(BACKSPACE),
            KeyCode::Esc => named(ESCAPE),
            KeyCode::Left => named(LEFT),
            KeyCode::Right => named(RIGHT),
            KeyCode::Up => named(UP),
            KeyCode::Down => named(DOWN),
            KeyCode::Home => named(HOME),
            KeyCode::End => named(END),
            KeyCode::PageUp => named(PGUP),
            KeyCode::PageDown => named(PGDN),
            KeyCode::Insert => named(INSERT),
            KeyCode::Delete => named(DELETE),
            KeyCode::F(n @ 1..=24) => named(function_key(n)),
            KeyCode::F(n) => Some(self.extended.intern(&format!("kf{n}"))),
            KeyCode::KeypadBegin => Some(self.extended.intern("kb2")),
            KeyCode::Menu => Some(self.extended.intern("kmenu")),
            // Modifier-only presses, lock keys and media keys carry no symbol.
            _ => None,
        }
    }
}

/// A character typed without Ctrl.
fn char_key(c: char) -> Option<Key> {
    match c {
        '\r' | '\n' => Some(Key::symbolic(RETURN, 0)),
        '\t' => Some(Key::symbolic(TAB, 0)),
        '\x1b' => Some(Key::symbolic(ESCAPE, 0)),
        '\x7f' => Some(Key::symbolic(BACKSPACE, 0)),
        '\0'..='\x1f' => Some(Key::ctrl_ascii(c as u8)),
        _ => match UnicodeWidthChar::width(c) {
            Some(w) if w > 0 => Some(Key::char(c)),
            // Zero-width or control rendering: not a complete character yet.
            _ => None,
        },
    }
}

/// A character typed with Ctrl held, as its control byte.
fn ctrl_char(c: char, shift: i32) -> Option<Key> {
    let byte = match c {
        'a'..='z' | 'A'..='Z' => (c.to_ascii_uppercase() as u8) - b'@',
        ' ' | '@' | '2' => 0,
        '[' | '3' => 0x1b,
        '\\' | '4' => 0x1c,
        ']' | '5' => 0x1d,
        '^' | '6' => 0x1e,
        '_' | '7' | '-' => 0x1f,
        '\0'..='\x1f' => c as u8,
        _ => return char_key(c),
    };
    Some(Key::symbolic(i32::from(byte), CTRL_ASCII | shift))
}
