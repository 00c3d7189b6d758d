//! The unified key-event space.
//!
//! A [`Key`] is a signed 32-bit value:
//!
//! - `>= 0`: a Unicode code point typed as text.
//! - `< 0`: `-(code | modifiers)`, a symbolic key. `code` lives in the low byte
//!   and uses virtual-key numbering; modifiers are [`SHIFT`], [`CTRL`] and
//!   [`CTRL_ASCII`].
//! - [`Key::RESIZE`], [`Key::TIMEOUT`] and [`Key::REDRAW`] are pseudo-events.
//! - `-(0x2000 + n)` is an extended key that only its backend can name.

use std::collections::VecDeque;
use std::fmt;

/// Backspace.
pub const BACKSPACE: i32 = 0x08;
/// Tab.
pub const TAB: i32 = 0x09;
/// Return / Enter.
pub const RETURN: i32 = 0x0D;
/// Escape.
pub const ESCAPE: i32 = 0x1B;
/// Page up.
pub const PGUP: i32 = 0x21;
/// Page down.
pub const PGDN: i32 = 0x22;
/// End.
pub const END: i32 = 0x23;
/// Home.
pub const HOME: i32 = 0x24;
/// Left arrow.
pub const LEFT: i32 = 0x25;
/// Up arrow.
pub const UP: i32 = 0x26;
/// Right arrow.
pub const RIGHT: i32 = 0x27;
/// Down arrow.
pub const DOWN: i32 = 0x28;
/// Insert.
pub const INSERT: i32 = 0x2D;
/// Delete.
pub const DELETE: i32 = 0x2E;
/// F1; F2..F24 follow contiguously.
pub const F1: i32 = 0x70;
/// F24.
pub const F24: i32 = 0x87;
/// Num lock.
pub const NUMLOCK: i32 = 0x90;

/// Shift modifier bit.
pub const SHIFT: i32 = 0x100;
/// Ctrl modifier bit.
pub const CTRL: i32 = 0x200;
/// Ctrl+letter delivered as a raw control byte; the low byte is that byte.
pub const CTRL_ASCII: i32 = 0x400;

/// Low byte holding the symbolic code.
pub const CODE_MASK: i32 = 0xFF;

/// First code of the extended range.
pub const EXTENDED_BASE: i32 = 0x2000;

/// Function key code for `F<n>`, `n` in `1..=24`.
#[must_use]
pub const fn function_key(n: u8) -> i32 {
    F1 + n as i32 - 1
}

/// A normalized key event.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(pub i32);

impl Key {
    /// Terminal or window dimensions changed.
    pub const RESIZE: Self = Self(-0x1000);
    /// No input arrived before the deadline.
    pub const TIMEOUT: Self = Self(-0x1001);
    /// The screen should be repainted from scratch.
    pub const REDRAW: Self = Self(-0x1002);

    /// A typed character.
    #[must_use]
    pub const fn char(ch: char) -> Self {
        Self(ch as i32)
    }

    /// A symbolic key from a code and modifier bits.
    #[must_use]
    pub const fn symbolic(code: i32, mods: i32) -> Self {
        Self(-(code | mods))
    }

    /// Ctrl+letter as its raw control byte (`0..=31`).
    #[must_use]
    pub const fn ctrl_ascii(byte: u8) -> Self {
        Self::symbolic(byte as i32, CTRL_ASCII)
    }

    /// The `n`th extended key.
    #[must_use]
    pub const fn extended(n: u16) -> Self {
        Self(-(EXTENDED_BASE + n as i32))
    }

    /// Raw value.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Check if this is typed text.
    #[must_use]
    pub const fn is_printable(self) -> bool {
        self.0 >= 0
    }

    /// Check if this is one of the pseudo-events.
    #[must_use]
    pub const fn is_pseudo(self) -> bool {
        self.0 == Self::RESIZE.0 || self.0 == Self::TIMEOUT.0 || self.0 == Self::REDRAW.0
    }

    /// The typed character, if printable and a valid scalar value.
    #[must_use]
    pub fn as_char(self) -> Option<char> {
        if self.is_printable() {
            char::from_u32(self.0 as u32)
        } else {
            None
        }
    }

    /// Code and modifier bits of a symbolic key (`-value`).
    ///
    /// `i32::MIN` has no positive counterpart and carries no symbol.
    #[must_use]
    pub const fn symbol(self) -> Option<i32> {
        if self.0 >= 0 || self.is_pseudo() || self.extended_index().is_some() {
            return None;
        }
        self.0.checked_neg()
    }

    /// Index into the backend's extended-key table.
    #[must_use]
    pub const fn extended_index(self) -> Option<u16> {
        let v = -(self.0 as i64);
        if v >= EXTENDED_BASE as i64 && v < EXTENDED_BASE as i64 + 0x1_0000 {
            Some((v - EXTENDED_BASE as i64) as u16)
        } else {
            None
        }
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({} {})", self.0, crate::keyname::key_name(*self))
    }
}

impl From<char> for Key {
    fn from(ch: char) -> Self {
        Self::char(ch)
    }
}

/// FIFO of normalized keys waiting to be consumed.
#[derive(Debug, Clone, Default)]
pub struct KeyQueue {
    keys: VecDeque<Key>,
}

impl KeyQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a key.
    pub fn push(&mut self, key: Key) {
        self.keys.push_back(key);
    }

    /// Take the oldest key.
    pub fn pop(&mut self) -> Option<Key> {
        self.keys.pop_front()
    }

    /// Drop every pending key.
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Number of pending keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
