//! Per-display session state.
//!
//! Holds everything one display instance mutates between calls: the current
//! attribute register, the cursor position and keys waiting to be delivered.
//! Each backend owns one, so two displays never share state.

use crate::attr::Attr;
use crate::cell::Cell;
use crate::key::{Key, KeyQueue};

/// Mutable state of one display.
#[derive(Debug, Clone, Default)]
pub struct Session {
    attr: Attr,
    cursor: (i32, i32),
    keys: KeyQueue,
}

impl Session {
    /// Fresh session: no attributes, cursor at the origin, empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current attribute register.
    #[must_use]
    pub const fn attr(&self) -> Attr {
        self.attr
    }

    /// Update the register as `current = (current & and) | or`.
    /// Returns the new value.
    pub fn set_attributes(&mut self, and: Attr, or: Attr) -> Attr {
        self.attr = self.attr.masked(and, or);
        self.attr
    }

    /// A cell holding `ch` under the current attributes.
    #[must_use]
    pub const fn cell(&self, ch: char) -> Cell {
        Cell::new(ch, self.attr)
    }

    /// A blank cell under the current attributes.
    #[must_use]
    pub const fn blank(&self) -> Cell {
        Cell::blank(self.attr)
    }

    /// Cursor position.
    #[must_use]
    pub const fn cursor(&self) -> (i32, i32) {
        self.cursor
    }

    /// Move the cursor, returning the previous position.
    pub fn move_cursor(&mut self, x: i32, y: i32) -> (i32, i32) {
        std::mem::replace(&mut self.cursor, (x, y))
    }

    /// Pending keys.
    pub fn keys(&mut self) -> &mut KeyQueue {
        &mut self.keys
    }

    /// Queue a key for the next `get_key`.
    pub fn push_key(&mut self, key: Key) {
        self.keys.push(key);
    }

    /// Take the oldest pending key.
    pub fn pop_key(&mut self) -> Option<Key> {
        self.keys.pop()
    }

    /// Reset to a fresh session.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
