//! The display contract every backend implements.

use std::time::Duration;

use crate::attr::Attr;
use crate::error::Result;
use crate::key::Key;
use crate::keyname::key_name;

/// A character-grid display with normalized keyboard input.
///
/// All methods are synchronous and must be called from the thread that
/// created the display. Addressing outside the grid is ignored, never an
/// error.
pub trait Display {
    /// Enter the backend's rendering mode.
    ///
    /// Callers must pair this with [`Display::shutdown`].
    fn start(&mut self) -> Result<()>;

    /// Release everything `start` acquired. Safe after a partial start and
    /// safe to call twice.
    fn shutdown(&mut self);

    /// Grid size as `(width, height)` from the most recent resize.
    fn screen_size(&self) -> (u16, u16);

    /// Fill the whole grid with spaces under the current attributes.
    fn clear_screen(&mut self);

    /// Fill the inclusive rectangle with spaces under the current attributes.
    fn clear_area(&mut self, x1: i32, y1: i32, x2: i32, y2: i32);

    /// Store `ch` with the current attributes at `(x, y)`.
    fn write_char(&mut self, x: i32, y: i32, ch: char);

    /// Update the attribute register: `current = (current & and) | or`.
    fn set_attributes(&mut self, and: Attr, or: Attr);

    /// Move the caret.
    fn set_cursor(&mut self, x: i32, y: i32);

    /// Make every pending write visible.
    fn sync(&mut self) -> Result<()>;

    /// Wait for the next key. `None` waits forever; an elapsed timeout
    /// yields [`Key::TIMEOUT`].
    fn get_key(&mut self, timeout: Option<Duration>) -> Result<Key>;

    /// Human-readable name for `key`.
    fn key_name(&self, key: Key) -> String {
        key_name(key)
    }
}

impl<D: Display + ?Sized> Display for Box<D> {
    fn start(&mut self) -> Result<()> {
        (**self).start()
    }

    fn shutdown(&mut self) {
        (**self).shutdown();
    }

    fn screen_size(&self) -> (u16, u16) {
        (**self).screen_size()
    }

    fn clear_screen(&mut self) {
        (**self).clear_screen();
    }

    fn clear_area(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        (**self).clear_area(x1, y1, x2, y2);
    }

    fn write_char(&mut self, x: i32, y: i32, ch: char) {
        (**self).write_char(x, y, ch);
    }

    fn set_attributes(&mut self, and: Attr, or: Attr) {
        (**self).set_attributes(and, or);
    }

    fn set_cursor(&mut self, x: i32, y: i32) {
        (**self).set_cursor(x, y);
    }

    fn sync(&mut self) -> Result<()> {
        (**self).sync()
    }

    fn get_key(&mut self, timeout: Option<Duration>) -> Result<Key> {
        (**self).get_key(timeout)
    }

    fn key_name(&self, key: Key) -> String {
        (**self).key_name(key)
    }
}
