//! Writes the dirty cells of a [`CellBuffer`] to the terminal.
//!
//! This is the terminal side of `sync`: the terminal keeps what it last
//! showed, so only cells written since the previous flush are emitted. Cursor
//! moves are skipped when the next dirty cell follows the last one written,
//! and SGR attributes are only re-sent when they change.

use super::cell_buffer::CellBuffer;
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Attributes, Print, SetAttribute, SetAttributes};
use std::io::{self, BufWriter, Write};

/// Emits dirty cells, remembering where the terminal cursor was left and
/// which attributes are active.
#[derive(Debug)]
pub struct DiffRenderer {
    /// Terminal cursor after the last write; `u16::MAX` when unknown.
    cursor_x: u16,
    cursor_y: u16,
    /// Attributes active on the terminal.
    last_style: Attributes,
    // Counters for the most recent flush.
    cells_written: usize,
    cursor_moves: usize,
    style_changes: usize,
}

impl Default for DiffRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffRenderer {
    /// Renderer that assumes nothing about the terminal state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cursor_x: u16::MAX,
            cursor_y: u16::MAX,
            last_style: Attributes::default(),
            cells_written: 0,
            cursor_moves: 0,
            style_changes: 0,
        }
    }

    /// Forget the cursor and attribute state. Needed after the terminal was
    /// resized or cleared behind the renderer's back.
    pub fn reset(&mut self) {
        self.cursor_x = u16::MAX;
        self.cursor_y = u16::MAX;
        self.last_style = Attributes::default();
        self.cells_written = 0;
        self.cursor_moves = 0;
        self.style_changes = 0;
    }

    /// Cells emitted by the last flush.
    #[must_use]
    pub const fn cells_written(&self) -> usize {
        self.cells_written
    }

    /// `MoveTo` sequences emitted by the last flush.
    #[must_use]
    pub const fn cursor_moves(&self) -> usize {
        self.cursor_moves
    }

    /// Attribute changes emitted by the last flush.
    #[must_use]
    pub const fn style_changes(&self) -> usize {
        self.style_changes
    }

    /// Flush dirty cells to the writer, then park the hardware cursor at
    /// `caret` (clamped to the grid).
    ///
    /// Returns the number of cells written.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the writer fails.
    pub fn flush<W: Write>(
        &mut self,
        buffer: &mut CellBuffer,
        writer: &mut W,
        caret: (i32, i32),
    ) -> io::Result<usize> {
        // Reset statistics
        self.cells_written = 0;
        self.cursor_moves = 0;
        self.style_changes = 0;

        if buffer.is_empty() {
            return Ok(0);
        }

        // One write syscall per flush.
        let mut buf_writer = BufWriter::with_capacity(8192, writer);

        // Reset attributes at start for clean state
        queue!(buf_writer, SetAttribute(Attribute::Reset))?;
        self.last_style = Attributes::default();

        let width = buffer.width();

        for idx in buffer.iter_dirty() {
            let (x, y) = buffer.coords(idx);
            let cell = &buffer.cells()[idx];

            // Move cursor if needed
            if self.cursor_x != x || self.cursor_y != y {
                queue!(buf_writer, MoveTo(x, y))?;
                self.cursor_x = x;
                self.cursor_y = y;
                self.cursor_moves += 1;
            }

            if cell.style != self.last_style {
                queue!(
                    buf_writer,
                    SetAttribute(Attribute::Reset),
                    SetAttributes(cell.style)
                )?;
                self.last_style = cell.style;
                self.style_changes += 1;
            }

            queue!(buf_writer, Print(cell.ch))?;

            self.cursor_x = self.cursor_x.saturating_add(cell.width());
            if self.cursor_x >= width {
                // The terminal may or may not have wrapped.
                self.cursor_x = u16::MAX;
            }

            self.cells_written += 1;
        }

        buffer.clear_dirty();

        let x = caret.0.clamp(0, i32::from(width) - 1) as u16;
        let y = caret.1.clamp(0, i32::from(buffer.height()) - 1) as u16;
        if self.cursor_x != x || self.cursor_y != y {
            queue!(buf_writer, MoveTo(x, y))?;
            self.cursor_x = x;
            self.cursor_y = y;
            self.cursor_moves += 1;
        }

        buf_writer.flush()?;

        Ok(self.cells_written)
    }
}
