//! Terminal cell buffer with per-cell dirty bits.
//!
//! Stands in for the damage tracking a curses library keeps: every write
//! marks its cell dirty and the renderer only emits dirty cells.

use bitvec::prelude::*;
use cellscreen_core::{Attr, Cell, ScreenBuffer};
use crossterm::style::Attributes;
use unicode_width::UnicodeWidthChar;

/// A grid cell as the terminal will show it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TermCell {
    /// The code point shown in this cell.
    pub ch: char,
    /// Abstract attributes at write time.
    pub attr: Attr,
    /// Native attributes, translated once when the register changed.
    pub style: Attributes,
}

impl Default for TermCell {
    fn default() -> Self {
        Self {
            ch: ' ',
            attr: Attr::NONE,
            style: Attributes::default(),
        }
    }
}

impl TermCell {
    /// Create a new cell.
    #[must_use]
    pub const fn new(ch: char, attr: Attr, style: Attributes) -> Self {
        Self { ch, attr, style }
    }

    /// Columns the character occupies (at least 1).
    #[must_use]
    pub fn width(&self) -> u16 {
        UnicodeWidthChar::width(self.ch).unwrap_or(1).max(1) as u16
    }

    /// The abstract cell, without the native style.
    #[must_use]
    pub const fn cell(&self) -> Cell {
        Cell::new(self.ch, self.attr)
    }
}

/// The grid the terminal display writes into.
///
/// Bounds and clipping come from the shared [`ScreenBuffer`]; this type only
/// adds the dirty mask.
#[derive(Debug)]
pub struct CellBuffer {
    grid: ScreenBuffer<TermCell>,
    /// Set by writes, cleared by the renderer.
    dirty: BitVec,
}

impl CellBuffer {
    /// Create a new buffer; every cell starts dirty so the first flush paints it.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        let grid = ScreenBuffer::new(width, height, TermCell::default());
        let dirty = bitvec![1; grid.len()];
        Self { grid, dirty }
    }

    #[must_use]
    pub const fn width(&self) -> u16 {
        self.grid.width()
    }

    #[must_use]
    pub const fn height(&self) -> u16 {
        self.grid.height()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.grid.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    /// Convert signed (x, y) to a linear index, `None` when outside.
    #[must_use]
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.grid.index(x, y)
    }

    /// Grid position of a linear index.
    #[must_use]
    pub fn coords(&self, idx: usize) -> (u16, u16) {
        self.grid.coords(idx)
    }

    /// Get a cell reference.
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Option<&TermCell> {
        self.grid.get(x, y)
    }

    /// Set a cell and mark it dirty. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: i32, y: i32, cell: TermCell) {
        let Some(idx) = self.grid.index(x, y) else {
            return;
        };
        if self.grid.cells()[idx] != cell && self.grid.set(x, y, cell) {
            self.dirty.set(idx, true);
        }
    }

    /// Fill the inclusive rectangle, clipped to the buffer.
    pub fn fill_area(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, cell: TermCell) {
        for (x, y) in self.grid.area(x1, y1, x2, y2) {
            self.set(x, y, cell);
        }
    }

    /// Mark all cells as dirty (for full redraw).
    pub fn mark_all_dirty(&mut self) {
        self.dirty.fill(true);
    }

    /// Clear dirty flags.
    pub fn clear_dirty(&mut self) {
        self.dirty.fill(false);
    }

    /// Count dirty cells.
    #[must_use]
    pub fn dirty_count(&self) -> usize {
        self.dirty.count_ones()
    }

    /// Iterate over dirty cell indices.
    pub fn iter_dirty(&self) -> impl Iterator<Item = usize> + '_ {
        self.dirty.iter_ones()
    }

    /// Get cells slice.
    #[must_use]
    pub fn cells(&self) -> &[TermCell] {
        self.grid.cells()
    }

    /// Resize the buffer (clears all content, everything dirty).
    pub fn resize(&mut self, width: u16, height: u16) {
        self.grid.resize(width, height, TermCell::default());
        self.dirty = bitvec![1; self.grid.len()];
    }
}
