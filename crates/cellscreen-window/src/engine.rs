//! Double-buffered character storage and row diffing.
//!
//! Writes land in the back buffer. `sync` copies every row that differs into
//! the front buffer (what the painter draws from) and reports the pixel
//! rectangle of each copied row.

use cellscreen_core::{Cell, ScreenBuffer};

use crate::geometry::Rect;

/// Regions repainted by one `sync`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Repaint {
    /// Rows copied from the back buffer, top to bottom.
    pub rows: Vec<u16>,
    /// Every region presented, row rectangles first, then the caret box.
    pub regions: Vec<Rect>,
}

impl Repaint {
    #[must_use]
    pub fn rows_changed(&self) -> usize {
        self.rows.len()
    }
}

/// Front (presented) and back (pending) buffers of equal size.
#[derive(Clone, Debug)]
pub struct Frame {
    front: ScreenBuffer,
    back: ScreenBuffer,
}

impl Frame {
    /// New frame. The front buffer holds cells no caller can write, so the
    /// first sync repaints every row.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            front: ScreenBuffer::new(width, height, Cell::UNSET),
            back: ScreenBuffer::new(width, height, Cell::BLANK),
        }
    }

    #[must_use]
    pub const fn width(&self) -> u16 {
        self.back.width()
    }

    #[must_use]
    pub const fn height(&self) -> u16 {
        self.back.height()
    }

    /// Presented cells.
    #[must_use]
    pub const fn front(&self) -> &ScreenBuffer {
        &self.front
    }

    /// Pending cells.
    #[must_use]
    pub const fn back(&self) -> &ScreenBuffer {
        &self.back
    }

    pub fn back_mut(&mut self) -> &mut ScreenBuffer {
        &mut self.back
    }

    /// Copy differing rows to the front buffer; returns their indices.
    pub fn sync_rows(&mut self) -> Vec<u16> {
        let mut changed = Vec::new();
        for y in 0..self.height() {
            if self.front.row(y) != self.back.row(y) {
                self.front.row_mut(y).copy_from_slice(self.back.row(y));
                changed.push(y);
            }
        }
        changed
    }
}

/// Pixel rectangle covering grid row `y`.
#[must_use]
pub fn row_rect(y: u16, width: u16, cell: (u32, u32)) -> Rect {
    let (cw, ch) = (cell.0 as i32, cell.1 as i32);
    let top = i32::from(y) * ch;
    Rect::new(0, top, i32::from(width) * cw, top + ch)
}

/// Cell box at `(x, y)` grown by one pixel on every side, so the caret
/// corners drawn outside the cell are covered.
///
/// Pixel edges saturate, so a caret parked far off the grid yields a box
/// that misses the client area instead of wrapping onto it.
#[must_use]
pub fn caret_box(x: i32, y: i32, cell: (u32, u32)) -> Rect {
    let (cw, ch) = (cell.0 as i32, cell.1 as i32);
    let left = x.saturating_mul(cw).saturating_sub(1);
    let top = y.saturating_mul(ch).saturating_sub(1);
    Rect::new(
        left,
        top,
        left.saturating_add(cw + 2),
        top.saturating_add(ch + 2),
    )
}

/// Client strips right of and below the grid, which no row covers.
#[must_use]
pub fn border_rects(client: (u32, u32), grid: (u16, u16), cell: (u32, u32)) -> [Rect; 2] {
    let client = Rect::from_size(client.0, client.1);
    let mut right = client;
    right.left = i32::from(grid.0) * cell.0 as i32;
    let mut bottom = client;
    bottom.top = i32::from(grid.1) * cell.1 as i32;
    [right, bottom]
}
