//! Cells and the row-major screen buffer.

use crate::attr::Attr;

/// Glyph-cache key: code point in the high bits, attribute bits in the low byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub u32);

impl CellId {
    /// Code point part of the id.
    #[must_use]
    pub const fn codepoint(self) -> u32 {
        self.0 >> 8
    }

    /// Attribute part of the id.
    #[must_use]
    pub const fn attr(self) -> Attr {
        Attr::from_bits_truncate((self.0 & 0xFF) as u8)
    }
}

/// A single character cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    /// The code point shown in this cell.
    pub ch: char,
    /// Attributes active when the cell was written.
    pub attr: Attr,
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}

impl Cell {
    /// Space with no attributes.
    pub const BLANK: Self = Self {
        ch: ' ',
        attr: Attr::NONE,
    };

    /// A cell that never compares equal to anything written by a caller.
    /// Used to seed presented buffers so the first flush repaints everything.
    pub const UNSET: Self = Self {
        ch: '\0',
        attr: Attr::NONE,
    };

    /// Create a cell.
    #[must_use]
    pub const fn new(ch: char, attr: Attr) -> Self {
        Self { ch, attr }
    }

    /// Space under the given attributes.
    #[must_use]
    pub const fn blank(attr: Attr) -> Self {
        Self { ch: ' ', attr }
    }

    /// Packed glyph-cache id.
    #[must_use]
    pub const fn id(self) -> CellId {
        CellId(((self.ch as u32) << 8) | self.attr.bits() as u32)
    }
}

/// Row-major grid of cells.
///
/// Generic over the cell type so a backend can store its own richer cell
/// while sharing the bounds and clipping rules.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScreenBuffer<C = Cell> {
    cells: Vec<C>,
    width: u16,
    height: u16,
}

impl<C: Copy> ScreenBuffer<C> {
    /// Create a buffer filled with `fill`.
    #[must_use]
    pub fn new(width: u16, height: u16, fill: C) -> Self {
        let size = (width as usize) * (height as usize);
        Self {
            cells: vec![fill; size],
            width,
            height,
        }
    }

    /// Buffer width in cells.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Buffer height in cells.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Total cell count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the buffer holds no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Convert signed coordinates to a linear index, `None` when outside.
    #[must_use]
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= i32::from(self.width) || y >= i32::from(self.height) {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    /// Grid position of a linear index.
    #[must_use]
    pub fn coords(&self, idx: usize) -> (u16, u16) {
        let width = (self.width as usize).max(1);
        ((idx % width) as u16, (idx / width) as u16)
    }

    /// Positions of the inclusive rectangle `(x1, y1)..=(x2, y2)` clipped to
    /// the grid, row by row. Empty when the rectangle misses the grid.
    pub fn area(
        &self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
    ) -> impl Iterator<Item = (i32, i32)> {
        let x_start = x1.max(0);
        let y_start = y1.max(0);
        let x_end = x2.min(i32::from(self.width) - 1);
        let y_end = y2.min(i32::from(self.height) - 1);
        (y_start..=y_end).flat_map(move |y| (x_start..=x_end).map(move |x| (x, y)))
    }

    /// Get a cell.
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Option<&C> {
        self.index(x, y).map(|idx| &self.cells[idx])
    }

    /// Set a cell. Returns `false` (and changes nothing) when out of bounds.
    pub fn set(&mut self, x: i32, y: i32, cell: C) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Fill the inclusive rectangle `(x1, y1)..=(x2, y2)`, clipped to the grid.
    /// Returns the number of cells written.
    pub fn fill_area(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, cell: C) -> usize {
        let mut written = 0;
        for (x, y) in self.area(x1, y1, x2, y2) {
            if self.set(x, y, cell) {
                written += 1;
            }
        }
        written
    }

    /// Fill every cell.
    pub fn fill(&mut self, cell: C) {
        self.cells.fill(cell);
    }

    /// One row of cells.
    #[must_use]
    pub fn row(&self, y: u16) -> &[C] {
        let start = (y as usize) * (self.width as usize);
        &self.cells[start..start + self.width as usize]
    }

    /// One mutable row of cells.
    pub fn row_mut(&mut self, y: u16) -> &mut [C] {
        let start = (y as usize) * (self.width as usize);
        let width = self.width as usize;
        &mut self.cells[start..start + width]
    }

    /// All cells.
    #[must_use]
    pub fn cells(&self) -> &[C] {
        &self.cells
    }

    /// Reallocate to new dimensions, filling with `fill`.
    pub fn resize(&mut self, width: u16, height: u16, fill: C) {
        let size = (width as usize) * (height as usize);
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells.resize(size, fill);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_cell_default_is_blank() {
        assert_eq!(Cell::default(), Cell::BLANK);
        assert_eq!(Cell::default().ch, ' ');
    }

    #[test]
    fn test_cell_id_packs_codepoint_and_attr() {
        let cell = Cell::new('A', Attr::BOLD | Attr::UNDERLINE);
        let id = cell.id();
        assert_eq!(id.codepoint(), 'A' as u32);
        assert_eq!(id.attr(), Attr::BOLD | Attr::UNDERLINE);
    }

    #[test]
    fn test_cell_unset_differs_from_blank() {
        assert_ne!(Cell::UNSET, Cell::BLANK);
    }

    #[test]
    fn test_buffer_creation() {
        let buf = ScreenBuffer::new(80, 25, Cell::BLANK);
        assert_eq!(buf.width(), 80);
        assert_eq!(buf.height(), 25);
        assert_eq!(buf.len(), 2000);
        assert!(!buf.is_empty());
    }

    #[test]
    fn test_buffer_empty() {
        let buf: ScreenBuffer = ScreenBuffer::default();
        assert!(buf.is_empty());
        assert!(buf.get(0, 0).is_none());
    }

    #[test]
    fn test_buffer_index() {
        let buf = ScreenBuffer::new(10, 5, Cell::BLANK);
        assert_eq!(buf.index(0, 0), Some(0));
        assert_eq!(buf.index(5, 2), Some(25));
        assert_eq!(buf.index(10, 0), None);
        assert_eq!(buf.index(-1, 0), None);
        assert_eq!(buf.index(0, 5), None);
    }

    #[test]
    fn test_buffer_set_get() {
        let mut buf = ScreenBuffer::new(10, 5, Cell::BLANK);
        assert!(buf.set(3, 4, Cell::new('x', Attr::DIM)));
        assert_eq!(buf.get(3, 4), Some(&Cell::new('x', Attr::DIM)));
    }

    #[test]
    fn test_buffer_set_out_of_bounds() {
        let mut buf = ScreenBuffer::new(10, 5, Cell::BLANK);
        let before = buf.clone();
        assert!(!buf.set(100, 100, Cell::new('x', Attr::NONE)));
        assert!(!buf.set(-1, 2, Cell::new('x', Attr::NONE)));
        assert_eq!(buf, before);
    }

    #[test]
    fn test_buffer_fill_area_inclusive() {
        let mut buf = ScreenBuffer::new(10, 10, Cell::new('.', Attr::NONE));
        let written = buf.fill_area(2, 2, 4, 3, Cell::blank(Attr::REVERSE));
        assert_eq!(written, 6);
        assert_eq!(buf.get(4, 3), Some(&Cell::blank(Attr::REVERSE)));
        assert_eq!(buf.get(5, 3), Some(&Cell::new('.', Attr::NONE)));
    }

    #[test]
    fn test_buffer_fill_area_clipped() {
        let mut buf = ScreenBuffer::new(10, 10, Cell::BLANK);
        let written = buf.fill_area(8, 8, 20, 20, Cell::blank(Attr::BOLD));
        assert_eq!(written, 4);
        assert_eq!(buf.fill_area(20, 20, 30, 30, Cell::BLANK), 0);
        assert_eq!(buf.fill_area(-5, -5, -1, -1, Cell::BLANK), 0);
    }

    #[test]
    fn test_buffer_area_is_clipped_row_major() {
        let buf = ScreenBuffer::new(3, 3, Cell::BLANK);
        let area: Vec<_> = buf.area(1, -4, 9, 1).collect();
        assert_eq!(area, vec![(1, 0), (2, 0), (1, 1), (2, 1)]);
        assert_eq!(buf.area(3, 0, 5, 2).count(), 0);
        assert_eq!(buf.area(2, 2, 1, 1).count(), 0);
    }

    #[test]
    fn test_buffer_coords_inverts_index() {
        let buf = ScreenBuffer::new(10, 5, Cell::BLANK);
        assert_eq!(buf.coords(0), (0, 0));
        assert_eq!(buf.coords(25), (5, 2));
        assert_eq!(buf.index(5, 2), Some(25));
    }

    #[test]
    fn test_buffer_holds_other_cell_types() {
        let mut buf = ScreenBuffer::new(4, 2, 0u8);
        assert_eq!(buf.fill_area(2, 0, 8, 8, 7), 4);
        assert_eq!(buf.row(1), &[0u8, 0, 7, 7]);
    }

    #[test]
    fn test_buffer_rows() {
        let mut buf = ScreenBuffer::new(4, 2, Cell::BLANK);
        buf.row_mut(1)[2] = Cell::new('z', Attr::NONE);
        assert_eq!(buf.row(1)[2].ch, 'z');
        assert_eq!(buf.row(0).len(), 4);
    }

    #[test]
    fn test_buffer_resize_clears() {
        let mut buf = ScreenBuffer::new(10, 5, Cell::BLANK);
        buf.set(0, 0, Cell::new('x', Attr::NONE));
        buf.resize(20, 10, Cell::BLANK);
        assert_eq!(buf.len(), 200);
        assert_eq!(buf.get(0, 0), Some(&Cell::BLANK));
    }

    proptest! {
        #[test]
        fn prop_out_of_bounds_set_is_noop(x in -50i32..50, y in -50i32..50) {
            let mut buf = ScreenBuffer::new(10, 5, Cell::BLANK);
            let before = buf.clone();
            let inside = (0..10).contains(&x) && (0..5).contains(&y);
            let changed = buf.set(x, y, Cell::new('q', Attr::BOLD));
            prop_assert_eq!(changed, inside);
            if !inside {
                prop_assert_eq!(buf, before);
            }
        }
    }
}
