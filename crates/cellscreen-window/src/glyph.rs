//! Glyph cache boundary.
//!
//! Rasterization happens elsewhere; the window display only asks for cell
//! metrics and for a ready-to-blit bitmap per [`CellId`].

use std::collections::HashMap;

use cellscreen_core::{Attr, CellId, Result};

use crate::geometry::FontDescriptor;

/// A rasterized cell, blitted with OR at `(cell_x + x_offset, cell_y + y_offset)`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Glyph {
    pub x_offset: i32,
    pub y_offset: i32,
    /// Advance width in pixels.
    pub width: u32,
    /// Bitmap width.
    pub real_width: u32,
    /// Bitmap height.
    pub real_height: u32,
    /// `0x00RRGGBB`, row-major, `real_width * real_height` entries.
    pub pixels: Vec<u32>,
}

impl Glyph {
    /// Pixel at `(x, y)` inside the bitmap.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.real_width || y >= self.real_height {
            return None;
        }
        self.pixels
            .get((y * self.real_width + x) as usize)
            .copied()
    }
}

/// Source of glyph bitmaps keyed by cell id.
pub trait GlyphCache {
    /// Load `font`. Called once the window exists, and again after a font change.
    fn init(&mut self, font: &FontDescriptor) -> Result<()>;

    /// Release the font and every cached glyph.
    fn deinit(&mut self);

    /// Cell size in pixels. `(0, 0)` before `init`.
    fn cell_size(&self) -> (u32, u32);

    /// Glyph for `id`, rasterizing on first use. `None` when the cell has
    /// nothing to draw.
    fn glyph(&mut self, id: CellId) -> Option<&Glyph>;

    /// Drop cached glyphs, keeping the font.
    fn flush(&mut self);
}

impl<G: GlyphCache + ?Sized> GlyphCache for Box<G> {
    fn init(&mut self, font: &FontDescriptor) -> Result<()> {
        (**self).init(font)
    }

    fn deinit(&mut self) {
        (**self).deinit();
    }

    fn cell_size(&self) -> (u32, u32) {
        (**self).cell_size()
    }

    fn glyph(&mut self, id: CellId) -> Option<&Glyph> {
        (**self).glyph(id)
    }

    fn flush(&mut self) {
        (**self).flush();
    }
}

/// Ink colour for a cell's brightness tier.
#[must_use]
pub const fn ink(attr: Attr) -> u32 {
    if attr.intersects(Attr::BRIGHT.with(Attr::BOLD)) {
        0x00FF_FFFF
    } else if attr.contains(Attr::DIM) {
        0x0055_5555
    } else {
        0x00AA_AAAA
    }
}

/// Glyph cache without a font: every printable cell is a solid block of ink
/// one pixel inside the cell, a space is an empty advance.
///
/// Used for headless runs and tests, where exact pixels matter more than
/// legibility.
#[derive(Debug, Default)]
pub struct BlockGlyphCache {
    cell: (u32, u32),
    font: Option<FontDescriptor>,
    glyphs: HashMap<CellId, Option<Glyph>>,
    rasterized: usize,
}

impl BlockGlyphCache {
    /// Cache producing `cell_width` by `cell_height` cells once initialized.
    #[must_use]
    pub fn new(cell_width: u32, cell_height: u32) -> Self {
        Self {
            cell: (cell_width, cell_height),
            ..Self::default()
        }
    }

    /// Font passed to the last `init`.
    #[must_use]
    pub fn font(&self) -> Option<&FontDescriptor> {
        self.font.as_ref()
    }

    /// Glyphs built since the cache was created.
    #[must_use]
    pub const fn rasterized(&self) -> usize {
        self.rasterized
    }

    /// Glyphs currently cached.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.glyphs.len()
    }

    fn build(cell: (u32, u32), id: CellId) -> Option<Glyph> {
        let ch = char::from_u32(id.codepoint())?;
        if ch == '\0' {
            return None;
        }
        let (w, h) = cell;
        if ch == ' ' || w < 3 || h < 3 {
            return Some(Glyph {
                width: w,
                ..Glyph::default()
            });
        }
        let (real_width, real_height) = (w - 2, h - 2);
        Some(Glyph {
            x_offset: 1,
            y_offset: 1,
            width: w,
            real_width,
            real_height,
            pixels: vec![ink(id.attr()); (real_width * real_height) as usize],
        })
    }
}

impl GlyphCache for BlockGlyphCache {
    fn init(&mut self, font: &FontDescriptor) -> Result<()> {
        self.font = Some(font.clone());
        self.glyphs.clear();
        Ok(())
    }

    fn deinit(&mut self) {
        self.font = None;
        self.glyphs.clear();
    }

    fn cell_size(&self) -> (u32, u32) {
        if self.font.is_some() {
            self.cell
        } else {
            (0, 0)
        }
    }

    fn glyph(&mut self, id: CellId) -> Option<&Glyph> {
        self.font.as_ref()?;
        let cell = self.cell;
        let rasterized = &mut self.rasterized;
        self.glyphs
            .entry(id)
            .or_insert_with(|| {
                *rasterized += 1;
                Self::build(cell, id)
            })
            .as_ref()
    }

    fn flush(&mut self) {
        self.glyphs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellscreen_core::Cell;

    fn ready() -> BlockGlyphCache {
        let mut cache = BlockGlyphCache::new(8, 16);
        cache.init(&FontDescriptor::default()).unwrap();
        cache
    }

    #[test]
    fn test_cell_size_requires_init() {
        let mut cache = BlockGlyphCache::new(8, 16);
        assert_eq!(cache.cell_size(), (0, 0));
        assert!(cache.glyph(Cell::new('A', Attr::NONE).id()).is_none());
        cache.init(&FontDescriptor::default()).unwrap();
        assert_eq!(cache.cell_size(), (8, 16));
    }

    #[test]
    fn test_block_glyph_shape() {
        let mut cache = ready();
        let glyph = cache.glyph(Cell::new('A', Attr::NONE).id()).unwrap();
        assert_eq!((glyph.x_offset, glyph.y_offset), (1, 1));
        assert_eq!((glyph.real_width, glyph.real_height), (6, 14));
        assert_eq!(glyph.width, 8);
        assert_eq!(glyph.pixel(0, 0), Some(0x00AA_AAAA));
        assert_eq!(glyph.pixel(6, 0), None);
    }

    #[test]
    fn test_space_has_advance_only() {
        let mut cache = ready();
        let glyph = cache.glyph(Cell::BLANK.id()).unwrap();
        assert_eq!(glyph.width, 8);
        assert!(glyph.pixels.is_empty());
    }

    #[test]
    fn test_unset_cell_has_no_glyph() {
        let mut cache = ready();
        assert!(cache.glyph(Cell::UNSET.id()).is_none());
    }

    #[test]
    fn test_ink_tiers() {
        assert_eq!(ink(Attr::BOLD), 0x00FF_FFFF);
        assert_eq!(ink(Attr::BRIGHT | Attr::DIM), 0x00FF_FFFF);
        assert_eq!(ink(Attr::DIM), 0x0055_5555);
        assert_eq!(ink(Attr::UNDERLINE), 0x00AA_AAAA);
    }

    #[test]
    fn test_cache_hits_and_flush() {
        let mut cache = ready();
        let id = Cell::new('x', Attr::BOLD).id();
        cache.glyph(id);
        cache.glyph(id);
        assert_eq!(cache.rasterized(), 1);
        assert_eq!(cache.cached(), 1);
        cache.flush();
        assert_eq!(cache.cached(), 0);
        cache.glyph(id);
        assert_eq!(cache.rasterized(), 2);
    }

    #[test]
    fn test_deinit_forgets_font() {
        let mut cache = ready();
        cache.deinit();
        assert!(cache.font().is_none());
        assert_eq!(cache.cell_size(), (0, 0));
    }
}
