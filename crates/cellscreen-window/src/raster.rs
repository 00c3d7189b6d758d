//! fontdue-backed glyph cache.

use std::collections::HashMap;

use cellscreen_core::{CellId, DisplayError, Result};
use fontdue::{Font, FontSettings};
use tracing::debug;

use crate::geometry::FontDescriptor;
use crate::glyph::{ink, Glyph, GlyphCache};

/// Rasterizes cells from a monospace font file.
#[derive(Default)]
pub struct FontdueGlyphCache {
    font: Option<Font>,
    px: f32,
    cell: (u32, u32),
    ascent: i32,
    glyphs: HashMap<CellId, Option<Glyph>>,
}

impl FontdueGlyphCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn rasterize(font: &Font, px: f32, ascent: i32, cell_width: u32, id: CellId) -> Option<Glyph> {
        let ch = char::from_u32(id.codepoint())?;
        if ch == '\0' {
            return None;
        }
        let (metrics, coverage) = font.rasterize(ch, px);
        let tier = ink(id.attr()) & 0xFF;
        let pixels = coverage
            .iter()
            .map(|&a| {
                let c = tier * u32::from(a) / 255;
                (c << 16) | (c << 8) | c
            })
            .collect();
        Some(Glyph {
            x_offset: metrics.xmin,
            y_offset: ascent - (metrics.ymin + metrics.height as i32),
            width: cell_width,
            real_width: metrics.width as u32,
            real_height: metrics.height as u32,
            pixels,
        })
    }
}

impl GlyphCache for FontdueGlyphCache {
    fn init(&mut self, font: &FontDescriptor) -> Result<()> {
        let path = font
            .path
            .as_ref()
            .ok_or_else(|| DisplayError::Startup("no font file configured".to_string()))?;
        let bytes = std::fs::read(path)
            .map_err(|e| DisplayError::Startup(format!("{}: {e}", path.display())))?;
        let loaded = Font::from_bytes(bytes, FontSettings::default())
            .map_err(|e| DisplayError::Startup(format!("{}: {e}", path.display())))?;

        let px = font.size;
        let advance = loaded.metrics('M', px).advance_width.ceil();
        let (ascent, height) = loaded.horizontal_line_metrics(px).map_or(
            (px.ceil(), (px * 1.4).ceil()),
            |m| (m.ascent.ceil(), m.new_line_size.ceil()),
        );

        self.cell = (advance.max(1.0) as u32, height.max(1.0) as u32);
        self.ascent = ascent as i32;
        self.px = px;
        self.font = Some(loaded);
        self.glyphs.clear();
        debug!(family = %font.family, px, cell = ?self.cell, "font loaded");
        Ok(())
    }

    fn deinit(&mut self) {
        self.font = None;
        self.cell = (0, 0);
        self.glyphs.clear();
    }

    fn cell_size(&self) -> (u32, u32) {
        self.cell
    }

    fn glyph(&mut self, id: CellId) -> Option<&Glyph> {
        let font = self.font.as_ref()?;
        let (px, ascent, cell_width) = (self.px, self.ascent, self.cell.0);
        self.glyphs
            .entry(id)
            .or_insert_with(|| Self::rasterize(font, px, ascent, cell_width, id))
            .as_ref()
    }

    fn flush(&mut self) {
        self.glyphs.clear();
    }
}
