//! Paints a damaged region of the client area from the front buffer.

use cellscreen_core::{Attr, ScreenBuffer};

use crate::canvas::Canvas;
use crate::geometry::Rect;
use crate::glyph::GlyphCache;

pub const CARET: u32 = 0x00FF_FFFF;
pub const UNDERLINE_BRIGHT: u32 = 0x00FF_FFFF;
pub const UNDERLINE_NORMAL: u32 = 0x0088_8888;
pub const UNDERLINE_DIM: u32 = 0x0055_5555;

/// Underline colour for a cell's brightness tier.
#[must_use]
pub const fn underline_color(attr: Attr) -> u32 {
    if attr.contains(Attr::BRIGHT) {
        UNDERLINE_BRIGHT
    } else if attr.contains(Attr::DIM) {
        UNDERLINE_DIM
    } else {
        UNDERLINE_NORMAL
    }
}

/// Everything the painter reads.
pub struct PaintContext<'a> {
    /// Presented cells; `None` before the first size notification.
    pub front: Option<&'a ScreenBuffer>,
    pub glyphs: &'a mut dyn GlyphCache,
    /// Caret cell.
    pub caret: (i32, i32),
}

/// Repaint `region`, drawing nothing outside it.
pub fn paint_region(canvas: &mut dyn Canvas, region: Rect, ctx: &mut PaintContext<'_>) {
    canvas.set_clip(Some(region));

    let (cw, ch) = ctx.glyphs.cell_size();
    let front = match ctx.front {
        Some(front) if cw > 0 && ch > 0 => front,
        _ => {
            canvas.fill_black(region);
            canvas.set_clip(None);
            return;
        }
    };
    let (cw, ch) = (cw as i32, ch as i32);
    let (sw, sh) = (i32::from(front.width()), i32::from(front.height()));

    // One extra column each side: glyphs may overhang their cell.
    let x1 = (region.left.div_euclid(cw) - 1).max(0);
    let y1 = region.top.div_euclid(ch).max(0);
    let mut x2 = region.right / cw + 1;
    if x2 >= sw {
        canvas.fill_black(Rect::new(sw * cw, 0, region.right, region.bottom));
        x2 = sw;
    }
    let mut y2 = region.bottom / ch;
    if y2 >= sh {
        canvas.fill_black(Rect::new(0, sh * ch, region.right, region.bottom));
        y2 = sh - 1;
    }

    for y in y1..=y2 {
        let sy = y * ch;
        canvas.fill_black(Rect::new(region.left, sy, region.right, sy + ch));

        for x in x1..x2 {
            let Some(cell) = front.get(x, y) else { continue };
            let sx = x * cw;
            if let Some(glyph) = ctx.glyphs.glyph(cell.id()) {
                canvas.blit_or(sx + glyph.x_offset, sy + glyph.y_offset, glyph);
                if cell.attr.contains(Attr::UNDERLINE) {
                    let width = glyph.width as i32;
                    canvas.hline(sx, sx + width, sy + ch - 1, underline_color(cell.attr));
                }
            }
        }

        for x in x1..x2 {
            let Some(cell) = front.get(x, y) else { continue };
            if !cell.attr.contains(Attr::REVERSE) {
                continue;
            }
            let sx = x * cw;
            let w = ctx
                .glyphs
                .glyph(cell.id())
                .map_or(cw, |glyph| glyph.width as i32);
            canvas.invert(Rect::new(sx, sy, sx + w, sy + ch));
        }
    }

    let cx = ctx.caret.0.saturating_mul(cw);
    let cy = ctx.caret.1.saturating_mul(ch);
    let (above, below) = (cy.saturating_sub(1), cy.saturating_add(ch));
    let (left, right) = (cx.saturating_sub(1), cx.saturating_add(1));
    canvas.vline(cx, cy, below, CARET);
    canvas.set_pixel(left, above, CARET);
    canvas.set_pixel(right, above, CARET);
    canvas.set_pixel(left, below, CARET);
    canvas.set_pixel(right, below, CARET);

    canvas.set_clip(None);
}
