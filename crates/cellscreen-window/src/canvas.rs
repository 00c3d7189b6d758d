//! Drawing surface for the row painter.

use crate::geometry::Rect;
use crate::glyph::Glyph;

/// The handful of raster operations the painter needs.
///
/// Every operation is clipped to the canvas bounds and to the clip
/// rectangle, if one is set.
pub trait Canvas {
    /// Size in pixels.
    fn size(&self) -> (u32, u32);

    /// Restrict drawing to `clip`; `None` lifts the restriction.
    fn set_clip(&mut self, clip: Option<Rect>);

    /// Fill `rect` with black.
    fn fill_black(&mut self, rect: Rect);

    /// OR the glyph bitmap onto the canvas with its top-left at `(x, y)`.
    fn blit_or(&mut self, x: i32, y: i32, glyph: &Glyph);

    /// Horizontal line over `x1..x2` on row `y`.
    fn hline(&mut self, x1: i32, x2: i32, y: i32, color: u32);

    /// Vertical line over `y1..y2` in column `x`.
    fn vline(&mut self, x: i32, y1: i32, y2: i32, color: u32);

    fn set_pixel(&mut self, x: i32, y: i32, color: u32);

    /// Invert every colour channel inside `rect`.
    fn invert(&mut self, rect: Rect);
}

/// In-memory `0x00RRGGBB` framebuffer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PixelCanvas {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
    clip: Option<Rect>,
}

impl PixelCanvas {
    /// Black canvas of the given size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width as usize) * (height as usize)],
            clip: None,
        }
    }

    /// Reallocate to a new size. Contents are cleared to black.
    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    /// Pixel at `(x, y)`.
    #[must_use]
    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// All pixels, row-major.
    #[must_use]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Number of pixels inside `rect` that are not black.
    #[must_use]
    pub fn lit_in(&self, rect: Rect) -> usize {
        let r = rect.intersect(&self.bounds());
        (r.top..r.bottom)
            .flat_map(|y| (r.left..r.right).map(move |x| (x, y)))
            .filter(|&(x, y)| self.pixel(x, y).is_some_and(|p| p != 0))
            .count()
    }

    fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    fn drawable(&self) -> Rect {
        match self.clip {
            Some(clip) => clip.intersect(&self.bounds()),
            None => self.bounds(),
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.bounds().contains(x, y) {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    fn apply(&mut self, rect: Rect, mut f: impl FnMut(u32) -> u32) {
        let r = rect.intersect(&self.drawable());
        if r.is_empty() {
            return;
        }
        let stride = self.width as usize;
        for y in r.top..r.bottom {
            let row = y as usize * stride;
            for px in &mut self.pixels[row + r.left as usize..row + r.right as usize] {
                *px = f(*px);
            }
        }
    }
}

impl Canvas for PixelCanvas {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_clip(&mut self, clip: Option<Rect>) {
        self.clip = clip;
    }

    fn fill_black(&mut self, rect: Rect) {
        self.apply(rect, |_| 0);
    }

    fn blit_or(&mut self, x: i32, y: i32, glyph: &Glyph) {
        let area = Rect::new(
            x,
            y,
            x + glyph.real_width as i32,
            y + glyph.real_height as i32,
        )
        .intersect(&self.drawable());
        for py in area.top..area.bottom {
            for px in area.left..area.right {
                let ink = glyph
                    .pixel((px - x) as u32, (py - y) as u32)
                    .unwrap_or_default();
                if let Some(i) = self.index(px, py) {
                    self.pixels[i] |= ink;
                }
            }
        }
    }

    fn hline(&mut self, x1: i32, x2: i32, y: i32, color: u32) {
        self.apply(Rect::new(x1, y, x2, y.saturating_add(1)), |_| color);
    }

    fn vline(&mut self, x: i32, y1: i32, y2: i32, color: u32) {
        self.apply(Rect::new(x, y1, x.saturating_add(1), y2), |_| color);
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        let (right, bottom) = (x.saturating_add(1), y.saturating_add(1));
        self.apply(Rect::new(x, y, right, bottom), |_| color);
    }

    fn invert(&mut self, rect: Rect) {
        self.apply(rect, |p| !p & 0x00FF_FFFF);
    }
}
