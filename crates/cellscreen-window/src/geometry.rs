//! Pixel rectangles and the records the settings store persists.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Smallest window edge, in pixels, a sizing drag may produce.
pub const MIN_WINDOW_EDGE: i32 = 100;

/// Half-open pixel rectangle: `left..right` by `top..bottom`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    /// Create a rectangle from its edges.
    #[must_use]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rectangle at the origin with the given size.
    #[must_use]
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width as i32, height as i32)
    }

    #[must_use]
    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    #[must_use]
    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// True when the rectangle covers no pixels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    /// Overlap of two rectangles (possibly empty).
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        Self::new(
            self.left.max(other.left),
            self.top.max(other.top),
            self.right.min(other.right),
            self.bottom.min(other.bottom),
        )
    }

    #[must_use]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }
}

/// Which edge or corner of the window frame is being dragged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizingEdge {
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Clamp a sizing rectangle to the minimum window size, keeping the edge
/// opposite the dragged one fixed.
#[must_use]
pub fn clamp_sizing(edge: SizingEdge, rect: Rect) -> Rect {
    let w = rect.width().max(MIN_WINDOW_EDGE);
    let h = rect.height().max(MIN_WINDOW_EDGE);
    let mut r = rect;

    match edge {
        SizingEdge::Left | SizingEdge::TopLeft | SizingEdge::BottomLeft => r.left = r.right - w,
        SizingEdge::Right | SizingEdge::TopRight | SizingEdge::BottomRight => {
            r.right = r.left + w;
        }
        SizingEdge::Top | SizingEdge::Bottom => {}
    }

    match edge {
        SizingEdge::Top | SizingEdge::TopLeft | SizingEdge::TopRight => r.top = r.bottom - h,
        SizingEdge::Bottom | SizingEdge::BottomLeft | SizingEdge::BottomRight => {
            r.bottom = r.top + h;
        }
        SizingEdge::Left | SizingEdge::Right => {}
    }

    r
}

/// Outer window placement, restored when the window is reopened.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// The font the glyph cache rasterizes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontDescriptor {
    /// Family name, informational for file-backed fonts.
    pub family: String,
    /// Size in pixels.
    pub size: f32,
    /// Font file, when the cache loads from disk.
    pub path: Option<PathBuf>,
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self {
            family: "monospace".to_string(),
            size: 16.0,
            path: None,
        }
    }
}
