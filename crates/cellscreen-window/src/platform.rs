//! The window system seam.

use std::time::Duration;

use cellscreen_core::Result;

use crate::canvas::Canvas;
use crate::geometry::{FontDescriptor, Rect, SizingEdge, WindowGeometry};

/// Windowed or covering the whole monitor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WindowMode {
    #[default]
    Windowed,
    Fullscreen,
}

impl WindowMode {
    /// The other mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Windowed => Self::Fullscreen,
            Self::Fullscreen => Self::Windowed,
        }
    }
}

/// Modifier keys held when an event was generated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
    };
    pub const CTRL: Self = Self {
        ctrl: true,
        shift: false,
    };
    pub const SHIFT: Self = Self {
        ctrl: false,
        shift: true,
    };
}

/// What the window system reports.
#[derive(Clone, Debug, PartialEq)]
pub enum PlatformEvent {
    /// The client area changed size (pixels). Also the first event after open.
    Size { width: u32, height: u32 },
    /// A region of the client area needs repainting.
    Paint(Rect),
    /// A key went down. `vk` uses virtual-key numbering.
    KeyDown { vk: u16, alt: bool },
    /// Text produced by a key that was passed through.
    Char(u32),
    FocusGained,
    FocusLost,
    /// A move or resize drag finished.
    ExitSizeMove,
    /// A resize drag is in progress with the frame at `rect`.
    Sizing { edge: SizingEdge, rect: Rect },
    /// The user picked a new font.
    FontChosen(FontDescriptor),
    /// The fullscreen command was chosen from the window menu.
    ToggleFullscreen,
    CloseRequested,
}

/// A window the display can paint into and read events from.
pub trait WindowPlatform {
    /// Create the window, replacing any existing one. `geometry` restores a
    /// windowed placement. The platform must report the client size with a
    /// `Size` event before any other event.
    fn open(&mut self, mode: WindowMode, geometry: Option<WindowGeometry>, title: &str)
        -> Result<()>;

    /// Destroy the window.
    fn close(&mut self);

    /// Client area in pixels, `None` without a window.
    fn client_size(&self) -> Option<(u32, u32)>;

    /// Usable monitor area in pixels.
    fn work_area(&self) -> (u32, u32);

    /// Outer placement of the window, `None` without a window.
    fn outer_geometry(&self) -> Option<WindowGeometry>;

    /// Modifier state sampled with the most recently returned event.
    fn modifiers(&self) -> Modifiers;

    /// Next event, waiting at most `timeout` (`None` waits for ever).
    /// `Ok(None)` when the wait ran out.
    fn next_event(&mut self, timeout: Option<Duration>) -> Result<Option<PlatformEvent>>;

    /// Replace the frame rectangle of an in-progress sizing drag.
    fn apply_sizing(&mut self, rect: Rect);

    /// Canvas for the client area.
    fn begin_paint(&mut self) -> &mut dyn Canvas;

    /// Present the painted `regions`.
    fn end_paint(&mut self, regions: &[Rect]) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_toggle() {
        assert_eq!(WindowMode::default(), WindowMode::Windowed);
        assert_eq!(WindowMode::Windowed.toggled(), WindowMode::Fullscreen);
        assert_eq!(WindowMode::Fullscreen.toggled(), WindowMode::Windowed);
    }
}
