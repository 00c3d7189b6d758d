//! Pixel-window backend for cellscreen.
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::match_same_arms)]
//!
//! Emulates a character grid on a framebuffer. The editor writes into a back
//! buffer; `sync` compares it with the front buffer row by row, copies the
//! rows that differ and repaints only their pixel rectangles. The caret is a
//! vertical line with serifs, kept out of the buffers and painted last.
//!
//! The engine is platform-neutral: a [`WindowPlatform`] supplies events and a
//! [`Canvas`], a [`GlyphCache`] turns cells into pixels, and a
//! [`SettingsStore`] remembers the font and window geometry. The
//! [`HeadlessPlatform`] drives the whole pipeline in memory; the `winit`
//! feature adds a real window.
//!
//! # Example
//!
//! ```ignore
//! use cellscreen_core::Display;
//! use cellscreen_window::HeadlessDisplay;
//!
//! let mut display = HeadlessDisplay::headless(640, 400, 8, 16);
//! display.start()?;
//! display.write_char(0, 0, 'A');
//! let repaint = display.sync_report()?;
//! assert_eq!(repaint.rows_changed(), 25);
//! ```

mod canvas;
mod display;
mod engine;
mod geometry;
mod glyph;
mod headless;
mod keys;
mod paint;
mod platform;
mod settings;

#[cfg(feature = "winit")]
mod raster;
#[cfg(feature = "winit")]
mod winit_platform;

pub use canvas::{Canvas, PixelCanvas};
pub use display::{HeadlessDisplay, WindowDisplay};
pub use engine::{border_rects, caret_box, row_rect, Frame, Repaint};
pub use geometry::{clamp_sizing, FontDescriptor, Rect, SizingEdge, WindowGeometry, MIN_WINDOW_EDGE};
pub use glyph::{ink, BlockGlyphCache, Glyph, GlyphCache};
pub use headless::HeadlessPlatform;
pub use keys::{char_input, ctrl_letter, key_down, KeyDown};
pub use paint::{paint_region, underline_color, PaintContext, CARET};
pub use platform::{Modifiers, PlatformEvent, WindowMode, WindowPlatform};
pub use settings::{MemorySettingsStore, SettingsStore, TomlSettingsStore, WindowSettings};

#[cfg(feature = "winit")]
pub use raster::FontdueGlyphCache;
#[cfg(feature = "winit")]
pub use winit_platform::WinitPlatform;
