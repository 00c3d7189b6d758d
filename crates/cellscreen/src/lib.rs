//! cellscreen: a character grid and normalized keyboard input for text
//! editors, on a terminal or a pixel window.
#![allow(clippy::doc_markdown)]
//!
//! [`open_display`] picks the backend named by [`CellscreenConfig`]; both
//! backends implement the same [`Display`] contract and report keys in the
//! same signed key space.
//!
//! # Example
//!
//! ```ignore
//! use cellscreen::{open_display, CellscreenConfig, Display, Key};
//!
//! let config = CellscreenConfig::load_default()?;
//! let mut display = open_display(&config)?;
//! display.start()?;
//! display.write_char(0, 0, 'A');
//! display.sync()?;
//! if display.get_key(None)? == Key::RESIZE {
//!     // repaint everything at the new size
//! }
//! display.shutdown();
//! ```

pub mod telemetry;

pub use cellscreen_core::*;
pub use cellscreen_terminal as terminal;
pub use cellscreen_window as window;

use cellscreen_terminal::CrosstermDisplay;
use cellscreen_window::{MemorySettingsStore, SettingsStore, TomlSettingsStore};

/// Build the display `config` selects. The display is not started.
pub fn open_display(config: &CellscreenConfig) -> Result<Box<dyn Display>> {
    tracing::debug!(backend = ?config.backend, "opening display");
    match config.backend {
        BackendKind::Terminal => Ok(Box::new(CrosstermDisplay::stdout(config.terminal.clone()))),
        BackendKind::Window => open_window(&config.window),
    }
}

/// Where the window backend keeps its font and geometry.
pub fn settings_store(config: &WindowConfig) -> Box<dyn SettingsStore> {
    match &config.settings_file {
        Some(path) => Box::new(TomlSettingsStore::new(path.clone())),
        None => Box::new(MemorySettingsStore::new()),
    }
}

#[cfg(feature = "window")]
fn open_window(config: &WindowConfig) -> Result<Box<dyn Display>> {
    use cellscreen_window::{FontdueGlyphCache, WindowDisplay, WinitPlatform};

    let platform = WinitPlatform::new()?;
    Ok(Box::new(WindowDisplay::new(
        platform,
        FontdueGlyphCache::new(),
        settings_store(config),
        config.clone(),
    )))
}

#[cfg(not(feature = "window"))]
fn open_window(_config: &WindowConfig) -> Result<Box<dyn Display>> {
    Err(DisplayError::Startup(
        "window backend not built; enable the `window` feature".to_string(),
    ))
}
