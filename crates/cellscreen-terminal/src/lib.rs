//! Terminal backend for cellscreen.
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::match_same_arms)] // "match arms have identical bodies" (intentional for readability)
#![allow(clippy::new_without_default)]
//!
//! Drives a terminal through `crossterm`: raw mode and the alternate screen
//! on start, a dirty-tracked cell buffer flushed by a differential renderer
//! on sync, and crossterm events decoded into the cellscreen key space.
//!
//! # Example
//!
//! ```ignore
//! use cellscreen_core::{Display, TerminalConfig};
//! use cellscreen_terminal::CrosstermDisplay;
//!
//! let mut display = CrosstermDisplay::stdout(TerminalConfig::default());
//! display.start()?;
//! display.write_char(0, 0, 'A');
//! display.sync()?;
//! let key = display.get_key(None)?;
//! display.shutdown();
//! ```

mod backend;
mod capability;
pub mod direct;
mod display;
mod input;
mod translate;

pub use backend::{CrosstermBackend, TerminalBackend, TestableBackend};
pub use capability::Capabilities;
pub use display::{CrosstermDisplay, TerminalDisplay};
pub use input::{ExtendedKeys, InputDecoder};
pub use translate::AttrTranslator;

// Re-export crossterm event types used by `TestableBackend` scripts.
pub use crossterm::event::{
    Event as TerminalEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
