//! Core types for cellscreen.
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::doc_markdown)]
//!
//! cellscreen lets an editor paint styled text into a character grid and read
//! normalized key events, whether the grid is a terminal or a pixel window.
//! This crate holds what both backends share:
//!
//! - [`Attr`], [`Cell`] and [`ScreenBuffer`] for the grid,
//! - [`Key`] and the key-name resolver for input,
//! - [`Session`] for per-display mutable state,
//! - [`Display`], the contract each backend implements,
//! - [`CellscreenConfig`] and [`DisplayError`].
//!
//! # Example
//!
//! ```ignore
//! use cellscreen_core::{Attr, Display, Key};
//!
//! fn paint(display: &mut dyn Display) -> cellscreen_core::Result<()> {
//!     display.set_attributes(Attr::ALL, Attr::BOLD);
//!     display.write_char(0, 0, 'A');
//!     display.sync()?;
//!     let key = display.get_key(None)?;
//!     println!("{}", display.key_name(key));
//!     Ok(())
//! }
//! ```

mod attr;
mod cell;
pub mod config;
pub mod deadline;
mod display;
mod error;
pub mod key;
pub mod keyname;
mod session;

pub use attr::Attr;
pub use cell::{Cell, CellId, ScreenBuffer};
pub use config::{BackendKind, CellscreenConfig, TerminalConfig, Toggle, WindowConfig};
pub use deadline::{Budget, Deadline};
pub use display::Display;
pub use error::{DisplayError, Result};
pub use key::{Key, KeyQueue};
pub use keyname::{key_name, key_name_with, KeyNamer};
pub use session::Session;
