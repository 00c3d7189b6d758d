//! Direct terminal rendering.
//!
//! # Architecture
//!
//! ```text
//! TerminalDisplay → CellBuffer (dirty bits) → DiffRenderer → crossterm
//! ```
//!
//! Only dirty cells are emitted, batched into a single write per sync.

mod cell_buffer;
mod diff_renderer;

pub use cell_buffer::{CellBuffer, TermCell};
pub use diff_renderer::DiffRenderer;
