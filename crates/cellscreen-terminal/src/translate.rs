//! Abstract attributes to crossterm attributes.

use cellscreen_core::Attr;
use crossterm::style::{Attribute, Attributes};

use crate::capability::Capabilities;

/// Maps an [`Attr`] mask to the terminal's native attributes.
///
/// Evaluated once per attribute-register change; the result is stored with
/// each cell written afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttrTranslator {
    italic: bool,
}

impl AttrTranslator {
    /// Translator for the given capabilities.
    #[must_use]
    pub const fn new(caps: Capabilities) -> Self {
        Self {
            italic: caps.italic,
        }
    }

    /// Whether italic is rendered natively (otherwise it becomes bold).
    #[must_use]
    pub const fn italic(&self) -> bool {
        self.italic
    }

    /// Native attributes for `attr`.
    #[must_use]
    pub fn translate(&self, attr: Attr) -> Attributes {
        let mut out = Attributes::default();

        if attr.contains(Attr::ITALIC) {
            if self.italic {
                out.set(Attribute::Italic);
            } else {
                out.set(Attribute::Bold);
            }
        }
        if attr.intersects(Attr::BOLD | Attr::BRIGHT) {
            out.set(Attribute::Bold);
        }
        if attr.contains(Attr::DIM) {
            out.set(Attribute::Dim);
        }
        if attr.contains(Attr::UNDERLINE) {
            out.set(Attribute::Underlined);
        }
        if attr.contains(Attr::REVERSE) {
            out.set(Attribute::Reverse);
        }

        out
    }
}
