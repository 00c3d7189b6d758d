//! Abstract cell attributes.
//!
//! One bit per visual trait. Backends translate the mask into whatever
//! rendering primitives they have (see the terminal attribute translator and
//! the window row painter).

use std::fmt;

/// Attribute bitmask for a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Attr(u8);

impl Attr {
    /// No attributes.
    pub const NONE: Self = Self(0);
    /// Bold text.
    pub const BOLD: Self = Self(1 << 0);
    /// Bright text (rendered like bold on terminals).
    pub const BRIGHT: Self = Self(1 << 1);
    /// Dim/faint text.
    pub const DIM: Self = Self(1 << 2);
    /// Underlined text.
    pub const UNDERLINE: Self = Self(1 << 3);
    /// Reverse video.
    pub const REVERSE: Self = Self(1 << 4);
    /// Italic text (falls back to bold where unsupported).
    pub const ITALIC: Self = Self(1 << 5);
    /// Every attribute bit.
    pub const ALL: Self = Self(0b0011_1111);

    /// Create empty attributes.
    #[must_use]
    pub const fn empty() -> Self {
        Self::NONE
    }

    /// Check if no attribute is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Check if every bit of `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check if any bit of `other` is set.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// Add attributes.
    #[must_use]
    pub const fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Remove attributes.
    #[must_use]
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Apply an and/or mask pair: `(self & and) | or`.
    #[must_use]
    pub const fn masked(self, and: Self, or: Self) -> Self {
        Self((self.0 & and.0) | or.0)
    }

    /// Get raw bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Create from raw bits, dropping unknown bits.
    #[must_use]
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }
}

impl std::ops::BitOr for Attr {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for Attr {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::ops::BitAnd for Attr {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

impl std::ops::BitAndAssign for Attr {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl std::ops::Not for Attr {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self(!self.0 & Self::ALL.0)
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(Attr, &str); 6] = [
            (Attr::BOLD, "bold"),
            (Attr::BRIGHT, "bright"),
            (Attr::DIM, "dim"),
            (Attr::UNDERLINE, "underline"),
            (Attr::REVERSE, "reverse"),
            (Attr::ITALIC, "italic"),
        ];

        if self.is_empty() {
            return f.write_str("none");
        }
        let mut first = true;
        for (attr, name) in NAMES {
            if self.contains(attr) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}
