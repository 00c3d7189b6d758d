//! Key-name resolution.
//!
//! Maps a normalized [`Key`] back to a stable symbolic name such as
//! `KEY_LEFT`, `KEY_^A` or `KEY_S^RIGHT`. Names are used in keymap
//! configuration and help screens, so resolution never fails: anything
//! unmapped degrades to `KEY_UNKNOWN_<code> (<raw name or ???>)`.

use crate::key::{
    Key, BACKSPACE, CODE_MASK, CTRL, CTRL_ASCII, DELETE, DOWN, END, ESCAPE, F1, F24, HOME, INSERT,
    LEFT, NUMLOCK, PGDN, PGUP, RETURN, RIGHT, SHIFT, TAB, UP,
};

/// Backend introspection for keys outside the fixed tables.
///
/// The terminal backend implements this for its extended-key registry and
/// reports names such as `kb2` or `kf30`. Names in [`terminfo_alias`]'s
/// table (`kUP5` and friends) are only seen from namers that surface raw
/// terminfo capabilities; the crossterm decoder reports modified navigation
/// keys as symbolic keys instead.
pub trait KeyNamer {
    /// Raw backend name for `key`, if the backend knows one.
    fn raw_key_name(&self, key: Key) -> Option<&str>;
}

/// Namer that knows nothing. Used when a backend has no extended keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNames;

impl KeyNamer for NoNames {
    fn raw_key_name(&self, _key: Key) -> Option<&str> {
        None
    }
}

const PSEUDO_NAMES: [(Key, &str); 3] = [
    (Key::RESIZE, "KEY_RESIZE"),
    (Key::TIMEOUT, "KEY_TIMEOUT"),
    (Key::REDRAW, "KEY_REDRAW"),
];

const NAMED_KEYS: [(i32, &str); 15] = [
    (DOWN, "DOWN"),
    (UP, "UP"),
    (LEFT, "LEFT"),
    (RIGHT, "RIGHT"),
    (HOME, "HOME"),
    (END, "END"),
    (BACKSPACE, "BACKSPACE"),
    (DELETE, "DELETE"),
    (INSERT, "INSERT"),
    (PGDN, "PGDN"),
    (PGUP, "PGUP"),
    (TAB, "TAB"),
    (RETURN, "RETURN"),
    (ESCAPE, "ESCAPE"),
    (NUMLOCK, "NUMLOCK"),
];

/// Terminfo names for Ctrl (level 5) and Ctrl+Shift (level 6) navigation keys.
const TERMINFO_ALIASES: [(&str, &str); 20] = [
    ("kUP5", "KEY_^UP"),
    ("kUP6", "KEY_S^UP"),
    ("kDN5", "KEY_^DOWN"),
    ("kDN6", "KEY_S^DOWN"),
    ("kLFT5", "KEY_^LEFT"),
    ("kLFT6", "KEY_S^LEFT"),
    ("kRIT5", "KEY_^RIGHT"),
    ("kRIT6", "KEY_S^RIGHT"),
    ("kPRV5", "KEY_^PGUP"),
    ("kPRV6", "KEY_S^PGUP"),
    ("kNXT5", "KEY_^PGDN"),
    ("kNXT6", "KEY_S^PGDN"),
    ("kHOM5", "KEY_^HOME"),
    ("kHOM6", "KEY_S^HOME"),
    ("kEND5", "KEY_^END"),
    ("kEND6", "KEY_S^END"),
    ("kIC5", "KEY_^INSERT"),
    ("kIC6", "KEY_S^INSERT"),
    ("kDC5", "KEY_^DELETE"),
    ("kDC6", "KEY_S^DELETE"),
];

/// Look up the canonical name for a terminfo capability name.
#[must_use]
pub fn terminfo_alias(raw: &str) -> Option<&'static str> {
    TERMINFO_ALIASES
        .iter()
        .find(|(name, _)| *name == raw)
        .map(|(_, alias)| *alias)
}

/// Resolve a key name without backend introspection.
#[must_use]
pub fn key_name(key: Key) -> String {
    key_name_with(key, &NoNames)
}

/// Resolve a key name, asking `namer` about keys outside the fixed tables.
pub fn key_name_with(key: Key, namer: &dyn KeyNamer) -> String {
    if let Some(ch) = key.as_char() {
        return ch.to_string();
    }

    if let Some((_, name)) = PSEUDO_NAMES.iter().find(|(k, _)| *k == key) {
        return (*name).to_string();
    }

    if let Some(bits) = key.symbol() {
        if let Some(name) = symbolic_name(bits) {
            return name;
        }
    }

    // Raw terminfo names from custom namers.
    let raw = namer.raw_key_name(key);
    if let Some(alias) = raw.and_then(terminfo_alias) {
        return alias.to_string();
    }

    // Printable range but not a scalar value (surrogates, > U+10FFFF).
    let code = if key.value() < 0 {
        i64::from(key.value()).abs()
    } else {
        i64::from(key.value())
    };
    format!("KEY_UNKNOWN_{code} ({})", raw.unwrap_or("???"))
}

fn symbolic_name(bits: i32) -> Option<String> {
    let code = bits & CODE_MASK;
    let shift = if bits & SHIFT != 0 { "S" } else { "" };
    let ctrl = if bits & CTRL != 0 { "^" } else { "" };

    if bits & CTRL_ASCII != 0 {
        let letter = char::from_u32((code + 64) as u32)?;
        return Some(format!("KEY_{shift}^{letter}"));
    }

    if let Some((_, name)) = NAMED_KEYS.iter().find(|(c, _)| *c == code) {
        return Some(format!("KEY_{shift}{ctrl}{name}"));
    }

    if (F1..=F24).contains(&code) {
        let n = code - F1 + 1;
        return Some(format!("KEY_{shift}{ctrl}F{n}"));
    }

    None
}
