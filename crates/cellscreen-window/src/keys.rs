//! Window key normalization.
//!
//! The window system reports a key-down (virtual-key code) and, for keys it
//! translates to text, a separate character event. Symbolic keys are decided
//! at key-down; text keys are passed through and arrive as characters.

use cellscreen_core::key::{CTRL, ESCAPE, NUMLOCK, SHIFT};
use cellscreen_core::{Key, KeyQueue};
use tracing::trace;

use crate::platform::Modifiers;

pub const VK_RETURN: u16 = 0x0D;
pub const VK_SHIFT: u16 = 0x10;
pub const VK_CONTROL: u16 = 0x11;
pub const VK_MENU: u16 = 0x12;
pub const VK_PAUSE: u16 = 0x13;
pub const VK_CAPITAL: u16 = 0x14;
pub const VK_SPACE: u16 = 0x20;
pub const VK_SNAPSHOT: u16 = 0x2C;
pub const VK_LWIN: u16 = 0x5B;
pub const VK_RWIN: u16 = 0x5C;
pub const VK_NUMPAD0: u16 = 0x60;
pub const VK_DIVIDE: u16 = 0x6F;

/// What a key-down did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyDown {
    /// Alt+Return: the display switches between windowed and fullscreen.
    ToggleFullscreen,
    /// Left for the window system to translate into a character.
    PassThrough,
    /// Keys were queued; the character the window system may derive from
    /// this key-down must be dropped.
    Queued,
}

/// Classify a key-down and queue the keys it stands for.
pub fn key_down(vk: u16, alt: bool, mods: Modifiers, queue: &mut KeyQueue) -> KeyDown {
    if vk == VK_RETURN && alt {
        return KeyDown::ToggleFullscreen;
    }

    if matches!(
        vk,
        VK_SHIFT | VK_CONTROL | VK_CAPITAL | VK_MENU | VK_LWIN | VK_RWIN | VK_SNAPSHOT | VK_PAUSE
    ) || i32::from(vk) > NUMLOCK
        || (VK_NUMPAD0..=VK_DIVIDE).contains(&vk)
    {
        return KeyDown::PassThrough;
    }

    if let Some(ch) = text_key(vk) {
        if !alt {
            return KeyDown::PassThrough;
        }
        let ch = if mods.shift { ch } else { ch.to_ascii_lowercase() };
        trace!(vk, ?ch, "alt synthesis");
        queue.push(Key::symbolic(ESCAPE, 0));
        queue.push(Key::char(ch));
        return KeyDown::Queued;
    }

    let mut code = i32::from(vk);
    if mods.ctrl {
        code |= CTRL;
    }
    if mods.shift {
        code |= SHIFT;
    }
    let key = Key(-code);
    trace!(vk, ?key, "symbolic key");
    queue.push(key);
    KeyDown::Queued
}

/// A character from the window system's text translation.
///
/// Control bytes `1..=31` become `CTRL_ASCII` keys. A NUL character is
/// queued as the literal key 0; only Ctrl+Space maps to `CTRL_ASCII | 0`.
pub fn char_input(code: u32, mods: Modifiers, queue: &mut KeyQueue) {
    let key = match code {
        1..=31 => Key::ctrl_ascii(code as u8),
        0x20 if mods.ctrl => Key::ctrl_ascii(0),
        _ => match char::from_u32(code) {
            Some(ch) => Key::char(ch),
            None => return,
        },
    };
    queue.push(key);
}

/// Space, digit or letter key: these produce text.
fn text_key(vk: u16) -> Option<char> {
    let byte = u8::try_from(vk).ok()?;
    (vk == VK_SPACE || byte.is_ascii_digit() || byte.is_ascii_uppercase()).then_some(char::from(byte))
}

/// The `CTRL_ASCII` form of Ctrl+`letter`, as the character event reports it.
#[must_use]
pub fn ctrl_letter(letter: char) -> Option<u32> {
    letter
        .is_ascii_alphabetic()
        .then(|| u32::from(letter.to_ascii_uppercase()) & 0x1F)
}
