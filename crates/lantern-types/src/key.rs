//! Host-agnostic key identifiers.
//!
//! The console never polls a platform input API directly; the host maps its
//! native keycodes onto this enum and answers `KeyInput` queries with it.
//! Key names parse case-insensitively so users can type `ctrl,t` or
//! `Ctrl,T` interchangeably in `bind` expressions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LanternError, Result};

/// A key that can participate in console bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    Up,
    Down,
    Left,
    Right,
    Space,
    Tab,
    Return,
    Escape,
    Backspace,
    LeftShift,
    RightShift,
    LeftControl,
    RightControl,
    LeftAlt,
    RightAlt,
}

/// Canonical name table. Parsing is case-insensitive; the first entry for a
/// key is its display name.
const NAMES: &[(&str, Key)] = &[
    ("a", Key::A),
    ("b", Key::B),
    ("c", Key::C),
    ("d", Key::D),
    ("e", Key::E),
    ("f", Key::F),
    ("g", Key::G),
    ("h", Key::H),
    ("i", Key::I),
    ("j", Key::J),
    ("k", Key::K),
    ("l", Key::L),
    ("m", Key::M),
    ("n", Key::N),
    ("o", Key::O),
    ("p", Key::P),
    ("q", Key::Q),
    ("r", Key::R),
    ("s", Key::S),
    ("t", Key::T),
    ("u", Key::U),
    ("v", Key::V),
    ("w", Key::W),
    ("x", Key::X),
    ("y", Key::Y),
    ("z", Key::Z),
    ("0", Key::Num0),
    ("1", Key::Num1),
    ("2", Key::Num2),
    ("3", Key::Num3),
    ("4", Key::Num4),
    ("5", Key::Num5),
    ("6", Key::Num6),
    ("7", Key::Num7),
    ("8", Key::Num8),
    ("9", Key::Num9),
    ("f1", Key::F1),
    ("f2", Key::F2),
    ("f3", Key::F3),
    ("f4", Key::F4),
    ("f5", Key::F5),
    ("f6", Key::F6),
    ("f7", Key::F7),
    ("f8", Key::F8),
    ("f9", Key::F9),
    ("f10", Key::F10),
    ("f11", Key::F11),
    ("f12", Key::F12),
    ("up", Key::Up),
    ("down", Key::Down),
    ("left", Key::Left),
    ("right", Key::Right),
    ("space", Key::Space),
    ("tab", Key::Tab),
    ("return", Key::Return),
    ("enter", Key::Return),
    ("escape", Key::Escape),
    ("backspace", Key::Backspace),
    ("leftshift", Key::LeftShift),
    ("shift", Key::LeftShift),
    ("rightshift", Key::RightShift),
    ("leftcontrol", Key::LeftControl),
    ("ctrl", Key::LeftControl),
    ("rightcontrol", Key::RightControl),
    ("leftalt", Key::LeftAlt),
    ("alt", Key::LeftAlt),
    ("rightalt", Key::RightAlt),
];

impl FromStr for Key {
    type Err = LanternError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        NAMES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(trimmed))
            .map(|(_, key)| *key)
            .ok_or_else(|| LanternError::Binding(format!("unknown key: {trimmed}")))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = NAMES
            .iter()
            .find(|(_, key)| key == self)
            .map(|(name, _)| *name)
            .unwrap_or("?");
        write!(f, "{name}")
    }
}

impl Key {
    /// Parse a comma-separated key list, e.g. `"ctrl,t"` or `"A,B"`.
    /// Empty entries are discarded; an empty result is an error.
    pub fn parse_list(s: &str) -> Result<Vec<Key>> {
        let mut keys = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            keys.push(part.parse()?);
        }
        if keys.is_empty() {
            return Err(LanternError::Binding(format!("no keys in '{s}'")));
        }
        Ok(keys)
    }
}
