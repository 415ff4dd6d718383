//! Canonical hotkey bindings.
//!
//! A binding is a set of lowercase key names joined with `+` in sorted
//! order, so `ctrl+alt+l` and `alt+ctrl+l` are the same binding.

use crate::{CoreResult, LockError};

use std::{collections::BTreeSet, fmt, panic::Location, str::FromStr};

use error_location::ErrorLocation;

/// Canonical modifier names.
pub const MODIFIERS: [&str; 4] = ["alt", "ctrl", "shift", "windows"];

/// Platform spellings of modifiers, mapped to their canonical name.
const MODIFIER_ALIASES: &[(&str, &str)] = &[
    ("ctrl", "ctrl"),
    ("control", "ctrl"),
    ("left ctrl", "ctrl"),
    ("right ctrl", "ctrl"),
    ("lctrl", "ctrl"),
    ("rctrl", "ctrl"),
    ("alt", "alt"),
    ("left alt", "alt"),
    ("right alt", "alt"),
    ("alt gr", "alt"),
    ("lalt", "alt"),
    ("ralt", "alt"),
    ("option", "alt"),
    ("shift", "shift"),
    ("left shift", "shift"),
    ("right shift", "shift"),
    ("lshift", "shift"),
    ("rshift", "shift"),
    ("windows", "windows"),
    ("left windows", "windows"),
    ("right windows", "windows"),
    ("win", "windows"),
    ("super", "windows"),
    ("meta", "windows"),
    ("cmd", "windows"),
    ("command", "windows"),
];

/// Lowercase a key name and fold left/right modifier variants together.
pub fn canonical_key_name(raw: &str) -> String {
    let name = raw.trim().to_lowercase();
    MODIFIER_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or(name)
}

/// Whether a canonical key name is a modifier.
pub fn is_modifier(name: &str) -> bool {
    MODIFIERS.contains(&name)
}

/// A canonical global hotkey binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HotkeyBinding {
    keys: BTreeSet<String>,
    canonical: String,
}

impl HotkeyBinding {
    /// Build a binding from key names. Returns `None` when no usable key is
    /// given, or when a name contains the `+` separator and could not be read
    /// back by [`HotkeyBinding::parse`].
    pub fn from_keys<I, S>(keys: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys: BTreeSet<String> = keys
            .into_iter()
            .map(|k| canonical_key_name(k.as_ref()))
            .filter(|k| !k.is_empty())
            .collect();

        if keys.is_empty() || keys.iter().any(|k| k.contains('+')) {
            return None;
        }

        let canonical = keys.iter().map(String::as_str).collect::<Vec<_>>().join("+");
        Some(Self { keys, canonical })
    }

    /// Parse a `+`-separated hotkey string such as `ctrl+alt+l`.
    #[track_caller]
    pub fn parse(input: &str) -> CoreResult<Self> {
        let parts: Vec<&str> = input.split('+').map(str::trim).collect();

        if parts.iter().any(|p| p.is_empty()) {
            return Err(LockError::InvalidBinding {
                input: input.to_string(),
                reason: "empty key name".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Self::from_keys(parts).ok_or_else(|| LockError::InvalidBinding {
            input: input.to_string(),
            reason: "no keys".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// The canonical `+`-joined form.
    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    /// All key names, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// Modifier names, in sorted order.
    pub fn modifiers(&self) -> impl Iterator<Item = &str> {
        self.keys().filter(|k| is_modifier(k))
    }

    /// Non-modifier key names, in sorted order.
    pub fn main_keys(&self) -> impl Iterator<Item = &str> {
        self.keys().filter(|k| !is_modifier(k))
    }
}

impl fmt::Display for HotkeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl FromStr for HotkeyBinding {
    type Err = LockError;

    #[track_caller]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
