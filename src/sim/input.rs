//! Keyboard input normalization
//!
//! Turns a raw key event into the canonical lowercase Latin key the descriptor
//! is written against. On non-Latin layouts (Greek, Cyrillic, ...) the produced
//! character is useless for matching, so the physical key position is used
//! instead: the key labelled `W` on a QWERTY board still counts as `w`.

use serde::{Deserialize, Serialize};

use crate::consts::NON_LATIN_CODE_POINT;

/// A key press as delivered by the host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawKey {
    /// Character (or key name) produced by the active layout, e.g. "w", "ω", "Enter"
    pub key: String,
    /// Physical key identifier, e.g. "KeyW", "Digit7", "Space"
    pub code: String,
}

impl RawKey {
    pub fn new(key: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            code: code.into(),
        }
    }
}

/// Whether the produced key starts outside the Latin range
fn is_non_latin(key: &str) -> bool {
    key.chars()
        .next()
        .is_some_and(|c| c as u32 >= NON_LATIN_CODE_POINT)
}

/// Single letter or digit named by a physical key identifier ("KeyW" / "Digit7")
fn physical_key(code: &str) -> Option<char> {
    let single = |rest: &str| {
        let mut chars = rest.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    };

    if let Some(letter) = code.strip_prefix("Key").and_then(single) {
        return letter.is_ascii_alphabetic().then_some(letter);
    }
    if let Some(digit) = code.strip_prefix("Digit").and_then(single) {
        return digit.is_ascii_digit().then_some(digit);
    }
    None
}

/// Normalize a raw key event into a lowercase candidate key
pub fn normalize_key(raw: &RawKey) -> String {
    if is_non_latin(&raw.key) {
        match physical_key(&raw.code) {
            Some(c) => return c.to_ascii_lowercase().to_string(),
            None => log::debug!(
                "Non-Latin key {:?} with unusable code {:?}, keeping produced key",
                raw.key,
                raw.code
            ),
        }
    }
    raw.key.to_lowercase()
}
