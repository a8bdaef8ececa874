//! Hex codepoint parsing, Big5 approximation and UTF-8 encoding for
//! internal-code (Intcode) entry.

use serde::{Deserialize, Serialize};

/// Longest hex string `convert` accepts.
pub const MAX_HEX_DIGITS: usize = 8;

/// How typed hex digits are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntcodeMode {
    /// Hex is a Unicode scalar value, e.g. "4E2D" for 中.
    #[default]
    Unicode,
    /// Hex is a Big5 code, e.g. "A4A4".
    Big5,
}

impl IntcodeMode {
    /// Number of digits after which input is converted automatically.
    pub fn max_digits(self) -> usize {
        match self {
            IntcodeMode::Unicode => 6,
            IntcodeMode::Big5 => 4,
        }
    }
}

/// Parse an ASCII hex string of 1..=8 digits.
pub fn parse_hex(hex: &str) -> Option<u32> {
    if hex.is_empty() || hex.len() > MAX_HEX_DIGITS {
        return None;
    }
    hex.chars().try_fold(0u32, |acc, c| {
        c.to_digit(16).map(|digit| (acc << 4) | digit)
    })
}

/// Map a Big5 code to a Unicode codepoint.
///
/// This is a linear approximation over the level-1 block only:
/// `0xA440..=0xC67E` maps to `0x4E00 + (code - 0xA440)`; every other code is
/// returned unchanged. It is not a real Big5 table.
pub fn big5_to_unicode(big5: u16) -> u32 {
    if (0xA440..=0xC67E).contains(&big5) {
        0x4E00 + u32::from(big5 - 0xA440)
    } else {
        u32::from(big5)
    }
}

/// Encode a codepoint as UTF-8.
///
/// Returns `None` for codepoints at or above 0x110000 and for surrogates,
/// which have no valid UTF-8 form.
pub fn encode_utf8(codepoint: u32) -> Option<String> {
    char::from_u32(codepoint).map(String::from)
}

/// Convert a typed hex string to committed text under `mode`.
///
/// Fails on empty input, a non-hex character, more than 8 digits, a zero
/// value, or a result that is not a Unicode scalar value. In Big5 mode the
/// parsed value is truncated to 16 bits before mapping.
pub fn convert(hex: &str, mode: IntcodeMode) -> Option<String> {
    let code = parse_hex(hex)?;
    if code == 0 {
        return None;
    }
    let unicode = match mode {
        IntcodeMode::Unicode => code,
        IntcodeMode::Big5 => big5_to_unicode(code as u16),
    };
    if unicode == 0 {
        return None;
    }
    encode_utf8(unicode)
}
