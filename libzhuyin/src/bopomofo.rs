//! Bopomofo display strings for syllable slots.

use crate::phokey::PhoneticSlots;

const INITIALS: [&str; 25] = [
    "", "ㄅ", "ㄆ", "ㄇ", "ㄈ", "ㄉ", "ㄊ", "ㄋ", "ㄌ", "ㄍ", "ㄎ", "ㄏ", "ㄐ", "ㄑ", "ㄒ", "ㄓ",
    "ㄔ", "ㄕ", "ㄖ", "ㄗ", "ㄘ", "ㄙ", "[", "]", "`",
];

const MEDIALS: [&str; 4] = ["", "ㄧ", "ㄨ", "ㄩ"];

const FINALS: [&str; 14] = [
    "", "ㄚ", "ㄛ", "ㄜ", "ㄝ", "ㄞ", "ㄟ", "ㄠ", "ㄡ", "ㄢ", "ㄣ", "ㄤ", "ㄥ", "ㄦ",
];

// Tone 1 has no mark.
const TONES: [&str; 6] = ["", "", "ˊ", "ˇ", "ˋ", "˙"];

fn symbol(table: &'static [&'static str], value: u8) -> &'static str {
    table.get(usize::from(value)).copied().unwrap_or("")
}

/// Render slots as Bopomofo. Out-of-range values render as nothing.
pub fn render(slots: &PhoneticSlots) -> String {
    let mut out = String::new();
    out.push_str(symbol(&INITIALS, slots.initial()));
    out.push_str(symbol(&MEDIALS, slots.medial()));
    out.push_str(symbol(&FINALS, slots.final_()));
    out.push_str(symbol(&TONES, slots.tone()));
    out
}

/// Parse a Bopomofo syllable such as `"ㄉㄜ˙"` back into slots.
///
/// Components must appear in initial, medial, final, tone order, each at
/// most once. A syllable without a tone mark is tone 1.
pub fn parse_bopomofo(text: &str) -> Option<PhoneticSlots> {
    let mut rest = text.trim();
    if rest.is_empty() {
        return None;
    }

    let tables: [(&[&str], usize); 4] = [(&INITIALS, 0), (&MEDIALS, 1), (&FINALS, 2), (&TONES, 3)];
    let mut values = [0u8; 4];
    for (table, idx) in tables {
        if let Some((value, len)) = table
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, sym)| !sym.is_empty() && rest.starts_with(**sym))
            .map(|(value, sym)| (value, sym.len()))
        {
            values[idx] = value as u8;
            rest = &rest[len..];
        }
    }
    if !rest.is_empty() || values[..3].iter().all(|&v| v == 0) {
        return None;
    }
    if values[3] == 0 {
        values[3] = 1;
    }

    Some(PhoneticSlots::new(values[0], values[1], values[2], values[3]))
}
