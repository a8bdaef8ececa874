//! Smart punctuation: ASCII punctuation to full-width CJK forms.

use serde::{Deserialize, Serialize};

/// Full-width form for a non-quote ASCII punctuation character.
fn full_width(ascii: char) -> Option<&'static str> {
    let converted = match ascii {
        ',' => "，",
        '.' => "。",
        '?' => "？",
        '!' => "！",
        ':' => "：",
        ';' => "；",
        '(' => "（",
        ')' => "）",
        '[' => "「",
        ']' => "」",
        '{' => "『",
        '}' => "』",
        '<' => "《",
        '>' => "》",
        '~' => "～",
        '@' => "＠",
        '#' => "＃",
        '$' => "￥",
        '%' => "％",
        '^' => "……",
        '&' => "＆",
        '*' => "×",
        '-' => "—",
        '_' => "——",
        '+' => "＋",
        '=' => "＝",
        '/' => "、",
        '\\' => "＼",
        '|' => "｜",
        _ => return None,
    };
    Some(converted)
}

/// Punctuation converter with open/close state for paired quotes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Punctuator {
    double_quote_open: bool,
    single_quote_open: bool,
}

impl Punctuator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert one ASCII character.
    ///
    /// Returns `None` when `enabled` is false or the character has no
    /// full-width form. Quotes alternate between opening and closing forms.
    pub fn convert(&mut self, ascii: char, enabled: bool) -> Option<&'static str> {
        if !enabled {
            return None;
        }
        match ascii {
            '"' => Some(toggle(&mut self.double_quote_open, "“", "”")),
            '\'' => Some(toggle(&mut self.single_quote_open, "‘", "’")),
            _ => full_width(ascii),
        }
    }

    /// Forget any open quotes.
    pub fn reset(&mut self) {
        self.double_quote_open = false;
        self.single_quote_open = false;
    }
}

fn toggle(open: &mut bool, opening: &'static str, closing: &'static str) -> &'static str {
    let out = if *open { closing } else { opening };
    *open = !*open;
    out
}
