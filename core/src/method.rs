//! Input method kinds and their display names.

use serde::{Deserialize, Serialize};

/// Input method kinds, in registry order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InputMethod {
    /// Zhuyin / Bopomofo, one syllable at a time
    #[default]
    Phonetic,
    /// Phrase composition on top of the phonetic editor
    Phrase,
    /// Generic table (Cangjie, Boshiamy, ...)
    Table,
    /// Japanese, not bundled
    Anthy,
    /// Chewing, not bundled
    Chewing,
    /// Codepoint entry (Unicode / Big5 hex)
    Intcode,
}

impl InputMethod {
    pub const ALL: [InputMethod; 6] = [
        InputMethod::Phonetic,
        InputMethod::Phrase,
        InputMethod::Table,
        InputMethod::Anthy,
        InputMethod::Chewing,
        InputMethod::Intcode,
    ];

    /// Number of built-in methods; table search results are offset by this.
    pub const COUNT: usize = Self::ALL.len();

    pub fn name(self) -> &'static str {
        match self {
            InputMethod::Phonetic => "注音 (Phonetic)",
            InputMethod::Phrase => "詞音 (Phrase)",
            InputMethod::Table => "倉頡 (Table)",
            InputMethod::Anthy => "日文 (Anthy)",
            InputMethod::Chewing => "新酷音 (Chewing)",
            InputMethod::Intcode => "內碼 (Intcode)",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Whether the method can run. Phonetic needs a loaded dictionary;
    /// Anthy and Chewing are never bundled.
    pub fn is_available(self, has_pho_dictionary: bool) -> bool {
        match self {
            InputMethod::Phonetic => has_pho_dictionary,
            InputMethod::Phrase | InputMethod::Table | InputMethod::Intcode => true,
            InputMethod::Anthy | InputMethod::Chewing => false,
        }
    }

    /// Methods backed by an engine outside this library.
    pub fn is_external(self) -> bool {
        matches!(self, InputMethod::Anthy | InputMethod::Chewing)
    }
}
