//! Output character set and the simplified/traditional conversion contract.
//!
//! The conversion data itself is supplied by the host; this crate ships only
//! the trait and a map-backed implementation.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Character set of committed output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Charset {
    #[default]
    Traditional,
    Simplified,
}

impl Charset {
    pub fn toggled(self) -> Self {
        match self {
            Charset::Traditional => Charset::Simplified,
            Charset::Simplified => Charset::Traditional,
        }
    }
}

/// Simplified/traditional text conversion.
pub trait VariantConverter {
    fn to_simplified(&self, text: &str) -> String;
    fn to_traditional(&self, text: &str) -> String;

    /// Convert `text` for output in `charset`.
    fn convert(&self, text: &str, charset: Charset) -> String {
        match charset {
            Charset::Simplified => self.to_simplified(text),
            Charset::Traditional => self.to_traditional(text),
        }
    }
}

/// Character-by-character converter backed by caller-provided pairs.
/// Characters without a mapping pass through unchanged.
#[derive(Debug, Clone, Default)]
pub struct MapConverter {
    to_simp: AHashMap<char, char>,
    to_trad: AHashMap<char, char>,
}

impl MapConverter {
    /// Build from `(simplified, traditional)` pairs. When several pairs share
    /// a character, the first one wins.
    pub fn from_pairs<I: IntoIterator<Item = (char, char)>>(pairs: I) -> Self {
        let mut converter = Self::default();
        for (simp, trad) in pairs {
            converter.to_simp.entry(trad).or_insert(simp);
            converter.to_trad.entry(simp).or_insert(trad);
        }
        converter
    }

    pub fn len(&self) -> usize {
        self.to_trad.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_trad.is_empty()
    }
}

impl VariantConverter for MapConverter {
    fn to_simplified(&self, text: &str) -> String {
        text.chars()
            .map(|c| self.to_simp.get(&c).copied().unwrap_or(c))
            .collect()
    }

    fn to_traditional(&self, text: &str) -> String {
        text.chars()
            .map(|c| self.to_trad.get(&c).copied().unwrap_or(c))
            .collect()
    }
}
