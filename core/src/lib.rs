//! libcompose-core
//!
//! Shared types for the libcompose input-method crates (libzhuyin, libcompose).
//!
//! Public API:
//! - `Candidate`, `CandidateList` - bounded, paginated candidate lists
//! - `PhoDictionary`, `GtabTable`, `TsinHeader` - binary table loaders
//! - `Registry` - data directories, the phonetic dictionary and cached tables
//! - `Editor` - the trait every composition method implements
//! - `FeedbackEvent`, `FeedbackSink` - sound / vibration hooks
//! - `codepoint` - hex / Big5 / UTF-8 conversion for internal-code entry
//! - `Punctuator` - smart punctuation with paired quote state
//! - `search` - method and table search
//! - `Config` - presentation and feedback settings
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{ConfigError, LoadError, LoadResult};

pub mod candidate;
pub use candidate::{AnnotationSource, Candidate, CandidateList, NoAnnotations};

pub mod codepoint;
pub use codepoint::IntcodeMode;

pub mod context;
pub use context::{ComposeView, PreeditAttr};

pub mod editor;
pub use editor::{Editor, EditorOutput, EditorResult};

pub mod feedback;
pub use feedback::{FeedbackEvent, FeedbackSink};

pub mod method;
pub use method::InputMethod;

pub mod punctuation;
pub use punctuation::Punctuator;

pub mod registry;
pub use registry::{Registry, TableInfo, WellKnownTable, CUSTOM_TABLE_ID, WELL_KNOWN_TABLES};

pub mod search;
pub use search::{find_method_by_name, search_methods, search_tables, MethodSearchResult};

pub mod tables;
pub use tables::{GtabTable, PhoDictionary, TsinHeader};

pub mod variant;
pub use variant::{Charset, MapConverter, VariantConverter};

/// Upper bound on preedit and commit buffers, in bytes.
pub const MAX_TEXT_LEN: usize = 256;

/// Longest accepted selection-key string, in characters.
pub const MAX_SELECTION_KEYS: usize = 15;

/// Shortest and longest vibration pulse, in milliseconds.
pub const VIBRATION_RANGE_MS: (u32, u32) = (1, 500);

/// How the candidate window lays out its entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateStyle {
    #[default]
    Horizontal,
    Vertical,
}

/// Color scheme for the candidate window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    Light,
    Dark,
    /// Follow the host's dark-mode flag.
    #[default]
    System,
}

/// Generic configuration for composition sessions.
///
/// Language-specific options (keyboard layouts for Zhuyin) live in
/// `ZhuyinConfig`, which flattens this struct.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Keys for selecting candidates on the current page, in order.
    pub selection_keys: String,

    /// Candidates shown per page (1-10)
    pub candidates_per_page: usize,

    /// Output character set
    pub charset: Charset,

    pub candidate_style: CandidateStyle,
    pub color_scheme: ColorScheme,

    /// Host reports dark mode; only consulted with `ColorScheme::System`.
    pub system_dark_mode: bool,

    /// Convert ASCII punctuation to full-width CJK forms
    pub smart_punctuation: bool,

    /// Request annotations (pronunciation hints) for candidates
    pub pinyin_annotation: bool,

    pub sound_enabled: bool,
    pub vibration_enabled: bool,

    /// Vibration pulse length in milliseconds (1-500)
    pub vibration_duration_ms: u32,

    pub intcode_mode: IntcodeMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            selection_keys: "1234567890".to_string(),
            candidates_per_page: candidate::DEFAULT_PAGE_SIZE,
            charset: Charset::Traditional,
            candidate_style: CandidateStyle::Horizontal,
            color_scheme: ColorScheme::System,
            system_dark_mode: false,
            smart_punctuation: false,
            pinyin_annotation: false,
            sound_enabled: false,
            vibration_enabled: false,
            vibration_duration_ms: 20,
            intcode_mode: IntcodeMode::Unicode,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&content)?)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = self.to_toml_string()?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    ///
    /// Out-of-range values are clamped the same way the setters clamp them.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let mut config: Config = toml::from_str(content)?;
        config.normalize();
        Ok(config)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Clamp out-of-range values and replace invalid selection keys.
    pub fn normalize(&mut self) {
        self.candidates_per_page = self.candidates_per_page.clamp(1, 10);
        self.vibration_duration_ms = self
            .vibration_duration_ms
            .clamp(VIBRATION_RANGE_MS.0, VIBRATION_RANGE_MS.1);
        if !valid_selection_keys(&self.selection_keys) {
            self.selection_keys = Config::default().selection_keys;
        }
    }

    // ========== Selection Keys Management ==========

    /// Set the selection keys string.
    ///
    /// Empty strings and strings longer than 15 characters are rejected and
    /// leave the current keys in place. Returns whether the keys changed.
    ///
    /// # Example
    /// ```
    /// # use libcompose_core::Config;
    /// let mut config = Config::default();
    /// assert!(config.set_selection_keys("asdfghjkl"));
    /// assert!(!config.set_selection_keys(""));
    /// assert_eq!(config.selection_keys, "asdfghjkl");
    /// ```
    pub fn set_selection_keys(&mut self, keys: &str) -> bool {
        if !valid_selection_keys(keys) {
            return false;
        }
        self.selection_keys = keys.to_string();
        true
    }

    /// Check if a character is a selection key and return its index (0-based).
    pub fn selection_key_index(&self, ch: char) -> Option<usize> {
        self.selection_keys.chars().position(|c| c == ch)
    }

    // ========== Presentation ==========

    /// Set candidates per page, clamped to 1..=10.
    pub fn set_candidates_per_page(&mut self, count: usize) {
        self.candidates_per_page = count.clamp(1, 10);
    }

    /// Whether the candidate window should render dark.
    pub fn is_dark(&self) -> bool {
        match self.color_scheme {
            ColorScheme::Light => false,
            ColorScheme::Dark => true,
            ColorScheme::System => self.system_dark_mode,
        }
    }

    // ========== Feedback ==========

    /// Set the vibration pulse length, clamped to 1..=500 ms.
    pub fn set_vibration_duration(&mut self, ms: u32) {
        self.vibration_duration_ms = ms.clamp(VIBRATION_RANGE_MS.0, VIBRATION_RANGE_MS.1);
    }
}

fn valid_selection_keys(keys: &str) -> bool {
    !keys.is_empty() && keys.chars().count() <= MAX_SELECTION_KEYS
}

/// Utility helpers.
pub mod utils {
    /// Truncate `s` to at most `max_len` bytes without splitting a character.
    pub fn truncate_to_boundary(s: &mut String, max_len: usize) {
        if s.len() <= max_len {
            return;
        }
        let mut end = max_len;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        s.truncate(end);
    }

    /// Append `addition` to `s` only if the result stays within `max_len`
    /// bytes. Returns whether anything was appended.
    pub fn push_bounded(s: &mut String, addition: &str, max_len: usize) -> bool {
        if s.len() + addition.len() > max_len {
            return false;
        }
        s.push_str(addition);
        true
    }

    /// Remove the last UTF-8 character of `s`, if any.
    pub fn pop_last_char(s: &mut String) -> Option<char> {
        s.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.selection_keys, "1234567890");
        assert_eq!(config.candidates_per_page, 10);
        assert_eq!(config.charset, Charset::Traditional);
        assert_eq!(config.candidate_style, CandidateStyle::Horizontal);
        assert_eq!(config.color_scheme, ColorScheme::System);
        assert!(!config.smart_punctuation);
        assert!(!config.pinyin_annotation);
        assert!(!config.sound_enabled);
        assert!(!config.vibration_enabled);
        assert_eq!(config.vibration_duration_ms, 20);
        assert_eq!(config.intcode_mode, IntcodeMode::Unicode);
    }

    #[test]
    fn setters_clamp() {
        let mut config = Config::default();
        config.set_candidates_per_page(0);
        assert_eq!(config.candidates_per_page, 1);
        config.set_candidates_per_page(99);
        assert_eq!(config.candidates_per_page, 10);
        config.set_vibration_duration(0);
        assert_eq!(config.vibration_duration_ms, 1);
        config.set_vibration_duration(10_000);
        assert_eq!(config.vibration_duration_ms, 500);
    }

    #[test]
    fn selection_keys_validation() {
        let mut config = Config::default();
        assert!(!config.set_selection_keys(""));
        assert!(!config.set_selection_keys("0123456789abcdef"));
        assert_eq!(config.selection_keys, "1234567890");
        assert!(config.set_selection_keys("asdf"));
        assert_eq!(config.selection_key_index('d'), Some(2));
        assert_eq!(config.selection_key_index('1'), None);
    }

    #[test]
    fn dark_mode_follows_system() {
        let mut config = Config::default();
        assert!(!config.is_dark());
        config.system_dark_mode = true;
        assert!(config.is_dark());
        config.color_scheme = ColorScheme::Light;
        assert!(!config.is_dark());
    }

    #[test]
    fn toml_roundtrip_and_clamp() {
        let mut config = Config::default();
        config.charset = Charset::Simplified;
        config.smart_punctuation = true;
        let text = config.to_toml_string().unwrap();
        assert_eq!(Config::from_toml_str(&text).unwrap(), config);

        let clamped = Config::from_toml_str("candidates_per_page = 50\nselection_keys = \"\"").unwrap();
        assert_eq!(clamped.candidates_per_page, 10);
        assert_eq!(clamped.selection_keys, "1234567890");
    }

    #[test]
    fn truncate_respects_char_boundary() {
        let mut s = "中文".to_string();
        utils::truncate_to_boundary(&mut s, 4);
        assert_eq!(s, "中");
        let mut ascii = "abc".to_string();
        utils::truncate_to_boundary(&mut ascii, 10);
        assert_eq!(ascii, "abc");
    }

    #[test]
    fn push_bounded_refuses_overflow() {
        let mut s = "ab".to_string();
        assert!(!utils::push_bounded(&mut s, "中", 4));
        assert!(utils::push_bounded(&mut s, "c", 4));
        assert_eq!(s, "abc");
    }
}
