//! Zhuyin-specific configuration that extends the base `Config` from core.
//!
//! This configuration includes:
//! - All generic options from `libcompose_core::Config` (flattened via serde)
//! - The Zhuyin keyboard layout
//!
//! # Example
//!
//! ```rust
//! use libzhuyin::{KeyboardLayout, ZhuyinConfig};
//!
//! let config = ZhuyinConfig::from_toml_str("keyboard_layout = \"et26\"\ncandidates_per_page = 5").unwrap();
//! assert_eq!(config.keyboard_layout, KeyboardLayout::Eten26);
//! assert_eq!(config.base().candidates_per_page, 5);
//! ```
use libcompose_core::ConfigError;
use serde::{Deserialize, Serialize};

use crate::layout::{KeyboardLayout, LayoutError};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ZhuyinConfig {
    /// Base configuration fields (selection keys, paging, charset, feedback)
    #[serde(flatten)]
    pub base: libcompose_core::Config,

    /// Keyboard layout used by the phonetic and phrase editors
    pub keyboard_layout: KeyboardLayout,
}

impl ZhuyinConfig {
    /// Convert this zhuyin config into the base config
    pub fn into_base(self) -> libcompose_core::Config {
        self.base
    }

    /// Get a reference to the base config
    pub fn base(&self) -> &libcompose_core::Config {
        &self.base
    }

    /// Get a mutable reference to the base config
    pub fn base_mut(&mut self) -> &mut libcompose_core::Config {
        &mut self.base
    }

    /// Set the layout by name or alias. Unknown names leave it unchanged.
    pub fn set_layout_name(&mut self, name: &str) -> Result<(), LayoutError> {
        self.keyboard_layout = KeyboardLayout::from_name(name)?;
        Ok(())
    }

    /// Parse from TOML, clamping base fields the same way `Config` does.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let mut config: ZhuyinConfig = toml::from_str(content)?;
        config.base.normalize();
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&content)?)
    }

    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }
}
