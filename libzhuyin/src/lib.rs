//! # libzhuyin
//!
//! Zhuyin/Bopomofo composition built on libcompose-core.
//!
//! Public API exported here:
//! - `KeyboardLayout` and the per-layout key tables from `layout`
//! - `PhoneticSlots`, `pho2key`, `key_to_slots` from `phokey`
//! - `render` / `parse_bopomofo` from `bopomofo`
//! - `PhoneticEditor` (single syllables) and `PhraseEditor` (TSIN phrases)
//! - `ZhuyinConfig`

pub mod bopomofo;
pub mod config;
pub mod editor;
pub mod layout;
pub mod phokey;
pub mod tsin;

// Re-export the editor contract from core
pub use libcompose_core::{Candidate, CandidateList, Editor, EditorOutput, EditorResult};

pub use bopomofo::{parse_bopomofo, render};
pub use config::ZhuyinConfig;
pub use editor::PhoneticEditor;
pub use layout::{KeyMapping, KeyboardLayout, LayoutError, Slot};
pub use phokey::{key_to_slots, pho2key, PhoneticSlots, BACK_QUOTE_INITIAL};
pub use tsin::PhraseEditor;
