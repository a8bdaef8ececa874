//! # libcompose
//!
//! One key-event API over every bundled composition method.
//!
//! A host creates a [`Registry`] (data directories and loaded tables), then a
//! [`CompositionContext`] per input session, and feeds it key events:
//!
//! ```no_run
//! use libcompose::{CompositionContext, KeyResult, Registry};
//!
//! let mut registry = Registry::from_env();
//! registry.load_pho(libcompose::PHO_FILE).ok();
//!
//! let mut ctx = CompositionContext::new(&registry);
//! for key in "2k7".chars() {
//!     if ctx.process_key(key as u32, key as u32, 0) == KeyResult::Commit {
//!         println!("{}", ctx.take_commit());
//!     }
//! }
//! ```
//!
//! Method editors:
//! - Phonetic and phrase editors come from `libzhuyin`
//! - [`TableEditor`] drives GTAB tables
//! - [`IntcodeEditor`] converts hex codes to characters

pub mod context;
pub mod gtab;
pub mod intcode;

pub use context::{
    candidate_count_opt, commit_opt, is_chinese_mode_opt, is_method_available_opt, method_opt,
    preedit_opt, process_key_opt, ActiveMethod, CompositionContext, KeyEvent, KeyResult,
    KEY_BACKSPACE, KEY_ENTER, KEY_ESCAPE,
};
pub use gtab::TableEditor;
pub use intcode::IntcodeEditor;

pub use libcompose_core::registry::{PHO_FILE, TSIN_FILE};
pub use libcompose_core::{
    Charset, ComposeView, FeedbackEvent, FeedbackSink, InputMethod, IntcodeMode, Registry,
};
pub use libzhuyin::{KeyboardLayout, ZhuyinConfig};
