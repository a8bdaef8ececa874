//! Editor trait shared by the composition methods.
//!
//! Each method (phonetic, phrase, table, codepoint) implements `Editor` and
//! processes the keys the dispatcher routes to it. Candidates live in the
//! dispatcher and are passed in; everything else the editor owns.

use crate::candidate::CandidateList;
use crate::feedback::FeedbackEvent;

/// Result of processing a key event in an editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorResult {
    /// Key not handled; pass it to the application
    Ignored,

    /// Key consumed without visible change
    Absorbed,

    /// Composition changed; redraw preedit and candidates
    Preedit,

    /// Text is ready to commit
    Commit(String),
}

/// Editor result plus the feedback event it raised, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorOutput {
    pub result: EditorResult,
    pub feedback: Option<FeedbackEvent>,
}

impl EditorOutput {
    pub fn ignored() -> Self {
        Self {
            result: EditorResult::Ignored,
            feedback: None,
        }
    }

    pub fn absorbed() -> Self {
        Self {
            result: EditorResult::Absorbed,
            feedback: None,
        }
    }

    pub fn preedit(feedback: Option<FeedbackEvent>) -> Self {
        Self {
            result: EditorResult::Preedit,
            feedback,
        }
    }

    pub fn commit(text: String, feedback: Option<FeedbackEvent>) -> Self {
        Self {
            result: EditorResult::Commit(text),
            feedback,
        }
    }
}

/// Editor trait for handling input in one composition method.
pub trait Editor {
    /// Process a printable ASCII character.
    fn process_char(&mut self, key: char, candidates: &mut CandidateList) -> EditorOutput;

    /// Remove the most recent unit of input.
    fn backspace(&mut self, candidates: &mut CandidateList) -> EditorOutput;

    /// Handle Enter. Most methods have nothing to confirm.
    fn enter(&mut self, _candidates: &mut CandidateList) -> EditorResult {
        EditorResult::Ignored
    }

    /// Accept a candidate chosen by the user. The dispatcher clears the
    /// candidate list afterwards.
    fn select(&mut self, text: String) -> EditorResult {
        self.reset();
        EditorResult::Commit(text)
    }

    /// Text to display as preedit.
    fn preedit(&self) -> String;

    /// Whether any input is pending (Escape only resets when true).
    fn has_input(&self) -> bool;

    /// Clear all composition state.
    fn reset(&mut self);

    /// Name for logging.
    fn name(&self) -> &'static str;
}
