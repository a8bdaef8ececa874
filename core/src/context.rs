//! Snapshot of composition state for hosts.
//!
//! The `ComposeView` struct is a plain data container. After a key has been
//! processed, the host takes a view and redraws preedit, candidate window and
//! commit text from its fields. No callbacks, just data transfer.

use serde::{Deserialize, Serialize};

/// Styling span over a byte range of the preedit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreeditAttr {
    pub start: usize,
    pub end: usize,
    pub underline: bool,
}

impl PreeditAttr {
    /// Attributes for a preedit string: one underline span over the whole
    /// text, or nothing when the text is empty.
    pub fn for_preedit(preedit: &str) -> Vec<PreeditAttr> {
        if preedit.is_empty() {
            return Vec::new();
        }
        vec![PreeditAttr {
            start: 0,
            end: preedit.len(),
            underline: true,
        }]
    }
}

/// What the host needs to draw after a key event.
///
/// # Fields
///
/// - `preedit_text`: text being composed (displayed with underline)
/// - `preedit_cursor`: cursor byte offset, always at the end of the preedit
/// - `commit_text`: text committed by the last key (consume and clear)
/// - `candidates`: candidates on the current page
/// - `annotations`: one entry per on-page candidate when annotation is on
/// - `auxiliary_text`: page indicator, e.g. "2/3"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposeView {
    pub preedit_text: String,
    pub preedit_cursor: usize,
    pub preedit_attrs: Vec<PreeditAttr>,
    pub commit_text: String,
    pub candidates: Vec<String>,
    pub annotations: Vec<String>,
    pub selection_keys: String,
    pub page: usize,
    pub num_pages: usize,
    pub auxiliary_text: String,
    pub chinese_mode: bool,
    pub method: String,
}

impl ComposeView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if there's text to commit.
    pub fn has_commit(&self) -> bool {
        !self.commit_text.is_empty()
    }

    /// Take the commit text, leaving it empty.
    pub fn take_commit(&mut self) -> String {
        std::mem::take(&mut self.commit_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attrs_cover_whole_preedit() {
        assert!(PreeditAttr::for_preedit("").is_empty());
        let attrs = PreeditAttr::for_preedit("ㄉㄜ");
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].start, 0);
        assert_eq!(attrs[0].end, 6);
        assert!(attrs[0].underline);
    }

    #[test]
    fn take_commit_empties() {
        let mut view = ComposeView::new();
        view.commit_text = "的".into();
        assert!(view.has_commit());
        assert_eq!(view.take_commit(), "的");
        assert!(!view.has_commit());
    }
}
