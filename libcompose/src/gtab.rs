//! Generic table (GTAB) editor: Cangjie, Boshiamy, symbol tables and the like.
//!
//! Typed keys are mapped to key indices through the table keymap and looked
//! up by prefix. The raw characters are kept for display.

use std::sync::Arc;

use libcompose_core::editor::{Editor, EditorOutput, EditorResult};
use libcompose_core::tables::gtab::MAX_GTAB_KEYS;
use libcompose_core::{CandidateList, FeedbackEvent, GtabTable};
use tracing::trace;

#[derive(Debug, Clone, Default)]
pub struct TableEditor {
    table: Option<Arc<GtabTable>>,
    keys: Vec<u8>,
    display: String,
}

impl TableEditor {
    pub fn new(table: Option<Arc<GtabTable>>) -> Self {
        Self {
            table,
            keys: Vec::with_capacity(MAX_GTAB_KEYS),
            display: String::new(),
        }
    }

    pub fn table(&self) -> Option<&Arc<GtabTable>> {
        self.table.as_ref()
    }

    /// The raw keys typed so far.
    pub fn key_string(&self) -> &str {
        &self.display
    }

    fn refresh(&self, table: &GtabTable, candidates: &mut CandidateList) {
        if self.keys.is_empty() {
            candidates.clear();
        } else {
            candidates.set_candidates(table.lookup(&self.keys));
        }
    }

    /// Space outside the keymap commits the first pending candidate.
    fn space(&mut self, candidates: &mut CandidateList) -> EditorOutput {
        if self.keys.is_empty() {
            return EditorOutput::ignored();
        }
        match candidates.get(0).map(|c| c.text.clone()) {
            Some(text) => {
                self.reset();
                candidates.clear();
                EditorOutput::commit(text, Some(FeedbackEvent::Candidate))
            }
            None => EditorOutput {
                result: EditorResult::Absorbed,
                feedback: Some(FeedbackEvent::Error),
            },
        }
    }
}

impl Editor for TableEditor {
    fn process_char(&mut self, key: char, candidates: &mut CandidateList) -> EditorOutput {
        let Some(table) = self.table.clone() else {
            return EditorOutput::ignored();
        };
        let Some(index) = table.key_index(key) else {
            if key == ' ' {
                return self.space(candidates);
            }
            return EditorOutput::ignored();
        };

        let max_press = table.max_press as usize;
        if self.keys.len() >= MAX_GTAB_KEYS || self.keys.len() >= max_press {
            return EditorOutput::absorbed();
        }

        self.keys.push(index);
        self.display.push(key);
        self.refresh(&table, candidates);
        trace!(keys = %self.display, count = candidates.len(), "table lookup");

        if candidates.len() == 1 && self.keys.len() >= max_press {
            let text = candidates.get(0).map(|c| c.text.clone()).unwrap_or_default();
            self.reset();
            candidates.clear();
            return EditorOutput::commit(text, Some(FeedbackEvent::Candidate));
        }
        EditorOutput::preedit(Some(FeedbackEvent::KeyPress))
    }

    fn backspace(&mut self, candidates: &mut CandidateList) -> EditorOutput {
        if self.keys.pop().is_none() {
            return EditorOutput::ignored();
        }
        self.display.pop();
        if let Some(table) = &self.table {
            self.refresh(table, candidates);
        } else {
            candidates.clear();
        }
        EditorOutput::preedit(Some(FeedbackEvent::KeyDelete))
    }

    fn preedit(&self) -> String {
        self.display.clone()
    }

    fn has_input(&self) -> bool {
        !self.keys.is_empty()
    }

    fn reset(&mut self) {
        self.keys.clear();
        self.display.clear();
    }

    fn name(&self) -> &'static str {
        "table"
    }
}
