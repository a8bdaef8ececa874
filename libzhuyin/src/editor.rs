//! Phonetic (Zhuyin) editor.
//!
//! Keys fill the four syllable slots through the active keyboard layout.
//! When the tone slot is set, or space is pressed, the slots are packed and
//! looked up in the phonetic dictionary.

use std::sync::Arc;

use libcompose_core::editor::{Editor, EditorOutput};
use libcompose_core::{CandidateList, FeedbackEvent, PhoDictionary};
use tracing::trace;

use crate::bopomofo;
use crate::layout::KeyboardLayout;
use crate::phokey::PhoneticSlots;

/// Outcome of completing a syllable, before it is turned into an editor
/// result. The phrase editor handles `Single` differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Keystroke {
    /// Key not in the layout
    Unmapped,
    /// Slot updated, syllable still incomplete
    Partial,
    /// Lookup produced exactly one candidate (slots already cleared)
    Single(String),
    /// Lookup produced several candidates, now pending
    Several { space: bool },
    /// Lookup produced nothing
    Nothing { space: bool },
}

/// Editor for Zhuyin input against a phonetic dictionary.
#[derive(Debug, Clone, Default)]
pub struct PhoneticEditor {
    layout: KeyboardLayout,
    dictionary: Option<Arc<PhoDictionary>>,
    slots: PhoneticSlots,
}

impl PhoneticEditor {
    pub fn new(layout: KeyboardLayout, dictionary: Option<Arc<PhoDictionary>>) -> Self {
        Self {
            layout,
            dictionary,
            slots: PhoneticSlots::default(),
        }
    }

    pub fn layout(&self) -> KeyboardLayout {
        self.layout
    }

    /// Switch layout. Pending slots are cleared.
    pub fn set_layout(&mut self, layout: KeyboardLayout) {
        self.layout = layout;
        self.slots.clear();
    }

    pub fn set_dictionary(&mut self, dictionary: Option<Arc<PhoDictionary>>) {
        self.dictionary = dictionary;
    }

    pub fn slots(&self) -> &PhoneticSlots {
        &self.slots
    }

    pub(crate) fn keystroke(&mut self, key: char, candidates: &mut CandidateList) -> Keystroke {
        let Some(mapping) = self.layout.lookup(key) else {
            return Keystroke::Unmapped;
        };
        self.slots.apply(mapping);

        let space = key == ' ';
        if self.slots.tone() == 0 && !space {
            return Keystroke::Partial;
        }

        let key = self.slots.to_key();
        let found = self
            .dictionary
            .as_deref()
            .map(|dict| dict.lookup(key))
            .unwrap_or_default();
        trace!(key = format_args!("{:#06x}", key), count = found.len(), "phonetic lookup");

        match found.len() {
            0 => {
                candidates.clear();
                Keystroke::Nothing { space }
            }
            1 => {
                let text = found.into_iter().next().map(|c| c.text).unwrap_or_default();
                self.slots.clear();
                candidates.clear();
                Keystroke::Single(text)
            }
            _ => {
                candidates.set_candidates(found);
                Keystroke::Several { space }
            }
        }
    }

    /// Clear the most recent slot. Returns false when nothing was set.
    pub(crate) fn pop_slot(&mut self, candidates: &mut CandidateList) -> bool {
        if self.slots.clear_last().is_none() {
            return false;
        }
        candidates.clear();
        true
    }
}

impl Editor for PhoneticEditor {
    fn process_char(&mut self, key: char, candidates: &mut CandidateList) -> EditorOutput {
        match self.keystroke(key, candidates) {
            Keystroke::Unmapped => EditorOutput::ignored(),
            Keystroke::Partial => EditorOutput::preedit(Some(FeedbackEvent::KeyPress)),
            Keystroke::Single(text) => EditorOutput::commit(text, Some(FeedbackEvent::Candidate)),
            Keystroke::Several { space: true } => EditorOutput::preedit(Some(FeedbackEvent::KeySpace)),
            Keystroke::Several { space: false } => EditorOutput::preedit(Some(FeedbackEvent::KeyPress)),
            Keystroke::Nothing { space: true } => EditorOutput::preedit(Some(FeedbackEvent::Error)),
            Keystroke::Nothing { space: false } => EditorOutput::preedit(None),
        }
    }

    fn backspace(&mut self, candidates: &mut CandidateList) -> EditorOutput {
        if self.pop_slot(candidates) {
            EditorOutput::preedit(Some(FeedbackEvent::KeyDelete))
        } else {
            EditorOutput::ignored()
        }
    }

    fn preedit(&self) -> String {
        bopomofo::render(&self.slots)
    }

    fn has_input(&self) -> bool {
        !self.slots.is_empty()
    }

    fn reset(&mut self) {
        self.slots.clear();
    }

    fn name(&self) -> &'static str {
        "phonetic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phokey::pho2key;

    fn dictionary() -> Arc<PhoDictionary> {
        let de = pho2key(&PhoneticSlots::new(5, 0, 3, 1));
        let ma3 = pho2key(&PhoneticSlots::new(3, 0, 1, 3));
        Arc::new(
            PhoDictionary::from_entries(vec![
                (de, "的", 900),
                (ma3, "馬", 50),
                (ma3, "嗎", 40),
                (ma3, "碼", 10),
            ])
            .unwrap(),
        )
    }

    fn editor() -> PhoneticEditor {
        PhoneticEditor::new(KeyboardLayout::Standard, Some(dictionary()))
    }

    #[test]
    fn single_candidate_commits() {
        let mut ed = editor();
        let mut cands = CandidateList::new();
        assert_eq!(
            ed.process_char('2', &mut cands),
            EditorOutput::preedit(Some(FeedbackEvent::KeyPress))
        );
        assert_eq!(ed.preedit(), "ㄉ");
        ed.process_char('k', &mut cands);
        assert_eq!(ed.preedit(), "ㄉㄜ");
        assert_eq!(
            ed.process_char(' ', &mut cands),
            EditorOutput::commit("的".into(), Some(FeedbackEvent::Candidate))
        );
        assert!(!ed.has_input());
        assert!(cands.is_empty());
    }

    #[test]
    fn several_candidates_stay_pending() {
        let mut ed = editor();
        let mut cands = CandidateList::new();
        ed.process_char('a', &mut cands);
        ed.process_char('8', &mut cands);
        let out = ed.process_char('4', &mut cands);
        assert_eq!(out, EditorOutput::preedit(Some(FeedbackEvent::KeyPress)));
        assert_eq!(ed.preedit(), "ㄇㄚˇ");
        let texts: Vec<_> = cands.candidates().iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["馬", "嗎", "碼"]);
    }

    #[test]
    fn empty_lookup_on_space_is_an_error() {
        let mut ed = editor();
        let mut cands = CandidateList::new();
        ed.process_char('1', &mut cands);
        assert_eq!(
            ed.process_char(' ', &mut cands),
            EditorOutput::preedit(Some(FeedbackEvent::Error))
        );
        // The tone key path is silent
        let mut ed = editor();
        ed.process_char('1', &mut cands);
        assert_eq!(ed.process_char('3', &mut cands), EditorOutput::preedit(None));
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        let mut ed = editor();
        let mut cands = CandidateList::new();
        assert_eq!(ed.process_char('`', &mut cands), EditorOutput::ignored());
        assert!(!ed.has_input());
    }

    #[test]
    fn same_slot_overwrites() {
        let mut ed = editor();
        let mut cands = CandidateList::new();
        ed.process_char('1', &mut cands);
        ed.process_char('q', &mut cands);
        assert_eq!(ed.preedit(), "ㄆ");
    }

    #[test]
    fn backspace_clears_latest_slot() {
        let mut ed = editor();
        let mut cands = CandidateList::new();
        ed.process_char('2', &mut cands);
        ed.process_char('k', &mut cands);
        assert_eq!(
            ed.backspace(&mut cands),
            EditorOutput::preedit(Some(FeedbackEvent::KeyDelete))
        );
        assert_eq!(ed.preedit(), "ㄉ");
        ed.backspace(&mut cands);
        for _ in 0..3 {
            assert_eq!(ed.backspace(&mut cands), EditorOutput::ignored());
        }
        assert_eq!(ed.preedit(), "");
    }

    #[test]
    fn no_dictionary_finds_nothing() {
        let mut ed = PhoneticEditor::new(KeyboardLayout::Standard, None);
        let mut cands = CandidateList::new();
        ed.process_char('2', &mut cands);
        ed.process_char('k', &mut cands);
        assert_eq!(
            ed.process_char(' ', &mut cands),
            EditorOutput::preedit(Some(FeedbackEvent::Error))
        );
    }

    #[test]
    fn layout_switch_clears_slots() {
        let mut ed = editor();
        let mut cands = CandidateList::new();
        ed.process_char('2', &mut cands);
        ed.set_layout(KeyboardLayout::Hsu);
        assert!(!ed.has_input());
        ed.process_char('d', &mut cands);
        assert_eq!(ed.preedit(), "ㄉ");
    }
}
