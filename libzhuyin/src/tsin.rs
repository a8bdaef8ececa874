//! Phrase (TSIN) editor: Zhuyin syllables accumulated into a phrase.
//!
//! Keys drive a [`PhoneticEditor`], but committed characters (auto-commit or
//! selection) are appended to the phrase buffer. Enter commits the phrase.

use std::sync::Arc;

use libcompose_core::editor::{Editor, EditorOutput, EditorResult};
use libcompose_core::utils::{pop_last_char, push_bounded};
use libcompose_core::{CandidateList, FeedbackEvent, PhoDictionary, MAX_TEXT_LEN};
use tracing::debug;

use crate::editor::{Keystroke, PhoneticEditor};
use crate::layout::KeyboardLayout;

#[derive(Debug, Clone, Default)]
pub struct PhraseEditor {
    phonetic: PhoneticEditor,
    phrase: String,
}

impl PhraseEditor {
    pub fn new(layout: KeyboardLayout, dictionary: Option<Arc<PhoDictionary>>) -> Self {
        Self {
            phonetic: PhoneticEditor::new(layout, dictionary),
            phrase: String::new(),
        }
    }

    pub fn phonetic(&self) -> &PhoneticEditor {
        &self.phonetic
    }

    pub fn phonetic_mut(&mut self) -> &mut PhoneticEditor {
        &mut self.phonetic
    }

    /// The phrase accumulated so far.
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    /// Append text to the phrase. Text that would overflow the buffer is
    /// dropped whole.
    fn append(&mut self, text: &str) {
        if !push_bounded(&mut self.phrase, text, MAX_TEXT_LEN - 1) {
            debug!(len = self.phrase.len(), "phrase buffer full, dropping {:?}", text);
        }
    }
}

impl Editor for PhraseEditor {
    fn process_char(&mut self, key: char, candidates: &mut CandidateList) -> EditorOutput {
        match self.phonetic.keystroke(key, candidates) {
            Keystroke::Unmapped => EditorOutput::ignored(),
            Keystroke::Partial => EditorOutput::preedit(Some(FeedbackEvent::KeyPress)),
            Keystroke::Single(text) => {
                self.append(&text);
                EditorOutput::preedit(Some(FeedbackEvent::Candidate))
            }
            Keystroke::Several { space: true } => EditorOutput::preedit(Some(FeedbackEvent::KeySpace)),
            Keystroke::Several { space: false } => EditorOutput::preedit(Some(FeedbackEvent::KeyPress)),
            Keystroke::Nothing { space: true } => EditorOutput::preedit(Some(FeedbackEvent::Error)),
            Keystroke::Nothing { space: false } => EditorOutput::preedit(None),
        }
    }

    fn backspace(&mut self, candidates: &mut CandidateList) -> EditorOutput {
        if pop_last_char(&mut self.phrase).is_some() {
            return EditorOutput::preedit(Some(FeedbackEvent::KeyDelete));
        }
        self.phonetic.backspace(candidates)
    }

    fn enter(&mut self, _candidates: &mut CandidateList) -> EditorResult {
        if self.phrase.is_empty() {
            return EditorResult::Ignored;
        }
        let phrase = std::mem::take(&mut self.phrase);
        self.reset();
        EditorResult::Commit(phrase)
    }

    /// Selected candidates extend the phrase instead of committing.
    fn select(&mut self, text: String) -> EditorResult {
        self.phonetic.reset();
        self.append(&text);
        EditorResult::Preedit
    }

    fn preedit(&self) -> String {
        let mut preedit = self.phrase.clone();
        preedit.push_str(&self.phonetic.preedit());
        preedit
    }

    fn has_input(&self) -> bool {
        !self.phrase.is_empty() || self.phonetic.has_input()
    }

    fn reset(&mut self) {
        self.phrase.clear();
        self.phonetic.reset();
    }

    fn name(&self) -> &'static str {
        "phrase"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phokey::{pho2key, PhoneticSlots};

    fn editor() -> PhraseEditor {
        let zhong = pho2key(&PhoneticSlots::new(15, 2, 12, 1));
        let wen = pho2key(&PhoneticSlots::new(0, 2, 10, 2));
        let dict = PhoDictionary::from_entries(vec![
            (zhong, "中", 100),
            (wen, "文", 80),
            (wen, "聞", 30),
        ])
        .unwrap();
        PhraseEditor::new(KeyboardLayout::Standard, Some(Arc::new(dict)))
    }

    fn type_keys(ed: &mut PhraseEditor, cands: &mut CandidateList, keys: &str) -> EditorOutput {
        let mut last = EditorOutput::ignored();
        for key in keys.chars() {
            last = ed.process_char(key, cands);
        }
        last
    }

    #[test]
    fn auto_commit_appends_to_phrase() {
        let mut ed = editor();
        let mut cands = CandidateList::new();
        // ㄓㄨㄥ + space
        let out = type_keys(&mut ed, &mut cands, "5j/ ");
        assert_eq!(out, EditorOutput::preedit(Some(FeedbackEvent::Candidate)));
        assert_eq!(ed.phrase(), "中");
        assert_eq!(ed.preedit(), "中");
    }

    #[test]
    fn selection_appends_and_enter_commits() {
        let mut ed = editor();
        let mut cands = CandidateList::new();
        type_keys(&mut ed, &mut cands, "5j/ ");
        // ㄨㄣˊ
        type_keys(&mut ed, &mut cands, "jp3");
        assert_eq!(cands.len(), 2);
        assert_eq!(ed.preedit(), "中ㄨㄣˊ");

        assert_eq!(ed.select("文".into()), EditorResult::Preedit);
        assert_eq!(ed.preedit(), "中文");

        assert_eq!(ed.enter(&mut cands), EditorResult::Commit("中文".into()));
        assert!(!ed.has_input());
        assert_eq!(ed.enter(&mut cands), EditorResult::Ignored);
    }

    #[test]
    fn backspace_removes_whole_characters() {
        let mut ed = editor();
        let mut cands = CandidateList::new();
        type_keys(&mut ed, &mut cands, "5j/ ");
        ed.select("文".into());
        assert_eq!(ed.phrase(), "中文");
        ed.backspace(&mut cands);
        assert_eq!(ed.phrase(), "中");
        ed.backspace(&mut cands);
        assert_eq!(ed.phrase(), "");

        // Falls through to the phonetic slots
        type_keys(&mut ed, &mut cands, "5");
        assert_eq!(
            ed.backspace(&mut cands),
            EditorOutput::preedit(Some(FeedbackEvent::KeyDelete))
        );
        assert_eq!(ed.backspace(&mut cands), EditorOutput::ignored());
    }

    #[test]
    fn phrase_is_bounded() {
        let mut ed = editor();
        for _ in 0..200 {
            ed.select("中".into());
        }
        assert!(ed.phrase().len() < MAX_TEXT_LEN);
        assert_eq!(ed.phrase().len() % "中".len(), 0);
    }
}
