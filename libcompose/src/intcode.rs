//! Codepoint (Intcode) editor: hex digits converted to a character.

use libcompose_core::codepoint::{self, IntcodeMode};
use libcompose_core::editor::{Editor, EditorOutput, EditorResult};
use libcompose_core::{CandidateList, FeedbackEvent};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct IntcodeEditor {
    mode: IntcodeMode,
    digits: String,
}

impl IntcodeEditor {
    pub fn new(mode: IntcodeMode) -> Self {
        Self {
            mode,
            digits: String::new(),
        }
    }

    pub fn mode(&self) -> IntcodeMode {
        self.mode
    }

    /// Change how digits are interpreted. Clears the buffer.
    pub fn set_mode(&mut self, mode: IntcodeMode) {
        self.mode = mode;
        self.digits.clear();
    }

    /// Hex digits typed so far, uppercased.
    pub fn digits(&self) -> &str {
        &self.digits
    }

    fn convert(&self) -> Option<String> {
        let converted = codepoint::convert(&self.digits, self.mode);
        if converted.is_none() {
            debug!(digits = %self.digits, mode = ?self.mode, "no character for code");
        }
        converted
    }
}

impl Editor for IntcodeEditor {
    fn process_char(&mut self, key: char, _candidates: &mut CandidateList) -> EditorOutput {
        if !key.is_ascii_hexdigit() {
            return EditorOutput::ignored();
        }
        let max = self.mode.max_digits();
        if self.digits.len() >= max {
            return EditorOutput::absorbed();
        }
        self.digits.push(key.to_ascii_uppercase());
        if self.digits.len() == max {
            if let Some(text) = self.convert() {
                self.digits.clear();
                return EditorOutput::commit(text, Some(FeedbackEvent::KeyPress));
            }
        }
        EditorOutput::preedit(Some(FeedbackEvent::KeyPress))
    }

    fn backspace(&mut self, _candidates: &mut CandidateList) -> EditorOutput {
        if self.digits.pop().is_none() {
            return EditorOutput::ignored();
        }
        EditorOutput::preedit(Some(FeedbackEvent::KeyDelete))
    }

    fn enter(&mut self, _candidates: &mut CandidateList) -> EditorResult {
        if self.digits.is_empty() {
            return EditorResult::Ignored;
        }
        match self.convert() {
            Some(text) => {
                self.digits.clear();
                EditorResult::Commit(text)
            }
            None => EditorResult::Ignored,
        }
    }

    fn preedit(&self) -> String {
        if self.digits.is_empty() {
            String::new()
        } else {
            format!("U+{}", self.digits)
        }
    }

    fn has_input(&self) -> bool {
        !self.digits.is_empty()
    }

    fn reset(&mut self) {
        self.digits.clear();
    }

    fn name(&self) -> &'static str {
        "intcode"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_hex(ed: &mut IntcodeEditor, hex: &str) -> EditorOutput {
        let mut cands = CandidateList::new();
        let mut last = EditorOutput::ignored();
        for key in hex.chars() {
            last = ed.process_char(key, &mut cands);
        }
        last
    }

    #[test]
    fn unicode_enter_commits() {
        let mut ed = IntcodeEditor::new(IntcodeMode::Unicode);
        type_hex(&mut ed, "4e2d");
        assert_eq!(ed.preedit(), "U+4E2D");
        assert_eq!(
            ed.enter(&mut CandidateList::new()),
            EditorResult::Commit("中".into())
        );
        assert!(!ed.has_input());
    }

    #[test]
    fn big5_converts_at_four_digits() {
        let mut ed = IntcodeEditor::new(IntcodeMode::Big5);
        assert_eq!(
            type_hex(&mut ed, "A440"),
            EditorOutput::commit("一".into(), Some(FeedbackEvent::KeyPress))
        );
        assert_eq!(ed.preedit(), "");
    }

    #[test]
    fn failed_conversion_absorbs_further_digits() {
        let mut ed = IntcodeEditor::new(IntcodeMode::Unicode);
        // 0xFFFFFF is past the last codepoint
        assert_eq!(
            type_hex(&mut ed, "FFFFFF"),
            EditorOutput::preedit(Some(FeedbackEvent::KeyPress))
        );
        assert_eq!(type_hex(&mut ed, "1"), EditorOutput::absorbed());
        assert_eq!(ed.enter(&mut CandidateList::new()), EditorResult::Ignored);
        assert_eq!(ed.digits(), "FFFFFF");
    }

    #[test]
    fn non_hex_is_ignored() {
        let mut ed = IntcodeEditor::new(IntcodeMode::Unicode);
        assert_eq!(type_hex(&mut ed, "g"), EditorOutput::ignored());
        assert!(!ed.has_input());
    }

    #[test]
    fn backspace_and_mode_switch() {
        let mut ed = IntcodeEditor::new(IntcodeMode::Unicode);
        let mut cands = CandidateList::new();
        type_hex(&mut ed, "4e");
        assert_eq!(
            ed.backspace(&mut cands),
            EditorOutput::preedit(Some(FeedbackEvent::KeyDelete))
        );
        assert_eq!(ed.preedit(), "U+4");
        ed.set_mode(IntcodeMode::Big5);
        assert_eq!(ed.digits(), "");
        assert_eq!(ed.backspace(&mut cands), EditorOutput::ignored());
    }
}
