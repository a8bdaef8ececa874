//! Typing syllables on every keyboard layout against a dictionary on disk.

use std::collections::BTreeMap;
use std::fs;
use std::sync::Arc;

use libcompose_core::{CandidateList, Editor, EditorResult, PhoDictionary};
use libzhuyin::{pho2key, render, KeyboardLayout, PhoneticEditor, PhoneticSlots};
use tempfile::TempDir;

/// (layout, keys, slots the keys must produce)
const CASES: &[(KeyboardLayout, &str, [u8; 4])] = &[
    (KeyboardLayout::Standard, "2k7", [5, 0, 3, 5]),
    (KeyboardLayout::Standard, "5j/ ", [15, 2, 12, 1]),
    (KeyboardLayout::Hsu, "do ", [5, 0, 2, 1]),
    (KeyboardLayout::Eten, "dw8", [5, 0, 3, 5]),
    (KeyboardLayout::Eten, ";i4 ", [15, 2, 12, 1]),
    (KeyboardLayout::Eten26, "de ", [5, 0, 3, 1]),
    (KeyboardLayout::Ibm, "5c;", [5, 0, 3, 5]),
    (KeyboardLayout::Ibm, "rog ", [15, 2, 12, 1]),
    (KeyboardLayout::Pinyin, "de5", [5, 0, 3, 5]),
    (KeyboardLayout::Dvorak, "2t7", [5, 0, 3, 5]),
    (KeyboardLayout::Dvorak, "5hz ", [15, 2, 12, 1]),
];

fn slots(values: [u8; 4]) -> PhoneticSlots {
    PhoneticSlots::new(values[0], values[1], values[2], values[3])
}

/// Each syllable's entry is its own Bopomofo rendering.
fn dictionary_from_disk(dir: &TempDir) -> Arc<PhoDictionary> {
    let entries: BTreeMap<u16, String> = CASES
        .iter()
        .map(|&(_, _, values)| (pho2key(&slots(values)), render(&slots(values))))
        .collect();
    let built =
        PhoDictionary::from_entries(entries.iter().map(|(&key, text)| (key, text.as_str(), 1)))
            .unwrap();

    let path = dir.path().join("pho.tab2");
    fs::write(&path, built.to_bytes()).unwrap();
    Arc::new(PhoDictionary::load(&path).unwrap())
}

fn type_keys(editor: &mut PhoneticEditor, keys: &str) -> Option<String> {
    let mut cands = CandidateList::new();
    let mut committed = None;
    for key in keys.chars() {
        if let EditorResult::Commit(text) = editor.process_char(key, &mut cands).result {
            committed = Some(text);
        }
    }
    committed
}

#[test]
fn every_layout_reaches_its_entries() {
    let dir = TempDir::new().unwrap();
    let dict = dictionary_from_disk(&dir);
    for &(layout, keys, values) in CASES {
        let mut editor = PhoneticEditor::new(layout, Some(Arc::clone(&dict)));
        let expected = render(&slots(values));
        assert_eq!(
            type_keys(&mut editor, keys),
            Some(expected),
            "{} {:?}",
            layout,
            keys
        );
        assert!(!editor.has_input());
    }
}

#[test]
fn shadowed_components_are_unreachable() {
    // HSU 'r' is ㄖ before it is ㄜ, so after ㄉ it overwrites the initial
    let mut editor = PhoneticEditor::new(KeyboardLayout::Hsu, None);
    let mut cands = CandidateList::new();
    editor.process_char('d', &mut cands);
    editor.process_char('r', &mut cands);
    assert_eq!(editor.slots(), &PhoneticSlots::new(18, 0, 0, 0));
    assert_eq!(editor.preedit(), "ㄖ");
}

#[test]
fn uppercase_keys_type_the_same_syllable() {
    let dir = TempDir::new().unwrap();
    let dict = dictionary_from_disk(&dir);
    let mut editor = PhoneticEditor::new(KeyboardLayout::Standard, Some(dict));
    assert_eq!(type_keys(&mut editor, "2K7").as_deref(), Some("ㄉㄜ˙"));
}
