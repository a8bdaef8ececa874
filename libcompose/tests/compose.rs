//! End-to-end sessions against data files written to a temporary directory.

use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

use libcompose::{
    CompositionContext, FeedbackEvent, InputMethod, KeyEvent, KeyResult, KeyboardLayout,
    Registry, ZhuyinConfig, PHO_FILE, TSIN_FILE,
};
use libcompose_core::{GtabTable, LoadError, PhoDictionary};
use libzhuyin::{pho2key, PhoneticSlots};
use tempfile::TempDir;

fn write_data(dir: &TempDir) {
    // ㄉㄜ (space tone) -> 的, ㄇㄚˇ -> three candidates
    let de = pho2key(&PhoneticSlots::new(5, 0, 3, 1));
    let ma3 = pho2key(&PhoneticSlots::new(3, 0, 1, 3));
    let dict = PhoDictionary::from_entries(vec![
        (de, "的", 900),
        (ma3, "馬", 50),
        (ma3, "嗎", 40),
        (ma3, "碼", 10),
    ])
    .unwrap();
    fs::write(dir.path().join(PHO_FILE), dict.to_bytes()).unwrap();

    let mut tsin = Vec::new();
    tsin.extend_from_slice(&2u16.to_le_bytes());
    tsin.extend_from_slice(&2u16.to_le_bytes());
    tsin.extend_from_slice(&42i32.to_le_bytes());
    fs::write(dir.path().join(TSIN_FILE), tsin).unwrap();

    // index 0 is a placeholder so single-key codes stay distinct
    let mut cj = GtabTable::new("倉五", "`abcdefghijklmnopqrstuvwxyz", 5).unwrap();
    cj.push_item("a", "日").unwrap();
    cj.push_item("aa", "昌").unwrap();
    cj.push_item("ab", "明").unwrap();
    fs::write(dir.path().join("cj5.gtab"), cj.to_bytes()).unwrap();
}

fn setup() -> (TempDir, Registry) {
    let dir = TempDir::new().unwrap();
    write_data(&dir);
    let mut registry = Registry::new([dir.path()]);
    registry.load_pho(PHO_FILE).unwrap();
    (dir, registry)
}

fn type_keys(ctx: &mut CompositionContext, keys: &str) -> Vec<KeyResult> {
    keys.chars()
        .map(|key| ctx.process_key(key as u32, key as u32, 0))
        .collect()
}

#[test]
fn phonetic_syllable_commits_its_only_candidate() {
    let (_dir, registry) = setup();
    let mut ctx = CompositionContext::new(&registry);
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    ctx.set_feedback_sink(Box::new(move |e: FeedbackEvent| sink.borrow_mut().push(e)));

    assert_eq!(
        type_keys(&mut ctx, "2k "),
        vec![KeyResult::Preedit, KeyResult::Preedit, KeyResult::Commit]
    );
    assert_eq!(ctx.take_commit(), "的");
    assert_eq!(ctx.preedit(), "");
    assert_eq!(
        *events.borrow(),
        vec![
            FeedbackEvent::KeyPress,
            FeedbackEvent::KeyPress,
            FeedbackEvent::Candidate
        ]
    );
}

#[test]
fn backspace_walks_back_to_empty() {
    let (_dir, registry) = setup();
    let mut ctx = CompositionContext::new(&registry);
    type_keys(&mut ctx, "2k");
    assert_eq!(ctx.process_event(KeyEvent::backspace()), KeyResult::Preedit);
    assert_eq!(ctx.preedit(), "ㄉ");
    assert_eq!(ctx.process_event(KeyEvent::backspace()), KeyResult::Preedit);
    assert_eq!(ctx.process_event(KeyEvent::backspace()), KeyResult::Ignored);
    assert!(!ctx.has_input());
}

#[test]
fn pending_candidates_render_in_the_view() {
    let (_dir, registry) = setup();
    let mut ctx = CompositionContext::new(&registry);
    type_keys(&mut ctx, "a84");
    let view = ctx.view();
    assert_eq!(view.preedit_text, "ㄇㄚˇ");
    assert_eq!(view.candidates.len(), 3);
    assert_eq!(view.num_pages, 1);
    assert_eq!(view.auxiliary_text, "");
    assert!(view.chinese_mode);

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["preedit_text"], "ㄇㄚˇ");
    assert_eq!(json["selection_keys"], "1234567890");
}

#[test]
fn gtab_loaded_by_id_from_data_dir() {
    let (_dir, mut registry) = setup();
    let mut ctx = CompositionContext::new(&registry);
    ctx.load_gtab_by_id(&mut registry, 1).unwrap();
    assert_eq!(ctx.method(), InputMethod::Table);
    assert_eq!(ctx.current_table_name(), "倉五");
    assert!(registry.is_table_loaded("cj5.gtab"));

    type_keys(&mut ctx, "a");
    assert_eq!(ctx.candidate_count(), 3);
    assert_eq!(ctx.candidate(0), Some("日"));
    assert_eq!(type_keys(&mut ctx, " "), vec![KeyResult::Commit]);
    assert_eq!(ctx.take_commit(), "日");

    type_keys(&mut ctx, "ab");
    assert_eq!(ctx.gtab_key_string(), "ab");
    assert_eq!(ctx.candidate_count(), 1);
    assert_eq!(ctx.process_event(KeyEvent::enter()), KeyResult::Ignored);
    assert_eq!(type_keys(&mut ctx, "1"), vec![KeyResult::Commit]);
    assert_eq!(ctx.take_commit(), "明");
}

#[test]
fn missing_table_leaves_method_alone() {
    let (_dir, mut registry) = setup();
    let mut ctx = CompositionContext::new(&registry);
    let err = ctx.load_gtab(&mut registry, "nope.gtab").unwrap_err();
    assert!(matches!(err, LoadError::NotFound { .. }));
    assert_eq!(ctx.method(), InputMethod::Phonetic);
    assert_eq!(ctx.current_table_name(), "");
}

#[test]
fn phrase_session_builds_and_commits() {
    let (_dir, mut registry) = setup();
    let mut ctx = CompositionContext::new(&registry);
    let header = ctx.load_tsin(&mut registry, TSIN_FILE).unwrap();
    assert_eq!(header.idx_count, 2);
    assert_eq!(header.phrase_count, 42);
    assert_eq!(ctx.method(), InputMethod::Phrase);

    type_keys(&mut ctx, "2k ");
    type_keys(&mut ctx, "a84");
    let picked = ctx.candidate(2).unwrap().to_string();
    type_keys(&mut ctx, "3");
    assert_eq!(ctx.preedit(), format!("的{}", picked));

    assert_eq!(ctx.process_event(KeyEvent::backspace()), KeyResult::Preedit);
    assert_eq!(ctx.tsin_phrase(), "的");
    assert_eq!(ctx.process_event(KeyEvent::enter()), KeyResult::Commit);
    assert_eq!(ctx.take_commit(), "的");
}

#[test]
fn settings_file_configures_the_session() {
    let (dir, registry) = setup();
    let path = dir.path().join("compose.toml");
    fs::write(
        &path,
        "keyboard_layout = \"eten\"\nselection_keys = \"asdf\"\ncandidates_per_page = 2\n",
    )
    .unwrap();
    let config = ZhuyinConfig::load_toml(&path).unwrap();
    let mut ctx = CompositionContext::with_config(&registry, config);
    assert_eq!(ctx.keyboard_layout(), KeyboardLayout::Eten);
    assert_eq!(ctx.candidates_per_page(), 2);

    // ETEN: m = ㄇ, a = ㄚ, 9 = ˇ
    type_keys(&mut ctx, "ma9");
    assert_eq!(ctx.candidate_count(), 3);
    assert!(ctx.page_down());
    let third = ctx.candidate(2).unwrap().to_string();
    assert_eq!(type_keys(&mut ctx, "a"), vec![KeyResult::Commit]);
    assert_eq!(ctx.take_commit(), third);
}

#[test]
fn intcode_session() {
    let (_dir, registry) = setup();
    let mut ctx = CompositionContext::new(&registry);
    ctx.set_method(InputMethod::Intcode);
    assert_eq!(
        type_keys(&mut ctx, "01F600"),
        vec![
            KeyResult::Preedit,
            KeyResult::Preedit,
            KeyResult::Preedit,
            KeyResult::Preedit,
            KeyResult::Preedit,
            KeyResult::Commit
        ]
    );
    assert_eq!(ctx.take_commit(), "😀");
    assert_eq!(type_keys(&mut ctx, "z"), vec![KeyResult::Ignored]);
}
