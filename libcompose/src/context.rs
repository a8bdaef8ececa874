//! Composition context: one per input session.
//!
//! The context owns the active method's editor, the candidate list and the
//! commit buffer. Every key goes through [`CompositionContext::process_key`],
//! which handles selection keys, Escape, Enter and Backspace before routing
//! printable characters to the active editor.

use std::fmt;
use std::sync::Arc;

use libcompose_core::codepoint::IntcodeMode;
use libcompose_core::editor::{Editor, EditorOutput, EditorResult};
use libcompose_core::utils::truncate_to_boundary;
use libcompose_core::{
    AnnotationSource, CandidateList, CandidateStyle, Charset, ColorScheme, ComposeView,
    FeedbackEvent, FeedbackSink, GtabTable, InputMethod, LoadResult, NoAnnotations, PhoDictionary,
    PreeditAttr, Punctuator, Registry, TsinHeader, VariantConverter, MAX_TEXT_LEN,
};
use libzhuyin::{KeyboardLayout, LayoutError, PhoneticEditor, PhraseEditor, ZhuyinConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::gtab::TableEditor;
use crate::intcode::IntcodeEditor;

pub const KEY_BACKSPACE: u32 = 0x08;
pub const KEY_ENTER: u32 = 0x0D;
pub const KEY_ESCAPE: u32 = 0x1B;

/// A raw key event as delivered by the platform adapter.
///
/// Control keys are recognised in either `keycode` or `charcode`.
/// `modifiers` is carried along but not interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub keycode: u32,
    pub charcode: u32,
    pub modifiers: u32,
}

impl KeyEvent {
    pub fn new(keycode: u32, charcode: u32, modifiers: u32) -> Self {
        Self {
            keycode,
            charcode,
            modifiers,
        }
    }

    pub fn from_char(ch: char) -> Self {
        Self::new(ch as u32, ch as u32, 0)
    }

    pub fn backspace() -> Self {
        Self::new(KEY_BACKSPACE, KEY_BACKSPACE, 0)
    }

    pub fn enter() -> Self {
        Self::new(KEY_ENTER, KEY_ENTER, 0)
    }

    pub fn escape() -> Self {
        Self::new(KEY_ESCAPE, KEY_ESCAPE, 0)
    }

    fn is(&self, code: u32) -> bool {
        self.keycode == code || self.charcode == code
    }

    /// The character for charcodes 1..=127.
    pub fn printable(&self) -> Option<char> {
        if (1..=127).contains(&self.charcode) {
            char::from_u32(self.charcode)
        } else {
            None
        }
    }
}

/// Result of processing a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyResult {
    /// Key was not handled; pass it to the application
    Ignored,
    /// Key was consumed with no visible change
    Absorbed,
    /// Text is waiting in the commit buffer
    Commit,
    /// Preedit or candidates changed
    Preedit,
}

/// The active method and its editor state.
#[derive(Debug, Clone)]
pub enum ActiveMethod {
    Phonetic(PhoneticEditor),
    Phrase(PhraseEditor),
    Table(TableEditor),
    Codepoint(IntcodeEditor),
    /// A method whose engine is not bundled; every key is ignored.
    External(InputMethod),
}

impl ActiveMethod {
    pub fn kind(&self) -> InputMethod {
        match self {
            ActiveMethod::Phonetic(_) => InputMethod::Phonetic,
            ActiveMethod::Phrase(_) => InputMethod::Phrase,
            ActiveMethod::Table(_) => InputMethod::Table,
            ActiveMethod::Codepoint(_) => InputMethod::Intcode,
            ActiveMethod::External(method) => *method,
        }
    }

    pub fn editor(&self) -> Option<&dyn Editor> {
        match self {
            ActiveMethod::Phonetic(ed) => Some(ed),
            ActiveMethod::Phrase(ed) => Some(ed),
            ActiveMethod::Table(ed) => Some(ed),
            ActiveMethod::Codepoint(ed) => Some(ed),
            ActiveMethod::External(_) => None,
        }
    }

    /// Short editor name, `"external"` for unbundled engines.
    pub fn editor_name(&self) -> &'static str {
        self.editor().map_or("external", |editor| editor.name())
    }

    pub fn editor_mut(&mut self) -> Option<&mut dyn Editor> {
        match self {
            ActiveMethod::Phonetic(ed) => Some(ed),
            ActiveMethod::Phrase(ed) => Some(ed),
            ActiveMethod::Table(ed) => Some(ed),
            ActiveMethod::Codepoint(ed) => Some(ed),
            ActiveMethod::External(_) => None,
        }
    }
}

/// Per-session composition state.
pub struct CompositionContext {
    config: ZhuyinConfig,
    chinese_mode: bool,
    method: ActiveMethod,

    dictionary: Option<Arc<PhoDictionary>>,
    table: Option<Arc<GtabTable>>,
    tsin: Option<TsinHeader>,

    candidates: CandidateList,
    commit: String,
    punctuator: Punctuator,

    feedback: Option<Box<dyn FeedbackSink>>,
    annotations: Box<dyn AnnotationSource>,
    converter: Option<Box<dyn VariantConverter>>,
}

impl fmt::Debug for CompositionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositionContext")
            .field("config", &self.config)
            .field("chinese_mode", &self.chinese_mode)
            .field("method", &self.method)
            .field("candidates", &self.candidates.len())
            .field("commit", &self.commit)
            .finish_non_exhaustive()
    }
}

impl CompositionContext {
    /// Create a context with default settings, using the registry's phonetic
    /// dictionary if one is loaded.
    pub fn new(registry: &Registry) -> Self {
        Self::with_config(registry, ZhuyinConfig::default())
    }

    pub fn with_config(registry: &Registry, config: ZhuyinConfig) -> Self {
        let dictionary = registry.pho_dictionary();
        let method = ActiveMethod::Phonetic(PhoneticEditor::new(
            config.keyboard_layout,
            dictionary.clone(),
        ));
        Self {
            candidates: CandidateList::with_page_size(config.base.candidates_per_page),
            config,
            chinese_mode: true,
            method,
            dictionary,
            table: None,
            tsin: registry.tsin_header(),
            commit: String::new(),
            punctuator: Punctuator::new(),
            feedback: None,
            annotations: Box::new(NoAnnotations),
            converter: None,
        }
    }

    pub fn config(&self) -> &ZhuyinConfig {
        &self.config
    }

    /// Pick up a dictionary loaded into the registry after creation.
    pub fn refresh_dictionary(&mut self, registry: &Registry) {
        self.dictionary = registry.pho_dictionary();
        match &mut self.method {
            ActiveMethod::Phonetic(ed) => ed.set_dictionary(self.dictionary.clone()),
            ActiveMethod::Phrase(ed) => ed.phonetic_mut().set_dictionary(self.dictionary.clone()),
            _ => {}
        }
    }

    // ========== Key processing ==========

    pub fn process_key(&mut self, keycode: u32, charcode: u32, modifiers: u32) -> KeyResult {
        self.process_event(KeyEvent::new(keycode, charcode, modifiers))
    }

    pub fn process_event(&mut self, event: KeyEvent) -> KeyResult {
        if !self.chinese_mode {
            return KeyResult::Ignored;
        }
        if let Some(result) = self.try_selection(&event) {
            return result;
        }
        if event.is(KEY_ESCAPE) {
            return self.escape();
        }
        if event.is(KEY_ENTER) {
            return self.enter();
        }
        if event.is(KEY_BACKSPACE) {
            return self.backspace();
        }
        match event.printable() {
            Some(ch) => self.route_char(ch),
            None => KeyResult::Ignored,
        }
    }

    fn try_selection(&mut self, event: &KeyEvent) -> Option<KeyResult> {
        if self.candidates.is_empty() {
            return None;
        }
        let key = event.printable()?;
        let index = self
            .candidates
            .index_for_selection_key(&self.config.base.selection_keys, key)?;
        let text = self.candidates.get(index)?.text.clone();
        Some(self.accept_candidate(text))
    }

    fn accept_candidate(&mut self, text: String) -> KeyResult {
        debug!(%text, "candidate selected");
        self.candidates.clear();
        let result = match self.method.editor_mut() {
            Some(editor) => editor.select(text),
            None => EditorResult::Commit(text),
        };
        self.emit(FeedbackEvent::Candidate);
        self.apply(result)
    }

    fn escape(&mut self) -> KeyResult {
        if !self.has_input() {
            return KeyResult::Ignored;
        }
        self.reset();
        KeyResult::Absorbed
    }

    fn enter(&mut self) -> KeyResult {
        let result = match self.method.editor_mut() {
            Some(editor) => editor.enter(&mut self.candidates),
            None => EditorResult::Ignored,
        };
        self.emit(FeedbackEvent::KeyEnter);
        self.apply(result)
    }

    fn backspace(&mut self) -> KeyResult {
        let output = match self.method.editor_mut() {
            Some(editor) => editor.backspace(&mut self.candidates),
            None => EditorOutput::ignored(),
        };
        self.finish(output)
    }

    fn route_char(&mut self, ch: char) -> KeyResult {
        let output = match self.method.editor_mut() {
            Some(editor) => {
                trace!(editor = editor.name(), key = %ch, "routing key");
                editor.process_char(ch, &mut self.candidates)
            }
            None => EditorOutput::ignored(),
        };
        if self.config.base.charset == Charset::Simplified {
            self.convert_candidates_to_variant();
        }
        self.finish(output)
    }

    fn finish(&mut self, output: EditorOutput) -> KeyResult {
        if let Some(event) = output.feedback {
            self.emit(event);
        }
        self.apply(output.result)
    }

    fn apply(&mut self, result: EditorResult) -> KeyResult {
        match result {
            EditorResult::Ignored => KeyResult::Ignored,
            EditorResult::Absorbed => KeyResult::Absorbed,
            EditorResult::Preedit => KeyResult::Preedit,
            EditorResult::Commit(text) => {
                if !self.has_editor_input() {
                    self.candidates.clear();
                }
                self.set_commit(text);
                KeyResult::Commit
            }
        }
    }

    fn set_commit(&mut self, text: String) {
        let mut text = match (&self.converter, self.config.base.charset) {
            (Some(converter), Charset::Simplified) => converter.to_simplified(&text),
            _ => text,
        };
        truncate_to_boundary(&mut text, MAX_TEXT_LEN - 1);
        self.commit = text;
    }

    fn emit(&mut self, event: FeedbackEvent) {
        if let Some(sink) = self.feedback.as_mut() {
            sink.on_feedback(event);
        }
    }

    fn has_editor_input(&self) -> bool {
        self.method.editor().is_some_and(|editor| editor.has_input())
    }

    /// Whether anything is being composed (Escape only acts when true).
    pub fn has_input(&self) -> bool {
        !self.candidates.is_empty() || self.has_editor_input()
    }

    /// Clear composition state. Settings and the commit buffer are kept.
    pub fn reset(&mut self) {
        if let Some(editor) = self.method.editor_mut() {
            editor.reset();
        }
        self.candidates.clear();
    }

    // ========== Output ==========

    pub fn preedit(&self) -> String {
        let mut preedit = self
            .method
            .editor()
            .map(|editor| editor.preedit())
            .unwrap_or_default();
        truncate_to_boundary(&mut preedit, MAX_TEXT_LEN - 1);
        preedit
    }

    /// Cursor position in bytes; always the end of the preedit.
    pub fn preedit_cursor(&self) -> usize {
        self.preedit().len()
    }

    pub fn preedit_attrs(&self) -> Vec<PreeditAttr> {
        PreeditAttr::for_preedit(&self.preedit())
    }

    /// Bopomofo for the syllable being typed, when a Zhuyin method is active.
    pub fn bopomofo_string(&self) -> String {
        match &self.method {
            ActiveMethod::Phonetic(ed) => ed.preedit(),
            ActiveMethod::Phrase(ed) => ed.phonetic().preedit(),
            _ => String::new(),
        }
    }

    pub fn commit_text(&self) -> &str {
        &self.commit
    }

    /// Take the committed text, leaving the buffer empty.
    pub fn take_commit(&mut self) -> String {
        std::mem::take(&mut self.commit)
    }

    pub fn clear_commit(&mut self) {
        self.commit.clear();
    }

    /// Snapshot of everything a host draws.
    pub fn view(&self) -> ComposeView {
        let preedit_text = self.preedit();
        let candidates: Vec<String> = self
            .candidates
            .current_page_candidates()
            .iter()
            .map(|c| c.text.clone())
            .collect();
        let annotations = if self.config.base.pinyin_annotation {
            candidates
                .iter()
                .map(|text| self.annotations.annotate(text))
                .collect()
        } else {
            Vec::new()
        };
        let num_pages = self.candidates.num_pages();
        ComposeView {
            preedit_cursor: preedit_text.len(),
            preedit_attrs: PreeditAttr::for_preedit(&preedit_text),
            preedit_text,
            commit_text: self.commit.clone(),
            candidates,
            annotations,
            selection_keys: self.config.base.selection_keys.clone(),
            page: self.candidates.current_page(),
            num_pages,
            auxiliary_text: if num_pages > 1 {
                format!("{}/{}", self.candidates.current_page() + 1, num_pages)
            } else {
                String::new()
            },
            chinese_mode: self.chinese_mode,
            method: self.method.kind().name().to_string(),
        }
    }

    // ========== Method and mode ==========

    pub fn method(&self) -> InputMethod {
        self.method.kind()
    }

    pub fn active(&self) -> &ActiveMethod {
        &self.method
    }

    /// Switch the active method. Composition is reset and a mode-change
    /// event is raised.
    pub fn set_method(&mut self, method: InputMethod) {
        debug!(from = ?self.method.kind(), to = ?method, "switching input method");
        self.candidates.clear();
        self.method = self.editor_for(method);
        self.emit(FeedbackEvent::ModeChange);
    }

    fn editor_for(&self, method: InputMethod) -> ActiveMethod {
        let layout = self.config.keyboard_layout;
        match method {
            InputMethod::Phonetic => {
                ActiveMethod::Phonetic(PhoneticEditor::new(layout, self.dictionary.clone()))
            }
            InputMethod::Phrase => {
                ActiveMethod::Phrase(PhraseEditor::new(layout, self.dictionary.clone()))
            }
            InputMethod::Table => ActiveMethod::Table(TableEditor::new(self.table.clone())),
            InputMethod::Intcode => {
                ActiveMethod::Codepoint(IntcodeEditor::new(self.config.base.intcode_mode))
            }
            InputMethod::Anthy | InputMethod::Chewing => ActiveMethod::External(method),
        }
    }

    /// Whether `method` can run here. Phonetic input needs a dictionary
    /// and external engines are never bundled.
    pub fn is_method_available(&self, method: InputMethod) -> bool {
        method.is_available(self.dictionary.is_some())
    }

    pub fn is_method_external(&self, method: InputMethod) -> bool {
        method.is_external()
    }

    /// Methods that can run here, in registry order.
    pub fn available_methods(&self) -> Vec<InputMethod> {
        InputMethod::ALL
            .into_iter()
            .filter(|&method| self.is_method_available(method))
            .collect()
    }

    pub fn is_chinese_mode(&self) -> bool {
        self.chinese_mode
    }

    /// Flip between Chinese and Latin mode. Returns the new mode.
    pub fn toggle_chinese_mode(&mut self) -> bool {
        self.chinese_mode = !self.chinese_mode;
        self.reset();
        self.emit(FeedbackEvent::ModeChange);
        self.chinese_mode
    }

    /// Turning Chinese mode off resets composition.
    pub fn set_chinese_mode(&mut self, chinese: bool) {
        let changed = self.chinese_mode != chinese;
        self.chinese_mode = chinese;
        if !chinese {
            self.reset();
        }
        if changed {
            self.emit(FeedbackEvent::ModeChange);
        }
    }

    // ========== Candidates ==========

    pub fn has_candidates(&self) -> bool {
        !self.candidates.is_empty()
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    /// Candidate text by absolute index.
    pub fn candidate(&self, index: usize) -> Option<&str> {
        self.candidates.get(index).map(|c| c.text.as_str())
    }

    /// Candidate text with its annotation. The annotation is empty unless
    /// pinyin annotation is enabled.
    pub fn candidate_with_annotation(&self, index: usize) -> Option<(String, String)> {
        let text = self.candidate(index)?.to_string();
        let annotation = if self.config.base.pinyin_annotation {
            self.annotations.annotate(&text)
        } else {
            String::new()
        };
        Some((text, annotation))
    }

    pub fn candidates(&self) -> &CandidateList {
        &self.candidates
    }

    pub fn candidate_page(&self) -> usize {
        self.candidates.current_page()
    }

    pub fn candidates_per_page(&self) -> usize {
        self.candidates.page_size()
    }

    pub fn page_up(&mut self) -> bool {
        self.candidates.page_up()
    }

    pub fn page_down(&mut self) -> bool {
        self.candidates.page_down()
    }

    /// Select the candidate at `page_position` on the current page.
    pub fn select_candidate(&mut self, page_position: usize) -> KeyResult {
        let Some(text) = self
            .candidates
            .select_on_page(page_position)
            .map(|c| c.text.clone())
        else {
            return KeyResult::Ignored;
        };
        self.accept_candidate(text)
    }

    // ========== Settings ==========

    pub fn keyboard_layout(&self) -> KeyboardLayout {
        self.config.keyboard_layout
    }

    /// Change the keyboard layout. Composition is reset.
    pub fn set_keyboard_layout(&mut self, layout: KeyboardLayout) {
        self.config.keyboard_layout = layout;
        match &mut self.method {
            ActiveMethod::Phonetic(ed) => ed.set_layout(layout),
            ActiveMethod::Phrase(ed) => ed.phonetic_mut().set_layout(layout),
            _ => {}
        }
        self.reset();
    }

    /// Change the layout by name or alias; unknown names leave it unchanged.
    pub fn set_keyboard_layout_by_name(&mut self, name: &str) -> Result<(), LayoutError> {
        let layout = KeyboardLayout::from_name(name)?;
        self.set_keyboard_layout(layout);
        Ok(())
    }

    /// Returns false (keeping the current keys) for empty or over-long strings.
    pub fn set_selection_keys(&mut self, keys: &str) -> bool {
        self.config.base.set_selection_keys(keys)
    }

    pub fn selection_keys(&self) -> &str {
        &self.config.base.selection_keys
    }

    pub fn set_candidates_per_page(&mut self, count: usize) {
        self.config.base.set_candidates_per_page(count);
        self.candidates
            .set_page_size(self.config.base.candidates_per_page);
    }

    pub fn charset(&self) -> Charset {
        self.config.base.charset
    }

    pub fn set_charset(&mut self, charset: Charset) {
        self.config.base.charset = charset;
    }

    pub fn toggle_charset(&mut self) -> Charset {
        self.config.base.charset = self.config.base.charset.toggled();
        self.config.base.charset
    }

    pub fn set_candidate_style(&mut self, style: CandidateStyle) {
        self.config.base.candidate_style = style;
    }

    pub fn set_color_scheme(&mut self, scheme: ColorScheme) {
        self.config.base.color_scheme = scheme;
    }

    pub fn set_system_dark_mode(&mut self, dark: bool) {
        self.config.base.system_dark_mode = dark;
    }

    pub fn is_dark(&self) -> bool {
        self.config.base.is_dark()
    }

    pub fn set_smart_punctuation(&mut self, enabled: bool) {
        self.config.base.smart_punctuation = enabled;
    }

    pub fn set_pinyin_annotation(&mut self, enabled: bool) {
        self.config.base.pinyin_annotation = enabled;
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.config.base.sound_enabled = enabled;
    }

    pub fn set_vibration_enabled(&mut self, enabled: bool) {
        self.config.base.vibration_enabled = enabled;
    }

    /// Clamped to 1..=500 ms.
    pub fn set_vibration_duration(&mut self, ms: u32) {
        self.config.base.set_vibration_duration(ms);
    }

    // ========== Hooks ==========

    pub fn set_feedback_sink(&mut self, sink: Box<dyn FeedbackSink>) {
        self.feedback = Some(sink);
    }

    pub fn clear_feedback_sink(&mut self) {
        self.feedback = None;
    }

    pub fn set_annotation_source(&mut self, source: Box<dyn AnnotationSource>) {
        self.annotations = source;
    }

    pub fn set_variant_converter(&mut self, converter: Box<dyn VariantConverter>) {
        self.converter = Some(converter);
    }

    /// Convert text for the current charset. Without a converter the text
    /// is returned unchanged.
    pub fn convert_to_output_variant(&self, text: &str) -> String {
        match &self.converter {
            Some(converter) => converter.convert(text, self.config.base.charset),
            None => text.to_string(),
        }
    }

    /// Convert pending candidates to simplified when that charset is active.
    pub fn convert_candidates_to_variant(&mut self) {
        if self.config.base.charset != Charset::Simplified {
            return;
        }
        if let Some(converter) = &self.converter {
            self.candidates.map_text(|text| converter.to_simplified(text));
        }
    }

    // ========== Punctuation ==========

    /// Full-width form of an ASCII punctuation character, when smart
    /// punctuation is enabled.
    pub fn convert_punctuation(&mut self, ascii: char) -> Option<&'static str> {
        self.punctuator
            .convert(ascii, self.config.base.smart_punctuation)
    }

    pub fn reset_punctuation_state(&mut self) {
        self.punctuator.reset();
    }

    // ========== Tables ==========

    /// Load a GTAB table through the registry and switch to it.
    pub fn load_gtab(&mut self, registry: &mut Registry, filename: &str) -> LoadResult<()> {
        let table = registry.load_gtab(filename)?;
        self.use_table(table);
        Ok(())
    }

    pub fn load_gtab_by_id(&mut self, registry: &mut Registry, id: u32) -> LoadResult<()> {
        let table = registry.load_gtab_by_id(id)?;
        self.use_table(table);
        Ok(())
    }

    /// Switch to an already-loaded table.
    pub fn use_table(&mut self, table: Arc<GtabTable>) {
        debug!(name = %table.name, max_press = table.max_press, "using table");
        self.table = Some(table);
        self.set_method(InputMethod::Table);
    }

    /// Display name of the current table, empty when none is loaded.
    pub fn current_table_name(&self) -> &str {
        self.table.as_deref().map_or("", |t| t.name.as_str())
    }

    /// Keys typed into the table editor.
    pub fn gtab_key_string(&self) -> &str {
        match &self.method {
            ActiveMethod::Table(ed) => ed.key_string(),
            _ => "",
        }
    }

    /// Load the phrase database header and switch to the phrase method.
    pub fn load_tsin(&mut self, registry: &mut Registry, file: &str) -> LoadResult<TsinHeader> {
        let header = registry.load_tsin(file)?;
        self.tsin = Some(header);
        self.set_method(InputMethod::Phrase);
        Ok(header)
    }

    pub fn tsin_header(&self) -> Option<TsinHeader> {
        self.tsin
    }

    /// Phrase accumulated in the phrase method.
    pub fn tsin_phrase(&self) -> &str {
        match &self.method {
            ActiveMethod::Phrase(ed) => ed.phrase(),
            _ => "",
        }
    }

    /// Move the accumulated phrase to the commit buffer. Returns its length
    /// in bytes (0 when there was nothing to commit).
    pub fn tsin_commit_phrase(&mut self) -> usize {
        let ActiveMethod::Phrase(ed) = &mut self.method else {
            return 0;
        };
        if ed.phrase().is_empty() {
            return 0;
        }
        match ed.enter(&mut self.candidates) {
            EditorResult::Commit(text) => {
                let len = text.len();
                self.set_commit(text);
                len
            }
            _ => 0,
        }
    }

    // ========== Intcode ==========

    pub fn intcode_mode(&self) -> IntcodeMode {
        self.config.base.intcode_mode
    }

    /// Change the intcode mode. Any typed digits are discarded.
    pub fn set_intcode_mode(&mut self, mode: IntcodeMode) {
        self.config.base.intcode_mode = mode;
        if let ActiveMethod::Codepoint(ed) = &mut self.method {
            ed.set_mode(mode);
        }
    }

    pub fn intcode_buffer(&self) -> &str {
        match &self.method {
            ActiveMethod::Codepoint(ed) => ed.digits(),
            _ => "",
        }
    }
}

/// `process_key` on an optional context; no context means `Ignored`.
pub fn process_key_opt(
    ctx: Option<&mut CompositionContext>,
    keycode: u32,
    charcode: u32,
    modifiers: u32,
) -> KeyResult {
    ctx.map_or(KeyResult::Ignored, |ctx| {
        ctx.process_key(keycode, charcode, modifiers)
    })
}

/// Preedit of an optional context; empty without one.
pub fn preedit_opt(ctx: Option<&CompositionContext>) -> String {
    ctx.map(CompositionContext::preedit).unwrap_or_default()
}

/// Commit text of an optional context; empty without one.
pub fn commit_opt(ctx: Option<&CompositionContext>) -> &str {
    ctx.map_or("", CompositionContext::commit_text)
}

pub fn candidate_count_opt(ctx: Option<&CompositionContext>) -> usize {
    ctx.map_or(0, CompositionContext::candidate_count)
}

pub fn is_chinese_mode_opt(ctx: Option<&CompositionContext>) -> bool {
    ctx.is_some_and(CompositionContext::is_chinese_mode)
}

/// Method availability on an optional context; nothing is available without one.
pub fn is_method_available_opt(ctx: Option<&CompositionContext>, method: InputMethod) -> bool {
    ctx.is_some_and(|ctx| ctx.is_method_available(method))
}

/// Active method of an optional context; Phonetic without one.
pub fn method_opt(ctx: Option<&CompositionContext>) -> InputMethod {
    ctx.map_or(InputMethod::Phonetic, CompositionContext::method)
}
