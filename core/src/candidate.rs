//! Candidate types for composition lookups.
//!
//! This module provides:
//! - `Candidate`: a single selectable output string
//! - `CandidateList`: a bounded, paginated list with selection-key mapping
//! - `AnnotationSource`: per-candidate annotation hook (pronunciation hints)

use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::utils::truncate_to_boundary;

/// Maximum number of candidates a single lookup may produce.
pub const MAX_CANDIDATES: usize = 100;

/// Maximum stored length of one candidate, in bytes.
pub const MAX_CANDIDATE_LEN: usize = 64;

/// Default number of candidates shown per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// A single selectable candidate.
///
/// `usage` carries the dictionary usage count when the source table has one
/// (phonetic dictionary); table-driven methods leave it at 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub text: String,
    pub usage: i32,
}

impl Candidate {
    pub fn new<T: Into<String>>(text: T, usage: i32) -> Self {
        let mut text = text.into();
        truncate_to_boundary(&mut text, MAX_CANDIDATE_LEN - 1);
        Candidate { text, usage }
    }
}

/// A bounded list of candidates with page navigation.
///
/// The list never holds more than [`MAX_CANDIDATES`] entries; pushes past
/// the capacity are dropped.
#[derive(Debug, Clone)]
pub struct CandidateList {
    candidates: Vec<Candidate>,

    /// Number of candidates per page (1..=10)
    page_size: usize,

    /// Current page index (0-based)
    current_page: usize,
}

impl CandidateList {
    /// Create a new empty candidate list with the default page size.
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    /// Create a candidate list with specified page size.
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            candidates: Vec::with_capacity(MAX_CANDIDATES),
            page_size: page_size.clamp(1, 10),
            current_page: 0,
        }
    }

    /// Set the page size, clamped to 1..=10.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.clamp(1, 10);
        if self.current_page > self.last_page() {
            self.current_page = 0;
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Replace the candidates, resetting to the first page.
    pub fn set_candidates(&mut self, candidates: Vec<Candidate>) {
        self.candidates = candidates;
        self.candidates.truncate(MAX_CANDIDATES);
        self.current_page = 0;
    }

    /// Append one candidate. Returns false when the list is full.
    pub fn push(&mut self, candidate: Candidate) -> bool {
        if self.is_full() {
            return false;
        }
        self.candidates.push(candidate);
        true
    }

    pub fn is_full(&self) -> bool {
        self.candidates.len() >= MAX_CANDIDATES
    }

    /// Get all candidates.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn get(&self, index: usize) -> Option<&Candidate> {
        self.candidates.get(index)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Get the total number of pages.
    pub fn num_pages(&self) -> usize {
        self.candidates.len().div_ceil(self.page_size)
    }

    fn last_page(&self) -> usize {
        self.num_pages().saturating_sub(1)
    }

    /// Get the current page index (0-based).
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    fn current_page_range(&self) -> Range<usize> {
        let start = (self.current_page * self.page_size).min(self.candidates.len());
        let end = (start + self.page_size).min(self.candidates.len());
        start..end
    }

    /// Get the candidates for the current page.
    pub fn current_page_candidates(&self) -> &[Candidate] {
        &self.candidates[self.current_page_range()]
    }

    /// Move to the previous page.
    /// Returns true if the page changed.
    pub fn page_up(&mut self) -> bool {
        if self.current_page > 0 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    /// Move to the next page.
    /// Returns true if the page changed.
    pub fn page_down(&mut self) -> bool {
        if !self.candidates.is_empty() && self.current_page < self.last_page() {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Map an on-page position to an absolute candidate index.
    pub fn absolute_index(&self, page_position: usize) -> Option<usize> {
        let index = self.current_page * self.page_size + page_position;
        (index < self.candidates.len()).then_some(index)
    }

    /// Map a selection key to an absolute candidate index.
    ///
    /// The key's position in `selection_keys` is offset by the current page;
    /// keys not in the string or past the end of the list yield `None`.
    pub fn index_for_selection_key(&self, selection_keys: &str, key: char) -> Option<usize> {
        let position = selection_keys.chars().position(|c| c == key)?;
        self.absolute_index(position)
    }

    /// Select a candidate by on-page position.
    pub fn select_on_page(&self, page_position: usize) -> Option<&Candidate> {
        self.absolute_index(page_position)
            .and_then(|index| self.candidates.get(index))
    }

    /// Clear the candidate list.
    pub fn clear(&mut self) {
        self.candidates.clear();
        self.current_page = 0;
    }

    /// Apply `f` to every candidate's text (used for charset conversion).
    pub fn map_text<F: FnMut(&str) -> String>(&mut self, mut f: F) {
        for candidate in &mut self.candidates {
            let mut text = f(&candidate.text);
            truncate_to_boundary(&mut text, MAX_CANDIDATE_LEN - 1);
            candidate.text = text;
        }
    }
}

impl Default for CandidateList {
    fn default() -> Self {
        Self::new()
    }
}

/// Source of per-candidate annotations (e.g. a pronunciation hint).
pub trait AnnotationSource {
    /// Return the annotation for `text`, or an empty string if none is known.
    fn annotate(&self, text: &str) -> String;
}

/// Annotation source with no data; every candidate gets an empty annotation.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAnnotations;

impl AnnotationSource for NoAnnotations {
    fn annotate(&self, _text: &str) -> String {
        String::new()
    }
}
