//! Positional pattern index: per word, how strongly every other word tends
//! to appear before it, after it, and at which sentence position.
//!
//! Buckets accumulate strengths across analyzed sentences; nothing decays.
//! Rows are ordered maps for deterministic scans, and reads on untracked
//! words yield empty views rather than creating state.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Coarse position of a token within its sentence.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum SentencePosition {
    #[serde(rename = "single_word")]
    SingleWord,
    #[serde(rename = "beginning_sentence")]
    Beginning,
    #[serde(rename = "middle_sentence")]
    Middle,
    #[serde(rename = "end_sentence")]
    End,
}

impl SentencePosition {
    /// Position of token `index` in a sentence of `total` tokens.
    pub fn of(index: usize, total: usize) -> Self {
        if total <= 1 {
            SentencePosition::SingleWord
        } else if index == 0 {
            SentencePosition::Beginning
        } else if index == total - 1 {
            SentencePosition::End
        } else {
            SentencePosition::Middle
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentencePosition::SingleWord => "single_word",
            SentencePosition::Beginning => "beginning_sentence",
            SentencePosition::Middle => "middle_sentence",
            SentencePosition::End => "end_sentence",
        }
    }
}

impl std::fmt::Display for SentencePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accumulated pattern buckets for one word.
#[derive(Debug, Clone, Default)]
pub struct WordPatterns {
    /// Strengths of words observed before this one.
    pub before: BTreeMap<String, f64>,
    /// Strengths of words observed after this one.
    pub after: BTreeMap<String, f64>,
    /// Strengths of co-occurring words, keyed by their sentence position.
    pub position_context: BTreeMap<SentencePosition, BTreeMap<String, f64>>,
}

/// The pattern index over all analyzed sentences.
#[derive(Debug, Clone, Default)]
pub struct PatternIndex {
    words: HashMap<String, WordPatterns>,
}

impl PatternIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one co-occurrence: `other` appeared before or after `current`
    /// at `position`, with the given strength added to both the directional
    /// bucket and the position bucket.
    pub fn accumulate(
        &mut self,
        current: &str,
        other: &str,
        other_is_before: bool,
        position: SentencePosition,
        strength: f64,
    ) {
        let patterns = self.words.entry(current.to_string()).or_default();
        let bucket = if other_is_before {
            &mut patterns.before
        } else {
            &mut patterns.after
        };
        *bucket.entry(other.to_string()).or_insert(0.0) += strength;
        *patterns
            .position_context
            .entry(position)
            .or_default()
            .entry(other.to_string())
            .or_insert(0.0) += strength;
    }

    pub fn patterns(&self, word: &str) -> Option<&WordPatterns> {
        self.words.get(word)
    }

    /// Accumulated after-bucket strength of `other` following `word`.
    pub fn after_weight(&self, word: &str, other: &str) -> f64 {
        self.words
            .get(word)
            .and_then(|p| p.after.get(other))
            .copied()
            .unwrap_or(0.0)
    }

    /// After-bucket of `word`, alphabetically ordered; empty when untracked.
    pub fn after(&self, word: &str) -> impl Iterator<Item = (&str, f64)> {
        self.words
            .get(word)
            .into_iter()
            .flat_map(|p| p.after.iter().map(|(w, &s)| (w.as_str(), s)))
    }

    /// Words with at least one recorded bucket.
    pub fn tracked_words(&self) -> usize {
        self.words.len()
    }

    /// Total entries across all before and after buckets.
    pub fn bucket_entries(&self) -> usize {
        self.words
            .values()
            .map(|p| p.before.len() + p.after.len())
            .sum()
    }
}
