//! Ordered score accumulation and ranking.
//!
//! Every scoring path in the engine pours additive f64 weights into a map and
//! then needs either the arg-max or a descending ranking. `ScoreBoard`
//! centralizes both with deterministic semantics: keys keep first-touch order,
//! arg-max breaks ties toward the earliest key, and ranking is a stable
//! descending sort so equal scores stay in accumulation order.

use std::collections::HashMap;
use std::hash::Hash;

/// A ranked word candidate with its accumulated score.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub word: String,
    pub score: f64,
}

impl Candidate {
    pub fn new(word: impl Into<String>, score: f64) -> Self {
        Self {
            word: word.into(),
            score,
        }
    }
}

/// Stable descending sort by score. Equal scores keep their current order.
pub fn sort_descending(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
}

/// Additive score map that remembers first-touch order.
#[derive(Debug, Clone)]
pub struct ScoreBoard<K> {
    order: Vec<K>,
    scores: HashMap<K, f64>,
}

impl<K: Eq + Hash + Clone> ScoreBoard<K> {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            scores: HashMap::new(),
        }
    }

    /// Add `delta` to the key's score, registering the key on first touch.
    pub fn add(&mut self, key: K, delta: f64) {
        if !self.scores.contains_key(&key) {
            self.order.push(key.clone());
        }
        *self.scores.entry(key).or_insert(0.0) += delta;
    }

    /// Current score for a key, 0.0 when untouched.
    pub fn get(&self, key: &K) -> f64 {
        self.scores.get(key).copied().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Highest-scoring key; ties resolve to the earliest-touched key.
    pub fn argmax(&self) -> Option<(&K, f64)> {
        let mut best: Option<(&K, f64)> = None;
        for key in &self.order {
            let score = self.scores[key];
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((key, score)),
            }
        }
        best
    }

    /// All entries sorted descending by score (stable over first-touch order).
    pub fn ranked_desc(self) -> Vec<(K, f64)> {
        let mut entries: Vec<(K, f64)> = self
            .order
            .into_iter()
            .map(|k| {
                let score = self.scores[&k];
                (k, score)
            })
            .collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));
        entries
    }

    /// Strictly positive entries sorted descending by score.
    pub fn positive_desc(self) -> Vec<(K, f64)> {
        let mut entries = self.ranked_desc();
        entries.retain(|(_, score)| *score > 0.0);
        entries
    }
}

impl<K: Eq + Hash + Clone> Default for ScoreBoard<K> {
    fn default() -> Self {
        Self::new()
    }
}
