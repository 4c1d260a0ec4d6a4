//! Signed weighted word-relationship graph.
//!
//! Edges are directed and accumulate: synonyms pull weights up, antonyms push
//! them below zero. Rows are ordered maps so every scan over a word's
//! neighborhood is deterministic. Reads never create cells; a missing edge
//! weighs 0.0.

use std::collections::{BTreeMap, HashMap};

use crate::grammar::GrammarRules;
use crate::lexicon::{Lexicon, WordEntry};

/// Weight added per listed synonym, in both directions.
pub const SYNONYM_WEIGHT: f64 = 2.0;
/// Weight subtracted per listed antonym, in both directions.
pub const ANTONYM_WEIGHT: f64 = -1.5;
/// Weight added per listed acronym, in both directions.
pub const ACRONYM_WEIGHT: f64 = 1.0;
/// One-way weight between class-compatible words at import time.
pub const CLASS_PAIR_WEIGHT: f64 = 0.3;

#[derive(Debug, Clone, Default)]
pub struct Graph {
    edges: HashMap<String, BTreeMap<String, f64>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate `delta` onto the directed edge `from -> to`.
    pub fn add(&mut self, from: &str, to: &str, delta: f64) {
        *self
            .edges
            .entry(from.to_string())
            .or_default()
            .entry(to.to_string())
            .or_insert(0.0) += delta;
    }

    /// Accumulate `delta` in both directions.
    pub fn add_symmetric(&mut self, a: &str, b: &str, delta: f64) {
        self.add(a, b, delta);
        self.add(b, a, delta);
    }

    /// Current weight of `from -> to`; 0.0 when absent. Never inserts.
    pub fn weight(&self, from: &str, to: &str) -> f64 {
        self.edges
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.edges
            .get(from)
            .map(|row| row.contains_key(to))
            .unwrap_or(false)
    }

    /// Outgoing neighborhood of `from`, alphabetically ordered.
    pub fn row(&self, from: &str) -> Option<&BTreeMap<String, f64>> {
        self.edges.get(from)
    }

    /// Words with at least one outgoing edge.
    pub fn node_count(&self) -> usize {
        self.edges.len()
    }

    /// Total directed edges.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeMap::len).sum()
    }

    /// Strongest neighbors of `from` by absolute weight, alphabetical on
    /// ties, truncated to `limit`.
    pub fn strongest(&self, from: &str, limit: usize) -> Vec<(String, f64)> {
        let Some(row) = self.edges.get(from) else {
            return Vec::new();
        };
        let mut ranked: Vec<(String, f64)> =
            row.iter().map(|(w, &s)| (w.clone(), s)).collect();
        ranked.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
        ranked.truncate(limit);
        ranked
    }

    /// Wire a freshly imported word: listed synonyms, antonyms and acronyms
    /// link both ways; every already-stored word whose class pairs with the
    /// new word's class (per the `common_pairs` table) gets a one-way edge
    /// from the new word.
    pub fn link_entry(
        &mut self,
        word: &str,
        entry: &WordEntry,
        lexicon: &Lexicon,
        grammar: &GrammarRules,
    ) {
        for synonym in &entry.synonyms {
            self.add_symmetric(word, synonym, SYNONYM_WEIGHT);
        }
        for antonym in &entry.antonyms {
            self.add_symmetric(word, antonym, ANTONYM_WEIGHT);
        }
        for acronym in &entry.acronyms {
            self.add_symmetric(word, acronym, ACRONYM_WEIGHT);
        }

        let Some(partners) = grammar.common_pairs.get(entry.class.as_str()) else {
            return;
        };
        for (other, other_entry) in lexicon.iter() {
            if other != word && partners.iter().any(|c| c == other_entry.class.as_str()) {
                self.add(word, other, CLASS_PAIR_WEIGHT);
            }
        }
    }

    /// Link a word to every stored proper prefix, both ways, weighted by
    /// 0.5 times the shared length ratio (in characters).
    pub fn link_partials(&mut self, word: &str, lexicon: &Lexicon) {
        let total = word.chars().count();
        for (shared, (end, _)) in word.char_indices().skip(1).enumerate() {
            let prefix = &word[..end];
            if lexicon.contains(prefix) {
                let delta = 0.5 * (shared + 1) as f64 / total as f64;
                self.add_symmetric(word, prefix, delta);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::{parse_feed_line, FeedLine};

    fn lexicon_with(records: &[&str]) -> Lexicon {
        let mut lex = Lexicon::new();
        for record in records {
            let FeedLine::Entry(word, entry) = parse_feed_line(record) else {
                panic!("bad test record: {record}");
            };
            lex.insert(word, entry);
        }
        lex
    }

    #[test]
    fn edges_accumulate_and_missing_reads_are_zero() {
        let mut graph = Graph::new();
        graph.add("data", "facts", 2.0);
        graph.add("data", "facts", -1.5);
        assert_eq!(graph.weight("data", "facts"), 0.5);
        assert_eq!(graph.weight("facts", "data"), 0.0);
        assert!(!graph.has_edge("facts", "data"));
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn entry_linking_wires_lists_both_ways() {
        let lex = lexicon_with(&["noun; computer; ; ; machine; manual; ; cpu"]);
        let mut graph = Graph::new();
        let entry = lex.get("computer").unwrap();
        graph.link_entry("computer", entry, &lex, &GrammarRules::default());

        assert_eq!(graph.weight("computer", "machine"), SYNONYM_WEIGHT);
        assert_eq!(graph.weight("machine", "computer"), SYNONYM_WEIGHT);
        assert_eq!(graph.weight("computer", "manual"), ANTONYM_WEIGHT);
        assert_eq!(graph.weight("manual", "computer"), ANTONYM_WEIGHT);
        assert_eq!(graph.weight("computer", "cpu"), ACRONYM_WEIGHT);
    }

    #[test]
    fn class_pairs_link_one_way_only() {
        let mut grammar = GrammarRules::default();
        grammar
            .common_pairs
            .insert("verb".into(), vec!["noun".into()]);

        let lex = lexicon_with(&["noun; data", "verb; compute"]);
        let mut graph = Graph::new();
        graph.link_entry("compute", lex.get("compute").unwrap(), &lex, &grammar);

        assert_eq!(graph.weight("compute", "data"), CLASS_PAIR_WEIGHT);
        assert_eq!(graph.weight("data", "compute"), 0.0);
    }

    #[test]
    fn partial_links_scale_with_shared_length() {
        let lex = lexicon_with(&["noun; car"]);
        let mut graph = Graph::new();
        graph.link_partials("carpet", &lex);

        // "car" shares 3 of 6 characters.
        assert_eq!(graph.weight("carpet", "car"), 0.25);
        assert_eq!(graph.weight("car", "carpet"), 0.25);
        assert_eq!(graph.weight("carpet", "ca"), 0.0);
    }

    #[test]
    fn strongest_ranks_by_absolute_weight() {
        let mut graph = Graph::new();
        graph.add("analyze", "skip", -1.5);
        graph.add("analyze", "study", 1.0);
        graph.add("analyze", "examine", 2.0);

        let top = graph.strongest("analyze", 2);
        assert_eq!(top[0].0, "examine");
        assert_eq!(top[1].0, "skip");
        assert!(graph.strongest("qzxy", 3).is_empty());
    }
}
