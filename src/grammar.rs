//! Grammar tables: class pairing, compatibility, flow and sentence order.
//!
//! Tables load from JSON (`grammar_flow_formal.json` plus an overlay file per
//! formality). The overlay merge replaces whole per-class rows, never single
//! cells. Missing lookups fall back to fixed defaults so an empty table set
//! still produces usable behavior.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Formality level selecting which overlay merges onto the formal tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Formality {
    #[default]
    Formal,
    Casual,
}

impl Formality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Formality::Formal => "formal",
            Formality::Casual => "casual",
        }
    }
}

impl std::fmt::Display for Formality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fallback when a sentence type has no configured ordering.
pub const DEFAULT_SENTENCE_ORDER: &[&str] = &["noun", "verb", "noun"];

/// Fallback expected classes when a class has no flow row.
pub const DEFAULT_EXPECTED_CLASSES: &[&str] = &["noun", "verb"];

/// The four grammar tables, all keyed by class label.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrammarRules {
    /// Classes worth a one-way import-time edge, per class.
    #[serde(default)]
    pub common_pairs: BTreeMap<String, Vec<String>>,
    /// Pairwise compatibility weights used by class inference.
    #[serde(default)]
    pub compatibility_rules: BTreeMap<String, BTreeMap<String, f64>>,
    /// Transition weights from one class to the next.
    #[serde(default)]
    pub flow_rules: BTreeMap<String, BTreeMap<String, f64>>,
    /// Class sequence per sentence type.
    #[serde(default)]
    pub sentence_order: BTreeMap<String, Vec<String>>,
}

impl GrammarRules {
    /// Merge an overlay onto these tables. Each overlay row replaces the
    /// whole row for that class.
    pub fn merge_overlay(&mut self, overlay: GrammarRules) {
        self.common_pairs.extend(overlay.common_pairs);
        self.compatibility_rules.extend(overlay.compatibility_rules);
        self.flow_rules.extend(overlay.flow_rules);
        self.sentence_order.extend(overlay.sentence_order);
    }

    /// Compatibility weight between two classes; 0.1 when unconfigured.
    pub fn compatibility(&self, context: &str, candidate: &str) -> f64 {
        self.compatibility_rules
            .get(context)
            .and_then(|row| row.get(candidate))
            .copied()
            .unwrap_or(0.1)
    }

    /// Flow weight from `last` to `candidate`; 0.1 when unconfigured.
    pub fn flow(&self, last: &str, candidate: &str) -> f64 {
        self.flow_rules
            .get(last)
            .and_then(|row| row.get(candidate))
            .copied()
            .unwrap_or(0.1)
    }

    /// Strict flow gate used during assembly: the configured weight must
    /// exceed 0.3, with no fallback for missing cells.
    pub fn flows_well(&self, last: &str, candidate: &str) -> bool {
        self.flow_rules
            .get(last)
            .and_then(|row| row.get(candidate))
            .copied()
            .unwrap_or(0.0)
            > 0.3
    }

    /// Classes expected to follow `class`, in table order.
    pub fn expected_after(&self, class: &str) -> Vec<String> {
        let expected: Vec<String> = self
            .flow_rules
            .get(class)
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default();
        if expected.is_empty() {
            DEFAULT_EXPECTED_CLASSES
                .iter()
                .map(|c| c.to_string())
                .collect()
        } else {
            expected
        }
    }

    /// Class sequence for a sentence type.
    pub fn order_for(&self, sentence_type: &str) -> Vec<String> {
        self.sentence_order
            .get(sentence_type)
            .cloned()
            .unwrap_or_else(|| {
                DEFAULT_SENTENCE_ORDER
                    .iter()
                    .map(|c| c.to_string())
                    .collect()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formal() -> GrammarRules {
        serde_json::from_str(
            r#"{
                "common_pairs": {"noun": ["verb", "adjective"]},
                "compatibility_rules": {"noun": {"verb": 0.8, "adjective": 0.6}},
                "flow_rules": {"noun": {"verb": 0.9}, "adjective": {"noun": 0.9}},
                "sentence_order": {"question": ["question_word", "verb", "noun"]}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn lookups_fall_back_to_defaults() {
        let rules = formal();
        assert_eq!(rules.compatibility("noun", "verb"), 0.8);
        assert_eq!(rules.compatibility("verb", "noun"), 0.1);
        assert_eq!(rules.flow("qzxy", "noun"), 0.1);
        assert_eq!(rules.order_for("statement"), vec!["noun", "verb", "noun"]);
        assert_eq!(rules.expected_after("verb"), vec!["noun", "verb"]);
        assert_eq!(rules.expected_after("noun"), vec!["verb"]);
    }

    #[test]
    fn flow_gate_requires_strictly_more_than_threshold() {
        let mut rules = formal();
        assert!(rules.flows_well("noun", "verb"));
        rules
            .flow_rules
            .insert("verb".into(), BTreeMap::from([("noun".into(), 0.3)]));
        assert!(!rules.flows_well("verb", "noun"));
        assert!(!rules.flows_well("qzxy", "noun"));
    }

    #[test]
    fn overlay_replaces_whole_rows() {
        let mut rules = formal();
        let overlay: GrammarRules = serde_json::from_str(
            r#"{"flow_rules": {"noun": {"adjective": 0.5}}}"#,
        )
        .unwrap();
        rules.merge_overlay(overlay);

        // The noun row is replaced outright, not cell-merged.
        assert_eq!(rules.flow("noun", "adjective"), 0.5);
        assert_eq!(rules.flow("noun", "verb"), 0.1);
        assert_eq!(rules.flow("adjective", "noun"), 0.9);
    }

    #[test]
    fn empty_tables_still_answer() {
        let rules = GrammarRules::default();
        assert_eq!(rules.compatibility("noun", "verb"), 0.1);
        assert!(!rules.flows_well("noun", "verb"));
        assert_eq!(rules.order_for("question"), vec!["noun", "verb", "noun"]);
    }
}
