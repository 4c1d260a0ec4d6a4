//! Lexicon store: word entries keyed by lower-cased surface form.
//!
//! The lexicon is populated from a semicolon-delimited dictionary feed
//! (`class; word; singular; plural; synonyms; antonyms; meaning; acronyms;
//! pattern_data`), plus a fixed set of punctuation and digit pseudo-words so
//! marks participate in pattern analysis. First insert wins; re-importing an
//! existing word is a no-op.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::pattern::SentencePosition;
use crate::tokenize;

/// Marks inserted as pseudo-words after every feed import.
const PSEUDO_MARKS: &str = "!,.?;:~\"'()[]{}";

// ── Word classes ────────────────────────────────────────────────────────

/// Coarse part-of-speech tag. The set is open: feed records may carry
/// arbitrary labels (e.g. `question_word`), preserved verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WordClass {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Punctuation,
    Number,
    Unknown,
    Other(String),
}

impl WordClass {
    /// Parse a class label. Only the exact lower-case names map to the
    /// closed variants; anything else is kept verbatim.
    pub fn parse(label: &str) -> Self {
        match label {
            "noun" => WordClass::Noun,
            "verb" => WordClass::Verb,
            "adjective" => WordClass::Adjective,
            "adverb" => WordClass::Adverb,
            "punctuation" => WordClass::Punctuation,
            "number" => WordClass::Number,
            "unknown" => WordClass::Unknown,
            other => WordClass::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            WordClass::Noun => "noun",
            WordClass::Verb => "verb",
            WordClass::Adjective => "adjective",
            WordClass::Adverb => "adverb",
            WordClass::Punctuation => "punctuation",
            WordClass::Number => "number",
            WordClass::Unknown => "unknown",
            WordClass::Other(label) => label,
        }
    }
}

impl std::fmt::Display for WordClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for WordClass {
    fn from(label: &str) -> Self {
        WordClass::parse(label)
    }
}

impl Serialize for WordClass {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for WordClass {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(WordClass::parse(&label))
    }
}

// ── Entries ─────────────────────────────────────────────────────────────

/// Open attribute map carried by each entry; currently holds accumulated
/// sentence-position counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternData {
    #[serde(default)]
    pub position_patterns: BTreeMap<SentencePosition, u64>,
}

/// One lexicon entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordEntry {
    pub class: WordClass,
    pub singular: String,
    pub plural: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub antonyms: Vec<String>,
    pub meaning: String,
    #[serde(default)]
    pub acronyms: Vec<String>,
    #[serde(default)]
    pub pattern_data: PatternData,
    /// Topical domain tag. Starts at `general`; only the expert bridging
    /// pass moves it, and only away from `general`.
    pub expert_field: String,
}

impl WordEntry {
    fn pseudo(class: WordClass, surface: &str, meaning: String) -> Self {
        Self {
            class,
            singular: surface.to_string(),
            plural: String::new(),
            synonyms: Vec::new(),
            antonyms: Vec::new(),
            meaning,
            acronyms: Vec::new(),
            pattern_data: PatternData::default(),
            expert_field: "general".to_string(),
        }
    }
}

// ── Feed records ────────────────────────────────────────────────────────

/// Outcome of parsing one feed line.
#[derive(Debug)]
pub enum FeedLine {
    /// A well-formed record: lower-cased word plus its entry.
    Entry(String, WordEntry),
    /// Blank line or `#` comment.
    Ignored,
    /// Fewer than two fields, or an empty word field.
    Malformed,
}

fn split_csv(field: &str) -> Vec<String> {
    field
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse one semicolon-delimited feed line.
pub fn parse_feed_line(line: &str) -> FeedLine {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return FeedLine::Ignored;
    }

    let parts: Vec<&str> = line.split(';').map(str::trim).collect();
    if parts.len() < 2 {
        return FeedLine::Malformed;
    }

    let word = parts[1].to_lowercase();
    if word.is_empty() {
        return FeedLine::Malformed;
    }

    let field = |idx: usize| parts.get(idx).copied().unwrap_or("");
    let pattern_data = match field(8) {
        "" => PatternData::default(),
        raw => serde_json::from_str(raw).unwrap_or_else(|e| {
            tracing::debug!(word = %word, error = %e, "unparseable pattern_data field, using empty");
            PatternData::default()
        }),
    };

    let entry = WordEntry {
        class: WordClass::parse(parts[0]),
        singular: if parts.len() > 2 {
            parts[2].to_string()
        } else {
            word.clone()
        },
        plural: field(3).to_string(),
        synonyms: split_csv(field(4)),
        antonyms: split_csv(field(5)),
        meaning: field(6).to_string(),
        acronyms: split_csv(field(7)),
        pattern_data,
        expert_field: "general".to_string(),
    };
    FeedLine::Entry(word, entry)
}

// ── Store ───────────────────────────────────────────────────────────────

/// The word store. Keeps insertion order so whole-store scans (class-pair
/// linking, complex prediction) are deterministic.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: HashMap<String, WordEntry>,
    order: Vec<String>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry. Returns false (and leaves the store untouched) when
    /// the word already exists.
    pub fn insert(&mut self, word: String, entry: WordEntry) -> bool {
        if self.entries.contains_key(&word) {
            return false;
        }
        self.order.push(word.clone());
        self.entries.insert(word, entry);
        true
    }

    pub fn get(&self, word: &str) -> Option<&WordEntry> {
        self.entries.get(word)
    }

    pub fn get_mut(&mut self, word: &str) -> Option<&mut WordEntry> {
        self.entries.get_mut(word)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Words in insertion order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &WordEntry)> {
        self.order
            .iter()
            .map(|w| (w.as_str(), &self.entries[w]))
    }

    /// Class lookup with prefix fallback: exact match first, then prefixes
    /// probed from length 1 upward, returning the first (shortest) hit.
    /// The shortest-prefix order is intentional and kept as-is.
    pub fn class_of(&self, word: &str) -> WordClass {
        if let Some(entry) = self.entries.get(word) {
            return entry.class.clone();
        }
        for (end, _) in word.char_indices().skip(1) {
            if let Some(entry) = self.entries.get(&word[..end]) {
                return entry.class.clone();
            }
        }
        WordClass::Unknown
    }

    /// Percentage of non-punctuation tokens with a resolvable class.
    /// Returns 0.0 when nothing is countable.
    pub fn known_ratio(&self, tokens: &[String]) -> f64 {
        let countable: Vec<&String> = tokens
            .iter()
            .filter(|t| !tokenize::is_punctuation(t))
            .collect();
        if countable.is_empty() {
            return 0.0;
        }
        let known = countable
            .iter()
            .filter(|t| self.class_of(t) != WordClass::Unknown)
            .count();
        known as f64 / countable.len() as f64 * 100.0
    }

    /// Insert the punctuation marks and decimal digits as pseudo-words.
    /// Idempotent; returns how many were newly added.
    pub fn insert_marks_and_digits(&mut self) -> usize {
        let mut added = 0;
        for mark in PSEUDO_MARKS.chars() {
            let surface = mark.to_string();
            let entry = WordEntry::pseudo(
                WordClass::Punctuation,
                &surface,
                format!("punctuation: {mark}"),
            );
            if self.insert(surface, entry) {
                added += 1;
            }
        }
        for digit in '0'..='9' {
            let surface = digit.to_string();
            let entry =
                WordEntry::pseudo(WordClass::Number, &surface, format!("number: {digit}"));
            if self.insert(surface, entry) {
                added += 1;
            }
        }
        added
    }

    /// Meaning-derived semantic field, distinct from the stored expert tag.
    /// Drives the field-consistency factor of complex prediction.
    pub fn semantic_field(&self, word: &str) -> &'static str {
        if let Some(entry) = self.entries.get(word) {
            let meaning = entry.meaning.to_lowercase();
            if ["computer", "digital", "electronic"]
                .iter()
                .any(|t| meaning.contains(t))
            {
                return "technology";
            }
            if ["science", "research", "study"]
                .iter()
                .any(|t| meaning.contains(t))
            {
                return "science";
            }
            if ["math", "calculate", "number"]
                .iter()
                .any(|t| meaning.contains(t))
            {
                return "mathematics";
            }
        }
        "general"
    }

    /// Entries whose stored class is not `unknown`.
    pub fn known_class_count(&self) -> usize {
        self.order
            .iter()
            .filter(|w| self.entries[*w].class != WordClass::Unknown)
            .count()
    }

    /// Word counts per stored expert field, sorted by field name.
    pub fn expert_distribution(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for word in &self.order {
            *counts
                .entry(self.entries[word].expert_field.clone())
                .or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_record() {
        let line = "noun; Computer; computer; computers; machine,device,pc; ; electronic device; PC,CPU; {}";
        let FeedLine::Entry(word, entry) = parse_feed_line(line) else {
            panic!("expected entry");
        };
        assert_eq!(word, "computer");
        assert_eq!(entry.class, WordClass::Noun);
        assert_eq!(entry.singular, "computer");
        assert_eq!(entry.plural, "computers");
        assert_eq!(entry.synonyms, vec!["machine", "device", "pc"]);
        assert!(entry.antonyms.is_empty());
        assert_eq!(entry.meaning, "electronic device");
        assert_eq!(entry.acronyms, vec!["pc", "cpu"]);
        assert_eq!(entry.expert_field, "general");
    }

    #[test]
    fn parse_short_record_defaults_trailing_fields() {
        let FeedLine::Entry(word, entry) = parse_feed_line("verb; run") else {
            panic!("expected entry");
        };
        assert_eq!(word, "run");
        assert_eq!(entry.singular, "run");
        assert!(entry.plural.is_empty());
        assert!(entry.synonyms.is_empty());
        assert!(entry.meaning.is_empty());
    }

    #[test]
    fn parse_skips_comments_and_malformed_lines() {
        assert!(matches!(parse_feed_line("# header"), FeedLine::Ignored));
        assert!(matches!(parse_feed_line("   "), FeedLine::Ignored));
        assert!(matches!(parse_feed_line("noun"), FeedLine::Malformed));
        assert!(matches!(parse_feed_line("noun; "), FeedLine::Malformed));
    }

    #[test]
    fn parse_keeps_unrecognized_class_labels() {
        let FeedLine::Entry(_, entry) = parse_feed_line("question_word; what") else {
            panic!("expected entry");
        };
        assert_eq!(entry.class, WordClass::Other("question_word".into()));
        assert_eq!(entry.class.as_str(), "question_word");
    }

    #[test]
    fn first_insert_wins() {
        let mut lex = Lexicon::new();
        let FeedLine::Entry(word, entry) = parse_feed_line("noun; data; datum; data; ; ; collected information") else {
            panic!("expected entry");
        };
        assert!(lex.insert(word.clone(), entry));

        let FeedLine::Entry(_, conflicting) = parse_feed_line("verb; data; ; ; ; ; something else") else {
            panic!("expected entry");
        };
        assert!(!lex.insert(word, conflicting));
        assert_eq!(lex.get("data").unwrap().class, WordClass::Noun);
        assert_eq!(lex.get("data").unwrap().meaning, "collected information");
    }

    #[test]
    fn class_lookup_prefers_shortest_prefix() {
        let mut lex = Lexicon::new();
        let FeedLine::Entry(w, e) = parse_feed_line("pronoun; i") else {
            panic!()
        };
        lex.insert(w, e);
        let FeedLine::Entry(w, e) = parse_feed_line("preposition; in") else {
            panic!()
        };
        lex.insert(w, e);

        // "ink" is absent; the one-letter prefix wins over the two-letter one.
        assert_eq!(lex.class_of("ink"), WordClass::Other("pronoun".into()));
        assert_eq!(lex.class_of("in"), WordClass::Other("preposition".into()));
        assert_eq!(lex.class_of("qzxy"), WordClass::Unknown);
    }

    #[test]
    fn known_ratio_guards_empty_input() {
        let lex = Lexicon::new();
        assert_eq!(lex.known_ratio(&[]), 0.0);
    }

    #[test]
    fn known_ratio_excludes_punctuation_and_counts_prefix_hits() {
        let mut lex = Lexicon::new();
        let FeedLine::Entry(w, e) = parse_feed_line("noun; cat") else {
            panic!()
        };
        lex.insert(w, e);

        let tokens: Vec<String> = ["cats", "qzxy", "?"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        // "cats" resolves through the "cat" prefix; "?" is not countable.
        assert_eq!(lex.known_ratio(&tokens), 50.0);
    }

    #[test]
    fn pseudo_words_are_idempotent() {
        let mut lex = Lexicon::new();
        let added = lex.insert_marks_and_digits();
        assert_eq!(added, 25);
        assert_eq!(lex.insert_marks_and_digits(), 0);
        assert_eq!(lex.class_of("?"), WordClass::Punctuation);
        assert_eq!(lex.class_of("7"), WordClass::Number);
        assert_eq!(lex.get("3").unwrap().meaning, "number: 3");
    }

    #[test]
    fn semantic_field_derives_from_meaning() {
        let mut lex = Lexicon::new();
        let FeedLine::Entry(w, e) =
            parse_feed_line("noun; computer; ; ; ; ; electronic device")
        else {
            panic!()
        };
        lex.insert(w, e);
        assert_eq!(lex.semantic_field("computer"), "technology");
        assert_eq!(lex.semantic_field("qzxy"), "general");
    }
}
