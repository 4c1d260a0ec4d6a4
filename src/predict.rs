//! Two-mode next-word prediction.
//!
//! Simple mode scores the last word's graph neighborhood, its after-bucket
//! and a flat bonus for grammatically expected classes. Complex mode scans
//! the whole lexicon and blends five weighted factors per candidate. Both
//! return at most ten positive-scored candidates, strongest first, with ties
//! kept in first-touch order.

use crate::grammar::GrammarRules;
use crate::graph::Graph;
use crate::lexicon::Lexicon;
use crate::pattern::PatternIndex;
use crate::rank::{Candidate, ScoreBoard};
use crate::tokenize;

/// How many candidates a prediction returns at most.
pub const TOP_N: usize = 10;

/// Prediction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PredictionMode {
    Simple,
    #[default]
    Complex,
}

impl PredictionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionMode::Simple => "simple",
            PredictionMode::Complex => "complex",
        }
    }
}

impl std::fmt::Display for PredictionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Candidates plus how much of the input was recognizable.
#[derive(Debug, Clone, Default)]
pub struct Prediction {
    pub candidates: Vec<Candidate>,
    pub known_ratio: f64,
}

impl Prediction {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

fn top_predictions(board: ScoreBoard<String>) -> Vec<Candidate> {
    let mut ranked: Vec<Candidate> = board
        .positive_desc()
        .into_iter()
        .map(|(word, score)| Candidate::new(word, score))
        .collect();
    ranked.truncate(TOP_N);
    ranked
}

fn simple(
    words: &[String],
    lexicon: &Lexicon,
    graph: &Graph,
    index: &PatternIndex,
    grammar: &GrammarRules,
) -> Vec<Candidate> {
    let last = &words[words.len() - 1];
    let mut board: ScoreBoard<String> = ScoreBoard::new();

    if let Some(row) = graph.row(last) {
        for (related, &weight) in row {
            if weight > 0.0 {
                board.add(related.clone(), weight * 0.5);
            }
        }
    }

    for (next, strength) in index.after(last) {
        board.add(next.to_string(), strength * 0.3);
    }

    // Flat bonus for every stored word of an expected class; the last word
    // itself is not excluded.
    let expected = grammar.expected_after(lexicon.class_of(last).as_str());
    for (word, entry) in lexicon.iter() {
        if expected.iter().any(|c| c == entry.class.as_str()) {
            board.add(word.to_string(), 0.2);
        }
    }

    top_predictions(board)
}

fn coherence(candidate: &str, previous: &[String], graph: &Graph) -> f64 {
    let start = previous.len().saturating_sub(3);
    let mut coherence = 0.0;
    for prev in &previous[start..] {
        let weight = graph.weight(candidate, prev);
        if weight > 0.0 {
            coherence += weight * 0.2;
        }
    }
    coherence.min(1.0)
}

fn field_consistency(candidate: &str, previous: &[String], lexicon: &Lexicon) -> f64 {
    let field = lexicon.semantic_field(candidate);
    if field == "general" {
        return 0.3;
    }
    let start = previous.len().saturating_sub(2);
    previous[start..]
        .iter()
        .filter(|prev| lexicon.semantic_field(prev) == field)
        .count() as f64
        * 0.2
}

fn complex(
    words: &[String],
    lexicon: &Lexicon,
    graph: &Graph,
    index: &PatternIndex,
    grammar: &GrammarRules,
) -> Vec<Candidate> {
    let last = &words[words.len() - 1];
    let last_class = lexicon.class_of(last);
    let mut board: ScoreBoard<String> = ScoreBoard::new();

    for (candidate, _) in lexicon.iter() {
        if candidate == last {
            continue;
        }

        let mut total = graph.weight(last, candidate).max(0.0) * 0.30;
        total += index.after_weight(last, candidate) * 0.25;
        total += grammar.flow(
            last_class.as_str(),
            lexicon.class_of(candidate).as_str(),
        ) * 0.20;
        total += coherence(candidate, words, graph) * 0.15;
        total += field_consistency(candidate, words, lexicon) * 0.10;

        if total > 0.0 {
            board.add(candidate.to_string(), total);
        }
    }

    top_predictions(board)
}

/// Predict likely next words for a text.
///
/// The known ratio is measured over the full token stream (marks included)
/// while candidates come from the word stream alone. Empty input yields an
/// empty prediction with a zero ratio.
pub fn predict_next(
    text: &str,
    mode: PredictionMode,
    lexicon: &Lexicon,
    graph: &Graph,
    index: &PatternIndex,
    grammar: &GrammarRules,
) -> Prediction {
    let words = tokenize::words(text);
    if words.is_empty() {
        return Prediction::default();
    }
    let known_ratio = lexicon.known_ratio(&tokenize::words_and_marks(text));

    let candidates = match mode {
        PredictionMode::Simple => simple(&words, lexicon, graph, index, grammar),
        PredictionMode::Complex => complex(&words, lexicon, graph, index, grammar),
    };

    Prediction {
        candidates,
        known_ratio,
    }
}
