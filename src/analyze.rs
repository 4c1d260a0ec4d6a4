//! Sentence analysis: classify the sentence, score pairwise relationship
//! strengths and feed the pattern index.
//!
//! Every analyzed sentence accumulates into the pattern index; per-word
//! position counters are only updated while a training mode is active.

use crate::config::WordLists;
use crate::context::{self, ContextDeduction};
use crate::grammar::GrammarRules;
use crate::graph::Graph;
use crate::lexicon::{Lexicon, WordClass};
use crate::pattern::{PatternIndex, SentencePosition};
use crate::tokenize;

// ── Sentence classification ─────────────────────────────────────────────

/// Detected sentence type, in detection priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentenceType {
    Question,
    Answer,
    Fact,
    Theory,
    Statement,
}

impl SentenceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentenceType::Question => "question",
            SentenceType::Answer => "answer",
            SentenceType::Fact => "fact",
            SentenceType::Theory => "theory",
            SentenceType::Statement => "statement",
        }
    }
}

impl std::fmt::Display for SentenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detected tense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tense {
    Past,
    Present,
    Future,
}

impl Tense {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tense::Past => "past",
            Tense::Present => "present",
            Tense::Future => "future",
        }
    }
}

impl std::fmt::Display for Tense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First matching list wins: question, answer, fact, theory, statement.
pub fn detect_sentence_type(tokens: &[String], lists: &WordLists) -> SentenceType {
    let any_in = |list: &[String]| tokens.iter().any(|t| list.iter().any(|w| w == t));
    if any_in(&lists.question) {
        SentenceType::Question
    } else if any_in(&lists.answer) {
        SentenceType::Answer
    } else if any_in(&lists.fact) {
        SentenceType::Fact
    } else if any_in(&lists.theory) {
        SentenceType::Theory
    } else {
        SentenceType::Statement
    }
}

/// Tense from indicator substrings: "ed" matches "played", and multi-word
/// indicators like "going to" can only ever match if kept as one token.
pub fn detect_tense(tokens: &[String], lists: &WordLists) -> Tense {
    let any_substring =
        |list: &[String]| tokens.iter().any(|t| list.iter().any(|ind| t.contains(ind.as_str())));
    if any_substring(&lists.past_indicators) {
        Tense::Past
    } else if any_substring(&lists.future_indicators) {
        Tense::Future
    } else {
        Tense::Present
    }
}

// ── Relationship strength ───────────────────────────────────────────────

fn semantic_proximity(
    w1: &str,
    w2: &str,
    tokens: &[String],
    current_index: usize,
    graph: &Graph,
) -> f64 {
    let mut proximity = 0.0;
    if let (Some(row1), Some(row2)) = (graph.row(w1), graph.row(w2)) {
        let shared = row1
            .keys()
            .filter(|k| row2.get(*k).is_some_and(|&v| v > 0.0))
            .count();
        proximity += shared as f64 * 0.2;
    }

    // Distance to the first occurrence of w2; zero distance skips the bonus.
    let w2_index = tokens
        .iter()
        .position(|t| t == w2)
        .unwrap_or(current_index);
    let distance = current_index.abs_diff(w2_index);
    if distance > 0 {
        proximity += (1.0 / distance as f64) * 0.3;
    }
    proximity.min(1.0)
}

fn contextual_relevance(w1: &str, w2: &str, tokens: &[String], graph: &Graph) -> f64 {
    let shared = tokens
        .iter()
        .filter(|t| t.as_str() != w1 && t.as_str() != w2 && !tokenize::is_punctuation(t))
        .take(3)
        .filter(|t| graph.weight(w1, t) > 0.0 && graph.weight(w2, t) > 0.0)
        .count();
    (shared as f64 * 0.2).min(0.5)
}

/// Pairwise relationship strength between `w1` and the token `w2`, seen from
/// the token at `current_index`. Blends the graph edge, semantic proximity,
/// class compatibility and shared theme words; never negative.
pub fn pattern_strength(
    w1: &str,
    w2: &str,
    tokens: &[String],
    current_index: usize,
    lexicon: &Lexicon,
    graph: &Graph,
    grammar: &GrammarRules,
) -> f64 {
    let mut strength = graph.weight(w1, w2).abs() * 0.4;
    strength += semantic_proximity(w1, w2, tokens, current_index, graph) * 0.25;
    strength += grammar.compatibility(
        lexicon.class_of(w1).as_str(),
        lexicon.class_of(w2).as_str(),
    ) * 0.20;
    strength += contextual_relevance(w1, w2, tokens, graph) * 0.15;
    strength.max(0.0)
}

// ── Sentence report ─────────────────────────────────────────────────────

/// One adjacent-pair relationship observed in a sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationLine {
    pub from: String,
    pub to: String,
    pub strength: f64,
}

impl std::fmt::Display for RelationLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}: {:.3}", self.from, self.to, self.strength)
    }
}

/// Full analysis of one sentence.
#[derive(Debug, Clone)]
pub struct SentenceReport {
    pub word_classes: Vec<(String, WordClass)>,
    pub sentence_type: SentenceType,
    pub tense: Tense,
    pub relationship_patterns: Vec<RelationLine>,
    pub known_ratio: f64,
    pub position_patterns: Vec<(String, SentencePosition)>,
    pub context: ContextDeduction,
}

impl std::fmt::Display for SentenceReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "sentence type:  {}", self.sentence_type)?;
        writeln!(f, "tense:          {}", self.tense)?;
        writeln!(f, "known ratio:    {:.1}%", self.known_ratio)?;
        writeln!(
            f,
            "context:        {} ({:.1}) / {} ({:.1})",
            self.context.main_topic,
            self.context.topic_confidence,
            self.context.main_expert,
            self.context.expert_confidence
        )?;
        write!(f, "classes:       ")?;
        for (word, class) in &self.word_classes {
            write!(f, " {word}/{class}")?;
        }
        Ok(())
    }
}

fn accumulate_patterns(
    current: &str,
    tokens: &[String],
    current_index: usize,
    lexicon: &Lexicon,
    graph: &Graph,
    grammar: &GrammarRules,
    index: &mut PatternIndex,
) {
    let total = tokens.len();
    for (i, other) in tokens.iter().enumerate() {
        if i == current_index || tokenize::is_punctuation(other) {
            continue;
        }
        let strength =
            pattern_strength(current, other, tokens, current_index, lexicon, graph, grammar);
        index.accumulate(
            current,
            other,
            i < current_index,
            SentencePosition::of(i, total),
            strength,
        );
    }
}

/// Analyze one sentence, feeding the pattern index as a side effect.
/// `train_positions` additionally bumps per-word position counters for
/// known words.
pub fn analyze_sentence(
    text: &str,
    lexicon: &mut Lexicon,
    graph: &Graph,
    grammar: &GrammarRules,
    index: &mut PatternIndex,
    lists: &WordLists,
    train_positions: bool,
) -> SentenceReport {
    let tokens = tokenize::words_and_marks(text);
    let sentence_type = detect_sentence_type(&tokens, lists);
    let tense = detect_tense(&tokens, lists);
    let known_ratio = lexicon.known_ratio(&tokens);
    let deduced = context::deduce(text, lexicon);

    let mut word_classes = Vec::new();
    let mut position_patterns = Vec::new();
    let mut relationship_patterns = Vec::new();

    for (i, word) in tokens.iter().enumerate() {
        if tokenize::is_punctuation(word) {
            continue;
        }

        word_classes.push((word.clone(), lexicon.class_of(word)));
        accumulate_patterns(word, &tokens, i, lexicon, graph, grammar, index);

        let position = SentencePosition::of(i, tokens.len());
        position_patterns.push((word.clone(), position));
        if train_positions {
            if let Some(entry) = lexicon.get_mut(word) {
                *entry
                    .pattern_data
                    .position_patterns
                    .entry(position)
                    .or_insert(0) += 1;
            }
        }

        if i > 0 && !tokenize::is_punctuation(&tokens[i - 1]) {
            let strength =
                pattern_strength(&tokens[i - 1], word, &tokens, i, lexicon, graph, grammar);
            relationship_patterns.push(RelationLine {
                from: tokens[i - 1].clone(),
                to: word.clone(),
                strength,
            });
        }
    }

    SentenceReport {
        word_classes,
        sentence_type,
        tense,
        relationship_patterns,
        known_ratio,
        position_patterns,
        context: deduced,
    }
}
