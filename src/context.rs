//! Context deduction: pick the most probable topic and expert field for a
//! text from noun weighting and stored expert tags.

use crate::lexicon::{Lexicon, WordClass};
use crate::rank::ScoreBoard;
use crate::tokenize;

/// Deduced context for one input text.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextDeduction {
    pub main_topic: String,
    pub main_expert: String,
    pub topic_confidence: f64,
    pub expert_confidence: f64,
}

impl Default for ContextDeduction {
    fn default() -> Self {
        Self {
            main_topic: "general".to_string(),
            main_expert: "general".to_string(),
            topic_confidence: 0.0,
            expert_confidence: 0.0,
        }
    }
}

/// Deduce topic and expert field from a raw text.
///
/// Nouns are weighted by position (first noun counts double), repetition and
/// listed synonyms; the expert field tallies the stored tags of known words.
/// Ties go to the word touched first.
pub fn deduce(text: &str, lexicon: &Lexicon) -> ContextDeduction {
    let words = tokenize::words(text);

    let nouns: Vec<&String> = words
        .iter()
        .filter(|w| lexicon.class_of(w) == WordClass::Noun)
        .collect();

    let mut topic_board: ScoreBoard<String> = ScoreBoard::new();
    if let Some(first) = nouns.first() {
        topic_board.add((*first).clone(), 2.0);
    }
    for noun in &nouns {
        topic_board.add((*noun).clone(), 0.5);
    }
    for noun in &nouns {
        if let Some(entry) = lexicon.get(noun) {
            for synonym in &entry.synonyms {
                topic_board.add(synonym.clone(), 0.3);
            }
        }
    }

    let mut expert_board: ScoreBoard<String> = ScoreBoard::new();
    for word in &words {
        if let Some(entry) = lexicon.get(word) {
            if entry.expert_field != "general" {
                expert_board.add(entry.expert_field.clone(), 1.0);
            }
        }
    }

    let (main_topic, topic_confidence) = match topic_board.argmax() {
        Some((topic, score)) => (topic.clone(), score),
        None => (
            words
                .first()
                .cloned()
                .unwrap_or_else(|| "general".to_string()),
            0.0,
        ),
    };
    let (main_expert, expert_confidence) = match expert_board.argmax() {
        Some((expert, score)) => (expert.clone(), score),
        None => ("general".to_string(), 0.0),
    };

    ContextDeduction {
        main_topic,
        main_expert,
        topic_confidence,
        expert_confidence,
    }
}
