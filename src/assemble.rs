//! Grammar-guided sentence assembly from an input text and ranked
//! predictions.
//!
//! Assembly walks the most probable continuation classes, picks the best
//! compatible prediction per class, backfills to the minimum length and
//! trims to the maximum, then capitalizes and punctuates. Word bounds are
//! clamped and kept mutually consistent by the setters.

use crate::analyze::{detect_sentence_type, SentenceType};
use crate::config::WordLists;
use crate::grammar::GrammarRules;
use crate::lexicon::Lexicon;
use crate::morpho;
use crate::pattern::PatternIndex;
use crate::rank::{Candidate, ScoreBoard};
use crate::tokenize;

const MIN_WORDS_RANGE: (usize, usize) = (1, 50);
const MAX_WORDS_RANGE: (usize, usize) = (5, 100);

/// Sentence assembler with response length bounds.
#[derive(Debug, Clone)]
pub struct Assembler {
    min_words: usize,
    max_words: usize,
}

impl Default for Assembler {
    fn default() -> Self {
        Self {
            min_words: 3,
            max_words: 20,
        }
    }
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_words(&self) -> usize {
        self.min_words
    }

    pub fn max_words(&self) -> usize {
        self.max_words
    }

    /// Set the minimum response length, clamped to 1..=50. The maximum is
    /// pushed up to keep a 5-word gap when the new minimum crosses it.
    pub fn set_min_words(&mut self, value: usize) {
        self.min_words = value.clamp(MIN_WORDS_RANGE.0, MIN_WORDS_RANGE.1);
        if self.min_words > self.max_words {
            self.max_words = self.min_words + 5;
        }
    }

    /// Set the maximum response length, clamped to 5..=100. The minimum is
    /// pulled down to 5 below it (at least 1) when the new maximum crosses.
    pub fn set_max_words(&mut self, value: usize) {
        self.max_words = value.clamp(MAX_WORDS_RANGE.0, MAX_WORDS_RANGE.1);
        if self.max_words < self.min_words {
            self.min_words = self.max_words.saturating_sub(5).max(1);
        }
    }

    /// Continuation classes ranked by sentence-order position and by the
    /// classes of the predictions themselves. All touched classes return,
    /// strongest first, ties in first-touch order.
    fn probable_classes(
        &self,
        input_words: &[String],
        predictions: &[Candidate],
        sentence_type: SentenceType,
        lexicon: &Lexicon,
        grammar: &GrammarRules,
    ) -> Vec<String> {
        let mut board: ScoreBoard<String> = ScoreBoard::new();

        let order = grammar.order_for(sentence_type.as_str());
        for (i, class) in order.iter().skip(input_words.len()).enumerate() {
            board.add(class.clone(), 1.0 / (i + 1) as f64);
        }

        for candidate in predictions {
            let class = lexicon.class_of(&candidate.word);
            board.add(class.as_str().to_string(), candidate.score * 0.5);
        }

        board
            .ranked_desc()
            .into_iter()
            .map(|(class, _)| class)
            .collect()
    }

    fn flows_from(
        last: Option<&String>,
        candidate: &str,
        lexicon: &Lexicon,
        grammar: &GrammarRules,
    ) -> bool {
        let Some(last) = last else {
            return true;
        };
        grammar.flows_well(
            lexicon.class_of(last).as_str(),
            lexicon.class_of(candidate).as_str(),
        )
    }

    /// Best unused, flow-compatible prediction of the target class, ranked
    /// by prediction score plus a share of the after-bucket strength.
    fn find_best_for_class(
        predictions: &[Candidate],
        target: &str,
        existing: &[String],
        lexicon: &Lexicon,
        index: &PatternIndex,
        grammar: &GrammarRules,
    ) -> Option<String> {
        let last = existing.last();
        let mut best: Option<(String, f64)> = None;

        for candidate in predictions {
            if lexicon.class_of(&candidate.word).as_str() != target
                || existing.contains(&candidate.word)
                || !Self::flows_from(last, &candidate.word, lexicon, grammar)
            {
                continue;
            }
            let pattern_score = last
                .map(|l| index.after_weight(l, &candidate.word) * 0.3)
                .unwrap_or(0.0);
            let total = candidate.score + pattern_score;
            if best.as_ref().is_none_or(|(_, score)| total > *score) {
                best = Some((candidate.word.clone(), total));
            }
        }
        best.map(|(word, _)| word)
    }

    /// Build a sentence from the input and its predictions. Empty input, or
    /// input that yields nothing, returns the text unchanged.
    pub fn generate(
        &self,
        text: &str,
        predictions: &[Candidate],
        lexicon: &Lexicon,
        index: &PatternIndex,
        grammar: &GrammarRules,
        lists: &WordLists,
    ) -> String {
        let input_words = tokenize::words(text);
        if input_words.is_empty() {
            return text.to_string();
        }

        let sentence_type = detect_sentence_type(&input_words, lists);
        let classes =
            self.probable_classes(&input_words, predictions, sentence_type, lexicon, grammar);

        let mut generated = input_words;
        for class in &classes {
            if generated.len() >= self.max_words {
                break;
            }
            if let Some(word) = Self::find_best_for_class(
                predictions,
                class,
                &generated,
                lexicon,
                index,
                grammar,
            ) {
                generated.push(word);
            }
        }

        // Backfill in rank order until the minimum holds or nothing fits.
        while generated.len() < self.min_words && !predictions.is_empty() {
            let next = predictions.iter().find(|c| {
                !generated.contains(&c.word)
                    && Self::flows_from(generated.last(), &c.word, lexicon, grammar)
            });
            match next {
                Some(candidate) => generated.push(candidate.word.clone()),
                None => break,
            }
        }

        generated.truncate(self.max_words);
        generated[0] = morpho::capitalize_first(&generated[0]);
        let mut sentence = generated.join(" ");

        if sentence_type == SentenceType::Question {
            sentence.push('?');
        } else if generated.len() >= 3 {
            sentence.push('.');
        }
        sentence
    }
}
