//! Post-import training passes: synonym and antonym bridging, expert field
//! assignment and word-class inference for unknown words.
//!
//! Passes run in a fixed order over the lexicon's insertion order, and each
//! pass sees the mutations of the previous ones (and of earlier words in the
//! same pass), so bridged lists and freshly assigned tags cascade forward.

use crate::config::ExpertField;
use crate::grammar::GrammarRules;
use crate::graph::{Graph, ANTONYM_WEIGHT, SYNONYM_WEIGHT};
use crate::lexicon::{Lexicon, WordClass};
use crate::pattern::PatternIndex;
use crate::rank::ScoreBoard;

/// Counters from one full training run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrainingReport {
    pub synonym_bridges: usize,
    pub antonym_bridges: usize,
    pub expert_links: usize,
    pub classes_inferred: usize,
}

impl std::fmt::Display for TrainingReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:<18}{}", "synonym bridges", self.synonym_bridges)?;
        writeln!(f, "{:<18}{}", "antonym bridges", self.antonym_bridges)?;
        writeln!(f, "{:<18}{}", "expert links", self.expert_links)?;
        write!(f, "{:<18}{}", "classes inferred", self.classes_inferred)
    }
}

/// Run all four passes in order.
pub fn run_training(
    lexicon: &mut Lexicon,
    graph: &mut Graph,
    index: &PatternIndex,
    grammar: &GrammarRules,
    experts: &[ExpertField],
) -> TrainingReport {
    TrainingReport {
        synonym_bridges: bridge_synonyms(lexicon, graph),
        antonym_bridges: bridge_antonyms(lexicon, graph),
        expert_links: bridge_experts(lexicon, experts),
        classes_inferred: infer_unknown_classes(lexicon, index, grammar),
    }
}

fn bridge_list(
    lexicon: &mut Lexicon,
    graph: &mut Graph,
    weight: f64,
    list_of: fn(&crate::lexicon::WordEntry) -> &Vec<String>,
    list_of_mut: fn(&mut crate::lexicon::WordEntry) -> &mut Vec<String>,
) -> usize {
    let words: Vec<String> = lexicon.words().map(str::to_string).collect();
    let mut bridges = 0;

    for word in &words {
        let original: Vec<String> = lexicon
            .get(word)
            .map(|e| list_of(e).clone())
            .unwrap_or_default();
        let mut merged = original.clone();

        for listed in &original {
            let Some(listed_entry) = lexicon.get(listed) else {
                continue;
            };
            // Earlier words in this pass may already have grown this list.
            for carried in list_of(listed_entry).clone() {
                if carried != *word && !merged.contains(&carried) {
                    merged.push(carried);
                    bridges += 1;
                }
            }
        }

        if merged.len() > original.len() {
            for listed in &merged {
                if !graph.has_edge(word, listed) {
                    graph.add_symmetric(word, listed, weight);
                }
            }
            if let Some(entry) = lexicon.get_mut(word) {
                *list_of_mut(entry) = merged;
            }
        }
    }
    bridges
}

/// Pull each word's synonyms-of-synonyms into its own list, wiring fresh
/// pairs at full synonym weight. New entries append in first-seen order.
pub fn bridge_synonyms(lexicon: &mut Lexicon, graph: &mut Graph) -> usize {
    bridge_list(
        lexicon,
        graph,
        SYNONYM_WEIGHT,
        |e| &e.synonyms,
        |e| &mut e.synonyms,
    )
}

/// Same walk over antonym lists, at antonym weight.
pub fn bridge_antonyms(lexicon: &mut Lexicon, graph: &mut Graph) -> usize {
    bridge_list(
        lexicon,
        graph,
        ANTONYM_WEIGHT,
        |e| &e.antonyms,
        |e| &mut e.antonyms,
    )
}

fn deduce_expert_field(
    meaning: &str,
    synonyms: &[String],
    lexicon: &Lexicon,
    experts: &[ExpertField],
) -> String {
    let mut board: ScoreBoard<String> = ScoreBoard::new();
    for field in experts {
        for keyword in &field.keywords {
            if meaning.contains(keyword.as_str()) {
                board.add(field.name.clone(), field.weight);
            }
        }
        for synonym in synonyms {
            if lexicon
                .get(synonym)
                .is_some_and(|e| e.expert_field == field.name)
            {
                board.add(field.name.clone(), 0.5);
            }
        }
    }
    board
        .argmax()
        .map(|(name, _)| name.clone())
        .unwrap_or_else(|| "general".to_string())
}

/// Tag general words with the expert field their meaning and synonyms point
/// at. Only `general` entries ever change; ties break toward the field
/// listed first in the configuration.
pub fn bridge_experts(lexicon: &mut Lexicon, experts: &[ExpertField]) -> usize {
    let words: Vec<String> = lexicon.words().map(str::to_string).collect();
    let mut links = 0;

    for word in &words {
        let Some((meaning, synonyms)) = lexicon
            .get(word)
            .map(|e| (e.meaning.to_lowercase(), e.synonyms.clone()))
        else {
            continue;
        };
        let best = deduce_expert_field(&meaning, &synonyms, lexicon, experts);
        if best != "general" {
            if let Some(entry) = lexicon.get_mut(word) {
                if entry.expert_field == "general" {
                    entry.expert_field = best;
                    links += 1;
                }
            }
        }
    }
    links
}

const INFERABLE_CLASSES: [WordClass; 4] = [
    WordClass::Noun,
    WordClass::Verb,
    WordClass::Adjective,
    WordClass::Adverb,
];

fn infer_class(
    word: &str,
    lexicon: &Lexicon,
    index: &PatternIndex,
    grammar: &GrammarRules,
) -> Option<WordClass> {
    let mut board: ScoreBoard<WordClass> = ScoreBoard::new();

    if let Some(patterns) = index.patterns(word) {
        for bucket in [&patterns.before, &patterns.after] {
            for (context, &strength) in bucket.iter() {
                let Some(context_entry) = lexicon.get(context) else {
                    continue;
                };
                // Raw table lookup: unconfigured pairs contribute nothing.
                let Some(row) = grammar
                    .compatibility_rules
                    .get(context_entry.class.as_str())
                else {
                    continue;
                };
                for candidate in &INFERABLE_CLASSES {
                    if let Some(&weight) = row.get(candidate.as_str()) {
                        board.add(candidate.clone(), strength * weight);
                    }
                }
            }
        }
    }

    for (_, other_entry) in lexicon.iter() {
        if other_entry.class != WordClass::Unknown
            && other_entry.synonyms.iter().any(|s| s == word)
        {
            board.add(other_entry.class.clone(), 1.0);
        }
    }

    board.argmax().map(|(class, _)| class.clone())
}

/// Give `unknown`-classed words a class from their pattern context and from
/// words that list them as synonyms.
pub fn infer_unknown_classes(
    lexicon: &mut Lexicon,
    index: &PatternIndex,
    grammar: &GrammarRules,
) -> usize {
    let words: Vec<String> = lexicon.words().map(str::to_string).collect();
    let mut inferred = 0;

    for word in &words {
        match lexicon.get(word) {
            Some(entry) if entry.class == WordClass::Unknown => {}
            _ => continue,
        }
        if let Some(class) = infer_class(word, lexicon, index, grammar) {
            if let Some(entry) = lexicon.get_mut(word) {
                entry.class = class;
                inferred += 1;
            }
        }
    }
    inferred
}
