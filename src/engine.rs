//! Engine facade: owns every subsystem and exposes the operation surface
//! the CLI drives.
//!
//! Construction takes an already loaded [`RuntimeConfig`]; the engine never
//! touches the filesystem on its own except through [`Engine::import_path`].
//! All state lives in memory for the process lifetime.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analyze::{self, SentenceReport};
use crate::assemble::Assembler;
use crate::bridge::{self, TrainingReport};
use crate::config::RuntimeConfig;
use crate::context::{self, ContextDeduction};
use crate::enhance::{ConversationHistory, Enhancer, Specialist};
use crate::error::{EngineError, FeedError, LoomResult};
use crate::grammar::{Formality, GrammarRules};
use crate::graph::Graph;
use crate::lexicon::{self, FeedLine, Lexicon};
use crate::morpho;
use crate::pattern::PatternIndex;
use crate::predict::{self, Prediction, PredictionMode};
use crate::rank::Candidate;

/// What the engine does with analyzed sentences and fresh imports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationMode {
    #[default]
    Speech,
    SpeechTraining,
    FileTraining,
}

impl OperationMode {
    /// Training modes run the bridging passes after import and count
    /// per-word sentence positions during analysis.
    pub fn is_training(&self) -> bool {
        matches!(
            self,
            OperationMode::SpeechTraining | OperationMode::FileTraining
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationMode::Speech => "speech",
            OperationMode::SpeechTraining => "speech-training",
            OperationMode::FileTraining => "file-training",
        }
    }
}

impl std::fmt::Display for OperationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counters from one feed import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub malformed: usize,
    pub duplicates: usize,
    /// Lexicon size after the import, pseudo-words included.
    pub total_words: usize,
}

impl std::fmt::Display for ImportReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:<14}{}", "imported", self.imported)?;
        writeln!(f, "{:<14}{}", "malformed", self.malformed)?;
        writeln!(f, "{:<14}{}", "duplicates", self.duplicates)?;
        write!(f, "{:<14}{}", "total words", self.total_words)
    }
}

/// The wordloom prediction engine.
///
/// Single-threaded and synchronous: each utterance is analyzed, predicted,
/// enhanced and assembled to completion before the next one is accepted.
pub struct Engine {
    lexicon: Lexicon,
    graph: Graph,
    index: PatternIndex,
    config: RuntimeConfig,
    active_grammar: GrammarRules,
    formality: Formality,
    mode: OperationMode,
    enhancer: Enhancer,
    assembler: Assembler,
    history: ConversationHistory,
}

impl Engine {
    /// Build an engine from loaded configuration. Settings seed the length
    /// bounds, creativity and user; no I/O happens here.
    pub fn new(config: RuntimeConfig) -> Self {
        let formality = config.settings.formality;
        let mode = config.settings.mode;
        let active_grammar = config.active_grammar(formality);

        let mut assembler = Assembler::new();
        assembler.set_max_words(config.settings.max_words);
        assembler.set_min_words(config.settings.min_words);

        let mut enhancer = Enhancer::new();
        enhancer.creativity_level = config.settings.creativity_level.clamp(0.0, 1.0);
        enhancer.creativity_boost = config.settings.creativity_boost;
        enhancer.current_user = config.settings.user.clone();

        tracing::info!(
            formality = %formality,
            mode = %mode,
            "initializing wordloom engine"
        );

        Self {
            lexicon: Lexicon::new(),
            graph: Graph::new(),
            index: PatternIndex::new(),
            config,
            active_grammar,
            formality,
            mode,
            enhancer,
            assembler,
            history: ConversationHistory::default(),
        }
    }

    // ── Import ──────────────────────────────────────────────────────────

    /// Import feed records. Well-formed new words land in the lexicon and
    /// are wired into the graph; the pseudo-words follow; in training modes
    /// the bridging passes run afterwards.
    pub fn import_records<'a, I>(&mut self, lines: I) -> ImportReport
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut report = ImportReport::default();
        for line in lines {
            match lexicon::parse_feed_line(line) {
                FeedLine::Entry(word, entry) => {
                    if self.lexicon.insert(word.clone(), entry.clone()) {
                        self.graph
                            .link_entry(&word, &entry, &self.lexicon, &self.active_grammar);
                        self.graph.link_partials(&word, &self.lexicon);
                        report.imported += 1;
                    } else {
                        report.duplicates += 1;
                    }
                }
                FeedLine::Ignored => {}
                FeedLine::Malformed => report.malformed += 1,
            }
        }
        self.lexicon.insert_marks_and_digits();
        report.total_words = self.lexicon.len();

        tracing::info!(
            imported = report.imported,
            malformed = report.malformed,
            duplicates = report.duplicates,
            total = report.total_words,
            "imported dictionary feed"
        );

        if self.mode.is_training() {
            self.run_training_passes();
        }
        report
    }

    /// Import a feed file. An unreadable path is an error and leaves the
    /// engine state untouched.
    pub fn import_path(&mut self, path: &Path) -> LoomResult<ImportReport> {
        let content = std::fs::read_to_string(path).map_err(|e| FeedError::Unreadable {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(self.import_records(content.lines()))
    }

    /// Run the four bridging passes over the current lexicon and graph.
    pub fn run_training_passes(&mut self) -> TrainingReport {
        let report = bridge::run_training(
            &mut self.lexicon,
            &mut self.graph,
            &self.index,
            &self.active_grammar,
            &self.config.expert_fields,
        );
        tracing::info!(
            synonym_bridges = report.synonym_bridges,
            antonym_bridges = report.antonym_bridges,
            expert_links = report.expert_links,
            classes_inferred = report.classes_inferred,
            "training passes complete"
        );
        report
    }

    // ── Core operations ─────────────────────────────────────────────────

    /// Analyze one sentence, feeding the pattern index. Position counters
    /// on lexicon entries only move in training modes.
    pub fn analyze_sentence(&mut self, text: &str) -> SentenceReport {
        analyze::analyze_sentence(
            text,
            &mut self.lexicon,
            &self.graph,
            &self.active_grammar,
            &mut self.index,
            &self.config.lists,
            self.mode.is_training(),
        )
    }

    /// Base prediction without enhancement.
    pub fn predict(&self, text: &str, mode: PredictionMode) -> Prediction {
        predict::predict_next(
            text,
            mode,
            &self.lexicon,
            &self.graph,
            &self.index,
            &self.active_grammar,
        )
    }

    /// Prediction with the five enhancement stages applied. Blank input is
    /// fully known and predicts nothing.
    pub fn enhanced_predict(&mut self, text: &str, mode: PredictionMode) -> Prediction {
        if text.trim().is_empty() {
            return Prediction {
                candidates: Vec::new(),
                known_ratio: 100.0,
            };
        }
        let base = self.predict(text, mode);
        if base.is_empty() {
            return base;
        }
        let candidates =
            self.enhancer
                .enhance(text, base.candidates, &self.lexicon, &self.graph);
        Prediction {
            candidates,
            known_ratio: base.known_ratio,
        }
    }

    /// Assemble a sentence from an input and its ranked candidates.
    pub fn generate_sentence(&self, text: &str, ranked: &[Candidate]) -> String {
        self.assembler.generate(
            text,
            ranked,
            &self.lexicon,
            &self.index,
            &self.active_grammar,
            &self.config.lists,
        )
    }

    /// Deduced topic and expert field for a text.
    pub fn deduce_context(&self, text: &str) -> ContextDeduction {
        context::deduce(text, &self.lexicon)
    }

    /// Plural surface form through the configured rule table.
    pub fn pluralize(&self, word: &str) -> String {
        morpho::pluralize(word, &self.config.plural_rules)
    }

    // ── Modes and bounds ────────────────────────────────────────────────

    /// Switch formality and operation mode. The active grammar is
    /// recomputed from the retained formal and casual tables; no file I/O.
    pub fn set_mode(&mut self, formality: Formality, mode: OperationMode) {
        self.formality = formality;
        self.mode = mode;
        self.active_grammar = self.config.active_grammar(formality);
        tracing::info!(formality = %formality, mode = %mode, "switched engine mode");
    }

    pub fn formality(&self) -> Formality {
        self.formality
    }

    pub fn mode(&self) -> OperationMode {
        self.mode
    }

    pub fn set_min_words(&mut self, value: usize) {
        self.assembler.set_min_words(value);
    }

    pub fn set_max_words(&mut self, value: usize) {
        self.assembler.set_max_words(value);
    }

    pub fn min_words(&self) -> usize {
        self.assembler.min_words()
    }

    pub fn max_words(&self) -> usize {
        self.assembler.max_words()
    }

    // ── Enhancement registries ──────────────────────────────────────────

    /// Clamp and set the creativity level; boost passes through.
    pub fn set_creativity(&mut self, level: f64, boost: f64) {
        self.enhancer.creativity_level = level.clamp(0.0, 1.0);
        self.enhancer.creativity_boost = boost;
    }

    pub fn set_user(&mut self, user: &str) {
        self.enhancer.current_user = user.to_string();
    }

    pub fn add_preferred_word(&mut self, word: &str) {
        self.enhancer.mark_preferred(word);
    }

    /// Register a domain specialist vocabulary.
    pub fn register_domain<I>(&mut self, name: &str, vocabulary: I, weight: f64)
    where
        I: IntoIterator<Item = String>,
    {
        let mut specialist = Specialist::new(name, weight);
        specialist.vocabulary = vocabulary.into_iter().collect();
        self.enhancer.register_specialist(specialist);
    }

    /// Force the active domain. Unknown names are rejected.
    pub fn set_domain(&mut self, name: &str) -> Result<(), EngineError> {
        if !self.enhancer.specialists.iter().any(|s| s.name == name) {
            return Err(EngineError::UnknownDomain {
                name: name.to_string(),
            });
        }
        self.enhancer.current_domain = name.to_string();
        Ok(())
    }

    /// Count one exchange against the active user profile, crediting the
    /// deduced topic of the input.
    pub fn record_feedback(&mut self, text: &str) {
        let deduced = self.deduce_context(text);
        let topic = (deduced.topic_confidence > 0.0).then_some(deduced.main_topic);
        self.enhancer.record_interaction(topic.as_deref());
    }

    pub fn push_history(&mut self, user: &str, reply: &str) {
        self.history.push_exchange(user, reply);
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    // ── Introspection ───────────────────────────────────────────────────

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn pattern_index(&self) -> &PatternIndex {
        &self.index
    }

    pub fn info(&self) -> EngineInfo {
        EngineInfo {
            word_count: self.lexicon.len(),
            known_class_count: self.lexicon.known_class_count(),
            graph_edges: self.graph.edge_count(),
            pattern_slots: self.index.bucket_entries(),
            expert_distribution: self.lexicon.expert_distribution(),
            min_words: self.assembler.min_words(),
            max_words: self.assembler.max_words(),
            formality: self.formality,
            mode: self.mode,
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("words", &self.lexicon.len())
            .field("graph_edges", &self.graph.edge_count())
            .field("formality", &self.formality)
            .field("mode", &self.mode)
            .finish()
    }
}

/// Summary of the engine state.
#[derive(Debug, Clone)]
pub struct EngineInfo {
    pub word_count: usize,
    pub known_class_count: usize,
    pub graph_edges: usize,
    pub pattern_slots: usize,
    pub expert_distribution: BTreeMap<String, usize>,
    pub min_words: usize,
    pub max_words: usize,
    pub formality: Formality,
    pub mode: OperationMode,
}

impl std::fmt::Display for EngineInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "wordloom engine info")?;
        writeln!(f, "  words:          {}", self.word_count)?;
        writeln!(f, "  known classes:  {}", self.known_class_count)?;
        writeln!(f, "  graph edges:    {}", self.graph_edges)?;
        writeln!(f, "  pattern slots:  {}", self.pattern_slots)?;
        writeln!(f, "  word bounds:    {}..={}", self.min_words, self.max_words)?;
        writeln!(f, "  formality:      {}", self.formality)?;
        writeln!(f, "  mode:           {}", self.mode)?;
        write!(f, "  expert fields:")?;
        for (field, count) in &self.expert_distribution {
            write!(f, " {field}={count}")?;
        }
        Ok(())
    }
}
