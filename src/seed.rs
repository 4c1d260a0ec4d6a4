//! Bundled default data files and the `init` seeding pass.
//!
//! Every data file the engine reads ships inside the binary via
//! `include_str!`. [`write_defaults`] materializes the missing ones into the
//! data directory; existing files are left alone unless `force` is set, so
//! user edits survive re-running `init`.

use miette::Diagnostic;
use thiserror::Error;

use crate::config;
use crate::paths::LoomPaths;

// ── Errors ──────────────────────────────────────────────────────────────

#[derive(Debug, Error, Diagnostic)]
pub enum SeedError {
    #[error("failed to write default file: {path}")]
    #[diagnostic(
        code(loom::seed::write),
        help("Ensure the data directory exists and is writable.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type SeedResult<T> = std::result::Result<T, SeedError>;

// ── Bundled defaults ────────────────────────────────────────────────────

const QUESTION_WORDS: &str = include_str!("../data/question_words.txt");
const ANSWER_WORDS: &str = include_str!("../data/answer_words.txt");
const FACT_WORDS: &str = include_str!("../data/fact_words.txt");
const THEORY_WORDS: &str = include_str!("../data/theory_words.txt");
const PAST_INDICATORS: &str = include_str!("../data/past_indicators.txt");
const FUTURE_INDICATORS: &str = include_str!("../data/future_indicators.txt");
const GRAMMAR_FORMAL: &str = include_str!("../data/grammar_flow_formal.json");
const GRAMMAR_CASUAL: &str = include_str!("../data/grammar_flow_casual.json");
const EXPERT_FIELDS: &str = include_str!("../data/expert_fields.json");
const PLURAL_RULES: &str = include_str!("../data/plural_rules.json");
const DICTIONARY: &str = include_str!("../data/dictionary.txt");

/// Every bundled file, in seed order.
pub fn bundled_files() -> [(&'static str, &'static str); 11] {
    [
        (config::QUESTION_WORDS_FILE, QUESTION_WORDS),
        (config::ANSWER_WORDS_FILE, ANSWER_WORDS),
        (config::FACT_WORDS_FILE, FACT_WORDS),
        (config::THEORY_WORDS_FILE, THEORY_WORDS),
        (config::PAST_INDICATORS_FILE, PAST_INDICATORS),
        (config::FUTURE_INDICATORS_FILE, FUTURE_INDICATORS),
        (config::GRAMMAR_FORMAL_FILE, GRAMMAR_FORMAL),
        (config::GRAMMAR_CASUAL_FILE, GRAMMAR_CASUAL),
        (config::EXPERT_FIELDS_FILE, EXPERT_FIELDS),
        (config::PLURAL_RULES_FILE, PLURAL_RULES),
        (config::DICTIONARY_FILE, DICTIONARY),
    ]
}

// ── Seeding ─────────────────────────────────────────────────────────────

/// Report after a seeding pass.
#[derive(Debug, Clone, Default)]
pub struct SeedReport {
    pub written: Vec<String>,
    pub skipped: Vec<String>,
}

/// Write each missing default file into the data directory. With `force`,
/// existing files are overwritten as well.
pub fn write_defaults(paths: &LoomPaths, force: bool) -> SeedResult<SeedReport> {
    let mut report = SeedReport::default();
    for (name, content) in bundled_files() {
        let path = paths.file(name);
        if path.exists() && !force {
            report.skipped.push(name.to_string());
            continue;
        }
        std::fs::write(&path, content).map_err(|e| SeedError::Write {
            path: path.display().to_string(),
            source: e,
        })?;
        tracing::debug!(file = name, "wrote default data file");
        report.written.push(name.to_string());
    }
    tracing::info!(
        written = report.written.len(),
        skipped = report.skipped.len(),
        "seeded default data files"
    );
    Ok(report)
}
