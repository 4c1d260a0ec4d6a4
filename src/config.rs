//! Configuration loading: persisted settings (TOML) plus the word lists and
//! JSON tables that drive detection, grammar and training.
//!
//! Everything loads from the flat data directory resolved by
//! [`crate::paths::LoomPaths`]. Missing optional files fall back to empty
//! defaults; only the formal grammar tables are mandatory, since prediction
//! is unusable without them.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::engine::OperationMode;
use crate::error::ConfigError;
use crate::grammar::{Formality, GrammarRules};
use crate::morpho::PluralRules;
use crate::paths::LoomPaths;

pub const QUESTION_WORDS_FILE: &str = "question_words.txt";
pub const ANSWER_WORDS_FILE: &str = "answer_words.txt";
pub const FACT_WORDS_FILE: &str = "fact_words.txt";
pub const THEORY_WORDS_FILE: &str = "theory_words.txt";
pub const PAST_INDICATORS_FILE: &str = "past_indicators.txt";
pub const FUTURE_INDICATORS_FILE: &str = "future_indicators.txt";
pub const GRAMMAR_FORMAL_FILE: &str = "grammar_flow_formal.json";
pub const GRAMMAR_CASUAL_FILE: &str = "grammar_flow_casual.json";
pub const EXPERT_FIELDS_FILE: &str = "expert_fields.json";
pub const PLURAL_RULES_FILE: &str = "plural_rules.json";
pub const DICTIONARY_FILE: &str = "dictionary.txt";

// ── Persisted settings ──────────────────────────────────────────────────

/// User settings, persisted as TOML in the data directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Active formality, selecting the grammar overlay.
    #[serde(default)]
    pub formality: Formality,
    /// Operation mode the engine starts in.
    #[serde(default)]
    pub mode: OperationMode,
    /// Minimum words in an assembled response.
    #[serde(default = "default_min_words")]
    pub min_words: usize,
    /// Maximum words in an assembled response.
    #[serde(default = "default_max_words")]
    pub max_words: usize,
    /// Creative-variation threshold, 0.0 disables the stage.
    #[serde(default = "default_creativity_level")]
    pub creativity_level: f64,
    /// Multiplier applied to sub-threshold candidates.
    #[serde(default = "default_creativity_boost")]
    pub creativity_boost: f64,
    /// Profile id for the personalization stage.
    #[serde(default = "default_user")]
    pub user: String,
}

fn default_min_words() -> usize {
    3
}
fn default_max_words() -> usize {
    20
}
fn default_creativity_level() -> f64 {
    0.5
}
fn default_creativity_boost() -> f64 {
    0.3
}
fn default_user() -> String {
    "default".into()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            formality: Formality::Formal,
            mode: OperationMode::Speech,
            min_words: default_min_words(),
            max_words: default_max_words(),
            creativity_level: default_creativity_level(),
            creativity_boost: default_creativity_boost(),
            user: default_user(),
        }
    }
}

impl Settings {
    /// Load from a TOML file; a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }
}

// ── Word lists ──────────────────────────────────────────────────────────

/// The six detection word lists.
#[derive(Debug, Clone, Default)]
pub struct WordLists {
    pub question: Vec<String>,
    pub answer: Vec<String>,
    pub fact: Vec<String>,
    pub theory: Vec<String>,
    pub past_indicators: Vec<String>,
    pub future_indicators: Vec<String>,
}

fn read_word_list(path: &Path) -> Result<Vec<String>, ConfigError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_lowercase)
        .collect())
}

impl WordLists {
    pub fn load(paths: &LoomPaths) -> Result<Self, ConfigError> {
        Ok(Self {
            question: read_word_list(&paths.file(QUESTION_WORDS_FILE))?,
            answer: read_word_list(&paths.file(ANSWER_WORDS_FILE))?,
            fact: read_word_list(&paths.file(FACT_WORDS_FILE))?,
            theory: read_word_list(&paths.file(THEORY_WORDS_FILE))?,
            past_indicators: read_word_list(&paths.file(PAST_INDICATORS_FILE))?,
            future_indicators: read_word_list(&paths.file(FUTURE_INDICATORS_FILE))?,
        })
    }
}

// ── Expert fields ───────────────────────────────────────────────────────

/// One configured expert field. The file is an ordered array so tie-breaks
/// in field deduction follow the configured order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpertField {
    pub name: String,
    pub weight: f64,
    #[serde(default)]
    pub keywords: Vec<String>,
}

// ── Aggregate ───────────────────────────────────────────────────────────

fn read_json_or_default<T>(path: &Path) -> Result<T, ConfigError>
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        return Ok(T::default());
    }
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Everything loaded from the data directory in one pass.
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    pub settings: Settings,
    pub lists: WordLists,
    pub formal_grammar: GrammarRules,
    pub casual_overlay: GrammarRules,
    pub expert_fields: Vec<ExpertField>,
    pub plural_rules: PluralRules,
}

impl RuntimeConfig {
    /// Load all configuration. The formal grammar file must exist; the
    /// casual overlay and every other table degrade to empty defaults.
    pub fn load(paths: &LoomPaths) -> Result<Self, ConfigError> {
        let formal_path = paths.file(GRAMMAR_FORMAL_FILE);
        if !formal_path.exists() {
            return Err(ConfigError::GrammarMissing {
                path: formal_path.display().to_string(),
            });
        }

        let plural_path = paths.file(PLURAL_RULES_FILE);
        let plural_rules = if plural_path.exists() {
            read_json_or_default(&plural_path)?
        } else {
            PluralRules::builtin()
        };

        Ok(Self {
            settings: Settings::load_or_default(&paths.settings_file())?,
            lists: WordLists::load(paths)?,
            formal_grammar: read_json_or_default(&formal_path)?,
            casual_overlay: read_json_or_default(&paths.file(GRAMMAR_CASUAL_FILE))?,
            expert_fields: read_json_or_default(&paths.file(EXPERT_FIELDS_FILE))?,
            plural_rules,
        })
    }

    /// Grammar tables active under a formality: the formal tables, with the
    /// casual overlay merged per-row when casual is selected.
    pub fn active_grammar(&self, formality: Formality) -> GrammarRules {
        let mut rules = self.formal_grammar.clone();
        if formality == Formality::Casual {
            rules.merge_overlay(self.casual_overlay.clone());
        }
        rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn seeded_dir() -> (TempDir, LoomPaths) {
        let dir = TempDir::new().unwrap();
        let paths = LoomPaths {
            data_dir: dir.path().to_path_buf(),
        };
        fs::write(
            paths.file(GRAMMAR_FORMAL_FILE),
            r#"{"flow_rules": {"noun": {"verb": 0.9}}}"#,
        )
        .unwrap();
        (dir, paths)
    }

    #[test]
    fn settings_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");

        let missing = Settings::load_or_default(&path).unwrap();
        assert_eq!(missing.min_words, 3);
        assert_eq!(missing.max_words, 20);
        assert_eq!(missing.formality, Formality::Formal);

        let settings = Settings {
            formality: Formality::Casual,
            mode: OperationMode::SpeechTraining,
            max_words: 12,
            ..Settings::default()
        };
        settings.save(&path).unwrap();

        let loaded = Settings::load_or_default(&path).unwrap();
        assert_eq!(loaded.formality, Formality::Casual);
        assert_eq!(loaded.mode, OperationMode::SpeechTraining);
        assert_eq!(loaded.max_words, 12);
        assert_eq!(loaded.user, "default");
    }

    #[test]
    fn settings_fill_missing_fields_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "min_words = 5\n").unwrap();

        let loaded = Settings::load_or_default(&path).unwrap();
        assert_eq!(loaded.min_words, 5);
        assert_eq!(loaded.max_words, 20);
    }

    #[test]
    fn missing_formal_grammar_is_fatal() {
        let dir = TempDir::new().unwrap();
        let paths = LoomPaths {
            data_dir: dir.path().to_path_buf(),
        };
        let err = RuntimeConfig::load(&paths).unwrap_err();
        assert!(matches!(err, ConfigError::GrammarMissing { .. }));
    }

    #[test]
    fn optional_files_degrade_gracefully() {
        let (_dir, paths) = seeded_dir();
        let config = RuntimeConfig::load(&paths).unwrap();
        assert!(config.lists.question.is_empty());
        assert!(config.expert_fields.is_empty());
        // Plural rules fall back to the built-in table, not to empty.
        assert_eq!(config.plural_rules.irregular["man"], "men");
        assert_eq!(config.formal_grammar.flow("noun", "verb"), 0.9);
    }

    #[test]
    fn word_lists_lowercase_and_skip_blanks() {
        let (_dir, paths) = seeded_dir();
        fs::write(
            paths.file(QUESTION_WORDS_FILE),
            "What\n\n  HOW  \n?\n",
        )
        .unwrap();
        let config = RuntimeConfig::load(&paths).unwrap();
        assert_eq!(config.lists.question, vec!["what", "how", "?"]);
    }

    #[test]
    fn casual_overlay_merges_only_when_selected() {
        let (_dir, paths) = seeded_dir();
        fs::write(
            paths.file(GRAMMAR_CASUAL_FILE),
            r#"{"flow_rules": {"noun": {"adjective": 0.6}}}"#,
        )
        .unwrap();
        let config = RuntimeConfig::load(&paths).unwrap();

        let formal = config.active_grammar(Formality::Formal);
        assert_eq!(formal.flow("noun", "verb"), 0.9);
        assert_eq!(formal.flow("noun", "adjective"), 0.1);

        let casual = config.active_grammar(Formality::Casual);
        assert_eq!(casual.flow("noun", "adjective"), 0.6);
        // The overlay row replaces the formal row outright.
        assert_eq!(casual.flow("noun", "verb"), 0.1);
    }

    #[test]
    fn expert_fields_keep_file_order() {
        let (_dir, paths) = seeded_dir();
        fs::write(
            paths.file(EXPERT_FIELDS_FILE),
            r#"[
                {"name": "stem", "weight": 1.5, "keywords": ["science"]},
                {"name": "art", "weight": 1.3, "keywords": ["paint"]}
            ]"#,
        )
        .unwrap();
        let config = RuntimeConfig::load(&paths).unwrap();
        let names: Vec<&str> = config.expert_fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["stem", "art"]);
    }
}
