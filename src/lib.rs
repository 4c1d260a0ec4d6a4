//! # wordloom
//!
//! A rule-based (non-statistical, non-neural) text-completion engine. A
//! hand-curated lexicon, a signed weighted word-relationship graph and
//! positional co-occurrence statistics drive next-word scoring and
//! grammar-guided assembly of sentence continuations.
//!
//! ## Architecture
//!
//! - **Lexicon store** (`lexicon`): word entries keyed by surface form,
//!   ingested from a semicolon-delimited feed
//! - **Relationship graph** (`graph`): signed weighted directed edges from
//!   synonym/antonym/acronym/class/partial-match links
//! - **Pattern index** (`pattern`): per-word before/after/position statistics
//!   fed by every analyzed sentence
//! - **Prediction** (`predict`): simple and complex scoring modes, top-10
//! - **Enhancement** (`enhance`): tone, domain, creativity and profile
//!   transforms over the ranked list
//! - **Assembly** (`assemble`): grammar-guided completion within length bounds
//! - **Training** (`bridge`): one-hop synonym/antonym/expert/class closure
//!   passes
//!
//! ## Library usage
//!
//! ```no_run
//! use wordloom::config::RuntimeConfig;
//! use wordloom::engine::Engine;
//! use wordloom::predict::PredictionMode;
//!
//! let mut engine = Engine::new(RuntimeConfig::default());
//! engine.import_records([
//!     "noun; computer; computer; computers; machine,device; ; electronic device",
//!     "verb; compute; compute; computes; calculate,process; ; perform calculations",
//! ]);
//! let prediction = engine.enhanced_predict("the computer", PredictionMode::Complex);
//! let reply = engine.generate_sentence("the computer", &prediction.candidates);
//! ```

pub mod analyze;
pub mod assemble;
pub mod bridge;
pub mod config;
pub mod context;
pub mod engine;
pub mod enhance;
pub mod error;
pub mod grammar;
pub mod graph;
pub mod lexicon;
pub mod morpho;
pub mod paths;
pub mod pattern;
pub mod predict;
pub mod rank;
pub mod seed;
pub mod tokenize;
