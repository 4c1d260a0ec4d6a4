//! End-to-end tests for the wordloom engine.
//!
//! Each test seeds a temporary data directory with the bundled defaults,
//! loads the runtime configuration, and drives a full engine through
//! import, analysis, prediction and assembly.

use tempfile::TempDir;

use wordloom::config::RuntimeConfig;
use wordloom::engine::{Engine, OperationMode};
use wordloom::grammar::Formality;
use wordloom::lexicon::WordClass;
use wordloom::paths::LoomPaths;
use wordloom::predict::PredictionMode;
use wordloom::seed;

fn seeded_engine() -> (TempDir, Engine) {
    let dir = TempDir::new().unwrap();
    let paths = LoomPaths {
        data_dir: dir.path().to_path_buf(),
    };
    seed::write_defaults(&paths, false).unwrap();

    let config = RuntimeConfig::load(&paths).unwrap();
    let mut engine = Engine::new(config);
    engine.import_path(&paths.dictionary_file()).unwrap();
    (dir, engine)
}

#[test]
fn seeded_import_builds_the_full_model() {
    let (_dir, engine) = seeded_engine();
    let info = engine.info();

    // 35 dictionary records plus 15 marks and 10 digits.
    assert_eq!(info.word_count, 60);
    assert_eq!(info.known_class_count, 60);
    assert!(info.graph_edges > 0);
    assert_eq!(info.expert_distribution["general"], 60);
    assert_eq!(info.min_words, 3);
    assert_eq!(info.max_words, 20);
}

#[test]
fn computer_record_scenario() {
    let (_dir, engine) = seeded_engine();

    let entry = engine.lexicon().get("computer").unwrap();
    assert_eq!(entry.class, WordClass::Noun);
    assert_eq!(entry.synonyms, vec!["machine", "device", "pc"]);

    assert_eq!(engine.graph().weight("computer", "machine"), 2.0);
    assert_eq!(engine.graph().weight("machine", "computer"), 2.0);
    assert_eq!(engine.graph().weight("computer", "device"), 2.0);
    // "pc" is both a synonym and an acronym.
    assert_eq!(engine.graph().weight("computer", "pc"), 3.0);
}

#[test]
fn antonym_import_wires_negative_edges_both_ways() {
    let (_dir, engine) = seeded_engine();
    assert_eq!(engine.graph().weight("analyze", "ignore"), -1.5);
    assert_eq!(engine.graph().weight("ignore", "analyze"), -1.5);
    assert_eq!(engine.graph().weight("digital", "analog"), -1.5);
}

#[test]
fn known_ratio_bounds_and_unknown_tokens() {
    let (_dir, engine) = seeded_engine();

    assert_eq!(engine.predict("", PredictionMode::Simple).known_ratio, 0.0);
    assert_eq!(engine.lexicon().class_of("qzxy"), WordClass::Unknown);

    // "data" is known, "qzxy" counts in the denominator only.
    let p = engine.predict("data qzxy", PredictionMode::Simple);
    assert_eq!(p.known_ratio, 50.0);

    let full = engine.predict("the computer is digital", PredictionMode::Simple);
    assert_eq!(full.known_ratio, 100.0);
    assert!((0.0..=100.0).contains(&full.known_ratio));
}

#[test]
fn predictions_are_positive_and_strictly_ranked() {
    let (_dir, mut engine) = seeded_engine();

    for mode in [PredictionMode::Simple, PredictionMode::Complex] {
        let p = engine.predict("the computer", mode);
        assert!(!p.is_empty(), "no candidates in {mode} mode");
        assert!(p.candidates.len() <= 10);
        assert!(p.candidates.iter().all(|c| c.score > 0.0));
        for pair in p.candidates.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    let enhanced = engine.enhanced_predict("the computer", PredictionMode::Complex);
    assert!(enhanced.candidates.iter().all(|c| c.score > 0.0));
    for pair in enhanced.candidates.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn enhanced_predict_treats_blank_input_as_fully_known() {
    let (_dir, mut engine) = seeded_engine();
    let p = engine.enhanced_predict("   ", PredictionMode::Complex);
    assert!(p.is_empty());
    assert_eq!(p.known_ratio, 100.0);
}

#[test]
fn question_input_yields_question_output() {
    let (_dir, mut engine) = seeded_engine();

    let report = engine.analyze_sentence("What is data");
    assert_eq!(report.sentence_type.as_str(), "question");

    let prediction = engine.enhanced_predict("What is data", PredictionMode::Complex);
    let reply = engine.generate_sentence("What is data", &prediction.candidates);
    assert!(reply.ends_with('?'), "not a question: {reply}");
    assert!(reply.starts_with("What"));
    assert!(reply.split_whitespace().count() >= 3);
}

#[test]
fn generation_respects_length_bounds() {
    let (_dir, mut engine) = seeded_engine();

    let prediction = engine.enhanced_predict("data", PredictionMode::Complex);
    let reply = engine.generate_sentence("data", &prediction.candidates);
    let word_count = reply
        .trim_end_matches(['.', '?'])
        .split_whitespace()
        .count();
    // Backfill reaches the minimum; expansion stays under the maximum.
    assert!(word_count >= 3, "too short: {reply}");
    assert!(word_count <= 20, "too long: {reply}");

    engine.set_max_words(5);
    let input = "the computer is very digital";
    let prediction = engine.enhanced_predict(input, PredictionMode::Complex);
    let reply = engine.generate_sentence(input, &prediction.candidates);
    let word_count = reply
        .trim_end_matches(['.', '?'])
        .split_whitespace()
        .count();
    assert_eq!(word_count, 5, "max not respected: {reply}");
}

#[test]
fn reimporting_a_conflicting_record_changes_nothing() {
    let (_dir, mut engine) = seeded_engine();

    let report = engine.import_records(["verb; computer; ; ; ; ; something else entirely"]);
    assert_eq!(report.imported, 0);
    assert_eq!(report.duplicates, 1);

    let entry = engine.lexicon().get("computer").unwrap();
    assert_eq!(entry.class, WordClass::Noun);
    assert_eq!(entry.meaning, "electronic device");
}

#[test]
fn analysis_feeds_the_pattern_index() {
    let (_dir, mut engine) = seeded_engine();

    assert_eq!(engine.pattern_index().after_weight("data", "analyze"), 0.0);
    engine.analyze_sentence("data analyze computer");
    assert!(engine.pattern_index().after_weight("data", "analyze") > 0.0);
    assert!(engine.pattern_index().after_weight("analyze", "data") == 0.0);
}

#[test]
fn training_mode_counts_sentence_positions() {
    let (_dir, mut engine) = seeded_engine();

    engine.analyze_sentence("computer analyze data");
    assert!(
        engine
            .lexicon()
            .get("data")
            .unwrap()
            .pattern_data
            .position_patterns
            .is_empty()
    );

    engine.set_mode(Formality::Formal, OperationMode::SpeechTraining);
    engine.analyze_sentence("computer analyze data");
    let entry = engine.lexicon().get("data").unwrap();
    assert_eq!(entry.pattern_data.position_patterns.len(), 1);
}

#[test]
fn training_passes_bridge_synonym_lists() {
    let (_dir, mut engine) = seeded_engine();
    engine.set_mode(Formality::Formal, OperationMode::FileTraining);

    let report = engine.run_training_passes();
    assert!(report.synonym_bridges > 0);

    // "compute" lists "analyze", whose synonyms carry over one hop.
    let synonyms = &engine.lexicon().get("compute").unwrap().synonyms;
    assert!(synonyms.contains(&"examine".to_string()), "{synonyms:?}");
    assert!(synonyms.contains(&"study".to_string()), "{synonyms:?}");

    // A second run adds nothing new for this closure depth.
    let again = engine.run_training_passes();
    assert_eq!(again.synonym_bridges, 0);
    assert_eq!(again.antonym_bridges, 0);
}

#[test]
fn history_and_feedback_accumulate() {
    let (_dir, mut engine) = seeded_engine();

    let prediction = engine.enhanced_predict("the computer", PredictionMode::Complex);
    let reply = engine.generate_sentence("the computer", &prediction.candidates);
    engine.record_feedback("the computer");
    engine.push_history("the computer", &reply);

    assert_eq!(engine.history().len(), 2);
}
