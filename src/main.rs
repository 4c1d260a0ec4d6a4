//! wordloom CLI: rule-based lexical prediction and sentence assembly.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use wordloom::config::RuntimeConfig;
use wordloom::engine::{Engine, OperationMode};
use wordloom::grammar::Formality;
use wordloom::paths::LoomPaths;
use wordloom::predict::{Prediction, PredictionMode};
use wordloom::seed;

/// Known ratio below which the engine asks for a rephrase instead of
/// generating.
const REPHRASE_THRESHOLD: f64 = 50.0;

#[derive(Parser)]
#[command(
    name = "wordloom",
    version,
    about = "Rule-based lexical prediction and sentence assembly engine"
)]
struct Cli {
    /// Data directory holding the dictionary feed and configuration.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Raise wordloom log output to debug.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the data directory with the default configuration files.
    Init {
        /// Overwrite files that already exist.
        #[arg(long)]
        force: bool,
    },

    /// Import a dictionary feed file into a fresh engine.
    Import {
        /// Path to the semicolon-delimited feed.
        file: PathBuf,
    },

    /// Analyze a sentence and print the report.
    Analyze {
        text: String,

        /// Run in training mode (feeds per-word position counters).
        #[arg(long)]
        train: bool,
    },

    /// Predict likely next words.
    Predict {
        text: String,

        /// Scoring mode: simple or complex.
        #[arg(long, default_value = "complex")]
        mode: String,

        /// Apply the enhancement pipeline.
        #[arg(long)]
        enhanced: bool,
    },

    /// Predict and assemble a full continuation.
    Generate {
        text: String,

        /// Scoring mode: simple or complex.
        #[arg(long, default_value = "complex")]
        mode: String,

        /// Minimum words in the response.
        #[arg(long)]
        min: Option<usize>,

        /// Maximum words in the response.
        #[arg(long)]
        max: Option<usize>,
    },

    /// Show engine statistics after loading the default feed.
    Info,

    /// Interactive session.
    Repl,
}

fn parse_mode(label: &str) -> Result<PredictionMode> {
    match label {
        "simple" => Ok(PredictionMode::Simple),
        "complex" => Ok(PredictionMode::Complex),
        other => miette::bail!("unknown prediction mode \"{other}\" (simple or complex)"),
    }
}

/// Load configuration and build an engine with the default feed imported.
/// A missing or unreadable feed logs a warning; the engine still works
/// with whatever loaded.
fn load_engine(paths: &LoomPaths) -> Result<Engine> {
    let config = RuntimeConfig::load(paths).into_diagnostic()?;
    let mut engine = Engine::new(config);
    let feed = paths.dictionary_file();
    match engine.import_path(&feed) {
        Ok(report) => {
            tracing::debug!(imported = report.imported, "loaded default feed");
        }
        Err(e) => {
            tracing::warn!(
                feed = %feed.display(),
                error = %e,
                "dictionary feed not loaded, continuing with an empty lexicon"
            );
        }
    }
    Ok(engine)
}

fn print_prediction(prediction: &Prediction, engine: &Engine) {
    if prediction.is_empty() {
        println!("No candidates. (known ratio {:.1}%)", prediction.known_ratio);
        return;
    }
    println!(
        "Candidates (known ratio {:.1}%):",
        prediction.known_ratio
    );
    for (i, candidate) in prediction.candidates.iter().enumerate() {
        let class = engine.lexicon().class_of(&candidate.word);
        println!(
            "  {}. {} [{}] {:.4}",
            i + 1,
            candidate.word,
            class,
            candidate.score
        );
    }
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok();

    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "wordloom=debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    let paths = LoomPaths::resolve(cli.data_dir.as_deref()).into_diagnostic()?;

    match cli.command {
        Commands::Init { force } => {
            paths.ensure_dirs().into_diagnostic()?;
            let report = seed::write_defaults(&paths, force).into_diagnostic()?;
            println!("Seeded {}", paths.data_dir.display());
            for file in &report.written {
                println!("  wrote   {file}");
            }
            for file in &report.skipped {
                println!("  kept    {file}");
            }
        }

        Commands::Import { file } => {
            let config = RuntimeConfig::load(&paths).into_diagnostic()?;
            let mut engine = Engine::new(config);
            let report = engine.import_path(&file).into_diagnostic()?;
            println!("{report}");
        }

        Commands::Analyze { text, train } => {
            let mut engine = load_engine(&paths)?;
            if train {
                engine.set_mode(engine.formality(), OperationMode::SpeechTraining);
            }
            let report = engine.analyze_sentence(&text);
            println!("{report}");
            if !report.relationship_patterns.is_empty() {
                println!("relationships:");
                for line in &report.relationship_patterns {
                    println!("  {line}");
                }
            }
        }

        Commands::Predict {
            text,
            mode,
            enhanced,
        } => {
            let mode = parse_mode(&mode)?;
            let mut engine = load_engine(&paths)?;
            let prediction = if enhanced {
                engine.enhanced_predict(&text, mode)
            } else {
                engine.predict(&text, mode)
            };
            print_prediction(&prediction, &engine);
        }

        Commands::Generate {
            text,
            mode,
            min,
            max,
        } => {
            let mode = parse_mode(&mode)?;
            let mut engine = load_engine(&paths)?;
            if let Some(max) = max {
                engine.set_max_words(max);
            }
            if let Some(min) = min {
                engine.set_min_words(min);
            }
            let prediction = engine.enhanced_predict(&text, mode);
            if prediction.known_ratio < REPHRASE_THRESHOLD {
                println!(
                    "I only recognize {:.1}% of that. Could you rephrase?",
                    prediction.known_ratio
                );
            } else {
                println!("{}", engine.generate_sentence(&text, &prediction.candidates));
            }
        }

        Commands::Info => {
            let engine = load_engine(&paths)?;
            println!("{}", engine.info());
        }

        Commands::Repl => {
            let engine = load_engine(&paths)?;
            run_repl(engine)?;
        }
    }

    Ok(())
}

// ── Interactive session ─────────────────────────────────────────────────

/// Explicit state machine: the menu re-enters by looping, never by
/// recursion, so long sessions cannot grow the call stack.
enum ReplState {
    Menu,
    Session,
    Done,
}

fn prompt(text: &str) -> Result<Option<String>> {
    print!("{text}");
    std::io::stdout().flush().into_diagnostic()?;
    let mut line = String::new();
    let read = std::io::stdin()
        .lock()
        .read_line(&mut line)
        .into_diagnostic()?;
    if read == 0 {
        return Ok(None); // EOF
    }
    Ok(Some(line.trim().to_string()))
}

/// Strip an inline `--min N` / `--max N` directive, applying it through
/// the clamped setters. A space between flag and number is optional.
fn apply_bound_directives(input: &str, engine: &mut Engine) -> String {
    let mut rest = String::new();
    let mut tokens = input.split_whitespace().peekable();
    while let Some(token) = tokens.next() {
        let flag = if let Some(v) = token.strip_prefix("--min") {
            Some((true, v))
        } else {
            token.strip_prefix("--max").map(|v| (false, v))
        };
        if let Some((is_min, value)) = flag {
            let number = if value.is_empty() {
                match tokens.peek().and_then(|n| n.parse::<usize>().ok()) {
                    Some(n) => {
                        tokens.next();
                        Some(n)
                    }
                    None => None,
                }
            } else {
                value.parse::<usize>().ok()
            };
            if let Some(n) = number {
                if is_min {
                    engine.set_min_words(n);
                } else {
                    engine.set_max_words(n);
                }
                println!(
                    "Response length: {}..={} words.",
                    engine.min_words(),
                    engine.max_words()
                );
                continue;
            }
        }
        if !rest.is_empty() {
            rest.push(' ');
        }
        rest.push_str(token);
    }
    rest
}

fn choose_modes(engine: &mut Engine) -> Result<Option<()>> {
    println!("Operation mode:");
    println!("  1. speech");
    println!("  2. speech training");
    println!("  3. file training");
    let mode = loop {
        let Some(choice) = prompt("> ")? else {
            return Ok(None);
        };
        match choice.as_str() {
            "1" => break OperationMode::Speech,
            "2" => break OperationMode::SpeechTraining,
            "3" => break OperationMode::FileTraining,
            "/quit" => return Ok(None),
            _ => println!("Choose 1, 2 or 3."),
        }
    };

    println!("Formality:");
    println!("  1. formal");
    println!("  2. casual");
    let formality = loop {
        let Some(choice) = prompt("> ")? else {
            return Ok(None);
        };
        match choice.as_str() {
            "1" => break Formality::Formal,
            "2" => break Formality::Casual,
            "/quit" => return Ok(None),
            _ => println!("Choose 1 or 2."),
        }
    };

    engine.set_mode(formality, mode);
    Ok(Some(()))
}

fn speech_turn(engine: &mut Engine, input: &str) {
    let prediction = engine.enhanced_predict(input, PredictionMode::Complex);
    if prediction.known_ratio < REPHRASE_THRESHOLD {
        println!(
            "I only recognize {:.1}% of that. Could you rephrase?",
            prediction.known_ratio
        );
        return;
    }
    let reply = engine.generate_sentence(input, &prediction.candidates);
    println!("{reply}");
    engine.record_feedback(input);
    engine.push_history(input, &reply);
}

fn training_turn(engine: &mut Engine, input: &str) {
    let report = engine.analyze_sentence(input);
    println!("{report}");

    let prediction = engine.predict(input, PredictionMode::Complex);
    if !prediction.is_empty() {
        println!("predictions:");
        for candidate in prediction.candidates.iter().take(5) {
            println!("  {} {:.4}", candidate.word, candidate.score);
        }
    }
    if !report.relationship_patterns.is_empty() {
        println!("strongest pairs:");
        let mut pairs = report.relationship_patterns.clone();
        pairs.sort_by(|a, b| b.strength.total_cmp(&a.strength));
        for line in pairs.iter().take(3) {
            println!("  {line}");
        }
    }
}

fn file_training_entry(engine: &mut Engine) {
    let report = engine.run_training_passes();
    println!("{}", engine.info());
    println!("{report}");
    println!("/back for the menu, /quit to exit.");
}

fn run_repl(mut engine: Engine) -> Result<()> {
    println!("wordloom interactive session. /quit exits, /back returns to the menu.");
    let mut state = ReplState::Menu;

    loop {
        state = match state {
            ReplState::Menu => match choose_modes(&mut engine)? {
                Some(()) => {
                    if engine.mode() == OperationMode::FileTraining {
                        file_training_entry(&mut engine);
                    }
                    ReplState::Session
                }
                None => ReplState::Done,
            },
            ReplState::Session => {
                let Some(line) = prompt("you> ")? else {
                    break;
                };
                match line.as_str() {
                    "/quit" => ReplState::Done,
                    "/back" => ReplState::Menu,
                    "" => ReplState::Session,
                    _ => {
                        let input = apply_bound_directives(&line, &mut engine);
                        if !input.is_empty() {
                            match engine.mode() {
                                OperationMode::Speech => speech_turn(&mut engine, &input),
                                OperationMode::SpeechTraining => {
                                    training_turn(&mut engine, &input)
                                }
                                OperationMode::FileTraining => {
                                    println!("/back for the menu, /quit to exit.");
                                }
                            }
                        }
                        ReplState::Session
                    }
                }
            }
            ReplState::Done => break,
        };
    }

    tracing::info!(exchanges = engine.history().len() / 2, "session closed");
    Ok(())
}
