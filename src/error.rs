//! Rich diagnostic error types for the wordloom engine.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so users know exactly what
//! went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the wordloom engine.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text, sources) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum LoomError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Engine(#[from] EngineError),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("grammar configuration not found: {path}")]
    #[diagnostic(
        code(loom::config::grammar_missing),
        help(
            "Prediction quality depends entirely on the grammar tables, so there \
             is no embedded fallback. Run `wordloom init` to write the default \
             configuration files, or point --data-dir at an existing set."
        )
    )]
    GrammarMissing { path: String },

    #[error("failed to read configuration file: {path}")]
    #[diagnostic(
        code(loom::config::read),
        help("Ensure the file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration file: {path}: {message}")]
    #[diagnostic(
        code(loom::config::parse),
        help(
            "Check the file syntax. Grammar, expert-field, and plural-rule files \
             are JSON; the settings file is TOML. `wordloom init --force` restores \
             the defaults."
        )
    )]
    Parse { path: String, message: String },

    #[error("failed to write configuration file: {path}")]
    #[diagnostic(
        code(loom::config::write),
        help("Ensure you have write permissions to the data directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Dictionary feed errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum FeedError {
    #[error("failed to read dictionary feed: {path}")]
    #[diagnostic(
        code(loom::feed::unreadable),
        help(
            "Check the feed path and permissions. Malformed records inside a \
             readable feed are skipped, never fatal; only an unreadable file \
             reports an error."
        )
    )]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Engine errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum EngineError {
    #[error("unknown domain: \"{name}\"")]
    #[diagnostic(
        code(loom::engine::unknown_domain),
        help(
            "Only registered domains can be selected. Add it first with \
             `register_domain`, or check `wordloom info` for the known set."
        )
    )]
    UnknownDomain { name: String },
}

/// Convenience alias for functions returning wordloom results.
pub type LoomResult<T> = std::result::Result<T, LoomError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_to_loom_error() {
        let err = ConfigError::GrammarMissing {
            path: "/tmp/none/grammar_flow_formal.json".into(),
        };
        let loom: LoomError = err.into();
        assert!(matches!(
            loom,
            LoomError::Config(ConfigError::GrammarMissing { .. })
        ));
    }

    #[test]
    fn feed_error_converts_to_loom_error() {
        let err = FeedError::Unreadable {
            path: "dictionary.txt".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let loom: LoomError = err.into();
        assert!(matches!(loom, LoomError::Feed(FeedError::Unreadable { .. })));
    }

    #[test]
    fn error_display_messages_are_descriptive() {
        let err = EngineError::UnknownDomain {
            name: "medicine".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("medicine"));
    }
}
