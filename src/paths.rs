//! XDG-compliant path resolution for the wordloom data directory.
//!
//! All feed and configuration files live flat in one directory, resolved
//! from an explicit override, `$WORDLOOM_DATA`, or the XDG config home.

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;

/// Errors from path resolution.
#[derive(Debug, Error, Diagnostic)]
pub enum PathError {
    #[error("cannot determine home directory")]
    #[diagnostic(
        code(loom::paths::no_home),
        help("Set the HOME environment variable, or pass --data-dir explicitly.")
    )]
    NoHome,

    #[error("failed to create directory: {path}")]
    #[diagnostic(
        code(loom::paths::create_dir),
        help("Check that the parent directory exists and you have write permissions.")
    )]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type PathResult<T> = std::result::Result<T, PathError>;

/// The wordloom data directory.
#[derive(Debug, Clone)]
pub struct LoomPaths {
    /// Directory holding the dictionary feed and all table files.
    pub data_dir: PathBuf,
}

impl LoomPaths {
    /// Resolve the data directory: explicit override first, then
    /// `$WORDLOOM_DATA`, then `$XDG_CONFIG_HOME/wordloom`, then
    /// `~/.config/wordloom`.
    pub fn resolve(override_dir: Option<&Path>) -> PathResult<Self> {
        if let Some(dir) = override_dir {
            return Ok(Self {
                data_dir: dir.to_path_buf(),
            });
        }
        if let Ok(dir) = std::env::var("WORDLOOM_DATA") {
            return Ok(Self {
                data_dir: PathBuf::from(dir),
            });
        }

        let data_dir = match std::env::var("XDG_CONFIG_HOME") {
            Ok(config_home) => PathBuf::from(config_home),
            Err(_) => std::env::var("HOME")
                .map(PathBuf::from)
                .map_err(|_| PathError::NoHome)?
                .join(".config"),
        }
        .join("wordloom");

        Ok(Self { data_dir })
    }

    /// Create the data directory. Idempotent.
    pub fn ensure_dirs(&self) -> PathResult<()> {
        std::fs::create_dir_all(&self.data_dir).map_err(|e| PathError::CreateDir {
            path: self.data_dir.display().to_string(),
            source: e,
        })
    }

    /// Path of a named file inside the data directory.
    pub fn file(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }

    /// Path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.file("wordloom.toml")
    }

    /// Path to the dictionary feed.
    pub fn dictionary_file(&self) -> PathBuf {
        self.file("dictionary.txt")
    }
}
