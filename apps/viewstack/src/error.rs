//! # CLI Errors

use std::path::PathBuf;
use thiserror::Error;
use viewstack_core::NavError;

/// Errors surfaced by the command-line host.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Nav(#[from] NavError),

    #[error("script line {line}: {message}")]
    Script { line: usize, message: String },

    #[error("json output failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("runtime error: {0}")]
    Runtime(String),
}

impl CliError {
    pub(crate) fn script(line: usize, message: impl Into<String>) -> Self {
        Self::Script {
            line,
            message: message.into(),
        }
    }
}

/// Read a whole file, attaching the path to any error.
pub fn read_file(path: &std::path::Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}
