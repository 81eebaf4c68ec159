use std::path::{Path, PathBuf};

use super::Format;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("cannot access '{}': {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {format} data: {details} (at line ~{line})")]
    Parse {
        format: Format,
        line: usize,
        details: String,
    },

    #[error("invalid JSON in '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid content in '{}': {details}", path.display())]
    InvalidInput { path: PathBuf, details: String },

    #[error("cannot convert '{}' to {format}: {details}", path.display())]
    Convert {
        path: PathBuf,
        format: Format,
        details: String,
    },
}

impl Error {
    pub fn parse(format: Format, line: usize, details: impl Into<String>) -> Self {
        Self::Parse {
            format,
            line,
            details: details.into(),
        }
    }

    pub fn file(path: &Path, source: std::io::Error) -> Self {
        Self::File {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn convert(path: &Path, format: Format, details: impl Into<String>) -> Self {
        Self::Convert {
            path: path.to_path_buf(),
            format,
            details: details.into(),
        }
    }

    pub fn invalid_input(path: &Path, details: impl Into<String>) -> Self {
        Self::InvalidInput {
            path: path.to_path_buf(),
            details: details.into(),
        }
    }
}
