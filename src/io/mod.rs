//! File formats and on-disk layouts of both pipelines.
//!
//! - [`smi`]: line-oriented SMILES files with titles.
//! - [`case`]: the `selected/<name>/` directory of a scoring case.
//! - [`phenyl`]: inputs and figures of the phenyl benchmark.
//! - [`figure`]: SVG figures and their PDF renditions.
//!
//! JSON documents are written pretty-printed with two-space indentation and
//! sorted keys.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;

pub mod case;
pub mod error;
pub mod figure;
pub mod phenyl;
pub mod smi;

pub use error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Smi,
    Json,
    Svg,
    Pdf,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Smi => write!(f, "SMILES"),
            Format::Json => write!(f, "JSON"),
            Format::Svg => write!(f, "SVG"),
            Format::Pdf => write!(f, "PDF"),
        }
    }
}

/// Reads and deserializes a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Error> {
    let text = fs::read_to_string(path).map_err(|e| Error::file(path, e))?;
    serde_json::from_str(&text).map_err(|e| Error::json(path, e))
}

/// Writes `value` pretty-printed, creating parent directories as needed.
pub fn write_json(path: &Path, value: &Value) -> Result<(), Error> {
    let mut text = serde_json::to_string_pretty(value).map_err(|e| Error::json(path, e))?;
    text.push('\n');
    write_text(path, &text)
}

pub fn write_text(path: &Path, text: &str) -> Result<(), Error> {
    write_bytes(path, text.as_bytes())
}

/// Writes `bytes`, creating parent directories as needed.
pub fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), Error> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::file(parent, e))?;
    }
    fs::write(path, bytes).map_err(|e| Error::file(path, e))
}
