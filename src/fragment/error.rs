//! Error types for fragment generation.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::bond_key::BondKey;

/// Errors that can occur while building a fragment.
#[derive(Debug, Error)]
pub enum Error {
    /// The bond is not present in the parent molecule.
    #[error("bond {0} not found in the parent molecule")]
    UnknownBond(BondKey),

    /// The parent molecule carries no atom maps, so bonds cannot be referenced.
    #[error("parent molecule has no atom-map indices")]
    UnmappedParent,

    /// A functional-group definition file could not be read.
    #[error("failed to read functional groups from {path}: {source}")]
    GroupFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A functional-group definition file is not valid TOML.
    #[error("failed to parse functional group definitions: {0}")]
    GroupParse(#[from] toml::de::Error),

    /// A functional-group pattern is not valid SMILES.
    #[error("invalid pattern for functional group '{name}': {source}")]
    GroupPattern {
        name: String,
        #[source]
        source: crate::smiles::Error,
    },

    /// Charge or bond order calculation failed.
    #[error(transparent)]
    Chemistry(#[from] crate::chem::Error),
}

impl Error {
    pub fn group_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::GroupFile {
            path: path.into(),
            source,
        }
    }

    pub fn group_pattern(name: impl Into<String>, source: crate::smiles::Error) -> Self {
        Self::GroupPattern {
            name: name.into(),
            source,
        }
    }
}
