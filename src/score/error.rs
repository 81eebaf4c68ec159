//! Error types for fragment scoring.

use thiserror::Error;

use crate::model::bond_key::ParseBondKeyError;

#[derive(Debug, Error)]
pub enum Error {
    /// A score table entry lists a different number of fragments and scores.
    #[error("score entry '{key}' has {frags} fragments but {scores} MMD scores")]
    MisalignedEntry {
        key: String,
        frags: usize,
        scores: usize,
    },

    /// A score table key is not a bond reference.
    #[error("invalid score table key '{key}': {source}")]
    InvalidKey {
        key: String,
        #[source]
        source: ParseBondKeyError,
    },

    /// Two keys of one table name the same bond in different orientations.
    #[error("score table lists bond '{key}' more than once")]
    DuplicateBond { key: String },

    /// A bond listed in the rescore table lacks the fragment found for it.
    #[error("fragment '{identity}' of bond {key} is not among its rescore candidates")]
    RescoreMiss { key: String, identity: String },

    /// Fragment generation failed.
    #[error(transparent)]
    Fragment(#[from] crate::fragment::Error),
}

impl Error {
    pub fn misaligned(key: impl Into<String>, frags: usize, scores: usize) -> Self {
        Self::MisalignedEntry {
            key: key.into(),
            frags,
            scores,
        }
    }

    pub fn rescore_miss(key: impl ToString, identity: impl Into<String>) -> Self {
        Self::RescoreMiss {
            key: key.to_string(),
            identity: identity.into(),
        }
    }
}
