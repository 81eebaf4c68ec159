//! Error types for charge assignment and bond order calculation.

use thiserror::Error;

/// Errors raised while assigning partial charges or Wiberg bond orders.
#[derive(Debug, Error)]
pub enum Error {
    /// The molecule has no atoms.
    #[error("molecule is empty: at least one atom is required")]
    EmptyMolecule,

    /// The QEq solver rejected the system or failed to converge.
    #[error("charge calculation failed: {0}")]
    ChargeCalculation(String),

    /// Geometry embedding produced unusable coordinates.
    #[error("embedding failed: {0}")]
    Embedding(String),

    /// The π system could not be diagonalized.
    #[error("bond order calculation failed for {atoms} conjugated atoms: {detail}")]
    BondOrder {
        /// Size of the π system.
        atoms: usize,
        /// Description of the problem.
        detail: String,
    },
}

impl From<cheq::CheqError> for Error {
    fn from(e: cheq::CheqError) -> Self {
        Error::ChargeCalculation(e.to_string())
    }
}

impl Error {
    pub fn bond_order(atoms: usize, detail: impl Into<String>) -> Self {
        Self::BondOrder {
            atoms,
            detail: detail.into(),
        }
    }
}
