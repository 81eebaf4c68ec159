//! SMILES reading and canonical SMILES writing.
//!
//! The reader understands the subset produced by common toolkits for
//! drug-like molecules: organic-subset and bracket atoms, charges, explicit
//! hydrogen counts, atom maps (`[C:7]`), branches, ring closures (including
//! `%nn`), aromatic lowercase atoms and disconnected components. Stereo
//! markers are accepted and ignored. Explicit hydrogen atoms are folded into
//! the implicit hydrogen count of their heavy neighbor.
//!
//! The writer produces a canonical string by rank refinement followed by a
//! depth-first traversal in rank order; the result is used as the canonical
//! identity of a structure.

mod parser;
mod writer;

use thiserror::Error;

use crate::model::types::{BondOrder, Element};

pub use parser::{parse_smiles, parse_smiles_line};
pub use writer::{WriteOptions, canonical_smiles, mapped_smiles, write_smiles};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("empty SMILES string")]
    Empty,

    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("unknown element '{symbol}' at position {pos}")]
    UnknownElement { symbol: String, pos: usize },

    #[error("unterminated bracket atom starting at position {pos}")]
    UnclosedBracket { pos: usize },

    #[error("ring closure at position {pos} has no preceding atom")]
    DanglingRingClosure { pos: usize },

    #[error("unmatched ring closure(s): {0:?}")]
    UnmatchedRingClosure(Vec<u16>),

    #[error("unbalanced parentheses at position {pos}")]
    UnbalancedBranch { pos: usize },

    #[error("bond symbol at position {pos} is not followed by an atom")]
    DanglingBond { pos: usize },

    #[error("number at position {pos} is too large")]
    NumberTooLarge { pos: usize },
}

/// Hydrogen count an organic-subset atom gets when written without brackets.
///
/// Aromatic atoms donate one valence to the π system; each aromatic bond
/// counts once toward the remaining σ valence.
pub(crate) fn default_implicit_hydrogens(
    element: Element,
    aromatic: bool,
    bonds: impl Iterator<Item = BondOrder>,
) -> u8 {
    let used: u32 = bonds
        .map(|order| match order {
            BondOrder::Aromatic | BondOrder::Single => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
        })
        .sum();

    let valences = element.valences();
    if aromatic {
        let available = valences[0].saturating_sub(1) as u32;
        return available.saturating_sub(used) as u8;
    }

    valences
        .iter()
        .map(|&v| v as u32)
        .find(|&v| v >= used)
        .map(|v| (v - used) as u8)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_hydrogens_for_common_atoms() {
        use BondOrder::*;
        assert_eq!(default_implicit_hydrogens(Element::C, false, [].into_iter()), 4);
        assert_eq!(default_implicit_hydrogens(Element::C, false, [Double].into_iter()), 2);
        assert_eq!(default_implicit_hydrogens(Element::O, false, [Single].into_iter()), 1);
        assert_eq!(
            default_implicit_hydrogens(Element::C, true, [Aromatic, Aromatic].into_iter()),
            1
        );
        assert_eq!(
            default_implicit_hydrogens(Element::N, true, [Aromatic, Aromatic].into_iter()),
            0
        );
    }

    #[test]
    fn higher_valence_states_are_used_when_needed() {
        use BondOrder::*;
        // Sulfone sulfur: two double bonds plus two single bonds.
        let bonds = [Double, Double, Single, Single];
        assert_eq!(default_implicit_hydrogens(Element::S, false, bonds.into_iter()), 0);
        // Pentavalent nitro nitrogen written without charges.
        let bonds = [Double, Double, Single];
        assert_eq!(default_implicit_hydrogens(Element::N, false, bonds.into_iter()), 0);
    }
}
