//! QEq (charge equilibration) charge assignment.
//!
//! Hydrogens are made explicit, the molecule is embedded in 3D from its
//! connectivity and the `cheq` solver equilibrates electronegativity over
//! that geometry. Hydrogen charges are folded onto their heavy atoms.

use cheq::{AtomView, QEqSolver, get_default_parameters};

use super::config::QeqConfig;
use super::embed::embed_3d;
use super::error::Error;
use super::hydrogens::ExplicitGraph;
use crate::model::molecule::Molecule;

struct EmbeddedAtom {
    atomic_number: u8,
    position: [f64; 3],
}

impl AtomView for EmbeddedAtom {
    #[inline]
    fn atomic_number(&self) -> u8 {
        self.atomic_number
    }

    #[inline]
    fn position(&self) -> [f64; 3] {
        self.position
    }
}

/// QEq charges per heavy atom, constrained to the total formal charge.
///
/// # Errors
///
/// Returns [`Error::ChargeCalculation`] if the solver fails and
/// [`Error::Embedding`] if no geometry could be produced.
pub fn qeq_charges(mol: &Molecule, config: &QeqConfig) -> Result<Vec<f64>, Error> {
    let graph = ExplicitGraph::expand(mol);
    let positions = embed_3d(&graph)?;

    let atoms: Vec<EmbeddedAtom> = graph
        .elements
        .iter()
        .zip(positions)
        .map(|(element, position)| EmbeddedAtom {
            atomic_number: element.atomic_number(),
            position,
        })
        .collect();

    let solver = QEqSolver::new(get_default_parameters()).with_options(config.solver_options);
    let result = solver.solve(&atoms, graph.total_formal_charge() as f64)?;

    Ok(graph.fold(&result.charges))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse_smiles;

    #[test]
    fn neutral_molecule_charges_sum_to_zero() {
        let mol = parse_smiles("CCO").unwrap();
        let charges = qeq_charges(&mol, &QeqConfig::default()).unwrap();
        assert_eq!(charges.len(), 3);
        let sum: f64 = charges.iter().sum();
        assert!(sum.abs() < 1e-4, "sum = {sum}");
        assert!(charges[2] < 0.0);
    }
}
