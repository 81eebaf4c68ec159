use crate::model::molecule::Molecule;
use crate::model::types::{BondOrder, Element};

/// All-atom view of a hydrogen-suppressed molecule.
///
/// Heavy atoms keep their indices (`0..heavy_count`); implicit hydrogens are
/// appended after them, each owned by the heavy atom it is attached to.
#[derive(Debug, Clone)]
pub(crate) struct ExplicitGraph {
    pub elements: Vec<Element>,
    pub formal_charges: Vec<i8>,
    /// Heavy atom owning each node (itself for heavy atoms).
    pub owner: Vec<usize>,
    pub bonds: Vec<(usize, usize, BondOrder)>,
    pub heavy_count: usize,
}

impl ExplicitGraph {
    pub fn expand(mol: &Molecule) -> Self {
        let heavy_count = mol.atom_count();
        let mut elements: Vec<Element> = mol.atoms.iter().map(|a| a.element).collect();
        let mut formal_charges: Vec<i8> = mol.atoms.iter().map(|a| a.formal_charge).collect();
        let mut owner: Vec<usize> = (0..heavy_count).collect();
        let mut bonds: Vec<(usize, usize, BondOrder)> =
            mol.bonds.iter().map(|b| (b.i, b.j, b.order)).collect();

        for (idx, atom) in mol.atoms.iter().enumerate() {
            for _ in 0..atom.implicit_hydrogens {
                let h = elements.len();
                elements.push(Element::H);
                formal_charges.push(0);
                owner.push(idx);
                bonds.push((idx, h, BondOrder::Single));
            }
        }

        Self {
            elements,
            formal_charges,
            owner,
            bonds,
            heavy_count,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn total_formal_charge(&self) -> i32 {
        self.formal_charges.iter().map(|&c| c as i32).sum()
    }

    /// Sums per-node values onto their owning heavy atoms.
    pub fn fold(&self, values: &[f64]) -> Vec<f64> {
        let mut folded = vec![0.0; self.heavy_count];
        for (node, &value) in values.iter().enumerate() {
            folded[self.owner[node]] += value;
        }
        folded
    }
}
