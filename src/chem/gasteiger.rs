//! Gasteiger–Marsili partial charges.
//!
//! Partial equalization of orbital electronegativity over the all-atom
//! graph; hydrogen charges are folded onto their heavy atoms afterwards.

use super::hydrogens::ExplicitGraph;
use crate::model::molecule::Molecule;
use crate::model::types::{BondOrder, Element};

const ITERATIONS: i32 = 6;

/// Cation electronegativity used for hydrogen in place of `a + b + c`.
const HYDROGEN_CATION_CHI: f64 = 20.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hybridization {
    Sp,
    Sp2,
    Sp3,
}

/// Coefficients of `χ(q) = a + b·q + c·q²`.
#[derive(Debug, Clone, Copy)]
struct ElectroParams {
    a: f64,
    b: f64,
    c: f64,
}

impl ElectroParams {
    const fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    fn chi(&self, q: f64) -> f64 {
        self.a + self.b * q + self.c * q * q
    }

    fn cation_chi(&self, element: Element) -> f64 {
        if element == Element::H {
            HYDROGEN_CATION_CHI
        } else {
            self.a + self.b + self.c
        }
    }
}

fn electro_params(element: Element, hybridization: Hybridization) -> ElectroParams {
    use Hybridization::*;
    match (element, hybridization) {
        (Element::H, _) => ElectroParams::new(7.17, 6.24, -0.56),
        (Element::C, Sp) => ElectroParams::new(10.39, 9.45, 0.73),
        (Element::C, Sp2) => ElectroParams::new(8.79, 9.32, 1.51),
        (Element::C, Sp3) => ElectroParams::new(7.98, 9.18, 1.88),
        (Element::N, Sp) => ElectroParams::new(15.68, 11.70, -0.27),
        (Element::N, Sp2) => ElectroParams::new(12.87, 11.15, 0.85),
        (Element::N, Sp3) => ElectroParams::new(11.54, 10.82, 1.36),
        (Element::O, Sp | Sp2) => ElectroParams::new(17.07, 13.79, 0.47),
        (Element::O, Sp3) => ElectroParams::new(14.18, 12.92, 1.39),
        (Element::F, _) => ElectroParams::new(14.66, 13.85, 2.31),
        (Element::Si, _) => ElectroParams::new(7.30, 6.56, 0.66),
        (Element::P, _) => ElectroParams::new(8.90, 8.24, 0.96),
        (Element::S, Sp3) => ElectroParams::new(10.14, 9.13, 1.38),
        (Element::S, _) => ElectroParams::new(10.88, 9.49, 1.33),
        (Element::Cl, _) => ElectroParams::new(11.00, 9.69, 1.35),
        (Element::Br, _) => ElectroParams::new(10.08, 8.47, 1.16),
        (Element::I, _) => ElectroParams::new(9.90, 7.96, 0.96),
        (Element::Se, _) => ElectroParams::new(10.00, 8.80, 1.20),
        (Element::B, _) => ElectroParams::new(5.98, 6.82, 1.61),
        (Element::Na | Element::K, _) => ElectroParams::new(2.84, 2.84, 0.0),
    }
}

fn hybridization(mol: &Molecule, atom: usize) -> Hybridization {
    let mut doubles = 0;
    let mut unsaturated = mol.atoms[atom].aromatic;
    for bond in mol.bonds.iter().filter(|b| b.touches(atom)) {
        match bond.order {
            BondOrder::Triple => return Hybridization::Sp,
            BondOrder::Double => {
                doubles += 1;
                unsaturated = true;
            }
            BondOrder::Aromatic => unsaturated = true,
            BondOrder::Single => {}
        }
    }
    match (doubles, unsaturated) {
        (d, _) if d >= 2 && mol.atoms[atom].element == Element::C => Hybridization::Sp,
        (_, true) => Hybridization::Sp2,
        _ => Hybridization::Sp3,
    }
}

/// Gasteiger–Marsili charges per heavy atom, hydrogens folded in.
///
/// Iteration starts from the formal charges, so the sum of the returned
/// charges equals the total formal charge.
pub fn gasteiger_charges(mol: &Molecule) -> Vec<f64> {
    let graph = ExplicitGraph::expand(mol);
    let params: Vec<ElectroParams> = (0..graph.len())
        .map(|node| {
            let hyb = if node < graph.heavy_count {
                hybridization(mol, node)
            } else {
                Hybridization::Sp3
            };
            electro_params(graph.elements[node], hyb)
        })
        .collect();

    let mut charges: Vec<f64> = graph.formal_charges.iter().map(|&c| c as f64).collect();

    for iteration in 0..ITERATIONS {
        let damping = 0.5_f64.powi(iteration + 1);
        let chi: Vec<f64> = params
            .iter()
            .zip(&charges)
            .map(|(p, &q)| p.chi(q))
            .collect();

        let mut delta = vec![0.0; graph.len()];
        for &(i, j, _) in &graph.bonds {
            // Electrons flow from the less electronegative atom (the donor).
            let (donor, acceptor) = if chi[i] <= chi[j] { (i, j) } else { (j, i) };
            let scale = params[donor].cation_chi(graph.elements[donor]);
            if scale.abs() < 1e-12 {
                continue;
            }
            let transfer = damping * (chi[acceptor] - chi[donor]) / scale;
            delta[donor] += transfer;
            delta[acceptor] -= transfer;
        }

        for (q, d) in charges.iter_mut().zip(&delta) {
            *q += d;
        }
    }

    graph.fold(&charges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse_smiles;

    fn charges(smiles: &str) -> Vec<f64> {
        gasteiger_charges(&parse_smiles(smiles).unwrap())
    }

    #[test]
    fn neutral_molecules_sum_to_zero() {
        for smiles in ["CCO", "c1ccccc1N", "CC(=O)Nc1ccccc1"] {
            let sum: f64 = charges(smiles).iter().sum();
            assert!(sum.abs() < 1e-9, "{smiles}: {sum}");
        }
    }

    #[test]
    fn ions_sum_to_their_formal_charge() {
        let sum: f64 = charges("C[N+](C)(C)C").iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        let sum: f64 = charges("[O-]c1ccccc1").iter().sum();
        assert!((sum + 1.0).abs() < 1e-9);
    }

    #[test]
    fn hydroxyl_group_is_negative() {
        let q = charges("CCO");
        assert!(q[2] < 0.0);
        assert!(q[1] > q[0]);
    }

    #[test]
    fn carbonyl_oxygen_is_negative() {
        let q = charges("CC=O");
        assert!(q[2] < 0.0);
        assert!(q[1] > 0.0);
    }
}
