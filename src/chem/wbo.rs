//! Wiberg bond orders from a Hückel π model.
//!
//! Every bond gets a σ contribution of `1 − (qᵢ − qⱼ)²` from the partial
//! charges. Bonds inside a conjugated system add the square of their Hückel
//! π bond order; the second π bond of a triple bond and the double bonds of
//! hypervalent centres (sulfones, phosphates) add a localized `1.0`.
//!
//! Heteroatom Coulomb (`h`) and resonance (`k`) parameters are in units of
//! β relative to carbon. Lone-pair donors (amine, ether and hydroxyl oxygen,
//! halogens, anionic oxygen) join a π system when bonded to it.

use std::collections::BTreeSet;

use nalgebra::{DMatrix, SymmetricEigen};

use super::error::Error;
use crate::model::molecule::Molecule;
use crate::model::types::{BondOrder, Element};

const EIGEN_EPS: f64 = 1e-12;
const EIGEN_MAX_ITER: usize = 10_000;
const DEGENERACY_TOL: f64 = 1e-8;

/// Resonance integral scale for a formally single bond between π centres.
const CONJUGATED_SINGLE_K: f64 = 0.9;
const MIN_SIGMA: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
struct PiCenter {
    h: f64,
    k: f64,
    electrons: u8,
}

impl PiCenter {
    const fn new(h: f64, k: f64, electrons: u8) -> Self {
        Self { h, k, electrons }
    }
}

/// Wiberg bond order of every bond, in bond order.
///
/// # Errors
///
/// Returns [`Error::BondOrder`] if a π system cannot be diagonalized.
pub fn wiberg_bond_orders(mol: &Molecule) -> Result<Vec<f64>, Error> {
    let mut wbo: Vec<f64> = mol
        .bonds
        .iter()
        .map(|b| {
            let dq = mol.atoms[b.i].partial_charge - mol.atoms[b.j].partial_charge;
            (1.0 - dq * dq).max(MIN_SIGMA)
        })
        .collect();

    let hypervalent: Vec<bool> = (0..mol.atom_count())
        .map(|i| is_hypervalent(mol, i))
        .collect();

    for (bi, bond) in mol.bonds.iter().enumerate() {
        let localized = match bond.order {
            BondOrder::Triple => 1.0,
            BondOrder::Double if hypervalent[bond.i] || hypervalent[bond.j] => 1.0,
            _ => 0.0,
        };
        wbo[bi] += localized;
    }

    let centers = pi_centers(mol, &hypervalent);
    for system in conjugated_systems(mol, &centers) {
        let pi_orders = huckel_bond_orders(mol, &centers, &system)?;
        for (bi, p) in pi_orders {
            wbo[bi] += p * p;
        }
    }

    Ok(wbo)
}

/// An atom whose bonds exceed its lowest valence (e.g. sulfone sulfur).
fn is_hypervalent(mol: &Molecule, atom: usize) -> bool {
    let a = &mol.atoms[atom];
    if !matches!(a.element, Element::N | Element::P | Element::S | Element::Se) {
        return false;
    }
    let used: u32 = mol
        .bonds
        .iter()
        .filter(|b| b.touches(atom))
        .map(|b| match b.order {
            BondOrder::Single | BondOrder::Aromatic => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
        })
        .sum::<u32>()
        + a.implicit_hydrogens as u32;
    let base = a.element.valences()[0] as i32 + a.formal_charge.unsigned_abs() as i32;
    used as i32 > base
}

fn is_unsaturated(mol: &Molecule, atom: usize, hypervalent: &[bool]) -> bool {
    if hypervalent[atom] {
        return false;
    }
    mol.atoms[atom].aromatic
        || mol.bonds.iter().any(|b| {
            b.touches(atom)
                && !hypervalent[b.other(atom)]
                && matches!(
                    b.order,
                    BondOrder::Double | BondOrder::Triple | BondOrder::Aromatic
                )
        })
}

fn pi_centers(mol: &Molecule, hypervalent: &[bool]) -> Vec<Option<PiCenter>> {
    let unsaturated: Vec<bool> = (0..mol.atom_count())
        .map(|i| is_unsaturated(mol, i, hypervalent))
        .collect();

    (0..mol.atom_count())
        .map(|i| {
            if unsaturated[i] {
                Some(unsaturated_center(mol, i))
            } else if mol.neighbors(i).iter().any(|&n| unsaturated[n]) && !hypervalent[i] {
                lone_pair_donor(mol, i)
            } else {
                None
            }
        })
        .collect()
}

fn unsaturated_center(mol: &Molecule, atom: usize) -> PiCenter {
    let a = &mol.atoms[atom];
    let sigma_partners = mol.degree(atom) + a.implicit_hydrogens as usize;
    match a.element {
        Element::C => {
            let electrons = (1 - a.formal_charge as i32).clamp(0, 2) as u8;
            PiCenter::new(0.0, 1.0, electrons)
        }
        Element::N if a.formal_charge > 0 => PiCenter::new(2.0, 1.0, 1),
        // Pyrrole-type aromatic nitrogen donates its lone pair.
        Element::N if a.aromatic && sigma_partners >= 3 => PiCenter::new(1.5, 0.8, 2),
        Element::N => PiCenter::new(0.5, 1.0, 1),
        Element::O if a.aromatic => PiCenter::new(2.0, 0.8, 2),
        Element::O => PiCenter::new(1.0, 1.0, 1),
        Element::S | Element::Se if a.aromatic => PiCenter::new(1.0, 0.6, 2),
        Element::S | Element::Se => PiCenter::new(0.0, 0.6, 1),
        Element::P => PiCenter::new(0.0, 0.7, 1),
        Element::B => PiCenter::new(-1.0, 0.7, 0),
        _ => PiCenter::new(0.0, 1.0, 1),
    }
}

fn lone_pair_donor(mol: &Molecule, atom: usize) -> Option<PiCenter> {
    let a = &mol.atoms[atom];
    let sigma_partners = mol.degree(atom) + a.implicit_hydrogens as usize;
    match a.element {
        Element::N if a.formal_charge < 0 => Some(PiCenter::new(1.0, 0.8, 2)),
        Element::N if a.formal_charge == 0 && sigma_partners <= 3 => {
            Some(PiCenter::new(1.5, 0.8, 2))
        }
        Element::O if a.formal_charge < 0 => Some(PiCenter::new(1.0, 0.8, 2)),
        Element::O if a.formal_charge == 0 => Some(PiCenter::new(2.0, 0.8, 2)),
        Element::S | Element::Se if a.formal_charge <= 0 => Some(PiCenter::new(1.0, 0.6, 2)),
        Element::F => Some(PiCenter::new(3.0, 0.7, 2)),
        Element::Cl => Some(PiCenter::new(2.0, 0.4, 2)),
        Element::Br => Some(PiCenter::new(1.5, 0.3, 2)),
        Element::I => Some(PiCenter::new(1.0, 0.2, 2)),
        _ => None,
    }
}

/// Connected components of π centres, as sorted atom lists.
fn conjugated_systems(mol: &Molecule, centers: &[Option<PiCenter>]) -> Vec<Vec<usize>> {
    let adj = mol.adjacency();
    let mut seen = vec![false; mol.atom_count()];
    let mut systems = Vec::new();

    for start in 0..mol.atom_count() {
        if seen[start] || centers[start].is_none() {
            continue;
        }
        let mut members = BTreeSet::new();
        let mut stack = vec![start];
        seen[start] = true;
        while let Some(atom) = stack.pop() {
            members.insert(atom);
            for &(nbr, _) in &adj[atom] {
                if !seen[nbr] && centers[nbr].is_some() {
                    seen[nbr] = true;
                    stack.push(nbr);
                }
            }
        }
        if members.len() > 1 {
            systems.push(members.into_iter().collect());
        }
    }
    systems
}

/// π bond orders `(bond index, pᵢⱼ)` for bonds inside one conjugated system.
fn huckel_bond_orders(
    mol: &Molecule,
    centers: &[Option<PiCenter>],
    system: &[usize],
) -> Result<Vec<(usize, f64)>, Error> {
    let n = system.len();
    let local = |atom: usize| system.binary_search(&atom).ok();
    let center = |atom: usize| centers[atom].unwrap_or(PiCenter::new(0.0, 1.0, 1));

    let mut hamiltonian = DMatrix::zeros(n, n);
    let mut system_bonds = Vec::new();
    for (li, &atom) in system.iter().enumerate() {
        hamiltonian[(li, li)] = center(atom).h;
    }
    for (bi, bond) in mol.bonds.iter().enumerate() {
        let (Some(a), Some(b)) = (local(bond.i), local(bond.j)) else {
            continue;
        };
        let base = match bond.order {
            BondOrder::Single => CONJUGATED_SINGLE_K,
            _ => 1.0,
        };
        let k = base * center(bond.i).k * center(bond.j).k;
        hamiltonian[(a, b)] = k;
        hamiltonian[(b, a)] = k;
        system_bonds.push((bi, a, b));
    }

    let electrons: u32 = system.iter().map(|&a| center(a).electrons as u32).sum();
    let (levels, vectors) = occupations(&hamiltonian, electrons, n)?;

    let orders = system_bonds
        .into_iter()
        .map(|(bi, a, b)| {
            let p: f64 = levels
                .iter()
                .map(|&(k, occupancy)| occupancy * vectors[(a, k)] * vectors[(b, k)])
                .sum();
            (bi, p)
        })
        .collect();
    Ok(orders)
}

/// Orbital occupancies filled from the most bonding level (largest
/// eigenvalue, since β < 0). Degenerate levels share their electrons evenly.
fn occupations(
    hamiltonian: &DMatrix<f64>,
    electrons: u32,
    n: usize,
) -> Result<(Vec<(usize, f64)>, DMatrix<f64>), Error> {
    let eigen = SymmetricEigen::try_new(hamiltonian.clone(), EIGEN_EPS, EIGEN_MAX_ITER)
        .ok_or_else(|| Error::bond_order(n, "Hückel matrix diagonalization did not converge"))?;

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| eigen.eigenvalues[b].total_cmp(&eigen.eigenvalues[a]));

    let mut remaining = electrons.min(2 * n as u32) as f64;
    let mut levels = Vec::new();
    let mut start = 0;
    while start < n && remaining > 0.0 {
        let value = eigen.eigenvalues[order[start]];
        let mut end = start + 1;
        while end < n && (eigen.eigenvalues[order[end]] - value).abs() < DEGENERACY_TOL {
            end += 1;
        }
        let shell = end - start;
        let filled = remaining.min(2.0 * shell as f64);
        for &k in &order[start..end] {
            levels.push((k, filled / shell as f64));
        }
        remaining -= filled;
        start = end;
    }

    Ok((levels, eigen.eigenvectors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse_smiles;

    fn wbo(smiles: &str, a: usize, b: usize) -> f64 {
        let mol = parse_smiles(smiles).unwrap();
        let orders = wiberg_bond_orders(&mol).unwrap();
        let bond = mol.bond_between(a, b).unwrap();
        orders[bond]
    }

    #[test]
    fn ethylene_and_ethane() {
        assert!((wbo("C=C", 0, 1) - 2.0).abs() < 1e-9);
        assert!((wbo("CC", 0, 1) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn acetylene_is_triple() {
        assert!((wbo("C#C", 0, 1) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn benzene_bonds_are_intermediate() {
        let w = wbo("c1ccccc1", 0, 1);
        assert!((1.3..1.5).contains(&w), "benzene wbo = {w}");
    }

    #[test]
    fn aniline_cn_has_partial_double_bond_character() {
        let w = wbo("Nc1ccccc1", 0, 1);
        assert!((1.0..1.3).contains(&w), "aniline wbo = {w}");
    }

    #[test]
    fn butadiene_central_bond_is_conjugated() {
        let w = wbo("C=CC=C", 1, 2);
        assert!(w > 1.05 && w < 1.5, "butadiene wbo = {w}");
    }

    #[test]
    fn polar_sigma_bonds_are_reduced_by_charge_difference() {
        let mut mol = parse_smiles("CO").unwrap();
        mol.atoms[0].partial_charge = 0.2;
        mol.atoms[1].partial_charge = -0.2;
        let orders = wiberg_bond_orders(&mol).unwrap();
        assert!((orders[0] - 0.84).abs() < 1e-9);
    }

    #[test]
    fn sulfone_oxygens_are_localized() {
        let mol = parse_smiles("CS(=O)(=O)C").unwrap();
        assert!(is_hypervalent(&mol, 1));
        let orders = wiberg_bond_orders(&mol).unwrap();
        let so = mol.bond_between(1, 2).unwrap();
        assert!((orders[so] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn ring_substituent_bond_tracks_donor_strength() {
        let amino = wbo("Nc1ccccc1", 0, 1);
        let fluoro = wbo("Fc1ccccc1", 0, 1);
        assert!(amino > fluoro);
    }
}
