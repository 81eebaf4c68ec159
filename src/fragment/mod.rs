//! WBO-preserving fragmentation around a single bond.
//!
//! A [`Fragmenter`] is built once per parent molecule: it assigns charges and
//! Wiberg bond orders to the parent, perceives rotatable bonds, ring systems
//! and functional groups, and then produces one [`Fragment`] per requested
//! bond.
//!
//! # Algorithm
//!
//! 1. The seed is the bond's two atoms plus their heavy neighbours.
//! 2. The atom set is closed over ring systems and functional groups it
//!    touches, so neither is ever cut.
//! 3. The fragment is materialized: cut bonds are capped with hydrogens and
//!    charges and bond orders are recomputed.
//! 4. While the central bond's WBO differs from the parent's by more than the
//!    threshold, the fragment grows by one neighbouring atom chosen by the
//!    configured [`Heuristic`], then closes and re-materializes.

mod config;
mod error;
mod fgroups;

pub use config::{
    FragmenterConfig, FunctionalGroups, Heuristic, ParseFlagError, ParseHeuristicError,
    flag_literal, parse_flag,
};
pub use error::Error;
pub use fgroups::{FunctionalGroupTable, GroupMatch};

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use log::{debug, warn};
use serde_json::json;

use crate::chem;
use crate::model::bond_key::BondKey;
use crate::model::molecule::Molecule;
use crate::model::types::BondOrder;
use crate::perception::rings::RingInfo;
use crate::smiles::canonical_smiles;

/// A fragment built around one bond of the parent.
#[derive(Debug, Clone)]
pub struct Fragment {
    /// Canonical SMILES of the capped fragment.
    pub identity: String,
    pub bond: BondKey,
    /// Parent atom indices included in the fragment, sorted.
    pub atoms: Vec<usize>,
    /// Capped fragment with atom maps, charges and bond orders.
    pub molecule: Molecule,
    pub parent_wbo: f64,
    pub fragment_wbo: f64,
    pub provenance: serde_json::Value,
}

impl Fragment {
    pub fn heavy_atom_count(&self) -> usize {
        self.molecule.heavy_atom_count()
    }

    pub fn wbo_difference(&self) -> f64 {
        (self.fragment_wbo - self.parent_wbo).abs()
    }
}

pub struct Fragmenter {
    parent: Molecule,
    config: FragmenterConfig,
    rings: RingInfo,
    ring_systems: Vec<Vec<usize>>,
    groups: Vec<GroupMatch>,
    rotors: BTreeMap<BondKey, f64>,
}

impl Fragmenter {
    /// Charges the parent and perceives its rotors, ring systems and
    /// functional groups.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnmappedParent`] if the parent has no atom maps,
    /// functional-group loading errors, and charge/bond order failures.
    pub fn new(parent: &Molecule, config: FragmenterConfig) -> Result<Self, Error> {
        let table = FunctionalGroupTable::load(&config.functional_groups)?;
        Self::with_groups(parent, config, &table)
    }

    pub fn with_groups(
        parent: &Molecule,
        config: FragmenterConfig,
        table: &FunctionalGroupTable,
    ) -> Result<Self, Error> {
        if !parent.atoms.iter().any(|a| a.is_mapped()) {
            return Err(Error::UnmappedParent);
        }

        let parent = chem::annotate(parent, &config.charge_method)?;
        let rings = RingInfo::perceive(&parent);

        let rotors: BTreeMap<BondKey, f64> = (0..parent.bond_count())
            .filter(|&bi| is_rotor(&parent, &rings, bi))
            .filter_map(|bi| {
                let key = parent.bond_key(bi)?;
                Some((key, parent.bonds[bi].wbo.unwrap_or_default()))
            })
            .collect();

        let ring_systems = ring_systems(&parent, &rings, config.keep_non_rotor_ring_substituents);
        let groups = table.find(&parent);

        debug!(
            "parent '{}': {} rotors, {} ring systems, {} functional groups",
            parent.title,
            rotors.len(),
            ring_systems.len(),
            groups.len()
        );

        Ok(Self {
            parent,
            config,
            rings,
            ring_systems,
            groups,
            rotors,
        })
    }

    /// The charged, WBO-annotated parent.
    pub fn parent(&self) -> &Molecule {
        &self.parent
    }

    pub fn config(&self) -> &FragmenterConfig {
        &self.config
    }

    /// Parent WBO of every rotatable bond.
    pub fn rotors(&self) -> &BTreeMap<BondKey, f64> {
        &self.rotors
    }

    /// Ring systems, extended with non-rotor substituents when configured.
    pub fn ring_systems(&self) -> &[Vec<usize>] {
        &self.ring_systems
    }

    pub fn functional_groups(&self) -> &[GroupMatch] {
        &self.groups
    }

    /// Options that produced the fragments, as passed through to result files.
    pub fn provenance(&self) -> serde_json::Value {
        json!({
            "creator": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "routine": {
                "fragment": {
                    "threshold": self.config.threshold,
                    "heuristic": self.config.heuristic.as_str(),
                    "functional_groups": self.config.functional_groups.to_string(),
                    "keep_non_rotor_ring_substituents":
                        self.config.keep_non_rotor_ring_substituents,
                    "charge_method": self.config.charge_method.name(),
                }
            }
        })
    }

    /// Builds the fragment for `bond`.
    ///
    /// Bonds that are not rotatable are fragmented anyway, with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownBond`] if the parent has no such bond and
    /// propagates charge/bond order failures on the fragment.
    pub fn build_fragment(&self, bond: BondKey) -> Result<Fragment, Error> {
        let bond_idx = self
            .parent
            .bond_by_key(bond)
            .ok_or(Error::UnknownBond(bond))?;
        let parent_wbo = self.parent.bonds[bond_idx].wbo.unwrap_or_default();

        if !self.rotors.contains_key(&bond) {
            warn!("bond {bond} is not a rotatable bond; fragmenting it anyway");
        }

        let central = &self.parent.bonds[bond_idx];
        let (a, b) = (central.i, central.j);
        let distances = self.distances_from(a, b);

        let mut atoms = self.seed(a, b);
        loop {
            let molecule = self.materialize(&atoms)?;
            let fragment_wbo = molecule
                .bond_by_key(bond)
                .and_then(|bi| molecule.bonds[bi].wbo)
                .unwrap_or_default();
            let diff = (fragment_wbo - parent_wbo).abs();

            let done = diff <= self.config.threshold || atoms.len() == self.parent.atom_count();
            let next = if done {
                None
            } else {
                self.next_atom(&atoms, &distances)
            };

            let Some(next) = next else {
                debug!(
                    "bond {bond}: {} atoms, wbo {fragment_wbo:.4} vs parent {parent_wbo:.4}",
                    atoms.len()
                );
                return Ok(Fragment {
                    identity: canonical_smiles(&molecule),
                    bond,
                    atoms: atoms.into_iter().collect(),
                    molecule,
                    parent_wbo,
                    fragment_wbo,
                    provenance: self.provenance(),
                });
            };

            atoms.insert(next);
            self.close(&mut atoms);
        }
    }

    /// Bond atoms plus their heavy neighbours, closed over rings and groups.
    fn seed(&self, a: usize, b: usize) -> BTreeSet<usize> {
        let mut atoms = BTreeSet::from([a, b]);
        atoms.extend(self.parent.neighbors(a));
        atoms.extend(self.parent.neighbors(b));
        self.close(&mut atoms);
        atoms
    }

    /// Adds every ring system and functional group sharing an atom with the set.
    fn close(&self, atoms: &mut BTreeSet<usize>) {
        loop {
            let before = atoms.len();
            let units = self
                .ring_systems
                .iter()
                .chain(self.groups.iter().map(|g| &g.atoms));
            for unit in units {
                if unit.iter().any(|a| atoms.contains(a)) {
                    atoms.extend(unit.iter().copied());
                }
            }
            if atoms.len() == before {
                break;
            }
        }
    }

    /// Topological distance of every parent atom from the central bond.
    fn distances_from(&self, a: usize, b: usize) -> Vec<usize> {
        let adj = self.parent.adjacency();
        let mut dist = vec![usize::MAX; self.parent.atom_count()];
        let mut queue = VecDeque::from([a, b]);
        dist[a] = 0;
        dist[b] = 0;
        while let Some(atom) = queue.pop_front() {
            for &(nbr, _) in &adj[atom] {
                if dist[nbr] == usize::MAX {
                    dist[nbr] = dist[atom] + 1;
                    queue.push_back(nbr);
                }
            }
        }
        dist
    }

    /// Outer atom of the boundary bond chosen by the growth heuristic.
    fn next_atom(&self, atoms: &BTreeSet<usize>, distances: &[usize]) -> Option<usize> {
        let candidates = self.parent.bonds.iter().filter_map(|bond| {
            let outer = match (atoms.contains(&bond.i), atoms.contains(&bond.j)) {
                (true, false) => bond.j,
                (false, true) => bond.i,
                _ => return None,
            };
            Some((outer, distances[outer], bond.wbo.unwrap_or_default()))
        });

        candidates
            .min_by(|x, y| {
                let (atom_x, dist_x, wbo_x) = *x;
                let (atom_y, dist_y, wbo_y) = *y;
                let by_distance = dist_x.cmp(&dist_y);
                let by_wbo = wbo_y.total_cmp(&wbo_x);
                match self.config.heuristic {
                    Heuristic::PathLength => by_distance.then(by_wbo),
                    Heuristic::Wbo => by_wbo.then(by_distance),
                }
                .then(atom_x.cmp(&atom_y))
            })
            .map(|(atom, _, _)| atom)
    }

    /// Copies the atom set out of the parent, caps cut bonds with hydrogens
    /// and recomputes charges and bond orders.
    fn materialize(&self, atoms: &BTreeSet<usize>) -> Result<Molecule, Error> {
        let index: BTreeMap<usize, usize> = atoms
            .iter()
            .enumerate()
            .map(|(new, &old)| (old, new))
            .collect();

        let mut fragment = Molecule::new().with_title(self.parent.title.clone());
        for &old in atoms {
            let mut atom = self.parent.atoms[old].clone();
            atom.partial_charge = 0.0;
            fragment.add_atom(atom);
        }

        for bond in &self.parent.bonds {
            match (index.get(&bond.i), index.get(&bond.j)) {
                (Some(&i), Some(&j)) => {
                    fragment.add_bond(i, j, bond.order);
                }
                (Some(&inner), None) | (None, Some(&inner)) => {
                    let caps = bond.order.capping_hydrogens();
                    let atom = &mut fragment.atoms[inner];
                    atom.implicit_hydrogens += caps;
                    if bond.order == BondOrder::Aromatic && !self.rings.is_ring_atom(inner) {
                        atom.aromatic = false;
                    }
                }
                (None, None) => {}
            }
        }

        Ok(chem::annotate(&fragment, &self.config.charge_method)?)
    }
}

/// Single, acyclic, between two atoms with at least two heavy neighbours,
/// neither of which is part of a triple bond.
fn is_rotor(mol: &Molecule, rings: &RingInfo, bond_idx: usize) -> bool {
    let bond = &mol.bonds[bond_idx];
    bond.order == BondOrder::Single
        && !rings.is_ring_bond(bond_idx)
        && mol.heavy_degree(bond.i) >= 2
        && mol.heavy_degree(bond.j) >= 2
        && !mol.has_triple_bond(bond.i)
        && !mol.has_triple_bond(bond.j)
}

/// Ring systems as atom lists; with `keep_non_rotor`, substituents reachable
/// through non-rotatable acyclic bonds are added to their ring system.
fn ring_systems(mol: &Molecule, rings: &RingInfo, keep_non_rotor: bool) -> Vec<Vec<usize>> {
    if !keep_non_rotor {
        return rings.systems().to_vec();
    }

    let adj = mol.adjacency();
    rings
        .systems()
        .iter()
        .map(|system| {
            let mut members: BTreeSet<usize> = system.iter().copied().collect();
            let mut stack: Vec<usize> = system.clone();
            while let Some(atom) = stack.pop() {
                for &(nbr, bi) in &adj[atom] {
                    if members.contains(&nbr)
                        || rings.is_ring_bond(bi)
                        || rings.is_ring_atom(nbr)
                        || is_rotor(mol, rings, bi)
                    {
                        continue;
                    }
                    members.insert(nbr);
                    stack.push(nbr);
                }
            }
            members.into_iter().collect()
        })
        .collect()
}
