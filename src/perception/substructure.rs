//! Substructure search via VF2-style backtracking.
//!
//! Pattern atoms match target atoms of the same element and aromaticity; a
//! nonzero formal charge on a pattern atom must match exactly. Hydrogen
//! counts are ignored. Bond orders must match exactly.

use std::collections::BTreeSet;

use crate::model::molecule::Molecule;

/// Target atom index for each pattern atom, in pattern order.
pub type Mapping = Vec<usize>;

pub fn has_match(target: &Molecule, pattern: &Molecule) -> bool {
    let mut search = Search::new(target, pattern, true);
    search.run();
    !search.matches.is_empty()
}

pub fn find_matches(target: &Molecule, pattern: &Molecule) -> Vec<Mapping> {
    let mut search = Search::new(target, pattern, false);
    search.run();
    search.matches
}

/// Distinct target atom sets covered by matches of `pattern`.
///
/// Symmetric patterns match the same atoms several times; each atom set is
/// reported once, sorted.
pub fn matched_atom_sets(target: &Molecule, pattern: &Molecule) -> Vec<Vec<usize>> {
    let sets: BTreeSet<Vec<usize>> = find_matches(target, pattern)
        .into_iter()
        .map(|mut m| {
            m.sort_unstable();
            m
        })
        .collect();
    sets.into_iter().collect()
}

struct Search<'a> {
    target: &'a Molecule,
    pattern: &'a Molecule,
    target_adj: Vec<Vec<(usize, usize)>>,
    pattern_adj: Vec<Vec<(usize, usize)>>,
    core_target: Vec<Option<usize>>,
    core_pattern: Vec<Option<usize>>,
    first_only: bool,
    matches: Vec<Mapping>,
}

impl<'a> Search<'a> {
    fn new(target: &'a Molecule, pattern: &'a Molecule, first_only: bool) -> Self {
        Self {
            target,
            pattern,
            target_adj: target.adjacency(),
            pattern_adj: pattern.adjacency(),
            core_target: vec![None; target.atom_count()],
            core_pattern: vec![None; pattern.atom_count()],
            first_only,
            matches: Vec::new(),
        }
    }

    fn run(&mut self) {
        if self.pattern.atom_count() == 0
            || self.pattern.atom_count() > self.target.atom_count()
            || self.pattern.bond_count() > self.target.bond_count()
        {
            return;
        }
        self.extend(0);
    }

    fn done(&self) -> bool {
        self.first_only && !self.matches.is_empty()
    }

    fn extend(&mut self, depth: usize) {
        if self.done() {
            return;
        }
        if depth == self.pattern.atom_count() {
            let mapping = self.core_pattern.iter().flatten().copied().collect();
            self.matches.push(mapping);
            return;
        }

        for candidate in self.candidates(depth) {
            if !self.feasible(depth, candidate) {
                continue;
            }
            self.core_pattern[depth] = Some(candidate);
            self.core_target[candidate] = Some(depth);
            self.extend(depth + 1);
            self.core_pattern[depth] = None;
            self.core_target[candidate] = None;
            if self.done() {
                return;
            }
        }
    }

    fn candidates(&self, pattern_atom: usize) -> Vec<usize> {
        let mapped_neighbor = self.pattern_adj[pattern_atom]
            .iter()
            .find_map(|&(nbr, _)| self.core_pattern[nbr]);

        match mapped_neighbor {
            Some(anchor) => self.target_adj[anchor]
                .iter()
                .map(|&(nbr, _)| nbr)
                .filter(|&t| self.core_target[t].is_none())
                .collect(),
            None => (0..self.target.atom_count())
                .filter(|&t| self.core_target[t].is_none())
                .collect(),
        }
    }

    fn feasible(&self, pattern_atom: usize, target_atom: usize) -> bool {
        let p = &self.pattern.atoms[pattern_atom];
        let t = &self.target.atoms[target_atom];
        if p.element != t.element || p.aromatic != t.aromatic {
            return false;
        }
        if p.formal_charge != 0 && p.formal_charge != t.formal_charge {
            return false;
        }
        if self.pattern_adj[pattern_atom].len() > self.target_adj[target_atom].len() {
            return false;
        }

        self.pattern_adj[pattern_atom].iter().all(|&(p_nbr, p_bond)| {
            let Some(t_nbr) = self.core_pattern[p_nbr] else {
                return true;
            };
            self.target
                .bond_between(target_atom, t_nbr)
                .is_some_and(|t_bond| {
                    self.target.bonds[t_bond].order == self.pattern.bonds[p_bond].order
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse_smiles;

    fn mol(s: &str) -> Molecule {
        parse_smiles(s).unwrap()
    }

    #[test]
    fn finds_amide_in_acetanilide() {
        let target = mol("CC(=O)Nc1ccccc1");
        let amide = mol("C(=O)N");
        let sets = matched_atom_sets(&target, &amide);
        assert_eq!(sets, vec![vec![1, 2, 3]]);
    }

    #[test]
    fn aromaticity_must_agree() {
        assert!(!has_match(&mol("C1CCCCC1"), &mol("c1ccccc1")));
        assert!(has_match(&mol("Oc1ccccc1"), &mol("c1ccccc1")));
    }

    #[test]
    fn charged_pattern_atoms_require_matching_charge() {
        let nitro = mol("[N+](=O)[O-]");
        assert!(has_match(&mol("c1ccccc1[N+](=O)[O-]"), &nitro));
        assert!(!has_match(&mol("CN(=O)=O"), &nitro));
    }

    #[test]
    fn symmetric_matches_collapse_to_one_atom_set() {
        let target = mol("CS(=O)(=O)C");
        let sulfone = mol("S(=O)=O");
        assert_eq!(find_matches(&target, &sulfone).len(), 2);
        assert_eq!(matched_atom_sets(&target, &sulfone).len(), 1);
    }

    #[test]
    fn bond_orders_must_match() {
        assert!(!has_match(&mol("CCO"), &mol("C=O")));
        assert!(has_match(&mol("CC=O"), &mol("C=O")));
    }
}
