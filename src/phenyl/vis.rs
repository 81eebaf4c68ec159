//! Preparation of group representatives for depiction.

use log::debug;

use super::group::{WboDistribution, substituent_bonds};
use super::record::SubstituentSite;
use crate::model::molecule::Molecule;
use crate::model::types::Element;
use crate::perception::rings::RingInfo;

/// Map indices given to the two atoms of the marked bond.
pub const MARKER_MAPS: (u32, u32) = (4, 5);

/// One representative structure with its substituent bond marked.
#[derive(Debug, Clone)]
pub struct Depiction {
    pub title: String,
    pub smiles: String,
    pub molecule: Molecule,
    pub marked_bond: usize,
    pub wbo: f64,
}

/// Representatives of one group, one per distinct bond order, ascending.
#[derive(Debug, Clone)]
pub struct DepictionSet {
    pub group: String,
    pub depictions: Vec<Depiction>,
    /// Bond orders whose representative has a ring nitrogen next to the
    /// substituent.
    pub excluded: Vec<f64>,
}

impl DepictionSet {
    pub fn is_empty(&self) -> bool {
        self.depictions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.depictions.len()
    }
}

/// Picks the first member of every bond order and marks its substituent
/// bond, dropping representatives with a ring nitrogen next to it.
pub fn prepare(distribution: &WboDistribution) -> DepictionSet {
    let mut set = DepictionSet {
        group: distribution.group.clone(),
        depictions: Vec::new(),
        excluded: Vec::new(),
    };

    for (wbo, members) in distribution.iter() {
        let Some(first) = members.first() else {
            continue;
        };
        let mol = &first.molecule;
        let Some(marked) = substituent_bonds(mol, first.site.anchor_maps())
            .into_iter()
            .find(|&bi| mol.bonds[bi].wbo == Some(wbo))
        else {
            continue;
        };

        if has_ortho_nitrogen(mol, first.site, marked) {
            debug!("{}: '{}' has an ortho ring nitrogen", set.group, first.record.title);
            set.excluded.push(wbo);
            continue;
        }

        set.depictions.push(Depiction {
            title: first.record.title.clone(),
            smiles: first.smiles.clone(),
            molecule: mark_bond(mol, marked),
            marked_bond: marked,
            wbo,
        });
    }
    set
}

/// Whether a ring bond touching an ortho-check atom or an atom of the
/// marked bond has a nitrogen at either end.
pub fn has_ortho_nitrogen(mol: &Molecule, site: SubstituentSite, marked: usize) -> bool {
    let rings = RingInfo::perceive(mol);
    let marked = &mol.bonds[marked];
    let checked = |atom: usize| {
        site.ortho_maps().contains(&mol.atoms[atom].map_idx) || marked.touches(atom)
    };

    mol.bonds.iter().enumerate().any(|(bi, bond)| {
        rings.is_ring_bond(bi)
            && (checked(bond.i) || checked(bond.j))
            && (mol.atoms[bond.i].element == Element::N || mol.atoms[bond.j].element == Element::N)
    })
}

/// Copy of `mol` with the marked bond relabeled to [`MARKER_MAPS`] and every
/// other bond order annotation removed.
pub fn mark_bond(mol: &Molecule, marked: usize) -> Molecule {
    let mut out = mol.clone();
    for (bi, bond) in out.bonds.iter_mut().enumerate() {
        if bi != marked {
            bond.wbo = None;
        }
    }
    let (i, j) = (out.bonds[marked].i, out.bonds[marked].j);
    out.atoms[i].map_idx = MARKER_MAPS.0;
    out.atoms[j].map_idx = MARKER_MAPS.1;
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chem::{ChargeMethod, annotate};
    use crate::phenyl::group::group_by_wbo;
    use crate::smiles::parse_smiles_line;

    fn molecules(lines: &[&str]) -> Vec<Molecule> {
        lines.iter().map(|l| parse_smiles_line(l).unwrap()).collect()
    }

    #[test]
    fn representative_has_one_annotated_bond() {
        let mols = molecules(&[
            "[NH2:2][c:1]1ccccc1 phenyl_amino",
            "[NH2:2][c:1]1ccc([N+](=O)[O-])cc1 phenyl_nitro_amino",
        ]);
        let dist = group_by_wbo("amino", &mols, &ChargeMethod::Gasteiger).unwrap();
        let set = prepare(&dist);
        assert!(!set.is_empty());
        for depiction in &set.depictions {
            assert_eq!(depiction.molecule.annotated_bond_count(), 1);
            let bond = &depiction.molecule.bonds[depiction.marked_bond];
            assert_eq!(bond.wbo, Some(depiction.wbo));
            assert_eq!(depiction.molecule.atoms[bond.i].map_idx, MARKER_MAPS.0);
            assert_eq!(depiction.molecule.atoms[bond.j].map_idx, MARKER_MAPS.1);
        }
        let wbos: Vec<f64> = set.depictions.iter().map(|d| d.wbo).collect();
        assert!(wbos.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn ring_nitrogen_next_to_substituent_is_excluded() {
        let mols = molecules(&[
            "[NH2:2][c:1]1ccccn1 pyridine_ortho_amino",
            "[NH2:2][c:1]1ccncc1 pyridine_para_amino",
        ]);
        let dist = group_by_wbo("amino", &mols, &ChargeMethod::Gasteiger).unwrap();
        let set = prepare(&dist);
        assert_eq!(set.excluded.len(), 1);
        assert_eq!(set.depictions.len(), dist.len() - 1);
        assert!(set.depictions.iter().all(|d| d.title == "pyridine_para_amino"));
    }

    #[test]
    fn ortho_check_uses_site_maps() {
        let mol = parse_smiles_line("[F:9][c:2]1[n:4]cccc1 pyridine_fluoro_x").unwrap();
        let charged = annotate(&mol, &ChargeMethod::None).unwrap();
        let marked = substituent_bonds(&charged, SubstituentSite::R2.anchor_maps())[0];
        assert!(has_ortho_nitrogen(&charged, SubstituentSite::R2, marked));

        let benzene = parse_smiles_line("[F:9][c:2]1ccccc1 phenyl_fluoro_x").unwrap();
        let marked = substituent_bonds(&benzene, SubstituentSite::R2.anchor_maps())[0];
        assert!(!has_ortho_nitrogen(&benzene, SubstituentSite::R2, marked));
    }
}
