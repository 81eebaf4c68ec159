//! Grouping of benchmark molecules by substituent and bond order.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use log::{debug, warn};

use super::error::Error;
use super::record::{RingRecord, SubstituentSite};
use crate::chem::{self, ChargeMethod};
use crate::model::molecule::Molecule;
use crate::perception::rings::RingInfo;
use crate::smiles::canonical_smiles;

/// A Wiberg bond order usable as an ordered map key.
#[derive(Debug, Clone, Copy)]
pub struct BondOrderValue(pub f64);

impl BondOrderValue {
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl PartialEq for BondOrderValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BondOrderValue {}

impl PartialOrd for BondOrderValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BondOrderValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// A charged and annotated member of a group.
#[derive(Debug, Clone)]
pub struct GroupMember {
    pub record: RingRecord,
    pub site: SubstituentSite,
    pub smiles: String,
    pub molecule: Molecule,
}

/// Bond order of a group's substituent bond → members showing it.
#[derive(Debug, Clone)]
pub struct WboDistribution {
    pub group: String,
    entries: BTreeMap<BondOrderValue, Vec<GroupMember>>,
}

impl WboDistribution {
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, wbo: f64, member: GroupMember) {
        self.entries.entry(BondOrderValue(wbo)).or_default().push(member);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct bond orders.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Distinct bond orders, ascending.
    pub fn values(&self) -> Vec<f64> {
        self.entries.keys().map(BondOrderValue::value).collect()
    }

    /// `(bond order, members)` in ascending bond order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, &[GroupMember])> {
        self.entries.iter().map(|(k, v)| (k.value(), v.as_slice()))
    }
}

/// Molecules whose title mentions `group` in any position.
pub fn members<'a>(group: &str, molecules: &'a [Molecule]) -> Vec<&'a Molecule> {
    molecules
        .iter()
        .filter(|mol| RingRecord::parse(&mol.title).mentions(group))
        .collect()
}

/// Keeps the first molecule of every canonical SMILES.
pub fn dedup_by_smiles<'a, I>(molecules: I) -> Vec<(&'a Molecule, String)>
where
    I: IntoIterator<Item = &'a Molecule>,
{
    let mut seen = BTreeSet::new();
    molecules
        .into_iter()
        .filter_map(|mol| {
            let smiles = canonical_smiles(mol);
            seen.insert(smiles.clone()).then_some((mol, smiles))
        })
        .collect()
}

/// Acyclic bonds of `mol` touching an atom whose map index is in `anchors`.
pub fn substituent_bonds(mol: &Molecule, anchors: &[u32]) -> Vec<usize> {
    let rings = RingInfo::perceive(mol);
    mol.bonds
        .iter()
        .enumerate()
        .filter(|&(bi, bond)| {
            !rings.is_ring_bond(bi)
                && (anchors.contains(&mol.atoms[bond.i].map_idx)
                    || anchors.contains(&mol.atoms[bond.j].map_idx))
        })
        .map(|(bi, _)| bi)
        .collect()
}

/// Builds the bond order distribution of `group` over `molecules`.
///
/// Members are deduplicated, charged and annotated; every acyclic bond on
/// the substituent's anchor atoms contributes one entry. Members whose
/// title mentions the group away from the `R1`/`R2` positions are skipped.
///
/// # Errors
///
/// Propagates charge and bond order failures.
pub fn group_by_wbo(
    group: &str,
    molecules: &[Molecule],
    method: &ChargeMethod,
) -> Result<WboDistribution, Error> {
    let mut distribution = WboDistribution::new(group);
    for (mol, smiles) in dedup_by_smiles(members(group, molecules)) {
        let record = RingRecord::parse(&mol.title);
        let Some(site) = record.site_of(group) else {
            warn!(
                "'{}' mentions {group} outside the R1/R2 positions; skipped",
                record.title
            );
            continue;
        };

        let charged = chem::annotate(mol, method)?;
        let bonds = substituent_bonds(&charged, site.anchor_maps());
        if bonds.is_empty() {
            warn!("'{}' has no acyclic bond on its {site} anchor", record.title);
        }
        for bi in bonds {
            let wbo = charged.bonds[bi].wbo.unwrap_or_default();
            distribution.insert(
                wbo,
                GroupMember {
                    record: record.clone(),
                    site,
                    smiles: smiles.clone(),
                    molecule: charged.clone(),
                },
            );
        }
    }
    debug!("{group}: {} distinct bond orders", distribution.len());
    Ok(distribution)
}
