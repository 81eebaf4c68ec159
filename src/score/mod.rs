//! Fragment scoring.
//!
//! Every bond of a score table is fragmented with a [`Fragmenter`], the
//! fragment's canonical identity is looked up among the bond's candidate
//! fragments and its square-root MMD score is reported raw and min-max
//! normalized. A second, independent pass runs against the rescore table
//! when it lists the bond.
//!
//! Each bond produces a [`BondOutcome`]; outcomes are merged into a
//! [`ScoreReport`] by the caller (or by [`run_scoring`]).

mod error;
mod normalize;
mod report;
mod table;

pub use error::Error;
pub use normalize::{Score, min_max, score_at, sqrt_transform};
pub use report::{BondOutcome, ScoreReport, ScoreRow};
pub use table::{ScoreEntry, ScoreTable};

use log::{info, warn};

use crate::fragment::{Fragmenter, FragmenterConfig};
use crate::model::bond_key::BondKey;
use crate::model::molecule::Molecule;

/// Fragments `bond` and scores the fragment against `entry` and, when
/// present, against `rescore`.
///
/// An identity missing from `entry` is a [`BondOutcome::Failed`].
///
/// # Errors
///
/// Propagates fragment generation failures and returns
/// [`Error::RescoreMiss`] when `rescore` lists the bond but not the
/// fragment's identity.
pub fn score_bond(
    fragmenter: &Fragmenter,
    bond: BondKey,
    entry: &ScoreEntry,
    rescore: Option<&ScoreEntry>,
) -> Result<BondOutcome, Error> {
    let fragment = fragmenter.build_fragment(bond)?;

    let Some(score) = entry.score_of(&fragment.identity) else {
        info!("{} not in candidates of bond {bond}", fragment.identity);
        return Ok(BondOutcome::Failed {
            identity: fragment.identity,
        });
    };

    let rescore = match rescore {
        Some(candidates) => match candidates.score_of(&fragment.identity) {
            Some(found) => Some(found),
            None => return Err(Error::rescore_miss(bond, fragment.identity)),
        },
        None => None,
    };

    Ok(BondOutcome::Scored(ScoreRow {
        heavy_atoms: fragment.heavy_atom_count(),
        identity: fragment.identity,
        score,
        rescore,
    }))
}

/// Selected bonds the score table does not cover.
pub fn unscored_bonds(selected: &[BondKey], scores: &ScoreTable) -> Vec<BondKey> {
    selected
        .iter()
        .copied()
        .filter(|bond| !scores.contains(*bond))
        .collect()
}

/// Scores every bond of `scores` on `parent`.
///
/// Charges and bond orders of the parent are computed once. Bonds are
/// processed in the score table's key order and `on_bond` sees each key
/// before its bond is fragmented.
///
/// # Errors
///
/// Fails if the parent cannot be annotated, a table bond does not exist
/// in the parent or a rescored bond misses the fragment. Identities
/// missing from the base table are recorded, not raised.
pub fn run_scoring(
    parent: &Molecule,
    selected: &[BondKey],
    scores: &ScoreTable,
    rescores: &ScoreTable,
    config: FragmenterConfig,
    mut on_bond: impl FnMut(&str),
) -> Result<ScoreReport, Error> {
    for bond in unscored_bonds(selected, scores) {
        warn!("selected bond {bond} has no score table entry");
    }

    let fragmenter = Fragmenter::new(parent, config)?;
    let mut report = ScoreReport::new();
    for (key, bond, entry) in scores.iter() {
        on_bond(key);
        let outcome = score_bond(&fragmenter, bond, entry, rescores.get(bond))?;
        report.record(key, outcome);
    }

    if !report.is_empty() {
        report.provenance = Some(fragmenter.provenance());
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::Fragment;
    use crate::smiles::parse_smiles;
    use serde_json::json;
    use std::collections::BTreeMap;

    const ETHYLAMINE: &str = "[CH3:1][CH2:2][NH2:3]";
    const PROPANOL: &str = "[CH3:1][CH2:2][CH2:3][OH:4]";

    fn fragment_of(smiles: &str, bond: BondKey) -> Fragment {
        let parent = parse_smiles(smiles).unwrap();
        Fragmenter::new(&parent, FragmenterConfig::default())
            .unwrap()
            .build_fragment(bond)
            .unwrap()
    }

    fn table(entries: &[(&str, &[&str], &[f64])]) -> ScoreTable {
        let raw = entries
            .iter()
            .map(|(key, frags, scores)| {
                (
                    key.to_string(),
                    ScoreEntry {
                        frags: frags.iter().map(|f| f.to_string()).collect(),
                        mmd_scores: scores.to_vec(),
                    },
                )
            })
            .collect::<BTreeMap<_, _>>();
        ScoreTable::new(raw).unwrap()
    }

    #[test]
    fn matched_identity_is_scored_and_normalized() {
        let identity = fragment_of(ETHYLAMINE, BondKey::new(1, 2)).identity;
        let scores = table(&[("1-2", &["CCO", identity.as_str()], &[1.0, 4.0])]);
        let parent = parse_smiles(ETHYLAMINE).unwrap();

        let report = run_scoring(
            &parent,
            &[BondKey::new(1, 2)],
            &scores,
            &ScoreTable::default(),
            FragmenterConfig::default(),
            |_| {},
        )
        .unwrap();

        assert!(report.failures.is_empty());
        let row = &report.rows["1-2"];
        assert_eq!(row.identity, identity);
        assert_eq!(row.score, Score { raw: 2.0, normalized: 1.0 });
        assert_eq!(row.heavy_atoms, 3);
        assert!(row.rescore.is_none());

        let doc = report.results_json().unwrap();
        assert_eq!(doc["1-2"].as_array().unwrap().len(), 4);
        assert!(doc.get("provenance").is_some());
    }

    #[test]
    fn unmatched_identity_is_a_failure_only() {
        let identity = fragment_of(ETHYLAMINE, BondKey::new(1, 2)).identity;
        let scores = table(&[("1-2", &["CCO", "CCCl"], &[1.0, 4.0])]);
        let parent = parse_smiles(ETHYLAMINE).unwrap();

        let report = run_scoring(&parent, &[], &scores, &ScoreTable::default(), Default::default(), |_| {})
            .unwrap();

        assert!(report.rows.is_empty());
        assert!(report.results_json().is_none());
        assert_eq!(report.failures_json().unwrap(), json!({ "1-2": identity }));
    }

    #[test]
    fn rescore_adds_two_fields() {
        let identity = fragment_of(ETHYLAMINE, BondKey::new(1, 2)).identity;
        let scores = table(&[("1-2", &[identity.as_str(), "CCO"], &[1.0, 4.0])]);
        let rescores = table(&[("2-1", &["CC", identity.as_str(), "CCO"], &[0.0, 1.0, 4.0])]);
        let parent = parse_smiles(ETHYLAMINE).unwrap();

        let report = run_scoring(&parent, &[], &scores, &rescores, Default::default(), |_| {}).unwrap();
        let row = &report.rows["1-2"];
        assert_eq!(row.score, Score { raw: 1.0, normalized: 0.0 });
        assert_eq!(row.rescore, Some(Score { raw: 1.0, normalized: 0.5 }));
        assert_eq!(serde_json::to_value(row).unwrap().as_array().unwrap().len(), 6);
    }

    #[test]
    fn rescore_miss_is_fatal() {
        let identity = fragment_of(ETHYLAMINE, BondKey::new(1, 2)).identity;
        let scores = table(&[("1-2", &[identity.as_str()], &[2.0])]);
        let rescores = table(&[("1-2", &["CC"], &[1.0])]);
        let parent = parse_smiles(ETHYLAMINE).unwrap();

        let err = run_scoring(&parent, &[], &scores, &rescores, Default::default(), |_| {})
            .unwrap_err();
        match err {
            Error::RescoreMiss { key, identity: missing } => {
                assert_eq!(key, BondKey::new(1, 2).to_string());
                assert_eq!(missing, identity);
            }
            other => panic!("expected a rescore miss, got {other:?}"),
        }
    }

    #[test]
    fn bonds_are_reported_in_table_order() {
        let scores = table(&[("(2, 3)", &["N"], &[1.0]), ("(1, 2)", &["C"], &[1.0])]);
        let parent = parse_smiles(ETHYLAMINE).unwrap();

        let mut seen = Vec::new();
        let report = run_scoring(
            &parent,
            &[],
            &scores,
            &ScoreTable::default(),
            Default::default(),
            |key| seen.push(key.to_string()),
        )
        .unwrap();

        assert_eq!(seen, vec!["(1, 2)", "(2, 3)"]);
        assert_eq!(report.failures.len(), 2);
    }

    #[test]
    fn reversed_key_gives_identical_outcome() {
        let forward = fragment_of(PROPANOL, BondKey::new(2, 3));
        let reversed = fragment_of(PROPANOL, BondKey::new(3, 2));
        assert_eq!(forward.identity, reversed.identity);

        let parent = parse_smiles(PROPANOL).unwrap();
        let fragmenter = Fragmenter::new(&parent, FragmenterConfig::default()).unwrap();
        let entry = ScoreEntry {
            frags: vec![forward.identity.clone()],
            mmd_scores: vec![0.25],
        };
        let a = score_bond(&fragmenter, "2-3".parse().unwrap(), &entry, None).unwrap();
        let b = score_bond(&fragmenter, "(3, 2)".parse().unwrap(), &entry, None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_table_bond_is_fatal() {
        let scores = table(&[("1-3", &["CC"], &[1.0])]);
        let parent = parse_smiles(ETHYLAMINE).unwrap();
        let err = run_scoring(&parent, &[], &scores, &ScoreTable::default(), Default::default(), |_| {})
            .unwrap_err();
        assert!(matches!(err, Error::Fragment(_)));
    }

    #[test]
    fn selected_bonds_without_entries_are_listed() {
        let scores = table(&[("1-2", &["CC"], &[1.0])]);
        let missing = unscored_bonds(&[BondKey::new(2, 1), BondKey::new(2, 3)], &scores);
        assert_eq!(missing, vec![BondKey::new(2, 3)]);
    }
}
