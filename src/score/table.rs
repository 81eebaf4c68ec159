//! MMD score tables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::Error;
use super::normalize::{Score, score_at};
use crate::model::bond_key::BondKey;

/// Candidate fragments of one bond with their MMD scores, index-aligned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub frags: Vec<String>,
    pub mmd_scores: Vec<f64>,
}

impl ScoreEntry {
    /// Score of `identity` among this entry's candidates, or `None` when
    /// it is not a candidate.
    pub fn score_of(&self, identity: &str) -> Option<Score> {
        let idx = self.frags.iter().position(|f| f == identity)?;
        score_at(&self.mmd_scores, idx)
    }
}

/// A score table keyed by bond.
///
/// Keys keep their serialized form so reports can echo them back, while
/// lookups go through [`BondKey`] and ignore orientation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "BTreeMap<String, ScoreEntry>")]
pub struct ScoreTable {
    entries: BTreeMap<String, (BondKey, ScoreEntry)>,
    index: BTreeMap<BondKey, String>,
}

impl ScoreTable {
    /// Validates keys and list alignment.
    ///
    /// # Errors
    ///
    /// Fails on a key that is not a bond reference, on two keys naming the
    /// same bond, and on an entry whose lists differ in length.
    pub fn new(raw: BTreeMap<String, ScoreEntry>) -> Result<Self, Error> {
        let mut entries = BTreeMap::new();
        let mut index = BTreeMap::new();
        for (key, entry) in raw {
            if entry.frags.len() != entry.mmd_scores.len() {
                return Err(Error::misaligned(key, entry.frags.len(), entry.mmd_scores.len()));
            }
            let bond: BondKey = match key.parse() {
                Ok(bond) => bond,
                Err(source) => return Err(Error::InvalidKey { key, source }),
            };
            if index.insert(bond, key.clone()).is_some() {
                return Err(Error::DuplicateBond { key });
            }
            entries.insert(key, (bond, entry));
        }
        Ok(Self { entries, index })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, bond: BondKey) -> bool {
        self.index.contains_key(&bond)
    }

    /// The entry for `bond` in either orientation.
    pub fn get(&self, bond: BondKey) -> Option<&ScoreEntry> {
        let key = self.index.get(&bond)?;
        self.entries.get(key).map(|(_, entry)| entry)
    }

    /// `(serialized key, bond, entry)` in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, BondKey, &ScoreEntry)> {
        self.entries
            .iter()
            .map(|(key, (bond, entry))| (key.as_str(), *bond, entry))
    }
}

impl TryFrom<BTreeMap<String, ScoreEntry>> for ScoreTable {
    type Error = Error;

    fn try_from(raw: BTreeMap<String, ScoreEntry>) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(frags: &[&str], scores: &[f64]) -> ScoreEntry {
        ScoreEntry {
            frags: frags.iter().map(|s| s.to_string()).collect(),
            mmd_scores: scores.to_vec(),
        }
    }

    #[test]
    fn lookup_ignores_orientation() {
        let table: ScoreTable =
            serde_json::from_str(r#"{"(5, 2)": {"frags": ["CC"], "mmd_scores": [0.5]}}"#).unwrap();
        assert!(table.contains(BondKey::new(2, 5)));
        assert_eq!(table.get(BondKey::new(5, 2)).unwrap().frags, vec!["CC"]);
        let keys: Vec<&str> = table.iter().map(|(k, _, _)| k).collect();
        assert_eq!(keys, vec!["(5, 2)"]);
    }

    #[test]
    fn misaligned_lists_are_rejected() {
        let raw = BTreeMap::from([("1-2".to_string(), entry(&["CC", "CO"], &[1.0]))]);
        assert!(matches!(
            ScoreTable::new(raw),
            Err(Error::MisalignedEntry { frags: 2, scores: 1, .. })
        ));
    }

    #[test]
    fn duplicate_orientations_are_rejected() {
        let raw = BTreeMap::from([
            ("1-2".to_string(), entry(&["CC"], &[1.0])),
            ("2-1".to_string(), entry(&["CC"], &[1.0])),
        ]);
        assert!(matches!(ScoreTable::new(raw), Err(Error::DuplicateBond { .. })));
    }

    #[test]
    fn bad_key_is_rejected_through_serde() {
        let result: Result<ScoreTable, _> =
            serde_json::from_str(r#"{"carbon": {"frags": [], "mmd_scores": []}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn score_of_missing_identity_is_none() {
        let e = entry(&["CCO", "CCN"], &[1.0, 4.0]);
        assert!(e.score_of("CCC").is_none());
        assert_eq!(e.score_of("CCN").unwrap().normalized, 1.0);
    }
}
