//! Per-bond outcomes and the merged report.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_json::{Map, Value};

use super::normalize::Score;

/// One scored bond.
///
/// Serialized as `[identity, score, normalized, heavy_atoms]`, extended with
/// `rescore, rescore_normalized` when the rescore pass matched.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRow {
    pub identity: String,
    pub score: Score,
    pub heavy_atoms: usize,
    pub rescore: Option<Score>,
}

impl Serialize for ScoreRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.rescore.is_some() { 6 } else { 4 };
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.identity)?;
        seq.serialize_element(&self.score.raw)?;
        seq.serialize_element(&self.score.normalized)?;
        seq.serialize_element(&self.heavy_atoms)?;
        if let Some(rescore) = &self.rescore {
            seq.serialize_element(&rescore.raw)?;
            seq.serialize_element(&rescore.normalized)?;
        }
        seq.end()
    }
}

/// Result of scoring a single bond.
#[derive(Debug, Clone, PartialEq)]
pub enum BondOutcome {
    Scored(ScoreRow),
    /// The fragment's identity is not among the bond's candidates.
    Failed { identity: String },
}

/// Merged outcomes of a scoring run, keyed by the serialized bond key of
/// the score table.
#[derive(Debug, Clone, Default)]
pub struct ScoreReport {
    pub rows: BTreeMap<String, ScoreRow>,
    pub failures: BTreeMap<String, String>,
    pub provenance: Option<Value>,
}

impl ScoreReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: impl Into<String>, outcome: BondOutcome) {
        let key = key.into();
        match outcome {
            BondOutcome::Scored(row) => {
                self.rows.insert(key, row);
            }
            BondOutcome::Failed { identity } => {
                self.failures.insert(key, identity);
            }
        }
    }

    pub fn with_provenance(mut self, provenance: Value) -> Self {
        self.provenance = Some(provenance);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.failures.is_empty()
    }

    /// Result document, or `None` when no bond was scored.
    pub fn results_json(&self) -> Option<Value> {
        if self.rows.is_empty() {
            return None;
        }
        let mut doc = Map::new();
        for (key, row) in &self.rows {
            doc.insert(key.clone(), serde_json::to_value(row).ok()?);
        }
        if let Some(provenance) = &self.provenance {
            doc.insert("provenance".to_string(), provenance.clone());
        }
        Some(Value::Object(doc))
    }

    /// Failure document, or `None` when every bond matched.
    pub fn failures_json(&self) -> Option<Value> {
        if self.failures.is_empty() {
            return None;
        }
        let doc = self
            .failures
            .iter()
            .map(|(key, identity)| (key.clone(), Value::String(identity.clone())))
            .collect::<Map<_, _>>();
        Some(Value::Object(doc))
    }
}

impl Extend<(String, BondOutcome)> for ScoreReport {
    fn extend<T: IntoIterator<Item = (String, BondOutcome)>>(&mut self, iter: T) {
        for (key, outcome) in iter {
            self.record(key, outcome);
        }
    }
}

impl FromIterator<(String, BondOutcome)> for ScoreReport {
    fn from_iter<T: IntoIterator<Item = (String, BondOutcome)>>(iter: T) -> Self {
        let mut report = Self::new();
        report.extend(iter);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(rescore: Option<Score>) -> ScoreRow {
        ScoreRow {
            identity: "CCN".into(),
            score: Score { raw: 2.0, normalized: 1.0 },
            heavy_atoms: 3,
            rescore,
        }
    }

    #[test]
    fn row_serializes_as_four_or_six_fields() {
        assert_eq!(serde_json::to_value(row(None)).unwrap(), json!(["CCN", 2.0, 1.0, 3]));
        let rescored = row(Some(Score { raw: 0.5, normalized: 0.0 }));
        assert_eq!(
            serde_json::to_value(rescored).unwrap(),
            json!(["CCN", 2.0, 1.0, 3, 0.5, 0.0])
        );
    }

    #[test]
    fn emission_depends_on_rows_and_failures_only() {
        let report = ScoreReport::new().with_provenance(json!({"routine": "test"}));
        assert!(report.results_json().is_none());
        assert!(report.failures_json().is_none());

        let report: ScoreReport = [("1-2".to_string(), BondOutcome::Failed { identity: "CCC".into() })]
            .into_iter()
            .collect();
        assert!(report.results_json().is_none());
        assert_eq!(report.failures_json().unwrap(), json!({"1-2": "CCC"}));
    }

    #[test]
    fn results_carry_provenance() {
        let mut report = ScoreReport::new().with_provenance(json!({"routine": "test"}));
        report.record("1-2", BondOutcome::Scored(row(None)));
        let doc = report.results_json().unwrap();
        assert_eq!(doc["1-2"], json!(["CCN", 2.0, 1.0, 3]));
        assert_eq!(doc["provenance"]["routine"], "test");
    }
}
