//! The directory of one scoring case.
//!
//! ```text
//! <root>/selected/<name>/<name>_selected_bonds.json
//! <root>/selected/<name>/<name>_frag_with_scores.json
//! <root>/selected/<name>/rescore/<name>_frag_with_scores.json
//! ```
//!
//! Results are written next to the inputs, named after the fragmenter
//! options that produced them.

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

use super::{Error, read_json, write_json};
use crate::fragment::{FragmenterConfig, flag_literal};
use crate::model::bond_key::BondKey;
use crate::model::molecule::Molecule;
use crate::score::{ScoreReport, ScoreTable};
use crate::smiles::parse_smiles;

/// Contents of `<name>_selected_bonds.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectedBonds {
    pub bonds: Vec<[u32; 2]>,
    pub parent_smiles: String,
}

impl SelectedBonds {
    pub fn bond_keys(&self) -> Vec<BondKey> {
        self.bonds.iter().map(|&pair| BondKey::from(pair)).collect()
    }
}

/// Everything read from a case directory.
#[derive(Debug, Clone)]
pub struct CaseInput {
    pub parent: Molecule,
    pub selected: Vec<BondKey>,
    pub scores: ScoreTable,
    pub rescores: ScoreTable,
}

/// Output files actually written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrittenFiles {
    pub results: Option<PathBuf>,
    pub failures: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct CaseLayout {
    root: PathBuf,
    name: String,
}

impl CaseLayout {
    pub fn new(root: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            name: name.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn case_dir(&self) -> PathBuf {
        self.root.join("selected").join(&self.name)
    }

    pub fn selected_bonds_path(&self) -> PathBuf {
        self.case_dir()
            .join(format!("{}_selected_bonds.json", self.name))
    }

    pub fn scores_path(&self) -> PathBuf {
        self.case_dir()
            .join(format!("{}_frag_with_scores.json", self.name))
    }

    pub fn rescores_path(&self) -> PathBuf {
        self.case_dir()
            .join("rescore")
            .join(format!("{}_frag_with_scores.json", self.name))
    }

    /// `<name>_<threshold>_<path>_<fgroups>_<keep_non_rotor>`.
    pub fn output_stem(&self, config: &FragmenterConfig) -> String {
        format!(
            "{}_{}_{}_{}_{}",
            self.name,
            python_float(config.threshold),
            config.heuristic,
            config.functional_groups,
            flag_literal(config.keep_non_rotor_ring_substituents),
        )
    }

    pub fn results_path(&self, config: &FragmenterConfig) -> PathBuf {
        self.case_dir()
            .join(format!("{}_score_2.json", self.output_stem(config)))
    }

    pub fn failures_path(&self, config: &FragmenterConfig) -> PathBuf {
        self.case_dir()
            .join(format!("{}_failure_2.json", self.output_stem(config)))
    }

    /// Reads the three input files; all of them are required.
    pub fn load(&self) -> Result<CaseInput, Error> {
        let selected_path = self.selected_bonds_path();
        let selected: SelectedBonds = read_json(&selected_path)?;
        let parent = parse_smiles(&selected.parent_smiles)
            .map_err(|e| Error::invalid_input(&selected_path, format!("parent_smiles: {e}")))?
            .with_title(self.name.clone());

        Ok(CaseInput {
            parent,
            selected: selected.bond_keys(),
            scores: read_json(&self.scores_path())?,
            rescores: read_json(&self.rescores_path())?,
        })
    }

    /// Writes the result and failure files of `report`, each only when it
    /// has content.
    pub fn write_report(
        &self,
        config: &FragmenterConfig,
        report: &ScoreReport,
    ) -> Result<WrittenFiles, Error> {
        let mut written = WrittenFiles::default();
        if let Some(doc) = report.results_json() {
            let path = self.results_path(config);
            write_json(&path, &doc)?;
            info!("wrote {}", path.display());
            written.results = Some(path);
        }
        if let Some(doc) = report.failures_json() {
            let path = self.failures_path(config);
            write_json(&path, &doc)?;
            info!("wrote {}", path.display());
            written.failures = Some(path);
        }
        Ok(written)
    }
}

/// Formats a float the way Python's `str(float)` does: shortest round-trip
/// digits, a trailing `.0` for integral values and exponent notation
/// outside `[1e-4, 1e16)`.
pub fn python_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{value:e}");
        let (mantissa, exponent) = formatted.split_once('e').unwrap_or((formatted.as_str(), "0"));
        let (sign, digits) = match exponent.strip_prefix('-') {
            Some(digits) => ('-', digits),
            None => ('+', exponent),
        };
        return format!("{mantissa}e{sign}{digits:0>2}");
    }

    let formatted = format!("{value}");
    if formatted.contains('.') {
        formatted
    } else {
        format!("{formatted}.0")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::{FunctionalGroups, Heuristic};
    use crate::score::{BondOutcome, Score, ScoreRow};
    use std::fs;

    #[test]
    fn python_float_formatting() {
        assert_eq!(python_float(0.03), "0.03");
        assert_eq!(python_float(1.0), "1.0");
        assert_eq!(python_float(0.0), "0.0");
        assert_eq!(python_float(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(python_float(1e-5), "1e-05");
        assert_eq!(python_float(2.5e20), "2.5e+20");
        assert_eq!(python_float(-3.0), "-3.0");
    }

    #[test]
    fn output_names_follow_options() {
        let layout = CaseLayout::new("/data", "Cmpd1_0");
        let config = FragmenterConfig {
            threshold: 0.01,
            heuristic: Heuristic::Wbo,
            functional_groups: FunctionalGroups::Disabled,
            keep_non_rotor_ring_substituents: true,
            ..Default::default()
        };
        assert_eq!(
            layout.results_path(&config),
            Path::new("/data/selected/Cmpd1_0/Cmpd1_0_0.01_wbo_False_True_score_2.json")
        );
        let defaults = FragmenterConfig::default();
        assert_eq!(
            layout.failures_path(&defaults),
            Path::new("/data/selected/Cmpd1_0/Cmpd1_0_0.03_path_length_None_False_failure_2.json")
        );
        assert_eq!(
            layout.rescores_path(),
            Path::new("/data/selected/Cmpd1_0/rescore/Cmpd1_0_frag_with_scores.json")
        );
    }

    fn write_case(root: &Path) -> CaseLayout {
        let layout = CaseLayout::new(root, "case");
        fs::create_dir_all(layout.case_dir().join("rescore")).unwrap();
        fs::write(
            layout.selected_bonds_path(),
            r#"{"bonds": [[2, 3]], "parent_smiles": "[CH3:1][CH2:2][CH2:3][OH:4]"}"#,
        )
        .unwrap();
        fs::write(
            layout.scores_path(),
            r#"{"(2, 3)": {"frags": ["CCCO"], "mmd_scores": [1.0]}}"#,
        )
        .unwrap();
        fs::write(layout.rescores_path(), "{}").unwrap();
        layout
    }

    #[test]
    fn loads_a_case_directory() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_case(dir.path()).load().unwrap();
        assert_eq!(input.parent.atom_count(), 4);
        assert_eq!(input.parent.title, "case");
        assert_eq!(input.selected, vec![BondKey::new(3, 2)]);
        assert!(input.scores.contains(BondKey::new(2, 3)));
        assert!(input.rescores.is_empty());
    }

    #[test]
    fn missing_rescore_table_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let layout = write_case(dir.path());
        fs::remove_file(layout.rescores_path()).unwrap();
        assert!(matches!(layout.load(), Err(Error::File { .. })));
    }

    #[test]
    fn writes_only_non_empty_tables() {
        let dir = tempfile::tempdir().unwrap();
        let layout = write_case(dir.path());
        let config = FragmenterConfig::default();

        let empty = layout.write_report(&config, &ScoreReport::new()).unwrap();
        assert_eq!(empty, WrittenFiles::default());

        let mut report = ScoreReport::new();
        report.record(
            "(2, 3)",
            BondOutcome::Scored(ScoreRow {
                identity: "CCCO".into(),
                score: Score { raw: 1.0, normalized: 0.0 },
                heavy_atoms: 4,
                rescore: None,
            }),
        );
        let written = layout.write_report(&config, &report).unwrap();
        assert!(written.failures.is_none());
        let path = written.results.unwrap();
        assert!(!layout.failures_path(&config).exists());
        let doc: serde_json::Value = read_json(&path).unwrap();
        assert_eq!(doc["(2, 3)"][0], "CCCO");
        assert_eq!(doc["(2, 3)"].as_array().unwrap().len(), 4);
    }
}
