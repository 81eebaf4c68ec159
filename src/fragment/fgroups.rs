use std::collections::BTreeMap;
use std::fs;
use std::sync::OnceLock;

use serde::Deserialize;

use super::config::FunctionalGroups;
use super::error::Error;
use crate::model::molecule::Molecule;
use crate::perception::substructure::matched_atom_sets;
use crate::smiles::parse_smiles;

const DEFAULT_GROUPS_TOML: &str = include_str!("../../resources/functional_groups.toml");

static DEFAULT_GROUPS: OnceLock<FunctionalGroupTable> = OnceLock::new();

#[derive(Debug, Deserialize)]
struct GroupFile {
    #[serde(default)]
    groups: BTreeMap<String, String>,
}

/// Named substructure patterns that must not be split by a fragment.
#[derive(Debug, Clone)]
pub struct FunctionalGroupTable {
    patterns: Vec<(String, Molecule)>,
}

/// Atoms of one functional-group occurrence in a molecule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMatch {
    pub name: String,
    pub atoms: Vec<usize>,
}

impl FunctionalGroupTable {
    pub fn from_toml(toml_str: &str) -> Result<Self, Error> {
        let file: GroupFile = toml::from_str(toml_str)?;
        let patterns = file
            .groups
            .into_iter()
            .map(|(name, smiles)| match parse_smiles(&smiles) {
                Ok(pattern) => Ok((name, pattern)),
                Err(e) => Err(Error::group_pattern(name, e)),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// The built-in table shipped with the crate.
    pub fn builtin() -> &'static Self {
        DEFAULT_GROUPS.get_or_init(|| {
            Self::from_toml(DEFAULT_GROUPS_TOML)
                .expect("Failed to parse embedded functional group table. This is a library bug.")
        })
    }

    /// Resolves a preservation mode; `Disabled` yields an empty table.
    pub fn load(mode: &FunctionalGroups) -> Result<Self, Error> {
        match mode {
            FunctionalGroups::Disabled => Ok(Self::empty()),
            FunctionalGroups::Default => Ok(Self::builtin().clone()),
            FunctionalGroups::Explicit(path) => {
                let text = fs::read_to_string(path).map_err(|e| Error::group_file(path, e))?;
                Self::from_toml(&text)
            }
        }
    }

    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|(name, _)| name.as_str())
    }

    /// Every occurrence of every group in `mol`, ordered by group name.
    pub fn find(&self, mol: &Molecule) -> Vec<GroupMatch> {
        self.patterns
            .iter()
            .flat_map(|(name, pattern)| {
                matched_atom_sets(mol, pattern)
                    .into_iter()
                    .map(move |atoms| GroupMatch {
                        name: name.clone(),
                        atoms,
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_table_parses() {
        let table = FunctionalGroupTable::builtin();
        assert!(table.len() >= 10);
        assert!(table.names().any(|n| n == "amide"));
        assert!(table.names().any(|n| n == "nitro"));
    }

    #[test]
    fn finds_groups_in_acetanilide() {
        let mol = parse_smiles("CC(=O)Nc1ccccc1").unwrap();
        let found = FunctionalGroupTable::builtin().find(&mol);
        let names: Vec<&str> = found.iter().map(|m| m.name.as_str()).collect();
        assert!(names.contains(&"amide"));
        assert!(names.contains(&"carbonyl"));
        assert!(!names.contains(&"ester"));
    }

    #[test]
    fn disabled_mode_is_empty() {
        let table = FunctionalGroupTable::load(&FunctionalGroups::Disabled).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn explicit_file_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[groups]\nnitrile = \"C#N\"").unwrap();
        let mode = FunctionalGroups::Explicit(file.path().to_path_buf());
        let table = FunctionalGroupTable::load(&mode).unwrap();
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["nitrile"]);
    }

    #[test]
    fn bad_pattern_is_reported_with_its_name() {
        let err = FunctionalGroupTable::from_toml("[groups]\nbroken = \"C(\"").unwrap_err();
        assert!(matches!(err, Error::GroupPattern { ref name, .. } if name == "broken"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let mode = FunctionalGroups::Explicit("/nonexistent/groups.toml".into());
        assert!(matches!(
            FunctionalGroupTable::load(&mode),
            Err(Error::GroupFile { .. })
        ));
    }
}
