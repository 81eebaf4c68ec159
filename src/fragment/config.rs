//! Fragmenter configuration.
//!
//! The textual forms accepted here are the command-line literals used by
//! existing case directories (`"False"`, `"None"`, `"path_length"`, ...);
//! they are decoded once into enums and booleans.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::chem::ChargeMethod;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown growth heuristic '{0}' (expected path_length or wbo)")]
pub struct ParseHeuristicError(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid boolean flag '{0}' (expected True or False)")]
pub struct ParseFlagError(String);

/// How the next bond is chosen when a fragment has to grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Heuristic {
    /// Nearest to the central bond first; ties go to the larger parent WBO.
    #[default]
    PathLength,
    /// Largest parent WBO first; ties go to the shorter path.
    Wbo,
}

impl Heuristic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Heuristic::PathLength => "path_length",
            Heuristic::Wbo => "wbo",
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Heuristic {
    type Err = ParseHeuristicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "path_length" => Ok(Heuristic::PathLength),
            "wbo" => Ok(Heuristic::Wbo),
            _ => Err(ParseHeuristicError(s.to_string())),
        }
    }
}

/// Functional-group preservation mode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FunctionalGroups {
    /// Functional groups are not preserved (`"False"`).
    Disabled,
    /// The built-in group table (`"None"`).
    #[default]
    Default,
    /// Groups read from a TOML file with a `[groups]` table.
    Explicit(PathBuf),
}

impl fmt::Display for FunctionalGroups {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionalGroups::Disabled => f.write_str("False"),
            FunctionalGroups::Default => f.write_str("None"),
            FunctionalGroups::Explicit(path) => write!(f, "{}", path.display()),
        }
    }
}

impl FromStr for FunctionalGroups {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "False" => FunctionalGroups::Disabled,
            "None" => FunctionalGroups::Default,
            other => FunctionalGroups::Explicit(PathBuf::from(other)),
        })
    }
}

/// Decodes a `True`/`False` command-line flag (case-insensitive; `1`/`0`
/// and `yes`/`no` are also accepted).
pub fn parse_flag(s: &str) -> Result<bool, ParseFlagError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ParseFlagError(s.to_string())),
    }
}

/// Renders a flag the way it appears in output file names.
pub fn flag_literal(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

/// Configuration of a [`Fragmenter`](super::Fragmenter).
///
/// # Examples
///
/// ```
/// use fragbench::{FragmenterConfig, Heuristic};
///
/// let config = FragmenterConfig {
///     threshold: 0.01,
///     heuristic: Heuristic::Wbo,
///     ..Default::default()
/// };
/// assert!(!config.keep_non_rotor_ring_substituents);
/// ```
#[derive(Debug, Clone)]
pub struct FragmenterConfig {
    /// Maximum allowed |WBO(fragment) − WBO(parent)| for the central bond.
    pub threshold: f64,

    /// Growth heuristic.
    pub heuristic: Heuristic,

    /// Functional groups that are never split.
    pub functional_groups: FunctionalGroups,

    /// Keep non-rotatable substituents (halogens, `=O`, methyls, ...) with
    /// the ring system they are attached to.
    pub keep_non_rotor_ring_substituents: bool,

    /// Charge model used for the parent and for every fragment.
    pub charge_method: ChargeMethod,
}

impl Default for FragmenterConfig {
    fn default() -> Self {
        Self {
            threshold: 0.03,
            heuristic: Heuristic::PathLength,
            functional_groups: FunctionalGroups::Default,
            keep_non_rotor_ring_substituents: false,
            charge_method: ChargeMethod::Gasteiger,
        }
    }
}
