//! Charge calculation method configurations.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub use cheq::SolverOptions;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown charge method '{0}' (expected gasteiger, qeq or none)")]
pub struct ParseChargeMethodError(String);

/// Method for calculating partial atomic charges.
///
/// Charges feed the σ polarity term of the Wiberg bond order model, so the
/// method changes bond orders slightly but never the π contribution.
#[derive(Debug, Clone, Default)]
pub enum ChargeMethod {
    /// No charge calculation; partial charges stay at zero.
    None,

    /// Gasteiger–Marsili iterative electronegativity equalization.
    ///
    /// Topology-only and fast; the default.
    #[default]
    Gasteiger,

    /// Charge equilibration on a distance-geometry embedding.
    Qeq(QeqConfig),
}

/// Configuration for QEq charge equilibration.
///
/// The total charge is always the sum of the molecule's formal charges.
#[derive(Debug, Clone)]
pub struct QeqConfig {
    /// QEq solver options.
    pub solver_options: SolverOptions,
}

impl Default for QeqConfig {
    fn default() -> Self {
        Self {
            solver_options: SolverOptions {
                hydrogen_scf: false,
                ..SolverOptions::default()
            },
        }
    }
}

impl ChargeMethod {
    pub fn name(&self) -> &'static str {
        match self {
            ChargeMethod::None => "none",
            ChargeMethod::Gasteiger => "gasteiger",
            ChargeMethod::Qeq(_) => "qeq",
        }
    }
}

impl fmt::Display for ChargeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChargeMethod {
    type Err = ParseChargeMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(ChargeMethod::None),
            "gasteiger" => Ok(ChargeMethod::Gasteiger),
            "qeq" => Ok(ChargeMethod::Qeq(QeqConfig::default())),
            _ => Err(ParseChargeMethodError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_method_names() {
        assert!(matches!("Gasteiger".parse(), Ok(ChargeMethod::Gasteiger)));
        assert!(matches!("qeq".parse(), Ok(ChargeMethod::Qeq(_))));
        assert!(matches!("none".parse(), Ok(ChargeMethod::None)));
        assert!("am1bcc".parse::<ChargeMethod>().is_err());
    }

    #[test]
    fn default_is_gasteiger() {
        assert_eq!(ChargeMethod::default().to_string(), "gasteiger");
    }
}
