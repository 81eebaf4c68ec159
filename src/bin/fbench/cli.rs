use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use fragbench::fragment::{FunctionalGroups, Heuristic, parse_flag};

#[derive(Parser)]
#[command(
    name = "fbench",
    about = "WBO fragment scoring and substituent bond order benchmarks",
    version,
    author,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fragment every scored bond of a case and report its MMD score
    #[command(visible_alias = "s")]
    Score(ScoreArgs),

    /// Wiberg bond order distributions of substituted phenyls and pyridines
    #[command(visible_alias = "p")]
    Phenyl(PhenylArgs),
}

/// Fragmenter options.
#[derive(Args)]
#[command(next_help_heading = "Fragmentation")]
pub struct FragmentOptions {
    /// Maximum WBO difference between fragment and parent central bond
    #[arg(short, long, value_name = "WBO", default_value = "0.03")]
    pub threshold: f64,

    /// Growth heuristic (path_length or wbo)
    #[arg(short = 'p', long = "path", value_name = "HEURISTIC", default_value = "path_length")]
    pub heuristic: Heuristic,

    /// Functional groups to preserve: False, None (built-in table) or a TOML file
    #[arg(
        short = 'f',
        long = "functional-group",
        value_name = "SPEC",
        default_value = "None"
    )]
    pub functional_groups: FunctionalGroups,

    /// Keep non-rotatable ring substituents (True or False)
    #[arg(
        long = "keep-non-rotor",
        visible_alias = "nr",
        value_name = "BOOL",
        default_value = "False",
        value_parser = parse_flag,
        action = clap::ArgAction::Set
    )]
    pub keep_non_rotor: bool,
}

/// Charge model options shared by all commands.
#[derive(Args)]
#[command(next_help_heading = "Charge Calculation")]
pub struct ChargeOptions {
    /// Partial charge model feeding the bond order calculation
    #[arg(long = "charge", value_name = "METHOD", default_value = "gasteiger")]
    pub method: ChargeMethod,

    /// Convergence tolerance for charge equilibration
    #[arg(long = "qeq-tolerance", value_name = "TOL", default_value = "1e-6")]
    pub tolerance: f64,

    /// Maximum iterations for the QEq solver
    #[arg(long = "qeq-max-iter", value_name = "N", default_value = "100")]
    pub max_iterations: u32,

    /// Orbital screening parameter λ (Rappe–Goddard)
    #[arg(long = "qeq-lambda", value_name = "λ", default_value = "0.5")]
    pub lambda_scale: f64,
}

#[derive(Args)]
pub struct ScoreArgs {
    /// Case identifier; inputs are read from <ROOT>/selected/<NAME>/
    #[arg(short, long, value_name = "NAME")]
    pub name: String,

    /// Directory containing selected/
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Suppress progress output (for scripting)
    #[arg(short, long)]
    pub quiet: bool,

    #[command(flatten)]
    pub fragment: FragmentOptions,

    #[command(flatten)]
    pub charge: ChargeOptions,
}

#[derive(Args)]
pub struct PhenylArgs {
    /// Directory containing phenyls.smi and the three pyridine sets
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub input_dir: PathBuf,

    /// Directory receiving the figures and the distribution table
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Suppress progress output (for scripting)
    #[arg(short, long)]
    pub quiet: bool,

    #[command(flatten)]
    pub charge: ChargeOptions,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum ChargeMethod {
    /// Gasteiger–Marsili electronegativity equalization
    #[default]
    Gasteiger,
    /// Charge equilibration on a 3D embedding
    Qeq,
    /// No charges
    None,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn score_defaults() {
        let cli = Cli::try_parse_from(["fbench", "score", "-n", "case1"]).unwrap();
        let Command::Score(args) = cli.command else {
            panic!("expected score");
        };
        assert_eq!(args.name, "case1");
        assert_eq!(args.fragment.threshold, 0.03);
        assert_eq!(args.fragment.heuristic, Heuristic::PathLength);
        assert_eq!(args.fragment.functional_groups, FunctionalGroups::Default);
        assert!(!args.fragment.keep_non_rotor);
        assert!(matches!(args.charge.method, ChargeMethod::Gasteiger));
    }

    #[test]
    fn score_sentinels() {
        let cli = Cli::try_parse_from([
            "fbench", "s", "-n", "case1", "-t", "0.01", "-p", "wbo", "-f", "False", "--nr",
            "True",
        ])
        .unwrap();
        let Command::Score(args) = cli.command else {
            panic!("expected score");
        };
        assert_eq!(args.fragment.heuristic, Heuristic::Wbo);
        assert_eq!(args.fragment.functional_groups, FunctionalGroups::Disabled);
        assert!(args.fragment.keep_non_rotor);
    }

    #[test]
    fn name_is_required() {
        assert!(Cli::try_parse_from(["fbench", "score"]).is_err());
    }

    #[test]
    fn bad_flag_is_rejected() {
        assert!(
            Cli::try_parse_from(["fbench", "score", "-n", "x", "--keep-non-rotor", "maybe"])
                .is_err()
        );
    }

    #[test]
    fn phenyl_directories() {
        let cli = Cli::try_parse_from([
            "fbench",
            "phenyl",
            "--input-dir",
            "sets",
            "--charge",
            "none",
            "-q",
        ])
        .unwrap();
        let Command::Phenyl(args) = cli.command else {
            panic!("expected phenyl");
        };
        assert_eq!(args.input_dir, PathBuf::from("sets"));
        assert_eq!(args.output_dir, PathBuf::from("."));
        assert!(args.quiet);
        assert!(matches!(args.charge.method, ChargeMethod::None));
    }
}
