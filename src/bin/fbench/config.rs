use fragbench::chem::{ChargeMethod, QeqConfig, SolverOptions};
use fragbench::fragment::FragmenterConfig;

use crate::cli;

pub fn build_charge_method(opts: &cli::ChargeOptions) -> ChargeMethod {
    match opts.method {
        cli::ChargeMethod::None => ChargeMethod::None,
        cli::ChargeMethod::Gasteiger => ChargeMethod::Gasteiger,
        cli::ChargeMethod::Qeq => ChargeMethod::Qeq(QeqConfig {
            solver_options: build_solver_options(opts),
        }),
    }
}

fn build_solver_options(opts: &cli::ChargeOptions) -> SolverOptions {
    SolverOptions {
        tolerance: opts.tolerance,
        max_iterations: opts.max_iterations,
        lambda_scale: opts.lambda_scale,
        ..QeqConfig::default().solver_options
    }
}

pub fn build_fragmenter_config(args: &cli::ScoreArgs) -> FragmenterConfig {
    FragmenterConfig {
        threshold: args.fragment.threshold,
        heuristic: args.fragment.heuristic,
        functional_groups: args.fragment.functional_groups.clone(),
        keep_non_rotor_ring_substituents: args.fragment.keep_non_rotor,
        charge_method: build_charge_method(&args.charge),
    }
}

pub fn charge_display_name(method: &ChargeMethod) -> &'static str {
    match method {
        ChargeMethod::None => "no charges",
        ChargeMethod::Gasteiger => "Gasteiger–Marsili",
        ChargeMethod::Qeq(_) => "QEq",
    }
}
