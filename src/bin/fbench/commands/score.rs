use anyhow::{Context, Result};

use fragbench::fragment::FragmenterConfig;
use fragbench::io::case::{CaseLayout, WrittenFiles};
use fragbench::score::{ScoreReport, run_scoring, unscored_bonds};

use crate::cli::ScoreArgs;
use crate::config::{build_fragmenter_config, charge_display_name};
use crate::display::{Context as DisplayContext, Progress, print_case_summary, print_score_rows};
use crate::util::text::file_label;

const TOTAL_STEPS: u8 = 3;

pub fn run_score(args: ScoreArgs, ctx: DisplayContext) -> Result<()> {
    let layout = CaseLayout::new(&args.root, args.name.clone());
    let config = build_fragmenter_config(&args);

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS, "Scoring complete");

    progress.step("Reading case");
    let case = layout
        .load()
        .with_context(|| format!("Failed to load case '{}'", layout.name()))?;

    let unscored = unscored_bonds(&case.selected, &case.scores);

    let mut read_substeps = vec![
        format!("Parse {}", file_label(&layout.selected_bonds_path())),
        format!("Parse {}", file_label(&layout.scores_path())),
        format!("Parse rescore/{}", file_label(&layout.rescores_path())),
    ];
    if !unscored.is_empty() {
        read_substeps.push(format!("{} selected bond(s) without scores", unscored.len()));
    }
    progress.complete_step("Reading case", &read_substeps);

    if ctx.interactive {
        print_case_summary(&case);
    }

    progress.step("Fragmenting scored bonds");
    let report = run_scoring(
        &case.parent,
        &case.selected,
        &case.scores,
        &case.rescores,
        config.clone(),
        |key| progress.detail(key),
    )
    .with_context(|| format!("Failed to score case '{}'", layout.name()))?;

    let score_substeps = build_score_substeps(&config, &report);
    progress.complete_step("Fragmenting scored bonds", &score_substeps);

    progress.step("Writing results");
    let written = layout
        .write_report(&config, &report)
        .context("Failed to write score report")?;
    progress.complete_step("Writing results", &build_write_substeps(&written));

    if ctx.interactive && !report.is_empty() {
        print_score_rows(&report);
    }

    progress.finish();

    Ok(())
}

fn build_score_substeps(config: &FragmenterConfig, report: &ScoreReport) -> Vec<String> {
    vec![
        format!(
            "Annotate parent ({} charges, Wiberg bond orders)",
            charge_display_name(&config.charge_method)
        ),
        format!(
            "Grow fragments (threshold {}, {} heuristic)",
            config.threshold, config.heuristic
        ),
        format!(
            "{} scored, {} without a matching fragment",
            report.rows.len(),
            report.failures.len()
        ),
    ]
}

fn build_write_substeps(written: &WrittenFiles) -> Vec<String> {
    let mut steps: Vec<String> = [
        ("Write scores", written.results.as_deref()),
        ("Write failures", written.failures.as_deref()),
    ]
    .into_iter()
    .filter_map(|(label, path)| {
        path.map(|p| format!("{} → {}", label, file_label(p)))
    })
    .collect();

    if steps.is_empty() {
        steps.push("Nothing to write".to_string());
    }
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use fragbench::score::BondOutcome;
    use std::path::PathBuf;

    #[test]
    fn write_substeps_name_only_written_files() {
        let written = WrittenFiles {
            results: Some(PathBuf::from("/tmp/case/case_0.03_path_length_None_False_score_2.json")),
            failures: None,
        };
        assert_eq!(
            build_write_substeps(&written),
            vec!["Write scores → case_0.03_path_length_None_False_score_2.json"]
        );
        assert_eq!(
            build_write_substeps(&WrittenFiles::default()),
            vec!["Nothing to write"]
        );
    }

    #[test]
    fn score_substeps_count_outcomes() {
        let mut report = ScoreReport::new();
        report.record(
            "(1, 2)",
            BondOutcome::Failed {
                identity: "CC".to_string(),
            },
        );
        let steps = build_score_substeps(&FragmenterConfig::default(), &report);
        assert_eq!(steps[2], "0 scored, 1 without a matching fragment");
        assert!(steps[1].contains("path_length"));
    }
}
