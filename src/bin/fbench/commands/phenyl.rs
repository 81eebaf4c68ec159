use anyhow::{Context, Result};

use fragbench::io::phenyl::{
    INPUT_FILES, read_benchmark_set, write_density_plot, write_depiction, write_distributions,
};
use fragbench::phenyl::{GroupAnalysis, analyze_all, distributions_json, render_summary};

use crate::cli::PhenylArgs;
use crate::config::{build_charge_method, charge_display_name};
use crate::display::{Context as DisplayContext, Progress, print_group_summary};
use crate::util::text::file_label;

const TOTAL_STEPS: u8 = 4;

pub fn run_phenyl(args: PhenylArgs, ctx: DisplayContext) -> Result<()> {
    let method = build_charge_method(&args.charge);
    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS, "Benchmark complete");

    progress.step("Reading benchmark sets");
    let molecules = read_benchmark_set(&args.input_dir).with_context(|| {
        format!(
            "Failed to read the benchmark set from {}",
            args.input_dir.display()
        )
    })?;

    let mut read_substeps: Vec<String> = INPUT_FILES
        .iter()
        .map(|name| format!("Parse {}", name))
        .collect();
    read_substeps.push(format!("{} molecules", molecules.len()));
    progress.complete_step("Reading benchmark sets", &read_substeps);

    progress.step("Computing substituent bond orders");
    let analyses =
        analyze_all(&molecules, &method).context("Failed to compute substituent bond orders")?;
    progress.complete_step(
        "Computing substituent bond orders",
        &build_analysis_substeps(&analyses, charge_display_name(&method)),
    );

    progress.step("Rendering figures");
    let mut render_substeps = Vec::new();
    for analysis in &analyses {
        progress.detail(analysis.name());
        let Some(svg) = analysis
            .render_depictions()
            .with_context(|| format!("Failed to depict {}", analysis.name()))?
        else {
            continue;
        };
        let path = write_depiction(&args.output_dir, analysis.name(), &svg)
            .with_context(|| format!("Failed to write the {} depictions", analysis.name()))?;
        render_substeps.push(format!("Depict {} → {}", analysis.name(), file_label(&path)));
    }

    let summary = render_summary(&analyses).context("Failed to render the density plot")?;
    let path = write_density_plot(&args.output_dir, &summary)
        .context("Failed to write the density plot")?;
    render_substeps.push(format!("Density plot → {}", file_label(&path)));
    progress.complete_step("Rendering figures", &render_substeps);

    progress.step("Writing distributions");
    let path = write_distributions(&args.output_dir, &distributions_json(&analyses))
        .context("Failed to write the distribution table")?;
    progress.complete_step(
        "Writing distributions",
        &[format!("Write JSON → {}", file_label(&path))],
    );

    if ctx.interactive {
        print_group_summary(&analyses);
    }

    progress.finish();

    Ok(())
}

fn build_analysis_substeps(analyses: &[GroupAnalysis], charges: &str) -> Vec<String> {
    let populated = analyses
        .iter()
        .filter(|a| !a.distribution.is_empty())
        .count();
    let excluded: usize = analyses.iter().map(|a| a.depictions.excluded.len()).sum();

    let mut steps = vec![
        format!("Annotate molecules ({} charges, Wiberg bond orders)", charges),
        format!("{} of {} substituents present", populated, analyses.len()),
    ];
    if excluded > 0 {
        steps.push(format!(
            "{} representative(s) skipped for an ortho ring nitrogen",
            excluded
        ));
    }
    steps
}
