//! Inputs and outputs of the phenyl benchmark.

use std::path::{Path, PathBuf};

use log::info;
use serde_json::Value;

use super::figure::write_figure;
use super::{Error, smi, write_json};
use crate::model::molecule::Molecule;

/// Input sets, read in this order.
pub const INPUT_FILES: [&str; 4] = [
    "phenyls.smi",
    "pyridine_ortho.smi",
    "pyridine_meta.smi",
    "pyridine_para.smi",
];

/// Stem of the density plot; written as `.pdf` with an `.svg` copy.
pub const DENSITY_PLOT_STEM: &str = "phenyl_set_wbo_dist";
pub const DISTRIBUTIONS_FILE: &str = "phenyl_set_wbo_dist.json";

/// Reads every input set of `dir`; each file is required.
pub fn read_benchmark_set(dir: &Path) -> Result<Vec<Molecule>, Error> {
    let mut molecules = Vec::new();
    for name in INPUT_FILES {
        let path = dir.join(name);
        let set = smi::read_file(&path)?;
        info!("read {} molecules from {}", set.len(), path.display());
        molecules.extend(set);
    }
    Ok(molecules)
}

fn depiction_stem(group: &str) -> String {
    format!("{group}_2")
}

/// `<group>_2.pdf`.
pub fn depiction_path(dir: &Path, group: &str) -> PathBuf {
    dir.join(format!("{}.pdf", depiction_stem(group)))
}

pub fn density_plot_path(dir: &Path) -> PathBuf {
    dir.join(format!("{DENSITY_PLOT_STEM}.pdf"))
}

/// Writes the depiction grid of `group`; returns the PDF path.
pub fn write_depiction(dir: &Path, group: &str, svg: &str) -> Result<PathBuf, Error> {
    write_figure(dir, &depiction_stem(group), svg)
}

/// Writes the stacked density plot; returns the PDF path.
pub fn write_density_plot(dir: &Path, svg: &str) -> Result<PathBuf, Error> {
    write_figure(dir, DENSITY_PLOT_STEM, svg)
}

pub fn write_distributions(dir: &Path, distributions: &Value) -> Result<PathBuf, Error> {
    let path = dir.join(DISTRIBUTIONS_FILE);
    write_json(&path, distributions)?;
    Ok(path)
}
