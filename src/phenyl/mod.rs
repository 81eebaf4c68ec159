//! Wiberg bond order distributions of substituted phenyl and pyridine rings.
//!
//! For every substituent in [`SUBSTITUENTS`], the benchmark molecules that
//! carry it are charged and annotated, and the bond orders of the bond
//! joining the substituent to the ring are collected into a
//! [`WboDistribution`]. One representative per distinct bond order is
//! prepared for depiction ([`DepictionSet`]), and the distributions of all
//! groups are drawn as a stacked density plot.

mod error;
mod group;
mod kde;
mod palette;
mod record;
mod render;
mod substituents;
mod vis;

pub use error::Error;
pub use group::{
    BondOrderValue, GroupMember, WboDistribution, dedup_by_smiles, group_by_wbo, members,
    substituent_bonds,
};
pub use kde::GaussianKde;
pub use palette::{GroupColor, HIGHLIGHT_ALPHA, group_colors, rainbow_r};
pub use record::{RingRecord, SubstituentSite};
pub use render::{BOND_ORDER_RANGE, DensityPanel, render_density_plot, render_depictions};
pub use substituents::{SUBSTITUENTS, Substituent};
pub use vis::{Depiction, DepictionSet, MARKER_MAPS, has_ortho_nitrogen, mark_bond, prepare};

use log::warn;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::chem::ChargeMethod;
use crate::model::molecule::Molecule;

/// Everything computed for one substituent.
#[derive(Debug, Clone)]
pub struct GroupAnalysis {
    pub substituent: Substituent,
    pub color: GroupColor,
    pub distribution: WboDistribution,
    pub depictions: DepictionSet,
}

#[derive(Serialize)]
struct DistributionRecord<'a> {
    wbo: f64,
    smiles: &'a str,
    title: &'a str,
    site: String,
}

impl GroupAnalysis {
    pub fn name(&self) -> &'static str {
        self.substituent.name
    }

    /// Distinct bond orders, ascending.
    pub fn bond_orders(&self) -> Vec<f64> {
        self.distribution.values()
    }

    /// Depiction grid, or `None` when no representative survived.
    pub fn render_depictions(&self) -> Result<Option<String>, Error> {
        if self.depictions.is_empty() {
            warn!("{}: nothing to depict", self.name());
            return Ok(None);
        }
        render_depictions(&self.depictions, self.color).map(Some)
    }

    /// Every member with the bond order of its substituent bond.
    pub fn records_json(&self) -> Value {
        let records: Vec<DistributionRecord<'_>> = self
            .distribution
            .iter()
            .flat_map(|(wbo, members)| {
                members.iter().map(move |m| DistributionRecord {
                    wbo,
                    smiles: &m.smiles,
                    title: &m.record.title,
                    site: m.site.to_string(),
                })
            })
            .collect();
        serde_json::to_value(records).unwrap_or(Value::Null)
    }
}

/// Groups, annotates and prepares one substituent.
///
/// # Errors
///
/// Propagates charge and bond order failures.
pub fn analyze_group(
    substituent: Substituent,
    color: GroupColor,
    molecules: &[Molecule],
    method: &ChargeMethod,
) -> Result<GroupAnalysis, Error> {
    let distribution = group_by_wbo(substituent.name, molecules, method)?;
    if distribution.is_empty() {
        warn!("no molecules carry {}", substituent.name);
    }
    let depictions = prepare(&distribution);
    Ok(GroupAnalysis {
        substituent,
        color,
        distribution,
        depictions,
    })
}

/// Analyzes every substituent of [`SUBSTITUENTS`], in order.
pub fn analyze_all(
    molecules: &[Molecule],
    method: &ChargeMethod,
) -> Result<Vec<GroupAnalysis>, Error> {
    SUBSTITUENTS
        .iter()
        .zip(group_colors(SUBSTITUENTS.len()))
        .map(|(&substituent, color)| analyze_group(substituent, color, molecules, method))
        .collect()
}

/// Stacked density plot of all analyzed groups.
pub fn render_summary(analyses: &[GroupAnalysis]) -> Result<String, Error> {
    let values: Vec<Vec<f64>> = analyses.iter().map(GroupAnalysis::bond_orders).collect();
    let panels: Vec<DensityPanel<'_>> = analyses
        .iter()
        .zip(&values)
        .map(|(analysis, values)| DensityPanel {
            group: analysis.name(),
            values,
            color: analysis.color,
        })
        .collect();
    render_density_plot(&panels)
}

/// `group → [{wbo, smiles, title, site}]` for every analyzed group.
pub fn distributions_json(analyses: &[GroupAnalysis]) -> Value {
    let map: Map<String, Value> = analyses
        .iter()
        .map(|a| (a.name().to_string(), a.records_json()))
        .collect();
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::figure::svg_to_pdf;
    use crate::smiles::parse_smiles_line;
    use std::path::Path;

    fn benchmark() -> Vec<Molecule> {
        [
            "[NH2:2][c:1]1ccccc1 phenyl_amino",
            "[F:2][c:1]1ccccc1 phenyl_fluoro",
            "[NH2:6][c:2]1[cH:4][c:1]([F:7])[cH:5]cc1 phenyl_amino_fluoro",
            "[NH2:2][c:1]1ccccn1 pyridine_ortho_amino",
        ]
        .iter()
        .map(|l| parse_smiles_line(l).unwrap())
        .collect()
    }

    #[test]
    fn analyzes_every_substituent_in_order() {
        let analyses = analyze_all(&benchmark(), &ChargeMethod::Gasteiger).unwrap();
        assert_eq!(analyses.len(), SUBSTITUENTS.len());
        assert_eq!(analyses[0].name(), "phenoxide");
        assert!(analyses.iter().find(|a| a.name() == "nitro").unwrap().distribution.is_empty());

        let amino = analyses.iter().find(|a| a.name() == "amino").unwrap();
        let total: usize = amino.distribution.iter().map(|(_, m)| m.len()).sum();
        assert_eq!(total, 3);
        let fluoro = analyses.iter().find(|a| a.name() == "fluoro").unwrap();
        assert!(!fluoro.distribution.is_empty());
    }

    #[test]
    fn records_list_every_member() {
        let analysis = analyze_group(
            SUBSTITUENTS[3],
            rainbow_r(0.1),
            &benchmark(),
            &ChargeMethod::Gasteiger,
        )
        .unwrap();
        let records = analysis.records_json();
        let records = records.as_array().unwrap();
        assert_eq!(records.len(), 3);
        assert!(records.iter().any(|r| r["site"] == "R2"));
        assert!(records.iter().all(|r| r["wbo"].as_f64().is_some()));
    }

    #[test]
    fn empty_group_renders_no_depiction() {
        let analysis = analyze_group(
            SUBSTITUENTS[25],
            rainbow_r(1.0),
            &benchmark(),
            &ChargeMethod::Gasteiger,
        )
        .unwrap();
        assert!(analysis.render_depictions().unwrap().is_none());
    }

    #[test]
    fn summary_and_json_cover_all_groups() {
        let analyses = analyze_all(&benchmark(), &ChargeMethod::None).unwrap();
        let svg = render_summary(&analyses).unwrap();
        assert!(svg.contains("trimethylamonium"));
        let json = distributions_json(&analyses);
        assert_eq!(json.as_object().unwrap().len(), SUBSTITUENTS.len());
    }

    #[test]
    fn rendered_figures_convert_to_pdf() {
        let analyses = analyze_all(&benchmark(), &ChargeMethod::None).unwrap();
        let summary = render_summary(&analyses).unwrap();
        let pdf = svg_to_pdf(&summary, Path::new("phenyl_set_wbo_dist.pdf")).unwrap();
        assert!(pdf.starts_with(b"%PDF"));

        let amino = analyses.iter().find(|a| a.name() == "amino").unwrap();
        let grid = amino.render_depictions().unwrap().unwrap();
        let pdf = svg_to_pdf(&grid, Path::new("amino_2.pdf")).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }
}
