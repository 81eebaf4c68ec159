//! SVG figures: per-group depiction grids and the stacked density plot.
//!
//! Figures are rendered into strings; writing them out is left to the caller.

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::error::Error;
use super::kde::GaussianKde;
use super::palette::{GroupColor, HIGHLIGHT_ALPHA};
use super::vis::{Depiction, DepictionSet};
use crate::chem::layout_2d;
use crate::model::atom::Atom;
use crate::model::types::{BondOrder, Element};

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;
type DrawResult = Result<(), DrawingAreaErrorKind<std::io::Error>>;

/// Horizontal extent of the density plot.
pub const BOND_ORDER_RANGE: (f64, f64) = (0.75, 1.8);

const CELL_SIZE: (u32, u32) = (320, 280);
const GRID_COLUMNS: usize = 4;
const TITLE_BAND: i32 = 36;
const MAX_BOND_PX: f64 = 42.0;
const LINE_GAP: f64 = 4.0;

const PANEL_SIZE: (u32, u32) = (640, 48);
const AXIS_BAND: u32 = 48;
const LABEL_WIDTH: u32 = 120;
const KDE_SAMPLES: usize = 200;

/// One row of the density plot.
#[derive(Debug, Clone)]
pub struct DensityPanel<'a> {
    pub group: &'a str,
    pub values: &'a [f64],
    pub color: GroupColor,
}

/// Renders every depiction of `set` into one SVG grid.
pub fn render_depictions(set: &DepictionSet, color: GroupColor) -> Result<String, Error> {
    let layouts = set
        .depictions
        .iter()
        .map(|d| layout_2d(&d.molecule))
        .collect::<Result<Vec<_>, _>>()?;

    let cols = GRID_COLUMNS.min(set.len()).max(1);
    let rows = set.len().div_ceil(cols).max(1);
    let size = (CELL_SIZE.0 * cols as u32, CELL_SIZE.1 * rows as u32);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        draw_grid(&root, set, &layouts, color, (rows, cols))
            .map_err(|e| Error::render(format!("{} depictions", set.group), e))?;
    }
    Ok(svg)
}

fn draw_grid(
    root: &Area<'_>,
    set: &DepictionSet,
    layouts: &[Vec<[f64; 2]>],
    color: GroupColor,
    grid: (usize, usize),
) -> DrawResult {
    root.fill(&WHITE)?;
    let cells = root.split_evenly(grid);
    for ((cell, depiction), coords) in cells.iter().zip(&set.depictions).zip(layouts) {
        draw_molecule(cell, depiction, coords, color)?;
    }
    root.present()?;
    Ok(())
}

fn draw_molecule(
    cell: &Area<'_>,
    depiction: &Depiction,
    coords: &[[f64; 2]],
    color: GroupColor,
) -> DrawResult {
    let mol = &depiction.molecule;
    let (w, h) = cell.dim_in_pixel();
    let (w, h) = (f64::from(w), f64::from(h) - f64::from(TITLE_BAND));

    let (min_x, max_x, min_y, max_y) = coords.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
        |(a, b, c, d), p| (a.min(p[0]), b.max(p[0]), c.min(p[1]), d.max(p[1])),
    );
    let margin = 30.0;
    let scale = ((w - 2.0 * margin) / (max_x - min_x).max(1e-6))
        .min((h - 2.0 * margin) / (max_y - min_y).max(1e-6))
        .min(MAX_BOND_PX);
    let (mid_x, mid_y) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
    let px = |p: [f64; 2]| -> (f64, f64) {
        (w / 2.0 + (p[0] - mid_x) * scale, h / 2.0 - (p[1] - mid_y) * scale)
    };
    let to_i32 = |(x, y): (f64, f64)| (x.round() as i32, y.round() as i32);

    let marked = &mol.bonds[depiction.marked_bond];
    let (a, b) = (px(coords[marked.i]), px(coords[marked.j]));
    cell.draw(&PathElement::new(
        vec![to_i32(a), to_i32(b)],
        color.with_alpha(HIGHLIGHT_ALPHA).stroke_width(10),
    ))?;

    for bond in &mol.bonds {
        let (a, b) = (px(coords[bond.i]), px(coords[bond.j]));
        for (offset, style) in bond_strokes(bond.order) {
            let (dx, dy) = perpendicular(a, b, offset);
            cell.draw(&PathElement::new(
                vec![to_i32((a.0 + dx, a.1 + dy)), to_i32((b.0 + dx, b.1 + dy))],
                style,
            ))?;
        }
    }

    let font = ("sans-serif", 15)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    for (idx, (atom, &p)) in mol.atoms.iter().zip(coords).enumerate() {
        let Some(label) = atom_label(atom, mol.degree(idx) > 0) else {
            continue;
        };
        let center = to_i32(px(p));
        cell.draw(&Circle::new(center, 10, WHITE.filled()))?;
        cell.draw(&Text::new(label, center, font.clone()))?;
    }

    let mid = to_i32(((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0 - 16.0));
    cell.draw(&Text::new(
        format!("{:.2}", depiction.wbo),
        mid,
        ("sans-serif", 14)
            .into_font()
            .color(&color.rgb())
            .pos(Pos::new(HPos::Center, VPos::Center)),
    ))?;

    cell.draw(&Text::new(
        depiction.title.clone(),
        ((w / 2.0) as i32, h as i32 + TITLE_BAND / 2),
        ("sans-serif", 12)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center)),
    ))?;
    Ok(())
}

/// Perpendicular offset of `len` pixels for the segment `a`-`b`.
fn perpendicular(a: (f64, f64), b: (f64, f64), len: f64) -> (f64, f64) {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let norm = (dx * dx + dy * dy).sqrt();
    if norm < 1e-9 || len == 0.0 {
        return (0.0, 0.0);
    }
    (-dy / norm * len, dx / norm * len)
}

fn bond_strokes(order: BondOrder) -> Vec<(f64, ShapeStyle)> {
    let solid = || BLACK.stroke_width(2);
    match order {
        BondOrder::Single => vec![(0.0, solid())],
        BondOrder::Double => vec![(-LINE_GAP / 2.0, solid()), (LINE_GAP / 2.0, solid())],
        BondOrder::Triple => vec![(-LINE_GAP, solid()), (0.0, solid()), (LINE_GAP, solid())],
        BondOrder::Aromatic => vec![(0.0, solid()), (LINE_GAP, BLACK.mix(0.45).stroke_width(1))],
    }
}

/// Element symbol with hydrogens and charge; plain carbons are unlabeled.
fn atom_label(atom: &Atom, bonded: bool) -> Option<String> {
    if atom.element == Element::C && atom.formal_charge == 0 && bonded {
        return None;
    }
    let mut label = atom.element.symbol().to_string();
    match atom.implicit_hydrogens {
        0 => {}
        1 => label.push('H'),
        n => label.push_str(&format!("H{n}")),
    }
    match atom.formal_charge {
        0 => {}
        1 => label.push('+'),
        -1 => label.push('-'),
        q if q > 0 => label.push_str(&format!("{q}+")),
        q => label.push_str(&format!("{}-", -q)),
    }
    Some(label)
}

/// Renders the stacked density plot, one panel per entry of `panels`.
///
/// Panels with fewer than two distinct values carry only their label.
pub fn render_density_plot(panels: &[DensityPanel<'_>]) -> Result<String, Error> {
    let n = panels.len().max(1) as u32;
    let size = (PANEL_SIZE.0, PANEL_SIZE.1 * n + AXIS_BAND);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        draw_density_panels(&root, panels)
            .map_err(|e| Error::render("bond order distributions", e))?;
    }
    Ok(svg)
}

fn draw_density_panels(root: &Area<'_>, panels: &[DensityPanel<'_>]) -> DrawResult {
    root.fill(&WHITE)?;
    let Some((last, rest)) = panels.split_last() else {
        root.present()?;
        return Ok(());
    };

    if rest.is_empty() {
        draw_density_panel(root, last, true)?;
    } else {
        let (upper, bottom) = root.split_vertically(PANEL_SIZE.1 * rest.len() as u32);
        for (area, panel) in upper.split_evenly((rest.len(), 1)).iter().zip(rest) {
            draw_density_panel(area, panel, false)?;
        }
        draw_density_panel(&bottom, last, true)?;
    }
    root.present()?;
    Ok(())
}

fn draw_density_panel(area: &Area<'_>, panel: &DensityPanel<'_>, axis: bool) -> DrawResult {
    let (lo, hi) = BOND_ORDER_RANGE;
    let curve = GaussianKde::new(panel.values).map(|kde| kde.curve(lo, hi, KDE_SAMPLES));
    let y_max = curve
        .iter()
        .flatten()
        .map(|&(_, y)| y)
        .fold(0.0f64, f64::max)
        .max(1e-6)
        * 1.05;

    let mut chart = ChartBuilder::on(area)
        .margin_left(LABEL_WIDTH)
        .margin_right(16)
        .x_label_area_size(if axis { AXIS_BAND } else { 0 })
        .build_cartesian_2d(lo..hi, 0.0..y_max)?;

    if axis {
        chart
            .configure_mesh()
            .disable_mesh()
            .disable_y_axis()
            .x_labels(8)
            .x_desc("Bond order")
            .draw()?;
    }

    if let Some(curve) = curve {
        chart.draw_series(
            AreaSeries::new(curve.iter().copied(), 0.0, panel.color.rgb().mix(0.8).filled())
                .border_style(BLACK.stroke_width(1)),
        )?;
    }

    let (_, height) = area.dim_in_pixel();
    let baseline = height as i32 - if axis { AXIS_BAND as i32 } else { 0 } - 2;
    area.draw(&Text::new(
        panel.group.to_string(),
        (8, baseline),
        ("sans-serif", 12)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Left, VPos::Bottom)),
    ))?;
    Ok(())
}
