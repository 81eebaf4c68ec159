use std::io::{self, Write};

use fragbench::io::case::CaseInput;
use fragbench::{GroupAnalysis, ScoreReport};

use crate::util::text::truncate;

const INDENT: &str = "      ";

const BOX_INNER_WIDTH: usize = 62;
const SAFE_TABLE_WIDTH: usize = BOX_INNER_WIDTH - INDENT.len();

pub fn print_case_summary(case: &CaseInput) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let rows = vec![
        ("Heavy Atoms", format!("{}", case.parent.atom_count())),
        ("Bonds", format!("{}", case.parent.bond_count())),
        ("Selected Bonds", format!("{}", case.selected.len())),
        ("Scored Bonds", format!("{}", case.scores.len())),
        ("Rescored Bonds", format!("{}", case.rescores.len())),
    ];

    print_kv_table(&mut out, "Case Summary", &rows);
}

pub fn print_score_rows(report: &ScoreReport) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let bond_w = 10usize;
    let heavy_w = 5usize;
    let score_w = 8usize;
    let norm_w = 6usize;
    let sep_overhead = 13;
    let rescore_w =
        SAFE_TABLE_WIDTH.saturating_sub(bond_w + heavy_w + score_w + norm_w + sep_overhead);

    let rule = |left: &str, mid: &str, right: &str| {
        format!(
            "{INDENT}{left}{}{mid}{}{mid}{}{mid}{}{mid}{}{right}",
            "─".repeat(bond_w + 2),
            "─".repeat(heavy_w + 2),
            "─".repeat(score_w + 2),
            "─".repeat(norm_w + 2),
            "─".repeat(rescore_w + 2),
        )
    };

    let _ = writeln!(out, "{}┌─ Fragment Scores ─┐", INDENT);
    let _ = writeln!(out, "{}", rule("┌", "┬", "┐"));
    let _ = writeln!(
        out,
        "{}│ {:<bond_w$} │ {:>heavy_w$} │ {:>score_w$} │ {:>norm_w$} │ {:>rescore_w$} │",
        INDENT, "Bond", "Heavy", "MMD", "Norm", "Rescore"
    );
    let _ = writeln!(out, "{}", rule("├", "┼", "┤"));

    for (key, row) in &report.rows {
        let rescore = row
            .rescore
            .map(|s| format!("{:.4}", s.raw))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{}│ {:<bond_w$} │ {:>heavy_w$} │ {:>score_w$.4} │ {:>norm_w$.3} │ {:>rescore_w$} │",
            INDENT,
            truncate(key, bond_w),
            row.heavy_atoms,
            row.score.raw,
            row.score.normalized,
            truncate(&rescore, rescore_w),
        );
    }

    for key in report.failures.keys() {
        let _ = writeln!(
            out,
            "{}│ {:<bond_w$} │ {:>heavy_w$} │ {:>score_w$} │ {:>norm_w$} │ {:>rescore_w$} │",
            INDENT,
            truncate(key, bond_w),
            "-",
            "no match",
            "-",
            "-",
        );
    }

    let _ = writeln!(out, "{}", rule("└", "┴", "┘"));
}

pub fn print_group_summary(analyses: &[GroupAnalysis]) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let name_w = 20usize;
    let count_w = 5usize;
    let sep_overhead = 8;
    let range_w = SAFE_TABLE_WIDTH.saturating_sub(name_w + 2 * count_w + sep_overhead);

    let rule = |left: &str, mid: &str, right: &str| {
        format!(
            "{INDENT}{left}{}{mid}{}{mid}{}{mid}{}{right}",
            "─".repeat(name_w + 2),
            "─".repeat(count_w + 2),
            "─".repeat(count_w + 2),
            "─".repeat(range_w + 2),
        )
    };

    let _ = writeln!(out, "{}┌─ Substituent Bond Orders ─┐", INDENT);
    let _ = writeln!(out, "{}", rule("┌", "┬", "┐"));
    let _ = writeln!(
        out,
        "{}│ {:<name_w$} │ {:>count_w$} │ {:>count_w$} │ {:<range_w$} │",
        INDENT, "Group", "WBOs", "Shown", "Range"
    );
    let _ = writeln!(out, "{}", rule("├", "┼", "┤"));

    for analysis in analyses {
        let values = analysis.bond_orders();
        let range = match (values.first(), values.last()) {
            (Some(lo), Some(hi)) => format!("{:.3} – {:.3}", lo, hi),
            _ => "-".to_string(),
        };
        let _ = writeln!(
            out,
            "{}│ {:<name_w$} │ {:>count_w$} │ {:>count_w$} │ {:<range_w$} │",
            INDENT,
            truncate(analysis.name(), name_w),
            values.len(),
            analysis.depictions.len(),
            range,
        );
    }

    let _ = writeln!(out, "{}", rule("└", "┴", "┘"));
}

fn print_kv_table(out: &mut impl Write, title: &str, rows: &[(&str, String)]) {
    let key_w = 16usize;
    let sep_overhead = 6;
    let val_w = SAFE_TABLE_WIDTH.saturating_sub(key_w + sep_overhead);

    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(
        out,
        "{}┌{}┬{}┐",
        INDENT,
        "─".repeat(key_w + 2),
        "─".repeat(val_w + 2)
    );

    for (key, value) in rows {
        let _ = writeln!(
            out,
            "{}│ {:<key_w$} │ {:>val_w$} │",
            INDENT,
            truncate(key, key_w),
            truncate(value, val_w),
        );
    }

    let _ = writeln!(
        out,
        "{}└{}┴{}┘",
        INDENT,
        "─".repeat(key_w + 2),
        "─".repeat(val_w + 2)
    );
}
