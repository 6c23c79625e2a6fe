//! Report rendering
//!
//! The engine produces plain data; this module turns a snapshot into the
//! two shapes the CLI serves: a human-facing table and JSON.

use crate::report::types::ReportSnapshot;

const HEADERS: [&str; 8] = [
    "RELEASE",
    "DEVELOP",
    "RELEASED",
    "FIRST GOLANG",
    "FIRST RELEASE",
    "TAS",
    "TASW",
    "IST",
];

pub fn render_json(snapshot: &ReportSnapshot) -> serde_json::Result<String> {
    serde_json::to_string_pretty(snapshot)
}

/// Render the snapshot as an aligned text table, one row per release.
/// Fully bumped rows are marked with a trailing check.
pub fn render_table(snapshot: &ReportSnapshot) -> String {
    let rows: Vec<[String; 8]> = snapshot
        .releases
        .iter()
        .map(|release| {
            [
                release.name.clone(),
                release.version_on_dev.clone(),
                release.released_version.clone(),
                release.first_released_golang_version.clone(),
                release.first_released_release_version.clone(),
                release.bumped_in_tas.to_string(),
                release.bumped_in_tasw.to_string(),
                release.bumped_in_ist.to_string(),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = format!("target golang version: {}\n\n", snapshot.golang_version);
    render_row(&mut out, &widths, HEADERS.map(String::from).iter(), "");
    for (row, release) in rows.iter().zip(&snapshot.releases) {
        let marker = if release.all_bumped { "  ✓" } else { "" };
        render_row(&mut out, &widths, row.iter(), marker);
    }
    out
}

fn render_row<'a>(
    out: &mut String,
    widths: &[usize],
    cells: impl Iterator<Item = &'a String>,
    marker: &str,
) {
    let line = widths
        .iter()
        .zip(cells)
        .map(|(&width, cell)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push_str(marker);
    out.push('\n');
}
