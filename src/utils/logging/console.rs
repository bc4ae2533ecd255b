//! Console output utilities
//!
//! Renders reports as aligned plain-text tables.

use itertools::Itertools;

use crate::algorithm::reports::SuiteOutput;
use crate::algorithm::reports::correlation::CorrelationRow;
use crate::models::summary::Report;

const NULL_CELL: &str = "-";

fn format_value(value: Option<f64>) -> String {
    value.map_or_else(|| NULL_CELL.to_string(), |v| format!("{v:.2}"))
}

fn render_grid(title: &str, header: &[String], body: &[Vec<String>]) -> String {
    let widths: Vec<usize> = (0..header.len())
        .map(|col| {
            body.iter()
                .map(|row| row[col].len())
                .chain(std::iter::once(header[col].len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, width))| {
                if i == 0 {
                    format!("{cell:<width$}")
                } else {
                    format!("{cell:>width$}")
                }
            })
            .join("  ")
    };

    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    out.push_str(&line(header));
    out.push('\n');
    out.push_str(&widths.iter().map(|w| "-".repeat(*w)).join("  "));
    out.push('\n');
    for row in body {
        out.push_str(&line(row));
        out.push('\n');
    }
    out
}

/// Render one report as a table
#[must_use]
pub fn render_report(report: &Report) -> String {
    let title = format!("{} (n = {})", report.name, report.total_records);
    if report.rows.is_empty() {
        return format!("{title}\n  (no rows)\n");
    }

    let header: Vec<String> = ["label", "count"]
        .into_iter()
        .chain(report.metric_names())
        .map(str::to_string)
        .collect();
    let body: Vec<Vec<String>> = report
        .rows
        .iter()
        .map(|row| {
            [row.label.clone(), row.count.to_string()]
                .into_iter()
                .chain(row.metrics.iter().map(|m| format_value(m.value)))
                .collect()
        })
        .collect();
    render_grid(&title, &header, &body)
}

/// Render correlation rows as a table
#[must_use]
pub fn render_correlations(title: &str, rows: &[CorrelationRow]) -> String {
    let header: Vec<String> = ["x", "y", "pairs", "r"].iter().map(|s| s.to_string()).collect();
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.x.to_string(),
                row.y.to_string(),
                row.pairs.to_string(),
                row.r.map_or_else(|| NULL_CELL.to_string(), |r| format!("{r:.3}")),
            ]
        })
        .collect();
    render_grid(title, &header, &body)
}

/// Render every report of a suite run, separated by blank lines
#[must_use]
pub fn render_suite(output: &SuiteOutput) -> String {
    let mut sections: Vec<String> = output.reports.iter().map(render_report).collect();
    if let Some(correlations) = &output.correlations {
        sections.push(render_correlations(&correlations.name, &correlations.rows));
    }
    sections.join("\n")
}
