use serde::Serialize;
use std::fmt::Write as _;
use weather_core::{WeatherRecord, WeatherSummary, WeatherTable, model::TABLE_COLUMNS};

#[derive(Debug, Serialize)]
struct Report<'a> {
    location: &'a str,
    summary: &'a WeatherSummary,
    records: &'a [WeatherRecord],
}

pub fn render_json(table: &WeatherTable, summary: &WeatherSummary) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&Report {
        location: table.location(),
        summary,
        records: table.records(),
    })
}

/// Summary lines, a blank line, then the table with left-aligned columns.
pub fn render_report(table: &WeatherTable, summary: &WeatherSummary) -> String {
    let rows: Vec<[String; 6]> = table.iter().map(WeatherRecord::cells).collect();

    let mut widths = TABLE_COLUMNS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "Weather for {}", table.location());
    for line in summary.lines() {
        let _ = writeln!(out, "{line}");
    }
    out.push('\n');

    push_row(&mut out, TABLE_COLUMNS.iter().copied(), &widths);
    for row in &rows {
        push_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize; 6]) {
    let line = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(out, "{}", line.trim_end());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture_table;

    #[test]
    fn report_lists_summary_then_rows() {
        let table = fixture_table();
        let summary = WeatherSummary::from_table(&table).unwrap();
        let report = render_report(&table, &summary);
        let lines: Vec<_> = report.lines().collect();

        assert_eq!(lines[0], "Weather for Washington,DC,USA");
        assert!(lines[1].starts_with("Maximum Temperature: "));
        assert!(lines[6].starts_with("Date"));
        assert!(lines[6].contains("Precipitation (inches)"));
        assert_eq!(lines.len(), 7 + table.len());
        assert!(lines[7].starts_with("03-03-2024"));
    }

    #[test]
    fn json_report_carries_location_summary_and_records() {
        let table = fixture_table();
        let summary = WeatherSummary::from_table(&table).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&render_json(&table, &summary).unwrap()).unwrap();

        assert_eq!(json["location"], "Washington,DC,USA");
        assert_eq!(json["records"].as_array().unwrap().len(), 7);
        assert_eq!(json["records"][0]["date"], "2024-03-03");
        assert_eq!(json["summary"]["max_precipitation"]["value"], 1.12);
    }
}
