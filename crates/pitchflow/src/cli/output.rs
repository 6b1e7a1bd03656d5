//! Output formatting utilities for CLI commands

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Color, ContentArrangement, Table};
use pitchflow_pipeline::TeamAverages;
use pitchflow_schema::FieldDescriptor;
use serde::Serialize;

/// Print a table with column headers
pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let header_cells: Vec<Cell> = headers
        .iter()
        .map(|h| Cell::new(h).fg(Color::Cyan))
        .collect();
    table.set_header(header_cells);

    for row in rows {
        table.add_row(row);
    }

    println!("{}", table);
}

/// Pretty-print any serializable value as JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Format an optional average, `-` when there were no values.
pub fn format_average(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "-".to_string())
}

pub fn schema_rows(schema: &[FieldDescriptor]) -> Vec<Vec<String>> {
    schema
        .iter()
        .map(|field| {
            vec![
                field.name.clone(),
                field.field_type.to_string(),
                field.mode.to_string(),
                field.description.clone(),
            ]
        })
        .collect()
}

pub fn print_averages(averages: &[TeamAverages]) {
    if averages.is_empty() {
        println!("(no teams)");
        return;
    }
    let rows = averages
        .iter()
        .map(|row| {
            vec![
                row.team_name.clone().unwrap_or_else(|| "(no name)".to_string()),
                format_average(row.avg_wins),
                format_average(row.avg_draws),
                format_average(row.avg_losses),
            ]
        })
        .collect();
    print_table(&["Team", "Avg wins", "Avg draws", "Avg losses"], rows);
}
