use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use car_model::ConfidenceLevel;
use car_report::{PlotSpec, color};

use crate::commands::{RenderReport, StoneListing};

/// Stones table on stdout, load errors on stderr.
pub fn print_stones(listing: &StoneListing) {
    if listing.is_empty() {
        println!("No result files found.");
        return;
    }
    println!("{}", stones_table(listing));

    let failures: Vec<_> = listing
        .iter()
        .filter_map(|(_, outcome)| outcome.as_ref().err())
        .collect();
    if !failures.is_empty() {
        eprintln!("Errors:");
        for error in failures {
            eprintln!("- {error}");
        }
    }
}

pub fn stones_table(listing: &StoneListing) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Stone"),
        header_cell("Name"),
        header_cell("CaR levels"),
        header_cell("N"),
        header_cell("Horizon"),
        header_cell("Composition"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 6, CellAlignment::Center);

    for (stone, outcome) in listing {
        let stone_cell = Cell::new(stone)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold);
        match outcome {
            Ok(record) => table.add_row(vec![
                stone_cell,
                Cell::new(record.name()),
                Cell::new(level_list(&record.levels())),
                Cell::new(record.samples()),
                Cell::new(format!("{} {}", record.horizon(), record.time_unit())),
                Cell::new(record.composition().describe()),
                Cell::new("ok").fg(Color::Green),
            ]),
            Err(_) => table.add_row(vec![
                stone_cell,
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
                Cell::new("error")
                    .fg(Color::Red)
                    .add_attribute(Attribute::Bold),
            ]),
        };
    }
    table
}

/// Render outcome on stderr; stdout may carry the plot itself.
pub fn print_render_summary(report: &RenderReport) {
    let spec = match &report.outcome {
        Ok(spec) => spec,
        Err(error) => {
            eprintln!("error: {error}");
            return;
        }
    };
    for issue in spec.issues() {
        eprintln!("warning: omitted {issue}");
    }
    match spec {
        PlotSpec::NoData(no_data) => eprintln!("No data: {}", no_data.message),
        PlotSpec::Chart(chart) => {
            let mut table = Table::new();
            table.set_header(vec![
                header_cell("Series"),
                header_cell("Stone"),
                header_cell("CaR"),
                header_cell("Points"),
                header_cell("Color"),
            ]);
            apply_table_style(&mut table);
            align_column(&mut table, 3, CellAlignment::Right);
            for series in &chart.series {
                table.add_row(vec![
                    Cell::new(&series.label),
                    Cell::new(&series.stone),
                    Cell::new(series.level.label()),
                    Cell::new(series.points.len()),
                    dim_cell(color(series.style.color)),
                ]);
            }
            eprintln!("{}", chart.title);
            eprintln!("{table}");
            if let Some(path) = &report.output {
                eprintln!("Wrote {} ({})", path.display(), report.format);
            }
        }
    }
}

fn level_list(levels: &[ConfidenceLevel]) -> String {
    levels
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_listed_as_given() {
        assert_eq!(
            level_list(&[ConfidenceLevel::Car95, ConfidenceLevel::Car80]),
            "95, 80"
        );
    }
}
