//! Long-format CSV of the plotted series.

use std::io::Write;

use anyhow::Result;
use csv::{Terminator, WriterBuilder};

use car_model::carbon_at_risk;

use crate::render::PlotSpec;

pub const CSV_HEADER: [&str; 6] = [
    "stone",
    "level",
    "label",
    "time",
    "guarantee",
    "carbon_at_risk",
];

/// One row per plotted point. A placeholder writes only the header.
pub fn write_csv<W: Write>(spec: &PlotSpec, writer: W) -> Result<()> {
    let mut csv = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);
    csv.write_record(CSV_HEADER)?;

    if let PlotSpec::Chart(chart) = spec {
        for series in &chart.series {
            let level = series.level.percent().to_string();
            for (&(time, _), &guarantee) in series.points.iter().zip(&series.guarantee) {
                csv.write_record([
                    series.stone.as_str(),
                    level.as_str(),
                    series.label.as_str(),
                    time.to_string().as_str(),
                    guarantee.to_string().as_str(),
                    carbon_at_risk(guarantee).to_string().as_str(),
                ])?;
            }
        }
    }

    csv.flush()?;
    Ok(())
}
