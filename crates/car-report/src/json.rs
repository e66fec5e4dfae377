use std::io::Write;

use anyhow::Result;

use crate::render::PlotSpec;

/// Pretty JSON of a plot specification.
pub fn to_json(spec: &PlotSpec) -> serde_json::Result<String> {
    serde_json::to_string_pretty(spec)
}

pub fn write_json<W: Write>(spec: &PlotSpec, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, spec)?;
    writer.write_all(b"\n")?;
    Ok(())
}
