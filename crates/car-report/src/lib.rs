//! Plot generation for CaR guarantee curves.
//!
//! [`render`] turns an ordered list of `(stone, level)` pairs into a
//! [`PlotSpec`]: styled series, composition annotations, and the issues that
//! removed series from the plot. The spec can then be written as:
//!
//! - **JSON**: the serialized `PlotSpec`, for display front ends
//! - **SVG**: a standalone chart with legend and composition box
//! - **CSV**: long format, one row per plotted point

mod annotation;
mod csv_export;
mod json;
mod palette;
mod render;
mod svg;

// Re-export public types and functions
pub use annotation::{CompositionAnnotation, MineralFraction};
pub use csv_export::{CSV_HEADER, write_csv};
pub use json::{to_json, write_json};
pub use palette::{LineDash, PALETTE, color};
pub use render::{
    Chart, Metric, NoData, PlotSeries, PlotSpec, RenderIssue, RenderOptions, SeriesStyle,
    Y_HEADROOM, render,
};
pub use svg::{svg_string, write_svg};
