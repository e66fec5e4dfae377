//! One selection event: resolve, then render against the store.

use tracing::{info, info_span};

use car_ingest::RecordLookup;
use car_model::{Selection, SelectionError};
use car_report::{PlotSpec, RenderOptions, render};

use crate::resolver::resolve;

/// Run the pipeline for one selection.
///
/// A `SelectionError` stops the request before any record is read. Stones
/// that fail to load only degrade the returned plot.
pub fn run_pipeline<L>(
    lookup: &L,
    selection: &Selection,
    options: &RenderOptions,
) -> Result<PlotSpec, SelectionError>
where
    L: RecordLookup + ?Sized,
{
    let span = info_span!(
        "render_selection",
        mode = %selection.mode,
        stones = selection.stones.len(),
        levels = selection.levels.len()
    );
    let _guard = span.enter();

    let pairs = resolve(selection)?;
    let spec = render(&pairs, lookup, options);
    info!(
        pairs = pairs.len(),
        series = spec.series().len(),
        issues = spec.issues().len(),
        no_data = spec.is_no_data(),
        "selection rendered"
    );
    Ok(spec)
}
