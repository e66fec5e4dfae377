use tracing::warn;

use car_ingest::{RecordLookup, ResultStore};
use car_model::{Selection, SelectionError};
use car_report::{PlotSpec, RenderOptions};

use crate::pipeline::run_pipeline;

/// Viewer state for one results directory.
///
/// Owns the record source (normally the [`ResultStore`] cache), so records
/// live exactly as long as the session. A rejected selection leaves the last
/// plot in place.
#[derive(Debug)]
pub struct Session<L = ResultStore> {
    lookup: L,
    options: RenderOptions,
    current: Option<PlotSpec>,
}

impl<L: RecordLookup> Session<L> {
    pub fn new(lookup: L, options: RenderOptions) -> Self {
        Self {
            lookup,
            options,
            current: None,
        }
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// New options apply from the next [`Session::apply`].
    pub fn set_options(&mut self, options: RenderOptions) {
        self.options = options;
    }

    /// Last successfully produced plot, including placeholders.
    pub fn current(&self) -> Option<&PlotSpec> {
        self.current.as_ref()
    }

    /// Render `selection`, replacing the current plot on success.
    pub fn apply(&mut self, selection: &Selection) -> Result<&PlotSpec, SelectionError> {
        match run_pipeline(&self.lookup, selection, &self.options) {
            Ok(spec) => {
                let spec: &PlotSpec = self.current.insert(spec);
                Ok(spec)
            }
            Err(error) => {
                warn!(%error, kept_previous = self.current.is_some(), "selection rejected");
                Err(error)
            }
        }
    }
}
