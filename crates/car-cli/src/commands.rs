use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, info_span};

use car_core::Session;
use car_ingest::{RecordLookup, ResultStore};
use car_model::{
    ConfidenceLevel, DataError, ResultRecord, Selection, SelectionError, StoneId, ViewMode,
};
use car_report::{PlotSpec, RenderOptions, write_csv, write_json, write_svg};

use crate::cli::{RenderArgs, StonesArgs};
use crate::settings::{OutputFormat, Settings};

/// Result of one `render` invocation.
#[derive(Debug)]
pub struct RenderReport {
    pub selection: Selection,
    pub format: OutputFormat,
    /// Destination file; stdout when `None`.
    pub output: Option<PathBuf>,
    pub outcome: Result<PlotSpec, SelectionError>,
}

impl RenderReport {
    /// 0 for a drawn chart, 1 for a rejected selection or a placeholder.
    pub fn exit_code(&self) -> i32 {
        match &self.outcome {
            Ok(spec) if !spec.is_no_data() => 0,
            _ => 1,
        }
    }
}

/// Per-stone load outcomes for `stones`.
pub type StoneListing = Vec<(StoneId, Result<Arc<ResultRecord>, DataError>)>;

pub fn run_render(args: &RenderArgs, settings: &Settings) -> Result<RenderReport> {
    let span = info_span!("render", results_dir = %args.results_dir.display());
    let _guard = span.enter();

    let store = ResultStore::open(&args.results_dir)
        .with_context(|| format!("open results folder {}", args.results_dir.display()))?;

    let stones = if args.stones.is_empty() {
        store.discover().context("discover result files")?
    } else {
        args.stones.clone()
    };
    let mut failures = BTreeMap::new();
    let levels = if args.levels.is_empty() {
        default_levels(&store, &stones, &settings.display.levels, &mut failures)
    } else {
        args.levels.clone()
    };
    let mode: ViewMode = args.mode.map_or(settings.display.mode, Into::into);
    let selection = Selection::new(stones, levels, mode);
    debug!(?selection, "selection assembled");

    let options = RenderOptions {
        metric: args.metric.map_or(settings.display.metric, Into::into),
        show_grid: settings.display.show_grid && !args.no_grid,
    };
    let format: OutputFormat = args.format.map_or(settings.output.format, Into::into);

    let lookup = PreloadedStore {
        store,
        failures: RefCell::new(failures),
    };
    let mut session = Session::new(lookup, options);
    let outcome = session.apply(&selection).cloned();
    if let Ok(spec) = &outcome {
        write_spec(spec, format, args.output.as_deref())?;
        info!(format = %format, series = spec.series().len(), "plot written");
    }

    Ok(RenderReport {
        selection,
        format,
        output: args.output.clone(),
        outcome,
    })
}

pub fn run_stones(args: &StonesArgs) -> Result<StoneListing> {
    let store = ResultStore::open(&args.results_dir)
        .with_context(|| format!("open results folder {}", args.results_dir.display()))?;
    store.load_all().context("load result files")
}

/// Preferred levels that the selected stones provide, falling back to
/// everything they provide, then to the preferences themselves.
///
/// Stones that fail to load are recorded in `failures`.
fn default_levels(
    store: &ResultStore,
    stones: &[StoneId],
    preferred: &[ConfidenceLevel],
    failures: &mut BTreeMap<StoneId, DataError>,
) -> Vec<ConfidenceLevel> {
    let mut available = BTreeSet::new();
    for stone in stones {
        match store.get(stone) {
            Ok(record) => available.extend(record.levels()),
            Err(error) => {
                failures.insert(stone.clone(), error);
            }
        }
    }
    if available.is_empty() {
        return preferred.to_vec();
    }
    let chosen: Vec<ConfidenceLevel> = preferred
        .iter()
        .copied()
        .filter(|level| available.contains(level))
        .collect();
    if chosen.is_empty() {
        available.into_iter().rev().collect()
    } else {
        chosen
    }
}

/// Store lookup that reports each preloaded failure once instead of
/// reading the file again.
struct PreloadedStore {
    store: ResultStore,
    failures: RefCell<BTreeMap<StoneId, DataError>>,
}

impl RecordLookup for PreloadedStore {
    fn lookup(&self, stone: &StoneId) -> Result<Arc<ResultRecord>, DataError> {
        match self.failures.borrow_mut().remove(stone) {
            Some(error) => Err(error),
            None => self.store.get(stone),
        }
    }
}

fn write_spec(spec: &PlotSpec, format: OutputFormat, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_format(spec, format, &mut writer)?;
            writer
                .flush()
                .with_context(|| format!("write {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            write_format(spec, format, &mut stdout)?;
            stdout.flush().context("write stdout")
        }
    }
}

fn write_format<W: Write>(spec: &PlotSpec, format: OutputFormat, writer: W) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(spec, writer),
        OutputFormat::Svg => write_svg(spec, writer),
        OutputFormat::Csv => write_csv(spec, writer),
    }
}
