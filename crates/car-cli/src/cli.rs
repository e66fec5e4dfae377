//! CLI argument definitions for the CaR viewer.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use car_model::{ConfidenceLevel, StoneId, ViewMode};
use car_report::Metric;

use crate::settings::OutputFormat;

#[derive(Parser)]
#[command(
    name = "car-viewer",
    version,
    about = "ERW CaR viewer - plot carbon-at-risk guarantee curves per stone",
    long_about = "Plot guarantee curves from enhanced rock weathering CaR result files.\n\n\
                  Reads one <STONE>_CAR.json per stone from a results folder and renders\n\
                  the selected stones and CaR levels as JSON, SVG or CSV."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Settings file (TOML) with display and output defaults.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render the selected stones and CaR levels.
    Render(RenderArgs),

    /// List the stones found in a results folder.
    Stones(StonesArgs),
}

#[derive(Parser)]
pub struct RenderArgs {
    /// Folder containing the per-stone result files.
    #[arg(value_name = "RESULTS_DIR")]
    pub results_dir: PathBuf,

    /// Stone to plot (repeatable; default: every stone in the folder).
    #[arg(long = "stone", value_name = "ID")]
    pub stones: Vec<StoneId>,

    /// CaR level to plot, e.g. 95 (repeatable; default: from settings).
    #[arg(long = "level", value_name = "LEVEL")]
    pub levels: Vec<ConfidenceLevel>,

    /// How stones and levels combine into series.
    #[arg(long = "mode", value_enum)]
    pub mode: Option<ViewModeArg>,

    /// Quantity on the y axis.
    #[arg(long = "metric", value_enum)]
    pub metric: Option<MetricArg>,

    /// Output format.
    #[arg(long = "format", value_enum)]
    pub format: Option<OutputFormatArg>,

    /// Write the plot to a file instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Hide grid lines.
    #[arg(long = "no-grid")]
    pub no_grid: bool,
}

#[derive(Parser)]
pub struct StonesArgs {
    /// Folder containing the per-stone result files.
    #[arg(value_name = "RESULTS_DIR")]
    pub results_dir: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ViewModeArg {
    StonesAtOneLevel,
    LevelsAtOneStone,
    AllCombinations,
}

impl From<ViewModeArg> for ViewMode {
    fn from(arg: ViewModeArg) -> Self {
        match arg {
            ViewModeArg::StonesAtOneLevel => ViewMode::StonesAtOneLevel,
            ViewModeArg::LevelsAtOneStone => ViewMode::LevelsAtOneStone,
            ViewModeArg::AllCombinations => ViewMode::AllCombinations,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum MetricArg {
    Guarantee,
    CarbonAtRisk,
}

impl From<MetricArg> for Metric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Guarantee => Metric::Guarantee,
            MetricArg::CarbonAtRisk => Metric::CarbonAtRisk,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Json,
    Svg,
    Csv,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Svg => OutputFormat::Svg,
            OutputFormatArg::Csv => OutputFormat::Csv,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
