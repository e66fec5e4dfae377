//! Error taxonomy shared by the loader, resolver and renderer.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::ids::StoneId;
use crate::level::ConfidenceLevel;
use crate::mineral::Mineral;
use crate::selection::ViewMode;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("stone identifier must not be empty: {0:?}")]
    InvalidStoneId(String),
}

/// A result file for one stone could not be loaded.
///
/// Scoped to a single stone; other stones keep loading and rendering.
#[derive(Debug, Error)]
#[error("stone {stone}: {kind}")]
pub struct DataError {
    pub stone: StoneId,
    pub kind: DataErrorKind,
}

impl DataError {
    pub fn new(stone: StoneId, kind: DataErrorKind) -> Self {
        Self { stone, kind }
    }
}

/// The specific violation behind a [`DataError`].
#[derive(Debug, Error)]
pub enum DataErrorKind {
    // === Source Errors ===
    #[error("result file not found: {path}")]
    SourceMissing { path: PathBuf },

    #[error("failed to read {path}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed result file {path}: {message}")]
    Malformed { path: PathBuf, message: String },

    // === Schema Errors ===
    #[error("missing required field: {field}")]
    MissingField { field: String },

    #[error("fields '{first}' and '{second}' are mutually exclusive")]
    AmbiguousField {
        first: &'static str,
        second: &'static str,
    },

    #[error("unsupported CaR level {value}")]
    UnsupportedLevel { value: f64 },

    #[error("CaR {level}% appears more than once")]
    DuplicateLevel { level: ConfidenceLevel },

    #[error("CaR {level}% declares percentile {percentile}, expected {}", .level.percentile())]
    PercentileMismatch {
        level: ConfidenceLevel,
        percentile: f64,
    },

    #[error("result file contains no curves")]
    NoCurves,

    // === Composition Errors ===
    #[error("unknown mineral '{key}' in composition")]
    UnknownMineral { key: String },

    #[error("mineral {mineral} listed more than once in composition")]
    DuplicateMineral { mineral: Mineral },

    #[error("invalid fraction {value} for {mineral}")]
    InvalidFraction { mineral: Mineral, value: f64 },

    #[error("composition fractions sum to {sum:.6}, expected 1 (tolerance {tolerance})")]
    FractionSum { sum: f64, tolerance: f64 },

    // === Curve Errors ===
    #[error("CaR {level}% has an empty series")]
    EmptySeries { level: ConfidenceLevel },

    #[error("CaR {level}% has {time_len} time points but {value_len} guarantee values")]
    LengthMismatch {
        level: ConfidenceLevel,
        time_len: usize,
        value_len: usize,
    },

    #[error("CaR {level}% time axis starts at {first}, expected 0")]
    AxisStart { level: ConfidenceLevel, first: f64 },

    #[error("CaR {level}% time axis is not finite at index {index}")]
    NonFiniteTime { level: ConfidenceLevel, index: usize },

    #[error("CaR {level}% time axis decreases at index {index}")]
    NonMonotonicTime { level: ConfidenceLevel, index: usize },

    #[error("CaR {level}% time axis differs from the other curves")]
    TimeAxisMismatch { level: ConfidenceLevel },

    #[error("CaR {level}% guarantee {value} at index {index} is outside [0, 1000]")]
    GuaranteeOutOfRange {
        level: ConfidenceLevel,
        index: usize,
        value: f64,
    },

    #[error("CaR {level}% sample count must be positive")]
    InvalidSampleCount { level: ConfidenceLevel },

    #[error("CaR {level}% declares horizon {declared}, but the time axis ends at {actual}")]
    HorizonMismatch {
        level: ConfidenceLevel,
        declared: f64,
        actual: f64,
    },

    #[error(
        "CaR {higher}% guarantee exceeds CaR {lower}% at index {index} \
         ({higher_value} > {lower_value})"
    )]
    ConfidenceOrdering {
        higher: ConfidenceLevel,
        lower: ConfidenceLevel,
        index: usize,
        higher_value: f64,
        lower_value: f64,
    },
}

/// The selection cannot be resolved for the chosen view mode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("select at least one stone")]
    NoStonesSelected,

    #[error("select at least one CaR level")]
    NoLevelsSelected,

    #[error("view mode '{mode}' needs exactly one CaR level, {selected} selected")]
    ExpectedSingleLevel { mode: ViewMode, selected: usize },

    #[error("view mode '{mode}' needs exactly one stone, {selected} selected")]
    ExpectedSingleStone { mode: ViewMode, selected: usize },
}

/// Nothing could be drawn for an otherwise valid request.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderError {
    #[error("no (stone, CaR level) pairs to plot")]
    NoPairs,

    #[error("none of the {requested} requested series could be rendered")]
    NoRenderableSeries { requested: usize },
}
