//! Turn resolved pairs into a plot specification.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use car_ingest::RecordLookup;
use car_model::{
    ConfidenceLevel, GuaranteeCurve, PlotPair, RenderError, ResultRecord, StoneId, TimeUnit,
};

use crate::annotation::CompositionAnnotation;
use crate::palette::LineDash;

/// Headroom above the largest plotted value.
pub const Y_HEADROOM: f64 = 1.05;

/// Quantity drawn on the y axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    /// kg CO2 retained per tonne promised.
    #[default]
    Guarantee,
    /// `1000 - guarantee`.
    CarbonAtRisk,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Guarantee => "guarantee",
            Metric::CarbonAtRisk => "carbon-at-risk",
        }
    }

    pub fn axis_label(&self) -> &'static str {
        match self {
            Metric::Guarantee => "Guarantee (kg CO2 per tonne promised)",
            Metric::CarbonAtRisk => "Carbon at risk (kg CO2 per tonne promised)",
        }
    }

    fn points(&self, curve: &GuaranteeCurve) -> Vec<(f64, f64)> {
        match self {
            Metric::Guarantee => curve.points().collect(),
            Metric::CarbonAtRisk => curve.carbon_at_risk_points().collect(),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "guarantee" => Ok(Metric::Guarantee),
            "carbon-at-risk" | "car" => Ok(Metric::CarbonAtRisk),
            _ => Err(format!("Unknown metric: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub metric: Metric,
    pub show_grid: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            metric: Metric::Guarantee,
            show_grid: true,
        }
    }
}

/// Visual encoding of one series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesStyle {
    /// Index into [`crate::palette::PALETTE`], cycled.
    pub color: usize,
    pub dash: LineDash,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotSeries {
    pub stone: StoneId,
    pub level: ConfidenceLevel,
    pub label: String,
    pub style: SeriesStyle,
    /// `(time, value)` in time order.
    pub points: Vec<(f64, f64)>,
    /// Source guarantee values, index-aligned with `points`.
    #[serde(skip)]
    pub guarantee: Vec<f64>,
}

/// A non-fatal problem that removed a series from the plot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderIssue {
    pub stone: StoneId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<ConfidenceLevel>,
    pub message: String,
}

impl fmt::Display for RenderIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            Some(level) => write!(f, "{} ({}): {}", self.stone, level.label(), self.message),
            None => write!(f, "{}: {}", self.stone, self.message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub y_max: f64,
    pub show_grid: bool,
    pub metric: Metric,
    pub series: Vec<PlotSeries>,
    pub compositions: Vec<CompositionAnnotation>,
    pub issues: Vec<RenderIssue>,
}

impl Chart {
    /// Largest time value across all series, at least 1.
    pub fn x_max(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|series| series.points.iter().map(|(t, _)| *t))
            .fold(0.0, f64::max)
            .max(1.0)
    }
}

/// Placeholder shown when nothing can be drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoData {
    pub reason: RenderError,
    pub message: String,
    pub issues: Vec<RenderIssue>,
}

/// Everything a display needs to draw one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlotSpec {
    Chart(Chart),
    NoData(NoData),
}

impl PlotSpec {
    fn no_data(reason: RenderError, issues: Vec<RenderIssue>) -> Self {
        PlotSpec::NoData(NoData {
            message: reason.to_string(),
            reason,
            issues,
        })
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, PlotSpec::NoData(_))
    }

    pub fn series(&self) -> &[PlotSeries] {
        match self {
            PlotSpec::Chart(chart) => &chart.series,
            PlotSpec::NoData(_) => &[],
        }
    }

    pub fn compositions(&self) -> &[CompositionAnnotation] {
        match self {
            PlotSpec::Chart(chart) => &chart.compositions,
            PlotSpec::NoData(_) => &[],
        }
    }

    pub fn issues(&self) -> &[RenderIssue] {
        match self {
            PlotSpec::Chart(chart) => &chart.issues,
            PlotSpec::NoData(no_data) => &no_data.issues,
        }
    }
}

/// Which dimensions the pair set varies along.
struct Layout {
    stones: Vec<StoneId>,
    vary_stones: bool,
    vary_levels: bool,
}

impl Layout {
    fn from_pairs(pairs: &[PlotPair]) -> Self {
        let mut stones: Vec<StoneId> = Vec::new();
        let mut levels: Vec<ConfidenceLevel> = Vec::new();
        for pair in pairs {
            if !stones.contains(&pair.stone) {
                stones.push(pair.stone.clone());
            }
            if !levels.contains(&pair.level) {
                levels.push(pair.level);
            }
        }
        Self {
            vary_stones: stones.len() > 1,
            vary_levels: levels.len() > 1,
            stones,
        }
    }

    fn stone_index(&self, stone: &StoneId) -> usize {
        self.stones.iter().position(|s| s == stone).unwrap_or(0)
    }

    fn style(&self, pair: &PlotPair) -> SeriesStyle {
        let stone = self.stone_index(&pair.stone);
        let level = level_index(pair.level);
        match (self.vary_stones, self.vary_levels) {
            (true, true) => SeriesStyle {
                color: stone,
                dash: LineDash::from_index(level),
            },
            (false, true) => SeriesStyle {
                color: level,
                dash: LineDash::Solid,
            },
            _ => SeriesStyle {
                color: stone,
                dash: LineDash::Solid,
            },
        }
    }

    fn label(&self, record: &ResultRecord, level: ConfidenceLevel) -> String {
        match (self.vary_stones, self.vary_levels) {
            (true, true) => format!("{} · {}", record.name(), level.label()),
            (false, true) => level.label(),
            _ => record.name().to_string(),
        }
    }

    fn title(&self, pairs: &[PlotPair], first: Option<&ResultRecord>) -> String {
        let stone_title = || match first {
            Some(record) => format!("{} ({})", record.name(), record.stone()),
            None => pairs
                .first()
                .map(|pair| pair.stone.to_string())
                .unwrap_or_default(),
        };
        let level = pairs.first().map(|pair| pair.level.label()).unwrap_or_default();
        match (self.vary_stones, self.vary_levels) {
            (true, true) => "Guarantee curves: stones × CaR levels".to_string(),
            (true, false) => format!("{level}: stones compared"),
            (false, true) => format!("{}: CaR levels compared", stone_title()),
            (false, false) => format!("{}, {level}", stone_title()),
        }
    }
}

/// Fixed rank of a level, so a level keeps its color across renders.
fn level_index(level: ConfidenceLevel) -> usize {
    ConfidenceLevel::DESCENDING
        .iter()
        .position(|candidate| *candidate == level)
        .unwrap_or(0)
}

/// Build the plot for `pairs`, in the given order.
///
/// Stones that fail to load, and levels a record lacks, drop only their own
/// series and are reported in the issue list. Each stone is looked up once.
pub fn render<L>(pairs: &[PlotPair], lookup: &L, options: &RenderOptions) -> PlotSpec
where
    L: RecordLookup + ?Sized,
{
    if pairs.is_empty() {
        return PlotSpec::no_data(RenderError::NoPairs, Vec::new());
    }

    let layout = Layout::from_pairs(pairs);
    let mut records: BTreeMap<StoneId, Option<Arc<ResultRecord>>> = BTreeMap::new();
    let mut issues = Vec::new();
    let mut series = Vec::with_capacity(pairs.len());
    let mut compositions: Vec<CompositionAnnotation> = Vec::new();
    let mut time_unit: Option<TimeUnit> = None;
    let mut first_record: Option<Arc<ResultRecord>> = None;

    for pair in pairs {
        let loaded = records.entry(pair.stone.clone()).or_insert_with(|| {
            match lookup.lookup(&pair.stone) {
                Ok(record) => Some(record),
                Err(error) => {
                    warn!(stone = %pair.stone, error = %error.kind, "series omitted");
                    issues.push(RenderIssue {
                        stone: pair.stone.clone(),
                        level: None,
                        message: error.kind.to_string(),
                    });
                    None
                }
            }
        });
        let Some(record) = loaded.clone() else {
            continue;
        };

        let Some(curve) = record.curve(pair.level) else {
            issues.push(RenderIssue {
                stone: pair.stone.clone(),
                level: Some(pair.level),
                message: format!("no curve for {}", pair.level.label()),
            });
            continue;
        };

        match time_unit {
            Some(unit) if unit != record.time_unit() => {
                issues.push(RenderIssue {
                    stone: pair.stone.clone(),
                    level: Some(pair.level),
                    message: format!(
                        "time axis in {} cannot share a plot with {}",
                        record.time_unit(),
                        unit
                    ),
                });
                continue;
            }
            Some(_) => {}
            None => time_unit = Some(record.time_unit()),
        }

        if !compositions.iter().any(|c| c.stone == pair.stone) {
            compositions.push(CompositionAnnotation::from_record(&record));
        }
        series.push(PlotSeries {
            stone: pair.stone.clone(),
            level: pair.level,
            label: layout.label(&record, pair.level),
            style: layout.style(pair),
            points: options.metric.points(curve),
            guarantee: curve.guarantee().to_vec(),
        });
        first_record.get_or_insert(record);
    }

    let Some(time_unit) = time_unit else {
        return PlotSpec::no_data(
            RenderError::NoRenderableSeries {
                requested: pairs.len(),
            },
            issues,
        );
    };

    let max_value = series
        .iter()
        .flat_map(|s| s.points.iter().map(|(_, v)| *v))
        .fold(0.0, f64::max);
    debug!(
        series = series.len(),
        issues = issues.len(),
        metric = %options.metric,
        "plot rendered"
    );

    PlotSpec::Chart(Chart {
        title: layout.title(pairs, first_record.as_deref()),
        x_label: time_unit.axis_label(),
        y_label: options.metric.axis_label().to_string(),
        y_max: max_value.max(1.0) * Y_HEADROOM,
        show_grid: options.show_grid,
        metric: options.metric,
        series,
        compositions,
        issues,
    })
}
