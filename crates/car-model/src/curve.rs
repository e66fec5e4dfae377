//! Guarantee curves and the derived carbon-at-risk value.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DataErrorKind;
use crate::level::ConfidenceLevel;

/// Upper bound of a guarantee value, kg CO2 per tonne promised.
pub const MAX_GUARANTEE: f64 = 1000.0;

/// Allowed difference between a declared horizon and the last time point.
pub const HORIZON_TOLERANCE: f64 = 1e-6;

/// Carbon at risk for a guarantee value: `1000 - guarantee`.
pub fn carbon_at_risk(guarantee: f64) -> f64 {
    MAX_GUARANTEE - guarantee
}

/// Unit of the time axis as written by the producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Months,
    Years,
}

impl TimeUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::Months => "months",
            TimeUnit::Years => "years",
        }
    }

    /// Axis label, e.g. `Time (months)`.
    pub fn axis_label(&self) -> String {
        format!("Time ({})", self.as_str())
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time series of guaranteed retained CO2 at one confidence level.
#[derive(Debug, Clone, PartialEq)]
pub struct GuaranteeCurve {
    level: ConfidenceLevel,
    time: Vec<f64>,
    guarantee: Vec<f64>,
    samples: u64,
    horizon: f64,
}

impl GuaranteeCurve {
    /// Build a curve, checking every series invariant.
    ///
    /// `declared_horizon` is the horizon written in the file, if any; it
    /// must match the final time point.
    pub fn new(
        level: ConfidenceLevel,
        time: Vec<f64>,
        guarantee: Vec<f64>,
        samples: u64,
        declared_horizon: Option<f64>,
    ) -> Result<Self, DataErrorKind> {
        if time.is_empty() || guarantee.is_empty() {
            return Err(DataErrorKind::EmptySeries { level });
        }
        if time.len() != guarantee.len() {
            return Err(DataErrorKind::LengthMismatch {
                level,
                time_len: time.len(),
                value_len: guarantee.len(),
            });
        }
        if samples == 0 {
            return Err(DataErrorKind::InvalidSampleCount { level });
        }

        if let Some(index) = time.iter().position(|t| !t.is_finite()) {
            return Err(DataErrorKind::NonFiniteTime { level, index });
        }
        if time[0] != 0.0 {
            return Err(DataErrorKind::AxisStart {
                level,
                first: time[0],
            });
        }
        if let Some(index) = time.windows(2).position(|pair| pair[1] < pair[0]) {
            return Err(DataErrorKind::NonMonotonicTime {
                level,
                index: index + 1,
            });
        }

        if let Some((index, value)) = guarantee
            .iter()
            .copied()
            .enumerate()
            .find(|(_, value)| !(0.0..=MAX_GUARANTEE).contains(value))
        {
            return Err(DataErrorKind::GuaranteeOutOfRange {
                level,
                index,
                value,
            });
        }

        let horizon = time[time.len() - 1];
        if let Some(declared) = declared_horizon
            && (declared - horizon).abs() > HORIZON_TOLERANCE
        {
            return Err(DataErrorKind::HorizonMismatch {
                level,
                declared,
                actual: horizon,
            });
        }

        Ok(Self {
            level,
            time,
            guarantee,
            samples,
            horizon,
        })
    }

    pub fn level(&self) -> ConfidenceLevel {
        self.level
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn guarantee(&self) -> &[f64] {
        &self.guarantee
    }

    /// Monte Carlo sample count N.
    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// Final time point.
    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// `(time, guarantee)` points in time order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.time.iter().copied().zip(self.guarantee.iter().copied())
    }

    /// `(time, carbon at risk)` points in time order.
    pub fn carbon_at_risk_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points().map(|(t, g)| (t, carbon_at_risk(g)))
    }

    pub fn carbon_at_risk_at(&self, index: usize) -> Option<f64> {
        self.guarantee.get(index).copied().map(carbon_at_risk)
    }

    pub fn max_guarantee(&self) -> f64 {
        self.guarantee.iter().copied().fold(0.0, f64::max)
    }
}
