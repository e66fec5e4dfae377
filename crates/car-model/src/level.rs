//! Carbon-at-risk confidence levels.
//!
//! A CaR level X states that the guaranteed amount is the (100 - X)-th
//! percentile across Monte Carlo trajectories, so CaR 95 is the P5 curve.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the supported confidence levels.
///
/// Variants are declared in ascending order so the derived `Ord` sorts
/// 80 < 85 < 90 < 95. Plot ordering uses the reverse (highest first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ConfidenceLevel {
    Car80,
    Car85,
    Car90,
    Car95,
}

impl ConfidenceLevel {
    /// All levels, highest confidence first.
    pub const DESCENDING: [ConfidenceLevel; 4] = [
        ConfidenceLevel::Car95,
        ConfidenceLevel::Car90,
        ConfidenceLevel::Car85,
        ConfidenceLevel::Car80,
    ];

    /// Confidence as a whole percentage.
    pub fn percent(&self) -> u8 {
        match self {
            ConfidenceLevel::Car80 => 80,
            ConfidenceLevel::Car85 => 85,
            ConfidenceLevel::Car90 => 90,
            ConfidenceLevel::Car95 => 95,
        }
    }

    /// Percentile of the trajectory distribution this level reports.
    pub fn percentile(&self) -> u8 {
        100 - self.percent()
    }

    pub fn from_percent(value: u8) -> Option<Self> {
        match value {
            80 => Some(ConfidenceLevel::Car80),
            85 => Some(ConfidenceLevel::Car85),
            90 => Some(ConfidenceLevel::Car90),
            95 => Some(ConfidenceLevel::Car95),
            _ => None,
        }
    }

    /// Match a level written as a float in a result file (`95.0`).
    pub fn from_f64(value: f64) -> Option<Self> {
        Self::DESCENDING
            .into_iter()
            .find(|level| (f64::from(level.percent()) - value).abs() < 1e-9)
    }

    /// Legend label, e.g. `CaR 95%`.
    pub fn label(&self) -> String {
        format!("CaR {}%", self.percent())
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.percent())
    }
}

impl From<ConfidenceLevel> for u8 {
    fn from(level: ConfidenceLevel) -> Self {
        level.percent()
    }
}

impl TryFrom<u8> for ConfidenceLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_percent(value).ok_or_else(|| format!("unsupported CaR level: {value}"))
    }
}

impl FromStr for ConfidenceLevel {
    type Err = String;

    /// Accepts `95`, `95%`, `95.0`, `CaR95` and `CaR 95%` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let digits = normalized
            .strip_prefix("car")
            .unwrap_or(&normalized)
            .trim()
            .trim_end_matches('%')
            .trim();
        let value: f64 = digits
            .parse()
            .map_err(|_| format!("Unknown CaR level: {s}"))?;
        Self::from_f64(value).ok_or_else(|| format!("Unsupported CaR level: {s}"))
    }
}
