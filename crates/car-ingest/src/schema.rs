//! Serde mirror of the result file format.
//!
//! Two layouts are accepted:
//!
//! 1. Multi-CaR (preferred): a `curves` array, one entry per level.
//! 2. Single-CaR: `car_level` and `guarantee_kg_per_t` at the top level.
//!
//! ```json
//! {
//!   "composition_name": "Basalt A",
//!   "composition": {"CaSiO3": 0.4, "MgSiO3": 0.3, "NaAlSi3O8": 0.2, "KAlSi3O8": 0.1},
//!   "time_years": [0, 1, 2],
//!   "N": 100,
//!   "years": 2,
//!   "curves": [
//!     {"car_level": 95, "percentile": 5, "guarantee_kg_per_t": [0, 10, 20]}
//!   ]
//! }
//! ```
//!
//! Values are deserialized strictly (a string where a number belongs is a
//! parse error); unknown fields are ignored.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Top level of a result file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultFile {
    pub composition_name: Option<String>,
    pub composition: Option<BTreeMap<String, f64>>,
    pub time_months: Option<Vec<f64>>,
    pub time_years: Option<Vec<f64>>,
    #[serde(rename = "N")]
    pub samples: Option<u64>,
    pub horizon: Option<f64>,
    /// Legacy horizon, in years.
    pub years: Option<f64>,
    pub curves: Option<Vec<CurveEntry>>,

    // Single-CaR layout
    pub car_level: Option<f64>,
    pub percentile: Option<f64>,
    pub guarantee_kg_per_t: Option<Vec<f64>>,
}

/// One element of `curves`. Axis, N and horizon fall back to the top level.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurveEntry {
    pub car_level: f64,
    pub percentile: Option<f64>,
    pub guarantee_kg_per_t: Vec<f64>,
    pub time_months: Option<Vec<f64>>,
    pub time_years: Option<Vec<f64>>,
    #[serde(rename = "N")]
    pub samples: Option<u64>,
    pub horizon: Option<f64>,
}

impl ResultFile {
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}
