//! Composition annotations shown alongside a plot.

use serde::Serialize;

use car_model::{Mineral, ResultRecord, StoneId};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MineralFraction {
    pub mineral: Mineral,
    pub fraction: f64,
}

/// Mineral breakdown of one plotted stone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositionAnnotation {
    pub stone: StoneId,
    pub name: String,
    pub fractions: Vec<MineralFraction>,
    /// Compact text, e.g. `CaSiO3 40%, MgSiO3 30%, NaAlSi3O8 20%, KAlSi3O8 10%`.
    pub text: String,
}

impl CompositionAnnotation {
    pub fn from_record(record: &ResultRecord) -> Self {
        let composition = record.composition();
        Self {
            stone: record.stone().clone(),
            name: record.name().to_string(),
            fractions: composition
                .fractions()
                .map(|(mineral, fraction)| MineralFraction { mineral, fraction })
                .collect(),
            text: composition.describe(),
        }
    }

    /// One legend line: `Basalt A: CaSiO3 40%, ...`.
    pub fn line(&self) -> String {
        format!("{}: {}", self.name, self.text)
    }
}
