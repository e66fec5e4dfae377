use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::DataErrorKind;
use crate::mineral::Mineral;

/// Allowed deviation of the fraction sum from 1.
pub const FRACTION_SUM_TOLERANCE: f64 = 1e-3;

/// Mass-fraction breakdown of a stone over the four proxy minerals.
///
/// Always holds an entry for every [`Mineral`]; minerals absent from the
/// source are stored as 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoneComposition {
    name: String,
    fractions: BTreeMap<Mineral, f64>,
}

impl StoneComposition {
    pub fn new(
        name: impl Into<String>,
        fractions: BTreeMap<Mineral, f64>,
    ) -> Result<Self, DataErrorKind> {
        let mut complete = BTreeMap::new();
        for mineral in Mineral::ALL {
            let value = fractions.get(&mineral).copied().unwrap_or(0.0);
            if !value.is_finite() || value < 0.0 {
                return Err(DataErrorKind::InvalidFraction { mineral, value });
            }
            complete.insert(mineral, value);
        }

        let sum: f64 = complete.values().sum();
        if (sum - 1.0).abs() > FRACTION_SUM_TOLERANCE {
            return Err(DataErrorKind::FractionSum {
                sum,
                tolerance: FRACTION_SUM_TOLERANCE,
            });
        }

        Ok(Self {
            name: name.into(),
            fractions: complete,
        })
    }

    /// Display name of the stone (`composition_name`, or the stone id).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fraction(&self, mineral: Mineral) -> f64 {
        self.fractions.get(&mineral).copied().unwrap_or(0.0)
    }

    /// Fractions in display order.
    pub fn fractions(&self) -> impl Iterator<Item = (Mineral, f64)> + '_ {
        self.fractions.iter().map(|(mineral, value)| (*mineral, *value))
    }

    pub fn sum(&self) -> f64 {
        self.fractions.values().sum()
    }

    /// Compact legend text, e.g. `CaSiO3 40%, MgSiO3 30%, NaAlSi3O8 20%, KAlSi3O8 10%`.
    ///
    /// Percentages are normalized by the actual sum so they add up to 100
    /// even when the fractions are off by the tolerance.
    pub fn describe(&self) -> String {
        let sum = self.sum();
        let total = if sum > 0.0 { sum } else { 1.0 };
        self.fractions()
            .map(|(mineral, value)| format!("{mineral} {:.0}%", 100.0 * value / total))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
