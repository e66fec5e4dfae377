use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::composition::StoneComposition;
use crate::curve::{GuaranteeCurve, TimeUnit};
use crate::error::DataErrorKind;
use crate::ids::StoneId;
use crate::level::ConfidenceLevel;

/// Absolute slack allowed when checking that higher confidence never
/// guarantees more than lower confidence.
pub const ORDERING_TOLERANCE: f64 = 1e-6;

/// Where a record was read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceInfo {
    pub path: PathBuf,
    /// Lowercase hex SHA-256 of the bytes that were parsed.
    pub sha256: String,
}

/// All curves for one stone. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    stone: StoneId,
    composition: StoneComposition,
    time_unit: TimeUnit,
    curves: BTreeMap<ConfidenceLevel, GuaranteeCurve>,
    source: SourceInfo,
}

impl ResultRecord {
    pub fn new(
        stone: StoneId,
        composition: StoneComposition,
        time_unit: TimeUnit,
        curves: Vec<GuaranteeCurve>,
        source: SourceInfo,
    ) -> Result<Self, DataErrorKind> {
        let Some(first) = curves.first() else {
            return Err(DataErrorKind::NoCurves);
        };
        let axis = first.time().to_vec();

        let mut by_level = BTreeMap::new();
        for curve in curves {
            let level = curve.level();
            if curve.time() != axis.as_slice() {
                return Err(DataErrorKind::TimeAxisMismatch { level });
            }
            if by_level.insert(level, curve).is_some() {
                return Err(DataErrorKind::DuplicateLevel { level });
            }
        }

        check_confidence_ordering(&by_level)?;

        Ok(Self {
            stone,
            composition,
            time_unit,
            curves: by_level,
            source,
        })
    }

    pub fn stone(&self) -> &StoneId {
        &self.stone
    }

    pub fn composition(&self) -> &StoneComposition {
        &self.composition
    }

    /// Display name, from the composition.
    pub fn name(&self) -> &str {
        self.composition.name()
    }

    pub fn time_unit(&self) -> TimeUnit {
        self.time_unit
    }

    pub fn source(&self) -> &SourceInfo {
        &self.source
    }

    pub fn curve(&self, level: ConfidenceLevel) -> Option<&GuaranteeCurve> {
        self.curves.get(&level)
    }

    /// Levels present in the record, highest confidence first.
    pub fn levels(&self) -> Vec<ConfidenceLevel> {
        self.curves.keys().rev().copied().collect()
    }

    /// Curves, highest confidence first.
    pub fn curves(&self) -> impl Iterator<Item = &GuaranteeCurve> {
        self.curves.values().rev()
    }

    /// Shared time axis.
    pub fn time(&self) -> &[f64] {
        self.curves
            .values()
            .next()
            .map(GuaranteeCurve::time)
            .unwrap_or_default()
    }

    pub fn horizon(&self) -> f64 {
        self.time().last().copied().unwrap_or_default()
    }

    /// Sample count of the first curve; producers write one N per run.
    pub fn samples(&self) -> u64 {
        self.curves
            .values()
            .next()
            .map(GuaranteeCurve::samples)
            .unwrap_or_default()
    }
}

/// Adjacent levels only: the relation is transitive.
fn check_confidence_ordering(
    curves: &BTreeMap<ConfidenceLevel, GuaranteeCurve>,
) -> Result<(), DataErrorKind> {
    let descending: Vec<&GuaranteeCurve> = curves.values().rev().collect();
    for pair in descending.windows(2) {
        let (higher, lower) = (pair[0], pair[1]);
        for (index, (h, l)) in higher
            .guarantee()
            .iter()
            .zip(lower.guarantee())
            .enumerate()
        {
            if *h > *l + ORDERING_TOLERANCE {
                return Err(DataErrorKind::ConfidenceOrdering {
                    higher: higher.level(),
                    lower: lower.level(),
                    index,
                    higher_value: *h,
                    lower_value: *l,
                });
            }
        }
    }
    Ok(())
}
