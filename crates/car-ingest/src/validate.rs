//! Strict conversion of a parsed [`ResultFile`] into a [`ResultRecord`].

use std::collections::BTreeMap;

use car_model::{
    ConfidenceLevel, DataErrorKind, GuaranteeCurve, Mineral, ResultRecord, SourceInfo,
    StoneComposition, StoneId, TimeUnit,
};

use crate::schema::{CurveEntry, ResultFile};

const PERCENTILE_TOLERANCE: f64 = 1e-9;

/// Validate a parsed file and build the immutable record.
pub fn build_record(
    stone: &StoneId,
    source: SourceInfo,
    file: ResultFile,
) -> Result<ResultRecord, DataErrorKind> {
    let composition = build_composition(stone, &file)?;
    let top_axis = resolve_axis(file.time_months.clone(), file.time_years.clone())?;

    let entries = curve_entries(&file)?;
    let mut curves = Vec::with_capacity(entries.len());
    let mut record_unit: Option<TimeUnit> = None;

    for entry in entries {
        let level = ConfidenceLevel::from_f64(entry.car_level).ok_or(
            DataErrorKind::UnsupportedLevel {
                value: entry.car_level,
            },
        )?;

        if let Some(percentile) = entry.percentile
            && (percentile - f64::from(level.percentile())).abs() > PERCENTILE_TOLERANCE
        {
            return Err(DataErrorKind::PercentileMismatch { level, percentile });
        }

        let (unit, time) = match resolve_axis(entry.time_months, entry.time_years)? {
            Some(axis) => axis,
            None => top_axis.clone().ok_or_else(|| DataErrorKind::MissingField {
                field: "time_months or time_years".to_string(),
            })?,
        };
        match record_unit {
            Some(expected) if expected != unit => {
                return Err(DataErrorKind::TimeAxisMismatch { level });
            }
            Some(_) => {}
            None => record_unit = Some(unit),
        }

        let samples = entry
            .samples
            .or(file.samples)
            .ok_or_else(|| DataErrorKind::MissingField {
                field: format!("N for CaR {level}%"),
            })?;

        let declared_horizon = entry.horizon.or(file.horizon).or(match unit {
            TimeUnit::Years => file.years,
            TimeUnit::Months => None,
        });

        curves.push(GuaranteeCurve::new(
            level,
            time,
            entry.guarantee_kg_per_t,
            samples,
            declared_horizon,
        )?);
    }

    let time_unit = record_unit.ok_or(DataErrorKind::NoCurves)?;
    ResultRecord::new(stone.clone(), composition, time_unit, curves, source)
}

fn build_composition(
    stone: &StoneId,
    file: &ResultFile,
) -> Result<StoneComposition, DataErrorKind> {
    let raw = file
        .composition
        .as_ref()
        .ok_or_else(|| DataErrorKind::MissingField {
            field: "composition".to_string(),
        })?;

    let mut fractions = BTreeMap::new();
    for (key, value) in raw {
        let mineral: Mineral = key
            .parse()
            .map_err(|_| DataErrorKind::UnknownMineral { key: key.clone() })?;
        if fractions.insert(mineral, *value).is_some() {
            return Err(DataErrorKind::DuplicateMineral { mineral });
        }
    }

    let name = file
        .composition_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(stone.as_str());

    StoneComposition::new(name, fractions)
}

fn resolve_axis(
    months: Option<Vec<f64>>,
    years: Option<Vec<f64>>,
) -> Result<Option<(TimeUnit, Vec<f64>)>, DataErrorKind> {
    match (months, years) {
        (Some(_), Some(_)) => Err(DataErrorKind::AmbiguousField {
            first: "time_months",
            second: "time_years",
        }),
        (Some(time), None) => Ok(Some((TimeUnit::Months, time))),
        (None, Some(time)) => Ok(Some((TimeUnit::Years, time))),
        (None, None) => Ok(None),
    }
}

/// Curve entries for either layout; `curves` wins when both are present.
fn curve_entries(file: &ResultFile) -> Result<Vec<CurveEntry>, DataErrorKind> {
    if let Some(curves) = &file.curves {
        if curves.is_empty() {
            return Err(DataErrorKind::NoCurves);
        }
        return Ok(curves.clone());
    }

    let car_level = file.car_level.ok_or_else(|| DataErrorKind::MissingField {
        field: "curves or car_level".to_string(),
    })?;
    let guarantee = file
        .guarantee_kg_per_t
        .clone()
        .ok_or_else(|| DataErrorKind::MissingField {
            field: "guarantee_kg_per_t".to_string(),
        })?;

    Ok(vec![CurveEntry {
        car_level,
        percentile: file.percentile,
        guarantee_kg_per_t: guarantee,
        ..CurveEntry::default()
    }])
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn stone() -> StoneId {
        StoneId::new("A").unwrap()
    }

    fn source() -> SourceInfo {
        SourceInfo {
            path: PathBuf::from("A_CAR.json"),
            sha256: String::new(),
        }
    }

    fn parse(json: &str) -> Result<ResultRecord, DataErrorKind> {
        let file = ResultFile::from_slice(json.as_bytes()).expect("valid json");
        build_record(&stone(), source(), file)
    }

    const COMPOSITION: &str =
        r#""composition": {"CaSiO3": 0.4, "MgSiO3": 0.3, "NaAlSi3O8": 0.2, "KAlSi3O8": 0.1}"#;

    #[test]
    fn builds_multi_car_record() {
        let record = parse(&format!(
            r#"{{
                "composition_name": "Basalt A",
                {COMPOSITION},
                "time_years": [0, 1, 2],
                "N": 100,
                "years": 2,
                "curves": [
                    {{"car_level": 95.0, "percentile": 5.0, "guarantee_kg_per_t": [0, 10, 20]}},
                    {{"car_level": 90.0, "percentile": 10.0, "guarantee_kg_per_t": [0, 12, 25]}}
                ]
            }}"#
        ))
        .unwrap();
        assert_eq!(record.name(), "Basalt A");
        assert_eq!(record.time_unit(), TimeUnit::Years);
        assert_eq!(
            record.levels(),
            vec![ConfidenceLevel::Car95, ConfidenceLevel::Car90]
        );
        assert_eq!(record.samples(), 100);
    }

    #[test]
    fn builds_single_car_record() {
        let record = parse(&format!(
            r#"{{
                {COMPOSITION},
                "car_level": 90.0,
                "percentile": 10.0,
                "time_months": [0, 6, 12],
                "guarantee_kg_per_t": [0, 5, 9],
                "N": 50
            }}"#
        ))
        .unwrap();
        assert_eq!(record.name(), "A");
        assert_eq!(record.time_unit(), TimeUnit::Months);
        assert_eq!(record.levels(), vec![ConfidenceLevel::Car90]);
        assert_eq!(record.horizon(), 12.0);
    }

    #[test]
    fn per_curve_fields_override_top_level() {
        let record = parse(&format!(
            r#"{{
                {COMPOSITION},
                "N": 10,
                "curves": [
                    {{"car_level": 85, "time_months": [0, 1], "guarantee_kg_per_t": [0, 1],
                      "N": 20, "horizon": 1}}
                ]
            }}"#
        ))
        .unwrap();
        assert_eq!(record.samples(), 20);
    }

    #[test]
    fn missing_composition_is_rejected() {
        let err = parse(
            r#"{"time_months": [0], "N": 1,
                "curves": [{"car_level": 95, "guarantee_kg_per_t": [0]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, DataErrorKind::MissingField { field } if field == "composition"));
    }

    #[test]
    fn missing_axis_and_samples_are_rejected() {
        let err = parse(&format!(
            r#"{{ {COMPOSITION}, "N": 1,
                "curves": [{{"car_level": 95, "guarantee_kg_per_t": [0]}}] }}"#
        ))
        .unwrap_err();
        assert!(matches!(err, DataErrorKind::MissingField { .. }));

        let err = parse(&format!(
            r#"{{ {COMPOSITION}, "time_months": [0],
                "curves": [{{"car_level": 95, "guarantee_kg_per_t": [0]}}] }}"#
        ))
        .unwrap_err();
        assert!(matches!(err, DataErrorKind::MissingField { field } if field.starts_with('N')));
    }

    #[test]
    fn both_axis_units_are_ambiguous() {
        let err = parse(&format!(
            r#"{{ {COMPOSITION}, "time_months": [0], "time_years": [0], "N": 1,
                 "curves": [{{"car_level": 95, "guarantee_kg_per_t": [0]}}] }}"#
        ))
        .unwrap_err();
        assert!(matches!(err, DataErrorKind::AmbiguousField { .. }));
    }

    #[test]
    fn mixed_axis_units_are_rejected() {
        let err = parse(&format!(
            r#"{{ {COMPOSITION}, "N": 1, "curves": [
                {{"car_level": 95, "time_months": [0, 1], "guarantee_kg_per_t": [0, 1]}},
                {{"car_level": 90, "time_years": [0, 1], "guarantee_kg_per_t": [0, 1]}}
            ] }}"#
        ))
        .unwrap_err();
        assert!(matches!(err, DataErrorKind::TimeAxisMismatch { .. }));
    }

    #[test]
    fn unsupported_level_and_percentile_mismatch() {
        let err = parse(&format!(
            r#"{{ {COMPOSITION}, "time_months": [0], "N": 1,
                 "curves": [{{"car_level": 99, "guarantee_kg_per_t": [0]}}] }}"#
        ))
        .unwrap_err();
        assert!(matches!(err, DataErrorKind::UnsupportedLevel { .. }));

        let err = parse(&format!(
            r#"{{ {COMPOSITION}, "time_months": [0], "N": 1,
                 "curves": [{{"car_level": 95, "percentile": 10, "guarantee_kg_per_t": [0]}}] }}"#
        ))
        .unwrap_err();
        assert!(matches!(err, DataErrorKind::PercentileMismatch { .. }));
    }

    #[test]
    fn unknown_and_duplicate_minerals_are_rejected() {
        let err = parse(
            r#"{"composition": {"Fe2SiO4": 1.0}, "time_months": [0], "N": 1,
                "curves": [{"car_level": 95, "guarantee_kg_per_t": [0]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, DataErrorKind::UnknownMineral { .. }));

        let err = parse(
            r#"{"composition": {"CaSiO3": 0.5, "wollastonite": 0.5}, "time_months": [0], "N": 1,
                "curves": [{"car_level": 95, "guarantee_kg_per_t": [0]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, DataErrorKind::DuplicateMineral { .. }));
    }

    #[test]
    fn years_horizon_is_checked_only_for_year_axes() {
        let err = parse(&format!(
            r#"{{ {COMPOSITION}, "time_years": [0, 1], "years": 150, "N": 1,
                 "curves": [{{"car_level": 95, "guarantee_kg_per_t": [0, 1]}}] }}"#
        ))
        .unwrap_err();
        assert!(matches!(err, DataErrorKind::HorizonMismatch { .. }));

        assert!(parse(&format!(
            r#"{{ {COMPOSITION}, "time_months": [0, 1], "years": 150, "N": 1,
                 "curves": [{{"car_level": 95, "guarantee_kg_per_t": [0, 1]}}] }}"#
        ))
        .is_ok());
    }

    #[test]
    fn empty_curve_list_is_rejected() {
        let err = parse(&format!(
            r#"{{ {COMPOSITION}, "time_months": [0], "N": 1, "curves": [] }}"#
        ))
        .unwrap_err();
        assert!(matches!(err, DataErrorKind::NoCurves));
    }
}
