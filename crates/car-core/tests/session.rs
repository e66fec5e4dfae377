//! End-to-end selection handling over a results directory.

use std::path::Path;

use car_core::{Session, run_pipeline};
use car_ingest::ResultStore;
use car_model::{ConfidenceLevel, Selection, SelectionError, StoneId, ViewMode};
use car_report::{PlotSpec, RenderOptions};
use tempfile::TempDir;

use ConfidenceLevel::{Car80, Car90, Car95};

fn result_file(name: &str, scale: f64) -> String {
    let values = |base: [f64; 3]| {
        base.iter()
            .map(|v| (v * scale).to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        r#"{{
            "composition_name": "{name}",
            "composition": {{"CaSiO3": 0.25, "MgSiO3": 0.25, "NaAlSi3O8": 0.25, "KAlSi3O8": 0.25}},
            "time_years": [0, 50, 100],
            "N": 500,
            "years": 100,
            "curves": [
                {{"car_level": 95, "percentile": 5, "guarantee_kg_per_t": [{}]}},
                {{"car_level": 90, "percentile": 10, "guarantee_kg_per_t": [{}]}},
                {{"car_level": 80, "percentile": 20, "guarantee_kg_per_t": [{}]}}
            ]
        }}"#,
        values([0.0, 100.0, 200.0]),
        values([0.0, 120.0, 230.0]),
        values([0.0, 140.0, 260.0]),
    )
}

fn results_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "A_CAR.json", &result_file("Basalt A", 1.0));
    write(dir.path(), "B_CAR.json", &result_file("Dunite B", 2.0));
    dir
}

fn write(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).unwrap();
}

fn stones(ids: &[&str]) -> Vec<StoneId> {
    ids.iter().map(|id| StoneId::new(*id).unwrap()).collect()
}

#[test]
fn pipeline_renders_resolved_pairs_in_order() {
    let dir = results_dir();
    let store = ResultStore::open(dir.path()).unwrap();
    let selection = Selection::new(stones(&["B", "A"]), [Car80, Car95], ViewMode::AllCombinations);

    let spec = run_pipeline(&store, &selection, &RenderOptions::default()).unwrap();
    let order: Vec<_> = spec
        .series()
        .iter()
        .map(|s| (s.stone.as_str(), s.level))
        .collect();
    assert_eq!(
        order,
        vec![("A", Car95), ("A", Car80), ("B", Car95), ("B", Car80)]
    );
    assert_eq!(store.cached_count(), 2);
}

#[test]
fn missing_stone_leaves_other_series() {
    let dir = results_dir();
    let store = ResultStore::open(dir.path()).unwrap();
    let selection = Selection::new(stones(&["A", "C"]), [Car95], ViewMode::StonesAtOneLevel);

    let spec = run_pipeline(&store, &selection, &RenderOptions::default()).unwrap();
    assert_eq!(spec.series().len(), 1);
    assert_eq!(spec.series()[0].label, "Basalt A");
    assert_eq!(spec.issues().len(), 1);
    assert_eq!(spec.issues()[0].stone.as_str(), "C");
}

#[test]
fn selection_error_reads_no_files() {
    let dir = results_dir();
    let store = ResultStore::open(dir.path()).unwrap();
    let selection = Selection::new(stones(&["A", "B"]), [Car95, Car90], ViewMode::StonesAtOneLevel);

    let err = run_pipeline(&store, &selection, &RenderOptions::default()).unwrap_err();
    assert!(matches!(err, SelectionError::ExpectedSingleLevel { selected: 2, .. }));
    assert_eq!(store.cached_count(), 0);
}

#[test]
fn session_keeps_previous_plot_after_selection_error() {
    let dir = results_dir();
    let store = ResultStore::open(dir.path()).unwrap();
    let mut session = Session::new(store, RenderOptions::default());
    assert!(session.current().is_none());

    let good = Selection::new(stones(&["A"]), [Car95, Car90], ViewMode::LevelsAtOneStone);
    let rendered = session.apply(&good).unwrap().clone();
    assert_eq!(rendered.series().len(), 2);

    let bad = Selection::new(stones(&[]), [Car95], ViewMode::StonesAtOneLevel);
    assert_eq!(session.apply(&bad), Err(SelectionError::NoStonesSelected));
    assert_eq!(session.current(), Some(&rendered));
}

#[test]
fn session_replaces_plot_with_placeholder() {
    let dir = results_dir();
    let store = ResultStore::open(dir.path()).unwrap();
    let mut session = Session::new(store, RenderOptions::default());

    let good = Selection::new(stones(&["A"]), [Car95], ViewMode::AllCombinations);
    session.apply(&good).unwrap();

    let missing = Selection::new(stones(&["Z"]), [Car95], ViewMode::AllCombinations);
    let spec = session.apply(&missing).unwrap();
    assert!(matches!(spec, PlotSpec::NoData(_)));
    assert!(session.current().is_some_and(PlotSpec::is_no_data));
}
