//! Tests for loading, caching and rejecting result files.

use std::path::Path;
use std::sync::Arc;
use std::thread;

use car_ingest::{RecordLookup, ResultStore};
use car_model::{ConfidenceLevel, DataErrorKind, StoneId};
use tempfile::TempDir;

const BASALT: &str = r#"{
    "composition_name": "Basalt A",
    "composition": {"CaSiO3": 0.40, "MgSiO3": 0.30, "NaAlSi3O8": 0.20, "KAlSi3O8": 0.10},
    "time_months": [0, 12, 24, 36],
    "N": 200,
    "horizon": 36,
    "curves": [
        {"car_level": 95, "percentile": 5, "guarantee_kg_per_t": [0, 100, 180, 240]},
        {"car_level": 90, "percentile": 10, "guarantee_kg_per_t": [0, 110, 195, 260]},
        {"car_level": 85, "percentile": 15, "guarantee_kg_per_t": [0, 118, 205, 275]},
        {"car_level": 80, "percentile": 20, "guarantee_kg_per_t": [0, 125, 214, 288]}
    ]
}"#;

fn write(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).expect("write result file");
}

fn stone(id: &str) -> StoneId {
    StoneId::new(id).unwrap()
}

#[test]
fn missing_stone_fails_while_others_load() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "A_CAR.json", BASALT);
    let store = ResultStore::open(dir.path()).unwrap();

    let err = store.get(&stone("C")).unwrap_err();
    assert_eq!(err.stone, stone("C"));
    assert!(matches!(err.kind, DataErrorKind::SourceMissing { .. }));

    let record = store.get(&stone("A")).expect("A loads");
    assert_eq!(record.name(), "Basalt A");
    assert_eq!(record.levels(), ConfidenceLevel::DESCENDING.to_vec());
}

#[test]
fn cached_record_survives_file_changes() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "A_CAR.json", BASALT);
    let store = ResultStore::open(dir.path()).unwrap();

    let first = store.get(&stone("A")).unwrap();
    write(dir.path(), "A_CAR.json", "not json at all");
    let second = store.get(&stone("A")).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.name(), "Basalt A");
}

#[test]
fn failed_loads_are_retried() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "A_CAR.json", "{ truncated");
    let store = ResultStore::open(dir.path()).unwrap();

    let err = store.get(&stone("A")).unwrap_err();
    assert!(matches!(err.kind, DataErrorKind::Malformed { .. }));
    assert_eq!(store.cached_count(), 0);

    write(dir.path(), "A_CAR.json", BASALT);
    assert!(store.get(&stone("A")).is_ok());
    assert_eq!(store.cached_count(), 1);
}

#[test]
fn invariant_violations_identify_stone_and_violation() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "Sum.json",
        &BASALT.replace("\"KAlSi3O8\": 0.10", "\"KAlSi3O8\": 0.30"),
    );
    write(
        dir.path(),
        "Range_CAR.json",
        &BASALT.replace("[0, 125, 214, 288]", "[0, 125, 214, 1288]"),
    );
    write(
        dir.path(),
        "Order_CAR.json",
        &BASALT.replace("[0, 100, 180, 240]", "[0, 100, 180, 290]"),
    );
    write(
        dir.path(),
        "Axis_CAR.json",
        &BASALT.replace("[0, 12, 24, 36]", "[0, 24, 12, 36]"),
    );
    let store = ResultStore::open(dir.path()).unwrap();

    let sum = store.get(&stone("Sum")).unwrap_err();
    assert!(matches!(sum.kind, DataErrorKind::FractionSum { .. }));

    let range = store.get(&stone("Range")).unwrap_err();
    assert!(matches!(
        range.kind,
        DataErrorKind::GuaranteeOutOfRange { level: ConfidenceLevel::Car80, index: 3, .. }
    ));

    let order = store.get(&stone("Order")).unwrap_err();
    assert!(matches!(
        order.kind,
        DataErrorKind::ConfidenceOrdering { higher: ConfidenceLevel::Car95, .. }
    ));

    let axis = store.get(&stone("Axis")).unwrap_err();
    assert!(matches!(axis.kind, DataErrorKind::NonMonotonicTime { .. }));
    assert!(axis.to_string().starts_with("stone Axis: "));
}

#[test]
fn load_all_reports_each_stone() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "A_CAR.json", BASALT);
    write(dir.path(), "B_CAR.json", "[]");
    let store = ResultStore::open(dir.path()).unwrap();

    let outcomes = store.load_all().unwrap();
    let ids: Vec<_> = outcomes.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B"]);
    assert!(outcomes[0].1.is_ok());
    assert!(outcomes[1].1.is_err());
}

#[test]
fn concurrent_population_yields_one_record() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "A_CAR.json", BASALT);
    let store = Arc::new(ResultStore::open(dir.path()).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || store.lookup(&stone("A")).expect("load A"))
        })
        .collect();
    let records: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("thread"))
        .collect();

    let cached = store.cached(&stone("A")).unwrap();
    assert!(records.iter().all(|record| Arc::ptr_eq(record, &cached)));
    assert_eq!(store.cached_count(), 1);
}
