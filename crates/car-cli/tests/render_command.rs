//! `render` and `stones` commands against a temporary results folder.

use std::path::Path;

use clap::Parser;
use tempfile::TempDir;

use car_cli::cli::{Cli, Command, RenderArgs};
use car_cli::commands::{run_render, run_stones};
use car_cli::settings::{OutputFormat, Settings};
use car_cli::summary::stones_table;
use car_model::{ConfidenceLevel, SelectionError, ViewMode};

const BASALT: &str = r#"{
    "composition_name": "Basalt A",
    "composition": {"CaSiO3": 0.4, "MgSiO3": 0.3, "NaAlSi3O8": 0.2, "KAlSi3O8": 0.1},
    "time_years": [0, 50, 100],
    "N": 1000,
    "years": 100,
    "curves": [
        {"car_level": 95, "percentile": 5, "guarantee_kg_per_t": [0, 150, 300]},
        {"car_level": 80, "percentile": 20, "guarantee_kg_per_t": [0, 200, 350]}
    ]
}"#;

fn results_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("A_CAR.json"), BASALT).unwrap();
    std::fs::write(
        dir.path().join("B_CAR.json"),
        BASALT.replace("Basalt A", "Dunite B"),
    )
    .unwrap();
    dir
}

fn render_args(dir: &Path, extra: &[&str]) -> RenderArgs {
    let mut argv = vec!["car-viewer", "render", dir.to_str().unwrap()];
    argv.extend_from_slice(extra);
    match Cli::try_parse_from(argv).unwrap().command {
        Command::Render(args) => args,
        Command::Stones(_) => panic!("expected render"),
    }
}

#[test]
fn parses_repeated_flags() {
    let args = render_args(
        Path::new("results"),
        &[
            "--stone", "A", "--stone", "B", "--level", "95", "--level", "CaR 80%", "--mode",
            "stones-at-one-level", "--metric", "carbon-at-risk", "--format", "svg", "--no-grid",
        ],
    );
    assert_eq!(args.stones.len(), 2);
    assert_eq!(
        args.levels,
        vec![ConfidenceLevel::Car95, ConfidenceLevel::Car80]
    );
    assert!(args.no_grid);
    assert!(Cli::try_parse_from(["car-viewer", "render", "results", "--level", "99"]).is_err());
}

#[test]
fn renders_every_stone_and_default_level_to_file() {
    let dir = results_dir();
    let out = dir.path().join("plot.json");
    let args = render_args(dir.path(), &["--output", out.to_str().unwrap()]);

    let report = run_render(&args, &Settings::default()).unwrap();
    assert_eq!(report.exit_code(), 0);
    assert_eq!(report.selection.mode, ViewMode::AllCombinations);
    assert_eq!(report.selection.levels.len(), 2);

    let json = std::fs::read_to_string(&out).unwrap();
    assert!(json.contains("\"kind\": \"chart\""));
    assert!(json.contains("Dunite B · CaR 80%"));
}

#[test]
fn selection_error_exits_with_one_and_writes_nothing() {
    let dir = results_dir();
    let out = dir.path().join("plot.svg");
    let args = render_args(
        dir.path(),
        &[
            "--mode",
            "stones-at-one-level",
            "--format",
            "svg",
            "--output",
            out.to_str().unwrap(),
        ],
    );

    let report = run_render(&args, &Settings::default()).unwrap();
    assert_eq!(
        report.outcome.as_ref().unwrap_err(),
        &SelectionError::ExpectedSingleLevel {
            mode: ViewMode::StonesAtOneLevel,
            selected: 2,
        }
    );
    assert_eq!(report.exit_code(), 1);
    assert!(!out.exists());
}

#[test]
fn settings_supply_defaults() {
    let dir = results_dir();
    let out = dir.path().join("plot.csv");
    let settings = Settings::from_toml(
        r#"
        [display]
        levels = [95, 90]
        mode = "stones-at-one-level"

        [output]
        format = "csv"
        "#,
    )
    .unwrap();
    let args = render_args(dir.path(), &["--output", out.to_str().unwrap()]);

    let report = run_render(&args, &settings).unwrap();
    assert_eq!(report.format, OutputFormat::Csv);
    assert_eq!(report.exit_code(), 0);
    // 90 is not in the files, so only 95 remains
    assert_eq!(
        report.selection.levels.iter().copied().collect::<Vec<_>>(),
        vec![ConfidenceLevel::Car95]
    );

    let csv = std::fs::read_to_string(&out).unwrap();
    insta::assert_snapshot!(csv, @r"
    stone,level,label,time,guarantee,carbon_at_risk
    A,95,Basalt A,0,0,1000
    A,95,Basalt A,50,150,850
    A,95,Basalt A,100,300,700
    B,95,Dunite B,0,0,1000
    B,95,Dunite B,50,150,850
    B,95,Dunite B,100,300,700
    ");
}

#[test]
fn missing_stone_still_renders() {
    let dir = results_dir();
    let out = dir.path().join("plot.json");
    let args = render_args(
        dir.path(),
        &[
            "--stone", "A", "--stone", "C", "--level", "95", "--output",
            out.to_str().unwrap(),
        ],
    );

    let report = run_render(&args, &Settings::default()).unwrap();
    assert_eq!(report.exit_code(), 0);
    let spec = report.outcome.unwrap();
    assert_eq!(spec.series().len(), 1);
    assert_eq!(spec.issues()[0].stone.as_str(), "C");
}

#[test]
fn only_missing_stones_is_no_data() {
    let dir = results_dir();
    let out = dir.path().join("plot.json");
    let args = render_args(
        dir.path(),
        &["--stone", "Z", "--level", "95", "--output", out.to_str().unwrap()],
    );

    let report = run_render(&args, &Settings::default()).unwrap();
    assert_eq!(report.exit_code(), 1);
    assert!(std::fs::read_to_string(&out).unwrap().contains("no_data"));
}

#[test]
fn missing_results_folder_is_a_startup_error() {
    let dir = TempDir::new().unwrap();
    let args = render_args(&dir.path().join("absent"), &[]);
    let err = run_render(&args, &Settings::default()).unwrap_err();
    assert!(format!("{err:#}").contains("open results folder"));
}

#[test]
fn stones_lists_loaded_and_failed_files() {
    let dir = results_dir();
    std::fs::write(dir.path().join("Broken_CAR.json"), "{").unwrap();
    let cli = Cli::try_parse_from(["car-viewer", "stones", dir.path().to_str().unwrap()]).unwrap();
    let Command::Stones(args) = cli.command else {
        panic!("expected stones");
    };

    let listing = run_stones(&args).unwrap();
    let ids: Vec<_> = listing.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B", "Broken"]);
    assert!(listing[2].1.is_err());

    let table = stones_table(&listing).to_string();
    assert!(table.contains("Basalt A"));
    assert!(table.contains("95, 80"));
    assert!(table.contains("error"));
}
