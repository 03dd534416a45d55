//! Command handlers run against a small trade table on disk.

use std::fs;
use std::path::{Path, PathBuf};

use econ_cli::indexes::{self, IndexesArgs};
use econ_cli::input::InputArgs;
use econ_cli::product_space::{self, ProductSpaceArgs};
use econ_common::config::Config;

const TRADE_CSV: &str = "\
year,exporter,hs4,export_val
2020,A,P1,100
2020,B,P1,60
2020,B,P2,40
2020,C,P2,40
2020,C,P3,60
";

fn write_input(dir: &Path) -> PathBuf {
    let path = dir.join("trade.csv");
    fs::write(&path, TRADE_CSV).unwrap();
    path
}

fn input_args(input: PathBuf) -> InputArgs {
    InputArgs {
        input,
        country_col: Some("exporter".into()),
        product_col: Some("hs4".into()),
        value_col: Some("export_val".into()),
        m_cp_thresh: None,
    }
}

#[test]
fn test_indexes_command_writes_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let args = IndexesArgs {
        input: input_args(write_input(dir.path())),
        output: Some(out.clone()),
        matrices: true,
        top: 2,
    };

    let summary = indexes::run(&args, &Config::default()).unwrap();
    assert_eq!(summary.countries, 3);
    assert_eq!(summary.products, 3);
    assert_eq!(summary.top_countries.len(), 2);
    assert_eq!(summary.top_countries[0].label, "C");

    let eci = fs::read_to_string(out.join("eci.csv")).unwrap();
    assert!(eci.starts_with("exporter,eci\n"));
    assert_eq!(eci.lines().count(), 4);

    let proximity = fs::read_to_string(out.join("proximity.csv")).unwrap();
    assert!(proximity.starts_with("hs4,P1,P2,P3\n"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("summary.json")).unwrap()).unwrap();
    assert_eq!(json["countries"], 3);
    assert_eq!(json["files"].as_array().unwrap().len(), 9);
}

#[test]
fn test_indexes_command_reports_missing_column() {
    let dir = tempfile::tempdir().unwrap();
    let mut input = input_args(write_input(dir.path()));
    input.value_col = None;
    let args = IndexesArgs {
        input,
        output: Some(dir.path().join("out")),
        matrices: false,
        top: 5,
    };

    let err = indexes::run(&args, &Config::default()).unwrap_err();
    assert!(format!("{err:#}").contains("export"));
}

#[test]
fn test_product_space_command_exports_graphs() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("graphs");
    let args = ProductSpaceArgs {
        input: input_args(write_input(dir.path())),
        edge_weight_thresh: Some(0.0),
        output: Some(out.clone()),
        complete: true,
        with_indexes: true,
    };

    let summary = product_space::run(&args, &Config::default()).unwrap();
    let names: Vec<&str> = summary.graphs.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["complete", "maxst", "product_space"]);
    assert_eq!(summary.graphs[1].edges, 2);
    // Threshold 0 keeps every pair.
    assert_eq!(summary.graphs[2].edges, summary.graphs[0].edges);

    let nodes = fs::read_to_string(out.join("product_space_nodes.csv")).unwrap();
    assert!(nodes.starts_with("id,name,pci,ubiquity\n"));
    assert!(out.join("product_space.json").exists());
}

#[test]
fn test_product_space_rejects_bad_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let args = ProductSpaceArgs {
        input: input_args(write_input(dir.path())),
        edge_weight_thresh: Some(1.5),
        output: Some(dir.path().join("graphs")),
        complete: false,
        with_indexes: false,
    };
    assert!(product_space::run(&args, &Config::default()).is_err());
}
