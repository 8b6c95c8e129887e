//! Tests d'intégration de la chaîne complète src/ -> build/

use std::path::{Path, PathBuf};

use polylabel::Solver;
use postcode_areas::config::{RegionConfig, RegionsConfig};
use postcode_areas::pipeline;
use postcode_areas::RunStatus;

fn workspace(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("postcode-areas-it-{}", name));
    std::fs::remove_dir_all(&dir).ok();
    std::fs::create_dir_all(dir.join("src").join("p")).unwrap();
    dir
}

/// Carré `lat,lon` au format plat
fn square(label: &str, lon: f64, lat: f64, size: f64) -> String {
    format!(
        "{}|{},{} {},{} {},{} {},{}",
        label,
        lat,
        lon,
        lat + size,
        lon,
        lat + size,
        lon + size,
        lat,
        lon + size
    )
}

fn write_sources(root: &Path) {
    let main = format!(
        "pc(\"{}*{}*{}\")",
        square("AB", 0.0, 0.0, 1.0),
        square("DD", 1.0, 0.0, 1.0),
        square("BT", 10.0, 10.0, 2.0)
    );
    std::fs::write(root.join("src").join("mp.js"), main).unwrap();
    std::fs::write(
        root.join("src").join("p").join("SY.js"),
        format!("pc(\"{}\")", square("SY", 5.0, 5.0, 1.0)),
    )
    .unwrap();
    std::fs::write(
        root.join("src").join("p").join("AB.js"),
        format!("pc(\"{}\")", square("AB1", 0.0, 0.0, 0.5)),
    )
    .unwrap();
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_build_with_uk_preset() {
    let root = workspace("build");
    write_sources(&root);
    let build = root.join("build");

    // fichier résiduel supprimé par le nettoyage
    std::fs::create_dir_all(&build).unwrap();
    std::fs::write(build.join("stale.json"), "{}").unwrap();

    let config = RegionsConfig::from_preset("uk").unwrap();
    let report = pipeline::build(
        &root.join("src"),
        &build,
        &Solver::new(0.01).unwrap(),
        &config,
    )
    .unwrap();

    assert_eq!(report.status, RunStatus::Success);
    assert!(!build.join("stale.json").exists());

    for file in [
        "flat/mp.json",
        "json/mp.json",
        "flat/pc/SY.json",
        "flat/pc/AB.json",
        "json/pc/SY.json",
        "json/pc/AB.json",
    ] {
        assert!(build.join(file).exists(), "{} should exist", file);
    }

    let regions = build.join("regions");
    for file in ["AB.json", "DD.json", "BT.json", "SY.json", "n-ireland.json", "scotland.json", "wales.json"] {
        assert!(regions.join(file).exists(), "regions/{} should exist", file);
    }
    // aucune zone de Londres dans les sources
    assert!(!regions.join("london.json").exists());
    assert_eq!(report.regions_written, 3);

    let scotland = read_json(&regions.join("scotland.json"));
    assert_eq!(scotland["type"], "Feature");
    assert_eq!(scotland["geometry"]["type"], "MultiPolygon");
    let distance = scotland["properties"]["label_distance"].as_f64().unwrap();
    assert!((distance - 0.5).abs() <= 0.01);

    let ireland = read_json(&regions.join("n-ireland.json"));
    let label = ireland["properties"]["label"].as_array().unwrap();
    assert!((label[0].as_f64().unwrap() - 11.0).abs() <= 0.01);
    assert!((label[1].as_f64().unwrap() - 11.0).abs() <= 0.01);

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn test_build_missing_main_source_fails() {
    let root = workspace("build-missing");
    let config = RegionsConfig {
        regions: vec![RegionConfig {
            name: "Only".to_string(),
            postcodes: vec!["AB".to_string()],
        }],
    };

    let report = pipeline::build(
        &root.join("src"),
        &root.join("build"),
        &Solver::default(),
        &config,
    )
    .unwrap();

    assert_eq!(report.status, RunStatus::Failed);
    assert_eq!(report.files_failed, 2);

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn test_labels_command() {
    let root = workspace("labels");
    write_sources(&root);

    let json_dir = root.join("json");
    pipeline::convert(
        &root.join("src").join("mp.js").to_string_lossy(),
        &json_dir,
        postcode_areas::OutputFormat::Json,
    )
    .unwrap();

    let output = root.join("labels.geojson");
    let report = pipeline::labels(
        &[json_dir.join("mp.json")],
        &output,
        &Solver::new(0.01).unwrap(),
    )
    .unwrap();

    assert_eq!(report.labels_placed, 3);
    let collection = read_json(&output);
    assert_eq!(collection["type"], "FeatureCollection");
    assert_eq!(collection["features"].as_array().unwrap().len(), 3);
    assert_eq!(collection["features"][2]["properties"]["name"], "BT");

    std::fs::remove_dir_all(&root).ok();
}
