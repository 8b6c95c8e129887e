//! Chaîne de traitement: conversion des sources, régions et étiquettes
//!
//! Chaque étape alimente un [`RunReport`]. Une source illisible est
//! enregistrée en erreur et n'interrompt pas le run; seules les erreurs
//! d'écriture remontent à l'appelant.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use polylabel::Solver;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::areas::{place_labels, PostcodeArea};
use crate::config::RegionsConfig;
use crate::export::geojson::{areas_to_geojson, labels_collection, write_json, write_text};
use crate::export::OutputFormat;
use crate::flat;
use crate::regions::{generate_regions, RegionOutcome};
use crate::report::{ErrorLevel, RunError, RunReport};

/// Résultat de la conversion d'un fichier source
#[derive(Debug, Clone)]
pub struct ConvertOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub areas: usize,
}

/// Chemin de sortie: `<output_dir>/<stem>.json`
pub fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");
    output_dir.join(format!("{}.json", stem))
}

/// Convertit un fichier au format plat vers `format`
pub fn convert_file(input: &Path, output_dir: &Path, format: OutputFormat) -> Result<ConvertOutcome> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Cannot read {}", input.display()))?;
    let areas =
        flat::parse(&text).with_context(|| format!("Failed to parse {}", input.display()))?;

    let output = output_path(input, output_dir);
    match format {
        OutputFormat::Flat => write_text(&output, &flat::strip_wrapper(&text))?,
        OutputFormat::Json => write_json(&output, &areas)?,
        OutputFormat::Geojson => write_json(&output, &areas_to_geojson(&areas))?,
    }

    debug!(
        input = %input.display(),
        output = %output.display(),
        areas = areas.len(),
        format = format.name(),
        "Converted"
    );

    Ok(ConvertOutcome {
        input: input.to_path_buf(),
        output,
        areas: areas.len(),
    })
}

/// Liste triée des fichiers correspondant au motif glob
pub fn collect_sources(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = glob::glob(pattern)
        .with_context(|| format!("Invalid glob pattern: {}", pattern))?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(error = %e, "Unreadable path skipped");
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();

    paths.sort();
    Ok(paths)
}

/// Convertit des sources en parallèle et consigne le résultat dans le rapport
pub fn convert_all(
    sources: &[PathBuf],
    output_dir: &Path,
    format: OutputFormat,
    report: &mut RunReport,
) {
    let results: Vec<_> = sources
        .par_iter()
        .map(|path| (path, convert_file(path, output_dir, format)))
        .collect();

    for (path, result) in results {
        match result {
            Ok(outcome) => report.record_file(format.name(), outcome.areas),
            Err(e) => {
                let message = format!("{:#}", e);
                warn!(path = %path.display(), error = %message, "Conversion failed");
                report.record_file_failure(&path.display().to_string(), &message);
            }
        }
    }
}

/// Charge et concatène des fichiers JSON `[[code, rings], ...]`
pub fn load_areas(paths: &[PathBuf]) -> Result<Vec<PostcodeArea>> {
    let mut areas = Vec::new();
    for path in paths {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read {}", path.display()))?;
        let mut chunk: Vec<PostcodeArea> = serde_json::from_str(&content)
            .with_context(|| format!("Invalid area JSON in {}", path.display()))?;
        areas.append(&mut chunk);
    }
    Ok(areas)
}

fn record_regions(report: &mut RunReport, outcomes: &[RegionOutcome]) {
    for outcome in outcomes {
        report.record_region();
        report.record_labels(outcome.labels.len());

        for label in outcome.labels.iter().filter(|l| l.distance <= 0.0) {
            report.record_error(RunError::area(
                ErrorLevel::Warning,
                &label.name,
                format!("label outside polygon (distance {})", label.distance),
            ));
        }
        for (name, message) in &outcome.failures {
            report.record_error(RunError::area(ErrorLevel::Error, name, message.clone()));
        }
    }
}

/// Conversion d'un ensemble de fichiers (`convert`)
pub fn convert(pattern: &str, output: &Path, format: OutputFormat) -> Result<RunReport> {
    let start = Instant::now();
    let mut report = RunReport::new("convert");

    let sources = collect_sources(pattern)?;
    if sources.is_empty() {
        anyhow::bail!("No source file matches {}", pattern);
    }

    info!(files = sources.len(), format = format.name(), "Converting");
    convert_all(&sources, output, format, &mut report);

    report.set_duration(start.elapsed());
    report.finalize();
    Ok(report)
}

/// Génération des régions depuis des fichiers JSON (`regions`)
pub fn regions(
    inputs: &[PathBuf],
    output: &Path,
    solver: &Solver,
    config: &RegionsConfig,
) -> Result<RunReport> {
    let start = Instant::now();
    let mut report = RunReport::new("regions");

    let areas = load_areas(inputs)?;
    let outcomes = generate_regions(&areas, config, solver, output)?;
    record_regions(&mut report, &outcomes);

    report.set_duration(start.elapsed());
    report.finalize();
    Ok(report)
}

/// Étiquettes de toutes les zones en FeatureCollection (`labels`)
pub fn labels(inputs: &[PathBuf], output: &Path, solver: &Solver) -> Result<RunReport> {
    let start = Instant::now();
    let mut report = RunReport::new("labels");

    let areas = load_areas(inputs)?;
    let (placed, failures) = place_labels(&areas, solver);

    for label in placed.iter().filter(|l| l.distance <= 0.0) {
        report.record_error(RunError::area(
            ErrorLevel::Warning,
            &label.name,
            format!("label outside polygon (distance {})", label.distance),
        ));
    }
    for (name, e) in failures {
        report.record_error(RunError::area(ErrorLevel::Error, &name, e.to_string()));
    }

    write_json(output, &labels_collection(&placed))?;
    report.record_labels(placed.len());
    info!(labels = placed.len(), output = %output.display(), "Labels written");

    report.set_duration(start.elapsed());
    report.finalize();
    Ok(report)
}

/// Chaîne complète depuis `src/` vers `build/`
///
/// 1. nettoie `build/`
/// 2. convertit `mp.js` et `p/*.js` en `flat/` et `json/`
/// 3. génère `regions/` depuis `json/mp.json` et `json/pc/SY.json`
pub fn build(src: &Path, build: &Path, solver: &Solver, config: &RegionsConfig) -> Result<RunReport> {
    let start = Instant::now();
    let mut report = RunReport::new("build");

    if build.exists() {
        std::fs::remove_dir_all(build)
            .with_context(|| format!("Failed to clean {}", build.display()))?;
        debug!(path = %build.display(), "Build directory cleaned");
    }

    let main_source = vec![src.join("mp.js")];
    let pattern = src.join("p").join("*.js");
    let postcode_sources = collect_sources(&pattern.to_string_lossy())?;

    info!(
        src = %src.display(),
        postcode_files = postcode_sources.len(),
        "Starting build"
    );

    for format in [OutputFormat::Flat, OutputFormat::Json] {
        let dir = build.join(format.name());
        convert_all(&main_source, &dir, format, &mut report);
        convert_all(&postcode_sources, &dir.join("pc"), format, &mut report);
    }

    let json_dir = build.join("json");
    let mut inputs = vec![json_dir.join("mp.json")];
    let sy = json_dir.join("pc").join("SY.json");
    if sy.exists() {
        inputs.push(sy);
    } else {
        warn!(path = %sy.display(), "SY areas not found, regions built without them");
    }

    match load_areas(&inputs) {
        Ok(areas) => {
            let outcomes = generate_regions(&areas, config, solver, &build.join("regions"))?;
            record_regions(&mut report, &outcomes);
        }
        Err(e) => report.record_error(RunError::file(
            ErrorLevel::Fatal,
            "json/mp.json",
            format!("{:#}", e),
        )),
    }

    report.set_duration(start.elapsed());
    report.finalize();
    info!(summary = %report.summary(), "Build finished");

    Ok(report)
}
