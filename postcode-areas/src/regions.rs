//! Regroupement des zones postales en régions

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use geo::{BooleanOps, MultiPolygon};
use polylabel::Solver;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::areas::{PlacedLabel, PostcodeArea};
use crate::config::{RegionConfig, RegionsConfig};
use crate::export::geojson::{area_feature, feature, write_json};

/// Une région construite: union des zones postales présentes
#[derive(Debug, Clone)]
pub struct Region<'a> {
    pub name: String,
    pub basename: String,
    pub members: Vec<&'a PostcodeArea>,
    pub geometry: MultiPolygon<f64>,
}

/// Résultat de l'écriture d'une région
#[derive(Debug, Clone, Default)]
pub struct RegionOutcome {
    pub name: String,
    pub files_written: usize,
    pub labels: Vec<PlacedLabel>,
    pub failures: Vec<(String, String)>,
}

/// Index `code -> zone`; en cas de doublon la dernière zone l'emporte
pub fn index_areas(areas: &[PostcodeArea]) -> HashMap<&str, &PostcodeArea> {
    areas.iter().map(|a| (a.label.as_str(), a)).collect()
}

/// Construit une région depuis sa définition, `None` si aucune zone n'est présente
pub fn build_region<'a>(
    config: &RegionConfig,
    index: &HashMap<&str, &'a PostcodeArea>,
) -> Option<Region<'a>> {
    let members: Vec<&PostcodeArea> = config
        .postcodes
        .iter()
        .filter_map(|code| index.get(code.as_str()).copied())
        .collect();

    let mut members_iter = members.iter();
    let first = members_iter.next()?;

    let geometry = members_iter.fold(MultiPolygon::new(vec![first.to_geo()]), |combined, area| {
        combined.union(&MultiPolygon::new(vec![area.to_geo()]))
    });

    Some(Region {
        name: config.name.clone(),
        basename: config.basename(),
        members,
        geometry,
    })
}

/// Écrit une région: un fichier par zone puis le fichier de la région
fn write_region(region: &Region<'_>, solver: &Solver, output: &Path) -> Result<RegionOutcome> {
    let mut outcome = RegionOutcome {
        name: region.name.clone(),
        ..Default::default()
    };

    for area in &region.members {
        let label = match area.label_with(solver) {
            Ok(label) => {
                outcome.labels.push(PlacedLabel::new(&area.label, &label));
                Some(label)
            }
            Err(e) => {
                warn!(area = %area.label, error = %e, "Cannot place label");
                outcome.failures.push((area.label.clone(), e.to_string()));
                None
            }
        };

        let path = output.join(format!("{}.json", area.label));
        write_json(&path, &area_feature(area, label.as_ref()))?;
        outcome.files_written += 1;
    }

    let label = match solver.solve_multi(&region.geometry) {
        Ok(Some(label)) => {
            outcome.labels.push(PlacedLabel::new(&region.name, &label));
            Some(label)
        }
        Ok(None) => None,
        Err(e) => {
            warn!(region = %region.name, error = %e, "Cannot place region label");
            outcome.failures.push((region.name.clone(), e.to_string()));
            None
        }
    };

    let path = output.join(format!("{}.json", region.basename));
    write_json(
        &path,
        &feature(geojson::Value::from(&region.geometry), label.as_ref()),
    )?;
    outcome.files_written += 1;

    debug!(
        region = %region.name,
        members = region.members.len(),
        parts = region.geometry.0.len(),
        "Region written"
    );

    Ok(outcome)
}

/// Génère toutes les régions de la configuration dans `output`
///
/// Les régions sans aucune zone présente sont ignorées avec un warning.
pub fn generate_regions(
    areas: &[PostcodeArea],
    config: &RegionsConfig,
    solver: &Solver,
    output: &Path,
) -> Result<Vec<RegionOutcome>> {
    std::fs::create_dir_all(output)
        .context(format!("Failed to create directory: {}", output.display()))?;

    let index = index_areas(areas);

    let outcomes = config
        .regions
        .par_iter()
        .filter_map(|region_config| match build_region(region_config, &index) {
            Some(region) => Some(region),
            None => {
                warn!(region = %region_config.name, "No postcode area found, region skipped");
                None
            }
        })
        .map(|region| {
            write_region(&region, solver, output)
                .with_context(|| format!("Failed to write region {}", region.name))
        })
        .collect::<Result<Vec<_>>>()?;

    info!(
        regions = outcomes.len(),
        files = outcomes.iter().map(|o| o.files_written).sum::<usize>(),
        "Regions generated"
    );

    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area;

    fn square(label: &str, x: f64, y: f64, size: f64) -> PostcodeArea {
        PostcodeArea::new(
            label,
            vec![vec![
                [x, y],
                [x, y + size],
                [x + size, y + size],
                [x + size, y],
                [x, y],
            ]],
        )
    }

    fn region(name: &str, postcodes: &[&str]) -> RegionConfig {
        RegionConfig {
            name: name.to_string(),
            postcodes: postcodes.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_build_region_unions_adjacent_areas() {
        let areas = vec![square("AA", 0.0, 0.0, 1.0), square("BB", 1.0, 0.0, 1.0)];
        let index = index_areas(&areas);

        let built = build_region(&region("Test Region", &["AA", "BB", "ZZ"]), &index).unwrap();
        assert_eq!(built.basename, "test-region");
        assert_eq!(built.members.len(), 2);
        assert_eq!(built.geometry.0.len(), 1);
        assert!((built.geometry.unsigned_area() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_build_region_without_members() {
        let areas = vec![square("AA", 0.0, 0.0, 1.0)];
        let index = index_areas(&areas);
        assert!(build_region(&region("Empty", &["ZZ"]), &index).is_none());
    }

    #[test]
    fn test_index_last_duplicate_wins() {
        let areas = vec![square("SY", 0.0, 0.0, 1.0), square("SY", 5.0, 5.0, 2.0)];
        let index = index_areas(&areas);
        assert_eq!(index["SY"].rings[0][0], [5.0, 5.0]);
    }

    #[test]
    fn test_generate_regions_writes_files() {
        let output = std::env::temp_dir().join("postcode-areas-test-regions");
        std::fs::remove_dir_all(&output).ok();

        let areas = vec![
            square("AA", 0.0, 0.0, 1.0),
            square("BB", 1.0, 0.0, 1.0),
            square("CC", 10.0, 10.0, 4.0),
        ];
        let config = RegionsConfig {
            regions: vec![
                region("First Region", &["AA", "BB"]),
                region("Second", &["CC"]),
                region("Missing", &["ZZ"]),
            ],
        };

        let outcomes =
            generate_regions(&areas, &config, &Solver::new(0.01).unwrap(), &output).unwrap();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].name, "First Region");
        assert_eq!(outcomes[0].files_written, 3);

        for file in ["AA.json", "BB.json", "CC.json", "first-region.json", "second.json"] {
            assert!(output.join(file).exists(), "{} should exist", file);
        }
        assert!(!output.join("missing.json").exists());

        let region: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(output.join("first-region.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(region["type"], "Feature");
        let distance = region["properties"]["label_distance"].as_f64().unwrap();
        assert!((distance - 0.5).abs() <= 0.01);

        std::fs::remove_dir_all(&output).ok();
    }
}
