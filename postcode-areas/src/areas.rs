//! Zones postales: modèle, conversions geo/GeoJSON et placement des étiquettes

use geo::{Coord, LineString};
use polylabel::{Label, Point, Polygon, PolylabelError, Ring, Solver};
use rayon::prelude::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

/// Une zone postale (ex: "AB") avec ses rings en `[lon, lat]`
///
/// Le ring 0 est le contour, les suivants sont des trous. Sérialisée en
/// `[code, rings]` pour rester compatible avec les fichiers JSON existants.
#[derive(Debug, Clone, PartialEq)]
pub struct PostcodeArea {
    pub label: String,
    pub rings: Vec<Vec<[f64; 2]>>,
}

impl PostcodeArea {
    pub fn new(label: impl Into<String>, rings: Vec<Vec<[f64; 2]>>) -> Self {
        Self {
            label: label.into(),
            rings,
        }
    }

    /// Convertit en `geo::Polygon`
    pub fn to_geo(&self) -> geo::Polygon<f64> {
        let mut rings = self.rings.iter().map(|ring| {
            LineString::new(ring.iter().map(|&[x, y]| Coord { x, y }).collect())
        });
        let exterior = rings.next().unwrap_or_else(|| LineString::new(Vec::new()));
        geo::Polygon::new(exterior, rings.collect())
    }

    /// Convertit en polygone du solveur
    pub fn to_polygon(&self) -> Result<Polygon, PolylabelError> {
        Polygon::from_rings(
            self.rings
                .iter()
                .map(|ring| ring.iter().map(|&p| Point::from(p)).collect::<Ring>())
                .collect(),
        )
    }

    /// Calcule la position d'étiquette de la zone
    pub fn label_with(&self, solver: &Solver) -> Result<Label, PolylabelError> {
        Ok(solver.solve(&self.to_polygon()?))
    }
}

impl Serialize for PostcodeArea {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.label, &self.rings).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PostcodeArea {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (label, rings) = <(String, Vec<Vec<[f64; 2]>>)>::deserialize(deserializer)?;
        Ok(Self { label, rings })
    }
}

/// Étiquette placée pour une zone ou une région
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedLabel {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub distance: f64,
    pub probes: usize,
}

impl PlacedLabel {
    pub fn new(name: impl Into<String>, label: &Label) -> Self {
        Self {
            name: name.into(),
            x: label.point.x,
            y: label.point.y,
            distance: label.distance,
            probes: label.probes,
        }
    }
}

/// Place les étiquettes de toutes les zones en parallèle
///
/// Les zones dont le polygone est inexploitable sont écartées et retournées
/// avec leur erreur ; l'ordre des zones est conservé.
pub fn place_labels(
    areas: &[PostcodeArea],
    solver: &Solver,
) -> (Vec<PlacedLabel>, Vec<(String, PolylabelError)>) {
    let results: Vec<_> = areas
        .par_iter()
        .map(|area| (area, area.label_with(solver)))
        .collect();

    let mut labels = Vec::with_capacity(results.len());
    let mut failures = Vec::new();

    for (area, result) in results {
        match result {
            Ok(label) => {
                if label.distance <= 0.0 {
                    warn!(
                        area = %area.label,
                        distance = label.distance,
                        "No interior point found, polygon is probably malformed"
                    );
                }
                labels.push(PlacedLabel::new(&area.label, &label));
            }
            Err(e) => {
                warn!(area = %area.label, error = %e, "Cannot place label");
                failures.push((area.label.clone(), e));
            }
        }
    }

    (labels, failures)
}
