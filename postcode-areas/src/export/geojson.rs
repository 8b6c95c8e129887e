//! Écriture des sorties JSON / GeoJSON

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue};
use polylabel::Label;
use serde::Serialize;

use crate::areas::{PlacedLabel, PostcodeArea};

/// Écrit une valeur sérialisable en JSON compact
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file =
        File::create(path).context(format!("Failed to create file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value)?;
    writer.flush()?;

    Ok(())
}

/// Écrit un texte brut
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content).context(format!("Failed to write file: {}", path.display()))
}

/// Feature GeoJSON, avec la position d'étiquette en propriété si fournie
pub fn feature(value: geojson::Value, label: Option<&Label>) -> Feature {
    let mut properties = JsonObject::new();
    if let Some(label) = label {
        properties.insert(
            "label".to_string(),
            JsonValue::from(vec![label.point.x, label.point.y]),
        );
        properties.insert("label_distance".to_string(), JsonValue::from(label.distance));
    }

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Feature Polygon d'une zone postale
pub fn area_feature(area: &PostcodeArea, label: Option<&Label>) -> Feature {
    feature(geojson::Value::from(&area.to_geo()), label)
}

/// Objet `code -> Feature` pour un ensemble de zones
pub fn areas_to_geojson(areas: &[PostcodeArea]) -> JsonObject {
    areas
        .iter()
        .map(|area| {
            let value = serde_json::to_value(area_feature(area, None))
                .unwrap_or(JsonValue::Null);
            (area.label.clone(), value)
        })
        .collect()
}

/// FeatureCollection de points, une par étiquette
pub fn labels_collection(labels: &[PlacedLabel]) -> FeatureCollection {
    let features = labels
        .iter()
        .map(|l| {
            let mut properties = JsonObject::new();
            properties.insert("name".to_string(), JsonValue::from(l.name.clone()));
            properties.insert("distance".to_string(), JsonValue::from(l.distance));

            Feature {
                bbox: None,
                geometry: Some(Geometry::new(geojson::Value::Point(vec![l.x, l.y]))),
                id: Some(geojson::feature::Id::String(l.name.clone())),
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
