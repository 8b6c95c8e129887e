//! Modules d'export (texte plat, JSON, GeoJSON)

pub mod geojson;

use clap::ValueEnum;

/// Format de sortie d'une conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Texte source sans l'enveloppe `pc(...)`
    Flat,
    /// Tableau de `[code, rings]`
    Json,
    /// Objet `code -> Feature`
    Geojson,
}

impl OutputFormat {
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Flat => "flat",
            OutputFormat::Json => "json",
            OutputFormat::Geojson => "geojson",
        }
    }
}
