//! Configuration des régions

use serde::{Deserialize, Serialize};
use std::path::Path;

use anyhow::{Context, Result};

/// Liste ordonnée des régions
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegionsConfig {
    pub regions: Vec<RegionConfig>,
}

/// Définition d'une région
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegionConfig {
    /// Nom affiché (ex: "North West England")
    pub name: String,

    /// Codes des zones postales qui composent la région
    pub postcodes: Vec<String>,
}

impl RegionConfig {
    /// Nom de fichier de la région (ex: "north-west-england")
    pub fn basename(&self) -> String {
        kebab_case(&self.name)
    }
}

impl RegionsConfig {
    /// Charge une configuration depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Charge une configuration depuis un preset embarqué
    pub fn from_preset(preset: &str) -> Result<Self> {
        match preset {
            "uk" => Self::load_embedded(include_str!("presets/uk.json")),
            _ => anyhow::bail!("Unknown preset: {}. Use: uk", preset),
        }
    }

    /// Preset embarqué si le nom est connu, sinon chemin vers un fichier JSON
    pub fn resolve(name: &str) -> Result<Self> {
        let path = Path::new(name);
        if path.exists() {
            Self::load(path)
        } else {
            Self::from_preset(name)
        }
    }

    fn load_embedded(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse embedded config")
    }
}

/// Convertit un nom en kebab-case (découpe sur les séparateurs et les changements de casse)
pub fn kebab_case(name: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for c in name.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev = None;
            continue;
        }

        if let Some(p) = prev {
            if p.is_lowercase() && c.is_uppercase() && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        }

        current.extend(c.to_lowercase());
        prev = Some(c);
    }

    if !current.is_empty() {
        words.push(current);
    }

    words.join("-")
}
