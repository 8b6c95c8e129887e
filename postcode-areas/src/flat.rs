//! Parser pour le format texte "plat" des zones postales
//!
//! Format: `pc("AB|57.1,-2.1 57.2,-2.2^57.3,-2.3 ...*AL|...")`
//! - entrées séparées par `*`, chacune `code|coordonnées`
//! - rings séparés par `^` (le premier est le contour, les suivants des trous)
//! - points séparés par un espace, chacun `lat,lon`

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::areas::PostcodeArea;

/// Erreurs de parsing du format plat
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FlatError {
    /// Entrée sans séparateur `|`
    #[error("Missing '|' separator in entry {index}")]
    MissingSeparator { index: usize },

    /// Coordonnée illisible
    #[error("Invalid coordinate '{value}' in {label}")]
    InvalidCoordinate { label: String, value: String },

    /// Ring sans aucun point
    #[error("Empty ring {ring} in {label}")]
    EmptyRing { label: String, ring: usize },
}

fn wrapper() -> &'static Regex {
    static WRAPPER: OnceLock<Regex> = OnceLock::new();
    WRAPPER.get_or_init(|| Regex::new(r"(?i)^pc\(|\)$").expect("wrapper pattern is valid"))
}

/// Supprime l'enveloppe `pc(...)` autour du contenu
pub fn strip_wrapper(text: &str) -> String {
    wrapper().replace_all(text.trim(), "").into_owned()
}

/// Parse un fichier complet (enveloppe `pc(...)` optionnelle)
pub fn parse(text: &str) -> Result<Vec<PostcodeArea>, FlatError> {
    let body = strip_wrapper(text);
    let body = body.trim().trim_matches('"');

    if body.is_empty() {
        return Ok(Vec::new());
    }

    body.split('*')
        .enumerate()
        .map(|(index, entry)| parse_entry(index, entry))
        .collect()
}

/// Parse une entrée `code|rings`
fn parse_entry(index: usize, entry: &str) -> Result<PostcodeArea, FlatError> {
    let sep = memchr::memchr(b'|', entry.as_bytes())
        .ok_or(FlatError::MissingSeparator { index })?;

    let label = entry[..sep].trim();
    let rings = entry[sep + 1..]
        .split('^')
        .enumerate()
        .map(|(ring, text)| parse_ring(label, ring, text))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PostcodeArea::new(label, rings))
}

/// Parse un ring et le ferme en répétant le premier point
fn parse_ring(label: &str, index: usize, text: &str) -> Result<Vec<[f64; 2]>, FlatError> {
    let mut ring = text
        .split(' ')
        .filter(|s| !s.is_empty())
        .map(|pair| parse_point(label, pair))
        .collect::<Result<Vec<_>, _>>()?;

    let Some(&first) = ring.first() else {
        return Err(FlatError::EmptyRing {
            label: label.to_string(),
            ring: index,
        });
    };
    ring.push(first);

    Ok(ring)
}

/// Parse un point `lat,lon` et le retourne en `[lon, lat]`
#[inline]
fn parse_point(label: &str, pair: &str) -> Result<[f64; 2], FlatError> {
    let invalid = || FlatError::InvalidCoordinate {
        label: label.to_string(),
        value: pair.to_string(),
    };

    let (lat, lon) = pair.split_once(',').ok_or_else(invalid)?;
    let lat: f64 = fast_float::parse(lat.trim()).map_err(|_| invalid())?;
    let lon: f64 = fast_float::parse(lon.trim()).map_err(|_| invalid())?;

    Ok([lon, lat])
}
