//! Types d'erreurs pour le crate polylabel

use thiserror::Error;

/// Erreurs pouvant survenir lors de la construction d'un polygone ou d'un solveur
///
/// Le calcul lui-même ne peut pas échouer : seules les entrées syntaxiquement
/// invalides sont rejetées en amont.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolylabelError {
    /// Polygone sans aucun ring
    #[error("Polygon has no rings")]
    NoRings,

    /// Ring sans aucun point
    #[error("Ring {index} has no points")]
    EmptyRing { index: usize },

    /// Coordonnée NaN ou infinie
    #[error("Non-finite coordinate in ring {ring} at point {point}")]
    NonFiniteCoordinate { ring: usize, point: usize },

    /// Précision nulle, négative ou non finie
    #[error("Precision must be a finite positive number, got {0}")]
    InvalidPrecision(f64),
}
