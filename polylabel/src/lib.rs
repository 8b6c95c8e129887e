//! # polylabel
//!
//! Calcul du pôle d'inaccessibilité d'un polygone : le point intérieur le plus
//! éloigné du bord (centre du plus grand cercle inscrit), à une précision donnée.
//! Sert à placer des étiquettes ou des marqueurs stables sur des zones irrégulières.
//!
//! ## Features
//!
//! - Polygones avec trous (règle pair-impair sur tous les rings)
//! - Recherche best-first sur un quadtree avec borne supérieure admissible
//! - Canal de diagnostic injectable (`ProbeSink`) ou via `tracing`
//! - Types `geo` pour l'interopérabilité avec l'écosystème Rust géospatial
//!
//! ## Usage
//!
//! ```rust
//! use polylabel::{polylabel, Polygon, Ring};
//!
//! let square = Polygon::new(
//!     Ring::from(vec![[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]]),
//!     vec![],
//! )?;
//! let label = polylabel(&square, 0.01)?;
//! assert!((label.distance - 0.5).abs() < 0.01);
//! # Ok::<(), polylabel::PolylabelError>(())
//! ```

pub mod convert;
pub mod distance;
pub mod error;
pub mod queue;
pub mod solver;
pub mod types;

pub use distance::signed_distance;
pub use error::PolylabelError;
pub use solver::{
    polylabel, NoopSink, ProbeEvent, ProbeSink, Solver, TracingSink, DEFAULT_PRECISION,
};
pub use types::{BoundingBox, Label, Point, Polygon, Ring};
