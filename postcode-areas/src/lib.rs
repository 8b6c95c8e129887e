//! # postcode-areas
//!
//! Conversion des polygones de zones postales UK vers JSON/GeoJSON,
//! regroupement en régions et placement des étiquettes.
//!
//! ## Features
//!
//! - Parser du format texte plat (`pc("AB|lat,lon ...")`)
//! - Export flat / JSON / GeoJSON
//! - Union des zones par région (preset `uk` ou fichier JSON)
//! - Étiquettes au pôle d'inaccessibilité (crate `polylabel`)
//!
//! ## Usage CLI
//!
//! ```bash
//! # Chaîne complète src/ -> build/
//! postcode-areas build --src ./src --out ./build
//!
//! # Conversion seule
//! postcode-areas convert --input "src/p/*.js" --output ./geojson --format geojson
//! ```

pub mod areas;
pub mod config;
pub mod export;
pub mod flat;
pub mod pipeline;
pub mod regions;
pub mod report;

pub use areas::{PlacedLabel, PostcodeArea};
pub use config::{RegionConfig, RegionsConfig};
pub use export::OutputFormat;
pub use report::{RunReport, RunStatus};
