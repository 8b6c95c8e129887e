//! Recherche du pôle d'inaccessibilité par séparation et évaluation
//!
//! La boîte englobante du contour extérieur est pavée de cellules carrées,
//! explorées par potentiel décroissant. Une cellule n'est subdivisée en quatre
//! que si son potentiel (`d + h·√2`) peut encore battre la meilleure distance
//! connue de plus de `precision`.

use tracing::debug;

use crate::queue::{Cell, CellQueue};
use crate::types::{BoundingBox, Label, Point, Polygon};
use crate::PolylabelError;

/// Précision par défaut, dans l'unité des coordonnées
pub const DEFAULT_PRECISION: f64 = 1.0;

/// Événement de diagnostic émis pendant une résolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProbeEvent {
    /// La meilleure distance connue a augmenté
    Improved { distance: f64, probes: usize },

    /// Fin de la recherche
    Finished { distance: f64, probes: usize },
}

/// Canal de diagnostic injecté dans le solveur
///
/// N'a aucun effet sur le résultat.
pub trait ProbeSink {
    fn record(&mut self, event: ProbeEvent);
}

impl<F: FnMut(ProbeEvent)> ProbeSink for F {
    fn record(&mut self, event: ProbeEvent) {
        self(event)
    }
}

/// Canal muet
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl ProbeSink for NoopSink {
    fn record(&mut self, _event: ProbeEvent) {}
}

/// Canal vers `tracing` (niveau debug)
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ProbeSink for TracingSink {
    fn record(&mut self, event: ProbeEvent) {
        match event {
            ProbeEvent::Improved { distance, probes } => {
                debug!(distance = distance, probes = probes, "Found better cell");
            }
            ProbeEvent::Finished { distance, probes } => {
                debug!(distance = distance, probes = probes, "Search finished");
            }
        }
    }
}

/// Solveur du pôle d'inaccessibilité
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solver {
    precision: f64,
    debug: bool,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            debug: false,
        }
    }
}

impl Solver {
    /// Crée un solveur avec la précision donnée (strictement positive et finie)
    pub fn new(precision: f64) -> Result<Self, PolylabelError> {
        if !precision.is_finite() || precision <= 0.0 {
            return Err(PolylabelError::InvalidPrecision(precision));
        }
        Ok(Self {
            precision,
            debug: false,
        })
    }

    /// Active les diagnostics via `tracing`
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn precision(&self) -> f64 {
        self.precision
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Calcule le point du polygone le plus éloigné de son bord, à `precision` près
    pub fn solve(&self, polygon: &Polygon) -> Label {
        if self.debug {
            self.solve_with_sink(polygon, &mut TracingSink)
        } else {
            self.solve_with_sink(polygon, &mut NoopSink)
        }
    }

    /// Comme [`Solver::solve`], en envoyant les diagnostics au canal fourni
    pub fn solve_with_sink<S: ProbeSink + ?Sized>(&self, polygon: &Polygon, sink: &mut S) -> Label {
        let bbox = polygon.bounding_box();
        let width = bbox.width();
        let height = bbox.height();
        let cell_size = width.min(height);

        // Boîte plate: une seule cellule au centre
        if cell_size <= 0.0 {
            let cell = Cell::new(bbox.center(), 0.0, polygon);
            return finish(cell, 1, sink);
        }

        let h = cell_size / 2.0;
        let columns = (width / cell_size).ceil() as usize;
        let rows = (height / cell_size).ceil() as usize;

        let mut queue = CellQueue::with_capacity(columns * rows);
        for i in 0..columns {
            let x = bbox.min.x + i as f64 * cell_size;
            for j in 0..rows {
                let y = bbox.min.y + j as f64 * cell_size;
                queue.push(Cell::new(Point::new(x + h, y + h), h, polygon));
            }
        }

        let mut best = centroid_cell(polygon, &bbox);
        let mut probes = queue.len();

        while let Some(cell) = queue.pop() {
            if cell.distance > best.distance {
                best = cell;
                sink.record(ProbeEvent::Improved {
                    distance: best.distance,
                    probes,
                });
            }

            if cell.potential - best.distance <= self.precision {
                continue;
            }

            let h = cell.half_size / 2.0;
            let Point { x, y } = cell.center;
            queue.push(Cell::new(Point::new(x - h, y - h), h, polygon));
            queue.push(Cell::new(Point::new(x + h, y - h), h, polygon));
            queue.push(Cell::new(Point::new(x - h, y + h), h, polygon));
            queue.push(Cell::new(Point::new(x + h, y + h), h, polygon));
            probes += 4;
        }

        finish(best, probes, sink)
    }
}

/// Calcule le pôle d'inaccessibilité avec la précision donnée
pub fn polylabel(polygon: &Polygon, precision: f64) -> Result<Label, PolylabelError> {
    Ok(Solver::new(precision)?.solve(polygon))
}

fn finish<S: ProbeSink + ?Sized>(cell: Cell, probes: usize, sink: &mut S) -> Label {
    sink.record(ProbeEvent::Finished {
        distance: cell.distance,
        probes,
    });
    Label {
        point: cell.center,
        distance: cell.distance,
        probes,
    }
}

/// Cellule de taille nulle au centroïde du contour extérieur
///
/// Aire nulle: repli sur le centre de la boîte englobante.
fn centroid_cell(polygon: &Polygon, bbox: &BoundingBox) -> Cell {
    let mut area = 0.0;
    let mut x = 0.0;
    let mut y = 0.0;

    for (a, b) in polygon.exterior().edges() {
        let f = a.x * b.y - b.x * a.y;
        x += (a.x + b.x) * f;
        y += (a.y + b.y) * f;
        area += f * 3.0;
    }

    let center = if area != 0.0 {
        Point::new(x / area, y / area)
    } else {
        bbox.center()
    };

    let center = if center.x.is_finite() && center.y.is_finite() {
        center
    } else {
        bbox.center()
    };

    Cell::new(center, 0.0, polygon)
}
