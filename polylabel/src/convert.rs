//! Interopérabilité avec les types `geo`

use geo::{Coord, LineString, MultiPolygon};

use crate::types::{Label, Point, Polygon, Ring};
use crate::{PolylabelError, Solver};

impl From<Coord<f64>> for Point {
    fn from(c: Coord<f64>) -> Self {
        Self::new(c.x, c.y)
    }
}

impl From<geo::Point<f64>> for Point {
    fn from(p: geo::Point<f64>) -> Self {
        Self::new(p.x(), p.y())
    }
}

impl From<Point> for Coord<f64> {
    fn from(p: Point) -> Self {
        Coord { x: p.x, y: p.y }
    }
}

impl From<Point> for geo::Point<f64> {
    fn from(p: Point) -> Self {
        geo::Point::new(p.x, p.y)
    }
}

impl From<&LineString<f64>> for Ring {
    fn from(line: &LineString<f64>) -> Self {
        line.coords().map(|&c| Point::from(c)).collect()
    }
}

impl TryFrom<&geo::Polygon<f64>> for Polygon {
    type Error = PolylabelError;

    fn try_from(polygon: &geo::Polygon<f64>) -> Result<Self, Self::Error> {
        Polygon::new(
            Ring::from(polygon.exterior()),
            polygon.interiors().iter().map(Ring::from).collect(),
        )
    }
}

impl Solver {
    /// Résout directement sur un `geo::Polygon`
    pub fn solve_geo(&self, polygon: &geo::Polygon<f64>) -> Result<Label, PolylabelError> {
        let polygon = Polygon::try_from(polygon)?;
        Ok(self.solve(&polygon))
    }

    /// Résout chaque partie d'un multipolygone et garde la plus grande distance
    ///
    /// À distance égale, la première partie l'emporte. `None` si le
    /// multipolygone est vide.
    pub fn solve_multi(
        &self,
        multi: &MultiPolygon<f64>,
    ) -> Result<Option<Label>, PolylabelError> {
        let mut best: Option<Label> = None;

        for part in &multi.0 {
            let label = self.solve_geo(part)?;
            match best {
                Some(ref b) if label.distance <= b.distance => {}
                _ => best = Some(label),
            }
        }

        Ok(best)
    }
}
