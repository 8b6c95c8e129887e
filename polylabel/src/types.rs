//! Types de données pour le crate polylabel

use crate::PolylabelError;

/// Point 2D
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance euclidienne vers un autre point
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Boucle fermée de points
///
/// Le dernier point est implicitement relié au premier ; répéter le premier
/// point en fin de ring est accepté (l'arête de fermeture est alors dégénérée).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ring(Vec<Point>);

impl Ring {
    pub fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    pub fn points(&self) -> &[Point] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Itère sur les arêtes `(ring[i], ring[i - 1])`, en bouclant sur le dernier point
    ///
    /// Un ring d'un seul point produit une unique arête dégénérée.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.0.len();
        (0..n).map(move |i| (self.0[i], self.0[(i + n - 1) % n]))
    }

    /// Boîte englobante, `None` pour un ring vide
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = *self.0.first()?;
        let mut bbox = BoundingBox {
            min: first,
            max: first,
        };

        for p in &self.0[1..] {
            bbox.min.x = bbox.min.x.min(p.x);
            bbox.min.y = bbox.min.y.min(p.y);
            bbox.max.x = bbox.max.x.max(p.x);
            bbox.max.y = bbox.max.y.max(p.y);
        }

        Some(bbox)
    }
}

impl FromIterator<Point> for Ring {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<[f64; 2]>> for Ring {
    fn from(coords: Vec<[f64; 2]>) -> Self {
        coords.into_iter().map(Point::from).collect()
    }
}

/// Boîte englobante alignée sur les axes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }
}

/// Polygone avec trous éventuels
///
/// Le ring 0 est le contour extérieur, les suivants sont des trous.
/// Seules les préconditions syntaxiques sont vérifiées (au moins un ring,
/// aucun ring vide, coordonnées finies) : l'imbrication des trous et
/// l'absence d'auto-intersection restent à la charge de l'appelant.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    rings: Vec<Ring>,
}

impl Polygon {
    /// Construit un polygone depuis un contour extérieur et ses trous
    pub fn new(exterior: Ring, interiors: Vec<Ring>) -> Result<Self, PolylabelError> {
        let mut rings = Vec::with_capacity(interiors.len() + 1);
        rings.push(exterior);
        rings.extend(interiors);
        Self::from_rings(rings)
    }

    /// Construit un polygone depuis une liste de rings (extérieur en premier)
    pub fn from_rings(rings: Vec<Ring>) -> Result<Self, PolylabelError> {
        if rings.is_empty() {
            return Err(PolylabelError::NoRings);
        }

        for (index, ring) in rings.iter().enumerate() {
            if ring.is_empty() {
                return Err(PolylabelError::EmptyRing { index });
            }
            if let Some(point) = ring.points().iter().position(|p| !p.is_finite()) {
                return Err(PolylabelError::NonFiniteCoordinate { ring: index, point });
            }
        }

        Ok(Self { rings })
    }

    /// Contour extérieur (ring 0)
    pub fn exterior(&self) -> &Ring {
        &self.rings[0]
    }

    /// Trous (rings 1..)
    pub fn interiors(&self) -> &[Ring] {
        &self.rings[1..]
    }

    /// Tous les rings, extérieur en premier
    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    /// Boîte englobante du contour extérieur
    pub fn bounding_box(&self) -> BoundingBox {
        // from_rings garantit un contour extérieur non vide
        self.exterior().bounding_box().unwrap_or(BoundingBox {
            min: Point::default(),
            max: Point::default(),
        })
    }
}

/// Résultat d'une résolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Label {
    /// Point trouvé
    pub point: Point,

    /// Distance signée du point au bord (négative si hors du polygone)
    pub distance: f64,

    /// Nombre de cellules évaluées (diagnostic)
    pub probes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Ring {
        Ring::from(vec![[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]])
    }

    #[test]
    fn test_edges_wrap_around() {
        let edges: Vec<_> = square().edges().collect();
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[0], (Point::new(0.0, 0.0), Point::new(1.0, 0.0)));
        assert_eq!(edges[1], (Point::new(0.0, 1.0), Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_single_point_ring_has_degenerate_edge() {
        let ring = Ring::from(vec![[2.0, 3.0]]);
        let edges: Vec<_> = ring.edges().collect();
        assert_eq!(edges, vec![(Point::new(2.0, 3.0), Point::new(2.0, 3.0))]);
    }

    #[test]
    fn test_bounding_box() {
        let ring = Ring::from(vec![[1.0, -2.0], [4.0, 0.5], [-1.0, 3.0]]);
        let bbox = ring.bounding_box().unwrap();
        assert_eq!(bbox.min, Point::new(-1.0, -2.0));
        assert_eq!(bbox.max, Point::new(4.0, 3.0));
        assert_eq!(bbox.width(), 5.0);
        assert_eq!(bbox.height(), 5.0);
        assert_eq!(bbox.center(), Point::new(1.5, 0.5));
        assert!(Ring::default().bounding_box().is_none());
    }

    #[test]
    fn test_polygon_validation() {
        assert_eq!(Polygon::from_rings(vec![]), Err(PolylabelError::NoRings));
        assert_eq!(
            Polygon::new(square(), vec![Ring::default()]),
            Err(PolylabelError::EmptyRing { index: 1 })
        );
        assert_eq!(
            Polygon::new(Ring::from(vec![[0.0, 0.0], [f64::NAN, 1.0]]), vec![]),
            Err(PolylabelError::NonFiniteCoordinate { ring: 0, point: 1 })
        );

        let polygon = Polygon::new(square(), vec![]).unwrap();
        assert_eq!(polygon.rings().len(), 1);
        assert!(polygon.interiors().is_empty());
    }
}
