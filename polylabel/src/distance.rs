//! Distance signée d'un point au contour d'un polygone

use crate::types::{Point, Polygon};

/// Distance signée d'un point au bord du polygone
///
/// La valeur absolue est la distance minimale à une arête de n'importe quel
/// ring ; le signe est positif si le point est dans le polygone (dans le
/// contour extérieur et hors de tous les trous), négatif sinon.
///
/// Le test d'appartenance applique la règle pair-impair sur tous les rings
/// à la fois : un trou correctement imbriqué ramène la parité à "dehors".
pub fn signed_distance(point: Point, polygon: &Polygon) -> f64 {
    let mut inside = false;
    let mut min_dist_sq = f64::INFINITY;

    for ring in polygon.rings() {
        for (a, b) in ring.edges() {
            if crosses_ray(point, a, b) {
                inside = !inside;
            }
            min_dist_sq = min_dist_sq.min(segment_distance_sq(point, a, b));
        }
    }

    let distance = min_dist_sq.sqrt();
    if inside {
        distance
    } else {
        -distance
    }
}

/// Teste si le point est dans le polygone (parité seule, sans distance)
///
/// Les points exactement sur le bord peuvent être classés d'un côté ou de l'autre.
pub fn contains(point: Point, polygon: &Polygon) -> bool {
    polygon
        .rings()
        .iter()
        .flat_map(|ring| ring.edges())
        .filter(|&(a, b)| crosses_ray(point, a, b))
        .count()
        % 2
        == 1
}

/// Distance au carré d'un point à un segment `[a, b]`
///
/// La projection est bornée à `[0, 1]` ; un segment dégénéré (`a == b`)
/// se réduit à une distance point à point.
pub fn segment_distance_sq(p: Point, a: Point, b: Point) -> f64 {
    let mut x = a.x;
    let mut y = a.y;
    let mut dx = b.x - x;
    let mut dy = b.y - y;

    if dx != 0.0 || dy != 0.0 {
        let t = ((p.x - x) * dx + (p.y - y) * dy) / (dx * dx + dy * dy);
        if t > 1.0 {
            x = b.x;
            y = b.y;
        } else if t > 0.0 {
            x += dx * t;
            y += dy * t;
        }
    }

    dx = p.x - x;
    dy = p.y - y;
    dx * dx + dy * dy
}

/// Le rayon horizontal partant de `p` vers +x croise-t-il l'arête `(a, b)` ?
///
/// L'intervalle en y est semi-ouvert pour ne pas compter deux fois un sommet.
#[inline]
fn crosses_ray(p: Point, a: Point, b: Point) -> bool {
    (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Ring;

    fn square_with_hole() -> Polygon {
        Polygon::new(
            Ring::from(vec![[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0]]),
            vec![Ring::from(vec![[4.0, 4.0], [4.0, 6.0], [6.0, 6.0], [6.0, 4.0]])],
        )
        .unwrap()
    }

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_segment_distance_projection() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!(approx_eq(segment_distance_sq(Point::new(5.0, 3.0), a, b), 9.0));
        // Au-delà des extrémités: distance au sommet le plus proche
        assert!(approx_eq(segment_distance_sq(Point::new(-3.0, 4.0), a, b), 25.0));
        assert!(approx_eq(segment_distance_sq(Point::new(13.0, 4.0), a, b), 25.0));
    }

    #[test]
    fn test_segment_distance_degenerate() {
        let a = Point::new(1.0, 1.0);
        assert!(approx_eq(segment_distance_sq(Point::new(4.0, 5.0), a, a), 25.0));
    }

    #[test]
    fn test_signed_distance_inside_outside() {
        let polygon = square_with_hole();
        assert!(approx_eq(signed_distance(Point::new(2.0, 5.0), &polygon), 2.0));
        assert!(approx_eq(signed_distance(Point::new(1.0, 1.0), &polygon), 1.0));
        assert!(approx_eq(signed_distance(Point::new(-3.0, 5.0), &polygon), -3.0));
    }

    #[test]
    fn test_signed_distance_in_hole_is_negative() {
        let polygon = square_with_hole();
        assert!(approx_eq(signed_distance(Point::new(5.0, 5.0), &polygon), -1.0));
        assert!(!contains(Point::new(5.0, 5.0), &polygon));
        assert!(contains(Point::new(2.0, 2.0), &polygon));
    }

    #[test]
    fn test_closing_point_is_optional() {
        let open = Polygon::new(
            Ring::from(vec![[0.0, 0.0], [0.0, 4.0], [4.0, 4.0], [4.0, 0.0]]),
            vec![],
        )
        .unwrap();
        let closed = Polygon::new(
            Ring::from(vec![[0.0, 0.0], [0.0, 4.0], [4.0, 4.0], [4.0, 0.0], [0.0, 0.0]]),
            vec![],
        )
        .unwrap();

        for p in [Point::new(1.0, 2.0), Point::new(3.5, 0.5), Point::new(6.0, 6.0)] {
            assert!(approx_eq(
                signed_distance(p, &open),
                signed_distance(p, &closed)
            ));
        }
    }

    #[test]
    fn test_single_point_ring() {
        let polygon = Polygon::new(Ring::from(vec![[3.0, 4.0]]), vec![]).unwrap();
        assert!(approx_eq(signed_distance(Point::new(0.0, 0.0), &polygon), -5.0));
    }
}
