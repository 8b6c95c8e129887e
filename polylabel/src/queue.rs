//! Cellules de recherche et file de priorité ordonnée par potentiel

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::f64::consts::SQRT_2;

use crate::distance::signed_distance;
use crate::types::{Point, Polygon};

/// Cellule carrée de la recherche
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    /// Centre de la cellule
    pub center: Point,

    /// Demi-côté
    pub half_size: f64,

    /// Distance signée du centre au bord du polygone
    pub distance: f64,

    /// Distance maximale atteignable dans la cellule (`distance + half_size·√2`)
    pub potential: f64,
}

impl Cell {
    pub fn new(center: Point, half_size: f64, polygon: &Polygon) -> Self {
        let distance = signed_distance(center, polygon);
        Self {
            center,
            half_size,
            distance,
            potential: distance + half_size * SQRT_2,
        }
    }
}

#[derive(Debug)]
struct Entry {
    cell: Cell,
    seq: u64,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // À potentiel égal, la cellule insérée en premier sort en premier
    fn cmp(&self, other: &Self) -> Ordering {
        self.cell
            .potential
            .total_cmp(&other.cell.potential)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// File de priorité des cellules, la plus prometteuse en tête
#[derive(Debug, Default)]
pub struct CellQueue {
    heap: BinaryHeap<Entry>,
    next_seq: u64,
}

impl CellQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            next_seq: 0,
        }
    }

    pub fn push(&mut self, cell: Cell) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry { cell, seq });
    }

    /// Retire la cellule de plus fort potentiel
    pub fn pop(&mut self) -> Option<Cell> {
        self.heap.pop().map(|entry| entry.cell)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Ring;

    fn cell(x: f64, potential: f64) -> Cell {
        Cell {
            center: Point::new(x, 0.0),
            half_size: 0.0,
            distance: potential,
            potential,
        }
    }

    #[test]
    fn test_pops_highest_potential_first() {
        let mut queue = CellQueue::new();
        for (x, potential) in [(0.0, 1.5), (1.0, -2.0), (2.0, 7.25), (3.0, 3.0)] {
            queue.push(cell(x, potential));
        }
        assert_eq!(queue.len(), 4);

        let order: Vec<f64> = std::iter::from_fn(|| queue.pop())
            .map(|c| c.potential)
            .collect();
        assert_eq!(order, vec![7.25, 3.0, 1.5, -2.0]);
        assert!(queue.is_empty());
        assert!(queue.pop().is_none());
    }

    #[test]
    fn test_ties_pop_in_insertion_order() {
        let mut queue = CellQueue::with_capacity(3);
        queue.push(cell(1.0, 2.0));
        queue.push(cell(2.0, 2.0));
        queue.push(cell(3.0, 2.0));

        let xs: Vec<f64> = std::iter::from_fn(|| queue.pop())
            .map(|c| c.center.x)
            .collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_cell_potential() {
        let polygon = Polygon::new(
            Ring::from(vec![[0.0, 0.0], [0.0, 4.0], [4.0, 4.0], [4.0, 0.0]]),
            vec![],
        )
        .unwrap();
        let c = Cell::new(Point::new(1.0, 2.0), 0.5, &polygon);
        assert_eq!(c.distance, 1.0);
        assert!((c.potential - (1.0 + 0.5 * SQRT_2)).abs() < 1e-12);

        let zero = Cell::new(Point::new(2.0, 2.0), 0.0, &polygon);
        assert_eq!(zero.potential, zero.distance);
    }
}
