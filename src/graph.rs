//! Adjacency of the playing field and hop-count distances over it.

use std::collections::VecDeque;

use ndarray::Array2;

use crate::environment::{Field, Movement, Pos};

/// 4-connected grid graph: every cell maps to its in-bounds orthogonal neighbours.
/// Built once per session and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Graph {
    neighbours: Array2<Vec<Pos>>,
}

impl Graph {
    pub fn build(field: &Field) -> Self {
        let neighbours = Array2::from_shape_fn(field.size(), |(row, col)| {
            let pos = Pos::new(row, col);
            Movement::actions()
                .iter()
                .filter_map(|movement| match field.check_movement(pos, *movement) {
                    (_, true) => None,
                    (next, false) => Some(next),
                })
                .collect()
        });
        Graph { neighbours }
    }

    pub fn contains(&self, pos: Pos) -> bool {
        let (rows, cols) = self.neighbours.dim();
        pos.row < rows && pos.col < cols
    }

    pub fn neighbours(&self, pos: Pos) -> &[Pos] {
        self.neighbours
            .get((pos.row, pos.col))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /**
     * Length of the shortest orthogonal path between `start` and `end`, or `None`
     * when `end` cannot be reached (including either end lying off the grid).
     *
     * Plain breadth-first search, recomputed on every call.
     */
    pub fn distance(&self, start: Pos, end: Pos) -> Option<usize> {
        if !self.contains(start) || !self.contains(end) {
            return None;
        }
        let mut visited = Array2::<bool>::default(self.neighbours.dim());
        let mut frontier = VecDeque::new();
        visited[[start.row, start.col]] = true;
        frontier.push_back((start, 0));

        while let Some((node, distance)) = frontier.pop_front() {
            if node == end {
                return Some(distance);
            }
            for next in self.neighbours(node) {
                if !visited[[next.row, next.col]] {
                    visited[[next.row, next.col]] = true;
                    frontier.push_back((*next, distance + 1));
                }
            }
        }
        None
    }
}
