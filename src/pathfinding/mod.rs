//! # Pathfinding
//!
//! Point-to-point navigation over a rasterized dungeon.
//!
//! [`NavGraph::build`] converts an occupancy grid into a graph of passable
//! cells with 8-directional edges, refusing diagonal moves that would clip a
//! wall corner. [`NavGraph::find_path`] snaps two world points onto the graph
//! and runs the chosen algorithm. BFS minimizes hop count; Dijkstra and A*
//! minimize Euclidean cost (1 for cardinal steps, √2 for diagonals), with A*
//! guided by the admissible straight-line heuristic.

use crate::{Graph, GridCell, Point, TileMap};
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};

/// Route search algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathAlgorithm {
    /// Unweighted shortest path by hop count.
    Bfs,
    /// Weighted shortest path by Euclidean edge cost.
    Dijkstra,
    /// Dijkstra with a straight-line-distance heuristic toward the goal.
    AStar,
}

impl PathAlgorithm {
    /// All algorithms, for exhaustive comparisons in tests and demos.
    pub const ALL: [PathAlgorithm; 3] = [
        PathAlgorithm::Bfs,
        PathAlgorithm::Dijkstra,
        PathAlgorithm::AStar,
    ];
}

/// Neighbor offsets tried for every passable cell: diagonals first, then the
/// cardinal directions.
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
    (0, -1),
    (0, 1),
    (-1, 0),
    (1, 0),
];

/// Navigation graph over the passable cells of a tile map.
#[derive(Debug, Clone, Default)]
pub struct NavGraph {
    graph: Graph<GridCell>,
}

impl NavGraph {
    /// Builds the navigation graph from an occupancy grid.
    ///
    /// Every floor cell becomes a node; edges connect 8-directionally
    /// adjacent floor cells. A diagonal edge is rejected when either of the
    /// two orthogonal cells forming its corner is a wall, so paths cannot cut
    /// through wall corners. The check is applied to cardinal moves too,
    /// where it is vacuous.
    pub fn build(map: &TileMap) -> Self {
        let mut graph = Graph::new();

        for y in 0..map.height() {
            for x in 0..map.width() {
                if map.is_wall(x, y) {
                    continue;
                }
                let cell = GridCell::new(x, y);
                graph.add_node(cell);

                for (dx, dy) in NEIGHBOR_OFFSETS {
                    let (nx, ny) = (x + dx, y + dy);
                    if nx < 0 || nx >= map.width() || ny < 0 || ny >= map.height() {
                        continue;
                    }
                    if map.is_wall(nx, ny) {
                        continue;
                    }
                    if map.is_wall(nx - dx, ny) || map.is_wall(nx, ny - dy) {
                        continue;
                    }
                    graph.add_edge(cell, GridCell::new(nx, ny));
                }
            }
        }

        Self { graph }
    }

    /// The number of passable cells in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// The underlying cell graph.
    pub fn graph(&self) -> &Graph<GridCell> {
        &self.graph
    }

    /// Finds a route between two world points.
    ///
    /// Both points are snapped to the nearest passable cell center by linear
    /// scan; the returned path runs from the snapped start cell to the
    /// snapped end cell inclusive. Returns an empty vector when the graph is
    /// empty or no route exists.
    pub fn find_path(&self, from: Point, to: Point, algorithm: PathAlgorithm) -> Vec<GridCell> {
        let (start, end) = match (self.closest_node(from), self.closest_node(to)) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                debug!("find_path on an empty navigation graph");
                return Vec::new();
            }
        };

        match algorithm {
            PathAlgorithm::Bfs => self.bfs(start, end),
            PathAlgorithm::Dijkstra => self.weighted_search(start, end, |_| 0.0),
            PathAlgorithm::AStar => {
                self.weighted_search(start, end, |cell| cell.distance(end))
            }
        }
    }

    /// The passable cell whose center is nearest to a point. O(V) scan; ties
    /// go to the first cell in insertion order.
    fn closest_node(&self, position: Point) -> Option<GridCell> {
        let mut best: Option<(GridCell, f64)> = None;
        for &cell in self.graph.nodes() {
            let d = position.distance(cell.center());
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((cell, d));
            }
        }
        best.map(|(cell, _)| cell)
    }

    fn bfs(&self, start: GridCell, end: GridCell) -> Vec<GridCell> {
        let mut parents: HashMap<GridCell, GridCell> = HashMap::new();
        let mut discovered: HashSet<GridCell> = HashSet::new();
        let mut queue = VecDeque::from([start]);

        while let Some(node) = queue.pop_front() {
            discovered.insert(node);

            if node == end {
                return reconstruct_path(&parents, start, end);
            }

            for &neighbor in self.graph.neighbors(node) {
                if discovered.contains(&neighbor) || parents.contains_key(&neighbor) {
                    continue;
                }
                queue.push_back(neighbor);
                parents.insert(neighbor, node);
            }
        }

        Vec::new()
    }

    /// Lazy-deletion heap search: Dijkstra when the heuristic is zero, A*
    /// otherwise. Stale heap entries are skipped on pop.
    fn weighted_search<H>(&self, start: GridCell, end: GridCell, heuristic: H) -> Vec<GridCell>
    where
        H: Fn(GridCell) -> f64,
    {
        let mut parents: HashMap<GridCell, GridCell> = HashMap::new();
        let mut costs: HashMap<GridCell, f64> = HashMap::new();
        let mut finalized: HashSet<GridCell> = HashSet::new();
        let mut open = BinaryHeap::new();

        costs.insert(start, 0.0);
        open.push(ScoredCell {
            cell: start,
            priority: heuristic(start),
        });

        while let Some(ScoredCell { cell, .. }) = open.pop() {
            if !finalized.insert(cell) {
                continue;
            }

            if cell == end {
                return reconstruct_path(&parents, start, end);
            }

            let cell_cost = costs.get(&cell).copied().unwrap_or(f64::INFINITY);

            for &neighbor in self.graph.neighbors(cell) {
                if finalized.contains(&neighbor) {
                    continue;
                }
                let tentative = cell_cost + cell.distance(neighbor);
                let improved = costs.get(&neighbor).map_or(true, |&c| tentative < c);
                if improved {
                    costs.insert(neighbor, tentative);
                    parents.insert(neighbor, cell);
                    open.push(ScoredCell {
                        cell: neighbor,
                        priority: tentative + heuristic(neighbor),
                    });
                }
            }
        }

        Vec::new()
    }
}

/// Walks the parent map backward from the goal and reverses the result.
fn reconstruct_path(
    parents: &HashMap<GridCell, GridCell>,
    start: GridCell,
    end: GridCell,
) -> Vec<GridCell> {
    let mut path = Vec::new();
    let mut current = end;

    while current != start {
        path.push(current);
        match parents.get(&current) {
            Some(&parent) => current = parent,
            None => {
                debug!("broken parent chain at {:?}", current);
                return Vec::new();
            }
        }
    }

    path.push(start);
    path.reverse();
    path
}

/// Heap entry ordered so the smallest priority pops first.
#[derive(Debug, Clone, Copy)]
struct ScoredCell {
    cell: GridCell,
    priority: f64,
}

impl Ord for ScoredCell {
    fn cmp(&self, other: &Self) -> Ordering {
        other.priority.total_cmp(&self.priority)
    }
}

impl PartialOrd for ScoredCell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ScoredCell {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScoredCell {}
