#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic A* planner that routes a footprint's pivot across the grid.
//!
//! A cell is traversable when the whole footprint fits with its pivot on that
//! cell, so every coordinate on a returned path is a legal resting place.

use std::{cmp::Ordering, collections::BinaryHeap};

use block_slide_board::{placement, Grid};
use block_slide_core::{CellCoord, Direction, ShapeFootprint};
use tracing::debug;

/// Pure system that searches for shortest legal pivot paths.
///
/// The planner keeps its search buffers between calls so repeated queries on
/// the same grid do not reallocate.
#[derive(Debug, Default)]
pub struct PathPlanner {
    workspace: SearchWorkspace,
}

impl PathPlanner {
    /// Creates a planner with empty buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shortest path from `start` to `goal` along which the footprint fits at
    /// every step after the start.
    ///
    /// The start cell is never validated, which lets a lifted piece plan away
    /// from its own position. Returns `[start]` when the endpoints coincide and
    /// an empty path when the goal is unreachable or outside the grid.
    pub fn find(
        &mut self,
        grid: &Grid,
        start: CellCoord,
        goal: CellCoord,
        footprint: &ShapeFootprint,
    ) -> Vec<CellCoord> {
        self.find_with(grid.columns(), grid.rows(), start, goal, |cell| {
            placement::fits(grid, cell, footprint)
        })
    }

    /// Shortest 4-connected path over a `columns x rows` grid where
    /// `is_traversable` decides which cells may be entered.
    ///
    /// Steps cost one and the heuristic is the Manhattan distance to the goal.
    /// Ties on estimated total cost favour the node closer to the goal, then
    /// the node discovered first, and neighbours are expanded north, south,
    /// west, east, so identical inputs always yield identical paths.
    pub fn find_with<F>(
        &mut self,
        columns: u32,
        rows: u32,
        start: CellCoord,
        goal: CellCoord,
        mut is_traversable: F,
    ) -> Vec<CellCoord>
    where
        F: FnMut(CellCoord) -> bool,
    {
        let workspace = &mut self.workspace;
        let Some(start_index) = workspace.prepare(columns, rows, start) else {
            debug!(%start, "start lies outside the grid");
            return Vec::new();
        };
        if workspace.index(goal).is_none() {
            debug!(%goal, "goal lies outside the grid");
            return Vec::new();
        }
        if start == goal {
            return vec![start];
        }

        workspace.best_cost[start_index] = 0;
        workspace.push(start, None, 0, start.manhattan_distance(goal));

        while let Some(entry) = workspace.frontier.pop() {
            let node = workspace.nodes[entry.node];
            let Some(cell_index) = workspace.index(node.cell) else {
                continue;
            };
            if workspace.closed[cell_index] || entry.cost > workspace.best_cost[cell_index] {
                continue;
            }
            workspace.closed[cell_index] = true;

            if node.cell == goal {
                let path = workspace.reconstruct(entry.node);
                debug!(
                    %start,
                    %goal,
                    steps = path.len() - 1,
                    expanded = workspace.expanded(),
                    "planned path"
                );
                return path;
            }

            let cost = entry.cost + 1;
            for direction in Direction::ALL {
                let Some(neighbor) = node.cell.neighbor(direction) else {
                    continue;
                };
                let Some(neighbor_index) = workspace.index(neighbor) else {
                    continue;
                };
                if workspace.closed[neighbor_index] || cost >= workspace.best_cost[neighbor_index]
                {
                    continue;
                }
                if !is_traversable(neighbor) {
                    continue;
                }

                workspace.best_cost[neighbor_index] = cost;
                workspace.push(
                    neighbor,
                    Some(entry.node),
                    cost,
                    neighbor.manhattan_distance(goal),
                );
            }
        }

        debug!(%start, %goal, expanded = workspace.expanded(), "no legal path");
        Vec::new()
    }
}

/// Arena entry recording how the search reached a cell.
#[derive(Clone, Copy, Debug)]
struct SearchNode {
    cell: CellCoord,
    parent: Option<usize>,
}

/// Frontier entry ordered so the binary heap pops the lowest estimate first.
///
/// Equality follows the ordering key, so `cost` and `node` are payload only.
#[derive(Clone, Copy, Debug)]
struct FrontierEntry {
    estimate: u32,
    heuristic: u32,
    sequence: u64,
    cost: u32,
    node: usize,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| other.heuristic.cmp(&self.heuristic))
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Buffers reused across searches.
#[derive(Debug, Default)]
struct SearchWorkspace {
    dimensions: (u32, u32),
    nodes: Vec<SearchNode>,
    best_cost: Vec<u32>,
    closed: Vec<bool>,
    frontier: BinaryHeap<FrontierEntry>,
    sequence: u64,
}

impl SearchWorkspace {
    /// Resets the buffers for a new search and returns the start's index.
    fn prepare(&mut self, columns: u32, rows: u32, start: CellCoord) -> Option<usize> {
        self.dimensions = (columns, rows);
        self.nodes.clear();
        self.frontier.clear();
        self.sequence = 0;

        let cell_count = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        self.best_cost.clear();
        self.best_cost.resize(cell_count, u32::MAX);
        self.closed.clear();
        self.closed.resize(cell_count, false);

        self.index(start)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        let (columns, rows) = self.dimensions;
        if cell.column() >= columns || cell.row() >= rows {
            return None;
        }
        let index = u64::from(cell.row()) * u64::from(columns) + u64::from(cell.column());
        usize::try_from(index)
            .ok()
            .filter(|index| *index < self.best_cost.len())
    }

    fn push(&mut self, cell: CellCoord, parent: Option<usize>, cost: u32, heuristic: u32) {
        let node = self.nodes.len();
        self.nodes.push(SearchNode { cell, parent });
        self.frontier.push(FrontierEntry {
            estimate: cost.saturating_add(heuristic),
            heuristic,
            sequence: self.sequence,
            cost,
            node,
        });
        self.sequence += 1;
    }

    fn reconstruct(&self, node: usize) -> Vec<CellCoord> {
        let mut path = Vec::new();
        let mut current = Some(node);
        while let Some(index) = current {
            let entry = self.nodes[index];
            path.push(entry.cell);
            current = entry.parent;
        }
        path.reverse();
        path
    }

    fn expanded(&self) -> usize {
        self.closed.iter().filter(|closed| **closed).count()
    }
}
