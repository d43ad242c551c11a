use std::{cmp::Ordering, collections::BinaryHeap, fmt::Display, str::FromStr};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::{
    error::SearchError,
    grid::{CellKind, CellStorage, Grid, Point},
};

/// The search strategy. Both share one frontier algorithm and differ only in the heuristic.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    #[default]
    AStar,
    Dijkstra,
}

impl Algorithm {
    pub const ALL: [Algorithm; 2] = [Algorithm::AStar, Algorithm::Dijkstra];

    /// Estimated remaining cost from `from` to `goal`.
    ///
    /// Dijkstra is A* with an estimate that is always zero.
    pub fn estimate(&self, from: Point, goal: Point) -> usize {
        match self {
            Algorithm::AStar => manhattan(from, goal),
            Algorithm::Dijkstra => 0,
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Algorithm::AStar => "A*",
                Algorithm::Dijkstra => "Dijkstra",
            }
        )
    }
}

impl FromStr for Algorithm {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "astar" | "a*" | "a-star" => Ok(Algorithm::AStar),
            "dijkstra" => Ok(Algorithm::Dijkstra),
            _ => Err(anyhow::anyhow!("Invalid algorithm: {}", s)),
        }
    }
}

/// Manhattan distance, admissible and consistent for unit-cost 4-directional movement
pub fn manhattan(a: Point, b: Point) -> usize {
    a.manhattan(b)
}

/// The objects that we store in the priority queue
#[derive(Debug, PartialEq, Eq)]
struct ToVisit {
    priority: usize,
    // insertion order, breaks ties in favour of the earlier entry
    count: u64,
    point: Point,
}

impl Ord for ToVisit {
    fn cmp(&self, other: &Self) -> Ordering {
        // reverse for BinaryHeap to be a min-heap
        (self.priority, self.count)
            .cmp(&(other.priority, other.count))
            .reverse()
    }
}

impl PartialOrd for ToVisit {
    fn partial_cmp(&self, other: &ToVisit) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, PartialEq, Clone, Eq)]
pub struct PathResult {
    /// Cells from start to goal, both included
    pub path: Vec<Point>,
    pub start: Point,
    pub goal: Point,
    pub total_cost: usize,
    /// Number of cells taken off the frontier
    pub expanded: usize,
}

impl PathResult {
    /// Number of moves along the path
    pub fn edges(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchState {
    Computing,
    Found(PathResult),
    Exhausted,
    Cancelled,
}

impl SearchState {
    pub fn is_done(&self) -> bool {
        !matches!(self, SearchState::Computing)
    }

    /// The terminal result, or `None` while the search is still running
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            SearchState::Computing => None,
            SearchState::Found(result) => Some(Outcome::Found(result.clone())),
            SearchState::Exhausted => Some(Outcome::Exhausted),
            SearchState::Cancelled => Some(Outcome::Cancelled),
        }
    }
}

/// How a finished search ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Found(PathResult),
    /// No path exists given the current barriers
    Exhausted,
    Cancelled,
}

/// An in-flight search over a [`Grid`].
///
/// The finder owns the transient search state (scores, predecessors, frontier) while the
/// grid owns the cell classifications, which the finder updates as it expands. Drive it one
/// expansion at a time with [`PathFinder::step`] or to completion with [`PathFinder::run`].
#[derive(Debug)]
pub struct PathFinder {
    algorithm: Algorithm,
    start: Point,
    goal: Point,
    g_score: CellStorage<Option<usize>>,
    f_score: CellStorage<Option<usize>>,
    came_from: CellStorage<Option<Point>>,
    in_frontier: CellStorage<bool>,
    frontier: BinaryHeap<ToVisit>,
    count: u64,
    expanded: usize,
    state: SearchState,
}

impl PathFinder {
    /// Prepare a search from `start` to `goal`.
    ///
    /// The grid's neighbor lists must have been refreshed since its last layout edit.
    pub fn new(
        algorithm: Algorithm,
        grid: &Grid,
        start: Point,
        goal: Point,
    ) -> Result<Self, SearchError> {
        for point in [start, goal] {
            if !grid.is_valid(point) {
                return Err(SearchError::OutOfBounds(point));
            }
            if grid.kind(point) == CellKind::Barrier {
                return Err(SearchError::BarrierEndpoint(point));
            }
        }
        if start == goal {
            return Err(SearchError::SameEndpoints(start));
        }
        if grid.neighbors_stale() {
            return Err(SearchError::StaleNeighbors);
        }

        let mut g_score = grid.create_storage();
        let mut f_score = grid.create_storage();
        let mut in_frontier = grid.create_storage();

        let priority = algorithm.estimate(start, goal);
        g_score.set(start, Some(0));
        f_score.set(start, Some(priority));
        in_frontier.set(start, true);

        debug!("starting {} search from {} to {}", algorithm, start, goal);

        Ok(Self {
            algorithm,
            start,
            goal,
            g_score,
            f_score,
            came_from: grid.create_storage(),
            in_frontier,
            frontier: BinaryHeap::from([ToVisit {
                priority,
                count: 0,
                point: start,
            }]),
            count: 0,
            expanded: 0,
            state: SearchState::Computing,
        })
    }

    /// Perform one expansion: pop the best frontier entry and relax its neighbors.
    ///
    /// `on_step` is called once after the neighbors are processed, and once per path cell
    /// when the goal is reached.
    pub fn step<F: FnMut(&Grid)>(&mut self, grid: &mut Grid, on_step: &mut F) -> &SearchState {
        if self.state.is_done() {
            return &self.state;
        }

        let Some(visit) = self.frontier.pop() else {
            debug!(
                "{} search exhausted after {} expansions",
                self.algorithm, self.expanded
            );
            self.state = SearchState::Exhausted;
            return &self.state;
        };

        let current = visit.point;
        self.in_frontier.set(current, false);
        self.expanded += 1;

        if current == self.goal {
            let path = reconstruct(&self.came_from, self.goal, grid, on_step);
            grid.mark(self.goal, CellKind::End);

            let total_cost = self.g_score.get(self.goal).unwrap_or_default();
            debug!(
                "{} search found a path of cost {} after {} expansions",
                self.algorithm, total_cost, self.expanded
            );

            self.state = SearchState::Found(PathResult {
                path,
                start: self.start,
                goal: self.goal,
                total_cost,
                expanded: self.expanded,
            });
            return &self.state;
        }

        trace!("expanding {} with priority {}", current, visit.priority);

        // all costs on the frontier are known, the start is seeded with zero
        let current_g = self.g_score.get(current).unwrap_or_default();

        let neighbors = grid.cell(current).neighbors().to_vec();
        for neighbor in neighbors {
            // every move costs exactly one
            let tentative = current_g + 1;

            let improves = match self.g_score.get(neighbor) {
                Some(known) => tentative < known,
                None => true,
            };
            if !improves {
                continue;
            }

            self.came_from.set(neighbor, Some(current));
            self.g_score.set(neighbor, Some(tentative));
            let priority = tentative + self.algorithm.estimate(neighbor, self.goal);
            self.f_score.set(neighbor, Some(priority));

            if !self.in_frontier.get(neighbor) {
                self.count += 1;
                self.frontier.push(ToVisit {
                    priority,
                    count: self.count,
                    point: neighbor,
                });
                self.in_frontier.set(neighbor, true);

                // closed cells stay closed
                if grid.kind(neighbor) != CellKind::Closed {
                    grid.mark(neighbor, CellKind::Open);
                }
            }
        }

        on_step(grid);

        if current != self.start {
            grid.mark(current, CellKind::Closed);
        }

        &self.state
    }

    /// Step until the search ends or `is_cancelled` returns true.
    ///
    /// The probe is checked once before every expansion. Once the frontier is empty the search
    /// is exhausted and the probe is no longer consulted.
    pub fn run<F, C>(&mut self, grid: &mut Grid, mut on_step: F, mut is_cancelled: C) -> Outcome
    where
        F: FnMut(&Grid),
        C: FnMut() -> bool,
    {
        loop {
            if !self.state.is_done() && !self.frontier.is_empty() && is_cancelled() {
                self.cancel();
            }
            if let Some(outcome) = self.step(grid, &mut on_step).outcome() {
                return outcome;
            }
        }
    }

    /// Run to completion without cancellation
    pub fn finish<F: FnMut(&Grid)>(mut self, grid: &mut Grid, on_step: F) -> Outcome {
        self.run(grid, on_step, || false)
    }

    /// Stop the search, discarding the remaining frontier. Classifications already written
    /// to the grid are left in place.
    pub fn cancel(&mut self) {
        if self.state.is_done() {
            return;
        }
        debug!(
            "{} search cancelled after {} expansions",
            self.algorithm, self.expanded
        );
        self.frontier.clear();
        self.state = SearchState::Cancelled;
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn goal(&self) -> Point {
        self.goal
    }

    /// Best known cost from the start, `None` if the cell has not been reached
    pub fn g_score(&self, point: Point) -> Option<usize> {
        self.g_score.get(point)
    }

    /// Frontier priority last assigned to the cell
    pub fn f_score(&self, point: Point) -> Option<usize> {
        self.f_score.get(point)
    }

    pub fn came_from(&self, point: Point) -> Option<Point> {
        self.came_from.get(point)
    }

    pub fn in_frontier(&self, point: Point) -> bool {
        self.in_frontier.get(point)
    }

    /// Number of cells taken off the frontier so far
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    /// Number of entries waiting in the frontier
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn g_scores(&self) -> &CellStorage<Option<usize>> {
        &self.g_score
    }
}

/// Search `grid` from `start` to `end` with the given algorithm.
///
/// `on_step` is invoked after every expansion and every path step, and may read the grid.
/// `is_cancelled` is polled once per expansion; when it returns true the search stops and
/// reports [`Outcome::Cancelled`].
pub fn search<F, C>(
    algorithm: Algorithm,
    grid: &mut Grid,
    start: Point,
    end: Point,
    on_step: F,
    is_cancelled: C,
) -> Result<Outcome, SearchError>
where
    F: FnMut(&Grid),
    C: FnMut() -> bool,
{
    let mut finder = PathFinder::new(algorithm, grid, start, end)?;
    Ok(finder.run(grid, on_step, is_cancelled))
}

/// Walk the predecessors from `goal` back to the start, marking every cell on the way as
/// path (the start keeps its own marker) and calling `on_step` once per step.
///
/// Returns the path ordered from start to goal.
pub fn reconstruct<F: FnMut(&Grid)>(
    came_from: &CellStorage<Option<Point>>,
    goal: Point,
    grid: &mut Grid,
    on_step: &mut F,
) -> Vec<Point> {
    let limit = grid.rows() * grid.rows();
    let mut path = vec![goal];
    let mut current = goal;

    while let Some(previous) = came_from.get(current) {
        if path.len() > limit {
            // a predecessor chain longer than the grid can only be a cycle
            break;
        }
        current = previous;
        path.push(current);
        if grid.kind(current) != CellKind::Start {
            grid.mark(current, CellKind::Path);
        }
        on_step(grid);
    }

    path.reverse();
    path
}
