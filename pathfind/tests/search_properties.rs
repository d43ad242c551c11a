//! Property tests for the search engine against a plain breadth-first reference.
//!
//! 1. Open grids: both algorithms find a path as long as the Manhattan distance.
//! 2. Random barriers: the outcome and path length agree with BFS.
//! 3. Unreachable ends: every reachable cell except the start ends up closed.
//! 4. Paths are connected chains of adjacent cells without repeats.
//! 5. A* never expands more cells than Dijkstra.
//! 6. Identical grids produce identical frame sequences.

use std::collections::{HashSet, VecDeque};

use pathfind::{search, Algorithm, CellKind, Grid, Outcome, PathFinder, PathResult, Point};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

/// Random layout: (rows, barrier mask, start index, end index)
fn layout_strategy() -> impl Strategy<Value = (usize, Vec<bool>, usize, usize)> {
    (2usize..10).prop_flat_map(|rows| {
        let cells = rows * rows;
        (
            Just(rows),
            prop::collection::vec(prop::bool::weighted(0.3), cells),
            0..cells,
            0..cells,
        )
    })
}

fn build(rows: usize, barriers: &[bool], start: usize, end: usize) -> Option<Grid> {
    if start == end {
        return None;
    }
    let at = |i: usize| Point::new(i / rows, i % rows);

    let mut grid = Grid::build(rows, rows * 10).unwrap();
    for (i, &barrier) in barriers.iter().enumerate() {
        if barrier && i != start && i != end {
            grid.set_barrier(at(i)).unwrap();
        }
    }
    grid.set_start(at(start)).unwrap();
    grid.set_end(at(end)).unwrap();
    grid.update_all_neighbors();
    Some(grid)
}

/// Distances from `start` to every reachable cell, ignoring the engine's cached neighbors
fn bfs(grid: &Grid, start: Point) -> Vec<Vec<Option<usize>>> {
    let rows = grid.rows();
    let mut dist = vec![vec![None; rows]; rows];
    dist[start.row][start.col] = Some(0);
    let mut queue = VecDeque::from([start]);

    while let Some(p) = queue.pop_front() {
        let d = dist[p.row][p.col].unwrap();
        let candidates = [
            (p.row + 1, p.col),
            (p.row.wrapping_sub(1), p.col),
            (p.row, p.col + 1),
            (p.row, p.col.wrapping_sub(1)),
        ];
        for (row, col) in candidates {
            let n = Point::new(row, col);
            if !grid.is_valid(n) || grid.kind(n) == CellKind::Barrier {
                continue;
            }
            if dist[row][col].is_none() {
                dist[row][col] = Some(d + 1);
                queue.push_back(n);
            }
        }
    }
    dist
}

fn run(algorithm: Algorithm, grid: &mut Grid) -> (Outcome, PathFinder) {
    let (start, end) = (grid.start().unwrap(), grid.end().unwrap());
    let mut finder = PathFinder::new(algorithm, grid, start, end).unwrap();
    let outcome = finder.run(grid, |_| {}, || false);
    (outcome, finder)
}

fn assert_chain(result: &PathResult) {
    assert_eq!(result.path.first(), Some(&result.start));
    assert_eq!(result.path.last(), Some(&result.goal));
    for pair in result.path.windows(2) {
        assert!(pair[0].is_adjacent(pair[1]), "{:?} is not connected", pair);
    }
    let unique: HashSet<_> = result.path.iter().collect();
    assert_eq!(unique.len(), result.path.len(), "path repeats a cell");
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn open_grid_path_is_manhattan(rows in 2usize..15, a in 0usize..225, b in 0usize..225) {
        let (start, end) = (a % (rows * rows), b % (rows * rows));
        prop_assume!(start != end);

        for algorithm in Algorithm::ALL {
            let mut grid = build(rows, &[], start, end).unwrap();
            let (s, e) = (grid.start().unwrap(), grid.end().unwrap());
            let outcome = search(algorithm, &mut grid, s, e, |_| {}, || false).unwrap();

            let Outcome::Found(result) = outcome else {
                panic!("{algorithm} found no path on an open grid");
            };
            prop_assert_eq!(result.edges(), s.manhattan(e));
            prop_assert_eq!(result.total_cost, s.manhattan(e));
        }
    }

    #[test]
    fn outcome_matches_bfs((rows, barriers, start, end) in layout_strategy()) {
        let Some(grid) = build(rows, &barriers, start, end) else {
            return Ok(());
        };
        let (s, e) = (grid.start().unwrap(), grid.end().unwrap());
        let dist = bfs(&grid, s);

        for algorithm in Algorithm::ALL {
            let mut grid = grid.clone();
            let (outcome, finder) = run(algorithm, &mut grid);

            match dist[e.row][e.col] {
                Some(shortest) => {
                    let Outcome::Found(result) = outcome else {
                        panic!("{algorithm} missed a reachable end");
                    };
                    prop_assert_eq!(result.edges(), shortest);
                    prop_assert_eq!(finder.g_score(e), Some(result.edges()));
                    assert_chain(&result);
                    prop_assert_eq!(grid.kind(s), CellKind::Start);
                    prop_assert_eq!(grid.kind(e), CellKind::End);
                }
                None => {
                    prop_assert_eq!(outcome, Outcome::Exhausted);

                    let closed: HashSet<Point> = grid
                        .cells()
                        .filter(|c| c.kind() == CellKind::Closed)
                        .map(|c| c.point())
                        .collect();
                    let reachable: HashSet<Point> = grid
                        .cells()
                        .map(|c| c.point())
                        .filter(|p| *p != s && dist[p.row][p.col].is_some())
                        .collect();
                    prop_assert_eq!(closed, reachable);
                    prop_assert_eq!(grid.count(CellKind::Open), 0);
                }
            }
        }
    }

    #[test]
    fn astar_expands_no_more_than_dijkstra((rows, barriers, start, end) in layout_strategy()) {
        let Some(grid) = build(rows, &barriers, start, end) else {
            return Ok(());
        };

        let (astar, _) = run(Algorithm::AStar, &mut grid.clone());
        let (dijkstra, _) = run(Algorithm::Dijkstra, &mut grid.clone());

        if let (Outcome::Found(a), Outcome::Found(d)) = (astar, dijkstra) {
            prop_assert_eq!(a.total_cost, d.total_cost);
            prop_assert!(a.expanded <= d.expanded, "A* {} > Dijkstra {}", a.expanded, d.expanded);
        }
    }

    #[test]
    fn frames_are_deterministic((rows, barriers, start, end) in layout_strategy()) {
        let Some(grid) = build(rows, &barriers, start, end) else {
            return Ok(());
        };

        for algorithm in Algorithm::ALL {
            let record = || {
                let mut grid = grid.clone();
                let mut frames = Vec::new();
                let (s, e) = (grid.start().unwrap(), grid.end().unwrap());
                let outcome = search(
                    algorithm,
                    &mut grid,
                    s,
                    e,
                    |g| frames.push(g.to_string()),
                    || false,
                )
                .unwrap();
                (outcome, frames)
            };
            prop_assert_eq!(record(), record());
        }
    }
}

// ── Worked examples ─────────────────────────────────────────────────────

#[test]
fn five_by_five_open() {
    let mut grid = build(5, &[], 0, 24).unwrap();
    let (outcome, finder) = run(Algorithm::AStar, &mut grid);
    let Outcome::Found(result) = outcome else {
        panic!("no path");
    };
    assert_eq!(result.edges(), 8);
    assert_eq!(finder.g_score(Point::new(4, 4)), Some(8));
}

#[test]
fn three_by_three_walled_off() {
    let wall = [false, false, false, true, true, true, false, false, false];
    for algorithm in Algorithm::ALL {
        let mut grid = build(3, &wall, 0, 8).unwrap();
        assert_eq!(run(algorithm, &mut grid).0, Outcome::Exhausted);
    }
}

#[test]
fn three_by_three_detour() {
    let wall = [false, true, false, false, false, false, false, false, false];
    for algorithm in Algorithm::ALL {
        let mut grid = build(3, &wall, 0, 2).unwrap();
        let (outcome, _) = run(algorithm, &mut grid);
        assert!(matches!(outcome, Outcome::Found(r) if r.edges() == 4));
    }
}
