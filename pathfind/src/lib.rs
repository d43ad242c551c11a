//! Shortest-path search on a square grid, built for step-by-step visualization.
//!
//! A [`Grid`] holds classified cells (empty, barrier, start, end, open, closed, path) and a
//! cached 4-neighborhood per cell. [`PathFinder`] runs A* or Dijkstra over it, writing the
//! exploration state back into the cell classifications so a renderer can draw it, and
//! calling a render callback after every expansion.
//!
//! ```
//! use pathfind::{search, Algorithm, Grid, Outcome, Point};
//!
//! let mut grid = Grid::build(5, 500).unwrap();
//! grid.set_start(Point::new(0, 0)).unwrap();
//! grid.set_end(Point::new(4, 4)).unwrap();
//! grid.update_all_neighbors();
//!
//! let outcome = search(
//!     Algorithm::AStar,
//!     &mut grid,
//!     Point::new(0, 0),
//!     Point::new(4, 4),
//!     |_grid| {},
//!     || false,
//! )
//! .unwrap();
//! assert!(matches!(outcome, Outcome::Found(result) if result.total_cost == 8));
//! ```

pub mod error;
pub mod find;
pub mod grid;
pub mod session;
pub mod util;

pub use error::{GridError, SearchError, SessionError};
pub use find::{
    manhattan, reconstruct, search, Algorithm, Outcome, PathFinder, PathResult, SearchState,
};
pub use grid::{Cell, CellKind, CellStorage, Grid, Point};
pub use session::Session;
