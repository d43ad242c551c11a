//! Error types for grid editing, searching and sessions.

use crate::grid::{CellKind, Point};

/// Errors produced while building or editing a [`Grid`](crate::grid::Grid).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("a grid needs at least one row")]
    NoRows,

    #[error("point {point} is outside the {rows}x{rows} grid")]
    OutOfBounds { point: Point, rows: usize },

    /// The cell already carries a marker that the requested edit would overwrite.
    #[error("cell {point} already holds the {kind} marker")]
    Occupied { point: Point, kind: CellKind },

    #[error("row {row} has {found} cells, expected {expected}")]
    NotSquare {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("unknown cell symbol {symbol:?} at {point}")]
    UnknownSymbol { symbol: char, point: Point },

    #[error("grid text contains more than one {0} cell")]
    Duplicate(CellKind),
}

/// Precondition violations that make a search refuse to start.
///
/// Not finding a path is not an error, see [`Outcome`](crate::find::Outcome).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("both a start and an end cell must be placed before searching")]
    MissingEndpoints,

    #[error("start and end are the same cell {0}")]
    SameEndpoints(Point),

    #[error("endpoint {0} is outside the grid")]
    OutOfBounds(Point),

    #[error("endpoint {0} is a barrier")]
    BarrierEndpoint(Point),

    #[error("neighbor lists are stale, refresh them after editing the grid")]
    StaleNeighbors,
}

/// Errors returned by [`Session`](crate::session::Session).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("the grid cannot be edited while a search is running")]
    SearchInProgress,

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Search(#[from] SearchError),
}
