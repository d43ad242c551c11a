//! One editing-and-searching session over a single grid.
//!
//! A session is created when the user picks an algorithm and dropped when they go back to
//! the menu. It owns the grid and at most one search, and refuses layout edits while that
//! search is still running.

use log::{info, warn};

use crate::{
    error::{SearchError, SessionError},
    find::{Algorithm, Outcome, PathFinder, SearchState},
    grid::{CellKind, Grid, Point},
};

#[derive(Debug)]
pub struct Session {
    grid: Grid,
    algorithm: Algorithm,
    finder: Option<PathFinder>,
}

impl Session {
    pub fn new(algorithm: Algorithm, rows: usize, width: usize) -> Result<Self, SessionError> {
        Ok(Self::with_grid(algorithm, Grid::build(rows, width)?))
    }

    /// Start a session on an already painted grid
    pub fn with_grid(algorithm: Algorithm, grid: Grid) -> Self {
        info!(
            "new {} session on a {}x{} grid",
            algorithm,
            grid.rows(),
            grid.rows()
        );
        Self {
            grid,
            algorithm,
            finder: None,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// The current or last search, if one was started
    pub fn finder(&self) -> Option<&PathFinder> {
        self.finder.as_ref()
    }

    pub fn state(&self) -> Option<&SearchState> {
        self.finder.as_ref().map(PathFinder::state)
    }

    pub fn is_searching(&self) -> bool {
        matches!(self.state(), Some(SearchState::Computing))
    }

    fn editable(&mut self) -> Result<&mut Grid, SessionError> {
        if self.is_searching() {
            warn!("ignoring grid edit while a search is running");
            return Err(SessionError::SearchInProgress);
        }
        Ok(&mut self.grid)
    }

    /// Primary click on a cell, see [`Grid::paint`]
    pub fn paint(&mut self, point: Point) -> Result<Option<CellKind>, SessionError> {
        Ok(self.editable()?.paint(point)?)
    }

    /// Secondary click on a cell: reset it to empty
    pub fn erase(&mut self, point: Point) -> Result<(), SessionError> {
        Ok(self.editable()?.reset_cell(point)?)
    }

    /// Wipe the grid. Any running search is cancelled first.
    pub fn clear(&mut self) {
        if let Some(finder) = &mut self.finder {
            finder.cancel();
        }
        self.finder = None;
        self.grid.clear();
    }

    /// Refresh adjacency and start a new search between the painted start and end.
    ///
    /// Marks left over from a previous run are removed first.
    pub fn begin(&mut self) -> Result<(), SessionError> {
        if self.is_searching() {
            return Err(SessionError::SearchInProgress);
        }
        let (Some(start), Some(end)) = (self.grid.start(), self.grid.end()) else {
            return Err(SearchError::MissingEndpoints.into());
        };

        self.grid.clear_search();
        self.grid.update_all_neighbors();
        self.finder = Some(PathFinder::new(self.algorithm, &self.grid, start, end)?);
        Ok(())
    }

    /// Advance the running search by one expansion. Returns `None` if no search was started.
    pub fn step<F: FnMut(&Grid)>(&mut self, on_step: &mut F) -> Option<&SearchState> {
        let finder = self.finder.as_mut()?;
        Some(finder.step(&mut self.grid, on_step))
    }

    /// Start a search and drive it until it ends or `is_cancelled` returns true
    pub fn run<F, C>(&mut self, on_step: F, is_cancelled: C) -> Result<Outcome, SessionError>
    where
        F: FnMut(&Grid),
        C: FnMut() -> bool,
    {
        self.begin()?;
        let finder = self
            .finder
            .as_mut()
            .ok_or(SessionError::Search(SearchError::MissingEndpoints))?;
        let outcome = finder.run(&mut self.grid, on_step, is_cancelled);
        log_outcome(self.algorithm, &outcome);
        Ok(outcome)
    }

    /// Stop the running search, keeping its partial marks on the grid
    pub fn cancel(&mut self) {
        if let Some(finder) = &mut self.finder {
            finder.cancel();
        }
    }
}

fn log_outcome(algorithm: Algorithm, outcome: &Outcome) {
    match outcome {
        Outcome::Found(result) => info!(
            "{}: path of length {} ({} cells expanded)",
            algorithm,
            result.edges(),
            result.expanded
        ),
        Outcome::Exhausted => info!("{}: no path exists", algorithm),
        Outcome::Cancelled => info!("{}: search cancelled", algorithm),
    }
}
