use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// Address of a cell in the grid
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan (L1) distance to another point
    pub fn manhattan(&self, other: Point) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// True if the two points share an edge
    pub fn is_adjacent(&self, other: Point) -> bool {
        self.manhattan(other) == 1
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl FromStr for Point {
    type Err = anyhow::Error;

    /// Parses `row,col`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (row, col) = s
            .split_once(',')
            .ok_or_else(|| anyhow::anyhow!("Invalid point, expected `row,col`: {}", s))?;
        Ok(Point {
            row: row.trim().parse()?,
            col: col.trim().parse()?,
        })
    }
}

/// What a cell currently represents.
///
/// The presentation layer derives its colors from this tag, never the other way around.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    #[default]
    Empty,
    Barrier,
    Start,
    End,
    /// Discovered and waiting in the frontier
    Open,
    /// Already expanded
    Closed,
    Path,
}

impl CellKind {
    pub fn symbol(&self) -> char {
        match self {
            CellKind::Empty => '.',
            CellKind::Barrier => '#',
            CellKind::Start => 'S',
            CellKind::End => 'E',
            CellKind::Open => 'o',
            CellKind::Closed => 'x',
            CellKind::Path => '*',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<CellKind> {
        match symbol {
            '.' => Some(CellKind::Empty),
            '#' => Some(CellKind::Barrier),
            'S' => Some(CellKind::Start),
            'E' => Some(CellKind::End),
            'o' => Some(CellKind::Open),
            'x' => Some(CellKind::Closed),
            '*' => Some(CellKind::Path),
            _ => None,
        }
    }

    /// Classifications written by a search run, as opposed to user paint
    pub fn is_search_mark(&self) -> bool {
        matches!(self, CellKind::Open | CellKind::Closed | CellKind::Path)
    }
}

impl Display for CellKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                CellKind::Empty => "empty",
                CellKind::Barrier => "barrier",
                CellKind::Start => "start",
                CellKind::End => "end",
                CellKind::Open => "open",
                CellKind::Closed => "closed",
                CellKind::Path => "path",
            }
        )
    }
}

/// A single grid position with its classification and cached adjacency
#[derive(Clone, Debug)]
pub struct Cell {
    point: Point,
    width: usize,
    kind: CellKind,
    neighbors: Vec<Point>,
}

impl Cell {
    fn new(point: Point, width: usize) -> Self {
        Self {
            point,
            width,
            kind: CellKind::Empty,
            neighbors: Vec::with_capacity(4),
        }
    }

    pub fn point(&self) -> Point {
        self.point
    }

    /// Side length in pixels, only meaningful to a renderer
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn kind(&self) -> CellKind {
        self.kind
    }

    /// Neighbors as of the last [`Grid::update_neighbors`] call
    pub fn neighbors(&self) -> &[Point] {
        &self.neighbors
    }

    pub fn is_barrier(&self) -> bool {
        self.kind == CellKind::Barrier
    }
}

/// A square grid of cells.
///
/// The grid tracks where its start and end markers are, so painting a new start or end
/// moves the marker instead of duplicating it. Neighbor lists are derived data and go stale
/// on every layout edit until [`Grid::update_all_neighbors`] is called.
#[derive(Clone, Debug)]
pub struct Grid {
    rows: usize,
    width: usize,
    cells: Vec<Vec<Cell>>,
    start: Option<Point>,
    end: Option<Point>,
    neighbors_stale: bool,
}

impl Grid {
    /// Pixel width used when a grid is created without presentation geometry
    pub const DEFAULT_WIDTH: usize = 800;

    /// Create a `rows` x `rows` grid of empty cells spanning `width` pixels
    pub fn build(rows: usize, width: usize) -> Result<Self, GridError> {
        if rows == 0 {
            return Err(GridError::NoRows);
        }
        let gap = width / rows;
        let cells = (0..rows)
            .map(|row| {
                (0..rows)
                    .map(|col| Cell::new(Point { row, col }, gap))
                    .collect()
            })
            .collect();

        Ok(Self {
            rows,
            width,
            cells,
            start: None,
            end: None,
            neighbors_stale: true,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Side length of one cell in pixels
    pub fn cell_width(&self) -> usize {
        self.width / self.rows
    }

    pub fn start(&self) -> Option<Point> {
        self.start
    }

    pub fn end(&self) -> Option<Point> {
        self.end
    }

    pub fn is_valid(&self, point: Point) -> bool {
        point.row < self.rows && point.col < self.rows
    }

    pub fn get(&self, point: Point) -> Option<&Cell> {
        self.cells.get(point.row)?.get(point.col)
    }

    /// Returns the cell at `point`.
    ///
    /// Panics if the point is outside the grid, use [`Grid::get`] for unchecked input.
    pub fn cell(&self, point: Point) -> &Cell {
        &self.cells[point.row][point.col]
    }

    pub fn kind(&self, point: Point) -> CellKind {
        self.cell(point).kind
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().flatten()
    }

    /// Number of cells currently holding `kind`
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells().filter(|c| c.kind == kind).count()
    }

    pub fn neighbors_stale(&self) -> bool {
        self.neighbors_stale
    }

    fn check(&self, point: Point) -> Result<(), GridError> {
        if self.is_valid(point) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds {
                point,
                rows: self.rows,
            })
        }
    }

    /// Classification written by the search engine. Layout markers go through the paint
    /// operations instead.
    pub(crate) fn mark(&mut self, point: Point, kind: CellKind) {
        self.cells[point.row][point.col].kind = kind;
    }

    /// Overwrite a cell with a layout marker, releasing start/end if they are replaced
    fn place(&mut self, point: Point, kind: CellKind) {
        if self.start == Some(point) {
            self.start = None;
        }
        if self.end == Some(point) {
            self.end = None;
        }
        self.mark(point, kind);
        self.neighbors_stale = true;
    }

    /// Place the start marker, moving it if one already exists
    pub fn set_start(&mut self, point: Point) -> Result<(), GridError> {
        self.check(point)?;
        if self.end == Some(point) {
            return Err(GridError::Occupied {
                point,
                kind: CellKind::End,
            });
        }
        if let Some(old) = self.start {
            self.place(old, CellKind::Empty);
        }
        self.place(point, CellKind::Start);
        self.start = Some(point);
        Ok(())
    }

    /// Place the end marker, moving it if one already exists
    pub fn set_end(&mut self, point: Point) -> Result<(), GridError> {
        self.check(point)?;
        if self.start == Some(point) {
            return Err(GridError::Occupied {
                point,
                kind: CellKind::Start,
            });
        }
        if let Some(old) = self.end {
            self.place(old, CellKind::Empty);
        }
        self.place(point, CellKind::End);
        self.end = Some(point);
        Ok(())
    }

    pub fn set_barrier(&mut self, point: Point) -> Result<(), GridError> {
        self.check(point)?;
        match self.kind(point) {
            kind @ (CellKind::Start | CellKind::End) => Err(GridError::Occupied { point, kind }),
            _ => {
                self.place(point, CellKind::Barrier);
                Ok(())
            }
        }
    }

    /// Un-paint a cell back to empty
    pub fn reset_cell(&mut self, point: Point) -> Result<(), GridError> {
        self.check(point)?;
        self.place(point, CellKind::Empty);
        Ok(())
    }

    /// Apply a primary click: the first click places the start, the second the end, and
    /// later clicks place barriers. Clicks on the start or end are ignored.
    ///
    /// Returns the marker that was painted, if any.
    pub fn paint(&mut self, point: Point) -> Result<Option<CellKind>, GridError> {
        self.check(point)?;
        if self.start == Some(point) || self.end == Some(point) {
            return Ok(None);
        }

        let kind = if self.start.is_none() {
            self.set_start(point)?;
            CellKind::Start
        } else if self.end.is_none() {
            self.set_end(point)?;
            CellKind::End
        } else {
            self.set_barrier(point)?;
            CellKind::Barrier
        };
        Ok(Some(kind))
    }

    /// Reset every cell to empty and forget the start and end
    pub fn clear(&mut self) {
        for cell in self.cells.iter_mut().flatten() {
            cell.kind = CellKind::Empty;
            cell.neighbors.clear();
        }
        self.start = None;
        self.end = None;
        self.neighbors_stale = true;
    }

    /// Remove the marks of a previous search run while keeping the painted layout
    pub fn clear_search(&mut self) {
        for cell in self.cells.iter_mut().flatten() {
            if cell.kind.is_search_mark() {
                cell.kind = CellKind::Empty;
            }
        }
        // a cancelled run may have left the end marked as open
        if let Some(end) = self.end {
            self.mark(end, CellKind::End);
        }
    }

    /// Recompute the cached neighbors of one cell.
    ///
    /// Order is fixed: down, up, right, left. Out of bounds positions and barriers are skipped.
    pub fn update_neighbors(&mut self, point: Point) {
        let mut neighbors = Vec::with_capacity(4);

        if point.row + 1 < self.rows {
            neighbors.push(Point {
                row: point.row + 1,
                col: point.col,
            });
        }
        if point.row > 0 {
            neighbors.push(Point {
                row: point.row - 1,
                col: point.col,
            });
        }
        if point.col + 1 < self.rows {
            neighbors.push(Point {
                row: point.row,
                col: point.col + 1,
            });
        }
        if point.col > 0 {
            neighbors.push(Point {
                row: point.row,
                col: point.col - 1,
            });
        }

        // filter to only keep passable cells
        neighbors.retain(|p| !self.cell(*p).is_barrier());

        self.cells[point.row][point.col].neighbors = neighbors;
    }

    /// Recompute the neighbors of every cell. Required after any layout edit before searching.
    pub fn update_all_neighbors(&mut self) {
        for row in 0..self.rows {
            for col in 0..self.rows {
                self.update_neighbors(Point { row, col });
            }
        }
        self.neighbors_stale = false;
    }

    /// Create a storage for per-cell values of type T, shaped like this grid
    pub fn create_storage<T: Default + Clone>(&self) -> CellStorage<T> {
        CellStorage(vec![vec![T::default(); self.rows]; self.rows])
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.cells {
            for cell in row {
                write!(f, "{}", cell.kind.symbol())?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl FromStr for Grid {
    type Err = GridError;

    /// Parses the ASCII layout printed by `Display`. Blank lines and surrounding whitespace
    /// are ignored, every remaining line is one row.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let rows = lines.len();
        let mut grid = Grid::build(rows, Grid::DEFAULT_WIDTH)?;

        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != rows {
                return Err(GridError::NotSquare {
                    row,
                    found,
                    expected: rows,
                });
            }

            for (col, symbol) in line.chars().enumerate() {
                let point = Point { row, col };
                let kind = CellKind::from_symbol(symbol)
                    .ok_or(GridError::UnknownSymbol { symbol, point })?;

                match kind {
                    CellKind::Start if grid.start.is_some() => {
                        return Err(GridError::Duplicate(kind))
                    }
                    CellKind::End if grid.end.is_some() => return Err(GridError::Duplicate(kind)),
                    CellKind::Start => grid.set_start(point)?,
                    CellKind::End => grid.set_end(point)?,
                    CellKind::Barrier => grid.set_barrier(point)?,
                    _ => grid.mark(point, kind),
                }
            }
        }

        Ok(grid)
    }
}

/// Per-cell values stored in the same rectangular shape as the grid (a vec in a vec)
#[derive(Clone, Debug)]
pub struct CellStorage<T>(Vec<Vec<T>>);

impl<T: Copy> CellStorage<T> {
    pub fn get(&self, point: Point) -> T {
        self.0[point.row][point.col]
    }

    pub fn set(&mut self, point: Point, value: T) {
        self.0[point.row][point.col] = value;
    }
}

impl Display for CellStorage<Option<usize>> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.0 {
            for value in row {
                match value {
                    Some(v) => write!(f, "{:03} ", v)?,
                    None => write!(f, "{:>3} ", "-")?,
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
