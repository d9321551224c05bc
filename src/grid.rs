//! Grid model: cell coordinates, directions and per-cell wall masks.
//!
//! The grid only stores wall topology. Generation-time visited flags belong to the carver and
//! solver marks belong to the solvers, so a finished grid never changes again.

use std::fmt;

use crate::error::MazeError;

/// Coordinate of a cell in the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Zero-based row, growing southwards.
    pub row: usize,
    /// Zero-based column, growing eastwards.
    pub col: usize,
}

impl Position {
    /// Builds a position from a row and a column.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "({}, {})", self.row, self.col)
    }
}

/// One of the four cardinal directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards row 0.
    North,
    /// Towards the last column.
    East,
    /// Towards the last row.
    South,
    /// Towards column 0.
    West,
}

impl Direction {
    /// All directions in clockwise order starting at north.
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Bit used for this direction in a [`Walls`] mask.
    #[must_use]
    pub const fn bit(self) -> u8 {
        match self {
            Self::North => 0b0001,
            Self::East => 0b0010,
            Self::South => 0b0100,
            Self::West => 0b1000,
        }
    }

    /// Quarter turn clockwise (north becomes east).
    #[must_use]
    pub const fn turn_right(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    /// Quarter turn counter-clockwise (north becomes west).
    #[must_use]
    pub const fn turn_left(self) -> Self {
        match self {
            Self::North => Self::West,
            Self::West => Self::South,
            Self::South => Self::East,
            Self::East => Self::North,
        }
    }

    /// Half turn (north becomes south).
    #[must_use]
    pub const fn turn_back(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }
}

/// Wall mask of a single cell. A set bit means the boundary on that side is closed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Walls(u8);

impl Walls {
    /// Every side closed, the state of a freshly created cell.
    pub const ALL: Self = Self(0b1111);

    /// Every side open.
    pub const NONE: Self = Self(0);

    /// Builds a mask from raw bits, ignoring anything above the four direction bits.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// Raw bits of the mask, see [`Direction::bit`].
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Whether the boundary towards `direction` is a wall.
    #[must_use]
    pub const fn has_wall(self, direction: Direction) -> bool {
        self.0 & direction.bit() != 0
    }

    /// Removes the wall towards `direction`.
    fn open(&mut self, direction: Direction) {
        self.0 &= !direction.bit();
    }
}

/// Fixed-size rows x cols grid of wall masks.
///
/// Every mutation goes through [`Grid::open_between`], which updates both sides of a boundary
/// together, so the mask of a cell always agrees with the opposite mask of its neighbor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    /// Number of rows.
    rows: usize,
    /// Number of columns.
    cols: usize,
    /// Row-major wall masks.
    cells: Vec<Walls>,
}

impl Grid {
    /// Creates a fully walled grid.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::InvalidDimension`] when `rows` or `cols` is zero, when the cell count
    /// or the drawing raster does not fit in a `usize`, or when the cells cannot be allocated.
    pub fn new(rows: usize, cols: usize) -> Result<Self, MazeError> {
        let count = checked_cell_count(rows, cols)?;
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(count)
            .map_err(|_err| MazeError::InvalidDimension { rows, cols })?;
        cells.resize(count, Walls::ALL);

        Ok(Self { rows, cols, cells })
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Whether `position` lies inside the grid.
    #[must_use]
    pub const fn contains(&self, position: Position) -> bool {
        position.row < self.rows && position.col < self.cols
    }

    /// Row-major index of `position`, if it lies inside the grid.
    pub(crate) const fn index(&self, position: Position) -> Option<usize> {
        if self.contains(position) {
            Some(position.row * self.cols + position.col)
        } else {
            None
        }
    }

    /// Wall mask of the cell at `position`.
    #[must_use]
    pub fn walls(&self, position: Position) -> Option<Walls> {
        self.index(position)
            .and_then(|index| self.cells.get(index))
            .copied()
    }

    /// Whether one can walk from `position` towards `direction`. Boundaries of the grid are
    /// always closed, and so is anything asked about a cell outside the grid.
    #[must_use]
    pub fn is_open(&self, position: Position, direction: Direction) -> bool {
        self.walls(position)
            .is_some_and(|walls| !walls.has_wall(direction))
            && self.neighbor(position, direction).is_some()
    }

    /// The in-bounds cell next to `position` towards `direction`.
    #[must_use]
    pub fn neighbor(&self, position: Position, direction: Direction) -> Option<Position> {
        let next = match direction {
            Direction::North => Position::new(position.row.checked_sub(1)?, position.col),
            Direction::East => Position::new(position.row, position.col.checked_add(1)?),
            Direction::South => Position::new(position.row.checked_add(1)?, position.col),
            Direction::West => Position::new(position.row, position.col.checked_sub(1)?),
        };

        (self.contains(position) && self.contains(next)).then_some(next)
    }

    /// Up to four in-bounds neighbors of `position`, in north, east, south, west order.
    #[must_use]
    pub fn neighbors(&self, position: Position) -> Vec<Position> {
        Direction::ALL
            .into_iter()
            .filter_map(|direction| self.neighbor(position, direction))
            .collect()
    }

    /// Neighbors reachable from `position` through an open boundary.
    pub fn open_neighbors(&self, position: Position) -> impl Iterator<Item = Position> + '_ {
        Direction::ALL.into_iter().filter_map(move |direction| {
            if self.is_open(position, direction) {
                self.neighbor(position, direction)
            } else {
                None
            }
        })
    }

    /// Carves a passage between two 4-adjacent cells.
    ///
    /// # Errors
    ///
    /// - [`MazeError::OutOfBounds`] when either cell lies outside the grid.
    /// - [`MazeError::NotAdjacent`] when the cells do not share a boundary.
    pub fn open_between(&mut self, first: Position, second: Position) -> Result<(), MazeError> {
        let first_index = self.index(first).ok_or(MazeError::OutOfBounds(first))?;
        let second_index = self.index(second).ok_or(MazeError::OutOfBounds(second))?;
        let direction = Direction::ALL
            .into_iter()
            .find(|direction| self.neighbor(first, *direction) == Some(second))
            .ok_or(MazeError::NotAdjacent { first, second })?;

        if let Some(walls) = self.cells.get_mut(first_index) {
            walls.open(direction);
        }
        if let Some(walls) = self.cells.get_mut(second_index) {
            walls.open(direction.turn_back());
        }

        Ok(())
    }

    /// Number of open passages. Each passage is counted once.
    #[must_use]
    pub fn passage_count(&self) -> usize {
        self.positions()
            .map(|position| {
                [Direction::East, Direction::South]
                    .into_iter()
                    .filter(|direction| self.is_open(position, *direction))
                    .count()
            })
            .sum()
    }

    /// Every position of the grid in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let (rows, cols) = (self.rows, self.cols);
        (0..rows).flat_map(move |row| (0..cols).map(move |col| Position::new(row, col)))
    }
}

/// Validates maze dimensions and returns the number of cells.
///
/// Both sides must be positive, the cell count must fit in a `usize`, and so must the
/// `2 * n + 1` raster the maze is drawn on.
///
/// # Errors
///
/// Returns [`MazeError::InvalidDimension`] when any of these fails.
pub(crate) fn checked_cell_count(rows: usize, cols: usize) -> Result<usize, MazeError> {
    let raster_side = |cells: usize| cells.checked_mul(2).and_then(|side| side.checked_add(1));

    if rows == 0 || cols == 0 || raster_side(rows).is_none() || raster_side(cols).is_none() {
        return Err(MazeError::InvalidDimension { rows, cols });
    }

    rows.checked_mul(cols)
        .ok_or(MazeError::InvalidDimension { rows, cols })
}
