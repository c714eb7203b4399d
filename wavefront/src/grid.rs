use crate::error::GridError;
use crate::find::MapStorage;
use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Wall,
    Goal,
}

impl Cell {
    /// The integer code used by level files: 0 empty, 1 wall, 2 goal.
    pub fn code(&self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Wall => 1,
            Cell::Goal => 2,
        }
    }

    pub fn is_wall(&self) -> bool {
        matches!(self, Cell::Wall)
    }
}

impl TryFrom<u8> for Cell {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Cell::Empty),
            1 => Ok(Cell::Wall),
            2 => Ok(Cell::Goal),
            other => Err(other),
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Cell::Empty => " ",
                Cell::Wall => "#",
                Cell::Goal => "G",
            }
        )
    }
}

/// The eight moves on the grid, all with the same cost.
///
/// [`Direction::ALL`] is the enumeration order used by both the flood fill and
/// the path tracer: the four cardinals clockwise from north, then the four
/// diagonals clockwise from north-east.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
    NorthEast,
    SouthEast,
    SouthWest,
    NorthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::NorthWest,
    ];

    /// The direction of a single step from `from` to `to`, if they are adjacent.
    pub fn between(from: Point, to: Point) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|d| from.step(*d) == Some(to))
    }

    /// (row, col) offset of a single step in this direction
    pub fn offset(&self) -> (isize, isize) {
        match self {
            Direction::North => (-1, 0),
            Direction::East => (0, 1),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
            Direction::NorthEast => (-1, 1),
            Direction::SouthEast => (1, 1),
            Direction::SouthWest => (1, -1),
            Direction::NorthWest => (-1, -1),
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Direction::North => "n",
                Direction::East => "e",
                Direction::South => "s",
                Direction::West => "w",
                Direction::NorthEast => "ne",
                Direction::SouthEast => "se",
                Direction::SouthWest => "sw",
                Direction::NorthWest => "nw",
            }
        )
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The point one step away in `direction`, if it does not underflow.
    /// Upper bounds are checked by the map.
    pub fn step(&self, direction: Direction) -> Option<Point> {
        let (dr, dc) = direction.offset();
        Some(Point {
            row: self.row.checked_add_signed(dr)?,
            col: self.col.checked_add_signed(dc)?,
        })
    }

    /// True if `other` is one of the eight neighbors of this point.
    pub fn is_adjacent(&self, other: &Point) -> bool {
        self != other && self.row.abs_diff(other.row) <= 1 && self.col.abs_diff(other.col) <= 1
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
            .ok_or_else(|| anyhow::anyhow!("Invalid point, expected row,col: {}", s))?;
        Ok(Point {
            row: row.trim().parse()?,
            col: col.trim().parse()?,
        })
    }
}

/// A rectangular grid of cells
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GridMap {
    pub rows: usize,
    pub columns: usize,
    pub cells: Vec<Vec<Cell>>,
}

impl GridMap {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![vec![Cell::Empty; columns]; rows],
        }
    }

    /// Builds a map from rows of cells, checking that it is non-empty and
    /// rectangular.
    pub fn from_cells(cells: Vec<Vec<Cell>>) -> Result<Self, GridError> {
        let rows = cells.len();
        let columns = cells.first().map(Vec::len).unwrap_or(0);
        let map = Self {
            rows,
            columns,
            cells,
        };
        map.check_shape()?;
        Ok(map)
    }

    /// Builds a map from level file codes (0 empty, 1 wall, 2 goal).
    pub fn from_codes(codes: Vec<Vec<u8>>) -> Result<Self, GridError> {
        let cells = codes
            .into_iter()
            .enumerate()
            .map(|(row, line)| {
                line.into_iter()
                    .enumerate()
                    .map(|(col, code)| {
                        Cell::try_from(code).map_err(|code| GridError::UnknownCode {
                            point: Point { row, col },
                            code,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_cells(cells)
    }

    /// The level file codes of every cell, the inverse of [`GridMap::from_codes`].
    pub fn to_codes(&self) -> Vec<Vec<u8>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(Cell::code).collect())
            .collect()
    }

    /// The fields are public, so every planner call re-checks the shape.
    pub fn check_shape(&self) -> Result<(), GridError> {
        if self.rows == 0 || self.columns == 0 || self.cells.len() != self.rows {
            return Err(GridError::Empty);
        }
        for (row, line) in self.cells.iter().enumerate() {
            if line.len() != self.columns {
                return Err(GridError::NotRectangular {
                    row,
                    expected: self.columns,
                    found: line.len(),
                });
            }
        }
        Ok(())
    }

    pub fn is_valid(&self, point: Point) -> bool {
        point.row < self.rows && point.col < self.columns
    }

    pub fn get(&self, point: Point) -> Cell {
        self.cells[point.row][point.col]
    }

    pub fn set(&mut self, point: Point, cell: Cell) {
        self.cells[point.row][point.col] = cell;
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.rows * self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over all points in row-major order
    pub fn points(&self) -> impl Iterator<Item = Point> {
        let columns = self.columns;
        (0..self.rows).flat_map(move |row| (0..columns).map(move |col| Point { row, col }))
    }

    /// Returns the in-bounds neighbors of `point` in [`Direction::ALL`] order.
    /// Walls are included, callers decide what is traversable.
    pub fn neighbors_of(&self, point: Point) -> impl Iterator<Item = Point> + '_ {
        Direction::ALL
            .iter()
            .filter_map(move |d| point.step(*d))
            .filter(move |p| self.is_valid(*p))
    }

    /// Locates the single goal cell.
    pub fn goal(&self) -> Result<Point, GridError> {
        let mut goals = self.points().filter(|p| self.get(*p) == Cell::Goal);
        let first = goals.next().ok_or(GridError::NoGoal)?;
        match goals.next() {
            Some(second) => Err(GridError::MultipleGoals { first, second }),
            None => Ok(first),
        }
    }

    /// Moves the goal to `point`, clearing any previous goal.
    pub fn set_goal(&mut self, point: Point) -> Result<(), GridError> {
        if !self.is_valid(point) {
            return Err(GridError::OutOfBounds(point));
        }
        if self.get(point).is_wall() {
            return Err(GridError::GoalOnWall(point));
        }
        self.clear_goal();
        self.set(point, Cell::Goal);
        Ok(())
    }

    /// Turns every goal cell back into an empty cell.
    pub fn clear_goal(&mut self) {
        for cell in self.cells.iter_mut().flatten() {
            if *cell == Cell::Goal {
                *cell = Cell::Empty;
            }
        }
    }

    /// Finds an empty cell right of, below, left of or above `point`, in that
    /// order. Used to move a start that was placed on a wall.
    pub fn adjacent_walkable(&self, point: Point) -> Option<Point> {
        [
            Direction::East,
            Direction::South,
            Direction::West,
            Direction::North,
        ]
        .iter()
        .filter_map(|d| point.step(*d))
        .find(|p| self.is_valid(*p) && self.get(*p) == Cell::Empty)
    }

    /// Scales the map by the given factor, i.e. to make it twice as large, pass 2.
    /// Interpolates the cells by repeating the existing cells in the new grid,
    /// except the goal which is only kept in the top-left cell of its block.
    pub fn scale_up(&mut self, factor: usize) {
        let mut new_cells = vec![vec![Cell::default(); self.columns * factor]; self.rows * factor];

        for row in 0..self.rows {
            for col in 0..self.columns {
                let cell = self.cells[row][col];
                for r in 0..factor {
                    for c in 0..factor {
                        new_cells[row * factor + r][col * factor + c] = match cell {
                            Cell::Goal if r != 0 || c != 0 => Cell::Empty,
                            _ => cell,
                        };
                    }
                }
            }
        }

        self.rows *= factor;
        self.columns *= factor;
        self.cells = new_cells;
    }

    /// Create a storage for values of type T with one entry per cell
    pub fn create_storage<T: Default + Copy + 'static>(&self) -> CellStorage<T> {
        CellStorage(vec![vec![Default::default(); self.columns]; self.rows])
    }
}

impl Display for GridMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.cells {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// A MapStorage that uses a rectangular grid of cells (a vec in a vec)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellStorage<T>(Vec<Vec<T>>);

impl<T: Copy + 'static> MapStorage<T> for CellStorage<T> {
    type Reference = Point;

    fn is_valid(&self, node: Self::Reference) -> bool {
        node.row < self.0.len() && node.col < self.0[0].len()
    }

    fn get(&self, node: Self::Reference) -> T {
        self.0[node.row][node.col]
    }

    fn get_mut(&mut self, node: Self::Reference) -> &mut T {
        &mut self.0[node.row][node.col]
    }
}

impl<T> CellStorage<T> {
    pub fn rows(&self) -> &[Vec<T>] {
        &self.0
    }
}

impl<T: Display> Display for CellStorage<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.0 {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
