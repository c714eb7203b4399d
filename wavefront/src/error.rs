//! Error types for the wavefront planner.
//!
//! The two planner operations fail with distinct error types so a caller can
//! tell a bad grid from a bad start cell without inspecting planner state.

use thiserror::Error;

use crate::grid::Point;

/// The grid handed to the planner violates its preconditions.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum GridError {
    /// The grid has no rows or no columns.
    #[error("grid is empty")]
    Empty,
    /// A row has a different length than the first row.
    #[error("grid is not rectangular: row {row} has {found} columns, expected {expected}")]
    NotRectangular {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A raw cell code that is not one of empty (0), wall (1) or goal (2).
    #[error("unknown cell code {code} at {point}")]
    UnknownCode { point: Point, code: u8 },
    #[error("goal position not found in the map")]
    NoGoal,
    #[error("more than one goal in the map: {first} and {second}")]
    MultipleGoals { first: Point, second: Point },
    /// A point outside of the grid was used to place the goal.
    #[error("goal {0} is outside of the map")]
    OutOfBounds(Point),
    #[error("goal {0} is on a wall")]
    GoalOnWall(Point),
}

/// The start cell handed to the path tracer is not usable.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartError {
    #[error("start {0} is outside of the map")]
    OutOfBounds(Point),
    #[error("start {0} is on a wall")]
    OnWall(Point),
}

/// Either of the planner errors, returned by [`crate::find::plan`].
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum PlanError {
    #[error("invalid grid: {0}")]
    InvalidGrid(#[from] GridError),
    #[error("invalid start: {0}")]
    InvalidStart(#[from] StartError),
}
