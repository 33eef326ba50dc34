//! Typed errors for grid parsing and constrained search.
//!
//! Every error is terminal for the search that raised it; there is no
//! partial result.

use std::fmt;

use crate::common::{Coord, Direction};

/// Failure while building a grid from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// The input holds no rows, or only empty rows.
    Empty,
    /// A row whose length differs from the first row.
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A character that is not a single decimal digit.
    InvalidCell {
        row: usize,
        column: usize,
        found: char,
    },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "grid is empty"),
            Self::RaggedRow {
                row,
                expected,
                found,
            } => write!(
                f,
                "row {row} has {found} cells, expected {expected} like the first row"
            ),
            Self::InvalidCell { row, column, found } => {
                write!(f, "invalid cell {found:?} at row {row}, column {column}")
            }
        }
    }
}

impl std::error::Error for MapError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// A coordinate outside `[0, width) x [0, height)`.
    OutOfBounds {
        position: Coord,
        width: usize,
        height: usize,
    },
    /// A move whose cells leave the grid.
    MoveOutOfBounds {
        from: Coord,
        direction: Direction,
        stride: usize,
    },
    InvalidRunLimits {
        min_run: usize,
        max_run: usize,
    },
    /// The frontier ran dry before the destination was reached.
    EmptyFrontier,
    /// Back-pointers do not lead back to the origin.
    BrokenChain {
        position: Coord,
        steps: usize,
    },
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds {
                position,
                width,
                height,
            } => write!(f, "coordinate {position:?} is outside the {width}x{height} grid"),
            Self::MoveOutOfBounds {
                from,
                direction,
                stride,
            } => write!(
                f,
                "moving {stride} cells {direction:?} from {from:?} leaves the grid"
            ),
            Self::InvalidRunLimits { min_run, max_run } => write!(
                f,
                "invalid run limits: min {min_run}, max {max_run} (need 1 <= max and min <= max)"
            ),
            Self::EmptyFrontier => {
                write!(f, "destination is unreachable under the run-length limits")
            }
            Self::BrokenChain { position, steps } => write!(
                f,
                "back-pointer chain broken at {position:?} after {steps} links"
            ),
        }
    }
}

impl std::error::Error for SearchError {}
