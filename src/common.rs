use std::collections::BTreeSet;

use serde::Serialize;

use crate::state::{HeuristicKind, RunLimits, RunState, StepModel};

/// Grid coordinate as `(x, y)`: column first, then row.
pub type Coord = (usize, usize);

pub type Path = Vec<Coord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
    /// Pseudo-direction of the origin, before any move has been made.
    None,
}

impl Direction {
    // Same order as the neighbor scan: up, down, left, right.
    pub const CARDINALS: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
            Direction::None => Direction::None,
        }
    }

    pub fn is_perpendicular(self, other: Direction) -> bool {
        match self {
            Direction::North | Direction::South => {
                matches!(other, Direction::East | Direction::West)
            }
            Direction::East | Direction::West => {
                matches!(other, Direction::North | Direction::South)
            }
            Direction::None => false,
        }
    }

    /// Coordinate reached after `stride` unit steps, ignoring the upper grid
    /// bounds. `None` when the move would go below zero or is not a move.
    pub fn offset(self, position: Coord, stride: usize) -> Option<Coord> {
        let (x, y) = position;
        match self {
            Direction::North => Some((x, y.checked_sub(stride)?)),
            Direction::South => Some((x, y.checked_add(stride)?)),
            Direction::East => Some((x.checked_add(stride)?, y)),
            Direction::West => Some((x.checked_sub(stride)?, y)),
            Direction::None => None,
        }
    }

    /// Direction of travel from `from` to `to`; `Direction::None` unless the
    /// two coordinates share a row or a column and differ.
    pub fn between(from: Coord, to: Coord) -> Direction {
        if from.0 == to.0 && from.1 != to.1 {
            if to.1 < from.1 {
                Direction::North
            } else {
                Direction::South
            }
        } else if from.1 == to.1 && from.0 != to.0 {
            if to.0 < from.0 {
                Direction::West
            } else {
                Direction::East
            }
        } else {
            Direction::None
        }
    }

    pub fn arrow(self) -> char {
        match self {
            Direction::North => '^',
            Direction::South => 'v',
            Direction::East => '>',
            Direction::West => '<',
            Direction::None => '.',
        }
    }
}

pub fn manhattan(a: Coord, b: Coord) -> usize {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
}

/// One search request against a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub origin: Coord,
    pub destination: Coord,
    pub limits: RunLimits,
    pub model: StepModel,
    pub heuristic: HeuristicKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub cost: usize,
    pub path: Path,
    pub final_state: RunState,
    /// Coordinates the search reached in any run state.
    pub explored: BTreeSet<Coord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_offset() {
        assert_eq!(Direction::East.offset((2, 3), 4), Some((6, 3)));
        assert_eq!(Direction::North.offset((2, 3), 3), Some((2, 0)));
        assert_eq!(Direction::North.offset((2, 3), 4), None);
        assert_eq!(Direction::West.offset((0, 0), 1), None);
        assert_eq!(Direction::None.offset((1, 1), 0), None);
    }

    #[test]
    fn test_direction_relations() {
        assert!(Direction::North.is_perpendicular(Direction::East));
        assert!(!Direction::North.is_perpendicular(Direction::South));
        assert!(!Direction::None.is_perpendicular(Direction::West));
        for direction in Direction::CARDINALS {
            assert_eq!(direction.opposite().opposite(), direction);
            assert_ne!(direction.opposite(), direction);
        }
    }

    #[test]
    fn test_direction_between() {
        assert_eq!(Direction::between((1, 1), (1, 0)), Direction::North);
        assert_eq!(Direction::between((1, 1), (1, 5)), Direction::South);
        assert_eq!(Direction::between((1, 1), (4, 1)), Direction::East);
        assert_eq!(Direction::between((1, 1), (0, 1)), Direction::West);
        assert_eq!(Direction::between((1, 1), (2, 2)), Direction::None);
        assert_eq!(Direction::between((1, 1), (1, 1)), Direction::None);
    }
}
