use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;
use std::fs;
use std::ops::RangeInclusive;
use std::str::FromStr;

use anyhow::Context;
use rand::Rng;

use crate::common::{Coord, Direction};
use crate::error::{MapError, SearchError};

/// Static rectangular grid of cell costs. `grid[y][x]` is the cost paid when
/// entering `(x, y)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Map {
    pub height: usize,
    pub width: usize,
    grid: Vec<Vec<usize>>,
}

impl Map {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let input =
            fs::read_to_string(path).with_context(|| format!("cannot read map file {path}"))?;
        let map = input
            .parse::<Map>()
            .with_context(|| format!("malformed map file {path}"))?;
        Ok(map)
    }

    pub fn from_rows(rows: Vec<Vec<usize>>) -> Result<Self, MapError> {
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(MapError::Empty);
        }
        if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(MapError::RaggedRow {
                row,
                expected: width,
                found: cells.len(),
            });
        }

        Ok(Map {
            height: rows.len(),
            width,
            grid: rows,
        })
    }

    /// Grid with every cost drawn uniformly from `costs`.
    pub fn random<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        costs: RangeInclusive<usize>,
        rng: &mut R,
    ) -> Result<Self, MapError> {
        let rows = (0..height)
            .map(|_| (0..width).map(|_| rng.gen_range(costs.clone())).collect())
            .collect();
        Self::from_rows(rows)
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn bottom_right(&self) -> Coord {
        (self.width - 1, self.height - 1)
    }

    pub fn min_cost(&self) -> usize {
        self.grid.iter().flatten().copied().min().unwrap_or(0)
    }

    pub fn in_bounds(&self, position: Coord) -> bool {
        position.0 < self.width && position.1 < self.height
    }

    pub fn cost(&self, position: Coord) -> Result<usize, SearchError> {
        if !self.in_bounds(position) {
            return Err(SearchError::OutOfBounds {
                position,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.grid[position.1][position.0])
    }

    /// Coordinate reached after `stride` cells in `direction`, or `None` if
    /// the move leaves the grid. Cells along an axis are contiguous, so an
    /// in-bounds endpoint means every intermediate cell is in bounds too.
    pub fn step(&self, position: Coord, direction: Direction, stride: usize) -> Option<Coord> {
        if !self.in_bounds(position) {
            return None;
        }
        let target = direction.offset(position, stride)?;
        self.in_bounds(target).then_some(target)
    }

    /// Sum of the costs of every cell entered by the move, start excluded.
    pub fn path_cost(
        &self,
        position: Coord,
        direction: Direction,
        stride: usize,
    ) -> Result<usize, SearchError> {
        let mut total = 0;
        for offset in 1..=stride {
            let cell = self
                .step(position, direction, offset)
                .ok_or(SearchError::MoveOutOfBounds {
                    from: position,
                    direction,
                    stride,
                })?;
            total += self.cost(cell)?;
        }
        Ok(total)
    }

    /// Exact cost-to-go toward `goal` on the unconstrained grid, by Dijkstra
    /// outward from the goal. Indexed as `[y][x]`.
    pub(crate) fn heuristic_dji(&self, goal: Coord) -> Vec<Vec<usize>> {
        let mut heuristic = vec![vec![usize::MAX; self.width]; self.height];
        let mut heap = BinaryHeap::new();

        heuristic[goal.1][goal.0] = 0;
        heap.push((Reverse(0), goal));

        while let Some((Reverse(cost), (x, y))) = heap.pop() {
            if cost > heuristic[y][x] {
                continue;
            }

            // Reaching (x, y) from any neighbor pays the cost of (x, y).
            let next_cost = cost + self.grid[y][x];
            for direction in Direction::CARDINALS {
                let Some((new_x, new_y)) = self.step((x, y), direction, 1) else {
                    continue;
                };
                if next_cost < heuristic[new_y][new_x] {
                    heuristic[new_y][new_x] = next_cost;
                    heap.push((Reverse(next_cost), (new_x, new_y)));
                }
            }
        }

        heuristic
    }
}

impl FromStr for Map {
    type Err = MapError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let rows = input
            .trim_matches(|c| c == '\n' || c == '\r')
            .lines()
            .enumerate()
            .map(|(row, line)| {
                line.chars()
                    .enumerate()
                    .map(|(column, ch)| {
                        ch.to_digit(10)
                            .map(|digit| digit as usize)
                            .ok_or(MapError::InvalidCell {
                                row,
                                column,
                                found: ch,
                            })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Map::from_rows(rows)
    }
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.grid.iter().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for cost in row {
                write!(f, "{cost}")?;
            }
        }
        Ok(())
    }
}
