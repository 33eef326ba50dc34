//! Augmented search state: a grid coordinate plus the run that led to it.
//!
//! The legality of the next move and the cost of reaching a cell both depend
//! on the run history, so the search graph is over [`AugmentedNode`]s rather
//! than bare coordinates. A coordinate carries at most `4 * max_run + 1` run
//! states, which bounds the whole search.

use std::collections::{BTreeSet, HashMap};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::common::{manhattan, Coord, Direction};
use crate::error::SearchError;
use crate::map::Map;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RunState {
    pub direction: Direction,
    pub run_length: usize,
}

impl RunState {
    pub const ORIGIN: RunState = RunState {
        direction: Direction::None,
        run_length: 0,
    };

    pub fn is_origin(&self) -> bool {
        *self == Self::ORIGIN
    }

    /// Whether a path may end in this state: the last straight segment must
    /// have reached the minimum run.
    pub fn can_stop(&self, limits: &RunLimits) -> bool {
        self.is_origin() || self.run_length >= limits.min_run
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AugmentedNode {
    pub position: Coord,
    pub run: RunState,
}

impl AugmentedNode {
    pub fn origin(position: Coord) -> Self {
        AugmentedNode {
            position,
            run: RunState::ORIGIN,
        }
    }
}

/// Minimum and maximum straight run between turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunLimits {
    min_run: usize,
    max_run: usize,
}

impl RunLimits {
    /// `min_run == 0` means no minimum and behaves like 1.
    pub fn new(min_run: usize, max_run: usize) -> Result<Self, SearchError> {
        let effective_min = min_run.max(1);
        if max_run == 0 || effective_min > max_run {
            return Err(SearchError::InvalidRunLimits { min_run, max_run });
        }
        Ok(RunLimits {
            min_run: effective_min,
            max_run,
        })
    }

    pub fn min_run(&self) -> usize {
        self.min_run
    }

    pub fn max_run(&self) -> usize {
        self.max_run
    }

    pub fn run_states_per_cell(&self) -> usize {
        4 * self.max_run + 1
    }
}

/// Granularity of the state space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StepModel {
    /// Every transition moves one cell; turns wait until the minimum run.
    #[default]
    Unit,
    /// A turn jumps `min_run` cells at once, continuing moves one cell.
    Jump,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub direction: Direction,
    pub stride: usize,
    pub run: RunState,
}

pub fn legal_transitions(
    node: &AugmentedNode,
    limits: &RunLimits,
    model: StepModel,
) -> Vec<Transition> {
    let run = node.run;
    let turn_stride = match model {
        StepModel::Unit => 1,
        StepModel::Jump => limits.min_run,
    };

    let mut transitions = Vec::with_capacity(3);
    for direction in Direction::CARDINALS {
        let turning = run.is_origin()
            || (direction.is_perpendicular(run.direction) && run.run_length >= limits.min_run);

        if turning {
            transitions.push(Transition {
                direction,
                stride: turn_stride,
                run: RunState {
                    direction,
                    run_length: turn_stride,
                },
            });
        } else if direction == run.direction && run.run_length < limits.max_run {
            transitions.push(Transition {
                direction,
                stride: 1,
                run: RunState {
                    direction,
                    run_length: run.run_length + 1,
                },
            });
        }
    }

    transitions
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HeuristicKind {
    /// Always zero: plain Dijkstra.
    Zero,
    /// Manhattan distance times the cheapest cell on the grid.
    Manhattan,
    /// Exact cost-to-go ignoring the run-length rules.
    #[default]
    Relaxed,
}

/// Admissible, consistent estimate of the remaining cost to one destination.
#[derive(Debug, Clone)]
pub struct Heuristic {
    kind: HeuristicKind,
    destination: Coord,
    scale: usize,
    table: Vec<Vec<usize>>,
}

impl Heuristic {
    /// `destination` must lie on `map`.
    pub fn new(kind: HeuristicKind, map: &Map, destination: Coord) -> Self {
        let (scale, table) = match kind {
            HeuristicKind::Zero => (0, Vec::new()),
            HeuristicKind::Manhattan => (map.min_cost(), Vec::new()),
            HeuristicKind::Relaxed => (1, map.heuristic_dji(destination)),
        };
        Heuristic {
            kind,
            destination,
            scale,
            table,
        }
    }

    pub fn estimate(&self, position: Coord) -> usize {
        match self.kind {
            HeuristicKind::Zero => 0,
            HeuristicKind::Manhattan => manhattan(position, self.destination) * self.scale,
            HeuristicKind::Relaxed => self
                .table
                .get(position.1)
                .and_then(|row| row.get(position.0))
                .copied()
                .unwrap_or(0),
        }
    }
}

/// Handle of a node stored in a [`BestCostTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    pub node: AugmentedNode,
    pub cost: usize,
    pub predecessor: Option<NodeId>,
}

/// Best known cost and back-pointer for every augmented node reached so far.
/// Records live in an arena; links between them are [`NodeId`]s.
#[derive(Debug, Default)]
pub struct BestCostTable {
    index: HashMap<AugmentedNode, NodeId>,
    records: Vec<NodeRecord>,
}

impl BestCostTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&NodeRecord> {
        self.records.get(id.0)
    }

    pub fn lookup(&self, node: &AugmentedNode) -> Option<(NodeId, usize)> {
        let id = *self.index.get(node)?;
        Some((id, self.records[id.0].cost))
    }

    /// Records `cost` for `node` if it beats the current best, or if the node
    /// is new. Returns the node's handle when the table changed.
    pub fn relax(
        &mut self,
        node: AugmentedNode,
        cost: usize,
        predecessor: Option<NodeId>,
    ) -> Option<NodeId> {
        match self.index.get(&node) {
            Some(&id) => {
                let record = &mut self.records[id.0];
                if cost >= record.cost {
                    return None;
                }
                record.cost = cost;
                record.predecessor = predecessor;
                Some(id)
            }
            None => {
                let id = NodeId(self.records.len());
                self.records.push(NodeRecord {
                    node,
                    cost,
                    predecessor,
                });
                self.index.insert(node, id);
                Some(id)
            }
        }
    }

    /// Handle of `node` when `cost` is still its best recorded cost. Entries
    /// queued before a cheaper relaxation are stale and get `None`.
    pub fn live_id(&self, node: &AugmentedNode, cost: usize) -> Option<NodeId> {
        self.lookup(node).and_then(|(id, best)| (best == cost).then_some(id))
    }

    /// Every coordinate with at least one recorded run state.
    pub fn positions(&self) -> BTreeSet<Coord> {
        self.records.iter().map(|record| record.node.position).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(position: Coord, direction: Direction, run_length: usize) -> AugmentedNode {
        AugmentedNode {
            position,
            run: RunState {
                direction,
                run_length,
            },
        }
    }

    fn moves(transitions: &[Transition]) -> Vec<(Direction, usize, usize)> {
        transitions
            .iter()
            .map(|t| (t.direction, t.stride, t.run.run_length))
            .collect()
    }

    #[test]
    fn test_run_limits() {
        let limits = RunLimits::new(0, 3).unwrap();
        assert_eq!((limits.min_run(), limits.max_run()), (1, 3));
        assert_eq!(limits.run_states_per_cell(), 13);

        assert_eq!(
            RunLimits::new(4, 3),
            Err(SearchError::InvalidRunLimits {
                min_run: 4,
                max_run: 3
            })
        );
        assert!(RunLimits::new(0, 0).is_err());
        assert!(RunLimits::new(10, 10).is_ok());
    }

    #[test]
    fn test_origin_transitions() {
        let limits = RunLimits::new(4, 10).unwrap();
        let origin = AugmentedNode::origin((5, 5));

        let unit = legal_transitions(&origin, &limits, StepModel::Unit);
        assert_eq!(
            moves(&unit),
            vec![
                (Direction::North, 1, 1),
                (Direction::South, 1, 1),
                (Direction::West, 1, 1),
                (Direction::East, 1, 1),
            ]
        );

        let jump = legal_transitions(&origin, &limits, StepModel::Jump);
        assert_eq!(jump.len(), 4);
        assert!(jump.iter().all(|t| t.stride == 4 && t.run.run_length == 4));
    }

    #[test]
    fn test_unit_transitions_respect_limits() {
        let limits = RunLimits::new(1, 3).unwrap();

        // Below the maximum: continue or turn, never reverse.
        let transitions =
            legal_transitions(&node((2, 2), Direction::East, 2), &limits, StepModel::Unit);
        assert_eq!(
            moves(&transitions),
            vec![
                (Direction::North, 1, 1),
                (Direction::South, 1, 1),
                (Direction::East, 1, 3),
            ]
        );

        // At the maximum: only turns.
        let transitions =
            legal_transitions(&node((2, 2), Direction::East, 3), &limits, StepModel::Unit);
        assert_eq!(
            moves(&transitions),
            vec![(Direction::North, 1, 1), (Direction::South, 1, 1)]
        );
    }

    #[test]
    fn test_unit_transitions_wait_for_minimum() {
        let limits = RunLimits::new(4, 10).unwrap();

        let transitions =
            legal_transitions(&node((0, 3), Direction::South, 3), &limits, StepModel::Unit);
        assert_eq!(moves(&transitions), vec![(Direction::South, 1, 4)]);

        let transitions =
            legal_transitions(&node((0, 4), Direction::South, 4), &limits, StepModel::Unit);
        assert_eq!(
            moves(&transitions),
            vec![
                (Direction::South, 1, 5),
                (Direction::West, 1, 1),
                (Direction::East, 1, 1),
            ]
        );
    }

    #[test]
    fn test_jump_transitions() {
        let limits = RunLimits::new(4, 10).unwrap();

        let transitions =
            legal_transitions(&node((4, 0), Direction::East, 4), &limits, StepModel::Jump);
        assert_eq!(
            moves(&transitions),
            vec![
                (Direction::North, 4, 4),
                (Direction::South, 4, 4),
                (Direction::East, 1, 5),
            ]
        );

        let transitions =
            legal_transitions(&node((10, 0), Direction::East, 10), &limits, StepModel::Jump);
        assert!(transitions.iter().all(|t| t.direction != Direction::East));
        assert!(transitions.iter().all(|t| t.direction != Direction::West));
    }

    #[test]
    fn test_can_stop() {
        let limits = RunLimits::new(4, 10).unwrap();
        assert!(RunState::ORIGIN.can_stop(&limits));
        assert!(!node((0, 0), Direction::East, 3).run.can_stop(&limits));
        assert!(node((0, 0), Direction::East, 4).run.can_stop(&limits));
    }

    #[test]
    fn test_best_cost_is_monotone() {
        let mut table = BestCostTable::new();
        let origin = AugmentedNode::origin((0, 0));
        let next = node((1, 0), Direction::East, 1);

        let origin_id = table.relax(origin, 0, None).unwrap();
        let first = table.relax(next, 9, Some(origin_id)).unwrap();
        assert_eq!(table.lookup(&next).map(|(_, cost)| cost), Some(9));

        // Worse or equal costs never overwrite.
        assert_eq!(table.relax(next, 12, None), None);
        assert_eq!(table.relax(next, 9, None), None);
        assert_eq!(table.get(first).unwrap().predecessor, Some(origin_id));

        // A cheaper cost keeps the handle and replaces the back-pointer.
        assert_eq!(table.relax(next, 4, None), Some(first));
        assert_eq!(table.lookup(&next), Some((first, 4)));
        assert_eq!(table.get(first).unwrap().predecessor, None);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_live_id_rejects_stale_costs() {
        let mut table = BestCostTable::new();
        let next = node((0, 1), Direction::South, 1);
        let id = table.relax(next, 9, None).unwrap();
        assert_eq!(table.live_id(&next, 9), Some(id));

        table.relax(next, 4, None);
        assert_eq!(table.live_id(&next, 9), None);
        assert_eq!(table.live_id(&next, 4), Some(id));
        assert_eq!(table.live_id(&node((5, 5), Direction::East, 1), 4), None);
    }

    #[test]
    fn test_positions_merge_run_states() {
        let mut table = BestCostTable::new();
        table.relax(AugmentedNode::origin((0, 0)), 0, None);
        table.relax(node((3, 3), Direction::East, 2), 14, None);
        table.relax(node((3, 3), Direction::South, 1), 11, None);

        assert_eq!(table.len(), 3);
        assert_eq!(
            table.positions().into_iter().collect::<Vec<_>>(),
            vec![(0, 0), (3, 3)]
        );
    }

    #[test]
    fn test_heuristics_are_zero_at_destination() {
        let map: Map = "2413\n3215\n3255".parse().unwrap();
        let destination = map.bottom_right();

        for kind in [HeuristicKind::Zero, HeuristicKind::Manhattan, HeuristicKind::Relaxed] {
            let heuristic = Heuristic::new(kind, &map, destination);
            assert_eq!(heuristic.estimate(destination), 0);
        }

        let manhattan = Heuristic::new(HeuristicKind::Manhattan, &map, destination);
        assert_eq!(manhattan.estimate((0, 0)), 5);

        // Cheapest unconstrained route from the origin: 3, 2, 1, 5, 5.
        let relaxed = Heuristic::new(HeuristicKind::Relaxed, &map, destination);
        assert_eq!(relaxed.estimate((0, 0)), 3 + 2 + 1 + 5 + 5);
    }
}
