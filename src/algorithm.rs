mod astar;

pub use astar::a_star_search;

use crate::common::{manhattan, Path};
use crate::error::SearchError;
use crate::state::{BestCostTable, NodeId};

/// Walks back-pointers from `last` to the origin and returns every cell on
/// the way, origin first. Links longer than one cell (jumps) are expanded
/// into the cells they pass over.
///
/// Fails with [`SearchError::BrokenChain`] on a missing or non-collinear link,
/// or when more than `step_limit` links are followed.
pub fn construct_path(
    table: &BestCostTable,
    last: NodeId,
    step_limit: usize,
) -> Result<Path, SearchError> {
    let mut record = table.get(last).ok_or(SearchError::BrokenChain {
        position: (0, 0),
        steps: 0,
    })?;
    let mut path = vec![record.node.position];
    let mut steps = 0;

    while !record.node.run.is_origin() {
        let position = record.node.position;
        let broken = SearchError::BrokenChain { position, steps };
        if steps >= step_limit {
            return Err(broken);
        }

        let predecessor = record
            .predecessor
            .and_then(|id| table.get(id))
            .ok_or_else(|| broken.clone())?;

        let back = record.node.run.direction.opposite();
        let stride = manhattan(position, predecessor.node.position);
        if stride == 0 || back.offset(position, stride) != Some(predecessor.node.position) {
            return Err(broken);
        }
        for offset in 1..stride {
            path.extend(back.offset(position, offset));
        }
        path.push(predecessor.node.position);

        record = predecessor;
        steps += 1;
    }

    path.reverse();
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Direction;
    use crate::state::{AugmentedNode, RunState};

    fn node(position: (usize, usize), direction: Direction, run_length: usize) -> AugmentedNode {
        AugmentedNode {
            position,
            run: RunState {
                direction,
                run_length,
            },
        }
    }

    #[test]
    fn test_construct_path_unit_steps() {
        let mut table = BestCostTable::new();
        let origin = table.relax(AugmentedNode::origin((0, 0)), 0, None).unwrap();
        let a = table
            .relax(node((1, 0), Direction::East, 1), 1, Some(origin))
            .unwrap();
        let b = table
            .relax(node((1, 1), Direction::South, 1), 2, Some(a))
            .unwrap();

        let path = construct_path(&table, b, 100).unwrap();
        assert_eq!(path, vec![(0, 0), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_construct_path_expands_jumps() {
        let mut table = BestCostTable::new();
        let origin = table.relax(AugmentedNode::origin((0, 0)), 0, None).unwrap();
        let a = table
            .relax(node((0, 4), Direction::South, 4), 4, Some(origin))
            .unwrap();
        let b = table
            .relax(node((4, 4), Direction::East, 4), 8, Some(a))
            .unwrap();
        let c = table
            .relax(node((5, 4), Direction::East, 5), 9, Some(b))
            .unwrap();

        let path = construct_path(&table, c, 100).unwrap();
        assert_eq!(
            path,
            vec![
                (0, 0),
                (0, 1),
                (0, 2),
                (0, 3),
                (0, 4),
                (1, 4),
                (2, 4),
                (3, 4),
                (4, 4),
                (5, 4)
            ]
        );
    }

    #[test]
    fn test_construct_path_origin_only() {
        let mut table = BestCostTable::new();
        let origin = table.relax(AugmentedNode::origin((3, 2)), 0, None).unwrap();
        assert_eq!(construct_path(&table, origin, 1).unwrap(), vec![(3, 2)]);
    }

    #[test]
    fn test_construct_path_missing_link() {
        let mut table = BestCostTable::new();
        let orphan = table
            .relax(node((2, 0), Direction::East, 2), 5, None)
            .unwrap();

        assert_eq!(
            construct_path(&table, orphan, 100),
            Err(SearchError::BrokenChain {
                position: (2, 0),
                steps: 0
            })
        );
    }

    #[test]
    fn test_construct_path_cycle() {
        // Two collinear nodes pointing at each other never reach the origin.
        let mut table = BestCostTable::new();
        let a_node = node((1, 0), Direction::East, 1);
        let b_node = node((2, 0), Direction::East, 2);
        let a = table.relax(a_node, 5, None).unwrap();
        let b = table.relax(b_node, 6, Some(a)).unwrap();
        table.relax(a_node, 4, Some(b));

        let result = construct_path(&table, b, 10);
        assert!(matches!(result, Err(SearchError::BrokenChain { .. })));
    }

    #[test]
    fn test_construct_path_step_limit() {
        let mut table = BestCostTable::new();
        let origin = table.relax(AugmentedNode::origin((0, 0)), 0, None).unwrap();
        let mut last = origin;
        for x in 1..=5 {
            last = table
                .relax(node((x, 0), Direction::East, x), x, Some(last))
                .unwrap();
        }

        assert_eq!(construct_path(&table, last, 5).unwrap().len(), 6);
        assert_eq!(
            construct_path(&table, last, 4),
            Err(SearchError::BrokenChain {
                position: (1, 0),
                steps: 4
            })
        );
    }
}
