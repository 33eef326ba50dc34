use super::construct_path;
use crate::common::{Query, Solution};
use crate::error::SearchError;
use crate::frontier::{Frontier, FrontierEntry};
use crate::map::Map;
use crate::stat::Stats;
use crate::state::{legal_transitions, AugmentedNode, BestCostTable, Heuristic};

use std::time::Instant;
use tracing::{debug, instrument, trace};

/// Cheapest path from `query.origin` to `query.destination` under the run
/// limits of the query.
///
/// Each call builds its own cost table and frontier; the map is only read.
#[instrument(skip_all, name = "constrained_a_star", fields(origin = ?query.origin, destination = ?query.destination, model = ?query.model), level = "debug")]
pub fn a_star_search(
    map: &Map,
    query: &Query,
    stats: &mut Stats,
) -> Result<Solution, SearchError> {
    let start_time = Instant::now();

    map.cost(query.origin)?;
    map.cost(query.destination)?;

    let limits = &query.limits;
    let heuristic = Heuristic::new(query.heuristic, map, query.destination);
    let state_bound = map.area() * limits.run_states_per_cell();

    let mut table = BestCostTable::new();
    let mut open_list = Frontier::new();

    let start = AugmentedNode::origin(query.origin);
    table.relax(start, 0, None);
    open_list.push(FrontierEntry::new(start, 0, heuristic.estimate(query.origin)));

    let result = loop {
        let current = match open_list.pop_min() {
            Ok(entry) => entry,
            Err(err) => {
                debug!("cannot find solution");
                break Err(err);
            }
        };

        // Every move into a state pays the same cell costs, so its first
        // relaxation is already its best and entries rarely go stale. The skip
        // and the pruning below stay as guards.
        let Some(current_id) = table.live_id(&current.node, current.cost) else {
            stats.stale_entries += 1;
            continue;
        };

        trace!("expand node: {current:?}");
        stats.expanded_nodes += 1;

        if current.node.position == query.destination && current.node.run.can_stop(limits) {
            debug!(
                "reached destination with cost {} in state {:?}",
                current.cost, current.node.run
            );
            break construct_path(&table, current_id, state_bound).map(|path| Solution {
                cost: current.cost,
                path,
                final_state: current.node.run,
                explored: table.positions(),
            });
        }

        for transition in legal_transitions(&current.node, limits, query.model) {
            let Some(next_position) =
                map.step(current.node.position, transition.direction, transition.stride)
            else {
                continue;
            };

            let tentative_cost = current.cost
                + map.path_cost(current.node.position, transition.direction, transition.stride)?;
            let next = AugmentedNode {
                position: next_position,
                run: transition.run,
            };

            if table.relax(next, tentative_cost, Some(current_id)).is_some() {
                let priority = tentative_cost.saturating_add(heuristic.estimate(next_position));
                open_list.push(FrontierEntry::new(next, tentative_cost, priority));
                stats.pushed_entries += 1;
            }
        }

        // Keep the frontier within the finite state space by dropping stale
        // entries once it outgrows it.
        if open_list.len() > state_bound {
            let before = open_list.len();
            open_list.retain(|entry| table.live_id(&entry.node, entry.cost).is_some());
            stats.pruned_entries += before - open_list.len();
            debug!("pruned frontier from {before} to {} entries", open_list.len());
        }
    };

    stats.frontier_high_water = stats.frontier_high_water.max(open_list.high_water());
    stats.recorded_states += table.len();
    stats.time_us += start_time.elapsed().as_micros() as usize;
    if let Ok(solution) = &result {
        stats.cost = solution.cost;
    }

    result
}
