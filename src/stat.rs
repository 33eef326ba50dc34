use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub cost: usize,
    pub time_us: usize,
    pub expanded_nodes: usize,
    pub pushed_entries: usize,
    pub stale_entries: usize,
    pub pruned_entries: usize,
    pub frontier_high_water: usize,
    pub recorded_states: usize,
}

impl Stats {
    pub fn print(&self) {
        info!(
            "Cost {:?} Time(microseconds) {:?} Expanded nodes {:?} Pushed entries {:?} Stale entries {:?} Pruned entries {:?} Frontier peak {:?} Recorded states {:?}",
            self.cost,
            self.time_us,
            self.expanded_nodes,
            self.pushed_entries,
            self.stale_entries,
            self.pruned_entries,
            self.frontier_high_water,
            self.recorded_states
        );
    }
}
