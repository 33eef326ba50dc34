use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use tracing::info;

use crate::common::{Coord, Query};
use crate::map::Map;
use crate::state::{HeuristicKind, RunLimits, StepModel};

fn default_min_run() -> usize {
    1
}

fn default_max_run() -> usize {
    3
}

/// One query as written in a scenario file. Missing endpoints default to the
/// top-left and bottom-right corners of the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryYaml {
    pub name: Option<String>,
    pub origin: Option<Coord>,
    pub destination: Option<Coord>,
    #[serde(default = "default_min_run")]
    pub min_run: usize,
    #[serde(default = "default_max_run")]
    pub max_run: usize,
    #[serde(default)]
    pub model: StepModel,
    #[serde(default)]
    pub heuristic: HeuristicKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Scenario {
    /// Grid file, used when no map is given on the command line.
    pub map: Option<String>,
    pub queries: Vec<QueryYaml>,
}

impl Scenario {
    pub fn load_from_file(path: &str) -> Result<Scenario> {
        let file = File::open(path).with_context(|| format!("cannot open scenario {path}"))?;
        let reader = BufReader::new(file);
        let scenario = serde_yaml::from_reader(reader)
            .with_context(|| format!("malformed scenario {path}"))?;
        Ok(scenario)
    }

    pub fn from_yaml_str(input: &str) -> Result<Scenario> {
        Ok(serde_yaml::from_str(input)?)
    }

    /// Resolves every query against `map`, naming unnamed ones by position.
    pub fn build_queries(&self, map: &Map) -> Result<Vec<(String, Query)>> {
        let queries = self
            .queries
            .iter()
            .enumerate()
            .map(|(index, entry)| -> Result<(String, Query)> {
                let name = entry
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("query-{index}"));
                let limits = RunLimits::new(entry.min_run, entry.max_run)
                    .with_context(|| format!("query {name}"))?;
                let query = Query {
                    origin: entry.origin.unwrap_or((0, 0)),
                    destination: entry.destination.unwrap_or_else(|| map.bottom_right()),
                    limits,
                    model: entry.model,
                    heuristic: entry.heuristic,
                };
                Ok((name, query))
            })
            .collect::<Result<Vec<_>>>()?;

        info!("Loaded {} queries", queries.len());
        Ok(queries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_scenario() {
        let scenario = Scenario::load_from_file("map_file/scenario.yaml").unwrap();
        assert_eq!(scenario.map.as_deref(), Some("map_file/sample.txt"));

        let map = Map::from_file(scenario.map.as_deref().unwrap()).unwrap();
        let queries = scenario.build_queries(&map).unwrap();
        let names: Vec<&str> = queries.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["crucible", "ultra-crucible", "ultra-crucible-jump"]);

        let (_, ultra) = &queries[1];
        assert_eq!(ultra.origin, (0, 0));
        assert_eq!(ultra.destination, (12, 12));
        assert_eq!(ultra.limits, RunLimits::new(4, 10).unwrap());
        assert_eq!(ultra.model, StepModel::Unit);
        assert_eq!(queries[2].1.model, StepModel::Jump);
    }

    #[test]
    fn test_scenario_defaults() {
        let scenario = Scenario::from_yaml_str(
            "queries:\n  - origin: [2, 1]\n  - destination: [0, 0]\n    heuristic: zero\n",
        )
        .unwrap();
        let map: Map = "123\n456".parse().unwrap();
        let queries = scenario.build_queries(&map).unwrap();

        assert_eq!(queries[0].0, "query-0");
        assert_eq!(queries[0].1.origin, (2, 1));
        assert_eq!(queries[0].1.destination, (2, 1));
        assert_eq!(queries[0].1.limits, RunLimits::new(1, 3).unwrap());
        assert_eq!(queries[0].1.heuristic, HeuristicKind::Relaxed);
        assert_eq!(queries[1].1.destination, (0, 0));
        assert_eq!(queries[1].1.heuristic, HeuristicKind::Zero);
    }

    #[test]
    fn test_scenario_rejects_bad_limits() {
        let scenario =
            Scenario::from_yaml_str("queries:\n  - name: broken\n    min_run: 5\n    max_run: 2\n")
                .unwrap();
        let map: Map = "11\n11".parse().unwrap();
        let err = scenario.build_queries(&map).unwrap_err();
        assert!(err.to_string().contains("broken"));
    }
}
