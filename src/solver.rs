use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, Write};

use anyhow::Context;
use serde::Serialize;
use tracing::{error, info};

use crate::algorithm::a_star_search;
use crate::common::{Coord, Path, Query, Solution};
use crate::error::SearchError;
use crate::map::Map;
use crate::stat::Stats;

/// Runs queries against one shared, read-only grid. Every query gets a fresh
/// cost table and frontier.
pub struct Solver<'a> {
    map: &'a Map,
    stats: Stats,
}

impl<'a> Solver<'a> {
    pub fn new(map: &'a Map) -> Self {
        Solver {
            map,
            stats: Stats::default(),
        }
    }

    pub fn solve(&mut self, query: &Query) -> Result<Solution, SearchError> {
        self.stats = Stats::default();
        let result = a_star_search(self.map, query, &mut self.stats);
        self.stats.print();
        result
    }

    /// Statistics of the last call to [`Solver::solve`].
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn solve_all(&mut self, queries: &[(String, Query)]) -> Report {
        let entries = queries
            .iter()
            .map(|(name, query)| {
                let result = self.solve(query);
                match &result {
                    Ok(solution) => info!("{name}: minimum cost {}", solution.cost),
                    Err(err) => error!("{name}: {err}"),
                }
                QueryReport::new(name, query, result, self.stats.clone())
            })
            .collect();

        Report { queries: entries }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryReport {
    pub name: String,
    pub origin: Coord,
    pub destination: Coord,
    pub min_run: usize,
    pub max_run: usize,
    pub cost: Option<usize>,
    pub path: Path,
    pub error: Option<String>,
    pub stats: Stats,
    #[serde(skip)]
    pub explored: BTreeSet<Coord>,
}

impl QueryReport {
    fn new(
        name: &str,
        query: &Query,
        result: Result<Solution, SearchError>,
        stats: Stats,
    ) -> Self {
        let (cost, path, explored, error) = match result {
            Ok(solution) => (Some(solution.cost), solution.path, solution.explored, None),
            Err(err) => (None, Vec::new(), BTreeSet::new(), Some(err.to_string())),
        };
        QueryReport {
            name: name.to_string(),
            origin: query.origin,
            destination: query.destination,
            min_run: query.limits.min_run(),
            max_run: query.limits.max_run(),
            cost,
            path,
            error,
            stats,
            explored,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub queries: Vec<QueryReport>,
}

impl Report {
    pub fn write_to_file(&self, path: &str) -> anyhow::Result<()> {
        let file = File::create(path).with_context(|| format!("cannot create report {path}"))?;
        let mut writer = io::BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        Ok(())
    }
}
