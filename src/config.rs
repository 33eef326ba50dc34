use anyhow::{anyhow, bail};
use clap::Parser;
use serde::Deserialize;

use crate::common::{Coord, Query};
use crate::map::Map;
use crate::state::{HeuristicKind, RunLimits, StepModel};

fn parse_coord(value: &str) -> Result<Coord, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got {value:?}"))?;
    let x = x.trim().parse().map_err(|err| format!("bad x in {value:?}: {err}"))?;
    let y = y.trim().parse().map_err(|err| format!("bad y in {value:?}: {err}"))?;
    Ok((x, y))
}

fn parse_size(value: &str) -> Result<(usize, usize), String> {
    let (width, height) = value
        .split_once(',')
        .ok_or_else(|| format!("expected width,height but got {value:?}"))?;
    let width = width
        .trim()
        .parse()
        .map_err(|err| format!("bad width in {value:?}: {err}"))?;
    let height = height
        .trim()
        .parse()
        .map_err(|err| format!("bad height in {value:?}: {err}"))?;
    Ok((width, height))
}

#[derive(Parser, Debug)]
#[command(
    name = "Rust Crucible",
    about = "Run-length constrained shortest paths over weighted grids.",
    version = "1.0"
)]
pub struct Cli {
    #[arg(long, help = "Path to a YAML config file")]
    pub config: Option<String>,

    #[arg(long, help = "Path to the grid file")]
    pub map_path: Option<String>,

    #[arg(long, help = "Path to a YAML scenario with a list of queries")]
    pub scenario_path: Option<String>,

    #[arg(long, help = "Path to write the JSON report")]
    pub output_path: Option<String>,

    #[arg(long, value_parser = parse_coord, help = "Origin as x,y (default: top-left)")]
    pub origin: Option<Coord>,

    #[arg(long, value_parser = parse_coord, help = "Destination as x,y (default: bottom-right)")]
    pub destination: Option<Coord>,

    #[arg(long, help = "Minimum straight run before turning or stopping")]
    pub min_run: Option<usize>,

    #[arg(long, help = "Maximum straight run")]
    pub max_run: Option<usize>,

    #[arg(long, value_enum, help = "State-space granularity")]
    pub model: Option<StepModel>,

    #[arg(long, value_enum, help = "Remaining-cost estimate")]
    pub heuristic: Option<HeuristicKind>,

    #[arg(long, value_parser = parse_size, help = "Generate a random grid of width,height instead of reading one")]
    pub random: Option<(usize, usize)>,

    #[arg(long, help = "Seed for the random grid generator")]
    pub seed: Option<u64>,

    #[arg(long, help = "Print the path overlaid on the grid", default_value_t = false)]
    pub render: bool,
}

impl Cli {
    /// Flags that only shape the single query built from the config.
    fn query_flags(&self) -> Vec<&'static str> {
        [
            ("origin", self.origin.is_some()),
            ("destination", self.destination.is_some()),
            ("min-run", self.min_run.is_some()),
            ("max-run", self.max_run.is_some()),
            ("model", self.model.is_some()),
            ("heuristic", self.heuristic.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub map_path: Option<String>,
    pub scenario_path: Option<String>,
    pub output_path: Option<String>,
    pub origin: Option<Coord>,
    pub destination: Option<Coord>,
    pub min_run: usize,
    pub max_run: usize,
    pub model: StepModel,
    pub heuristic: HeuristicKind,
    pub random: Option<(usize, usize)>,
    pub seed: u64,
    pub render: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            map_path: None,
            scenario_path: None,
            output_path: None,
            origin: None,
            destination: None,
            min_run: 1,
            max_run: 3,
            model: StepModel::Unit,
            heuristic: HeuristicKind::Relaxed,
            random: None,
            seed: 0,
            render: false,
        }
    }
}

impl Config {
    pub fn from_yaml_str(input: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(input)?)
    }

    /// Command-line flags win over the config file.
    pub fn override_from_command_line(mut self, cli: &Cli) -> anyhow::Result<Self> {
        if let Some(map_path) = &cli.map_path {
            self.map_path = Some(map_path.clone());
        }
        if let Some(scenario_path) = &cli.scenario_path {
            self.scenario_path = Some(scenario_path.clone());
        }
        let query_flags = cli.query_flags();
        if self.scenario_path.is_some() && !query_flags.is_empty() {
            bail!(
                "--{} cannot be combined with a scenario, set it on the scenario queries",
                query_flags.join(", --")
            );
        }
        if let Some(output_path) = &cli.output_path {
            self.output_path = Some(output_path.clone());
        }
        self.origin = cli.origin.or(self.origin);
        self.destination = cli.destination.or(self.destination);
        self.min_run = cli.min_run.unwrap_or(self.min_run);
        self.max_run = cli.max_run.unwrap_or(self.max_run);
        self.model = cli.model.unwrap_or(self.model);
        self.heuristic = cli.heuristic.unwrap_or(self.heuristic);
        self.random = cli.random.or(self.random);
        self.seed = cli.seed.unwrap_or(self.seed);
        self.render |= cli.render;

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some((width, height)) = self.random {
            if self.map_path.is_some() {
                bail!("Use either a map file or a random grid, not both");
            }
            if width == 0 || height == 0 {
                bail!("Random grid must not be empty, got {width}x{height}");
            }
        }

        if self.scenario_path.is_some() && (self.origin.is_some() || self.destination.is_some()) {
            bail!("A scenario brings its own queries, drop origin and destination from the config");
        }

        // A scenario may name its own map.
        if self.map_path.is_none() && self.random.is_none() && self.scenario_path.is_none() {
            bail!("No grid given: set a map path, a scenario or a random grid size");
        }

        RunLimits::new(self.min_run, self.max_run).map_err(|err| anyhow!("{err}"))?;
        Ok(())
    }

    pub fn query(&self, map: &Map) -> anyhow::Result<Query> {
        Ok(Query {
            origin: self.origin.unwrap_or((0, 0)),
            destination: self.destination.unwrap_or_else(|| map.bottom_right()),
            limits: RunLimits::new(self.min_run, self.max_run)?,
            model: self.model,
            heuristic: self.heuristic,
        })
    }
}
