use crucible_rust::config::{Cli, Config};
use crucible_rust::map::Map;
use crucible_rust::render::render_search;
use crucible_rust::scenario::Scenario;
use crucible_rust::solver::Solver;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    let cli = Cli::parse();

    let config = if let Some(config_file) = cli.config.as_ref() {
        let config_str = std::fs::read_to_string(config_file)
            .with_context(|| format!("cannot read config file: {config_file}"))?;
        Config::from_yaml_str(&config_str)
            .with_context(|| format!("error with config file: {config_file}"))?
    } else {
        info!("No config file specified, using default config");
        Config::default()
    }
    .override_from_command_line(&cli)?;

    let scenario = config
        .scenario_path
        .as_deref()
        .map(Scenario::load_from_file)
        .transpose()?;

    let map = if let Some((width, height)) = config.random {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let map = Map::random(width, height, 1..=9, &mut rng)?;
        info!("Generated {width}x{height} grid with seed {}", config.seed);
        map
    } else {
        let map_path = config
            .map_path
            .as_deref()
            .or_else(|| scenario.as_ref().and_then(|s| s.map.as_deref()))
            .context("scenario does not name a map file")?;
        Map::from_file(map_path)?
    };
    info!("Grid {}x{}", map.width, map.height);

    let queries = match &scenario {
        Some(scenario) => scenario.build_queries(&map)?,
        None => vec![("default".to_string(), config.query(&map)?)],
    };

    let mut solver = Solver::new(&map);
    let report = solver.solve_all(&queries);

    for entry in &report.queries {
        match (entry.cost, &entry.error) {
            (Some(cost), _) => println!("{}: {cost}", entry.name),
            (None, Some(err)) => println!("{}: {err}", entry.name),
            (None, None) => println!("{}: no result", entry.name),
        }
        if config.render && entry.cost.is_some() {
            println!("{}\n", render_search(&map, &entry.path, &entry.explored));
        }
    }

    if let Some(output_path) = config.output_path.as_deref() {
        report.write_to_file(output_path)?;
        info!("Report written to {output_path}");
    }

    Ok(())
}
