use grid_cbs::config::{Cli, Config};
use grid_cbs::scenario::Scenario;
use grid_cbs::yaml::Schedule;
use grid_cbs::{plan_with_config, PlanError};

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = Cli::parse();

    let config = if let Some(config_file) = cli.config.as_ref() {
        let config_str = std::fs::read_to_string(config_file)
            .with_context(|| format!("failed to read config file: {config_file}"))?;
        Config::from_yaml_str(&config_str)
            .with_context(|| format!("error with config file: {config_file}"))?
    } else {
        info!("No config file specified, using default config");
        Config::default()
    }
    .override_from_command_line(&cli)?;

    let mut scenario = Scenario::load_from_file(&config.input_path)?;
    let grid = scenario.grid()?;
    let agents = if let Some(num_agents) = config.num_agents {
        let mut rng = StdRng::seed_from_u64(config.seed);
        scenario.generate_agents_randomly(&grid, num_agents, &mut rng)?
    } else {
        scenario.agents()?
    };
    info!(
        "Planning {} agents on a {}x{} grid",
        agents.len(),
        grid.width(),
        grid.height()
    );

    match plan_with_config(&agents, &grid, &config) {
        Ok(solution) => {
            if !solution.verify(&grid, &agents) {
                error!("solution failed verification");
            }
            Schedule::from_solution(&scenario.names(), &solution)
                .write_to_file(&config.output_path)?;
            info!(
                "cost {} makespan {}, schedule written to {}",
                solution.cost(),
                solution.makespan(),
                config.output_path
            );
        }
        Err(PlanError::NoSolution) => error!("cbs solve fails"),
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
