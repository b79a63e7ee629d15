use anyhow::anyhow;
use clap::Parser;
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(
    name = "grid-cbs",
    about = "Optimal multi-agent path finding on grids with Conflict-Based Search.",
    version = "0.1"
)]
pub struct Cli {
    #[arg(long, help = "Path to a YAML config file")]
    pub config: Option<String>,

    #[arg(long, help = "Path to the YAML problem file")]
    pub input: Option<String>,

    #[arg(long, help = "Path to the output schedule (.yaml or .json)")]
    pub output: Option<String>,

    #[arg(long, help = "Maximum states expanded by one low-level search")]
    pub low_level_limit: Option<usize>,

    #[arg(long, help = "Maximum constraint tree nodes expanded")]
    pub high_level_limit: Option<usize>,

    #[arg(long, help = "Replace the problem's agents with this many random ones")]
    pub num_agents: Option<usize>,

    #[arg(long, help = "Seed for the random agent generator")]
    pub seed: Option<u64>,

    #[arg(
        long,
        help = "Keep constraint tree nodes whose constraint set was already generated",
        default_value_t = false
    )]
    pub no_duplicate_pruning: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input_path: String,
    pub output_path: String,
    pub low_level_expand_limit: usize,
    pub high_level_expand_limit: usize,
    pub num_agents: Option<usize>,
    pub seed: u64,
    pub prune_duplicate_nodes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input_path: "map_file/test/corridor.yaml".to_string(),
            output_path: "output.yaml".to_string(),
            low_level_expand_limit: 1_000_000,
            high_level_expand_limit: 100_000,
            num_agents: None,
            seed: 0,
            prune_duplicate_nodes: true,
        }
    }
}

impl Config {
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn override_from_command_line(mut self, cli: &Cli) -> anyhow::Result<Self> {
        if let Some(input) = &cli.input {
            self.input_path = input.clone();
        }
        if let Some(output) = &cli.output {
            self.output_path = output.clone();
        }
        if let Some(limit) = cli.low_level_limit {
            self.low_level_expand_limit = limit;
        }
        if let Some(limit) = cli.high_level_limit {
            self.high_level_expand_limit = limit;
        }
        if cli.num_agents.is_some() {
            self.num_agents = cli.num_agents;
        }
        if let Some(seed) = cli.seed {
            self.seed = seed;
        }
        if cli.no_duplicate_pruning {
            self.prune_duplicate_nodes = false;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.low_level_expand_limit == 0 {
            return Err(anyhow!("Low-level expansion limit must be positive"));
        }
        if self.high_level_expand_limit == 0 {
            return Err(anyhow!("High-level expansion limit must be positive"));
        }
        if self.num_agents == Some(0) {
            return Err(anyhow!("Number of random agents must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml_str("high_level_expand_limit: 50\nseed: 7\n").unwrap();
        assert_eq!(config.high_level_expand_limit, 50);
        assert_eq!(config.seed, 7);
        assert_eq!(config.low_level_expand_limit, 1_000_000);
        assert!(config.prune_duplicate_nodes);
    }

    #[test]
    fn test_command_line_overrides() {
        let cli = Cli::parse_from([
            "grid-cbs",
            "--input",
            "problem.yaml",
            "--low-level-limit",
            "10",
            "--num-agents",
            "3",
            "--no-duplicate-pruning",
        ]);
        let config = Config::default().override_from_command_line(&cli).unwrap();
        assert_eq!(config.input_path, "problem.yaml");
        assert_eq!(config.output_path, "output.yaml");
        assert_eq!(config.low_level_expand_limit, 10);
        assert_eq!(config.num_agents, Some(3));
        assert!(!config.prune_duplicate_nodes);
    }

    #[test]
    fn test_zero_limit_rejected() {
        let cli = Cli::parse_from(["grid-cbs", "--high-level-limit", "0"]);
        assert!(Config::default().override_from_command_line(&cli).is_err());
    }
}
