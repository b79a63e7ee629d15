use anyhow::{anyhow, Context, Result};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use tracing::info;

use crate::common::{Agent, Cell};
use crate::error::PlanError;
use crate::grid::Grid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapYaml {
    pub dimensions: [usize; 2],
    #[serde(default)]
    pub obstacles: Vec<[usize; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentYaml {
    pub name: String,
    pub start: [usize; 2],
    pub goal: [usize; 2],
}

/// A problem file: the map plus named agents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub map: MapYaml,
    #[serde(default)]
    pub agents: Vec<AgentYaml>,
}

fn to_cell(coordinates: [usize; 2]) -> Cell {
    (coordinates[0], coordinates[1])
}

impl Scenario {
    pub fn load_from_file(path: &str) -> Result<Scenario> {
        let file = File::open(path).with_context(|| format!("failed to open {path}"))?;
        let reader = BufReader::new(file);
        serde_yaml::from_reader(reader).with_context(|| format!("failed to parse {path}"))
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Scenario> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn grid(&self) -> crate::Result<Grid> {
        let obstacles: Vec<Cell> = self.map.obstacles.iter().copied().map(to_cell).collect();
        Grid::new(self.map.dimensions[0], self.map.dimensions[1], &obstacles)
    }

    /// Agents in file order; ids are list positions. Names must be unique.
    pub fn agents(&self) -> crate::Result<Vec<Agent>> {
        let mut names = HashSet::new();
        self.agents
            .iter()
            .enumerate()
            .map(|(id, agent)| {
                if !names.insert(agent.name.as_str()) {
                    return Err(PlanError::DuplicateAgentId { id });
                }
                Ok(Agent {
                    id,
                    start: to_cell(agent.start),
                    goal: to_cell(agent.goal),
                })
            })
            .collect()
    }

    pub fn build(&self) -> crate::Result<(Grid, Vec<Agent>)> {
        Ok((self.grid()?, self.agents()?))
    }

    pub fn names(&self) -> Vec<String> {
        self.agents.iter().map(|agent| agent.name.clone()).collect()
    }

    /// Replaces the agent list with `num_agents` agents whose starts are
    /// distinct free cells and whose goals are distinct free cells.
    pub fn generate_agents_randomly<R: Rng + ?Sized>(
        &mut self,
        grid: &Grid,
        num_agents: usize,
        rng: &mut R,
    ) -> Result<Vec<Agent>> {
        let free_cells: Vec<Cell> = (0..grid.height())
            .flat_map(|y| (0..grid.width()).map(move |x| (x, y)))
            .filter(|&cell| !grid.blocked(cell))
            .collect();

        if free_cells.len() < num_agents {
            return Err(anyhow!(
                "Only {} free cells available for {} agents",
                free_cells.len(),
                num_agents
            ));
        }

        let starts: Vec<Cell> = free_cells.choose_multiple(rng, num_agents).copied().collect();
        let goals: Vec<Cell> = free_cells.choose_multiple(rng, num_agents).copied().collect();

        self.agents = starts
            .iter()
            .zip(&goals)
            .enumerate()
            .map(|(id, (start, goal))| AgentYaml {
                name: format!("agent{id}"),
                start: [start.0, start.1],
                goal: [goal.0, goal.1],
            })
            .collect();

        let agents = self.agents()?;
        info!("Generate scen: {agents:?}");
        Ok(agents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::validate_problem;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_read_scenario() {
        let scenario = Scenario::load_from_file("map_file/test/crossing.yaml")
            .expect("Error loading YAML scenario");
        let (grid, agents) = scenario.build().unwrap();

        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 3);
        assert!(grid.blocked((0, 0)));
        assert_eq!(scenario.names(), vec!["agent0", "agent1"]);
        assert_eq!(
            agents,
            vec![
                Agent {
                    id: 0,
                    start: (0, 1),
                    goal: (2, 1),
                },
                Agent {
                    id: 1,
                    start: (1, 0),
                    goal: (1, 2),
                },
            ]
        );
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let scenario = Scenario::from_yaml_str(
            "map:\n  dimensions: [3, 3]\nagents:\n  - {name: a, start: [0, 0], goal: [1, 1]}\n  - {name: a, start: [2, 2], goal: [0, 1]}\n",
        )
        .unwrap();
        assert_eq!(
            scenario.agents(),
            Err(PlanError::DuplicateAgentId { id: 1 })
        );
    }

    #[test]
    fn test_obstacle_outside_map_rejected() {
        let scenario = Scenario::from_yaml_str(
            "map:\n  dimensions: [2, 2]\n  obstacles: [[0, 5]]\n",
        )
        .unwrap();
        assert!(matches!(
            scenario.grid(),
            Err(PlanError::ObstacleOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_generate_agents_randomly() {
        let mut scenario = Scenario::from_yaml_str(
            "map:\n  dimensions: [4, 4]\n  obstacles: [[1, 1], [2, 2]]\n",
        )
        .unwrap();
        let grid = scenario.grid().unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        let agents = scenario
            .generate_agents_randomly(&grid, 5, &mut rng)
            .unwrap();
        assert_eq!(agents.len(), 5);
        assert_eq!(scenario.agents.len(), 5);
        assert!(validate_problem(&agents, &grid).is_ok());

        assert!(scenario
            .generate_agents_randomly(&grid, 15, &mut rng)
            .is_err());
    }
}
