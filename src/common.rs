mod highlevel;
mod lowlevel;
mod tree;

pub use highlevel::{Conflict, ConflictType, Constraint};
pub use tree::{ConstraintTree, CtNode, NodeId};

pub(crate) use highlevel::detect_first_conflict;
pub(crate) use lowlevel::LowLevelOpenNode;

use std::collections::{HashMap, HashSet};

use crate::error::{Endpoint, PlanError, Result};
use crate::grid::Grid;

/// Grid coordinate `(x, y)`.
pub type Cell = (usize, usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    pub id: usize,
    pub start: Cell,
    pub goal: Cell,
}

impl Agent {
    pub fn verify(&self, grid: &Grid) -> Result<()> {
        for (endpoint, cell) in [(Endpoint::Start, self.start), (Endpoint::Goal, self.goal)] {
            if !grid.in_bounds(cell) {
                return Err(PlanError::OutOfBounds {
                    agent: self.id,
                    endpoint,
                    cell,
                    width: grid.width(),
                    height: grid.height(),
                });
            }
            if grid.blocked(cell) {
                return Err(PlanError::OnObstacle {
                    agent: self.id,
                    endpoint,
                    cell,
                });
            }
        }
        Ok(())
    }
}

/// Rejects malformed problems: bad endpoints, shared start or goal cells and
/// repeated agent ids.
pub fn validate_problem(agents: &[Agent], grid: &Grid) -> Result<()> {
    let mut ids = HashSet::new();
    let mut starts: HashMap<Cell, usize> = HashMap::new();
    let mut goals: HashMap<Cell, usize> = HashMap::new();

    for agent in agents {
        if !ids.insert(agent.id) {
            return Err(PlanError::DuplicateAgentId { id: agent.id });
        }
        agent.verify(grid)?;

        if let Some(&first) = starts.get(&agent.start) {
            return Err(PlanError::DuplicateStart {
                first,
                second: agent.id,
                cell: agent.start,
            });
        }
        starts.insert(agent.start, agent.id);

        if let Some(&first) = goals.get(&agent.goal) {
            return Err(PlanError::DuplicateGoal {
                first,
                second: agent.id,
                cell: agent.goal,
            });
        }
        goals.insert(agent.goal, agent.id);
    }

    Ok(())
}

/// One agent's cells indexed by timestep; `steps[0]` is the start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    /// Index of the owning agent in the agent list.
    pub agent: usize,
    pub steps: Vec<Cell>,
}

impl Path {
    pub fn new(agent: usize, steps: Vec<Cell>) -> Self {
        Path { agent, steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn cost(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// Position at `time_step`; a finished agent stays on its last cell.
    pub fn position_at(&self, time_step: usize) -> Option<Cell> {
        self.steps
            .get(time_step)
            .or_else(|| self.steps.last())
            .copied()
    }
}

/// One path per agent, index-aligned with the agent list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub paths: Vec<Path>,
}

impl Solution {
    /// Sum of individual path costs.
    pub fn cost(&self) -> usize {
        self.paths.iter().map(Path::cost).sum()
    }

    /// Timestep at which the last agent arrives.
    pub fn makespan(&self) -> usize {
        self.paths.iter().map(Path::cost).max().unwrap_or(0)
    }

    pub fn verify(&self, grid: &Grid, agents: &[Agent]) -> bool {
        if self.paths.len() != agents.len() {
            return false;
        }

        for (path, agent) in self.paths.iter().zip(agents) {
            if path.steps.first() != Some(&agent.start) || path.steps.last() != Some(&agent.goal)
            {
                return false;
            }
            if path.steps.iter().any(|&cell| grid.blocked(cell)) {
                return false;
            }
            let valid_moves = path.steps.windows(2).all(|step| {
                step[0] == step[1] || grid.get_neighbors(step[0]).contains(&step[1])
            });
            if !valid_moves {
                return false;
            }
        }

        detect_first_conflict(&self.paths).is_none()
    }
}
