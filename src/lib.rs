//! Optimal multi-agent path finding on 4-connected grids.
//!
//! [`plan`] validates a problem and runs Conflict-Based Search: a best-first
//! search over a constraint tree whose nodes are solved agent by agent with a
//! time-expanded A*.

pub mod algorithm;
pub mod common;
pub mod config;
pub mod error;
pub mod grid;
pub mod scenario;
pub mod solver;
pub mod stat;
pub mod yaml;

pub use common::{validate_problem, Agent, Cell, Path, Solution};
pub use error::{PlanError, Result};
pub use grid::Grid;

use config::Config;
use solver::{Solver, CBS};

/// Plans collision-free, sum-of-costs optimal paths with default limits.
pub fn plan(agents: &[Agent], grid: &Grid) -> Result<Solution> {
    plan_with_config(agents, grid, &Config::default())
}

/// Like [`plan`], with the expansion limits and pruning taken from `config`.
pub fn plan_with_config(agents: &[Agent], grid: &Grid, config: &Config) -> Result<Solution> {
    validate_problem(agents, grid)?;

    let mut solver = CBS::new(agents.to_vec(), grid);
    solver.solve(config).ok_or(PlanError::NoSolution)
}
