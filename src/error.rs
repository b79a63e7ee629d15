//! Error types for planning requests.

use std::fmt;

use thiserror::Error;

use crate::common::Cell;

/// Which end of an agent's route a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    Goal,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Start => write!(f, "start"),
            Endpoint::Goal => write!(f, "goal"),
        }
    }
}

/// Errors surfaced by [`crate::plan`] and the problem builders.
///
/// Every variant except [`PlanError::NoSolution`] describes a malformed
/// problem and is raised before any search runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("agent {agent}: {endpoint} {cell:?} lies outside the {width}x{height} grid")]
    OutOfBounds {
        agent: usize,
        endpoint: Endpoint,
        cell: Cell,
        width: usize,
        height: usize,
    },
    #[error("agent {agent}: {endpoint} {cell:?} is an obstacle")]
    OnObstacle {
        agent: usize,
        endpoint: Endpoint,
        cell: Cell,
    },
    #[error("agents {first} and {second} share start cell {cell:?}")]
    DuplicateStart {
        first: usize,
        second: usize,
        cell: Cell,
    },
    #[error("agents {first} and {second} share goal cell {cell:?}")]
    DuplicateGoal {
        first: usize,
        second: usize,
        cell: Cell,
    },
    #[error("agent id {id} is not unique")]
    DuplicateAgentId { id: usize },
    #[error("obstacle {cell:?} lies outside the {width}x{height} grid")]
    ObstacleOutOfBounds {
        cell: Cell,
        width: usize,
        height: usize,
    },
    #[error("no collision-free solution found")]
    NoSolution,
}

impl PlanError {
    /// True for the validation failures that reject a problem up front.
    pub fn is_malformed_problem(&self) -> bool {
        !matches!(self, PlanError::NoSolution)
    }
}

/// A specialized Result type for planning operations.
pub type Result<T> = std::result::Result<T, PlanError>;
