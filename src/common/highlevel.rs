use super::{Cell, Path};

use tracing::debug;

/// A spacetime restriction on a single agent. `agent` is the agent's index
/// in the agent list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Constraint {
    /// Agent may not occupy `position` at `time_step`.
    Vertex {
        agent: usize,
        position: Cell,
        time_step: usize,
    },
    /// Agent may not move `from_position -> to_position` arriving at `time_step`.
    Edge {
        agent: usize,
        from_position: Cell,
        to_position: Cell,
        time_step: usize,
    },
}

impl Constraint {
    pub fn agent(&self) -> usize {
        match self {
            Constraint::Vertex { agent, .. } | Constraint::Edge { agent, .. } => *agent,
        }
    }

    pub fn time_step(&self) -> usize {
        match self {
            Constraint::Vertex { time_step, .. } | Constraint::Edge { time_step, .. } => *time_step,
        }
    }

    /// Whether moving `from -> to` and arriving at `time` breaks this
    /// constraint. A wait is the move `from == to`.
    pub fn is_violated(&self, from: Cell, to: Cell, time: usize) -> bool {
        match self {
            Constraint::Vertex {
                position,
                time_step,
                ..
            } => *position == to && *time_step == time,
            Constraint::Edge {
                from_position,
                to_position,
                time_step,
                ..
            } => *from_position == from && *to_position == to && *time_step == time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConflictType {
    Vertex {
        position: Cell,
        time_step: usize,
    },
    /// `agent_1` moves `from_position -> to_position` arriving at
    /// `time_step` while `agent_2` makes the reverse move.
    Edge {
        from_position: Cell,
        to_position: Cell,
        time_step: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Conflict {
    pub agent_1: usize,
    pub agent_2: usize,
    pub conflict_type: ConflictType,
}

impl Conflict {
    /// The two constraints that split this conflict: the first binds
    /// `agent_1`, the second binds `agent_2`.
    pub fn constraints(&self) -> [Constraint; 2] {
        match self.conflict_type {
            ConflictType::Vertex {
                position,
                time_step,
            } => [
                Constraint::Vertex {
                    agent: self.agent_1,
                    position,
                    time_step,
                },
                Constraint::Vertex {
                    agent: self.agent_2,
                    position,
                    time_step,
                },
            ],
            // Begin and end are swapped for the second agent.
            ConflictType::Edge {
                from_position,
                to_position,
                time_step,
            } => [
                Constraint::Edge {
                    agent: self.agent_1,
                    from_position,
                    to_position,
                    time_step,
                },
                Constraint::Edge {
                    agent: self.agent_2,
                    from_position: to_position,
                    to_position: from_position,
                    time_step,
                },
            ],
        }
    }
}

/// Finds the first conflict in `paths`.
///
/// All vertex conflicts take precedence over edge conflicts. Each pass scans
/// agent pairs `(i, j)` with `i < j` in order and, within a pair, timesteps
/// in ascending order. Finished agents are held at their last cell.
pub(crate) fn detect_first_conflict(paths: &[Path]) -> Option<Conflict> {
    let conflict = first_vertex_conflict(paths).or_else(|| first_edge_conflict(paths));
    debug!("Detect conflict: {conflict:?}");
    conflict
}

fn first_vertex_conflict(paths: &[Path]) -> Option<Conflict> {
    for i in 0..paths.len() {
        for j in (i + 1)..paths.len() {
            let path1 = &paths[i];
            let path2 = &paths[j];
            let max_length = path1.len().max(path2.len());

            for step in 0..max_length {
                let (Some(pos1), Some(pos2)) = (path1.position_at(step), path2.position_at(step))
                else {
                    break;
                };
                if pos1 == pos2 {
                    return Some(Conflict {
                        agent_1: i,
                        agent_2: j,
                        conflict_type: ConflictType::Vertex {
                            position: pos1,
                            time_step: step,
                        },
                    });
                }
            }
        }
    }
    None
}

fn first_edge_conflict(paths: &[Path]) -> Option<Conflict> {
    for i in 0..paths.len() {
        for j in (i + 1)..paths.len() {
            let path1 = &paths[i].steps;
            let path2 = &paths[j].steps;
            let min_length = path1.len().min(path2.len());

            // Only the portion where both agents are still moving can swap.
            for step in 1..min_length {
                let (prev_pos1, pos1) = (path1[step - 1], path1[step]);
                let (prev_pos2, pos2) = (path2[step - 1], path2[step]);

                if prev_pos1 != pos1 && prev_pos1 == pos2 && prev_pos2 == pos1 {
                    return Some(Conflict {
                        agent_1: i,
                        agent_2: j,
                        conflict_type: ConflictType::Edge {
                            from_position: prev_pos1,
                            to_position: pos1,
                            time_step: step,
                        },
                    });
                }
            }
        }
    }
    None
}
