use super::{construct_path, heuristic, Trace};
use crate::common::{Agent, Constraint, LowLevelOpenNode, Path};
use crate::grid::Grid;
use crate::stat::Stats;

use std::collections::{BTreeSet, HashSet};
use std::iter;
use tracing::{debug, instrument, trace, warn};

/// Time-expanded A* for a single agent under `constraints`.
///
/// Returns the agent's minimum-cost path, or `None` when no path exists or
/// more than `expand_limit` states would have to be expanded. The returned
/// path never ends before the latest vertex constraint on the agent, so the
/// agent cannot be forced off its goal after it has finished.
#[instrument(skip_all, name = "a_star", fields(agent = agent.id, start = format!("{:?}", agent.start), goal = format!("{:?}", agent.goal)), level = "debug")]
pub fn a_star_search(
    grid: &Grid,
    agent_index: usize,
    agent: &Agent,
    constraints: &[Constraint],
    expand_limit: usize,
    stats: &mut Stats,
) -> Option<Path> {
    // No constraint applies past the horizon, so time stops being part of
    // the state there and the search space stays finite.
    let horizon = constraints
        .iter()
        .map(Constraint::time_step)
        .max()
        .unwrap_or(0);
    let goal_time_step = constraints
        .iter()
        .filter_map(|constraint| match constraint {
            Constraint::Vertex { time_step, .. } => Some(*time_step),
            Constraint::Edge { .. } => None,
        })
        .max()
        .unwrap_or(0);
    debug!("constraints: {constraints:?}, horizon: {horizon:?}, goal time step: {goal_time_step:?}");

    let mut open_list = BTreeSet::new();
    let mut closed_list = HashSet::new();
    let mut trace = Trace::new();
    let mut expanded = 0;

    open_list.insert(LowLevelOpenNode {
        position: agent.start,
        f_open_cost: heuristic(agent.start, agent.goal),
        g_cost: 0,
        time_step: 0,
    });

    while let Some(current) = open_list.pop_first() {
        if !closed_list.insert((current.position, current.time_step)) {
            continue;
        }
        trace!("expand node: {current:?}");

        expanded += 1;
        stats.low_level_expand_nodes += 1;
        if expanded > expand_limit {
            warn!("low level expansion limit {expand_limit} exceeded");
            return None;
        }

        if current.position == agent.goal && current.g_cost >= goal_time_step {
            return Some(Path::new(
                agent_index,
                construct_path(&trace, (current.position, current.g_cost)),
            ));
        }

        // Uniform cost, g cost is also the elapsed time.
        let tentative_g_cost = current.g_cost + 1;
        let tentative_time_step = if current.time_step > horizon {
            current.time_step
        } else {
            current.time_step + 1
        };

        let moves = grid
            .get_neighbors(current.position)
            .iter()
            .copied()
            .chain(iter::once(current.position));
        for neighbor in moves {
            if closed_list.contains(&(neighbor, tentative_time_step)) {
                continue;
            }

            if constraints.iter().any(|constraint| {
                constraint.is_violated(current.position, neighbor, tentative_g_cost)
            }) {
                continue;
            }

            // An identical node already in the open list keeps its trace.
            if open_list.insert(LowLevelOpenNode {
                position: neighbor,
                f_open_cost: tentative_g_cost + heuristic(neighbor, agent.goal),
                g_cost: tentative_g_cost,
                time_step: tentative_time_step,
            }) {
                trace
                    .entry((neighbor, tentative_g_cost))
                    .or_insert((current.position, current.g_cost));
            }
        }
    }

    debug!("cannot find solution");
    None
}
