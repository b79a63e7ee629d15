use super::Solver;
use crate::algorithm::a_star_search;
use crate::common::{
    detect_first_conflict, Agent, Constraint, ConstraintTree, NodeId, Solution,
};
use crate::config::Config;
use crate::grid::Grid;
use crate::stat::Stats;

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashSet};
use std::time::Instant;
use tracing::{debug, warn};

/// Conflict-Based Search over a constraint tree.
///
/// The open list is ordered by solution cost; among equal costs the most
/// recently generated node is expanded first.
pub struct CBS {
    agents: Vec<Agent>,
    grid: Grid,
    stats: Stats,
    tree: ConstraintTree,
}

impl CBS {
    pub fn new(agents: Vec<Agent>, grid: &Grid) -> Self {
        CBS {
            agents,
            grid: grid.clone(),
            stats: Stats::default(),
            tree: ConstraintTree::new(),
        }
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// The constraint tree built by the last call to `solve`.
    pub fn tree(&self) -> &ConstraintTree {
        &self.tree
    }

    fn plan_root(&mut self, config: &Config) -> Option<Solution> {
        let mut paths = Vec::with_capacity(self.agents.len());
        for (index, agent) in self.agents.iter().enumerate() {
            let Some(path) = a_star_search(
                &self.grid,
                index,
                agent,
                &[],
                config.low_level_expand_limit,
                &mut self.stats,
            ) else {
                debug!("agent {:?} has no path", agent.id);
                return None;
            };
            paths.push(path);
        }
        Some(Solution { paths })
    }

    /// Copies the parent's solution and replans only `agent` against the
    /// node's accumulated constraints.
    fn replan(&mut self, node: NodeId, agent: usize, config: &Config) -> Option<Solution> {
        let parent = self.tree.node(node).parent()?;
        let mut solution = self.tree.node(parent).solution()?.clone();
        let constraints = self.tree.constraints_for(node, agent);

        let new_path = a_star_search(
            &self.grid,
            agent,
            &self.agents[agent],
            &constraints,
            config.low_level_expand_limit,
            &mut self.stats,
        )?;
        debug!("Update agent {agent:?} with path {new_path:?}");

        solution.paths[agent] = new_path;
        Some(solution)
    }
}

impl Solver for CBS {
    fn solve(&mut self, config: &Config) -> Option<Solution> {
        let total_solve_start_time = Instant::now();
        self.stats = Stats::default();
        self.tree = ConstraintTree::new();

        let mut open: BTreeSet<(usize, Reverse<NodeId>)> = BTreeSet::new();
        let mut closed: Vec<NodeId> = Vec::new();
        let mut generated: HashSet<BTreeSet<Constraint>> = HashSet::new();

        let root = ConstraintTree::ROOT;
        let root_solution = self.plan_root(config);
        self.tree.set_solution(root, root_solution);
        generated.insert(BTreeSet::new());
        self.stats.high_level_generate_nodes += 1;
        open.insert((self.tree.node(root).cost_key(), Reverse(root)));

        while let Some((_, Reverse(node))) = open.pop_first() {
            closed.push(node);

            let conflict = match self.tree.node(node).solution() {
                None => {
                    debug!("prune infeasible node {node:?}");
                    self.stats.high_level_pruned_nodes += 1;
                    continue;
                }
                Some(solution) => match detect_first_conflict(&solution.paths) {
                    Some(conflict) => conflict,
                    None => {
                        // No conflicts, return solution.
                        self.stats.time_us = total_solve_start_time.elapsed().as_micros() as usize;
                        self.stats.costs = solution.cost();
                        debug!("closed {:?} nodes", closed.len());
                        self.stats.print();
                        return Some(solution.clone());
                    }
                },
            };

            if self.stats.high_level_expand_nodes >= config.high_level_expand_limit {
                warn!(
                    "high level expansion limit {:?} exceeded",
                    config.high_level_expand_limit
                );
                break;
            }
            self.stats.high_level_expand_nodes += 1;
            debug!(
                "expand node {node:?} cost {:?} conflict {conflict:?}",
                self.tree.node(node).cost()
            );

            for constraint in conflict.constraints() {
                let agent = constraint.agent();
                let child = self.tree.spawn_child(node, constraint);
                self.stats.high_level_generate_nodes += 1;

                if config.prune_duplicate_nodes
                    && !generated.insert(self.tree.canonical_constraints(child))
                {
                    debug!("skip duplicate node {child:?}");
                    self.stats.high_level_pruned_nodes += 1;
                    continue;
                }

                let solution = self.replan(child, agent, config);
                self.tree.set_solution(child, solution);
                open.insert((self.tree.node(child).cost_key(), Reverse(child)));
            }
        }

        self.stats.time_us = total_solve_start_time.elapsed().as_micros() as usize;
        debug!("closed {:?} nodes", closed.len());
        self.stats.print();
        None
    }
}
