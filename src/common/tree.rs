//! Constraint tree arena.
//!
//! Nodes are addressed by [`NodeId`]; a node stores its parent's id for
//! ancestry walks and owns nothing but its own single constraint and cached
//! solution. The arena owns every node for the lifetime of one search.

use std::collections::BTreeSet;

use super::{Constraint, Solution};

pub type NodeId = usize;

#[derive(Debug, Clone)]
pub struct CtNode {
    parent: Option<NodeId>,
    constraint: Option<Constraint>, // None only for the root
    left: Option<NodeId>,
    right: Option<NodeId>,
    solution: Option<Solution>,
    cost: Option<usize>, // None means infeasible
    depth: usize,
}

impl CtNode {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn constraint(&self) -> Option<&Constraint> {
        self.constraint.as_ref()
    }

    pub fn children(&self) -> (Option<NodeId>, Option<NodeId>) {
        (self.left, self.right)
    }

    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    pub fn cost(&self) -> Option<usize> {
        self.cost
    }

    /// Open-list key: infeasible nodes sort after every feasible one.
    pub fn cost_key(&self) -> usize {
        self.cost.unwrap_or(usize::MAX)
    }

    pub fn is_feasible(&self) -> bool {
        self.solution.is_some()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

#[derive(Debug, Clone)]
pub struct ConstraintTree {
    nodes: Vec<CtNode>,
}

impl Default for ConstraintTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstraintTree {
    pub const ROOT: NodeId = 0;

    /// A tree holding only an unsolved, unconstrained root.
    pub fn new() -> Self {
        ConstraintTree {
            nodes: vec![CtNode {
                parent: None,
                constraint: None,
                left: None,
                right: None,
                solution: None,
                cost: None,
                depth: 0,
            }],
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &CtNode {
        &self.nodes[id]
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &CtNode)> {
        self.nodes.iter().enumerate()
    }

    /// Every constraint on the path from the root down to `id`, root first.
    pub fn accumulated_constraints(&self, id: NodeId) -> Vec<Constraint> {
        let mut constraints = Vec::with_capacity(self.nodes[id].depth);
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = &self.nodes[node_id];
            if let Some(constraint) = &node.constraint {
                constraints.push(constraint.clone());
            }
            current = node.parent;
        }
        constraints.reverse();
        constraints
    }

    /// The accumulated constraints binding `agent`.
    pub fn constraints_for(&self, id: NodeId, agent: usize) -> Vec<Constraint> {
        self.accumulated_constraints(id)
            .into_iter()
            .filter(|constraint| constraint.agent() == agent)
            .collect()
    }

    /// Canonical identity of a node: its accumulated constraints as a set.
    pub fn canonical_constraints(&self, id: NodeId) -> BTreeSet<Constraint> {
        self.accumulated_constraints(id).into_iter().collect()
    }

    /// Caches `solution` on `id` and derives its cost.
    pub fn set_solution(&mut self, id: NodeId, solution: Option<Solution>) {
        let node = &mut self.nodes[id];
        node.cost = solution.as_ref().map(Solution::cost);
        node.solution = solution;
    }

    /// Allocates an unsolved child of `parent` holding `constraint`. The
    /// first child becomes the left one, the second the right one.
    pub fn spawn_child(&mut self, parent: NodeId, constraint: Constraint) -> NodeId {
        let id = self.nodes.len();
        let depth = self.nodes[parent].depth + 1;
        self.nodes.push(CtNode {
            parent: Some(parent),
            constraint: Some(constraint),
            left: None,
            right: None,
            solution: None,
            cost: None,
            depth,
        });

        let parent_node = &mut self.nodes[parent];
        if parent_node.left.is_none() {
            parent_node.left = Some(id);
        } else {
            debug_assert!(parent_node.right.is_none(), "node {parent} already has two children");
            parent_node.right = Some(id);
        }
        id
    }
}
