mod astar;

pub use astar::a_star_search;

use std::collections::HashMap;

use crate::common::Cell;

// (position, g cost) -> predecessor (position, g cost)
type Trace = HashMap<(Cell, usize), (Cell, usize)>;

fn heuristic(position: Cell, goal: Cell) -> usize {
    // Manhattan distance, admissible and consistent on a 4-connected grid.
    position.0.abs_diff(goal.0) + position.1.abs_diff(goal.1)
}

fn construct_path(trace: &Trace, mut current: (Cell, usize)) -> Vec<Cell> {
    let mut path = vec![current.0];
    while let Some(&(pos, time)) = trace.get(&current) {
        path.push(pos);
        current = (pos, time);
    }
    path.reverse();
    path
}
