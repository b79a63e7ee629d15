mod cbs;

pub use cbs::CBS;

use crate::common::Solution;
use crate::config::Config;

pub trait Solver {
    /// Runs the search; `None` when no collision-free solution was found
    /// within the configured expansion limits.
    fn solve(&mut self, config: &Config) -> Option<Solution>;
}
