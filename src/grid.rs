use crate::common::Cell;
use crate::error::{PlanError, Result};

#[derive(Debug, Clone)]
struct Tile {
    passable: bool,
    neighbors: Vec<Cell>, // Orthogonal in-bounds passable neighbors, wait excluded
}

/// Static occupancy grid. Cells are `(x, y)` with `x < width`, `y < height`.
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl Grid {
    pub fn new(width: usize, height: usize, obstacles: &[Cell]) -> Result<Self> {
        let mut tiles = vec![
            Tile {
                passable: true,
                neighbors: Vec::new(),
            };
            width * height
        ];

        for &cell in obstacles {
            if cell.0 >= width || cell.1 >= height {
                return Err(PlanError::ObstacleOutOfBounds {
                    cell,
                    width,
                    height,
                });
            }
            tiles[cell.1 * width + cell.0].passable = false;
        }

        let mut grid = Grid {
            width,
            height,
            tiles,
        };
        grid.initialize_neighbors();
        Ok(grid)
    }

    fn initialize_neighbors(&mut self) {
        for y in 0..self.height {
            for x in 0..self.width {
                let index = y * self.width + x;
                if self.tiles[index].passable {
                    self.tiles[index].neighbors = self.compute_neighbors((x, y));
                }
            }
        }
    }

    fn compute_neighbors(&self, (x, y): Cell) -> Vec<Cell> {
        let directions = [(-1, 0), (1, 0), (0, -1), (0, 1)]; // Left, right, up, down
        let mut neighbors = Vec::new();

        for &(dx, dy) in &directions {
            let new_x = x as i64 + dx;
            let new_y = y as i64 + dy;
            if new_x < 0 || new_y < 0 {
                continue;
            }
            let neighbor = (new_x as usize, new_y as usize);
            if self.in_bounds(neighbor) && !self.blocked(neighbor) {
                neighbors.push(neighbor);
            }
        }

        neighbors
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.0 < self.width && cell.1 < self.height
    }

    /// Out-of-bounds cells count as blocked.
    pub fn blocked(&self, cell: Cell) -> bool {
        !self.in_bounds(cell) || !self.tiles[cell.1 * self.width + cell.0].passable
    }

    /// Orthogonal moves available from `cell`. Empty for blocked or
    /// out-of-bounds cells.
    pub fn get_neighbors(&self, cell: Cell) -> &[Cell] {
        if !self.in_bounds(cell) {
            return &[];
        }
        &self.tiles[cell.1 * self.width + cell.0].neighbors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_and_obstacles() {
        let grid = Grid::new(4, 3, &[(1, 1), (3, 2)]).unwrap();

        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 3);

        assert!(grid.in_bounds((3, 2)));
        assert!(!grid.in_bounds((4, 0)));
        assert!(!grid.in_bounds((0, 3)));

        assert!(grid.blocked((1, 1)));
        assert!(grid.blocked((3, 2)));
        assert!(grid.blocked((7, 7)));
        assert!(!grid.blocked((0, 0)));
    }

    #[test]
    fn test_neighbors_skip_obstacles_and_edges() {
        let grid = Grid::new(3, 3, &[(1, 0)]).unwrap();

        let neighbors = grid.get_neighbors((0, 0));
        assert_eq!(neighbors, &[(0, 1)]);

        let neighbors = grid.get_neighbors((1, 1));
        assert_eq!(neighbors.len(), 3);
        assert!(!neighbors.contains(&(1, 0)));

        assert!(grid.get_neighbors((1, 0)).is_empty());
        assert!(grid.get_neighbors((5, 5)).is_empty());
    }

    #[test]
    fn test_obstacle_outside_grid_rejected() {
        let err = Grid::new(2, 2, &[(2, 0)]).unwrap_err();
        assert_eq!(
            err,
            PlanError::ObstacleOutOfBounds {
                cell: (2, 0),
                width: 2,
                height: 2,
            }
        );
    }
}
