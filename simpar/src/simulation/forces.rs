//! Grid force evaluation for the time step
//!
//! A particle feels the 3×3 block of cells around its home cell, wrapped on
//! the torus. Each non-empty cell contributes a pull computed from the cell's
//! center-of-mass coordinate along one axis and its mass.

use crate::simulation::grid::SpatialGrid;
use crate::simulation::params::{EPSILON, G};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// The 3×3 cell neighborhood of a home cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborWindow {
    pub rows: [usize; 3], // (m1 - 1, m1, m1 + 1) wrapped
    pub cols: [usize; 3], // (n1 - 1, n1, n1 + 1) wrapped
    pub wrap_x: bool, // a row index crossed the boundary
    pub wrap_y: bool, // a column index crossed the boundary
}

impl NeighborWindow {
    pub fn around(ix: usize, jy: usize, grid_side: usize) -> Self {
        let (rows, wrap_x) = axis_window(ix, grid_side);
        let (cols, wrap_y) = axis_window(jy, grid_side);
        Self { rows, cols, wrap_x, wrap_y }
    }

    fn wraps(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.wrap_x,
            Axis::Y => self.wrap_y,
        }
    }
}

fn axis_window(home: usize, grid_side: usize) -> ([usize; 3], bool) {
    let lo = home as isize - 1;
    let hi = home + 1;
    let wrapped = lo < 0 || hi >= grid_side;
    let lo = lo.rem_euclid(grid_side as isize) as usize;
    let hi = hi % grid_side;
    ([lo, home, hi], wrapped)
}

/// Pull exerted by one cell along one axis
pub trait CellPull {
    /// `r` is the (sign-corrected) center coordinate, `mass` the cell mass
    fn pull(&self, r: f64, mass: f64) -> f64;
}

/// Grid gravity: `±G·mass / (9·r²)` outside the `epsilon` dead zone
#[allow(non_snake_case)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGravity {
    pub G: f64, // gravitational constant
    pub epsilon: f64, // dead zone around r = 0
}

impl Default for GridGravity {
    fn default() -> Self {
        Self { G, epsilon: EPSILON }
    }
}

impl CellPull for GridGravity {
    fn pull(&self, r: f64, mass: f64) -> f64 {
        if r < -self.epsilon {
            -self.G * mass / (r * r * 9.0)
        } else if r > self.epsilon {
            self.G * mass / (r * r * 9.0)
        } else {
            0.0
        }
    }
}

/// Sum the pull of every non-empty cell in `window` along `axis`.
/// When the window wrapped on that axis, the center coordinate is negated.
pub fn axis_acceleration<F: CellPull>(force: &F, grid: &SpatialGrid, window: &NeighborWindow, axis: Axis) -> f64 {
    let flip = window.wraps(axis);
    let mut term = 0.0;

    for &row in &window.rows {
        for &col in &window.cols {
            let cell = grid.cell(row as isize, col as isize);
            if cell.is_empty() {
                continue;
            }
            let mut r = match axis {
                Axis::X => cell.cmx,
                Axis::Y => cell.cmy,
            };
            if flip {
                r = -r;
            }
            term += force.pull(r, cell.mass);
        }
    }
    term
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_cell_window_wraps_both_axes() {
        let w = NeighborWindow::around(0, 0, 4);
        assert_eq!(w.rows, [3, 0, 1]);
        assert_eq!(w.cols, [3, 0, 1]);
        assert!(w.wrap_x && w.wrap_y);
    }

    #[test]
    fn interior_cell_window_does_not_wrap() {
        let w = NeighborWindow::around(2, 1, 4);
        assert_eq!(w.rows, [1, 2, 3]);
        assert_eq!(w.cols, [0, 1, 2]);
        assert!(!w.wrap_x && !w.wrap_y);
    }

    #[test]
    fn top_edge_wraps_upward() {
        let w = NeighborWindow::around(3, 2, 4);
        assert_eq!(w.rows, [2, 3, 0]);
        assert!(w.wrap_x && !w.wrap_y);
    }

    #[test]
    fn single_cell_grid_folds_onto_itself() {
        let w = NeighborWindow::around(0, 0, 1);
        assert_eq!(w.rows, [0, 0, 0]);
        assert!(w.wrap_x && w.wrap_y);
    }

    #[test]
    fn pull_sign_follows_coordinate_and_skips_dead_zone() {
        let g = GridGravity { G: 1.0, epsilon: 0.1 };
        assert_eq!(g.pull(0.5, 9.0), 4.0);
        assert_eq!(g.pull(-0.5, 9.0), -4.0);
        assert_eq!(g.pull(0.05, 9.0), 0.0);
        assert_eq!(g.pull(-0.1, 9.0), 0.0);
    }

    #[test]
    fn empty_cells_contribute_nothing() {
        let grid = SpatialGrid::new(4).unwrap();
        let w = NeighborWindow::around(1, 1, 4);
        let a = axis_acceleration(&GridGravity::default(), &grid, &w, Axis::X);
        assert_eq!(a, 0.0);
        assert!(!a.is_nan());
    }

    #[test]
    fn wrapped_window_negates_the_center() {
        let mut grid = SpatialGrid::new(4).unwrap();
        grid.accumulate_mass(1, 1, 9.0);
        grid.accumulate_center(1, 1, 0.5, 0.5);
        let g = GridGravity { G: 1.0, epsilon: 0.1 };

        let inner = NeighborWindow::around(1, 1, 4);
        assert_eq!(axis_acceleration(&g, &grid, &inner, Axis::X), 4.0);

        // (0, 1) still sees row 1, but its window wrapped on x
        let edge = NeighborWindow::around(0, 1, 4);
        assert_eq!(axis_acceleration(&g, &grid, &edge, Axis::X), -4.0);
        assert_eq!(axis_acceleration(&g, &grid, &edge, Axis::Y), 4.0);
    }
}
