//! Spatial grid over the unit torus
//!
//! The grid is `side × side` cells stored row-major. Each cell aggregates the
//! mass and mass-weighted center of the particles currently inside it, the
//! same way a Barnes–Hut node summarises its subtree, only flat and fixed-size.

use rayon::prelude::*;

use crate::error::{Result, SimError};

/// One grid cell: total mass and center of mass of its member particles
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Cell {
    pub mass: f64,
    pub cmx: f64,
    pub cmy: f64,
}

impl Cell {
    pub fn add_mass(&mut self, dm: f64) {
        self.mass += dm;
    }

    pub fn add_center(&mut self, dx: f64, dy: f64) {
        self.cmx += dx;
        self.cmy += dy;
    }

    pub fn is_empty(&self) -> bool {
        self.mass <= 0.0
    }
}

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    side: usize,
    cells: Vec<Cell>,
}

impl SpatialGrid {
    /// Allocate a zeroed `side × side` grid
    pub fn new(side: usize) -> Result<Self> {
        let count = side
            .checked_mul(side)
            .ok_or_else(|| SimError::InvalidParameters(format!("grid side {side} overflows")))?;

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(count)
            .map_err(|source| SimError::ResourceExhaustion {
                what: "grid storage",
                requested: count,
                source,
            })?;
        cells.resize(count, Cell::default());

        Ok(Self { side, cells })
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Normalise a possibly out-of-range index onto the torus
    pub fn wrap(&self, i: isize) -> usize {
        i.rem_euclid(self.side as isize) as usize
    }

    /// Cell at (row, col); indices wrap around both axes
    pub fn cell(&self, row: isize, col: isize) -> &Cell {
        &self.cells[self.index(row, col)]
    }

    pub fn accumulate_mass(&mut self, row: isize, col: isize, dm: f64) {
        let i = self.index(row, col);
        self.cells[i].add_mass(dm);
    }

    pub fn accumulate_center(&mut self, row: isize, col: isize, dx: f64, dy: f64) {
        let i = self.index(row, col);
        self.cells[i].add_center(dx, dy);
    }

    pub fn reset_mass(&mut self) {
        self.cells.par_iter_mut().for_each(|c| c.mass = 0.0);
    }

    pub fn reset_centers(&mut self) {
        self.cells.par_iter_mut().for_each(|c| {
            c.cmx = 0.0;
            c.cmy = 0.0;
        });
    }

    /// Sum of all cell masses
    pub fn total_mass(&self) -> f64 {
        self.cells.iter().map(|c| c.mass).sum()
    }

    fn index(&self, row: isize, col: isize) -> usize {
        self.wrap(row) * self.side + self.wrap(col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_wraps_both_axes() {
        let mut grid = SpatialGrid::new(4).unwrap();
        grid.accumulate_mass(3, 3, 2.0);

        assert_eq!(grid.cell(-1, -1).mass, 2.0);
        assert_eq!(grid.cell(7, 3).mass, 2.0);
        assert_eq!(grid.cell(3, -5).mass, 2.0);
    }

    #[test]
    fn resets_are_independent() {
        let mut grid = SpatialGrid::new(2).unwrap();
        grid.accumulate_mass(0, 1, 3.0);
        grid.accumulate_center(0, 1, 0.25, 0.75);

        grid.reset_mass();
        let c = *grid.cell(0, 1);
        assert_eq!(c.mass, 0.0);
        assert_eq!((c.cmx, c.cmy), (0.25, 0.75));

        grid.reset_centers();
        assert_eq!(*grid.cell(0, 1), Cell::default());
    }
}
