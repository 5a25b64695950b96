//! Core state types for the grid simulation.
//!
//! - `Particle` — one point mass on the unit torus, with its cached cell
//! - `ParticleStore` — the flat particle collection owned by a run
//! - `SystemTotals` — total mass and the final system center of mass

use nalgebra::Vector2;

use crate::error::{Result, SimError};

pub type NVec2 = Vector2<f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: NVec2, // position in [0,1)^2
    pub v: NVec2, // velocity
    pub m: f64, // mass
    pub ix: usize, // cell row, floor(x.x * grid_side)
    pub jy: usize, // cell column, floor(x.y * grid_side)
}

impl Particle {
    pub fn new(x: NVec2, v: NVec2, m: f64) -> Self {
        Self { x, v, m, ix: 0, jy: 0 }
    }

    /// Refresh the cached cell indices from the current position
    pub fn locate(&mut self, grid_side: usize) {
        self.ix = cell_index(self.x.x, grid_side);
        self.jy = cell_index(self.x.y, grid_side);
    }

    /// Row-major index of the cached cell
    pub fn cell(&self, grid_side: usize) -> usize {
        self.ix * grid_side + self.jy
    }
}

/// Floor of `coord * grid_side`, clamped into `0..grid_side`.
///
/// `coord` is a torus coordinate in [0,1); the clamp only matters when the
/// product rounds up to exactly `grid_side`.
pub fn cell_index(coord: f64, grid_side: usize) -> usize {
    let i = (coord * grid_side as f64).floor() as usize; // saturates at 0 for tiny negatives
    i.min(grid_side - 1)
}

/// Flat collection of all particles in a run
#[derive(Debug, Clone, Default)]
pub struct ParticleStore {
    particles: Vec<Particle>,
}

impl ParticleStore {
    /// Reserve storage for `n` particles up front
    /// Fails with `ResourceExhaustion` instead of aborting when the allocator refuses
    pub fn with_capacity(n: usize) -> Result<Self> {
        let mut particles = Vec::new();
        particles
            .try_reserve_exact(n)
            .map_err(|source| SimError::ResourceExhaustion {
                what: "particle storage",
                requested: n,
                source,
            })?;
        Ok(Self { particles })
    }

    pub fn from_particles(particles: Vec<Particle>) -> Self {
        Self { particles }
    }

    pub fn push(&mut self, p: Particle) {
        self.particles.push(p);
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&Particle> {
        self.particles.get(i)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn as_mut_slice(&mut self) -> &mut [Particle] {
        &mut self.particles
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemTotals {
    pub total_mass: f64, // fixed after the initial aggregation
    pub center_of_mass: Option<NVec2>, // set on the final iteration only
}

impl SystemTotals {
    pub fn new(total_mass: f64) -> Self {
        Self { total_mass, center_of_mass: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_index_uses_floor_and_lower_cell_on_boundary() {
        assert_eq!(cell_index(0.0, 4), 0);
        assert_eq!(cell_index(0.25, 4), 1);
        assert_eq!(cell_index(0.2499, 4), 0);
        assert_eq!(cell_index(0.999_999_999, 4), 3);
    }

    #[test]
    fn cell_index_stays_below_grid_side_at_the_top_edge() {
        let just_below_one = 1.0 - f64::EPSILON / 2.0;
        assert_eq!(cell_index(just_below_one, 1 << 20), (1 << 20) - 1);
    }

    #[test]
    fn locate_sets_both_indices() {
        let mut p = Particle::new(NVec2::new(0.55, 0.05), NVec2::zeros(), 1.0);
        p.locate(10);
        assert_eq!((p.ix, p.jy), (5, 0));
        assert_eq!(p.cell(10), 50);
    }
}
