//! Fixed-step time integrator for the grid simulation
//!
//! One step, in order:
//! 1. zero every cell's mass (centers from the last step stay readable)
//! 2. kick and drift each particle along x and y from its 3×3 window
//! 3. zero every cell's center
//! 4. re-aggregate the grid from the new positions
//!
//! Each stage is a full barrier: a rayon parallel loop returns only after
//! every worker has finished.

use rayon::prelude::*;

use super::aggregate::{reaggregate, CellBuckets};
use super::engine::Reaggregation;
use super::forces::{axis_acceleration, Axis, CellPull, NeighborWindow};
use super::grid::SpatialGrid;
use super::states::ParticleStore;

/// Advance the system by one step in-place
pub fn grid_step<F>(
    particles: &mut ParticleStore,
    grid: &mut SpatialGrid,
    buckets: &mut CellBuckets,
    force: &F,
    policy: Reaggregation,
) where
    F: CellPull + Sync,
{
    grid.reset_mass();
    kick_drift(particles, grid, force);
    grid.reset_centers();
    reaggregate(particles, grid, buckets, policy);
}

/// Update velocity and position of every particle from the current grid.
///
/// Each particle is owned by one worker and reads only the grid and its own
/// cached home cell, so the x and y updates need no synchronisation.
pub fn kick_drift<F>(particles: &mut ParticleStore, grid: &SpatialGrid, force: &F)
where
    F: CellPull + Sync,
{
    let side = grid.side();

    particles.as_mut_slice().par_iter_mut().for_each(|p| {
        let window = NeighborWindow::around(p.ix, p.jy, side);

        let ax = axis_acceleration(force, grid, &window, Axis::X);
        p.v.x += ax;
        p.x.x = wrap_unit(p.x.x + p.v.x + 0.5 * ax);

        let ay = axis_acceleration(force, grid, &window, Axis::Y);
        p.v.y += ay;
        p.x.y = wrap_unit(p.x.y + p.v.y + 0.5 * ay);
    });
}

/// Bring a coordinate back into [0,1) by whole-unit shifts
pub fn wrap_unit(c: f64) -> f64 {
    if !c.is_finite() {
        return 0.0;
    }
    // large excursions would take many single-unit shifts
    let mut c = if c.abs() >= 2.0 { c - c.floor() } else { c };
    while c >= 1.0 {
        c -= 1.0;
    }
    while c < 0.0 {
        c += 1.0;
    }
    // -tiny + 1.0 rounds to exactly 1.0
    if c >= 1.0 {
        0.0
    } else {
        c
    }
}
