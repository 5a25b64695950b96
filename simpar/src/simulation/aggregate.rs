//! Per-cell mass and center-of-mass aggregation
//!
//! Particles are bucketed by cell with a counting sort, then every cell is
//! handed to exactly one worker. A cell's members are always visited in
//! ascending particle index, so the sums come out bit-identical for any
//! thread count and no two workers ever touch the same cell.
//!
//! Two procedures live here and stay separate:
//! - [`aggregate_initial`] — the first pass, which also returns the total mass
//! - [`reaggregate`] — the end-of-step pass, under a [`Reaggregation`] policy

use log::trace;
use rayon::prelude::*;

use crate::error::{Result, SimError};
use crate::simulation::engine::Reaggregation;
use crate::simulation::grid::{Cell, SpatialGrid};
use crate::simulation::states::{NVec2, Particle, ParticleStore};

/// Particles per partial sum in the fixed-order reductions
const REDUCTION_CHUNK: usize = 1024;

/// Particle indices grouped by the cell they currently occupy
#[derive(Debug, Clone)]
pub struct CellBuckets {
    offsets: Vec<usize>, // cell c owns members[offsets[c]..offsets[c + 1]]
    cursor: Vec<usize>,
    members: Vec<usize>,
}

impl CellBuckets {
    pub fn new(cell_count: usize, particle_count: usize) -> Result<Self> {
        Ok(Self {
            offsets: zeroed(cell_count + 1, "cell bucket offsets")?,
            cursor: zeroed(cell_count, "cell bucket cursor")?,
            members: zeroed(particle_count, "cell bucket members")?,
        })
    }

    /// Regroup particles by their cached cell indices
    pub fn rebuild(&mut self, particles: &[Particle], grid_side: usize) {
        self.offsets.fill(0);
        for p in particles {
            self.offsets[p.cell(grid_side) + 1] += 1;
        }
        for c in 1..self.offsets.len() {
            self.offsets[c] += self.offsets[c - 1];
        }

        let cells = self.cursor.len();
        self.cursor.copy_from_slice(&self.offsets[..cells]);
        for (k, p) in particles.iter().enumerate() {
            let c = p.cell(grid_side);
            self.members[self.cursor[c]] = k;
            self.cursor[c] += 1;
        }
    }

    /// Indices of the particles in cell `c`, ascending
    pub fn members(&self, c: usize) -> &[usize] {
        &self.members[self.offsets[c]..self.offsets[c + 1]]
    }
}

fn zeroed(n: usize, what: &'static str) -> Result<Vec<usize>> {
    let mut v = Vec::new();
    v.try_reserve_exact(n)
        .map_err(|source| SimError::ResourceExhaustion { what, requested: n, source })?;
    v.resize(n, 0);
    Ok(v)
}

/// First aggregation pass over a freshly initialised distribution.
///
/// Phase 1 locates every particle, sums cell masses and the total mass.
/// Phase 2 starts only after phase 1 has finished for every cell, and adds
/// `m·x / cell.mass` using the final cell mass.
///
/// Returns the total system mass.
pub fn aggregate_initial(
    particles: &mut ParticleStore,
    grid: &mut SpatialGrid,
    buckets: &mut CellBuckets,
) -> f64 {
    grid.reset_mass();
    grid.reset_centers();

    let total_mass = locate_and_bucket(particles, grid.side(), buckets);
    let buckets = &*buckets;
    let parts = particles.as_slice();

    // phase 1
    grid.cells_mut().par_iter_mut().enumerate().for_each(|(c, cell)| {
        for &k in buckets.members(c) {
            cell.add_mass(parts[k].m);
        }
    });

    // phase 2
    grid.cells_mut().par_iter_mut().enumerate().for_each(|(c, cell)| {
        add_centers_from_final_mass(cell, buckets.members(c), parts);
    });

    trace!("initial aggregation: total mass {total_mass:e}");
    total_mass
}

/// End-of-step aggregation from the particles' new positions.
///
/// Expects the grid's masses and centers to have been reset by the step.
pub fn reaggregate(
    particles: &mut ParticleStore,
    grid: &mut SpatialGrid,
    buckets: &mut CellBuckets,
    policy: Reaggregation,
) {
    locate_and_bucket(particles, grid.side(), buckets);
    let buckets = &*buckets;
    let parts = particles.as_slice();

    match policy {
        Reaggregation::TwoPhase => {
            grid.cells_mut().par_iter_mut().enumerate().for_each(|(c, cell)| {
                let members = buckets.members(c);
                for &k in members {
                    cell.add_mass(parts[k].m);
                }
                add_centers_from_final_mass(cell, members, parts);
            });
        }
        Reaggregation::Running => {
            grid.cells_mut().par_iter_mut().enumerate().for_each(|(c, cell)| {
                for &k in buckets.members(c) {
                    let p = &parts[k];
                    cell.add_mass(p.m);
                    if !cell.is_empty() {
                        let mass = cell.mass;
                        cell.add_center(p.m * p.x.x / mass, p.m * p.x.y / mass);
                    }
                }
            });
        }
    }
}

/// Mass-weighted mean position of all particles, `Σ m·x / total_mass`
pub fn system_center_of_mass(particles: &ParticleStore, total_mass: f64) -> NVec2 {
    if total_mass <= 0.0 {
        return NVec2::zeros();
    }
    particles
        .as_slice()
        .par_chunks(REDUCTION_CHUNK)
        .map(|chunk| {
            chunk
                .iter()
                .fold(NVec2::zeros(), |acc, p| acc + p.x * p.m / total_mass)
        })
        .collect::<Vec<_>>()
        .into_iter()
        .fold(NVec2::zeros(), |acc, part| acc + part)
}

/// Refresh every particle's cell, regroup the buckets, and return the summed mass.
/// Partial sums are merged in chunk order so the total never depends on scheduling.
fn locate_and_bucket(
    particles: &mut ParticleStore,
    grid_side: usize,
    buckets: &mut CellBuckets,
) -> f64 {
    let parts = particles.as_mut_slice();
    let total_mass = parts
        .par_chunks_mut(REDUCTION_CHUNK)
        .map(|chunk| {
            chunk.iter_mut().fold(0.0, |acc, p| {
                p.locate(grid_side);
                acc + p.m
            })
        })
        .collect::<Vec<f64>>()
        .into_iter()
        .sum::<f64>();

    buckets.rebuild(parts, grid_side);
    total_mass
}

fn add_centers_from_final_mass(cell: &mut Cell, members: &[usize], parts: &[Particle]) {
    if cell.is_empty() {
        return;
    }
    let mass = cell.mass;
    for &k in members {
        let p = &parts[k];
        cell.add_center(p.m * p.x.x / mass, p.m * p.x.y / mass);
    }
}
