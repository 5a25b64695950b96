//! Seeded random particle distribution

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::Result;
use crate::simulation::params::G;
use crate::simulation::states::{NVec2, Particle, ParticleStore};

/// Populate a store with `particle_count` particles drawn from a stream seeded by `seed`.
///
/// Per particle, five uniform deviates in [0,1) are drawn in order: x, y, vx, vy, m.
/// Velocities are scaled by `1 / grid_side / 10` and masses by
/// `grid_side / (G * 1e6 * particle_count)`.
pub fn initialize(seed: u64, grid_side: usize, particle_count: usize) -> Result<ParticleStore> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut store = ParticleStore::with_capacity(particle_count)?;

    let side = grid_side as f64;
    let n = particle_count as f64;

    for _ in 0..particle_count {
        let x = NVec2::new(rng.gen::<f64>(), rng.gen::<f64>());
        let v = NVec2::new(
            rng.gen::<f64>() / side / 10.0,
            rng.gen::<f64>() / side / 10.0,
        );
        let m = rng.gen::<f64>() * side / (G * 1e6 * n);

        let mut p = Particle::new(x, v, m);
        p.locate(grid_side);
        store.push(p);
    }

    debug!("initialized {} particles from seed {}", store.len(), seed);
    Ok(store)
}
