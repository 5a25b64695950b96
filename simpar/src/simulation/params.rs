//! Numerical and physical parameters for a run
//!
//! `RunParameters` holds the four validated run inputs:
//! - random seed,
//! - grid side length,
//! - particle count,
//! - iteration count
//!
//! The physical constants of the grid force law live here too.

use crate::error::{Result, SimError};

/// Gravitational constant
pub const G: f64 = 6.67408e-11;

/// Cell-center coordinates within this distance of zero exert no pull
pub const EPSILON: f64 = 0.0005;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunParameters {
    pub seed: u64, // deterministic seed
    pub grid_side: usize, // cells per axis
    pub particles: usize, // particle count
    pub iterations: u64, // time steps, at least 1
}

impl RunParameters {
    /// Validate raw integers coming from a run file or another front end.
    /// Every value must be strictly positive.
    pub fn new(seed: i64, grid_side: i64, particles: i64, iterations: i64) -> Result<Self> {
        Ok(Self {
            seed: positive("seed", seed)?,
            grid_side: to_usize("grid_side", positive("grid_side", grid_side)?)?,
            particles: to_usize("particles", positive("particles", particles)?)?,
            iterations: positive("iterations", iterations)?,
        })
    }

    pub fn cell_count(&self) -> usize {
        self.grid_side * self.grid_side
    }
}

fn positive(name: &str, value: i64) -> Result<u64> {
    if value <= 0 {
        return Err(SimError::InvalidParameters(format!(
            "{name} must be a positive integer, got {value}"
        )));
    }
    Ok(value as u64)
}

fn to_usize(name: &str, value: u64) -> Result<usize> {
    usize::try_from(value)
        .map_err(|_| SimError::InvalidParameters(format!("{name} is too large: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_positive_values() {
        let p = RunParameters::new(1, 10, 100, 1).unwrap();
        assert_eq!(p.grid_side, 10);
        assert_eq!(p.cell_count(), 100);
    }

    #[test]
    fn rejects_zero_and_negative_values() {
        for (s, g, n, i) in [(0, 1, 1, 1), (1, -3, 1, 1), (1, 1, 0, 1), (1, 1, 1, 0)] {
            let err = RunParameters::new(s, g, n, i).unwrap_err();
            assert!(matches!(err, SimError::InvalidParameters(_)), "{err}");
        }
    }
}
