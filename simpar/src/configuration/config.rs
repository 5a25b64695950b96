//! Configuration types for loading simulation runs from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! run. A run file consists of:
//!
//! - [`RunSection`]   – the four run inputs (seed, grid side, particles, iterations)
//! - [`EngineConfig`] – optional engine options (worker threads, re-aggregation policy)
//! - [`RunConfig`]    – top-level wrapper used to load a run from YAML
//!
//! # YAML format
//!
//! ```yaml
//! run:
//!   seed: 1                   # random generator seed
//!   grid_side: 10             # cells per axis
//!   particles: 100            # particle count
//!   iterations: 1             # time steps
//!
//! engine:                     # optional
//!   threads: 4                # worker pool size
//!   reaggregation: two-phase  # or "running"
//! ```
//!
//! Run inputs are read as signed integers so that zero or negative values
//! surface as `InvalidParameters` instead of a parse error.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, SimError};
use crate::simulation::engine::{Engine, Reaggregation};
use crate::simulation::params::RunParameters;

#[derive(Deserialize, Debug, Clone)]
pub struct RunSection {
    pub seed: i64,
    pub grid_side: i64,
    pub particles: i64,
    pub iterations: i64,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct EngineConfig {
    pub threads: Option<usize>, // worker pool size, rayon default when absent
    #[serde(default)]
    pub reaggregation: Reaggregation,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RunConfig {
    pub run: RunSection,
    #[serde(default)]
    pub engine: EngineConfig,
}

impl RunConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_yaml::from_reader(reader)?)
    }

    /// Validate and split into runtime parameters and engine settings
    pub fn into_parts(self) -> Result<(RunParameters, Engine)> {
        let r = self.run;
        let parameters = RunParameters::new(r.seed, r.grid_side, r.particles, r.iterations)?;

        if self.engine.threads == Some(0) {
            return Err(SimError::InvalidParameters("threads must be at least 1".into()));
        }
        let engine = Engine {
            threads: self.engine.threads,
            reaggregation: self.engine.reaggregation,
        };
        Ok((parameters, engine))
    }
}
