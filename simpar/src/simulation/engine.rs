//! High-level runtime engine settings
//!
//! Selects the worker-pool size and the re-aggregation policy
//! used when building and running a `Scenario`

use clap::ValueEnum;
use serde::Deserialize;

/// How each step rebuilds the per-cell centers of mass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Reaggregation {
    /// Sum every cell's mass first, then divide by the final mass
    #[default]
    TwoPhase,
    /// Divide by the mass accumulated so far, members visited in index order
    Running,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Engine {
    pub threads: Option<usize>, // None = rayon's default pool
    pub reaggregation: Reaggregation,
}
