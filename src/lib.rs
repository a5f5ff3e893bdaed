//! Figures for particle-transport Monte-Carlo runs: outcome probabilities
//! against the swept geometry scale, and 3D particle trajectories over the
//! simulated geometry.

pub mod artifact;
pub mod config;
pub mod coords;
pub mod descriptor;
pub mod error;
pub mod geometry;
pub mod naming;
pub mod outcome;
pub mod pipeline;
pub mod probability;
pub mod results;
pub mod trajectory;

pub use error::{Error, Result};
