//! Run descriptor: the JSON file handed to the simulation engine, read once
//! per invocation.
//!
//! Only `run.run_name` and `geometry.shape` are required. Fields the engine
//! uses but plotting does not (particle source, simulation counts, ...) are
//! ignored.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{Geometry, GeometryParams};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunIdentity {
    pub run_name: String,
    #[serde(rename = "save_hist", default)]
    pub save_trajectories: bool,
}

/// Single-medium material parameters, used to name figures from parameter
/// sweeps.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct MaterialParams {
    #[serde(alias = "lambda", default)]
    pub mean_free_path: Option<f64>,
    #[serde(default)]
    pub pabs: Option<f64>,
    #[serde(default)]
    pub k: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawDescriptor {
    run: RunIdentity,
    geometry: GeometryParams,
    #[serde(default)]
    material: MaterialParams,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunDescriptor {
    pub run: RunIdentity,
    pub geometry: Geometry,
    pub material: MaterialParams,
}

impl RunDescriptor {
    pub fn from_json(text: &str) -> std::result::Result<Self, serde_json::Error> {
        let raw: RawDescriptor = serde_json::from_str(text)?;
        Ok(Self {
            run: raw.run,
            geometry: Geometry::from_params(&raw.geometry),
            material: raw.material,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::read(path, e))?;
        Self::from_json(&text).map_err(|e| Error::Descriptor {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
