//! Where figures go and where a run's engine output is read from.
//!
//! Names are pure functions of their inputs, so re-running over the same run
//! rewrites the same files.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::descriptor::{MaterialParams, RunDescriptor};
use crate::outcome::Outcome;

pub const PROBABILITIES_STEM: &str = "probabilities";
pub const TRAJECTORIES_STEM: &str = "trajectories";
const IMAGE_EXTENSION: &str = "png";
const MATERIAL_DIR: &str = "figures";
const RESULTS_TABLE: &str = "simulations_output.txt";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum NamingScheme {
    /// `<root>/<run>/probabilities.png`
    #[default]
    Run,
    /// `<root>/figures/probabilities_lambda_<l>_pabs_<p>_k_<k>.png`
    Material,
}

/// Float rendered for a file name: shortest round-trip text with `.` turned
/// into `p`, e.g. `0.5 -> 0p5`.
pub fn clean_number(value: f64) -> String {
    value.to_string().replace('.', "p")
}

/// Keep `[A-Za-z0-9_-]`, spell `.` as `p`, replace everything else with `_`.
pub fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '.' => 'p',
            c if c.is_ascii_alphanumeric() || c == '-' || c == '_' => c,
            _ => '_',
        })
        .collect();
    if cleaned.is_empty() {
        "run".to_string()
    } else {
        cleaned
    }
}

/// `<root>/<run_name>`, the directory the engine writes a run into. Figures
/// and engine output share it. A name that is not one plain path component
/// (`a/b`, `..`, blank) is sanitized instead of joined as-is.
pub fn run_dir(root: &Path, run_name: &str) -> PathBuf {
    let mut components = Path::new(run_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) if !run_name.trim().is_empty() => root.join(name),
        _ => root.join(sanitize_name(run_name)),
    }
}

pub fn material_suffix(material: &MaterialParams) -> Option<String> {
    let (lambda, pabs, k) = (material.mean_free_path?, material.pabs?, material.k?);
    Some(format!(
        "lambda_{}_pabs_{}_k_{}",
        clean_number(lambda),
        clean_number(pabs),
        clean_number(k)
    ))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNamer {
    dir: PathBuf,
    suffix: Option<String>,
}

impl OutputNamer {
    pub fn for_run(root: &Path, run_name: &str) -> Self {
        Self {
            dir: run_dir(root, run_name),
            suffix: None,
        }
    }

    /// `None` unless all of `mean_free_path`, `pabs` and `k` are set.
    pub fn for_material(root: &Path, material: &MaterialParams) -> Option<Self> {
        Some(Self {
            dir: root.join(MATERIAL_DIR),
            suffix: Some(material_suffix(material)?),
        })
    }

    /// Material naming falls back to run naming when the descriptor carries
    /// no complete single-medium parameter set.
    pub fn from_descriptor(root: &Path, scheme: NamingScheme, descriptor: &RunDescriptor) -> Self {
        match scheme {
            NamingScheme::Run => Self::for_run(root, &descriptor.run.run_name),
            NamingScheme::Material => Self::for_material(root, &descriptor.material)
                .unwrap_or_else(|| {
                    warn!(
                        "material parameters incomplete for run {}; naming figures by run",
                        descriptor.run.run_name
                    );
                    Self::for_run(root, &descriptor.run.run_name)
                }),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn artifact(&self, stem: &str) -> PathBuf {
        let name = match &self.suffix {
            Some(suffix) => format!("{stem}_{suffix}.{IMAGE_EXTENSION}"),
            None => format!("{stem}.{IMAGE_EXTENSION}"),
        };
        self.dir.join(name)
    }

    pub fn probabilities(&self) -> PathBuf {
        self.artifact(PROBABILITIES_STEM)
    }

    pub fn trajectories(&self) -> PathBuf {
        self.artifact(TRAJECTORIES_STEM)
    }
}

/// Engine output layout for one run: `<root>/<run>/data/...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    data_dir: PathBuf,
}

impl RunPaths {
    pub fn new(root: &Path, run_name: &str) -> Self {
        Self {
            data_dir: run_dir(root, run_name).join("data"),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn results_table(&self) -> PathBuf {
        self.data_dir.join(RESULTS_TABLE)
    }

    /// Trajectory file for `outcome`, preferring the current name and
    /// falling back to a legacy name only when that one exists.
    pub fn history(&self, outcome: Outcome) -> PathBuf {
        let current = self.data_dir.join(outcome.history_file());
        if current.exists() {
            return current;
        }
        outcome
            .legacy_history_file()
            .map(|legacy| self.data_dir.join(legacy))
            .filter(|legacy| legacy.exists())
            .unwrap_or(current)
    }
}
