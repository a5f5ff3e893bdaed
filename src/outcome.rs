use plotters::style::RGBColor;
use plotters::style::colors::{BLUE, GREEN, RED};
use serde::{Deserialize, Serialize};

use crate::geometry::Geometry;

/// Fate of a simulated particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Outcome {
    Absorbed,
    Reflected,
    Transmitted,
}

impl Outcome {
    pub const ALL: [Outcome; 3] = [Outcome::Absorbed, Outcome::Reflected, Outcome::Transmitted];

    pub fn label(self) -> &'static str {
        match self {
            Outcome::Absorbed => "Absorbed",
            Outcome::Reflected => "Reflected",
            Outcome::Transmitted => "Transmitted",
        }
    }

    pub fn color(self) -> RGBColor {
        match self {
            Outcome::Absorbed => RED,
            Outcome::Reflected => GREEN,
            Outcome::Transmitted => BLUE,
        }
    }

    /// Trajectory file written by the engine for this outcome.
    pub fn history_file(self) -> &'static str {
        match self {
            Outcome::Absorbed => "hist_absorbed.txt",
            Outcome::Reflected => "hist_reflected.txt",
            Outcome::Transmitted => "hist_transmitted.txt",
        }
    }

    /// Older engine builds wrote transmitted histories under this name.
    pub fn legacy_history_file(self) -> Option<&'static str> {
        match self {
            Outcome::Transmitted => Some("hist_scaped.txt"),
            _ => None,
        }
    }
}

/// Whether the reflected category is drawn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ReflectionPolicy {
    /// Follow the geometry: only slab-like shapes reflect.
    #[default]
    Auto,
    Always,
    Never,
}

impl ReflectionPolicy {
    pub fn includes_reflection(self, geometry: &Geometry) -> bool {
        match self {
            ReflectionPolicy::Auto => geometry.models_reflection(),
            ReflectionPolicy::Always => true,
            ReflectionPolicy::Never => false,
        }
    }

    /// Outcome categories to draw for `geometry`, in legend order.
    pub fn outcomes(self, geometry: &Geometry) -> Vec<Outcome> {
        let mut outcomes = vec![Outcome::Absorbed, Outcome::Transmitted];
        if self.includes_reflection(geometry) {
            outcomes.push(Outcome::Reflected);
        }
        outcomes
    }
}
