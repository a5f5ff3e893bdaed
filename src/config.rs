use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::naming::NamingScheme;
use crate::outcome::ReflectionPolicy;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputSettings {
    #[serde(default = "OutputSettings::default_root")]
    pub root: String,
    #[serde(default)]
    pub naming: NamingScheme,
}

impl OutputSettings {
    fn default_root() -> String {
        "out".to_string()
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            root: Self::default_root(),
            naming: NamingScheme::default(),
        }
    }
}

/// Pixel sizes of the rendered figures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FigureSettings {
    #[serde(default = "FigureSettings::default_probability_width")]
    pub probability_width: u32,
    #[serde(default = "FigureSettings::default_probability_height")]
    pub probability_height: u32,
    #[serde(default = "FigureSettings::default_trajectory_width")]
    pub trajectory_width: u32,
    #[serde(default = "FigureSettings::default_trajectory_height")]
    pub trajectory_height: u32,
}

impl FigureSettings {
    fn default_probability_width() -> u32 {
        1600
    }
    fn default_probability_height() -> u32 {
        1000
    }
    fn default_trajectory_width() -> u32 {
        1800
    }
    fn default_trajectory_height() -> u32 {
        1200
    }
}

impl Default for FigureSettings {
    fn default() -> Self {
        Self {
            probability_width: Self::default_probability_width(),
            probability_height: Self::default_probability_height(),
            trajectory_width: Self::default_trajectory_width(),
            trajectory_height: Self::default_trajectory_height(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SeriesSettings {
    #[serde(default)]
    pub reflection: ReflectionPolicy,
}

/// Camera of the 3D trajectory scene, in radians.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewSettings {
    #[serde(default = "ViewSettings::default_yaw")]
    pub yaw: f64,
    #[serde(default = "ViewSettings::default_pitch")]
    pub pitch: f64,
    #[serde(default = "ViewSettings::default_scale")]
    pub scale: f64,
}

impl ViewSettings {
    fn default_yaw() -> f64 {
        0.7
    }
    fn default_pitch() -> f64 {
        0.35
    }
    fn default_scale() -> f64 {
        0.85
    }
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            yaw: Self::default_yaw(),
            pitch: Self::default_pitch(),
            scale: Self::default_scale(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PlotSettings {
    #[serde(default)]
    pub output: OutputSettings,
    #[serde(default)]
    pub figure: FigureSettings,
    #[serde(default)]
    pub series: SeriesSettings,
    #[serde(default)]
    pub view: ViewSettings,
}

impl PlotSettings {
    fn format_f64_compact(x: f64) -> String {
        let mut s = format!("{:.6}", x);
        while s.contains('.') && s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
        if s.is_empty() { "0".to_string() } else { s }
    }

    /// Every key commented out, so the file documents the defaults without
    /// pinning them.
    fn commented_defaults(text: &str) -> String {
        let mut commented = String::new();
        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                commented.push('\n');
            } else if trimmed.starts_with('[') && trimmed.ends_with(']') {
                commented.push_str(line);
                commented.push('\n');
            } else {
                let mut out_line = line.to_string();
                if let Some((lhs, rhs)) = line.split_once('=') {
                    let rhs_trim = rhs.trim();
                    if rhs_trim.contains('.') && !rhs_trim.contains('"') {
                        if let Ok(val) = rhs_trim.parse::<f64>() {
                            let mut formatted = Self::format_f64_compact(val);
                            if !formatted.contains('.') {
                                formatted.push_str(".0");
                            }
                            out_line = format!("{} = {}", lhs.trim(), formatted);
                        }
                    }
                }
                commented.push_str("# ");
                commented.push_str(&out_line);
                commented.push('\n');
            }
        }
        commented
    }

    /// Read settings from `path`. A missing file is created with commented
    /// defaults; an unreadable or invalid one is reported and ignored.
    pub fn load_or_default(path: &str) -> Self {
        let path_obj = Path::new(path);
        if path_obj.exists() {
            match fs::read_to_string(path_obj) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(cfg) => return cfg,
                    Err(err) => {
                        warn!("Failed to parse settings {path}: {err}. Using defaults.");
                    }
                },
                Err(err) => {
                    warn!("Failed to read settings {path}: {err}. Using defaults.");
                }
            }
            return Self::default();
        }

        let default_cfg = Self::default();
        match toml::to_string_pretty(&default_cfg) {
            Ok(text) => {
                if let Err(err) = fs::write(path_obj, Self::commented_defaults(&text)) {
                    warn!("Failed to write default settings to {path}: {err}");
                } else {
                    info!("Wrote default settings to {path}");
                }
            }
            Err(err) => warn!("Failed to serialize default settings: {err}"),
        }
        default_cfg
    }
}
