//! Morph configuration system
//!
//! This crate provides centralized tuning for the shape morphing engine,
//! loading settings from `morph.toml` with environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for the morphing engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MorphConfig {
    /// Boundary sampling settings
    pub sampling: SamplingConfig,
    /// Command alignment settings
    pub alignment: AlignmentConfig,
    /// Handling of unsupported operations
    pub diagnostics: DiagnosticsConfig,
}

/// Boundary sampling configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Minimum arc length between two circle samples, in path units
    pub min_sample_distance: f64,
    /// A command is halved while it is longer than `gap_ratio` times the mean
    /// of the other command lengths of its subpath
    pub gap_ratio: f64,
    /// Enable gap densification of path segments before alignment
    pub densify: bool,
}

/// Command alignment configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// Progress values closer than this are considered tied
    pub progress_epsilon: f64,
    /// Maximum tolerated progress difference between paired commands
    pub misalignment_tolerance: f64,
}

/// Unsupported-operation handling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Fail instead of degrading when an arc would have to be split or coerced
    pub strict_arcs: bool,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            min_sample_distance: 1.0,
            gap_ratio: 5.0,
            densify: true,
        }
    }
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            progress_epsilon: 1e-6,
            misalignment_tolerance: 0.15,
        }
    }
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self { strict_arcs: false }
    }
}

impl MorphConfig {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the morph.toml configuration file
    ///
    /// # Returns
    /// * `Ok(MorphConfig)` - Successfully loaded configuration
    /// * `Err(String)` - Error message if loading failed
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Load configuration from the default location (morph.toml in the current directory)
    /// or return default configuration if file doesn't exist
    pub fn load_or_default() -> Self {
        Self::load_from_file("morph.toml").unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        // Sampling settings
        if let Ok(val) = std::env::var("MORPH_MIN_SAMPLE_DISTANCE") {
            if let Ok(dist) = val.parse::<f64>() {
                if dist > 0.0 {
                    self.sampling.min_sample_distance = dist;
                }
            }
        }
        if let Ok(val) = std::env::var("MORPH_GAP_RATIO") {
            if let Ok(ratio) = val.parse::<f64>() {
                self.sampling.gap_ratio = ratio;
            }
        }
        if let Ok(val) = std::env::var("MORPH_DENSIFY") {
            self.sampling.densify = val == "1" || val.eq_ignore_ascii_case("true");
        }

        // Alignment settings
        if let Ok(val) = std::env::var("MORPH_MISALIGNMENT_TOLERANCE") {
            if let Ok(tol) = val.parse::<f64>() {
                self.alignment.misalignment_tolerance = tol;
            }
        }

        // Diagnostics settings
        if let Ok(val) = std::env::var("MORPH_STRICT_ARCS") {
            self.diagnostics.strict_arcs = val == "1" || val.eq_ignore_ascii_case("true");
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from morph.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}
