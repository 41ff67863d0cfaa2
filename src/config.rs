//! Analysis configuration
//!
//! Every option has a default matching the standard boosted-jet selection
//! (CA8 jets, CMS pruning defaults, 100 GeV leading-jet cut), so an empty
//! TOML file is a valid configuration.
//!
//! # Example TOML
//! ```toml
//! cone_size = 0.8
//! min_leading_pt = 100.0
//! max_jets_considered = 1
//! simulated = true
//!
//! [area]
//! ghost_area = 0.01
//! ghost_eta_max = 7.0
//!
//! [pruning]
//! z_cut = 0.1
//! r_cut_factor = 0.5
//!
//! [nsubjettiness]
//! kappa = 1.0
//! ```

use crate::accumulator::{Binning, HistogramConfig};
use crate::cluster::{GhostAreaSpec, MAX_GHOSTS};
use crate::nsubjettiness::DEFAULT_MAX_ITERATIONS;
use crate::pruner::Pruner;
use crate::trigger::TriggerConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Invalid configuration value
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be {expected}, got {value}")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
        value: String,
    },
}

fn out_of_range(field: &'static str, expected: &'static str, value: impl ToString) -> ConfigError {
    ConfigError::OutOfRange {
        field,
        expected,
        value: value.to_string(),
    }
}

/// N-subjettiness options
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NsubjettinessConfig {
    /// Angular exponent κ
    pub kappa: f64,
    /// Cap on axis refinement passes
    pub max_iterations: usize,
    /// Optional cap on each particle's distance to its axis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r_cutoff: Option<f64>,
}

impl Default for NsubjettinessConfig {
    fn default() -> Self {
        Self {
            kappa: 1.0,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            r_cutoff: None,
        }
    }
}

/// Complete configuration of the jet analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Cambridge/Aachen cone size R, also used as R0 for τ_N
    pub cone_size: f64,
    /// Events whose leading pruned jet is softer than this are skipped
    pub min_leading_pt: f64,
    /// Number of upstream jets whose constituents are clustered
    pub max_jets_considered: usize,
    /// Events with more particles than this are skipped
    pub max_particles: usize,
    /// Run the generator-level branch as well
    pub simulated: bool,
    pub area: GhostAreaSpec,
    pub pruning: Pruner,
    pub nsubjettiness: NsubjettinessConfig,
    pub trigger: TriggerConfig,
    pub histograms: HistogramConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            cone_size: 0.8,
            min_leading_pt: 100.0,
            max_jets_considered: 1,
            max_particles: 10_000,
            simulated: false,
            area: GhostAreaSpec::default(),
            pruning: Pruner::default(),
            nsubjettiness: NsubjettinessConfig::default(),
            trigger: TriggerConfig::default(),
            histograms: HistogramConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file: {}", path.as_ref().display())
        })?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    /// Check every value is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_positive(self.cone_size) {
            return Err(out_of_range("cone_size", "positive", self.cone_size));
        }

        if self.area.enabled {
            if !is_positive(self.area.ghost_area) {
                return Err(out_of_range("area.ghost_area", "positive", self.area.ghost_area));
            }
            if !is_positive(self.area.ghost_eta_max) {
                return Err(out_of_range(
                    "area.ghost_eta_max",
                    "positive",
                    self.area.ghost_eta_max,
                ));
            }
            if self.area.repeats == 0 {
                return Err(out_of_range("area.repeats", ">= 1", self.area.repeats));
            }
            if self.area.n_ghosts() > MAX_GHOSTS {
                return Err(out_of_range(
                    "area",
                    "a grid of at most 250000 ghosts",
                    format!(
                        "{} ghosts (ghost_area {}, ghost_eta_max {})",
                        self.area.n_ghosts(),
                        self.area.ghost_area,
                        self.area.ghost_eta_max
                    ),
                ));
            }
        }

        if !(0.0..=1.0).contains(&self.pruning.z_cut) {
            return Err(out_of_range("pruning.z_cut", "in [0, 1]", self.pruning.z_cut));
        }
        if !(self.pruning.r_cut_factor.is_finite() && self.pruning.r_cut_factor >= 0.0) {
            return Err(out_of_range(
                "pruning.r_cut_factor",
                "non-negative",
                self.pruning.r_cut_factor,
            ));
        }

        if !is_positive(self.nsubjettiness.kappa) {
            return Err(out_of_range("nsubjettiness.kappa", "positive", self.nsubjettiness.kappa));
        }
        if let Some(cutoff) = self.nsubjettiness.r_cutoff {
            if !is_positive(cutoff) {
                return Err(out_of_range("nsubjettiness.r_cutoff", "positive", cutoff));
            }
        }

        for bit in &self.trigger.bits {
            if bit.bit >= u32::BITS {
                return Err(out_of_range("trigger.bits.bit", "below 32", bit.bit));
            }
        }

        if self.max_jets_considered == 0 {
            return Err(out_of_range("max_jets_considered", ">= 1", self.max_jets_considered));
        }

        for (field, binning) in [
            ("histograms.pt", self.histograms.pt),
            ("histograms.eta", self.histograms.eta),
            ("histograms.tau", self.histograms.tau),
            ("histograms.tau_ratio", self.histograms.tau_ratio),
        ] {
            validate_binning(field, &binning)?;
        }

        Ok(())
    }
}

/// Finite and strictly positive
fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn validate_binning(field: &'static str, binning: &Binning) -> Result<(), ConfigError> {
    if binning.bins == 0 {
        return Err(out_of_range(field, "at least one bin", binning.bins));
    }
    if !(binning.min.is_finite() && binning.max.is_finite() && binning.max > binning.min) {
        return Err(out_of_range(
            field,
            "max above min",
            format!("[{}, {}]", binning.min, binning.max),
        ));
    }
    Ok(())
}
