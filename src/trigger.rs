//! Trigger object matching and trigger bitmask
//!
//! Trigger names are matched by substring, the way online path names carry
//! version suffixes (`HLT_MET120_HBHENoiseCleaned_v4` matches
//! `HLT_MET120_HBHENoiseCleaned_v`).

use crate::event::TriggerObject;
use crate::kinematics::Direction;
use serde::{Deserialize, Serialize};

/// ΔR reported when there is nothing to match against
pub const NO_MATCH_DELTA_R: f64 = 999.0;

/// One trigger pattern and the bit it sets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerBit {
    pub pattern: String,
    pub bit: u32,
}

impl TriggerBit {
    pub fn new(pattern: impl Into<String>, bit: u32) -> Self {
        Self {
            pattern: pattern.into(),
            bit,
        }
    }
}

/// Trigger configuration
///
/// # Example TOML
/// ```toml
/// [trigger]
/// jet_pattern = "MonoCentralPFJet80_PFMETnoMu"
///
/// [[trigger.bits]]
/// pattern = "MonoCentralPFJet80_PFMETnoMu"
/// bit = 0
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    /// Substring selecting the trigger objects jets are matched to
    pub jet_pattern: String,
    /// Patterns that set bits in the event trigger mask
    pub bits: Vec<TriggerBit>,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            jet_pattern: "MonoCentralPFJet80_PFMETnoMu".to_string(),
            bits: vec![
                TriggerBit::new("MonoCentralPFJet80_PFMETnoMu", 0),
                TriggerBit::new("HLT_MET120_HBHENoiseCleaned_v", 1),
            ],
        }
    }
}

/// Matches jets against a name-filtered trigger object set
#[derive(Debug, Clone)]
pub struct TriggerMatcher {
    config: TriggerConfig,
}

impl TriggerMatcher {
    pub fn new(config: TriggerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TriggerConfig {
        &self.config
    }

    /// Directions of the objects whose name contains the jet pattern
    ///
    /// Built once per event and shared by every jet of that event.
    pub fn jet_objects(&self, objects: Option<&[TriggerObject]>) -> Vec<Direction> {
        objects
            .unwrap_or_default()
            .iter()
            .filter(|o| o.name.contains(&self.config.jet_pattern))
            .map(TriggerObject::direction)
            .collect()
    }

    /// Bitmask of every configured pattern found among the objects
    pub fn bitmask(&self, objects: Option<&[TriggerObject]>) -> u32 {
        let mut mask = 0u32;
        for object in objects.unwrap_or_default() {
            for bit in &self.config.bits {
                if object.name.contains(&bit.pattern) {
                    mask |= 1 << bit.bit;
                }
            }
        }
        mask
    }
}

/// Smallest ΔR between `jet` and the filtered objects, 999 when empty
pub fn min_delta_r(jet: &Direction, filtered: &[Direction]) -> f64 {
    filtered
        .iter()
        .map(|d| jet.delta_r(d))
        .fold(NO_MATCH_DELTA_R, f64::min)
}
