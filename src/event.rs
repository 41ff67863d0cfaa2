//! Per-event input collections
//!
//! One event is one JSON object per line:
//!
//! ```json
//! {"jets":[{"kind":"pf","constituents":[{"px":120.0,"py":0.0,"pz":5.0,"e":120.1}]}],
//!  "pf_candidates":[{"px":120.0,"py":0.0,"pz":5.0,"e":120.1}],
//!  "trigger_objects":[{"name":"HLT_MonoCentralPFJet80_PFMETnoMu","eta":0.04,"phi":0.0}],
//!  "gen_particles":[{"status":1,"px":118.0,"py":1.0,"pz":4.0,"e":118.1}]}
//! ```
//!
//! Input jets are a tagged variant resolved once at decode time, so the
//! particle collector never has to guess what kind of object it was handed.

use crate::kinematics::{Direction, FourMomentum};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A reconstructed particle-flow candidate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub struct Candidate {
    pub px: f64,
    pub py: f64,
    pub pz: f64,
    pub e: f64,
}

impl Candidate {
    pub fn momentum(&self) -> FourMomentum {
        FourMomentum::new(self.px, self.py, self.pz, self.e)
    }
}

/// A generator-level particle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub struct GenParticle {
    /// Generator status code (1 = final state)
    pub status: i32,
    pub px: f64,
    pub py: f64,
    pub pz: f64,
    pub e: f64,
}

impl GenParticle {
    /// Status code of particles that reach the detector
    pub const FINAL_STATE: i32 = 1;

    pub fn momentum(&self) -> FourMomentum {
        FourMomentum::new(self.px, self.py, self.pz, self.e)
    }

    pub fn is_final_state(&self) -> bool {
        self.status == Self::FINAL_STATE
    }
}

/// A jet from the upstream reconstruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum InputJet {
    /// Particle-flow jet carrying its candidate constituents
    Pf { constituents: Vec<Candidate> },
    /// Calorimeter jet (no particle-level constituents)
    Calo {
        px: f64,
        py: f64,
        pz: f64,
        e: f64,
    },
    /// Track jet (no particle-level constituents)
    Track {
        px: f64,
        py: f64,
        pz: f64,
        e: f64,
    },
}

impl InputJet {
    pub fn kind(&self) -> &'static str {
        match self {
            InputJet::Pf { .. } => "pf",
            InputJet::Calo { .. } => "calo",
            InputJet::Track { .. } => "track",
        }
    }
}

/// An online trigger object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub struct TriggerObject {
    /// Name of the trigger path that produced this object
    pub name: String,
    pub eta: f64,
    pub phi: f64,
}

impl TriggerObject {
    pub fn direction(&self) -> Direction {
        Direction::new(self.eta, self.phi)
    }
}

/// Everything the pipeline reads for one event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub struct EventInput {
    /// Upstream jets, in upstream order
    pub jets: Vec<InputJet>,
    /// Full particle-flow candidate collection of the event
    #[serde(default)]
    pub pf_candidates: Vec<Candidate>,
    /// Trigger objects; `None` when the collection was not available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_objects: Option<Vec<TriggerObject>>,
    /// Generator-level particles (simulation only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gen_particles: Option<Vec<GenParticle>>,
}

impl EventInput {
    /// Decode one event from a JSON line
    pub fn from_json(line: &str) -> Result<Self> {
        serde_json::from_str(line).context("Failed to decode event")
    }
}
