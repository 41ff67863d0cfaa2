// Integration test utilities
//
// Builders for JSON Lines events so tests read as physics, not JSON.

#![allow(dead_code)]

use jetsub::event::{Candidate, EventInput, GenParticle, InputJet, TriggerObject};
use jetsub::FourMomentum;
use std::io::Write;
use tempfile::NamedTempFile;

/// Massless candidate at (pt, eta, phi)
pub fn candidate(pt: f64, eta: f64, phi: f64) -> Candidate {
    let p = FourMomentum::from_pt_eta_phi(pt, eta, phi);
    Candidate {
        px: p.px,
        py: p.py,
        pz: p.pz,
        e: p.e,
    }
}

/// Final-state generator particle at (pt, eta, phi)
pub fn gen_particle(pt: f64, eta: f64, phi: f64) -> GenParticle {
    let p = FourMomentum::from_pt_eta_phi(pt, eta, phi);
    GenParticle {
        status: GenParticle::FINAL_STATE,
        px: p.px,
        py: p.py,
        pz: p.pz,
        e: p.e,
    }
}

pub fn trigger(name: &str, eta: f64, phi: f64) -> TriggerObject {
    TriggerObject {
        name: name.to_string(),
        eta,
        phi,
    }
}

/// Event with one particle-flow jet holding `constituents`
pub fn pf_event(constituents: Vec<Candidate>) -> EventInput {
    EventInput {
        pf_candidates: constituents.clone(),
        jets: vec![InputJet::Pf { constituents }],
        trigger_objects: Some(Vec::new()),
        gen_particles: None,
    }
}

/// Two hard collimated prongs plus soft wide-angle radiation
pub fn boosted_event(pt: f64) -> EventInput {
    pf_event(vec![
        candidate(0.55 * pt, 0.0, 1.0),
        candidate(0.35 * pt, 0.15, 1.1),
        candidate(0.05 * pt, 0.02, 1.01),
        candidate(0.02 * pt, 0.5, 1.4),
        candidate(0.03 * pt, -1.5, 4.0),
    ])
}

pub fn to_line(event: &EventInput) -> String {
    serde_json::to_string(event).unwrap()
}

/// Write events as JSON Lines to a temporary file
pub fn write_events(events: &[EventInput]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for event in events {
        writeln!(file, "{}", to_line(event)).unwrap();
    }
    file.flush().unwrap();
    file
}
