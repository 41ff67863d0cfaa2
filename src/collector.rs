//! Particle collection from reconstructed and generator-level inputs

use crate::event::{GenParticle, InputJet};
use crate::kinematics::FourMomentum;
use thiserror::Error;

/// A four-momentum tagged with its position in the source collection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub momentum: FourMomentum,
    pub source_index: usize,
}

impl Particle {
    pub fn new(momentum: FourMomentum, source_index: usize) -> Self {
        Self {
            momentum,
            source_index,
        }
    }
}

/// Errors raised while building the particle list
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectError {
    #[error("input jet {index} is a {kind} jet, expected a particle-flow jet")]
    UnexpectedKind { index: usize, kind: &'static str },

    #[error("{collection} entry {index} has a non-finite momentum")]
    NonFinite {
        collection: &'static str,
        index: usize,
    },
}

fn checked(
    momentum: FourMomentum,
    collection: &'static str,
    index: usize,
) -> Result<FourMomentum, CollectError> {
    if momentum.is_finite() {
        Ok(momentum)
    } else {
        Err(CollectError::NonFinite { collection, index })
    }
}

/// Collect particle-flow constituents of the first `max_jets` input jets
///
/// Constituents keep their position inside their jet as source index. The
/// first jet that is not a particle-flow jet, or a constituent whose
/// momentum overflows, aborts collection for the event.
pub fn collect_candidates(
    jets: &[InputJet],
    max_jets: usize,
) -> Result<Vec<Particle>, CollectError> {
    let mut particles = Vec::new();

    for (index, jet) in jets.iter().take(max_jets).enumerate() {
        match jet {
            InputJet::Pf { constituents } => {
                for (j, cand) in constituents.iter().enumerate() {
                    let momentum = checked(cand.momentum(), "constituent", j)?;
                    particles.push(Particle::new(momentum, j));
                }
            }
            other => {
                return Err(CollectError::UnexpectedKind {
                    index,
                    kind: other.kind(),
                })
            }
        }
    }

    Ok(particles)
}

/// Collect final-state generator particles
///
/// Source index is the position in the full generator collection, so
/// skipped intermediate particles leave gaps.
pub fn collect_generator(particles: &[GenParticle]) -> Result<Vec<Particle>, CollectError> {
    particles
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_final_state())
        .map(|(i, p)| Ok(Particle::new(checked(p.momentum(), "generator particle", i)?, i)))
        .collect()
}
