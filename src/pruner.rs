//! Jet pruning on the clustering history
//!
//! Walks a jet's history top-down. At each recombination the softer branch
//! is dropped when it is both soft (z < z_cut) and wide (ΔR > R_cut), where
//! R_cut = R_cut_factor · 2m/pt of the unpruned jet.

use crate::cluster::{ClusterSequence, GhostAreaSpec, Jet, NodeKind};
use crate::kinematics::FourMomentum;
use serde::{Deserialize, Serialize};

/// Pruning thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pruner {
    /// Minimum pt fraction of the softer branch
    pub z_cut: f64,
    /// Scale factor on 2m/pt for the angular threshold
    pub r_cut_factor: f64,
}

impl Default for Pruner {
    fn default() -> Self {
        Self {
            z_cut: 0.1,
            r_cut_factor: 0.5,
        }
    }
}

/// Jet after pruning
#[derive(Debug, Clone, PartialEq)]
pub struct PrunedJet {
    /// Sum of the retained leaves
    pub momentum: FourMomentum,
    /// Retained particle indices, ascending
    pub constituents: Vec<usize>,
    /// Area of the retained ghosts, when ghosts were used
    pub area: Option<f64>,
    /// Number of branches removed
    pub pruned_branches: usize,
}

impl PrunedJet {
    pub fn pt(&self) -> f64 {
        self.momentum.pt()
    }
}

impl Pruner {
    pub fn new(z_cut: f64, r_cut_factor: f64) -> Self {
        Self {
            z_cut,
            r_cut_factor,
        }
    }

    /// Angular threshold for a jet
    pub fn r_cut(&self, jet: &FourMomentum) -> f64 {
        let pt = jet.pt();
        if pt == 0.0 {
            return 0.0;
        }
        self.r_cut_factor * 2.0 * jet.m() / pt
    }

    /// Prune `jet`, which must come from `sequence`
    pub fn prune(&self, sequence: &ClusterSequence, jet: &Jet, spec: &GhostAreaSpec) -> PrunedJet {
        let root = sequence.node(jet.history_index);
        let r_cut = self.r_cut(&root.momentum);

        let mut momentum = FourMomentum::default();
        let mut constituents = Vec::with_capacity(jet.constituents.len());
        let mut ghosts = 0usize;
        let mut pruned_branches = 0usize;

        let mut stack = vec![jet.history_index];
        while let Some(id) = stack.pop() {
            let node = sequence.node(id);
            match node.kind {
                NodeKind::Particle(index) => {
                    momentum += node.momentum;
                    constituents.push(index);
                }
                NodeKind::Ghost => {
                    momentum += node.momentum;
                    ghosts += 1;
                }
                NodeKind::Merge { left, right } => {
                    let (hard, soft) = if sequence.node(left).momentum.pt2()
                        >= sequence.node(right).momentum.pt2()
                    {
                        (left, right)
                    } else {
                        (right, left)
                    };
                    let a = &sequence.node(hard).momentum;
                    let b = &sequence.node(soft).momentum;

                    let pt_sum = a.pt() + b.pt();
                    let z = if pt_sum > 0.0 { b.pt() / pt_sum } else { 0.0 };

                    stack.push(hard);
                    if z < self.z_cut && a.delta_r(b) > r_cut {
                        pruned_branches += 1;
                    } else {
                        stack.push(soft);
                    }
                }
            }
        }

        constituents.sort_unstable();
        let area = jet.area.map(|_| ghosts as f64 * spec.actual_ghost_area());

        PrunedJet {
            momentum,
            constituents,
            area,
            pruned_branches,
        }
    }
}
