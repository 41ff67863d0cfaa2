use super::area::GhostAreaSpec;
use super::sequence::ClusterSequence;
use crate::collector::Particle;
use crate::kinematics::FourMomentum;
use std::collections::HashMap;

/// A final jet, detached from the history it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Jet {
    pub momentum: FourMomentum,
    /// Catchment area, when ghosts were used
    pub area: Option<f64>,
    /// Indices into the clustered particle list, ascending
    pub constituents: Vec<usize>,
    /// Root of this jet in the sequence that produced it
    pub history_index: usize,
}

impl Jet {
    pub fn pt(&self) -> f64 {
        self.momentum.pt()
    }
}

/// Cambridge/Aachen jet definition with optional active area
#[derive(Debug, Clone, PartialEq)]
pub struct JetDefinition {
    /// Cone size R
    pub cone_size: f64,
    pub area: GhostAreaSpec,
}

impl JetDefinition {
    pub fn new(cone_size: f64, area: GhostAreaSpec) -> Self {
        Self { cone_size, area }
    }

    /// Cluster `particles`, returning the history and its jets sorted by pt
    ///
    /// Ghost-only jets are dropped. With several area repeats the history of
    /// the first repeat is kept and jet areas are averaged over all repeats.
    pub fn cluster(&self, particles: &[Particle]) -> (ClusterSequence, Vec<Jet>) {
        if particles.is_empty() || !self.area.enabled {
            let sequence = ClusterSequence::run(particles, &[], self.cone_size);
            let jets = extract_jets(&sequence, None);
            return (sequence, jets);
        }

        let cell_area = self.area.actual_ghost_area();
        let sequence = ClusterSequence::run(particles, &self.area.ghosts(0), self.cone_size);
        let mut jets = extract_jets(&sequence, Some(cell_area));

        let repeats = self.area.repeats.max(1);
        if repeats > 1 {
            let mut ghost_totals: HashMap<usize, usize> = sequence
                .jet_roots()
                .iter()
                .filter_map(|&root| keyed_ghost_count(&sequence, root))
                .collect();

            for repeat in 1..repeats {
                let rerun =
                    ClusterSequence::run(particles, &self.area.ghosts(repeat), self.cone_size);
                for &root in rerun.jet_roots() {
                    if let Some((key, ghosts)) = keyed_ghost_count(&rerun, root) {
                        *ghost_totals.entry(key).or_default() += ghosts;
                    }
                }
            }

            for jet in &mut jets {
                if let Some(&total) = jet.constituents.first().and_then(|k| ghost_totals.get(k)) {
                    jet.area = Some(total as f64 * cell_area / f64::from(repeats));
                }
            }
        }

        tracing::trace!(
            particles = particles.len(),
            ghosts = self.area.n_ghosts(),
            jets = jets.len(),
            "clustered event"
        );
        (sequence, jets)
    }
}

/// Jets keyed by their lowest particle index, with their ghost count
fn keyed_ghost_count(sequence: &ClusterSequence, root: usize) -> Option<(usize, usize)> {
    let node = sequence.node(root);
    if node.is_pure_ghost() {
        return None;
    }
    sequence
        .constituents(root)
        .first()
        .map(|&key| (key, node.ghost_count))
}

fn extract_jets(sequence: &ClusterSequence, cell_area: Option<f64>) -> Vec<Jet> {
    let mut jets: Vec<Jet> = sequence
        .jet_roots()
        .iter()
        .map(|&root| (root, sequence.node(root)))
        .filter(|(_, node)| !node.is_pure_ghost())
        .map(|(root, node)| Jet {
            momentum: node.momentum,
            area: cell_area.map(|a| node.ghost_count as f64 * a),
            constituents: sequence.constituents(root),
            history_index: root,
        })
        .collect();

    jets.sort_by(|a, b| b.momentum.pt2().total_cmp(&a.momentum.pt2()));
    jets
}
