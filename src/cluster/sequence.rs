use super::tiling::Tiling;
use crate::collector::Particle;
use crate::kinematics::{Direction, FourMomentum};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::f64::consts::{PI, TAU};

/// Sentinel for "no nearest neighbour"
const NO_NEIGHBOUR: usize = usize::MAX;

/// What a history node stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Input particle, by position in the particle list
    Particle(usize),
    /// Ghost added for area measurement
    Ghost,
    /// Recombination of two earlier nodes
    Merge { left: usize, right: usize },
}

/// One entry of the clustering history arena
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterNode {
    pub momentum: FourMomentum,
    pub kind: NodeKind,
    /// Number of ghost leaves below this node
    pub ghost_count: usize,
    /// Number of particle leaves below this node
    pub particle_count: usize,
}

impl ClusterNode {
    pub fn is_leaf(&self) -> bool {
        !matches!(self.kind, NodeKind::Merge { .. })
    }

    pub fn children(&self) -> Option<(usize, usize)> {
        match self.kind {
            NodeKind::Merge { left, right } => Some((left, right)),
            _ => None,
        }
    }

    pub fn is_pure_ghost(&self) -> bool {
        self.particle_count == 0
    }
}

/// Cached geometry of a node that is still active in the clustering
#[derive(Debug, Clone, Copy)]
struct Brief {
    node: usize,
    eta: f64,
    phi: f64,
    tile: usize,
    nn: usize,
    nn_dist: f64,
    /// Bumped whenever `nn` changes, so queued candidates can go stale
    generation: u64,
    active: bool,
}

impl Brief {
    fn new(node: usize, momentum: &FourMomentum) -> Self {
        let Direction { eta, phi } = momentum.direction();
        Self {
            node,
            eta,
            phi,
            tile: 0,
            nn: NO_NEIGHBOUR,
            nn_dist: f64::INFINITY,
            generation: 0,
            active: true,
        }
    }

    fn distance(&self, other: &Brief) -> f64 {
        let deta = self.eta - other.eta;
        let mut dphi = (self.phi - other.phi).abs();
        if dphi > PI {
            dphi = TAU - dphi;
        }
        deta * deta + dphi * dphi
    }
}

/// Queued closest pair, ordered so the heap pops the smallest distance
#[derive(Debug, Clone, Copy)]
struct Candidate {
    dist: f64,
    slot: usize,
    generation: u64,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.slot.cmp(&self.slot))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

/// Active nodes, their tiles and the queue of mergeable pairs
struct Neighbours {
    briefs: Vec<Brief>,
    tiling: Tiling,
    queue: BinaryHeap<Candidate>,
    r2: f64,
}

impl Neighbours {
    fn new(nodes: &[ClusterNode], r: f64) -> Self {
        let mut briefs: Vec<Brief> = nodes
            .iter()
            .enumerate()
            .map(|(id, node)| Brief::new(id, &node.momentum))
            .collect();
        let mut tiling = Tiling::new(r, briefs.iter().map(|b| b.eta));
        for (slot, brief) in briefs.iter_mut().enumerate() {
            brief.tile = tiling.tile_of(brief.eta, brief.phi);
            tiling.insert(slot, brief.tile);
        }

        let mut neighbours = Self {
            briefs,
            tiling,
            queue: BinaryHeap::new(),
            r2: r * r,
        };
        for slot in 0..neighbours.briefs.len() {
            neighbours.rescan(slot);
        }
        neighbours
    }

    /// Record `nn` as the closest partner of `slot`
    fn set_neighbour(&mut self, slot: usize, nn: usize, nn_dist: f64) {
        let brief = &mut self.briefs[slot];
        brief.nn = nn;
        brief.nn_dist = nn_dist;
        brief.generation += 1;
        if nn_dist < self.r2 {
            self.queue.push(Candidate {
                dist: nn_dist,
                slot,
                generation: brief.generation,
            });
        }
    }

    /// Closest partner of `slot` among the surrounding tiles
    fn rescan(&mut self, slot: usize) {
        let brief = self.briefs[slot];
        let mut nn = NO_NEIGHBOUR;
        let mut nn_dist = f64::INFINITY;
        for &tile in self.tiling.neighbourhood(brief.tile) {
            for &other in self.tiling.members(tile) {
                if other == slot {
                    continue;
                }
                let d = brief.distance(&self.briefs[other]);
                if d < nn_dist {
                    nn_dist = d;
                    nn = other;
                }
            }
        }
        self.set_neighbour(slot, nn, nn_dist);
    }

    /// Closest live pair below R², as (slot, partner slot)
    fn pop_pair(&mut self) -> Option<(usize, usize)> {
        while let Some(candidate) = self.queue.pop() {
            let brief = self.briefs[candidate.slot];
            if !brief.active || brief.generation != candidate.generation {
                continue;
            }
            if self.briefs.get(brief.nn).is_some_and(|partner| partner.active) {
                return Some((candidate.slot, brief.nn));
            }
            self.rescan(candidate.slot);
        }
        None
    }

    /// Replace slots `a` and `b` by `node`, which takes over slot `a`
    fn replace(&mut self, a: usize, b: usize, node: usize, momentum: &FourMomentum) {
        let old_tiles = [self.briefs[a].tile, self.briefs[b].tile];
        self.tiling.remove(a, old_tiles[0]);
        self.tiling.remove(b, old_tiles[1]);
        self.briefs[b].active = false;

        let mut merged = Brief::new(node, momentum);
        merged.tile = self.tiling.tile_of(merged.eta, merged.phi);
        // Invalidates everything still queued for slot a
        merged.generation = self.briefs[a].generation + 1;
        self.briefs[a] = merged;
        self.tiling.insert(a, merged.tile);

        // Anyone that pointed at either half lives next to one of them
        let mut tiles: Vec<usize> = old_tiles
            .iter()
            .flat_map(|&t| self.tiling.neighbourhood(t).iter().copied())
            .collect();
        tiles.sort_unstable();
        tiles.dedup();
        let mut stale = Vec::new();
        for tile in tiles {
            stale.extend(
                self.tiling
                    .members(tile)
                    .iter()
                    .copied()
                    .filter(|&k| self.briefs[k].nn == a || self.briefs[k].nn == b),
            );
        }
        for k in stale {
            self.rescan(k);
        }

        // The new node may now be the closest partner of anyone around it
        let mut nn = NO_NEIGHBOUR;
        let mut nn_dist = f64::INFINITY;
        let mut closer = Vec::new();
        for &tile in self.tiling.neighbourhood(merged.tile) {
            for &k in self.tiling.members(tile) {
                if k == a {
                    continue;
                }
                let d = merged.distance(&self.briefs[k]);
                if d < nn_dist {
                    nn_dist = d;
                    nn = k;
                }
                if d < self.briefs[k].nn_dist {
                    closer.push((k, d));
                }
            }
        }
        for (k, d) in closer {
            self.set_neighbour(k, a, d);
        }
        self.set_neighbour(a, nn, nn_dist);
    }

    /// History nodes that are still active
    fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.briefs.iter().filter(|b| b.active).map(|b| b.node)
    }
}

/// Cambridge/Aachen clustering history for one event
///
/// Nodes live in a flat arena: input particles first (node id = particle
/// index), then ghosts, then recombinations in the order they happened.
/// Children are referenced by arena index.
#[derive(Debug, Clone)]
pub struct ClusterSequence {
    nodes: Vec<ClusterNode>,
    n_particles: usize,
    jet_roots: Vec<usize>,
}

impl ClusterSequence {
    /// Run the clustering with cone size `r` over particles plus ghosts
    pub fn run(particles: &[Particle], ghosts: &[FourMomentum], r: f64) -> Self {
        let mut nodes = Vec::with_capacity(2 * (particles.len() + ghosts.len()));
        nodes.extend(particles.iter().enumerate().map(|(i, p)| ClusterNode {
            momentum: p.momentum,
            kind: NodeKind::Particle(i),
            ghost_count: 0,
            particle_count: 1,
        }));
        nodes.extend(ghosts.iter().map(|g| ClusterNode {
            momentum: *g,
            kind: NodeKind::Ghost,
            ghost_count: 1,
            particle_count: 0,
        }));

        let mut sequence = Self {
            nodes,
            n_particles: particles.len(),
            jet_roots: Vec::new(),
        };
        sequence.recombine(r);
        sequence
    }

    /// Nearest-neighbour recombination loop
    ///
    /// Distances are kept as ΔR²; a pair is merged while ΔR² < R², which is
    /// the same as d_ij = ΔR²/R² < 1. Only pairs closer than R are ever
    /// queued, so an empty queue means every remaining node is a jet.
    fn recombine(&mut self, r: f64) {
        let mut neighbours = Neighbours::new(&self.nodes, r);
        tracing::trace!(
            nodes = self.nodes.len(),
            tiles = neighbours.tiling.n_tiles(),
            "tiled clustering"
        );

        while let Some((a, b)) = neighbours.pop_pair() {
            let (a, b) = (a.min(b), a.max(b));
            let merged = self.merge(neighbours.briefs[a].node, neighbours.briefs[b].node);
            let momentum = self.nodes[merged].momentum;
            neighbours.replace(a, b, merged, &momentum);
        }

        self.jet_roots.extend(neighbours.roots());
    }

    fn merge(&mut self, left: usize, right: usize) -> usize {
        let (l, r) = (&self.nodes[left], &self.nodes[right]);
        let node = ClusterNode {
            momentum: l.momentum + r.momentum,
            kind: NodeKind::Merge { left, right },
            ghost_count: l.ghost_count + r.ghost_count,
            particle_count: l.particle_count + r.particle_count,
        };
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn nodes(&self) -> &[ClusterNode] {
        &self.nodes
    }

    pub fn node(&self, id: usize) -> &ClusterNode {
        &self.nodes[id]
    }

    /// Number of real particles that entered the clustering
    pub fn n_particles(&self) -> usize {
        self.n_particles
    }

    /// History roots of every final jet, ghost-only ones included
    pub fn jet_roots(&self) -> &[usize] {
        &self.jet_roots
    }

    /// Visit the leaves below `root`
    pub fn for_each_leaf(&self, root: usize, mut visit: impl FnMut(usize, &ClusterNode)) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            match node.kind {
                NodeKind::Merge { left, right } => {
                    stack.push(right);
                    stack.push(left);
                }
                _ => visit(id, node),
            }
        }
    }

    /// Particle indices below `root`, ascending
    pub fn constituents(&self, root: usize) -> Vec<usize> {
        let mut indices = Vec::with_capacity(self.nodes[root].particle_count);
        self.for_each_leaf(root, |_, node| {
            if let NodeKind::Particle(i) = node.kind {
                indices.push(i);
            }
        });
        indices.sort_unstable();
        indices
    }
}
