//! N-subjettiness (τ_N) with one-pass kt axes
//!
//! τ_N = Σ_i pt_i · min_J ΔR(i, J)^κ / Σ_i pt_i · R0^κ
//!
//! Axes are seeded by exclusive kt clustering of the constituents down to N
//! groups and then refined by alternating nearest-axis assignment with
//! pt-weighted axis updates. The lowest numerator seen wins.

use crate::kinematics::{delta_phi, normalize_phi, Direction, FourMomentum};
use std::f64::consts::{PI, TAU};

/// Sentinel for "no nearest neighbour" in the seeding step
const NO_NEIGHBOUR: usize = usize::MAX;

/// Default cap on axis refinement passes
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// τ_N calculator for one jet radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nsubjettiness {
    /// Angular exponent κ
    pub kappa: f64,
    /// Characteristic jet radius R0
    pub r0: f64,
    /// Refinement pass cap
    pub max_iterations: usize,
    /// Cap on the per-particle distance, none by default
    pub r_cutoff: Option<f64>,
}

impl Nsubjettiness {
    pub fn new(kappa: f64, r0: f64) -> Self {
        Self {
            kappa,
            r0,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            r_cutoff: None,
        }
    }

    /// τ_N of a set of constituents
    ///
    /// Asking for more axes than there are constituents leaves nothing to
    /// resolve and yields 0.
    pub fn tau(&self, constituents: &[FourMomentum], n: usize) -> f64 {
        if n == 0 || n > constituents.len() {
            tracing::debug!(
                n,
                constituents = constituents.len(),
                "degenerate axis set, tau set to 0"
            );
            return 0.0;
        }

        let norm: f64 = constituents.iter().map(|p| p.pt()).sum::<f64>() * self.r0.powf(self.kappa);
        if norm <= 0.0 {
            return 0.0;
        }

        let (numerator, _) = self.minimize(constituents, n);
        numerator / norm
    }

    /// Axes minimizing the weighted angular sum
    pub fn axes(&self, constituents: &[FourMomentum], n: usize) -> Vec<Direction> {
        if n == 0 || n > constituents.len() {
            return Vec::new();
        }
        self.minimize(constituents, n).1
    }

    fn minimize(&self, constituents: &[FourMomentum], n: usize) -> (f64, Vec<Direction>) {
        let points: Vec<(f64, Direction)> = constituents
            .iter()
            .map(|p| (p.pt(), p.direction()))
            .collect();

        let mut axes: Vec<Direction> = kt_seed_axes(constituents, n)
            .iter()
            .map(FourMomentum::direction)
            .collect();
        let mut best = (self.numerator(&points, &axes), axes.clone());

        let mut assignment = vec![NO_NEIGHBOUR; points.len()];
        for _ in 0..self.max_iterations {
            let next: Vec<usize> = points.iter().map(|(_, d)| nearest(d, &axes).0).collect();
            if next == assignment {
                break;
            }
            assignment = next;

            for (k, axis) in axes.iter_mut().enumerate() {
                let mut weight = 0.0;
                let mut eta = 0.0;
                let mut dphi = 0.0;
                for (point, &owner) in points.iter().zip(&assignment) {
                    if owner != k {
                        continue;
                    }
                    let (pt, dir) = *point;
                    weight += pt;
                    eta += pt * dir.eta;
                    dphi += pt * delta_phi(dir.phi, axis.phi);
                }
                if weight > 0.0 {
                    *axis = Direction::new(eta / weight, normalize_phi(axis.phi + dphi / weight));
                }
            }

            let numerator = self.numerator(&points, &axes);
            if numerator < best.0 {
                best = (numerator, axes.clone());
            }
        }

        best
    }

    fn numerator(&self, points: &[(f64, Direction)], axes: &[Direction]) -> f64 {
        let cap = self.r_cutoff.map(|r| r * r);
        points
            .iter()
            .map(|(pt, dir)| {
                let mut dr2 = nearest(dir, axes).1;
                if let Some(cap) = cap {
                    dr2 = dr2.min(cap);
                }
                pt * dr2.powf(0.5 * self.kappa)
            })
            .sum()
    }
}

/// τ_a / τ_b, 0 when τ_b vanishes
pub fn tau_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Index of and squared distance to the closest axis
fn nearest(dir: &Direction, axes: &[Direction]) -> (usize, f64) {
    axes.iter()
        .enumerate()
        .map(|(k, axis)| (k, dir.delta_r2(axis)))
        .fold((NO_NEIGHBOUR, f64::INFINITY), |best, cur| {
            if cur.1 < best.1 {
                cur
            } else {
                best
            }
        })
}

/// Exclusive kt clustering down to exactly `n` groups
///
/// Uses d_ij = min(pt_i², pt_j²)·ΔR_ij² with no beam distance, so groups
/// only ever merge with each other.
fn kt_seed_axes(constituents: &[FourMomentum], n: usize) -> Vec<FourMomentum> {
    struct Group {
        momentum: FourMomentum,
        pt2: f64,
        eta: f64,
        phi: f64,
        nn: usize,
        nn_dist: f64,
    }

    impl Group {
        fn new(momentum: FourMomentum) -> Self {
            let Direction { eta, phi } = momentum.direction();
            Self {
                momentum,
                pt2: momentum.pt2(),
                eta,
                phi,
                nn: NO_NEIGHBOUR,
                nn_dist: f64::INFINITY,
            }
        }

        fn distance(&self, other: &Group) -> f64 {
            let deta = self.eta - other.eta;
            let mut dphi = (self.phi - other.phi).abs();
            if dphi > PI {
                dphi = TAU - dphi;
            }
            let d = self.pt2.min(other.pt2) * (deta * deta + dphi * dphi);
            // inf·0 from an overflowing pt²
            if d.is_nan() {
                f64::INFINITY
            } else {
                d
            }
        }
    }

    fn rescan(groups: &mut [Group], k: usize) {
        let mut nn = NO_NEIGHBOUR;
        let mut nn_dist = f64::INFINITY;
        for (m, other) in groups.iter().enumerate() {
            if m == k {
                continue;
            }
            // Any partner beats none, even at infinite distance
            let d = groups[k].distance(other);
            if nn == NO_NEIGHBOUR || d.total_cmp(&nn_dist).is_lt() {
                nn_dist = d;
                nn = m;
            }
        }
        groups[k].nn = nn;
        groups[k].nn_dist = nn_dist;
    }

    let mut groups: Vec<Group> = constituents.iter().copied().map(Group::new).collect();
    for k in 0..groups.len() {
        rescan(&mut groups, k);
    }

    while groups.len() > n {
        let mut a = 0;
        for (k, group) in groups.iter().enumerate() {
            if group.nn_dist.total_cmp(&groups[a].nn_dist).is_lt() {
                a = k;
            }
        }
        let mut b = groups[a].nn;
        if b >= groups.len() || b == a {
            b = if a == 0 { 1 } else { 0 };
        }
        if b < a {
            std::mem::swap(&mut a, &mut b);
        }

        groups[a] = Group::new(groups[a].momentum + groups[b].momentum);
        let last = groups.len() - 1;
        groups.swap_remove(b);

        let mut stale = vec![a];
        for (k, group) in groups.iter_mut().enumerate() {
            if k == a {
                continue;
            }
            if group.nn == a || group.nn == b {
                stale.push(k);
            } else if group.nn == last {
                group.nn = b;
            }
        }
        // The new group may now be the closest partner of anyone
        for k in 0..groups.len() {
            if k != a && !stale.contains(&k) {
                let d = groups[k].distance(&groups[a]);
                if d.total_cmp(&groups[k].nn_dist).is_lt() {
                    groups[k].nn_dist = d;
                    groups[k].nn = a;
                }
            }
        }
        for k in stale {
            rescan(&mut groups, k);
        }
    }

    groups.into_iter().map(|g| g.momentum).collect()
}
