use crate::kinematics::FourMomentum;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Transverse momentum carried by a ghost
pub const GHOST_PT: f64 = 1e-100;

/// Largest ghost grid a configuration may ask for
pub const MAX_GHOSTS: usize = 250_000;

/// Fraction of a grid cell by which ghost positions are jittered
const GRID_SCATTER: f64 = 1e-4;

/// Fractional spread of ghost transverse momenta
const PT_SCATTER: f64 = 0.1;

/// Active-area specification: a grid of ghosts over |η| < `ghost_eta_max`
///
/// # Example TOML
/// ```toml
/// [area]
/// enabled = true
/// ghost_area = 0.01
/// ghost_eta_max = 7.0
/// repeats = 1
/// seed = 12345
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GhostAreaSpec {
    /// Add ghosts and measure jet areas
    pub enabled: bool,
    /// Target area of one ghost cell
    pub ghost_area: f64,
    /// Ghosts cover |η| below this value
    pub ghost_eta_max: f64,
    /// Number of independent ghost layouts averaged per event
    pub repeats: u32,
    /// Seed for ghost jitter
    pub seed: u64,
}

impl Default for GhostAreaSpec {
    fn default() -> Self {
        Self {
            enabled: true,
            ghost_area: 0.01,
            ghost_eta_max: 7.0,
            repeats: 1,
            seed: 12345,
        }
    }
}

impl GhostAreaSpec {
    /// Specification with area measurement switched off
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Number of cells along η and φ
    pub fn grid(&self) -> (usize, usize) {
        let cell = self.ghost_area.sqrt();
        let n_eta = ((self.ghost_eta_max / cell).round() as usize).max(1).saturating_mul(2);
        let n_phi = ((TAU / cell).round() as usize).max(1);
        (n_eta, n_phi)
    }

    /// Area actually covered by one ghost after rounding the grid
    pub fn actual_ghost_area(&self) -> f64 {
        let (n_eta, n_phi) = self.grid();
        (2.0 * self.ghost_eta_max / n_eta as f64) * (TAU / n_phi as f64)
    }

    pub fn n_ghosts(&self) -> usize {
        let (n_eta, n_phi) = self.grid();
        n_eta.saturating_mul(n_phi)
    }

    /// Ghost four-momenta for one repeat, reproducible for a given seed
    pub fn ghosts(&self, repeat: u32) -> Vec<FourMomentum> {
        let (n_eta, n_phi) = self.grid();
        let deta = 2.0 * self.ghost_eta_max / n_eta as f64;
        let dphi = TAU / n_phi as f64;
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(u64::from(repeat)));

        let mut ghosts = Vec::with_capacity(n_eta * n_phi);
        for ieta in 0..n_eta {
            let eta_centre = -self.ghost_eta_max + (ieta as f64 + 0.5) * deta;
            for iphi in 0..n_phi {
                let phi_centre = (iphi as f64 + 0.5) * dphi;
                let eta = eta_centre + GRID_SCATTER * deta * rng.gen_range(-0.5..0.5);
                let phi = phi_centre + GRID_SCATTER * dphi * rng.gen_range(-0.5..0.5);
                let pt = GHOST_PT * (1.0 + PT_SCATTER * rng.gen_range(-0.5..0.5));
                ghosts.push(FourMomentum::from_pt_eta_phi(pt, eta, phi));
            }
        }
        ghosts
    }
}
