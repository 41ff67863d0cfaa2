use std::f64::consts::TAU;

/// Objects beyond this |η| share the outermost row of tiles
const TILED_ETA_LIMIT: f64 = 10.0;

/// Upper bound on tiles along either axis
const MAX_TILES_PER_AXIS: usize = 256;

/// Fixed (η, φ) grid of tiles at least R wide in both directions
///
/// Two objects closer than R always sit in the same or in adjacent tiles,
/// so nearest-neighbour searches only visit the 3×3 block around a tile.
/// φ wraps around; η is clamped into the outermost tiles.
#[derive(Debug, Clone)]
pub(super) struct Tiling {
    eta_min: f64,
    tile_eta: f64,
    n_eta: usize,
    tile_phi: f64,
    n_phi: usize,
    members: Vec<Vec<usize>>,
    neighbourhoods: Vec<Vec<usize>>,
}

impl Tiling {
    /// Tiles of side at least `r` spanning every finite η in `etas`
    pub(super) fn new(r: f64, etas: impl IntoIterator<Item = f64>) -> Self {
        let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
        for eta in etas.into_iter().filter(|eta| eta.is_finite()) {
            let eta = eta.clamp(-TILED_ETA_LIMIT, TILED_ETA_LIMIT);
            lo = lo.min(eta);
            hi = hi.max(eta);
        }
        if lo > hi {
            lo = 0.0;
            hi = 0.0;
        }

        let n_eta = axis_tiles(hi - lo, r);
        let n_phi = axis_tiles(TAU, r);

        let mut neighbourhoods = Vec::with_capacity(n_eta * n_phi);
        for ieta in 0..n_eta {
            for iphi in 0..n_phi {
                let mut around = Vec::with_capacity(9);
                for jeta in ieta.saturating_sub(1)..=(ieta + 1).min(n_eta - 1) {
                    for dphi in [n_phi - 1, 0, 1] {
                        around.push(jeta * n_phi + (iphi + dphi) % n_phi);
                    }
                }
                around.sort_unstable();
                around.dedup();
                neighbourhoods.push(around);
            }
        }

        Self {
            eta_min: lo,
            tile_eta: (hi - lo) / n_eta as f64,
            n_eta,
            tile_phi: TAU / n_phi as f64,
            n_phi,
            members: vec![Vec::new(); n_eta * n_phi],
            neighbourhoods,
        }
    }

    /// Tile holding direction (η, φ), φ in `[0, 2π)`
    pub(super) fn tile_of(&self, eta: f64, phi: f64) -> usize {
        let ieta = if self.n_eta == 1 {
            0
        } else {
            let eta = eta.clamp(-TILED_ETA_LIMIT, TILED_ETA_LIMIT);
            (((eta - self.eta_min) / self.tile_eta).floor().max(0.0) as usize).min(self.n_eta - 1)
        };
        let iphi = ((phi / self.tile_phi).floor().max(0.0) as usize).min(self.n_phi - 1);
        ieta * self.n_phi + iphi
    }

    pub(super) fn insert(&mut self, slot: usize, tile: usize) {
        self.members[tile].push(slot);
    }

    pub(super) fn remove(&mut self, slot: usize, tile: usize) {
        let members = &mut self.members[tile];
        if let Some(pos) = members.iter().position(|&s| s == slot) {
            members.swap_remove(pos);
        }
    }

    pub(super) fn members(&self, tile: usize) -> &[usize] {
        &self.members[tile]
    }

    /// The tile itself and its (up to eight) neighbours, ascending
    pub(super) fn neighbourhood(&self, tile: usize) -> &[usize] {
        &self.neighbourhoods[tile]
    }

    pub(super) fn n_tiles(&self) -> usize {
        self.members.len()
    }
}

/// Number of tiles of side >= `r` that fit into `span`
fn axis_tiles(span: f64, r: f64) -> usize {
    ((span / r).floor() as usize).clamp(1, MAX_TILES_PER_AXIS)
}
