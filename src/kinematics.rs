//! Four-momentum arithmetic and angular distances
//!
//! Conventions follow the usual collider ones: φ is reported in `[0, 2π)`,
//! azimuthal differences are wrapped to `(-π, π]`, and the angular distance
//! is ΔR² = Δη² + Δφ² using pseudorapidity.

use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Pseudorapidity reported for objects with zero transverse momentum
pub const MAX_RAPIDITY: f64 = 1e5;

/// Four-momentum in natural units (c = 1)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FourMomentum {
    pub px: f64,
    pub py: f64,
    pub pz: f64,
    pub e: f64,
}

impl FourMomentum {
    pub fn new(px: f64, py: f64, pz: f64, e: f64) -> Self {
        Self { px, py, pz, e }
    }

    /// Massless four-momentum pointing at (η, φ) with the given pt
    pub fn from_pt_eta_phi(pt: f64, eta: f64, phi: f64) -> Self {
        Self {
            px: pt * phi.cos(),
            py: pt * phi.sin(),
            pz: pt * eta.sinh(),
            e: pt * eta.cosh(),
        }
    }

    pub fn pt2(&self) -> f64 {
        self.px * self.px + self.py * self.py
    }

    pub fn pt(&self) -> f64 {
        self.pt2().sqrt()
    }

    /// Components and their squares are all finite
    ///
    /// Momenta around 1e154 and above overflow pt², E² or m² to infinity.
    pub fn is_finite(&self) -> bool {
        self.e * self.e + self.pt2() + self.pz * self.pz < f64::INFINITY
    }

    /// Magnitude of the three-momentum
    pub fn p(&self) -> f64 {
        (self.pt2() + self.pz * self.pz).sqrt()
    }

    /// Invariant mass squared: m² = E² - |p|²
    pub fn m2(&self) -> f64 {
        self.e * self.e - self.pt2() - self.pz * self.pz
    }

    /// Invariant mass, 0 for (rounding-induced) spacelike vectors
    pub fn m(&self) -> f64 {
        let m2 = self.m2();
        if m2 > 0.0 {
            m2.sqrt()
        } else {
            0.0
        }
    }

    /// Azimuth in `[0, 2π)`
    pub fn phi(&self) -> f64 {
        if self.px == 0.0 && self.py == 0.0 {
            return 0.0;
        }
        let phi = self.py.atan2(self.px);
        if phi < 0.0 {
            phi + TAU
        } else {
            phi
        }
    }

    /// Pseudorapidity η = asinh(pz / pt)
    pub fn eta(&self) -> f64 {
        let pt = self.pt();
        if pt == 0.0 {
            return if self.pz >= 0.0 {
                MAX_RAPIDITY
            } else {
                -MAX_RAPIDITY
            };
        }
        (self.pz / pt).asinh()
    }

    /// Rapidity y = ½ ln((E + pz) / (E - pz))
    pub fn rapidity(&self) -> f64 {
        let plus = self.e + self.pz;
        let minus = self.e - self.pz;
        if minus <= 0.0 {
            MAX_RAPIDITY
        } else if plus <= 0.0 {
            -MAX_RAPIDITY
        } else {
            0.5 * (plus / minus).ln()
        }
    }

    /// Direction of this momentum in the (η, φ) plane
    pub fn direction(&self) -> Direction {
        Direction {
            eta: self.eta(),
            phi: self.phi(),
        }
    }

    /// Squared angular distance to another momentum
    pub fn delta_r2(&self, other: &FourMomentum) -> f64 {
        self.direction().delta_r2(&other.direction())
    }

    pub fn delta_r(&self, other: &FourMomentum) -> f64 {
        self.delta_r2(other).sqrt()
    }
}

impl Add for FourMomentum {
    type Output = FourMomentum;

    fn add(self, rhs: FourMomentum) -> FourMomentum {
        FourMomentum {
            px: self.px + rhs.px,
            py: self.py + rhs.py,
            pz: self.pz + rhs.pz,
            e: self.e + rhs.e,
        }
    }
}

impl AddAssign for FourMomentum {
    fn add_assign(&mut self, rhs: FourMomentum) {
        *self = *self + rhs;
    }
}

impl Sum for FourMomentum {
    fn sum<I: Iterator<Item = FourMomentum>>(iter: I) -> Self {
        iter.fold(FourMomentum::default(), Add::add)
    }
}

impl<'a> Sum<&'a FourMomentum> for FourMomentum {
    fn sum<I: Iterator<Item = &'a FourMomentum>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// A point in the (η, φ) plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Direction {
    pub eta: f64,
    pub phi: f64,
}

impl Direction {
    pub fn new(eta: f64, phi: f64) -> Self {
        Self { eta, phi }
    }

    pub fn delta_r2(&self, other: &Direction) -> f64 {
        let deta = self.eta - other.eta;
        let dphi = delta_phi(self.phi, other.phi);
        deta * deta + dphi * dphi
    }

    pub fn delta_r(&self, other: &Direction) -> f64 {
        self.delta_r2(other).sqrt()
    }
}

/// Azimuthal difference `a - b` wrapped to `(-π, π]`
pub fn delta_phi(a: f64, b: f64) -> f64 {
    let mut d = (a - b) % TAU;
    if d > PI {
        d -= TAU;
    } else if d <= -PI {
        d += TAU;
    }
    d
}

/// Azimuth folded back into `[0, 2π)`
pub fn normalize_phi(phi: f64) -> f64 {
    let wrapped = phi.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}
