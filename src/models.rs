//! Example inductance and resistance curves.
//!
//! Both models share a saturation shape: constant `a/b` below the knee `c`,
//! then a `sech²` roll-off of width `b`:
//!
//! ```text
//! s(i) = a/b                          i <  c
//! s(i) = a/b * (1 - tanh((i-c)/b)^2)  i >= c
//! ```
//!
//! Integrating L(i) over current gives the flux linkage Φ(i); integrating
//! R(i) gives the resistive voltage U_r(i). Both are then compiled into
//! piecewise functions.

use std::f64::consts::PI;

/// A scalar characteristic of current.
pub trait CurveModel {
    /// Evaluate the model at current `i`.
    fn value(&self, i: f64) -> f64;

    /// Evaluate the model at every current in `currents`.
    fn sample(&self, currents: &[f64]) -> Vec<f64> {
        currents.iter().map(|&i| self.value(i)).collect()
    }
}

fn saturation(i: f64, a: f64, b: f64, c: f64) -> f64 {
    if i < c {
        a / b
    } else {
        let t = ((i - c) / b).tanh();
        (a / b) * (1.0 - t * t)
    }
}

/// Saturating inductance L(i) in henries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InductanceModel {
    pub a: f64,
    pub b: f64,
    /// Saturation knee (A)
    pub c: f64,
    /// Residual inductance in deep saturation (H)
    pub d: f64,
}

impl Default for InductanceModel {
    fn default() -> Self {
        Self {
            a: 1e-4,
            b: 40.0,
            c: 170.0,
            d: 1e-7,
        }
    }
}

impl CurveModel for InductanceModel {
    fn value(&self, i: f64) -> f64 {
        saturation(i, self.a, self.b, self.c) + self.d
    }
}

/// Loss resistance R(i) in ohms, with a Gaussian bump around `mu`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResistanceModel {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub sigma: f64,
    pub amp: f64,
    pub mu: f64,
    pub r0: f64,
}

impl Default for ResistanceModel {
    fn default() -> Self {
        Self {
            a: 7.0,
            b: 110.0,
            c: 190.0,
            sigma: 40.0,
            amp: 50.0,
            mu: 185.0,
            r0: 3e-5,
        }
    }
}

impl CurveModel for ResistanceModel {
    fn value(&self, i: f64) -> f64 {
        let base = saturation(i, self.a, self.b, self.c);
        let z = (i - self.mu) / self.sigma;
        let bump = base * self.amp / ((2.0 * PI).sqrt() * self.sigma) * (-0.5 * z * z).exp();
        1.0 / (base + bump + self.r0)
    }
}

/// Current grid of the bundled example, 0 to 800 A, denser around the knee.
pub const DEMO_CURRENTS: [f64; 32] = [
    0.0, 6.2, 12.4, 27.9, 52.8, 80.7, 96.2, 114.9, 133.5, 155.2, 166.3, 174.5, 186.3, 191.7,
    200.4, 204.0, 208.0, 210.0, 212.0, 217.3, 222.0, 227.5, 248.4, 279.4, 310.4, 341.5, 372.5,
    403.6, 434.7, 496.7, 620.9, 800.0,
];

/// Running trapezoid integral of `ys` over `xs`, starting at 0.
///
/// The result has the same length as the inputs; extra entries of the
/// longer slice are ignored.
pub fn cumulative_trapezoid(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len().min(ys.len());
    let mut out = Vec::with_capacity(n);
    if n == 0 {
        return out;
    }
    out.push(0.0);
    let mut total = 0.0;
    for k in 1..n {
        total += 0.5 * (xs[k] - xs[k - 1]) * (ys[k] + ys[k - 1]);
        out.push(total);
    }
    out
}
