//! Piecewise polynomial fitting.
//!
//! Each segment between consecutive breakpoints gets one [`Piece`]:
//!
//! - linear pieces are the two-point line `a*x + b` in absolute x;
//! - cubic pieces come from a not-a-knot cubic spline fitted over all
//!   samples jointly and are stored in powers of `(x - x_i)`.
//!
//! # Cubic spline system
//!
//! The second derivatives (moments) `m[0..=n]` at the knots satisfy the C²
//! continuity equations for every interior knot:
//!
//! ```text
//! h[i-1]*m[i-1] + 2*(h[i-1]+h[i])*m[i] + h[i]*m[i+1]
//!     = 6*((y[i+1]-y[i])/h[i] - (y[i]-y[i-1])/h[i-1])
//! ```
//!
//! The not-a-knot end conditions make the third derivative continuous at
//! `x[1]` and `x[n-1]`. They are solved for `m[0]` and `m[n]` and folded
//! into the first and last interior rows, which leaves a strictly diagonally
//! dominant tridiagonal system for the Thomas algorithm. Two points degrade
//! to a line and three points to the single interpolating parabola.

use crate::characteristic::SampleSet;
use crate::error::{NlindError, Result};

/// Supported interpolation orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationOrder {
    /// Piecewise-linear
    #[default]
    Linear,
    /// Piecewise-cubic, not-a-knot spline
    Cubic,
}

impl InterpolationOrder {
    /// Parse an order from its polynomial degree (1 or 3).
    pub fn from_degree(degree: u32) -> Result<Self> {
        match degree {
            1 => Ok(Self::Linear),
            3 => Ok(Self::Cubic),
            order => Err(NlindError::UnsupportedOrder { order }),
        }
    }

    pub fn degree(&self) -> u32 {
        match self {
            Self::Linear => 1,
            Self::Cubic => 3,
        }
    }
}

/// One polynomial piece of a piecewise function.
#[derive(Debug, Clone, PartialEq)]
pub enum Piece {
    /// `slope * x + intercept`, in absolute x.
    Linear { slope: f64, intercept: f64 },
    /// `c[0]*t^3 + c[1]*t^2 + c[2]*t + c[3]` with `t = x - origin`.
    Cubic {
        /// Index of the breakpoint the piece is expanded around
        knot: usize,
        origin: f64,
        coefs: [f64; 4],
    },
}

impl Piece {
    /// Evaluate the piece at `x`.
    pub fn value(&self, x: f64) -> f64 {
        match self {
            Self::Linear { slope, intercept } => f64::mul_add(*slope, x, *intercept),
            Self::Cubic { origin, coefs, .. } => {
                let t = x - origin;
                coefs[1..]
                    .iter()
                    .fold(coefs[0], |acc, &c| f64::mul_add(acc, t, c))
            }
        }
    }
}

/// Fit one piece per segment of `samples`.
pub fn fit(samples: &SampleSet, order: InterpolationOrder) -> Result<Vec<Piece>> {
    let xs = samples.xs();
    let ys = samples.ys();
    match order {
        InterpolationOrder::Linear => Ok(linear_pieces(&xs, &ys)),
        InterpolationOrder::Cubic => cubic_pieces(&xs, &ys),
    }
}

fn linear_pieces(xs: &[f64], ys: &[f64]) -> Vec<Piece> {
    (0..xs.len() - 1)
        .map(|i| {
            let slope = (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i]);
            Piece::Linear {
                slope,
                intercept: ys[i + 1] - slope * xs[i + 1],
            }
        })
        .collect()
}

fn cubic_pieces(xs: &[f64], ys: &[f64]) -> Result<Vec<Piece>> {
    let n = xs.len() - 1;
    let h: Vec<f64> = (0..n).map(|i| xs[i + 1] - xs[i]).collect();

    let moments = match n {
        1 => vec![0.0; 2],
        2 => {
            // Parabola: constant second derivative 2*f[x0,x1,x2].
            let d0 = (ys[1] - ys[0]) / h[0];
            let d1 = (ys[2] - ys[1]) / h[1];
            let curvature = 2.0 * (d1 - d0) / (xs[2] - xs[0]);
            vec![curvature; 3]
        }
        _ => not_a_knot_moments(xs, ys, &h)?,
    };

    Ok(pieces_from_moments(xs, ys, &h, &moments))
}

fn not_a_knot_moments(xs: &[f64], ys: &[f64], h: &[f64]) -> Result<Vec<f64>> {
    let n = h.len();
    let rows = n - 1;

    // Row k is the continuity equation at knot k + 1, unknown m[k + 1].
    let mut sub = vec![0.0; rows];
    let mut diag = vec![0.0; rows];
    let mut sup = vec![0.0; rows];
    let mut rhs = vec![0.0; rows];
    for k in 0..rows {
        let i = k + 1;
        sub[k] = h[i - 1];
        diag[k] = 2.0 * (h[i - 1] + h[i]);
        sup[k] = h[i];
        rhs[k] = 6.0 * ((ys[i + 1] - ys[i]) / h[i] - (ys[i] - ys[i - 1]) / h[i - 1]);
    }

    // Third derivative continuous at x[1]:
    // m[0] = ((h0 + h1)*m[1] - h0*m[2]) / h1
    let (h0, h1) = (h[0], h[1]);
    sub[0] = 0.0;
    diag[0] = (h0 + h1) * (h0 + 2.0 * h1) / h1;
    sup[0] = (h1 - h0) * (h1 + h0) / h1;

    // Third derivative continuous at x[n-1]:
    // m[n] = ((a + b)*m[n-1] - b*m[n-2]) / a
    let (a, b) = (h[n - 2], h[n - 1]);
    let last = rows - 1;
    sub[last] = (a - b) * (a + b) / a;
    diag[last] = (a + b) * (2.0 * a + b) / a;
    sup[last] = 0.0;

    let interior = solve_tridiagonal(&sub, &diag, &sup, &rhs)
        .ok_or(NlindError::SingularSpline { points: xs.len() })?;

    let first = ((h0 + h1) * interior[0] - h0 * interior[1]) / h1;
    let end = ((a + b) * interior[last] - b * interior[last - 1]) / a;

    let mut moments = Vec::with_capacity(n + 1);
    moments.push(first);
    moments.extend_from_slice(&interior);
    moments.push(end);
    Ok(moments)
}

/// Thomas algorithm: forward sweep, then back substitution.
///
/// `sub[0]` and `sup[last]` are ignored. Returns `None` on a zero pivot.
fn solve_tridiagonal(sub: &[f64], diag: &[f64], sup: &[f64], rhs: &[f64]) -> Option<Vec<f64>> {
    let n = diag.len();
    let mut c = vec![0.0; n];
    let mut d = vec![0.0; n];

    for i in 0..n {
        let (c_prev, d_prev) = if i == 0 { (0.0, 0.0) } else { (c[i - 1], d[i - 1]) };
        let pivot = diag[i] - sub[i] * c_prev;
        if pivot == 0.0 || !pivot.is_finite() {
            return None;
        }
        c[i] = sup[i] / pivot;
        d[i] = (rhs[i] - sub[i] * d_prev) / pivot;
    }

    for i in (0..n - 1).rev() {
        d[i] -= c[i] * d[i + 1];
    }
    Some(d)
}

/// Local cubic coefficients `[d, c, b, a]` of every segment from the knot moments.
fn pieces_from_moments(xs: &[f64], ys: &[f64], h: &[f64], m: &[f64]) -> Vec<Piece> {
    (0..h.len())
        .map(|i| {
            let d = (m[i + 1] - m[i]) / (6.0 * h[i]);
            let c = m[i] / 2.0;
            let b = (ys[i + 1] - ys[i]) / h[i] - h[i] * (2.0 * m[i] + m[i + 1]) / 6.0;
            Piece::Cubic {
                knot: i,
                origin: xs[i],
                coefs: [d, c, b, ys[i]],
            }
        })
        .collect()
}
