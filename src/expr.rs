//! Piecewise selection expressions.
//!
//! A piecewise function is held as a [`PiecewiseExpr`] selection chain. The
//! chain is built once from the fitted pieces and then either evaluated
//! numerically or rendered to the ngspice ternary syntax:
//!
//! ```text
//! x<xl0 ? p0 : (
//! + x<xl1 ? p0 : (
//! + x<xl2 ? p1 : (
//! + p1)))
//! ```
//!
//! The first test sends everything left of the first knot to the first
//! piece, the last branch catches everything right of the last knot.

use crate::format;
use crate::spline::Piece;

/// Significant digits for linear slope and intercept literals.
pub const LINEAR_DECIMALS: usize = 15;

/// Mantissa digits for cubic coefficient literals.
pub const CUBIC_DECIMALS: usize = 8;

/// One conditional of the selection chain: `x < knot ? piece : ...`.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub knot: usize,
    pub piece: Piece,
}

/// A right-nested piecewise selection expression.
///
/// The chain `LessThan(k0, p0, LessThan(k1, p1, ... Polynomial(pn)))` is
/// stored flat, one [`Branch`] per conditional plus the fallthrough piece,
/// so sample sets of any size never recurse. [`node`](Self::node) walks it
/// as the tagged [`Node`] view.
#[derive(Debug, Clone, PartialEq)]
pub struct PiecewiseExpr {
    branches: Vec<Branch>,
    fallthrough: Piece,
}

/// Borrowed node of a [`PiecewiseExpr`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node<'a> {
    /// `x < knot ? then : otherwise`
    LessThan {
        knot: usize,
        then: &'a Piece,
        otherwise: Chain<'a>,
    },
    /// A polynomial leaf.
    Polynomial(&'a Piece),
}

/// Borrowed tail of a selection chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chain<'a> {
    branches: &'a [Branch],
    fallthrough: &'a Piece,
}

impl<'a> Chain<'a> {
    /// The first node of this tail.
    pub fn node(self) -> Node<'a> {
        match self.branches.split_first() {
            Some((branch, rest)) => Node::LessThan {
                knot: branch.knot,
                then: &branch.piece,
                otherwise: Chain {
                    branches: rest,
                    fallthrough: self.fallthrough,
                },
            },
            None => Node::Polynomial(self.fallthrough),
        }
    }
}

impl PiecewiseExpr {
    /// Fold the fitted pieces into a selection chain.
    ///
    /// Knot 0 and knot 1 both select the first piece, knot `i + 1` selects
    /// piece `i`, and the last piece is the fallthrough. Returns `None` when
    /// `pieces` is empty.
    pub fn from_pieces(pieces: &[Piece]) -> Option<Self> {
        let last = pieces.last()?;
        let branches = std::iter::once((0, &pieces[0]))
            .chain(pieces.iter().enumerate().map(|(i, piece)| (i + 1, piece)))
            .fold(Vec::with_capacity(pieces.len() + 1), |mut acc, (knot, piece)| {
                acc.push(Branch {
                    knot,
                    piece: piece.clone(),
                });
                acc
            });
        Some(Self {
            branches,
            fallthrough: last.clone(),
        })
    }

    /// Root node of the chain.
    pub fn node(&self) -> Node<'_> {
        Chain {
            branches: &self.branches,
            fallthrough: &self.fallthrough,
        }
        .node()
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn fallthrough(&self) -> &Piece {
        &self.fallthrough
    }

    /// Evaluate the expression at `x` given the knot values.
    pub fn eval(&self, x: f64, knots: &[f64]) -> f64 {
        self.branches
            .iter()
            .find(|branch| x < knots[branch.knot])
            .map_or(&self.fallthrough, |branch| &branch.piece)
            .value(x)
    }

    /// Number of conditional branches along the fallthrough chain.
    pub fn depth(&self) -> usize {
        self.branches.len()
    }

    /// Render in ngspice syntax, naming knot `i` as `<knot_prefix><i>`.
    ///
    /// Every nested conditional starts a `+ ` continuation line.
    pub fn render(&self, knot_prefix: &str) -> String {
        let mut out = String::new();
        for branch in &self.branches {
            out.push_str(&format!(
                "x<{}{} ? {} : (\n+ ",
                knot_prefix,
                branch.knot,
                render_piece(&branch.piece, knot_prefix)
            ));
        }
        out.push_str(&render_piece(&self.fallthrough, knot_prefix));
        out.push_str(&")".repeat(self.branches.len()));
        out
    }
}

/// Render a single polynomial piece.
pub fn render_piece(piece: &Piece, knot_prefix: &str) -> String {
    match piece {
        Piece::Linear { slope, intercept } => format!(
            "{}*x{}",
            format::fixed(*slope, LINEAR_DECIMALS, false),
            format::fixed(*intercept, LINEAR_DECIMALS, true)
        ),
        Piece::Cubic { knot, coefs, .. } => {
            let t = format!("(x-{}{})", knot_prefix, knot);
            format!(
                "{}*{t}^3{}*{t}^2{}*{t}{}",
                format::scientific(coefs[0], CUBIC_DECIMALS, false),
                format::scientific(coefs[1], CUBIC_DECIMALS, true),
                format::scientific(coefs[2], CUBIC_DECIMALS, true),
                format::scientific(coefs[3], CUBIC_DECIMALS, true),
                t = t
            )
        }
    }
}
