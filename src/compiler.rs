//! Piecewise characteristic compiler.
//!
//! Turns a sampled characteristic curve into an ngspice `.PARAM` block
//! holding the knot locations and a `.FUNC` block holding the piecewise
//! formula:
//!
//! ```text
//! .PARAM {
//! + xl0=1.0
//! + xl1=2.0
//! + }
//! .FUNC Phi(x) {
//! + x<xl0 ? 2.000000000000000*x+0.000000000000000 : (
//! + x<xl1 ? 2.000000000000000*x+0.000000000000000 : (
//! + 2.000000000000000*x+0.000000000000000))
//! + }
//! ```

use std::fmt;

use crate::characteristic::SampleSet;
use crate::error::{check_identifier, NlindError, Result};
use crate::expr::PiecewiseExpr;
use crate::format;
use crate::spline::{self, InterpolationOrder, Piece};

/// Default name prefix for knot constants.
pub const DEFAULT_KNOT_PREFIX: &str = "xl";

/// Significant digits for knot literals.
pub const KNOT_PRECISION: usize = 15;

/// Options for compiling a characteristic.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Polynomial order of every segment.
    pub order: InterpolationOrder,
    /// Mirror the samples through the origin before fitting.
    pub odd: bool,
    /// Prefix the function block with the `.PARAM` knot block.
    pub emit_params: bool,
    /// Name prefix of the knot constants.
    pub knot_prefix: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            order: InterpolationOrder::Linear,
            odd: false,
            emit_params: true,
            knot_prefix: DEFAULT_KNOT_PREFIX.to_string(),
        }
    }
}

impl CompileOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the interpolation order.
    pub fn with_order(mut self, order: InterpolationOrder) -> Self {
        self.order = order;
        self
    }

    /// Declare the characteristic odd, f(-x) = -f(x).
    ///
    /// All supplied x must be strictly positive; the negative half and the
    /// origin are generated.
    pub fn with_odd(mut self, odd: bool) -> Self {
        self.odd = odd;
        self
    }

    /// Emit or suppress the `.PARAM` block.
    ///
    /// Without it the caller must make sure the knot constants are defined
    /// by an earlier function using the same prefix and knot values.
    pub fn with_emit_params(mut self, emit_params: bool) -> Self {
        self.emit_params = emit_params;
        self
    }

    /// Set the knot constant prefix.
    pub fn with_knot_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.knot_prefix = prefix.into();
        self
    }
}

/// A compiled piecewise function.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFunction {
    name: String,
    knot_prefix: String,
    knots: Vec<f64>,
    pieces: Vec<Piece>,
    expression: PiecewiseExpr,
    order: InterpolationOrder,
    emit_params: bool,
}

impl CompiledFunction {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn knot_prefix(&self) -> &str {
        &self.knot_prefix
    }

    /// Breakpoint values, ascending.
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Knot constant names in the order of [`knots`](Self::knots).
    pub fn knot_names(&self) -> Vec<String> {
        (0..self.knots.len())
            .map(|i| format!("{}{}", self.knot_prefix, i))
            .collect()
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn expression(&self) -> &PiecewiseExpr {
        &self.expression
    }

    pub fn order(&self) -> InterpolationOrder {
        self.order
    }

    pub fn emits_params(&self) -> bool {
        self.emit_params
    }

    /// Evaluate the compiled function at `x`.
    pub fn eval(&self, x: f64) -> f64 {
        self.expression.eval(x, &self.knots)
    }

    /// The `.PARAM` block declaring every knot.
    pub fn param_block(&self) -> String {
        let mut out = String::from(".PARAM {\n");
        for (name, &x) in self.knot_names().iter().zip(&self.knots) {
            out.push_str(&format!("+ {}={}\n", name, format::general(x, KNOT_PRECISION)));
        }
        out.push_str("+ }\n");
        out
    }

    /// The `.FUNC` block with the piecewise formula.
    pub fn function_block(&self) -> String {
        format!(
            ".FUNC {}(x) {{\n+ {}\n+ }}\n",
            self.name,
            self.expression.render(&self.knot_prefix)
        )
    }

    /// Full text: the parameter block (if enabled) followed by the function block.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CompiledFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.emit_params {
            f.write_str(&self.param_block())?;
        }
        f.write_str(&self.function_block())
    }
}

/// Compile `samples` into a named piecewise function.
pub fn compile(name: &str, samples: &[(f64, f64)], options: &CompileOptions) -> Result<CompiledFunction> {
    let set = SampleSet::new(samples, options.odd)?;
    compile_set(name, &set, options)
}

/// Compile an already validated sample set.
///
/// `options.odd` is ignored; the set carries its own extension.
pub fn compile_set(name: &str, set: &SampleSet, options: &CompileOptions) -> Result<CompiledFunction> {
    check_identifier("function", name)?;
    check_identifier("knot prefix", &options.knot_prefix)?;

    let pieces = spline::fit(set, options.order)?;
    let expression = PiecewiseExpr::from_pieces(&pieces)
        .ok_or(NlindError::TooFewPoints { count: set.len() })?;

    log::debug!(
        "compiled '{}': {} knots, {} segments, order {}",
        name,
        set.len(),
        pieces.len(),
        options.order.degree()
    );

    Ok(CompiledFunction {
        name: name.to_string(),
        knot_prefix: options.knot_prefix.clone(),
        knots: set.xs(),
        pieces,
        expression,
        order: options.order,
        emit_params: options.emit_params,
    })
}

/// Compile and render in one call.
///
/// `order` is the polynomial degree, 1 or 3. This is the flat entry point
/// used by the CLI and the WASM binding.
pub fn define_function(
    name: &str,
    samples: &[(f64, f64)],
    order: u32,
    odd: bool,
    emit_params: bool,
) -> Result<String> {
    let options = CompileOptions::new()
        .with_order(InterpolationOrder::from_degree(order)?)
        .with_odd(odd)
        .with_emit_params(emit_params);
    Ok(compile(name, samples, &options)?.render())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    const LINE: [(f64, f64); 3] = [(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)];

    fn linear() -> CompileOptions {
        CompileOptions::new()
    }

    fn cubic() -> CompileOptions {
        CompileOptions::new().with_order(InterpolationOrder::Cubic)
    }

    #[test]
    fn test_linear_scenario() {
        let f = compile("Phi", &LINE, &linear()).unwrap();
        assert_eq!(f.knots(), &[1.0, 2.0, 3.0]);
        assert_eq!(f.pieces().len(), 2);
        for piece in f.pieces() {
            assert_eq!(*piece, Piece::Linear { slope: 2.0, intercept: 0.0 });
        }
        assert_relative_eq!(f.eval(2.5), 5.0);
    }

    #[test]
    fn test_linear_scenario_text() {
        let text = define_function("Phi", &LINE, 1, false, true).unwrap();
        let p = "2.000000000000000*x+0.000000000000000";
        let expected = format!(
            ".PARAM {{\n+ xl0=1.0\n+ xl1=2.0\n+ xl2=3.0\n+ }}\n\
             .FUNC Phi(x) {{\n\
             + x<xl0 ? {p} : (\n\
             + x<xl1 ? {p} : (\n\
             + x<xl2 ? {p} : (\n\
             + {p})))\n\
             + }}\n",
            p = p
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_linear_reproduces_samples() {
        let points = [(0.5, -1.0), (4.0, 2.0), (1.5, 3.0), (2.0, 2.5), (7.0, 0.0)];
        let f = compile("f", &points, &linear()).unwrap();
        for &(x, y) in &points {
            assert_relative_eq!(f.eval(x), y, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_linear_extrapolates_boundary_lines() {
        let points = [(0.0, 0.0), (1.0, 1.0), (2.0, 3.0)];
        let f = compile("f", &points, &linear()).unwrap();
        assert_relative_eq!(f.eval(-1.0), -1.0);
        assert_relative_eq!(f.eval(3.0), 5.0);
    }

    #[test]
    fn test_odd_scenario() {
        let f = compile("Phi", &LINE, &linear().with_odd(true)).unwrap();
        assert_eq!(f.knots(), &[-3.0, -2.0, -1.0, 0.0, 1.0, 2.0, 3.0]);
        let expected = [-6.0, -4.0, -2.0, 0.0, 2.0, 4.0, 6.0];
        for (&x, &y) in f.knots().iter().zip(&expected) {
            assert_relative_eq!(f.eval(x), y);
        }
    }

    #[test]
    fn test_odd_symmetry() {
        let points = [(0.5, 0.2), (1.0, 0.7), (2.0, 1.1), (4.0, 1.3)];
        for options in [linear().with_odd(true), cubic().with_odd(true)] {
            let f = compile("Phi", &points, &options).unwrap();
            assert_eq!(f.eval(0.0), 0.0);
            for x in [0.25, 0.5, 0.8, 1.0, 1.7, 3.0, 4.0] {
                assert_abs_diff_eq!(f.eval(-x), -f.eval(x), epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_cubic_interpolates_and_is_continuous() {
        let points = [(1.0, 0.5), (2.0, 1.8), (3.5, 2.2), (4.0, 2.3), (6.0, 2.35)];
        let f = compile("Phi", &points, &cubic()).unwrap();

        for &(x, y) in &points {
            assert_relative_eq!(f.eval(x), y as f32 as f64, epsilon = 1e-6);
        }
        let pieces = f.pieces();
        for i in 0..pieces.len() - 1 {
            let x = f.knots()[i + 1];
            assert_relative_eq!(pieces[i].value(x), pieces[i + 1].value(x), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_cubic_text_shape() {
        let f = compile("Ur", &LINE, &cubic()).unwrap();
        let text = f.function_block();
        assert!(text.starts_with(".FUNC Ur(x) {\n+ x<xl0 ? "));
        assert!(text.contains("*(x-xl1)^3"));
        assert!(text.ends_with(")))\n+ }\n"));
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            define_function("f", &LINE, 2, false, true),
            Err(NlindError::UnsupportedOrder { order: 2 })
        ));
        assert!(matches!(
            compile("f", &[(1.0, 1.0)], &linear()),
            Err(NlindError::TooFewPoints { count: 1 })
        ));
        assert!(matches!(
            compile("f", &[(0.0, 0.0), (1.0, 1.0)], &linear().with_odd(true)),
            Err(NlindError::NonPositiveOddDomain { .. })
        ));
        assert!(matches!(
            compile("f", &[(1.0, 1.0), (1e39, 2.0)], &linear()),
            Err(NlindError::SampleOutOfRange { index: 1, .. })
        ));
        assert!(matches!(
            compile("f", &[(1.0, 1.0), (2.0, -1e39)], &cubic()),
            Err(NlindError::SampleOutOfRange { index: 1, .. })
        ));
        assert!(matches!(
            compile("", &LINE, &linear()),
            Err(NlindError::InvalidName { .. })
        ));
        assert!(matches!(
            compile("f", &LINE, &linear().with_knot_prefix("x l")),
            Err(NlindError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_large_linear_set() {
        let points: Vec<(f64, f64)> = (0..300_000).map(|i| (i as f64, 2.0 * i as f64)).collect();
        let f = compile("f", &points, &linear()).unwrap();
        assert_eq!(f.expression().depth(), 300_000);
        assert_relative_eq!(f.eval(1234.5), 2469.0);

        let copy = f.clone();
        assert_eq!(copy, f);
        assert!(f.render().ends_with(")\n+ }\n"));
        drop(f);
        drop(copy);
    }

    #[test]
    fn test_suppressed_params_share_knot_names() {
        let with_params = compile("Phi", &LINE, &linear()).unwrap();
        let without = compile("Ur", &LINE, &linear().with_emit_params(false)).unwrap();

        let text = without.render();
        assert!(!text.contains(".PARAM"));
        assert_eq!(without.knot_names(), with_params.knot_names());
        for name in with_params.knot_names() {
            assert!(with_params.param_block().contains(&format!("+ {}=", name)));
            assert!(text.contains(&format!("x<{} ?", name)));
        }
    }

    #[test]
    fn test_custom_knot_prefix() {
        let f = compile("Ur", &LINE, &linear().with_knot_prefix("xr")).unwrap();
        let text = f.render();
        assert!(text.contains("+ xr2=3.0\n"));
        assert!(text.contains("x<xr0 ?"));
        assert!(!text.contains("xl"));
    }
}
