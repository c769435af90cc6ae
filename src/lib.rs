//! # nlindgen
//!
//! ngspice code generator for nonlinear inductor models.
//!
//! This library provides:
//! - A compiler from sampled characteristic curves to piecewise `.FUNC` blocks
//! - A nonlinear inductor `.SUBCKT` template built on two such functions
//! - Deck assembly that checks every knot and function reference
//! - Example saturating L(i) / R(i) models
//!
//! ## Architecture
//!
//! - [`characteristic`] - Sample validation, sorting and odd extension
//! - [`spline`] - Linear and not-a-knot cubic piece fitting
//! - [`expr`] - Piecewise selection tree, evaluation and rendering
//! - [`compiler`] - `.PARAM` / `.FUNC` generation
//! - [`netlist`] - Typed subcircuit elements and the inductor template
//! - [`deck`] - Ordered assembly of generated blocks
//! - [`table`] - Two-column sample table reader
//! - [`models`], [`demo`] - Bundled example curves
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! nlindgen func flux.dat --name Phi --order 3 --odd > phi.inc
//! nlindgen demo -o raw_spice_all.txt --curves curves.dat
//! ```
//!
//! ### Library
//!
//! ```
//! use nlindgen::{compile, element_template, CompileOptions, InterpolationOrder, SpiceDeck};
//!
//! let flux = [(1.0, 2.0e-4), (2.0, 3.5e-4), (4.0, 4.0e-4)];
//! let loss = [(1.0, 1.0e-3), (2.0, 3.0e-3), (4.0, 8.0e-3)];
//! let options = CompileOptions::new()
//!     .with_order(InterpolationOrder::Cubic)
//!     .with_odd(true);
//!
//! let mut deck = SpiceDeck::new();
//! deck.add_function(compile("Phi", &flux, &options)?)?;
//! deck.add_function(compile("Ur", &loss, &options.clone().with_emit_params(false))?)?;
//! deck.add_subcircuit(element_template("nlindv2", "Phi", "Ur")?)?;
//! assert!(deck.render().contains(".SUBCKT nlindv2 pos neg"));
//! # Ok::<(), nlindgen::NlindError>(())
//! ```
//!
//! ## Piecewise Functions
//!
//! For N knots the function block is a chain of N conditionals:
//!
//! 1. `x < knot[0]` selects the first segment (left extrapolation)
//! 2. `x < knot[k]` selects segment `k-1`
//! 3. The final branch extrapolates the last segment
//!
//! Linear pieces are printed as `a*x+b`; cubic pieces in powers of
//! `(x-knot)` so coefficients stay well scaled far from the origin.

pub mod characteristic;
pub mod compiler;
pub mod deck;
pub mod demo;
pub mod error;
pub mod expr;
pub mod format;
pub mod models;
pub mod netlist;
pub mod spline;
pub mod table;

// Re-export main types for convenience
pub use compiler::{compile, define_function, CompileOptions, CompiledFunction};
pub use deck::SpiceDeck;
pub use error::{NlindError, Result};
pub use netlist::{debug_element_template, element_template, Subcircuit};
pub use spline::InterpolationOrder;

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::{define_function as js_define_function, element_template as js_element_template};
