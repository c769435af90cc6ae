//! Bundled example: a saturating inductor with current-dependent losses.
//!
//! The L(i) and R(i) models are integrated over the demo current grid into
//! Φ(i) and U_r(i), compiled as odd piecewise functions and stitched into
//! the nonlinear element template.

use crate::compiler::{compile, CompileOptions};
use crate::deck::SpiceDeck;
use crate::error::Result;
use crate::models::{cumulative_trapezoid, CurveModel, InductanceModel, ResistanceModel, DEMO_CURRENTS};
use crate::netlist::element_template;
use crate::spline::InterpolationOrder;
use crate::table;

/// Simulator options the example circuit is run with.
pub const DEFAULT_SIMULATOR_OPTIONS: &str = "rshunt=1.0e11  rseries=1.0e-12";

/// Configuration for the bundled example.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub inductance: InductanceModel,
    pub resistance: ResistanceModel,
    /// Current grid (A), ascending, starting at or above 0.
    pub currents: Vec<f64>,
    pub order: InterpolationOrder,
    pub element_name: String,
    pub flux_name: String,
    pub voltage_name: String,
    /// `.option` lines appended to the deck.
    pub simulator_options: Vec<String>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            inductance: InductanceModel::default(),
            resistance: ResistanceModel::default(),
            currents: DEMO_CURRENTS.to_vec(),
            order: InterpolationOrder::Cubic,
            element_name: "nlindv2".to_string(),
            flux_name: "Phi".to_string(),
            voltage_name: "Ur".to_string(),
            simulator_options: vec![DEFAULT_SIMULATOR_OPTIONS.to_string()],
        }
    }
}

impl DemoConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_order(mut self, order: InterpolationOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_element_name(mut self, name: impl Into<String>) -> Self {
        self.element_name = name.into();
        self
    }

    pub fn with_currents(mut self, currents: Vec<f64>) -> Self {
        self.currents = currents;
        self
    }

    pub fn with_simulator_options(mut self, options: Vec<String>) -> Self {
        self.simulator_options = options;
        self
    }
}

/// Tabulated model curves on the current grid.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoCurves {
    pub current: Vec<f64>,
    pub inductance: Vec<f64>,
    pub resistance: Vec<f64>,
    /// Flux linkage Φ(i) = ∫ L di
    pub flux: Vec<f64>,
    /// Resistive voltage U_r(i) = ∫ R di
    pub voltage: Vec<f64>,
}

impl DemoCurves {
    /// Evaluate and integrate the models of `config`.
    pub fn new(config: &DemoConfig) -> Self {
        let current = config.currents.clone();
        let inductance = config.inductance.sample(&current);
        let resistance = config.resistance.sample(&current);
        let flux = cumulative_trapezoid(&current, &inductance);
        let voltage = cumulative_trapezoid(&current, &resistance);
        Self {
            current,
            inductance,
            resistance,
            flux,
            voltage,
        }
    }

    /// Φ(i) samples at strictly positive currents.
    pub fn flux_samples(&self) -> Vec<(f64, f64)> {
        positive_pairs(&self.current, &self.flux)
    }

    /// U_r(i) samples at strictly positive currents.
    pub fn voltage_samples(&self) -> Vec<(f64, f64)> {
        positive_pairs(&self.current, &self.voltage)
    }

    /// All curves as a text table: i, L, R, Phi, Ur.
    pub fn to_table(&self) -> String {
        let rows: Vec<Vec<f64>> = (0..self.current.len())
            .map(|k| {
                vec![
                    self.current[k],
                    self.inductance[k],
                    self.resistance[k],
                    self.flux[k],
                    self.voltage[k],
                ]
            })
            .collect();
        table::write_table(&["i", "L", "R", "Phi", "Ur"], &rows)
    }
}

fn positive_pairs(xs: &[f64], ys: &[f64]) -> Vec<(f64, f64)> {
    xs.iter()
        .copied()
        .zip(ys.iter().copied())
        .filter(|&(x, _)| x > 0.0)
        .collect()
}

/// Build the example deck: Φ and U_r functions plus the element.
///
/// Both functions share the current grid, so only Φ declares the knots.
pub fn build_demo_deck(config: &DemoConfig, curves: &DemoCurves) -> Result<SpiceDeck> {
    let options = CompileOptions::new().with_order(config.order).with_odd(true);

    let flux = compile(&config.flux_name, &curves.flux_samples(), &options)?;
    let voltage = compile(
        &config.voltage_name,
        &curves.voltage_samples(),
        &options.clone().with_emit_params(false),
    )?;

    let mut deck = SpiceDeck::new();
    deck.add_function(flux)?;
    deck.add_function(voltage)?;
    deck.add_subcircuit(element_template(
        &config.element_name,
        &config.flux_name,
        &config.voltage_name,
    )?)?;
    for line in &config.simulator_options {
        deck.add_option(line.clone());
    }

    log::info!(
        "demo deck: element '{}' over {} current samples",
        config.element_name,
        config.currents.len()
    );
    Ok(deck)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_curves_shape() {
        let curves = DemoCurves::new(&DemoConfig::new());
        assert_eq!(curves.flux.len(), DEMO_CURRENTS.len());
        assert_eq!(curves.flux[0], 0.0);
        assert!(curves.flux.windows(2).all(|w| w[1] > w[0]));
        assert_eq!(curves.flux_samples().len(), DEMO_CURRENTS.len() - 1);
        assert_eq!(curves.to_table().lines().count(), DEMO_CURRENTS.len() + 1);
    }

    #[test]
    fn test_demo_deck() {
        let config = DemoConfig::new();
        let curves = DemoCurves::new(&config);
        let deck = build_demo_deck(&config, &curves).unwrap();
        let text = deck.render();

        assert_eq!(text.matches(".PARAM {").count(), 1);
        assert!(text.contains(".FUNC Phi(x) {"));
        assert!(text.contains(".FUNC Ur(x) {"));
        assert!(text.contains(".SUBCKT nlindv2 pos neg\n"));
        assert!(text.contains(".option rshunt=1.0e11  rseries=1.0e-12\n"));

        // 31 positive currents, mirrored, plus the origin.
        let phi = &deck.functions()[0];
        assert_eq!(phi.knots().len(), 63);
        for (x, y) in curves.flux_samples() {
            assert_relative_eq!(phi.eval(x), y, max_relative = 1e-6);
            assert_relative_eq!(phi.eval(-x), -y, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_demo_linear_order() {
        let config = DemoConfig::new()
            .with_order(InterpolationOrder::Linear)
            .with_element_name("nlind_lin")
            .with_simulator_options(Vec::new());
        let curves = DemoCurves::new(&config);
        let text = build_demo_deck(&config, &curves).unwrap().render();
        assert!(!text.contains("^3"));
        assert!(!text.contains(".option"));
        assert!(text.ends_with(".ENDS nlind_lin\n"));
    }
}
