//! Assembly of generated blocks into one ngspice include text.
//!
//! A [`SpiceDeck`] collects compiled functions, subcircuits and `.option`
//! lines in order and checks that every reference resolves to something
//! declared before it:
//!
//! - a function compiled without its `.PARAM` block needs an earlier
//!   function that declared the same knot names with the same values;
//! - a `.PARAM` block may repeat an earlier knot only with the same value;
//! - a subcircuit needs every function it calls.

use std::collections::HashMap;

use crate::compiler::CompiledFunction;
use crate::error::{NlindError, Result};
use crate::netlist::Subcircuit;

/// Ordered collection of generated blocks.
#[derive(Debug, Clone, Default)]
pub struct SpiceDeck {
    functions: Vec<CompiledFunction>,
    subcircuits: Vec<Subcircuit>,
    options: Vec<String>,
    /// Declared knot constants and their values.
    knots: HashMap<String, f64>,
}

impl SpiceDeck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a compiled function.
    pub fn add_function(&mut self, function: CompiledFunction) -> Result<&mut Self> {
        if self.functions.iter().any(|f| f.name() == function.name()) {
            return Err(NlindError::DuplicateDefinition {
                kind: "function",
                name: function.name().to_string(),
            });
        }

        let names = function.knot_names();
        if function.emits_params() {
            let conflict = names.iter().zip(function.knots()).find_map(|(name, &value)| {
                match self.knots.get(name) {
                    Some(&previous) if previous != value => Some((name, previous, value)),
                    _ => None,
                }
            });
            if let Some((name, previous, value)) = conflict {
                return Err(NlindError::ConflictingKnots {
                    name: name.clone(),
                    function: function.name().to_string(),
                    previous,
                    value,
                });
            }
            for (name, &value) in names.iter().zip(function.knots()) {
                self.knots.insert(name.clone(), value);
            }
        } else {
            let declared = names
                .iter()
                .zip(function.knots())
                .all(|(name, value)| self.knots.get(name) == Some(value));
            if !declared {
                return Err(NlindError::UndefinedKnots {
                    function: function.name().to_string(),
                    prefix: function.knot_prefix().to_string(),
                    last: names.len() - 1,
                });
            }
        }

        log::debug!("deck: added function '{}'", function.name());
        self.functions.push(function);
        Ok(self)
    }

    /// Append a subcircuit; every function it calls must already be present.
    pub fn add_subcircuit(&mut self, subcircuit: Subcircuit) -> Result<&mut Self> {
        if self.subcircuits.iter().any(|s| s.name == subcircuit.name) {
            return Err(NlindError::DuplicateDefinition {
                kind: "subcircuit",
                name: subcircuit.name,
            });
        }
        for function in &subcircuit.functions {
            if !self.functions.iter().any(|f| f.name() == function) {
                return Err(NlindError::UndefinedFunction {
                    function: function.clone(),
                    element: subcircuit.name.clone(),
                });
            }
        }

        log::debug!("deck: added subcircuit '{}'", subcircuit.name);
        self.subcircuits.push(subcircuit);
        Ok(self)
    }

    /// Append a simulator `.option` line, e.g. `rshunt=1.0e11 rseries=1.0e-12`.
    pub fn add_option(&mut self, options: impl Into<String>) -> &mut Self {
        self.options.push(options.into());
        self
    }

    pub fn functions(&self) -> &[CompiledFunction] {
        &self.functions
    }

    pub fn subcircuits(&self) -> &[Subcircuit] {
        &self.subcircuits
    }

    /// Render all blocks: functions, then subcircuits, then options.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for function in &self.functions {
            out.push_str(&function.render());
        }
        for subcircuit in &self.subcircuits {
            out.push_str(&subcircuit.render());
        }
        for options in &self.options {
            out.push_str(&format!(".option {}\n", options));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{compile, CompileOptions};
    use crate::netlist::element_template;

    const LINE: [(f64, f64); 3] = [(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)];

    fn function(name: &str, emit_params: bool) -> CompiledFunction {
        compile(name, &LINE, &CompileOptions::new().with_emit_params(emit_params)).unwrap()
    }

    #[test]
    fn test_full_deck() {
        let mut deck = SpiceDeck::new();
        deck.add_function(function("Phi", true)).unwrap();
        deck.add_function(function("Ur", false)).unwrap();
        deck.add_subcircuit(element_template("nlindv2", "Phi", "Ur").unwrap())
            .unwrap();
        deck.add_option("rshunt=1.0e11  rseries=1.0e-12");

        let text = deck.render();
        assert_eq!(text.matches(".PARAM {").count(), 1);
        let phi = text.find(".FUNC Phi(x)").unwrap();
        let ur = text.find(".FUNC Ur(x)").unwrap();
        let sub = text.find(".SUBCKT nlindv2").unwrap();
        assert!(phi < ur && ur < sub);
        assert!(text.ends_with(".option rshunt=1.0e11  rseries=1.0e-12\n"));
    }

    #[test]
    fn test_function_without_declared_knots() {
        let mut deck = SpiceDeck::new();
        let err = deck.add_function(function("Ur", false)).unwrap_err();
        assert!(matches!(err, NlindError::UndefinedKnots { last: 2, .. }));
    }

    #[test]
    fn test_knot_values_must_match() {
        let mut deck = SpiceDeck::new();
        deck.add_function(function("Phi", true)).unwrap();
        let shifted = compile(
            "Ur",
            &[(1.0, 2.0), (2.5, 4.0), (3.0, 6.0)],
            &CompileOptions::new().with_emit_params(false),
        )
        .unwrap();
        assert!(deck.add_function(shifted).is_err());
    }

    #[test]
    fn test_redeclared_knots_must_agree() {
        let mut deck = SpiceDeck::new();
        deck.add_function(compile("Phi", &[(1.0, 0.1), (2.0, 0.2)], &CompileOptions::new()).unwrap())
            .unwrap();

        let moved = compile("Ur", &[(5.0, 1.0), (9.0, 3.0)], &CompileOptions::new()).unwrap();
        let err = deck.add_function(moved).unwrap_err();
        assert!(matches!(
            err,
            NlindError::ConflictingKnots { ref name, previous, value, .. }
                if name == "xl0" && previous == 1.0 && value == 5.0
        ));
        assert_eq!(deck.functions().len(), 1);
        assert_eq!(deck.render().matches("+ xl0=").count(), 1);

        // Same knots declared twice are fine.
        deck.add_function(compile("Ur", &[(1.0, 1.0), (2.0, 3.0)], &CompileOptions::new()).unwrap())
            .unwrap();
        assert_eq!(deck.functions().len(), 2);
    }

    #[test]
    fn test_subcircuit_needs_functions() {
        let mut deck = SpiceDeck::new();
        deck.add_function(function("Phi", true)).unwrap();
        let err = deck
            .add_subcircuit(element_template("nlindv2", "Phi", "Ur").unwrap())
            .unwrap_err();
        assert!(matches!(err, NlindError::UndefinedFunction { ref function, .. } if function == "Ur"));
    }

    #[test]
    fn test_duplicate_function() {
        let mut deck = SpiceDeck::new();
        deck.add_function(function("Phi", true)).unwrap();
        assert!(matches!(
            deck.add_function(function("Phi", true)),
            Err(NlindError::DuplicateDefinition { kind: "function", .. })
        ));
    }
}
