//! Nonlinear inductor subcircuit templates.
//!
//! The element is a two-terminal `.SUBCKT` built from typed records and
//! rendered in ngspice syntax. The flux function Φ(i) drives a behavioural
//! current source into a 1 H storage inductor; the resistive function
//! U_r(i) scales a companion drop; a unity VCVS puts the sum across the
//! terminals.
//!
//! ```text
//! .SUBCKT nlindv2 pos neg
//! Vm pos pos1 DC 0V
//! Bx 1 0 i = Phi(i(Vm))
//! Lx 1 4 1H IC=1A
//! VmL 4 0 DC 0V
//! Rs 3 0 1
//! VmR 1 2 DC 0V
//! BxR 2 3 v = Ur(i(Vm))/Phi(i(Vm))*i(VmR)
//! Ex pos1 neg 0 1 1
//! .ENDS nlindv2
//! ```

use std::fmt;

use crate::error::{check_identifier, Result};
use crate::format;

/// Name of the subcircuit parameter scaling the sensed current in debug elements.
pub const SCALING_PARAM: &str = "is";

/// Output quantity of a behavioural source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Current,
    Voltage,
}

impl SourceKind {
    fn keyword(&self) -> &'static str {
        match self {
            Self::Current => "i",
            Self::Voltage => "v",
        }
    }
}

/// A netlist element inside a subcircuit.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// Zero-volt source used only to sense its branch current.
    SenseSource { name: String, pos: String, neg: String },
    /// Behavioural (B) source driven by an expression.
    BehavioralSource {
        name: String,
        pos: String,
        neg: String,
        kind: SourceKind,
        expression: String,
    },
    Inductor {
        name: String,
        pos: String,
        neg: String,
        inductance: f64,
        initial_current: f64,
    },
    Resistor {
        name: String,
        pos: String,
        neg: String,
        resistance: f64,
    },
    /// Voltage-controlled voltage source (E).
    Vcvs {
        name: String,
        pos: String,
        neg: String,
        ctrl_pos: String,
        ctrl_neg: String,
        gain: f64,
    },
    /// Debug probe: a behavioural current source `Bx<tag>` into a 1 Ω
    /// resistor `Rx<tag>`, so the node voltage equals the expression.
    Probe {
        tag: String,
        node: String,
        expression: String,
    },
}

impl Element {
    pub fn sense(name: &str, pos: &str, neg: &str) -> Self {
        Self::SenseSource {
            name: name.to_string(),
            pos: pos.to_string(),
            neg: neg.to_string(),
        }
    }

    pub fn behavioral(name: &str, pos: &str, neg: &str, kind: SourceKind, expression: String) -> Self {
        Self::BehavioralSource {
            name: name.to_string(),
            pos: pos.to_string(),
            neg: neg.to_string(),
            kind,
            expression,
        }
    }

    pub fn probe(tag: &str, node: &str, expression: String) -> Self {
        Self::Probe {
            tag: tag.to_string(),
            node: node.to_string(),
            expression,
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SenseSource { name, pos, neg } => write!(f, "{} {} {} DC 0V", name, pos, neg),
            Self::BehavioralSource {
                name,
                pos,
                neg,
                kind,
                expression,
            } => write!(f, "{} {} {} {} = {}", name, pos, neg, kind.keyword(), expression),
            Self::Inductor {
                name,
                pos,
                neg,
                inductance,
                initial_current,
            } => write!(f, "{} {} {} {}H IC={}A", name, pos, neg, inductance, initial_current),
            Self::Resistor {
                name,
                pos,
                neg,
                resistance,
            } => write!(f, "{} {} {} {}", name, pos, neg, resistance),
            Self::Vcvs {
                name,
                pos,
                neg,
                ctrl_pos,
                ctrl_neg,
                gain,
            } => write!(f, "{} {} {} {} {} {}", name, pos, neg, ctrl_pos, ctrl_neg, gain),
            Self::Probe {
                tag,
                node,
                expression,
            } => write!(f, "Bx{tag} {node} 0 i = {expression}\nRx{tag} {node} 0 1"),
        }
    }
}

/// A named two-terminal (plus probe ports) subcircuit.
#[derive(Debug, Clone, PartialEq)]
pub struct Subcircuit {
    pub name: String,
    pub ports: Vec<String>,
    /// Subcircuit parameters with default values, in declaration order.
    pub params: Vec<(String, f64)>,
    pub elements: Vec<Element>,
    /// Functions the elements call; they must be defined before the subcircuit.
    pub functions: Vec<String>,
}

impl Subcircuit {
    /// Render the `.SUBCKT` ... `.ENDS` block.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Subcircuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".SUBCKT {} {}", self.name, self.ports.join(" "))?;
        for (name, value) in &self.params {
            write!(f, " {} = {}", name, format::general(*value, 15))?;
        }
        writeln!(f)?;
        for element in &self.elements {
            writeln!(f, "{}", element)?;
        }
        writeln!(f, ".ENDS {}", self.name)
    }
}

fn call(function: &str, argument: &str) -> String {
    format!("{}({})", function, argument)
}

fn current(source: &str) -> String {
    format!("i({})", source)
}

/// Elements shared by the plain and the debug template.
///
/// `phi_arg` is the argument passed to the flux function by the state source.
fn core_elements(flux_fn: &str, voltage_fn: &str, phi_arg: &str) -> Vec<Element> {
    let sensed = current("Vm");
    vec![
        Element::sense("Vm", "pos", "pos1"),
        Element::behavioral("Bx", "1", "0", SourceKind::Current, call(flux_fn, phi_arg)),
        Element::Inductor {
            name: "Lx".to_string(),
            pos: "1".to_string(),
            neg: "4".to_string(),
            inductance: 1.0,
            initial_current: 1.0,
        },
        Element::sense("VmL", "4", "0"),
        Element::Resistor {
            name: "Rs".to_string(),
            pos: "3".to_string(),
            neg: "0".to_string(),
            resistance: 1.0,
        },
        Element::sense("VmR", "1", "2"),
        Element::behavioral(
            "BxR",
            "2",
            "3",
            SourceKind::Voltage,
            format!(
                "{}/{}*{}",
                call(voltage_fn, &sensed),
                call(flux_fn, &sensed),
                current("VmR")
            ),
        ),
        Element::Vcvs {
            name: "Ex".to_string(),
            pos: "pos1".to_string(),
            neg: "neg".to_string(),
            ctrl_pos: "0".to_string(),
            ctrl_neg: "1".to_string(),
            gain: 1.0,
        },
    ]
}

fn check_names(element_name: &str, flux_fn: &str, voltage_fn: &str) -> Result<()> {
    check_identifier("element", element_name)?;
    check_identifier("function", flux_fn)?;
    check_identifier("function", voltage_fn)
}

/// Build the nonlinear inductor element.
///
/// `flux_fn` and `voltage_fn` name functions produced by the compiler; they
/// must appear earlier in the deck.
pub fn element_template(element_name: &str, flux_fn: &str, voltage_fn: &str) -> Result<Subcircuit> {
    check_names(element_name, flux_fn, voltage_fn)?;

    Ok(Subcircuit {
        name: element_name.to_string(),
        ports: vec!["pos".to_string(), "neg".to_string()],
        params: Vec::new(),
        elements: core_elements(flux_fn, voltage_fn, &current("Vm")),
        functions: vec![flux_fn.to_string(), voltage_fn.to_string()],
    })
}

/// Build the element with four extra probe ports for inspection.
///
/// Probe nets: `k_L` storage current over Φ, `k_R` auxiliary current over Φ,
/// `i_phi` the flux value, `i_i` the scaled terminal current. The flux
/// function argument is divided by the `is` parameter, default `scaling`.
pub fn debug_element_template(
    element_name: &str,
    flux_fn: &str,
    voltage_fn: &str,
    scaling: f64,
) -> Result<Subcircuit> {
    check_names(element_name, flux_fn, voltage_fn)?;

    let scaled = format!("{}/{{{}}}", current("Vm"), SCALING_PARAM);
    let phi = call(flux_fn, &scaled);

    let mut elements = core_elements(flux_fn, voltage_fn, &scaled);
    elements.extend([
        Element::probe("L", "k_L", format!("{}/{}", current("VmL"), phi)),
        Element::probe("E", "k_R", format!("{}/{}", current("VmR"), phi)),
        Element::probe("P", "i_phi", phi),
        Element::probe("i", "i_i", scaled),
    ]);

    Ok(Subcircuit {
        name: element_name.to_string(),
        ports: ["pos", "neg", "k_L", "k_R", "i_phi", "i_i"]
            .iter()
            .map(|p| p.to_string())
            .collect(),
        params: vec![(SCALING_PARAM.to_string(), scaling)],
        elements,
        functions: vec![flux_fn.to_string(), voltage_fn.to_string()],
    })
}
