//! WASM bindings for nlindgen.
//!
//! This module exposes the compiler and the element template to
//! JavaScript, so a web page can generate ngspice includes directly.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { defineFunction, elementTemplate } from 'nlindgen';
//!
//! await init();
//!
//! const current = new Float64Array([6.2, 12.4, 27.9]);
//! const flux = new Float64Array([1.5e-5, 3.1e-5, 7.0e-5]);
//! const voltage = new Float64Array([2.0e-3, 4.1e-3, 9.5e-3]);
//!
//! let deck = defineFunction('Phi', current, flux, 3, true, true);
//! deck += defineFunction('Ur', current, voltage, 3, true, false);
//! deck += elementTemplate('nlindv2', 'Phi', 'Ur', false, 1.0);
//! ```

use wasm_bindgen::prelude::*;

use crate::characteristic::SampleSet;
use crate::compiler::{compile_set, CompileOptions};
use crate::netlist::{debug_element_template, element_template as build_element};
use crate::spline::InterpolationOrder;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(e: crate::error::NlindError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Compile a characteristic given as separate x and y columns.
///
/// # Arguments
/// * `name` - Function name used in `.FUNC`
/// * `xs`, `ys` - Sample columns of equal length
/// * `order` - 1 (linear) or 3 (cubic)
/// * `odd` - Mirror the samples through the origin
/// * `emit_params` - Prefix the `.PARAM` knot block
#[wasm_bindgen(js_name = defineFunction)]
pub fn define_function(
    name: &str,
    xs: &[f64],
    ys: &[f64],
    order: u32,
    odd: bool,
    emit_params: bool,
) -> Result<String, JsValue> {
    let order = InterpolationOrder::from_degree(order).map_err(to_js)?;
    let set = SampleSet::from_columns(xs, ys, odd).map_err(to_js)?;
    let options = CompileOptions::new()
        .with_order(order)
        .with_emit_params(emit_params);
    let function = compile_set(name, &set, &options).map_err(to_js)?;
    Ok(function.render())
}

/// Render the nonlinear inductor element.
///
/// With `debug` set, the element gets the four probe ports and the `is`
/// parameter defaults to `scaling`.
#[wasm_bindgen(js_name = elementTemplate)]
pub fn element_template(
    element_name: &str,
    flux_fn: &str,
    voltage_fn: &str,
    debug: bool,
    scaling: f64,
) -> Result<String, JsValue> {
    let subcircuit = if debug {
        debug_element_template(element_name, flux_fn, voltage_fn, scaling)
    } else {
        build_element(element_name, flux_fn, voltage_fn)
    };
    subcircuit.map(|s| s.render()).map_err(to_js)
}
