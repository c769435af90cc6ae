//! Numeric literal formatting for the ngspice expression dialect.
//!
//! Rust's float formatting has no `%g` and prints exponents as `e5`.
//! The helpers here produce `e+05` style exponents and general-format
//! values so emitted decks keep a stable, simulator-friendly layout.

/// Format `value` with `precision` significant digits in general notation.
///
/// Fixed notation keeps at least one fractional digit (`1.0`, `100.0`).
/// Exponent notation is used when the decimal exponent is below -4 or at
/// least `precision`, with trailing zeros trimmed (`1e-05`, `2.5e+16`).
pub fn general(value: f64, precision: usize) -> String {
    let precision = precision.max(1);
    if value == 0.0 {
        return if value.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    let (mantissa, exponent) = split_exponent(&format!("{:.*e}", precision - 1, value));
    if exponent < -4 || exponent >= precision as i32 {
        format!("{}{}", trim_fraction(&mantissa), exponent_suffix(exponent))
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        let fixed = trim_fraction(&format!("{:.*}", decimals, value));
        if fixed.contains('.') {
            fixed
        } else {
            format!("{}.0", fixed)
        }
    }
}

/// Format `value` in exponent notation with `decimals` mantissa digits.
///
/// With `signed` set, non-negative values get an explicit `+` so the literal
/// can be appended directly to a preceding term.
pub fn scientific(value: f64, decimals: usize, signed: bool) -> String {
    let (mantissa, exponent) = split_exponent(&format!("{:.*e}", decimals, value));
    let sign = if signed && !mantissa.starts_with('-') { "+" } else { "" };
    format!("{}{}{}", sign, mantissa, exponent_suffix(exponent))
}

/// Format `value` in fixed notation with `decimals` fractional digits.
pub fn fixed(value: f64, decimals: usize, signed: bool) -> String {
    if signed {
        format!("{:+.*}", decimals, value)
    } else {
        format!("{:.*}", decimals, value)
    }
}

fn split_exponent(text: &str) -> (String, i32) {
    match text.split_once('e') {
        Some((mantissa, exponent)) => (mantissa.to_string(), exponent.parse().unwrap_or(0)),
        None => (text.to_string(), 0),
    }
}

fn exponent_suffix(exponent: i32) -> String {
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("e{}{:02}", sign, exponent.abs())
}

fn trim_fraction(text: &str) -> String {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text.to_string()
    }
}
