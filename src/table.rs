//! Two-column sample table reader.
//!
//! # Format
//!
//! ```text
//! # current   flux linkage
//! 6.2         6.2e-4
//! 12.4        1.24m      ; SPICE scale factors are accepted
//! 27.9, 2.79m
//! ```
//!
//! One `x y` pair per line, separated by whitespace and/or a comma. `#` and
//! `;` start a comment anywhere on a line; a line starting with `*` is a
//! comment as in SPICE decks. Blank lines are skipped.

use crate::error::{NlindError, Result};
use crate::format;

/// Parse a number with an optional SPICE scale factor.
///
/// Scale factors are case-insensitive: `t g meg k m mil u n p f`, so `1M`
/// is one milli and `1MEG` one mega. Letters after the scale factor are
/// units and are ignored (`10kOhm`, `2.5mA`).
pub fn parse_value(text: &str) -> Option<f64> {
    let text = text.trim();
    let end = numeric_prefix_len(text);
    if end == 0 {
        return None;
    }
    let value: f64 = text[..end].parse().ok()?;

    let suffix = text[end..].to_ascii_lowercase();
    if !suffix.chars().all(char::is_alphabetic) {
        return None;
    }
    let multiplier = if suffix.starts_with("meg") {
        1e6
    } else if suffix.starts_with("mil") {
        25.4e-6
    } else {
        match suffix.chars().next() {
            Some('t') => 1e12,
            Some('g') => 1e9,
            Some('k') => 1e3,
            Some('m') => 1e-3,
            Some('u') | Some('µ') => 1e-6,
            Some('n') => 1e-9,
            Some('p') => 1e-12,
            Some('f') => 1e-15,
            _ => 1.0,
        }
    };

    Some(value * multiplier)
}

/// Length of the leading decimal literal: sign, mantissa, optional exponent.
fn numeric_prefix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let digits = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let start = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let mut end = digits(start);
    let mut has_mantissa = end > start;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits(end + 1);
        has_mantissa |= frac_end > end + 1;
        end = frac_end;
    }
    if !has_mantissa {
        return 0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = end + 1 + usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_end = digits(sign);
        if exp_end > sign {
            end = exp_end;
        }
    }
    end
}

/// Parse a sample table into (x, y) pairs, in file order.
pub fn parse_table(input: &str) -> Result<Vec<(f64, f64)>> {
    let mut points = Vec::new();

    for (index, raw) in input.lines().enumerate() {
        let line = index + 1;
        if raw.trim_start().starts_with('*') {
            continue;
        }
        let content = raw.split(|c: char| c == '#' || c == ';').next().unwrap_or("");
        let fields: Vec<&str> = content
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|f| !f.is_empty())
            .collect();

        match fields.as_slice() {
            [] => continue,
            [x, y] => {
                let x = parse_value(x)
                    .ok_or_else(|| NlindError::table(line, format!("invalid number: {}", x)))?;
                let y = parse_value(y)
                    .ok_or_else(|| NlindError::table(line, format!("invalid number: {}", y)))?;
                points.push((x, y));
            }
            other => {
                return Err(NlindError::table(
                    line,
                    format!("expected 2 columns, got {}", other.len()),
                ));
            }
        }
    }

    log::debug!("parsed {} samples", points.len());
    Ok(points)
}

/// Read and parse a sample table file.
#[cfg(feature = "cli")]
pub fn read_table(path: &std::path::Path) -> Result<Vec<(f64, f64)>> {
    let content = std::fs::read_to_string(path).map_err(|e| NlindError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_table(&content)
}

/// Render (x, y, ...) rows as a whitespace-separated table with a header comment.
pub fn write_table(header: &[&str], rows: &[Vec<f64>]) -> String {
    let mut out = format!("# {}\n", header.join(" "));
    for row in rows {
        let cells: Vec<String> = row.iter().map(|&v| format::scientific(v, 9, false)).collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Option<f64>, b: Option<f64>) -> bool {
        match (a, b) {
            (Some(x), Some(y)) => (x - y).abs() < x.abs() * 1e-10 + 1e-15,
            (None, None) => true,
            _ => false,
        }
    }

    #[test]
    fn test_parse_value() {
        assert!(approx_eq(parse_value("10k"), Some(10_000.0)));
        assert!(approx_eq(parse_value("100n"), Some(100e-9)));
        assert!(approx_eq(parse_value("4.7u"), Some(4.7e-6)));
        assert!(approx_eq(parse_value("1M"), Some(1e-3)));
        assert!(approx_eq(parse_value("1m"), Some(1e-3)));
        assert!(approx_eq(parse_value("1meg"), Some(1e6)));
        assert!(approx_eq(parse_value("2.2MEG"), Some(2.2e6)));
        assert!(approx_eq(parse_value("10mil"), Some(254e-6)));
        assert!(approx_eq(parse_value("3f"), Some(3e-15)));
        assert!(approx_eq(parse_value("1T"), Some(1e12)));
        assert!(approx_eq(parse_value("10kOhm"), Some(10_000.0)));
        assert!(approx_eq(parse_value("2.5mA"), Some(2.5e-3)));
        assert!(approx_eq(parse_value("5V"), Some(5.0)));
        assert!(approx_eq(parse_value(".5"), Some(0.5)));
        assert!(approx_eq(parse_value("1.5e3k"), Some(1.5e6)));
        assert!(approx_eq(parse_value("1k2"), None));
        assert!(approx_eq(parse_value("-"), None));
        assert!(approx_eq(parse_value("inf"), None));
        assert!(approx_eq(parse_value("-2.2"), Some(-2.2)));
        assert!(approx_eq(parse_value("1e-9"), Some(1e-9)));
        assert!(approx_eq(parse_value("abc"), None));
        assert!(approx_eq(parse_value(""), None));
    }

    #[test]
    fn test_parse_table() {
        let input = "\
# current flux
* spice style comment
6.2   6.2e-4
12.4  1.24m ; suffix

27.9, 2.79m
";
        let points = parse_table(input).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0], (6.2, 6.2e-4));
        assert!((points[1].1 - 1.24e-3).abs() < 1e-15);
        assert_eq!(points[2].0, 27.9);
    }

    #[test]
    fn test_parse_table_errors() {
        let err = parse_table("1 2\n3 4 5\n").unwrap_err();
        assert!(matches!(err, NlindError::TableParse { line: 2, .. }));

        let err = parse_table("1 2\nx 4\n").unwrap_err();
        assert!(matches!(err, NlindError::TableParse { line: 2, .. }));

        let err = parse_table("7\n").unwrap_err();
        assert!(matches!(err, NlindError::TableParse { line: 1, .. }));
    }

    #[test]
    fn test_write_table() {
        let text = write_table(&["i", "L"], &[vec![1.0, 0.5]]);
        assert_eq!(text, "# i L\n1.000000000e+00 5.000000000e-01\n");
    }
}
