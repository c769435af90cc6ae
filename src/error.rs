//! Error types for the nlindgen code generator.
//!
//! This module provides a unified error type [`NlindError`] that covers
//! sample validation, spline fitting, table parsing and file I/O.

use thiserror::Error;

/// Result type alias using [`NlindError`].
pub type Result<T> = std::result::Result<T, NlindError>;

/// Unified error type for all nlindgen operations.
#[derive(Error, Debug)]
pub enum NlindError {
    // ============ Sample Validation Errors ============
    /// Not enough points to form a single segment
    #[error("Too few data points: got {count}, at least 2 are needed")]
    TooFewPoints { count: usize },

    /// Interpolation order other than 1 or 3
    #[error("Unsupported interpolation order {order}: only linear (1) and cubic (3) splines are implemented")]
    UnsupportedOrder { order: u32 },

    /// Odd extension requested on samples that are not strictly positive
    #[error("Odd function requires all arguments to be positive (minimum x is {min_x})")]
    NonPositiveOddDomain { min_x: f64 },

    /// Two samples share the same x after sorting
    #[error("Duplicate breakpoint at x = {x}: segment would have zero width")]
    DuplicateBreakpoint { x: f64 },

    /// NaN or infinite coordinate
    #[error("Sample {index} is not finite: ({x}, {y})")]
    NonFiniteSample { index: usize, x: f64, y: f64 },

    /// Finite coordinate that overflows single precision
    #[error("Sample {index} does not fit in single precision: ({x}, {y})")]
    SampleOutOfRange { index: usize, x: f64, y: f64 },

    /// Name that cannot be used as a SPICE identifier
    #[error("Invalid {kind} name '{name}'")]
    InvalidName { kind: &'static str, name: String },

    /// Spline moment system could not be solved
    #[error("Cubic spline system is singular for {points} points")]
    SingularSpline { points: usize },

    // ============ Deck Assembly Errors ============
    /// Subcircuit calls a function not defined earlier in the deck
    #[error("Element '{element}' references undefined function '{function}'")]
    UndefinedFunction { function: String, element: String },

    /// Function without a parameter block whose knots were never declared
    #[error("Function '{function}' uses knots '{prefix}0..{prefix}{last}' that are not declared earlier in the deck")]
    UndefinedKnots {
        function: String,
        prefix: String,
        last: usize,
    },

    /// Parameter block redeclares a knot with a different value
    #[error("Function '{function}' redeclares knot '{name}' = {value}, already declared as {previous}")]
    ConflictingKnots {
        name: String,
        function: String,
        previous: f64,
        value: f64,
    },

    /// Two functions or two subcircuits share a name
    #[error("Duplicate {kind} name '{name}'")]
    DuplicateDefinition { kind: &'static str, name: String },

    // ============ Table Parsing Errors ============
    /// Malformed line in a sample table
    #[error("Table parse error at line {line}: {message}")]
    TableParse { line: usize, message: String },

    // ============ I/O Errors ============
    /// Error reading an input file
    #[error("Failed to read file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error writing an output file
    #[error("Failed to write file '{path}': {source}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl NlindError {
    /// Create a table parse error
    pub fn table(line: usize, message: impl Into<String>) -> Self {
        Self::TableParse {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid name error
    pub fn invalid_name(kind: &'static str, name: impl Into<String>) -> Self {
        Self::InvalidName {
            kind,
            name: name.into(),
        }
    }

    /// True for every error caused by bad caller data rather than the environment.
    ///
    /// The caller has to fix the samples or names; retrying cannot help.
    pub fn is_invalid_input(&self) -> bool {
        !matches!(
            self,
            Self::FileReadError { .. } | Self::FileWriteError { .. }
        )
    }
}

/// Check that `name` is usable as a SPICE identifier.
pub(crate) fn check_identifier(kind: &'static str, name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit());
    if valid {
        Ok(())
    } else {
        Err(NlindError::invalid_name(kind, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_rules() {
        assert!(check_identifier("function", "Phi").is_ok());
        assert!(check_identifier("function", "u_r2").is_ok());
        assert!(check_identifier("function", "").is_err());
        assert!(check_identifier("function", "2phi").is_err());
        assert!(check_identifier("function", "phi x").is_err());
    }

    #[test]
    fn test_invalid_input_classification() {
        assert!(NlindError::TooFewPoints { count: 1 }.is_invalid_input());
        assert!(NlindError::table(3, "bad").is_invalid_input());
        let io = NlindError::FileReadError {
            path: "x".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(!io.is_invalid_input());
    }
}
