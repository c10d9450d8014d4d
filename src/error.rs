//! Error types for the Heatfilm thermal simulator.
//!
//! This module provides a unified error type [`HeatFilmError`] that covers
//! all error conditions that can occur while reading the input deck, building
//! the mesh and equation numbering, solving, and writing results.

use std::path::Path;

use thiserror::Error;

/// Result type alias using [`HeatFilmError`].
pub type Result<T> = std::result::Result<T, HeatFilmError>;

/// Unified error type for all Heatfilm operations.
#[derive(Error, Debug)]
pub enum HeatFilmError {
    // ============ Input Deck Errors ============
    /// Error during lexical analysis
    #[error("Lexer error at line {line}, column {column}: {message}")]
    LexerError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Error during parsing
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// Label that no configuration section understands
    #[error("Unknown input field '{label}' at line {line}")]
    UnknownField { label: String, line: usize },

    /// Required label absent from the deck
    #[error("Missing input field '{label}'")]
    MissingField { label: String },

    /// Value present but unusable
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    // ============ Mesh Errors ============
    /// Material id outside the four hard-coded laws
    #[error("Element {element} has invalid material id {id} (expected 0..=3)")]
    InvalidMaterial { element: usize, id: u8 },

    /// Essential boundary scan disagrees with the regular grid
    #[error("Found {found} essential boundary nodes, expected {expected}")]
    BoundaryNodeCount { found: usize, expected: usize },

    /// Inconsistent mesh arrays
    #[error("Invalid mesh: {message}")]
    InvalidMesh { message: String },

    // ============ Solver Errors ============
    /// Nonzero write outside the stored band of a skyline matrix
    #[error("Entry ({row}, {col}) lies outside the stored band (first stored column {first_column})")]
    OutsideBand {
        row: usize,
        col: usize,
        first_column: usize,
    },

    /// Cholesky pivot not positive
    #[error("Jacobian is not positive definite at equation {equation} (pivot {pivot:.3e})")]
    NotPositiveDefinite { equation: usize, pivot: f64 },

    /// Newton-Raphson iteration did not converge
    #[error("Newton-Raphson did not converge after {iterations} iterations (residual: {residual:.2e})")]
    ConvergenceFailure { iterations: usize, residual: f64 },

    /// A nodal temperature moved more than allowed within one increment
    #[error("Temperature at node {node} changed by {change:.3e} K (limit {limit:.3e} K)")]
    TemperatureJump { node: usize, change: f64, limit: f64 },

    /// Increment shrank below the configured minimum
    #[error("Time increment {dt:.3e} s fell below the minimum {min_dt:.3e} s")]
    TimeIncrementTooSmall { dt: f64, min_dt: f64 },

    /// Step budget exhausted before reaching the end time
    #[error("Maximum number of time steps ({max_steps}) reached at t = {time:.6e} s")]
    MaxStepsExceeded { max_steps: usize, time: f64 },

    // ============ I/O Errors ============
    /// Error reading the input deck
    #[error("Failed to read input deck '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error creating or writing an output file
    #[error("Failed to write output file '{path}': {source}")]
    OutputError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl HeatFilmError {
    /// Create a lexer error
    pub fn lexer(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::LexerError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an invalid mesh error
    pub fn invalid_mesh(message: impl Into<String>) -> Self {
        Self::InvalidMesh {
            message: message.into(),
        }
    }

    /// Create a convergence failure error
    pub fn convergence_failure(iterations: usize, residual: f64) -> Self {
        Self::ConvergenceFailure {
            iterations,
            residual,
        }
    }

    /// Create an output error for `path`
    pub fn output(path: &Path, source: std::io::Error) -> Self {
        Self::OutputError {
            path: path.display().to_string(),
            source,
        }
    }

    /// Whether the time-integration controller retries the step with a
    /// smaller increment instead of aborting.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotPositiveDefinite { .. }
                | Self::ConvergenceFailure { .. }
                | Self::TemperatureJump { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(HeatFilmError::convergence_failure(11, 1.0).is_recoverable());
        assert!(HeatFilmError::NotPositiveDefinite {
            equation: 3,
            pivot: -1.0
        }
        .is_recoverable());
        assert!(!HeatFilmError::TimeIncrementTooSmall {
            dt: 1e-9,
            min_dt: 1e-6
        }
        .is_recoverable());
        assert!(!HeatFilmError::BoundaryNodeCount {
            found: 3,
            expected: 4
        }
        .is_recoverable());
    }
}
