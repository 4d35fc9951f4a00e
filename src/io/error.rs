//! Error types for model construction, solver setup and file handling

use crate::algorithm::executor::Contradiction;
use crate::spatial::grid::Coord;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Malformed rule set input, raised while building an adjacency model
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The rule set declares no tiles
    #[error("rule set declares no tiles")]
    EmptyTileSet,

    /// Two tiles share an identifier
    #[error("tile '{tile}' is declared more than once")]
    DuplicateTile {
        /// The repeated identifier
        tile: String,
    },

    /// A rule names a tile that was never declared
    #[error("rule {rule} references unknown tile '{tile}'")]
    UnknownTile {
        /// Position of the rule in the rule list
        rule: usize,
        /// The unknown identifier
        tile: String,
    },

    /// A tile weight is zero, negative or not finite
    #[error("tile '{tile}' has non-positive weight {weight}")]
    NonPositiveTileWeight {
        /// Tile identifier
        tile: String,
        /// Offending weight
        weight: f64,
    },

    /// A rule weight is zero, negative or not finite
    #[error("rule {rule} has non-positive weight {weight}")]
    NonPositiveRuleWeight {
        /// Position of the rule in the rule list
        rule: usize,
        /// Offending weight
        weight: f64,
    },

    /// A side name is not one of top, right, bottom, left
    #[error("invalid side '{value}' (expected top, right, bottom or left)")]
    InvalidSide {
        /// The unparseable side name
        value: String,
    },
}

/// Main error type for all solver operations
#[derive(Debug, Error)]
pub enum SolverError {
    /// The rule set failed validation
    #[error("invalid rule set: {0}")]
    Validation(#[from] ValidationError),

    /// Grid dimensions are zero or exceed the supported maximum
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
    },

    /// A pre-placement names an unknown tile or lies outside the grid
    #[error("invalid pre-placement of '{tile}' at {coord}: {reason}")]
    InvalidPrePlacement {
        /// Target cell
        coord: Coord,
        /// Requested tile identifier
        tile: String,
        /// Why the placement was rejected
        reason: String,
    },

    /// Pre-placed cells conflict before any step has run
    #[error("pre-placements are unsatisfiable: contradiction at {}", .0.cell)]
    UnsatisfiablePrePlacement(Box<Contradiction>),

    /// A run was cancelled between steps
    #[error("solve cancelled after {steps} steps")]
    Cancelled {
        /// Steps completed before cancellation
        steps: usize,
    },

    /// An operation was requested in a state that does not support it
    #[error("cannot {operation} while solver is {state}")]
    InvalidState {
        /// The rejected operation
        operation: &'static str,
        /// Name of the current solver state
        state: &'static str,
    },

    /// A JSON document could not be parsed or written
    #[error("cannot {operation} '{}': {source}", path.display())]
    AtlasFormat {
        /// Path of the document
        path: PathBuf,
        /// Parse or serialize step that failed
        operation: &'static str,
        /// Underlying serde error
        source: serde_json::Error,
    },

    /// General file system operation failure
    #[error("file system error during {operation} on '{}': {source}", path.display())]
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Command-line or runtime parameter validation failed
    #[error("invalid parameter '{parameter}' = '{value}': {reason}")]
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },
}

/// Convenience type alias for solver results
pub type Result<T> = std::result::Result<T, SolverError>;

/// Attaches the file path and operation to low-level I/O failures
pub trait WithPath<T> {
    /// Convert the error into a [`SolverError`] naming `path`
    ///
    /// # Errors
    ///
    /// Propagates the original error with the path and operation applied
    fn with_path(self, path: &Path, operation: &'static str) -> Result<T>;
}

impl<T> WithPath<T> for std::result::Result<T, std::io::Error> {
    fn with_path(self, path: &Path, operation: &'static str) -> Result<T> {
        self.map_err(|source| SolverError::FileSystem {
            path: path.to_path_buf(),
            operation,
            source,
        })
    }
}

impl<T> WithPath<T> for std::result::Result<T, serde_json::Error> {
    fn with_path(self, path: &Path, operation: &'static str) -> Result<T> {
        self.map_err(|source| SolverError::AtlasFormat {
            path: path.to_path_buf(),
            operation,
            source,
        })
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> SolverError {
    SolverError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
