//! Tile catalogue and adjacency rules
//!
//! This module contains the immutable inputs of a solve:
//! - Tile handles, sides and the authored rule set
//! - The derived adjacency model queried by the solver
//! - Completeness checks over a rule set

/// Adjacency lookup tables built from a validated rule set
pub mod adjacency;
/// Tile handles, sides and rule set construction
pub mod tiles;
/// Rule set completeness reporting and weight normalization
pub mod validation;

pub use adjacency::{AdjacencyModel, SymmetryPolicy};
pub use tiles::{RuleSet, RuleSpec, Side, TileId, TileSpec};
