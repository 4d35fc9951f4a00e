//! Spatial data structures for a solve
//!
//! This module contains the grid of per-cell domains, cell coordinates and
//! the immutable snapshots exposed between solver steps.

/// Grid state management and snapshots
pub mod grid;

pub use grid::{CellState, Coord, Grid, GridSnapshot};
