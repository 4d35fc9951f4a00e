//! Simple tiled model wave function collapse
//!
//! Tiles and directional adjacency rules are compiled into an immutable
//! [`AdjacencyModel`](model::AdjacencyModel). A [`Solver`](algorithm::executor::Solver)
//! then fills a grid one cell at a time: it picks the cell with the lowest
//! entropy, collapses it by weighted sampling and propagates the consequences
//! to neighbouring cells until every cell holds one tile or a contradiction
//! is found. Every solve is reproducible from its seed.

#![forbid(unsafe_code)]

/// Solver core: domains, propagation, selection and the state machine
pub mod algorithm;
/// File formats, command line, logging and error handling
pub mod io;
/// Entropy and weighted sampling helpers
pub mod math;
/// Tiles, rules and the adjacency model
pub mod model;
/// Grid of domains and immutable snapshots
pub mod spatial;

pub use io::error::{Result, SolverError};
