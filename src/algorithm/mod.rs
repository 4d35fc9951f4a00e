/// Bitset of tile handles backing every domain
pub mod bitset;
/// Memoised neighbour support unions
pub mod cache;
/// Per-cell domains with cached entropy
pub mod domain;
/// Solver state machine and cancellation
pub mod executor;
/// Worklist constraint propagation
pub mod propagation;
/// Caller-side restart and backtracking strategies
pub mod recovery;
/// Minimum-entropy selection and collapse weighting
pub mod selection;
