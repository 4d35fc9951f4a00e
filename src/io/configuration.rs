//! Solver constants and runtime configuration defaults

/// Base weight of a tile that does not declare one
pub const DEFAULT_TILE_WEIGHT: f64 = 1.0;

/// Weight of a rule that does not declare one (rule weights are percentages)
pub const DEFAULT_RULE_WEIGHT: f64 = 100.0;

// Completeness check: the rules on one side of a tile should share 100%
/// Expected total of rule weights on one side of a tile
pub const SIDE_WEIGHT_TARGET: f64 = 100.0;
/// Allowed deviation from the expected side weight total
pub const SIDE_WEIGHT_TOLERANCE: f64 = 0.01;

/// Grid width and height used when the command line gives none
pub const DEFAULT_GRID_SIZE: usize = 16;

// Safety limit to prevent excessive memory allocation
/// Maximum allowed grid dimension
pub const MAX_GRID_DIMENSION: usize = 10_000;

/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;

/// Solve attempts made by the restart policy before giving up
pub const DEFAULT_ATTEMPTS: usize = 10;

/// Checkpoint rollbacks allowed by the backtracking policy
pub const DEFAULT_MAX_BACKTRACKS: usize = 1000;

/// Marker printed for a cell that still has several candidates
pub const UNDETERMINED_MARKER: &str = "?";
/// Marker printed for a cell whose domain is empty
pub const CONTRADICTION_MARKER: &str = "!";

/// Version string written into map documents
pub const MAP_FORMAT_VERSION: &str = "1.0";

/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
