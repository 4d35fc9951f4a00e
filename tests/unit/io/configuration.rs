//! Tests for solver configuration constants

#[cfg(test)]
mod tests {
    use tilewave::io::configuration::{
        CONTRADICTION_MARKER, DEFAULT_ATTEMPTS, DEFAULT_GRID_SIZE, DEFAULT_MAX_BACKTRACKS,
        DEFAULT_RULE_WEIGHT, DEFAULT_SEED, DEFAULT_TILE_WEIGHT, MAP_FORMAT_VERSION,
        MAX_GRID_DIMENSION, PROGRESS_BAR_WIDTH, SIDE_WEIGHT_TARGET, SIDE_WEIGHT_TOLERANCE,
        UNDETERMINED_MARKER,
    };

    // Tests a single default rule fills a side's weight budget
    // Verified by changing the default rule weight
    #[test]
    fn test_rule_weight_matches_side_target() {
        assert!((DEFAULT_RULE_WEIGHT - SIDE_WEIGHT_TARGET).abs() < f64::EPSILON);
        assert!(SIDE_WEIGHT_TOLERANCE > 0.0);
        assert!(SIDE_WEIGHT_TOLERANCE < 1.0);
        assert!(DEFAULT_TILE_WEIGHT > 0.0);
    }

    // Tests grid size defaults fit within the dimension limit
    // Verified by reducing dimension limit
    #[test]
    fn test_grid_limits() {
        assert_eq!(MAX_GRID_DIMENSION, 10_000);
        assert!(DEFAULT_GRID_SIZE > 0);
        assert!(DEFAULT_GRID_SIZE <= MAX_GRID_DIMENSION);
    }

    // Tests recovery budgets allow at least one retry
    // Verified by setting attempts to one
    #[test]
    fn test_recovery_budgets() {
        assert!(DEFAULT_ATTEMPTS > 1);
        assert!(DEFAULT_MAX_BACKTRACKS > 0);
        assert_eq!(DEFAULT_SEED, 42);
    }

    // Tests rendering markers are distinct single characters
    // Verified by reusing the undetermined marker for contradictions
    #[test]
    fn test_markers() {
        assert_eq!(UNDETERMINED_MARKER.chars().count(), 1);
        assert_eq!(CONTRADICTION_MARKER.chars().count(), 1);
        assert_ne!(UNDETERMINED_MARKER, CONTRADICTION_MARKER);
    }

    // Tests output format values
    // Verified by changing the format version
    #[test]
    fn test_output_constants() {
        assert_eq!(MAP_FORMAT_VERSION, "1.0");
        assert_eq!(PROGRESS_BAR_WIDTH, 40);
    }
}
