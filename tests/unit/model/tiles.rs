//! Tests for tile handles, sides and rule set construction

#[cfg(test)]
mod tests {
    use tilewave::io::error::ValidationError;
    use tilewave::model::{RuleSet, Side, TileId};

    // Tests that every side maps back to itself through two opposites
    // Verified by swapping the Top and Bottom opposites
    #[test]
    fn test_opposite_is_an_involution() {
        for side in Side::ALL {
            assert_ne!(side.opposite(), side);
            assert_eq!(side.opposite().opposite(), side);
        }
        assert_eq!(Side::Top.opposite(), Side::Bottom);
        assert_eq!(Side::Right.opposite(), Side::Left);
    }

    // Tests offsets point up, right, down and left with y growing downwards
    // Verified by negating the Top offset
    #[test]
    fn test_side_offsets() {
        assert_eq!(Side::Top.offset(), (0, -1));
        assert_eq!(Side::Right.offset(), (1, 0));
        assert_eq!(Side::Bottom.offset(), (0, 1));
        assert_eq!(Side::Left.offset(), (-1, 0));
    }

    // Tests side parsing accepts any case and rejects unknown names
    // Verified by removing the lowercase conversion
    #[test]
    fn test_side_from_str() {
        assert_eq!("top".parse::<Side>(), Ok(Side::Top));
        assert_eq!(" Left ".parse::<Side>(), Ok(Side::Left));
        assert_eq!("RIGHT".parse::<Side>(), Ok(Side::Right));
        assert_eq!(
            "north".parse::<Side>(),
            Err(ValidationError::InvalidSide {
                value: "north".to_string()
            })
        );
    }

    // Tests display uses the lowercase side names of the atlas format
    // Verified by printing the Debug form instead
    #[test]
    fn test_side_display_round_trips() {
        for side in Side::ALL {
            assert_eq!(side.to_string().parse::<Side>(), Ok(side));
        }
    }

    // Tests handles order by index
    // Verified by reversing the derived ordering
    #[test]
    fn test_tile_id_ordering() {
        assert!(TileId::new(1) < TileId::new(2));
        assert_eq!(TileId::new(7).index(), 7);
    }

    // Tests self adjacency adds one rule per side
    // Verified by skipping the Left side in the fold
    #[test]
    fn test_with_self_adjacency() {
        let rules = RuleSet::new()
            .with_tile("grass", 1.0)
            .with_self_adjacency("grass");

        assert_eq!(rules.rules.len(), 4);
        for side in Side::ALL {
            let on_side: Vec<_> = rules.rules_for("grass", side).collect();
            assert_eq!(on_side.len(), 1);
            assert_eq!(on_side.first().map(|rule| rule.neighbor.as_str()), Some("grass"));
            assert!(on_side.iter().all(|rule| (rule.weight - 100.0).abs() < f64::EPSILON));
        }
    }

    // Tests the mutable rule filter only touches the requested tile and side
    // Verified by dropping the side comparison from the filter
    #[test]
    fn test_rules_for_mut_filters() {
        let mut rules = RuleSet::new()
            .with_tile("a", 1.0)
            .with_tile("b", 1.0)
            .with_rule("a", Side::Right, "b", 40.0)
            .with_rule("a", Side::Left, "b", 40.0);

        for rule in rules.rules_for_mut("a", Side::Right) {
            rule.weight = 10.0;
        }

        let right: f64 = rules.rules_for("a", Side::Right).map(|rule| rule.weight).sum();
        let left: f64 = rules.rules_for("a", Side::Left).map(|rule| rule.weight).sum();
        assert!((right - 10.0).abs() < f64::EPSILON);
        assert!((left - 40.0).abs() < f64::EPSILON);
    }
}
