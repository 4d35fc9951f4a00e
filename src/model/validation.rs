use std::collections::BTreeMap;

use crate::{
    io::configuration::{SIDE_WEIGHT_TARGET, SIDE_WEIGHT_TOLERANCE},
    model::{AdjacencyModel, RuleSet, Side},
};

/// Completeness findings for one tile
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TileValidation {
    /// Sides with no permitted neighbour at all
    pub missing_sides: Vec<Side>,
    /// Sides whose rule weights do not add up to the target, with their total
    pub incomplete_sides: Vec<(Side, f64)>,
}

impl TileValidation {
    /// No missing and no incomplete sides
    pub fn is_valid(&self) -> bool {
        self.missing_sides.is_empty() && self.incomplete_sides.is_empty()
    }
}

/// Completeness findings for a whole adjacency model
///
/// Missing sides and orphan tiles count as errors since a tile missing a side
/// can never be placed in the grid interior. Weight totals off the target
/// are only warnings; sampling normalises them anyway.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidationReport {
    /// Findings keyed by tile name
    pub tiles: BTreeMap<String, TileValidation>,
    /// Tiles without a single rule on any side, sorted
    pub orphan_tiles: Vec<String>,
}

impl ValidationReport {
    /// True when no tile has any finding
    pub fn is_valid(&self) -> bool {
        self.orphan_tiles.is_empty() && self.tiles.values().all(TileValidation::is_valid)
    }

    /// Orphan tiles plus missing sides
    pub fn error_count(&self) -> usize {
        self.orphan_tiles.len()
            + self
                .tiles
                .values()
                .map(|tile| tile.missing_sides.len())
                .sum::<usize>()
    }

    /// Sides with an off-target weight total
    pub fn warning_count(&self) -> usize {
        self.tiles
            .values()
            .map(|tile| tile.incomplete_sides.len())
            .sum()
    }

    /// Sorted names of every tile with at least one finding
    pub fn tiles_with_issues(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .tiles
            .iter()
            .filter(|(_, tile)| !tile.is_valid())
            .map(|(name, _)| name.as_str())
            .chain(self.orphan_tiles.iter().map(String::as_str))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

/// Check every tile of `model` for missing sides and weight totals
///
/// Works on the model rather than the authored rules, so derived inverse
/// rules count towards completeness.
pub fn validate_rules(model: &AdjacencyModel) -> ValidationReport {
    let mut report = ValidationReport::default();

    for tile in model.tiles() {
        let name = model.tile_name(tile).unwrap_or_default().to_owned();
        let mut result = TileValidation::default();
        let mut has_rules = false;

        for side in Side::ALL {
            let neighbors = model.compatible_neighbors(tile, side);
            if neighbors.is_empty() {
                result.missing_sides.push(side);
                continue;
            }
            has_rules = true;
            let total: f64 = neighbors.iter().map(|&(_, weight)| weight).sum();
            if (total - SIDE_WEIGHT_TARGET).abs() > SIDE_WEIGHT_TOLERANCE {
                result.incomplete_sides.push((side, total));
            }
        }

        if !has_rules {
            report.orphan_tiles.push(name.clone());
        }
        report.tiles.insert(name, result);
    }

    report.orphan_tiles.sort_unstable();
    report
}

/// Sum of the authored rule weights on one side of a tile
pub fn side_weight_total(rule_set: &RuleSet, tile: &str, side: Side) -> f64 {
    rule_set.rules_for(tile, side).map(|rule| rule.weight).sum()
}

/// Rescale the rule weights on one side of a tile so they total the target
///
/// Sides without rules or with a non-positive total are left as they are.
/// Returns whether any weight changed.
pub fn normalize_side_weights(rule_set: &mut RuleSet, tile: &str, side: Side) -> bool {
    let total = side_weight_total(rule_set, tile, side);
    if total <= 0.0 || (total - SIDE_WEIGHT_TARGET).abs() <= f64::EPSILON {
        return false;
    }

    let scale = SIDE_WEIGHT_TARGET / total;
    for rule in rule_set.rules_for_mut(tile, side) {
        rule.weight *= scale;
    }
    true
}
