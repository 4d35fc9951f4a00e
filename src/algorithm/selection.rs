use crate::{
    algorithm::{domain::Domain, executor::RandomSelector},
    io::configuration::DEFAULT_RULE_WEIGHT,
    model::{AdjacencyModel, Side, TileId},
    spatial::{Coord, Grid},
};

/// Result of scanning the grid for the next cell to collapse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// Collapse this cell next
    Cell(Coord),
    /// Every cell is collapsed
    Complete,
    /// This cell has no tiles left, so nothing can be selected
    Contradiction(Coord),
}

/// Pick the undetermined cell with minimum entropy
///
/// Cells are scanned in row-major order. Ties on exactly equal entropy are
/// broken by a uniform draw from the selector, which keeps the selection
/// order reproducible for a fixed seed. Any empty domain is reported before
/// a cell is chosen.
pub fn observe(grid: &Grid, model: &AdjacencyModel, selector: &mut RandomSelector) -> Observation {
    let weights = model.weights();
    let mut lowest = f64::INFINITY;
    let mut tied: Vec<Coord> = Vec::new();
    let mut contradiction = None;

    for coord in grid.coords() {
        let Some(domain) = grid.domain(coord) else {
            continue;
        };
        if domain.is_contradiction() {
            contradiction.get_or_insert(coord);
            continue;
        }
        if domain.is_collapsed() {
            continue;
        }

        let entropy = domain.entropy(weights);
        if entropy < lowest {
            lowest = entropy;
            tied.clear();
            tied.push(coord);
        } else if entropy.total_cmp(&lowest).is_eq() {
            tied.push(coord);
        }
    }

    if let Some(cell) = contradiction {
        return Observation::Contradiction(cell);
    }

    match tied.len() {
        0 => Observation::Complete,
        1 => tied.first().copied().map_or(Observation::Complete, Observation::Cell),
        count => tied
            .get(selector.pick_index(count))
            .copied()
            .map_or(Observation::Complete, Observation::Cell),
    }
}

/// Sampling weights for every tile still possible at `cell`
///
/// Each candidate starts at its base tile weight and is scaled by the rule
/// weight (as a fraction of [`DEFAULT_RULE_WEIGHT`]) of every assigned
/// orthogonal neighbour that permits it. Candidates come back in ascending
/// handle order.
pub fn collapse_weights(grid: &Grid, model: &AdjacencyModel, cell: Coord) -> Vec<(TileId, f64)> {
    let Some(domain) = grid.domain(cell) else {
        return Vec::new();
    };

    let assigned_neighbors: Vec<(Side, TileId)> = Side::ALL
        .into_iter()
        .filter_map(|side| {
            let neighbor = grid.neighbor(cell, side)?;
            let tile = grid.domain(neighbor).and_then(Domain::assigned)?;
            Some((side, tile))
        })
        .collect();

    domain
        .candidates()
        .map(|tile| {
            let weight = assigned_neighbors
                .iter()
                .filter_map(|&(side, neighbor_tile)| {
                    model.rule_weight(neighbor_tile, side.opposite(), tile)
                })
                .fold(model.tile_weight(tile), |weight, rule_weight| {
                    weight * rule_weight / DEFAULT_RULE_WEIGHT
                });
            (tile, weight)
        })
        .collect()
}
