use crate::algorithm::bitset::TileBitset;
use crate::io::error::ValidationError;
use crate::model::tiles::{RuleSet, Side, TileId};
use std::collections::{BTreeMap, HashMap};
use std::collections::btree_map::Entry;

/// How directional rules relate to their inverse
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SymmetryPolicy {
    /// Every rule `A side B` also permits `B opposite A` unless that key was authored explicitly
    #[default]
    Derive,
    /// Rules are used exactly as authored
    Directional,
}

/// Immutable adjacency lookup derived from a rule set
///
/// Answers "may tile B sit on this side of tile A" and supplies tile weights.
/// Queries for pairs never mentioned by a rule return an empty permitted set
/// rather than an error.
#[derive(Clone, Debug)]
pub struct AdjacencyModel {
    names: Vec<String>,
    lookup: HashMap<String, TileId>,
    weights: Vec<f64>,
    /// Permitted neighbours with weights, per tile and side, sorted by handle
    neighbors: Vec<[Vec<(TileId, f64)>; 4]>,
    /// Same permitted neighbours as bitsets for propagation
    permitted: Vec<[TileBitset; 4]>,
    empty: TileBitset,
    rule_count: usize,
    policy: SymmetryPolicy,
}

impl AdjacencyModel {
    /// Build the lookup tables from a rule set
    ///
    /// Duplicate rule keys keep the weight of the last occurrence.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if:
    /// - No tiles are declared, or a tile identifier repeats
    /// - A tile or rule weight is not a positive finite number
    /// - A rule references an undeclared tile
    pub fn new(rule_set: &RuleSet, policy: SymmetryPolicy) -> Result<Self, ValidationError> {
        if rule_set.tiles.is_empty() {
            return Err(ValidationError::EmptyTileSet);
        }

        let mut names = Vec::with_capacity(rule_set.tiles.len());
        let mut lookup = HashMap::with_capacity(rule_set.tiles.len());
        let mut weights = Vec::with_capacity(rule_set.tiles.len());

        for (index, tile) in rule_set.tiles.iter().enumerate() {
            if !(tile.weight.is_finite() && tile.weight > 0.0) {
                return Err(ValidationError::NonPositiveTileWeight {
                    tile: tile.name.clone(),
                    weight: tile.weight,
                });
            }
            if lookup.insert(tile.name.clone(), TileId::new(index)).is_some() {
                return Err(ValidationError::DuplicateTile {
                    tile: tile.name.clone(),
                });
            }
            names.push(tile.name.clone());
            weights.push(tile.weight);
        }

        let resolve = |rule: usize, name: &str| {
            lookup
                .get(name)
                .copied()
                .ok_or_else(|| ValidationError::UnknownTile {
                    rule,
                    tile: name.to_string(),
                })
        };

        let mut authored: BTreeMap<(TileId, Side, TileId), f64> = BTreeMap::new();
        for (index, rule) in rule_set.rules.iter().enumerate() {
            let tile = resolve(index, &rule.tile)?;
            let neighbor = resolve(index, &rule.neighbor)?;
            if !(rule.weight.is_finite() && rule.weight > 0.0) {
                return Err(ValidationError::NonPositiveRuleWeight {
                    rule: index,
                    weight: rule.weight,
                });
            }
            authored.insert((tile, rule.side, neighbor), rule.weight);
        }

        let mut edges = authored.clone();
        if policy == SymmetryPolicy::Derive {
            for (&(tile, side, neighbor), &weight) in &authored {
                if let Entry::Vacant(slot) = edges.entry((neighbor, side.opposite(), tile)) {
                    slot.insert(weight);
                }
            }
        }

        let tile_count = names.len();
        let mut neighbors: Vec<[Vec<(TileId, f64)>; 4]> = (0..tile_count)
            .map(|_| std::array::from_fn(|_| Vec::new()))
            .collect();
        let mut permitted: Vec<[TileBitset; 4]> = (0..tile_count)
            .map(|_| std::array::from_fn(|_| TileBitset::new(tile_count)))
            .collect();

        // BTreeMap order keeps each neighbour list sorted by handle
        for (&(tile, side, neighbor), &weight) in &edges {
            if let Some(list) = neighbors
                .get_mut(tile.index())
                .and_then(|sides| sides.get_mut(side.index()))
            {
                list.push((neighbor, weight));
            }
            if let Some(set) = permitted
                .get_mut(tile.index())
                .and_then(|sides| sides.get_mut(side.index()))
            {
                set.insert(neighbor);
            }
        }

        tracing::debug!(
            tiles = tile_count,
            authored = authored.len(),
            effective = edges.len(),
            ?policy,
            "built adjacency model"
        );

        Ok(Self {
            names,
            lookup,
            weights,
            neighbors,
            permitted,
            empty: TileBitset::new(tile_count),
            rule_count: edges.len(),
            policy,
        })
    }

    /// Neighbours permitted on `side` of `tile`, with rule weights, in handle order
    pub fn compatible_neighbors(&self, tile: TileId, side: Side) -> &[(TileId, f64)] {
        self.neighbors
            .get(tile.index())
            .and_then(|sides| sides.get(side.index()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Neighbours permitted on `side` of `tile` as a set
    pub fn permitted(&self, tile: TileId, side: Side) -> &TileBitset {
        self.permitted
            .get(tile.index())
            .and_then(|sides| sides.get(side.index()))
            .unwrap_or(&self.empty)
    }

    /// Weight of the rule placing `neighbor` on `side` of `tile`
    pub fn rule_weight(&self, tile: TileId, side: Side, neighbor: TileId) -> Option<f64> {
        let list = self.compatible_neighbors(tile, side);
        list.binary_search_by_key(&neighbor, |&(id, _)| id)
            .ok()
            .and_then(|position| list.get(position))
            .map(|&(_, weight)| weight)
    }

    /// Whether `neighbor` may sit on `side` of `tile`
    pub fn allows(&self, tile: TileId, side: Side, neighbor: TileId) -> bool {
        self.permitted(tile, side).contains(neighbor)
    }

    /// Base weight of a tile, or 0 for handles outside this model
    pub fn tile_weight(&self, tile: TileId) -> f64 {
        self.weights.get(tile.index()).copied().unwrap_or(0.0)
    }

    /// Base weights indexed by handle
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Resolve a tile identifier to its handle
    pub fn tile_id(&self, name: &str) -> Option<TileId> {
        self.lookup.get(name).copied()
    }

    /// Identifier of a tile handle
    pub fn tile_name(&self, tile: TileId) -> Option<&str> {
        self.names.get(tile.index()).map(String::as_str)
    }

    /// Number of tiles in the model
    pub fn tile_count(&self) -> usize {
        self.names.len()
    }

    /// Every tile handle in ascending order
    pub fn tiles(&self) -> impl Iterator<Item = TileId> + '_ {
        (0..self.names.len()).map(TileId::new)
    }

    /// Set containing every tile of the model
    pub fn all_tiles(&self) -> TileBitset {
        TileBitset::all(self.names.len())
    }

    /// Number of effective directional rules after symmetry handling
    pub const fn rule_count(&self) -> usize {
        self.rule_count
    }

    /// Symmetry policy the model was built with
    pub const fn policy(&self) -> SymmetryPolicy {
        self.policy
    }
}
