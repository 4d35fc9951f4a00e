use crate::algorithm::bitset::TileBitset;
use crate::math::probability::shannon_entropy;
use crate::model::TileId;
use std::cell::Cell;

/// Tiles still possible for one cell
///
/// A domain only ever shrinks while a solve moves forward. Size 0 means the
/// cell is in contradiction, size 1 means it is collapsed.
///
/// Entropy is computed on first request after a shrink and cached. The cache
/// assumes every call passes the weights of the same model.
#[derive(Clone, Debug)]
pub struct Domain {
    tiles: TileBitset,
    entropy: Cell<Option<f64>>,
}

impl PartialEq for Domain {
    fn eq(&self, other: &Self) -> bool {
        self.tiles == other.tiles
    }
}

impl Eq for Domain {}

impl Domain {
    /// Domain allowing every tile of a model with `tile_count` tiles
    pub fn full(tile_count: usize) -> Self {
        Self::from_tiles(TileBitset::all(tile_count))
    }

    /// Domain allowing exactly the given tiles
    pub const fn from_tiles(tiles: TileBitset) -> Self {
        Self {
            tiles,
            entropy: Cell::new(None),
        }
    }

    /// The remaining tiles
    pub const fn tiles(&self) -> &TileBitset {
        &self.tiles
    }

    /// Number of remaining tiles
    pub fn size(&self) -> usize {
        self.tiles.count()
    }

    /// Whether `tile` is still possible
    pub fn contains(&self, tile: TileId) -> bool {
        self.tiles.contains(tile)
    }

    /// Intersect with `allowed`, returning whether anything was removed
    pub fn restrict_to(&mut self, allowed: &TileBitset) -> bool {
        if self.tiles.is_subset(allowed) {
            return false;
        }
        self.tiles.intersect_with(allowed);
        self.entropy.set(None);
        true
    }

    /// Remove one tile, returning whether it was present
    pub fn remove(&mut self, tile: TileId) -> bool {
        let removed = self.tiles.remove(tile);
        if removed {
            self.entropy.set(None);
        }
        removed
    }

    /// Force the domain down to `tile`
    ///
    /// Empties the domain if `tile` was no longer possible.
    pub fn collapse_to(&mut self, tile: TileId) -> bool {
        let singleton = TileBitset::singleton(self.tiles.capacity(), tile);
        self.restrict_to(&singleton)
    }

    /// True iff no tile remains
    pub fn is_contradiction(&self) -> bool {
        self.tiles.is_empty()
    }

    /// True iff exactly one tile remains
    pub fn is_collapsed(&self) -> bool {
        self.tiles.count() == 1
    }

    /// The tile of a collapsed domain
    pub fn assigned(&self) -> Option<TileId> {
        if self.is_collapsed() {
            self.tiles.first()
        } else {
            None
        }
    }

    /// Remaining tiles in ascending handle order
    pub fn candidates(&self) -> impl Iterator<Item = TileId> + '_ {
        self.tiles.iter()
    }

    /// Shannon entropy over the base weights of the remaining tiles
    ///
    /// Equal tile sets always produce bit-identical values since the sum runs
    /// in handle order.
    pub fn entropy(&self, weights: &[f64]) -> f64 {
        if let Some(cached) = self.entropy.get() {
            return cached;
        }

        let value = if self.tiles.count() <= 1 {
            0.0
        } else {
            shannon_entropy(
                self.tiles
                    .iter()
                    .map(|tile| weights.get(tile.index()).copied().unwrap_or(0.0)),
            )
        };
        self.entropy.set(Some(value));
        value
    }
}
