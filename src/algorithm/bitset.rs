use crate::model::TileId;
use bitvec::prelude::*;
use std::fmt;

/// Fixed-size set of tile handles
///
/// Every set built for one model has the same capacity, so set operations
/// line up bit for bit. Iteration is always in ascending [`TileId`] order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TileBitset {
    bits: BitVec,
}

impl TileBitset {
    /// Create a set with no tiles present
    pub fn new(capacity: usize) -> Self {
        Self {
            bits: bitvec![0; capacity],
        }
    }

    /// Create a set containing every tile below `capacity`
    pub fn all(capacity: usize) -> Self {
        Self {
            bits: bitvec![1; capacity],
        }
    }

    /// Create a set holding exactly one tile
    pub fn singleton(capacity: usize, tile: TileId) -> Self {
        let mut set = Self::new(capacity);
        set.insert(tile);
        set
    }

    /// Number of tiles the set can address
    pub fn capacity(&self) -> usize {
        self.bits.len()
    }

    /// Insert a tile; handles beyond capacity are ignored
    pub fn insert(&mut self, tile: TileId) {
        if let Some(mut bit) = self.bits.get_mut(tile.index()) {
            *bit = true;
        }
    }

    /// Remove a tile, returning whether it was present
    pub fn remove(&mut self, tile: TileId) -> bool {
        self.bits
            .get_mut(tile.index())
            .is_some_and(|mut bit| std::mem::replace(&mut *bit, false))
    }

    /// Test tile membership
    pub fn contains(&self, tile: TileId) -> bool {
        self.bits.get(tile.index()).as_deref() == Some(&true)
    }

    /// Intersect this set with another in-place
    pub fn intersect_with(&mut self, other: &Self) {
        self.bits &= &other.bits;
    }

    /// Add every tile of another set in-place
    pub fn union_with(&mut self, other: &Self) {
        self.bits |= &other.bits;
    }

    /// Create a new set containing the intersection
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.intersect_with(other);
        result
    }

    /// Whether every tile of this set is also in `other`
    pub fn is_subset(&self, other: &Self) -> bool {
        self.bits.iter_ones().all(|index| other.bits.get(index).as_deref() == Some(&true))
    }

    /// Test if no tiles are present
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Count tiles in the set
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Lowest tile in the set
    pub fn first(&self) -> Option<TileId> {
        self.bits.first_one().map(TileId::new)
    }

    /// Iterate tiles in ascending handle order
    pub fn iter(&self) -> impl Iterator<Item = TileId> + '_ {
        self.bits.iter_ones().map(TileId::new)
    }

    /// Collect the tiles in ascending handle order
    pub fn to_vec(&self) -> Vec<TileId> {
        self.iter().collect()
    }

    /// Build a set from tile handles
    pub fn from_tiles(tiles: impl IntoIterator<Item = TileId>, capacity: usize) -> Self {
        let mut set = Self::new(capacity);
        for tile in tiles {
            set.insert(tile);
        }
        set
    }
}

impl fmt::Display for TileBitset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indices: Vec<usize> = self.iter().map(TileId::index).collect();
        write!(f, "TileBitset({} tiles: {indices:?})", self.count())
    }
}
