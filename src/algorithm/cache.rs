use crate::algorithm::bitset::TileBitset;
use crate::model::{AdjacencyModel, Side};
use std::collections::HashMap;

/// Key for caching neighbour support of a domain
///
/// Identifies the exact set of tiles left in a cell and the side being
/// propagated towards.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct SupportKey {
    tiles: TileBitset,
    side: Side,
}

impl SupportKey {
    /// Create a key from a domain's tiles and a propagation side
    pub fn new(tiles: &TileBitset, side: Side) -> Self {
        Self {
            tiles: tiles.clone(),
            side,
        }
    }
}

/// Memoization cache for neighbour support unions
///
/// Propagation repeatedly asks which tiles a given domain permits on a side.
/// Large uniform regions share the same domains, so the union over their
/// tiles is computed once and reused.
#[derive(Default, Debug)]
pub struct SupportCache {
    /// Domain and side to permitted neighbours mapping
    support: HashMap<SupportKey, TileBitset>,

    /// Cache performance statistics
    pub stats: CacheStats,
}

/// Performance metrics for cache effectiveness
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: usize,
    /// Number of cache misses
    pub misses: usize,
}

impl SupportCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.support.len()
    }

    /// Whether nothing has been cached yet
    pub fn is_empty(&self) -> bool {
        self.support.is_empty()
    }

    /// Retrieve cached result or compute and store new one
    ///
    /// Uses the provided closure to compute the support only when the key
    /// is not already cached.
    pub fn get_or_compute<F>(&mut self, key: SupportKey, compute_fn: F) -> &TileBitset
    where
        F: FnOnce() -> TileBitset,
    {
        use std::collections::hash_map::Entry;

        match self.support.entry(key) {
            Entry::Occupied(entry) => {
                self.stats.hits += 1;
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                self.stats.misses += 1;
                entry.insert(compute_fn())
            }
        }
    }

    /// Union of tiles permitted on `side` by any tile in `tiles`
    pub fn support(&mut self, model: &AdjacencyModel, tiles: &TileBitset, side: Side) -> &TileBitset {
        self.get_or_compute(SupportKey::new(tiles, side), || {
            neighbor_support(model, tiles, side)
        })
    }
}

/// Union of tiles permitted on `side` by any tile in `tiles`, without caching
pub fn neighbor_support(model: &AdjacencyModel, tiles: &TileBitset, side: Side) -> TileBitset {
    let mut union = TileBitset::new(model.tile_count());
    for tile in tiles.iter() {
        union.union_with(model.permitted(tile, side));
    }
    union
}
