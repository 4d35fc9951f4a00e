//! Pre-placement parsing from command-line arguments and saved maps

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use crate::algorithm::executor::PrePlacements;
use crate::io::error::{Result, SolverError, invalid_parameter};
use crate::io::snapshot::MapDocument;
use crate::model::AdjacencyModel;
use crate::spatial::Coord;

/// A single `x,y=tile` placement
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Target cell
    pub coord: Coord,
    /// Tile name
    pub tile: String,
}

impl FromStr for Placement {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self> {
        let reject = |reason: &str| invalid_parameter("place", &s, &reason);

        let (position, tile) = s
            .split_once('=')
            .ok_or_else(|| reject("expected X,Y=TILE"))?;
        let (x, y) = position
            .split_once(',')
            .ok_or_else(|| reject("expected a comma between X and Y"))?;
        let x = x
            .trim()
            .parse::<usize>()
            .map_err(|error| reject(&format!("invalid X: {error}")))?;
        let y = y
            .trim()
            .parse::<usize>()
            .map_err(|error| reject(&format!("invalid Y: {error}")))?;
        let tile = tile.trim();
        if tile.is_empty() {
            return Err(reject("tile name is empty"));
        }

        Ok(Self {
            coord: Coord::new(x, y),
            tile: tile.to_owned(),
        })
    }
}

/// Named placements collected before the model resolves them to handles
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrefillData {
    placements: BTreeMap<Coord, String>,
}

impl PrefillData {
    /// Empty prefill
    pub const fn new() -> Self {
        Self {
            placements: BTreeMap::new(),
        }
    }

    /// Locked cells of a saved map
    ///
    /// Only cells marked `locked` are taken; tiles the solver chose are
    /// left for the next solve to decide again.
    pub fn from_map(document: &MapDocument) -> Self {
        let mut prefill = Self::new();
        for cell in document.cells.iter().filter(|cell| cell.locked) {
            prefill.insert(Placement {
                coord: Coord::new(cell.x, cell.y),
                tile: cell.tile_id.clone(),
            });
        }
        prefill
    }

    /// Read the locked cells of a map document on disk
    ///
    /// # Errors
    ///
    /// Returns an error if the map cannot be read or parsed
    pub fn from_map_file(path: &Path) -> Result<Self> {
        let prefill = Self::from_map(&MapDocument::load(path)?);
        tracing::debug!(path = %path.display(), placements = prefill.len(), "loaded prefill");
        Ok(prefill)
    }

    /// Add a placement, replacing and returning any earlier tile for the cell
    pub fn insert(&mut self, placement: Placement) -> Option<String> {
        self.placements.insert(placement.coord, placement.tile)
    }

    /// Number of placed cells
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// True when nothing is placed
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Translate tile names into model handles
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidPrePlacement`] for a tile the model
    /// does not know, including tiles disabled in the atlas
    pub fn resolve(&self, model: &AdjacencyModel) -> Result<PrePlacements> {
        self.placements
            .iter()
            .map(|(&coord, name)| {
                model
                    .tile_id(name)
                    .map(|tile| (coord, tile))
                    .ok_or_else(|| SolverError::InvalidPrePlacement {
                        coord,
                        tile: name.clone(),
                        reason: "unknown tile".to_owned(),
                    })
            })
            .collect()
    }
}
