//! Solved map output: a JSON map document and a plain-text rendering

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;

use crate::algorithm::executor::{PrePlacements, SolveOutcome};
use crate::io::configuration::{CONTRADICTION_MARKER, MAP_FORMAT_VERSION, UNDETERMINED_MARKER};
use crate::io::error::{Result, WithPath};
use crate::model::AdjacencyModel;
use crate::spatial::{CellState, Coord, GridSnapshot};

/// Serializable grid state, compatible with the viewer's `map.json`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapDocument {
    /// Document format version
    pub version: String,
    /// Seed that produced the map, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Grid dimensions
    pub grid: GridSize,
    /// Assigned cells in row-major order
    #[serde(default)]
    pub cells: Vec<MapCell>,
    /// Undetermined cells with their remaining tiles
    #[serde(default)]
    pub uncollapsed: Vec<OpenCell>,
    /// Cell whose domain emptied, if the solve failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contradiction: Option<MapCoord>,
}

/// Grid width and height
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    /// Columns
    pub width: usize,
    /// Rows
    pub height: usize,
}

/// An assigned cell
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapCell {
    /// Column
    pub x: usize,
    /// Row
    pub y: usize,
    /// Tile name
    pub tile_id: String,
    /// Placed by the user rather than by the solver
    #[serde(default)]
    pub locked: bool,
}

/// An undetermined cell
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenCell {
    /// Column
    pub x: usize,
    /// Row
    pub y: usize,
    /// Remaining tile names in handle order
    pub possibilities: Vec<String>,
}

/// Bare cell position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapCoord {
    /// Column
    pub x: usize,
    /// Row
    pub y: usize,
}

impl From<Coord> for MapCoord {
    fn from(coord: Coord) -> Self {
        Self {
            x: coord.x,
            y: coord.y,
        }
    }
}

impl MapDocument {
    /// Build a document from a snapshot
    ///
    /// Cells listed in `placements` are marked locked. Empty cells are left
    /// out; `contradiction` names the failing one.
    pub fn from_snapshot(
        snapshot: &GridSnapshot,
        model: &AdjacencyModel,
        placements: &PrePlacements,
        seed: Option<u64>,
        contradiction: Option<Coord>,
    ) -> Self {
        let name = |tile| model.tile_name(tile).unwrap_or_default().to_owned();
        let mut cells = Vec::new();
        let mut uncollapsed = Vec::new();

        for (coord, state) in snapshot.iter() {
            match state {
                CellState::Assigned(tile) => cells.push(MapCell {
                    x: coord.x,
                    y: coord.y,
                    tile_id: name(*tile),
                    locked: placements.contains_key(&coord),
                }),
                CellState::Open(tiles) => uncollapsed.push(OpenCell {
                    x: coord.x,
                    y: coord.y,
                    possibilities: tiles.iter().map(|&tile| name(tile)).collect(),
                }),
                CellState::Empty => {}
            }
        }

        Self {
            version: MAP_FORMAT_VERSION.to_owned(),
            seed,
            grid: GridSize {
                width: snapshot.width(),
                height: snapshot.height(),
            },
            cells,
            uncollapsed,
            contradiction: contradiction.map(MapCoord::from),
        }
    }

    /// Build a document from the terminal outcome of a solve
    pub fn from_outcome(
        outcome: &SolveOutcome,
        model: &AdjacencyModel,
        placements: &PrePlacements,
        seed: u64,
    ) -> Self {
        let contradiction = match outcome {
            SolveOutcome::Contradiction(contradiction) => Some(contradiction.cell),
            SolveOutcome::Complete(_) | SolveOutcome::Cancelled { .. } => None,
        };
        Self::from_snapshot(outcome.snapshot(), model, placements, Some(seed), contradiction)
    }

    /// Parse a map document from JSON text
    ///
    /// # Errors
    ///
    /// Returns the parser error for malformed JSON or missing required fields
    pub fn parse(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Read a map document from disk
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).with_path(path, "read map")?;
        Self::parse(&text).with_path(path, "parse map")
    }

    /// Write the document as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self).with_path(path, "serialize map")?;
        std::fs::write(path, text).with_path(path, "write map")?;
        tracing::info!(path = %path.display(), cells = self.cells.len(), "saved map");
        Ok(())
    }
}

/// Render a snapshot as text, one grid row per line
///
/// Tile names are left-aligned to a common column width counted in
/// characters. Undetermined cells print as `?` and empty cells as `!`.
pub fn render_text(snapshot: &GridSnapshot, model: &AdjacencyModel) -> String {
    let column = model
        .tiles()
        .filter_map(|tile| model.tile_name(tile))
        .chain([UNDETERMINED_MARKER, CONTRADICTION_MARKER])
        .map(|label| label.chars().count())
        .max()
        .unwrap_or(1);

    let mut text = String::new();
    for y in 0..snapshot.height() {
        let row: Vec<String> = (0..snapshot.width())
            .map(|x| {
                let label = match snapshot.cell(Coord::new(x, y)) {
                    Some(CellState::Assigned(tile)) => model.tile_name(*tile).unwrap_or_default(),
                    Some(CellState::Open(_)) => UNDETERMINED_MARKER,
                    Some(CellState::Empty) | None => CONTRADICTION_MARKER,
                };
                format!("{label:<column$}")
            })
            .collect();
        let _ = writeln!(text, "{}", row.join(" ").trim_end());
    }
    text
}
