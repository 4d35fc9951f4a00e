//! Atlas document: the tile and rule schema exported by the rule editor
//!
//! Only the `atlas.json` document is read here. Extracting it from its
//! archive container and loading tile images is left to other tools.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::io::configuration::{DEFAULT_RULE_WEIGHT, DEFAULT_TILE_WEIGHT, MAP_FORMAT_VERSION};
use crate::io::error::{Result, ValidationError, WithPath};
use crate::model::{RuleSet, RuleSpec, Side, TileSpec};

/// Deserialized `atlas.json`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AtlasDocument {
    /// Document format version
    #[serde(default = "default_version")]
    pub version: String,
    /// Tile variants, including generated rotations and flips
    #[serde(default)]
    pub tiles: Vec<AtlasTile>,
    /// Adjacency rules between tile variants
    #[serde(default)]
    pub rules: Vec<AtlasRule>,
}

/// One tile variant of the atlas
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AtlasTile {
    /// Unique variant identifier, e.g. `road_r90_fx`
    pub id: String,
    /// Identifier of the source image the variant was derived from
    #[serde(default, rename = "base", alias = "base_tile_id")]
    pub base: Option<String>,
    /// Clockwise rotation in degrees
    #[serde(default)]
    pub rotation: u16,
    /// Mirrored horizontally
    #[serde(default)]
    pub flip_x: bool,
    /// Mirrored vertically
    #[serde(default)]
    pub flip_y: bool,
    /// Whether the variant takes part in solving
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Base sampling weight
    #[serde(default = "default_tile_weight")]
    pub weight: f64,
}

/// One directional adjacency rule of the atlas
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AtlasRule {
    /// Tile owning the rule
    pub tile: String,
    /// `top`, `right`, `bottom` or `left`
    pub side: String,
    /// Tile allowed on that side
    pub neighbor: String,
    /// Percentage weight of this neighbour among the side's rules
    #[serde(default = "default_rule_weight")]
    pub weight: f64,
    /// Generated by the editor from another rule
    #[serde(default, rename = "auto")]
    pub auto_generated: bool,
}

fn default_version() -> String {
    MAP_FORMAT_VERSION.to_owned()
}

const fn default_enabled() -> bool {
    true
}

const fn default_tile_weight() -> f64 {
    DEFAULT_TILE_WEIGHT
}

const fn default_rule_weight() -> f64 {
    DEFAULT_RULE_WEIGHT
}

impl AtlasDocument {
    /// Read and parse an atlas document
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid atlas
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).with_path(path, "read atlas")?;
        let document = Self::parse(&text).with_path(path, "parse atlas")?;
        tracing::debug!(
            path = %path.display(),
            tiles = document.tiles.len(),
            rules = document.rules.len(),
            "loaded atlas"
        );
        Ok(document)
    }

    /// Parse an atlas document from JSON text
    ///
    /// # Errors
    ///
    /// Returns the parser error for malformed JSON or missing required fields
    pub fn parse(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Convert the enabled tiles and their rules into a [`RuleSet`]
    ///
    /// Rules touching a disabled tile are dropped. Rules naming tiles the
    /// atlas never declares are kept so model construction can report them.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidSide`] for an unrecognised side name
    pub fn into_rule_set(self) -> std::result::Result<RuleSet, ValidationError> {
        let disabled: HashSet<&str> = self
            .tiles
            .iter()
            .filter(|tile| !tile.enabled)
            .map(|tile| tile.id.as_str())
            .collect();

        let mut rules = Vec::with_capacity(self.rules.len());
        let mut dropped = 0;
        for rule in &self.rules {
            if disabled.contains(rule.tile.as_str()) || disabled.contains(rule.neighbor.as_str()) {
                dropped += 1;
                continue;
            }
            rules.push(RuleSpec {
                tile: rule.tile.clone(),
                side: rule.side.parse::<Side>()?,
                neighbor: rule.neighbor.clone(),
                weight: rule.weight,
                auto_generated: rule.auto_generated,
            });
        }

        let tiles: Vec<TileSpec> = self
            .tiles
            .into_iter()
            .filter(|tile| tile.enabled)
            .map(|tile| TileSpec {
                name: tile.id,
                weight: tile.weight,
            })
            .collect();

        if dropped > 0 {
            tracing::debug!(dropped, "skipped rules of disabled tiles");
        }
        Ok(RuleSet { tiles, rules })
    }
}
