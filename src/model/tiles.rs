use crate::io::configuration::DEFAULT_RULE_WEIGHT;
use crate::io::error::ValidationError;
use std::fmt;
use std::str::FromStr;

/// Index handle for a tile inside an [`AdjacencyModel`](crate::model::AdjacencyModel)
///
/// Handles are dense, zero-based and ordered the same way the tiles were
/// declared, which makes them the canonical iteration order for sampling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileId(usize);

impl TileId {
    /// Wrap a zero-based tile index
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Zero-based index of this tile
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One of the four edges of a grid cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Side {
    /// Towards decreasing `y`
    Top,
    /// Towards increasing `x`
    Right,
    /// Towards increasing `y`
    Bottom,
    /// Towards decreasing `x`
    Left,
}

impl Side {
    /// All sides in propagation order
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    /// The side facing back from the neighbour
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Right => Self::Left,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
        }
    }

    /// Position of this side in [`Side::ALL`]
    pub const fn index(self) -> usize {
        match self {
            Self::Top => 0,
            Self::Right => 1,
            Self::Bottom => 2,
            Self::Left => 3,
        }
    }

    /// Unit step `(dx, dy)` towards the neighbour on this side
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Self::Top => (0, -1),
            Self::Right => (1, 0),
            Self::Bottom => (0, 1),
            Self::Left => (-1, 0),
        }
    }

    /// Lowercase name used by the atlas format
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "right" => Ok(Self::Right),
            "bottom" => Ok(Self::Bottom),
            "left" => Ok(Self::Left),
            _ => Err(ValidationError::InvalidSide {
                value: s.to_string(),
            }),
        }
    }
}

/// A tile variant as supplied by the rule editor
#[derive(Clone, Debug, PartialEq)]
pub struct TileSpec {
    /// Unique tile identifier, e.g. `grass` or `road_r90_fx`
    pub name: String,
    /// Base likelihood used when sampling a collapse
    pub weight: f64,
}

/// Directional adjacency rule: `neighbor` may sit on `side` of `tile`
#[derive(Clone, Debug, PartialEq)]
pub struct RuleSpec {
    /// Tile owning the rule
    pub tile: String,
    /// Side of `tile` the neighbour touches
    pub side: Side,
    /// Tile allowed on that side
    pub neighbor: String,
    /// Relative likelihood, stored as a percentage of the side's total
    pub weight: f64,
    /// Whether the rule was generated from another rule by the editor
    pub auto_generated: bool,
}

/// Unvalidated collection of tiles and rules
///
/// This is the input to [`AdjacencyModel::new`](crate::model::AdjacencyModel::new).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuleSet {
    /// Declared tiles, in handle order
    pub tiles: Vec<TileSpec>,
    /// Authored rules
    pub rules: Vec<RuleSpec>,
}

impl RuleSet {
    /// Create an empty rule set
    pub const fn new() -> Self {
        Self {
            tiles: Vec::new(),
            rules: Vec::new(),
        }
    }

    /// Declare a tile with the given base weight
    #[must_use]
    pub fn with_tile(mut self, name: impl Into<String>, weight: f64) -> Self {
        self.tiles.push(TileSpec {
            name: name.into(),
            weight,
        });
        self
    }

    /// Add a rule allowing `neighbor` on `side` of `tile`
    #[must_use]
    pub fn with_rule(
        mut self,
        tile: impl Into<String>,
        side: Side,
        neighbor: impl Into<String>,
        weight: f64,
    ) -> Self {
        self.rules.push(RuleSpec {
            tile: tile.into(),
            side,
            neighbor: neighbor.into(),
            weight,
            auto_generated: false,
        });
        self
    }

    /// Allow a tile next to itself on every side at the default weight
    #[must_use]
    pub fn with_self_adjacency(self, name: &str) -> Self {
        Side::ALL.into_iter().fold(self, |set, side| {
            set.with_rule(name, side, name, DEFAULT_RULE_WEIGHT)
        })
    }

    /// Rules owned by `tile` on `side`
    pub fn rules_for<'a>(&'a self, tile: &'a str, side: Side) -> impl Iterator<Item = &'a RuleSpec> {
        self.rules
            .iter()
            .filter(move |rule| rule.tile == tile && rule.side == side)
    }

    /// Mutable access to the rules owned by `tile` on `side`
    pub fn rules_for_mut<'a>(
        &'a mut self,
        tile: &'a str,
        side: Side,
    ) -> impl Iterator<Item = &'a mut RuleSpec> {
        self.rules
            .iter_mut()
            .filter(move |rule| rule.tile == tile && rule.side == side)
    }
}
