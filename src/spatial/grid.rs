//! Grid of cell domains and the immutable snapshots handed to callers
//!
//! The grid owns every domain of a solve and keeps the collapsed-cell count and
//! the first contradiction in step with each mutation, so selection never has
//! to rescan for them.

use ndarray::Array2;
use std::cmp::Ordering;
use std::fmt;

use crate::algorithm::bitset::TileBitset;
use crate::algorithm::domain::Domain;
use crate::model::{AdjacencyModel, Side, TileId};

/// Cell position, `x` to the right and `y` downwards
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Coord {
    /// Column
    pub x: usize,
    /// Row
    pub y: usize,
}

impl Coord {
    /// Create a coordinate
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

// Row-major, matching the scan order of selection
impl Ord for Coord {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Coord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Width x height array of domains
#[derive(Clone, Debug)]
pub struct Grid {
    /// Domains indexed `[y, x]`
    domains: Array2<Domain>,
    collapsed: usize,
    contradiction: Option<Coord>,
}

impl Grid {
    /// Create a grid where every cell allows every tile
    pub fn new(width: usize, height: usize, tile_count: usize) -> Self {
        let domains = Array2::from_elem((height, width), Domain::full(tile_count));
        let mut grid = Self {
            domains,
            collapsed: 0,
            contradiction: None,
        };
        grid.recount();
        grid
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.domains.ncols()
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.domains.nrows()
    }

    /// Total number of cells
    pub fn cell_count(&self) -> usize {
        self.domains.len()
    }

    /// Whether the coordinate lies inside the grid
    pub fn contains(&self, coord: Coord) -> bool {
        coord.x < self.width() && coord.y < self.height()
    }

    /// Domain of a cell
    pub fn domain(&self, coord: Coord) -> Option<&Domain> {
        self.domains.get([coord.y, coord.x])
    }

    /// The adjacent cell on `side`, if it lies inside the grid
    pub fn neighbor(&self, coord: Coord, side: Side) -> Option<Coord> {
        let (dx, dy) = side.offset();
        let x = coord.x.checked_add_signed(dx)?;
        let y = coord.y.checked_add_signed(dy)?;
        let neighbor = Coord::new(x, y);
        self.contains(neighbor).then_some(neighbor)
    }

    /// All coordinates in row-major order
    pub fn coords(&self) -> impl Iterator<Item = Coord> + use<> {
        let width = self.width();
        (0..self.cell_count()).map(move |index| Coord::new(index % width, index / width))
    }

    /// Intersect a cell's domain with `allowed`, returning whether it shrank
    pub fn restrict(&mut self, coord: Coord, allowed: &TileBitset) -> bool {
        self.update(coord, |domain| domain.restrict_to(allowed))
    }

    /// Remove a single tile from a cell's domain
    pub fn remove(&mut self, coord: Coord, tile: TileId) -> bool {
        self.update(coord, |domain| domain.remove(tile))
    }

    /// Force a cell to one tile
    pub fn collapse(&mut self, coord: Coord, tile: TileId) -> bool {
        self.update(coord, |domain| domain.collapse_to(tile))
    }

    fn update(&mut self, coord: Coord, change: impl FnOnce(&mut Domain) -> bool) -> bool {
        let Some(domain) = self.domains.get_mut([coord.y, coord.x]) else {
            return false;
        };

        let before = domain.size();
        if !change(domain) {
            return false;
        }
        let after = domain.size();

        if before > 1 && after == 1 {
            self.collapsed += 1;
        } else if before == 1 && after == 0 {
            self.collapsed = self.collapsed.saturating_sub(1);
        }
        if after == 0 && self.contradiction.is_none() {
            self.contradiction = Some(coord);
        }
        true
    }

    /// Number of cells with exactly one tile left
    pub const fn collapsed_count(&self) -> usize {
        self.collapsed
    }

    /// First cell whose domain became empty
    pub const fn contradiction(&self) -> Option<Coord> {
        self.contradiction
    }

    /// Every cell collapsed and none empty
    pub fn is_complete(&self) -> bool {
        self.contradiction.is_none() && self.collapsed == self.cell_count()
    }

    /// Borrow the raw domain array, indexed `[y, x]`
    pub const fn domains(&self) -> &Array2<Domain> {
        &self.domains
    }

    /// Replace every domain with a previously saved array
    ///
    /// Counters are rebuilt from the restored domains. Arrays of a different
    /// shape are ignored and reported as `false`.
    pub fn restore(&mut self, domains: Array2<Domain>) -> bool {
        if domains.dim() != self.domains.dim() {
            return false;
        }
        self.domains = domains;
        self.recount();
        true
    }

    fn recount(&mut self) {
        self.collapsed = self.domains.iter().filter(|d| d.is_collapsed()).count();
        self.contradiction = self
            .domains
            .indexed_iter()
            .find(|(_, domain)| domain.is_contradiction())
            .map(|((y, x), _)| Coord::new(x, y));
    }

    /// Immutable copy of the current cell states
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            cells: self.domains.map(CellState::from_domain),
        }
    }
}

/// Externally visible state of one cell
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CellState {
    /// Exactly one tile remains
    Assigned(TileId),
    /// Several tiles remain, in handle order
    Open(Vec<TileId>),
    /// No tile remains
    Empty,
}

impl CellState {
    fn from_domain(domain: &Domain) -> Self {
        match domain.size() {
            0 => Self::Empty,
            1 => domain.assigned().map_or(Self::Empty, Self::Assigned),
            _ => Self::Open(domain.candidates().collect()),
        }
    }

    /// The tile of an assigned cell
    pub const fn assigned(&self) -> Option<TileId> {
        match self {
            Self::Assigned(tile) => Some(*tile),
            Self::Open(_) | Self::Empty => None,
        }
    }
}

/// Immutable grid state returned to callers between steps
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridSnapshot {
    /// Cell states indexed `[y, x]`
    cells: Array2<CellState>,
}

/// Two assigned neighbours the model does not allow together
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdjacencyViolation {
    /// Cell whose rules are checked
    pub cell: Coord,
    /// Side of `cell` the neighbour sits on
    pub side: Side,
    /// Tile at `cell`
    pub tile: TileId,
    /// Tile on that side
    pub neighbor: TileId,
}

impl GridSnapshot {
    /// Number of columns
    pub fn width(&self) -> usize {
        self.cells.ncols()
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.cells.nrows()
    }

    /// State of one cell
    pub fn cell(&self, coord: Coord) -> Option<&CellState> {
        self.cells.get([coord.y, coord.x])
    }

    /// Tile assigned to a cell, if it is collapsed
    pub fn assigned(&self, coord: Coord) -> Option<TileId> {
        self.cell(coord).and_then(CellState::assigned)
    }

    /// All cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &CellState)> {
        self.cells
            .indexed_iter()
            .map(|((y, x), state)| (Coord::new(x, y), state))
    }

    /// Every cell assigned
    pub fn is_complete(&self) -> bool {
        self.cells
            .iter()
            .all(|state| matches!(state, CellState::Assigned(_)))
    }

    /// List adjacent assigned pairs the model forbids
    ///
    /// Each pair is checked from both cells, so a pair forbidden in both
    /// directions is reported twice.
    pub fn adjacency_violations(&self, model: &AdjacencyModel) -> Vec<AdjacencyViolation> {
        let mut violations = Vec::new();
        for (cell, state) in self.iter() {
            let Some(tile) = state.assigned() else {
                continue;
            };
            for side in Side::ALL {
                let (dx, dy) = side.offset();
                let neighbor = cell
                    .x
                    .checked_add_signed(dx)
                    .zip(cell.y.checked_add_signed(dy))
                    .and_then(|(x, y)| self.assigned(Coord::new(x, y)))
                    .filter(|&neighbor| !model.allows(tile, side, neighbor));
                if let Some(neighbor) = neighbor {
                    violations.push(AdjacencyViolation {
                        cell,
                        side,
                        tile,
                        neighbor,
                    });
                }
            }
        }
        violations
    }
}
