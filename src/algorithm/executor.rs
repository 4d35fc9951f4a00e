//! Steppable solver state machine
//!
//! A [`Solver`] owns one grid, one propagation queue and one random stream for
//! the lifetime of a solve. Callers drive it one cycle at a time with
//! [`Solver::step`] or to a terminal state with [`Solver::run`], reading
//! immutable snapshots in between.

use ndarray::Array2;
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::{
    algorithm::{
        cache::{CacheStats, SupportCache},
        domain::Domain,
        propagation::{PropagationOutcome, PropagationQueue, PropagationReport, propagate, seed_all},
        selection::{Observation, collapse_weights, observe},
    },
    io::{
        configuration::MAX_GRID_DIMENSION,
        error::{Result, SolverError},
    },
    math::probability::cumulative_index,
    model::{AdjacencyModel, TileId},
    spatial::{Coord, Grid, GridSnapshot},
};

/// Fixed tile assignments applied before the first step, keyed by cell
pub type PrePlacements = BTreeMap<Coord, TileId>;

/// Seeded random selector for reproducible stochastic choices
#[derive(Debug, Clone)]
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    /// Create a deterministic random selector
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Weighted random selection
    ///
    /// Draws one uniform value and returns the index it lands on in the
    /// cumulative distribution of `weights`.
    pub fn weighted_choice(&mut self, weights: &[f64]) -> usize {
        let sample = self.rng.random::<f64>();
        cumulative_index(weights, sample)
    }

    /// Uniform index in `0..len`, without consuming randomness for `len <= 1`
    pub fn pick_index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.rng.random_range(0..len)
    }
}

/// Per-solve runtime parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolverConfig {
    /// Seed of the random stream
    pub seed: u64,
    /// Capture a checkpoint before every collapse so [`Solver::backtrack`] can roll back
    ///
    /// Each checkpoint is a full copy of the grid's domains and checkpoints are
    /// only released by rolling back, so a solve that never fails holds one copy
    /// per collapse. Memory grows as `cells * cells * tiles` bits in the worst
    /// case regardless of the backtrack budget.
    pub backtracking: bool,
}

impl SolverConfig {
    /// Configuration with the given seed and backtracking disabled
    ///
    /// There is no default seed; callers pick one.
    pub const fn new(seed: u64) -> Self {
        Self {
            seed,
            backtracking: false,
        }
    }

    /// Enable or disable checkpoint capture
    #[must_use]
    pub const fn with_backtracking(mut self, backtracking: bool) -> Self {
        self.backtracking = backtracking;
        self
    }
}

/// Failing cell and the grid as it stood when its domain emptied
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contradiction {
    /// Cell whose domain became empty
    pub cell: Coord,
    /// Grid state at the moment of failure
    pub snapshot: GridSnapshot,
}

/// Lifecycle of a solve
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolverState {
    /// Grid initialised and pre-placements propagated
    Ready,
    /// At least one step has run and undetermined cells remain
    Running,
    /// Every cell holds exactly one tile
    Complete,
    /// Some cell's domain became empty
    Contradiction(Contradiction),
}

impl SolverState {
    /// Lowercase state name for messages
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Running => "running",
            Self::Complete => "complete",
            Self::Contradiction(_) => "contradiction",
        }
    }

    /// True for `Complete` and `Contradiction`
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Contradiction(_))
    }
}

/// What a single step did
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepResult {
    /// State after the step
    pub state: SolverState,
    /// Cell selected for collapse, `None` when nothing was left to select
    pub cell: Option<Coord>,
    /// Tile the selected cell was collapsed to
    pub assignment: Option<TileId>,
    /// Remaining tiles of the selected cell after propagation
    pub domain: Vec<TileId>,
    /// Every cell whose domain shrank during the step, in row-major order
    pub changed: Vec<Coord>,
}

/// Terminal result of a full solve
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolveOutcome {
    /// Every cell assigned
    Complete(GridSnapshot),
    /// The search failed at a cell
    Contradiction(Contradiction),
    /// A cancellation signal was observed between steps
    Cancelled {
        /// Partial grid at the point of cancellation
        snapshot: GridSnapshot,
        /// Steps completed by this solver
        steps: usize,
    },
}

impl SolveOutcome {
    /// Grid state carried by the outcome
    pub const fn snapshot(&self) -> &GridSnapshot {
        match self {
            Self::Complete(snapshot) | Self::Cancelled { snapshot, .. } => snapshot,
            Self::Contradiction(contradiction) => &contradiction.snapshot,
        }
    }

    /// True for a complete grid
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }
}

/// Cooperative cancellation, polled between steps
pub trait CancelSignal {
    /// Whether the current run should stop before its next step
    fn is_cancelled(&self) -> bool;
}

/// Signal that never fires
#[derive(Clone, Copy, Debug, Default)]
pub struct NeverCancel;

impl CancelSignal for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl CancelSignal for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

/// Signal that fires once a wall-clock instant has passed
#[derive(Clone, Copy, Debug)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    /// Deadline `timeout` from now; a timeout past the clock's range never fires
    pub fn after(timeout: Duration) -> Self {
        Self(Instant::now().checked_add(timeout))
    }
}

impl CancelSignal for Deadline {
    fn is_cancelled(&self) -> bool {
        self.0.is_some_and(|instant| Instant::now() >= instant)
    }
}

// An absent signal never fires
impl<T: CancelSignal> CancelSignal for Option<T> {
    fn is_cancelled(&self) -> bool {
        self.as_ref().is_some_and(T::is_cancelled)
    }
}

impl<T: CancelSignal + ?Sized> CancelSignal for &T {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

/// Domains saved just before a collapse decision
#[derive(Debug)]
struct Checkpoint {
    domains: Array2<Domain>,
    cell: Coord,
    tile: TileId,
}

/// Wave function collapse solver over a rectangular grid
///
/// Each step selects the minimum-entropy cell, collapses it by weighted
/// sampling and propagates to a fixed point. Contradictions end the solve as
/// a state, never as an error.
#[derive(Debug)]
pub struct Solver<'m> {
    model: &'m AdjacencyModel,
    grid: Grid,
    queue: PropagationQueue,
    cache: SupportCache,
    selector: RandomSelector,
    config: SolverConfig,
    state: SolverState,
    checkpoints: Vec<Checkpoint>,
    steps: usize,
    backtracks: usize,
}

impl<'m> Solver<'m> {
    /// Initialise a grid of full domains and apply the pre-placements
    ///
    /// Pre-placed cells are collapsed and propagated before this returns. A
    /// single-tile model also propagates every cell, since those cells start
    /// out collapsed and would otherwise never be checked.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Either dimension is zero or above [`MAX_GRID_DIMENSION`]
    /// - A pre-placement lies outside the grid or names an unknown tile
    /// - The pre-placements contradict each other after propagation
    pub fn new(
        model: &'m AdjacencyModel,
        width: usize,
        height: usize,
        placements: &PrePlacements,
        config: SolverConfig,
    ) -> Result<Self> {
        if width == 0 || height == 0 || width > MAX_GRID_DIMENSION || height > MAX_GRID_DIMENSION {
            return Err(SolverError::InvalidDimensions { width, height });
        }

        let mut grid = Grid::new(width, height, model.tile_count());
        let mut queue = PropagationQueue::new(width, height);
        let mut cache = SupportCache::new();

        for (&coord, &tile) in placements {
            let name = model
                .tile_name(tile)
                .map_or_else(|| tile.to_string(), str::to_owned);
            if !grid.contains(coord) {
                return Err(SolverError::InvalidPrePlacement {
                    coord,
                    tile: name,
                    reason: format!("outside the {width}x{height} grid"),
                });
            }
            if tile.index() >= model.tile_count() {
                return Err(SolverError::InvalidPrePlacement {
                    coord,
                    tile: name,
                    reason: "unknown tile".to_owned(),
                });
            }
            grid.collapse(coord, tile);
            queue.push(coord);
        }
        if model.tile_count() == 1 {
            seed_all(&grid, &mut queue);
        }

        let report = propagate(&mut grid, model, &mut queue, &mut cache);
        let state = match report.outcome {
            PropagationOutcome::FixedPoint => SolverState::Ready,
            PropagationOutcome::Contradiction(cell) => {
                let contradiction = Contradiction {
                    cell,
                    snapshot: grid.snapshot(),
                };
                if !placements.is_empty() {
                    return Err(SolverError::UnsatisfiablePrePlacement(Box::new(contradiction)));
                }
                SolverState::Contradiction(contradiction)
            }
        };

        tracing::debug!(
            width,
            height,
            seed = config.seed,
            placements = placements.len(),
            tiles = model.tile_count(),
            "solver initialised"
        );

        Ok(Self {
            model,
            grid,
            queue,
            cache,
            selector: RandomSelector::new(config.seed),
            config,
            state,
            checkpoints: Vec::new(),
            steps: 0,
            backtracks: 0,
        })
    }

    /// Run exactly one select, collapse and propagate cycle
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidState`] if the solver is already
    /// complete or in contradiction.
    pub fn step(&mut self) -> Result<StepResult> {
        if self.state.is_terminal() {
            return Err(SolverError::InvalidState {
                operation: "step",
                state: self.state.name(),
            });
        }
        Ok(self.advance())
    }

    fn advance(&mut self) -> StepResult {
        self.state = SolverState::Running;

        let cell = match observe(&self.grid, self.model, &mut self.selector) {
            Observation::Complete => {
                self.state = SolverState::Complete;
                return self.result(None, None, Vec::new());
            }
            Observation::Contradiction(cell) => {
                self.fail(cell);
                return self.result(Some(cell), None, Vec::new());
            }
            Observation::Cell(cell) => cell,
        };

        let candidates = collapse_weights(&self.grid, self.model, cell);
        let weights: Vec<f64> = candidates.iter().map(|&(_, weight)| weight).collect();
        let choice = self.selector.weighted_choice(&weights);
        let Some(&(tile, _)) = candidates.get(choice) else {
            self.fail(cell);
            return self.result(Some(cell), None, Vec::new());
        };

        if self.config.backtracking {
            self.checkpoints.push(Checkpoint {
                domains: self.grid.domains().clone(),
                cell,
                tile,
            });
        }

        self.steps += 1;
        let mut changed = Vec::new();
        if self.grid.collapse(cell, tile) {
            changed.push(cell);
        }
        self.queue.push(cell);
        let report = propagate(&mut self.grid, self.model, &mut self.queue, &mut self.cache);
        changed.extend(report.changed.iter().copied());
        changed.sort_unstable();
        changed.dedup();

        tracing::debug!(
            step = self.steps,
            %cell,
            tile = self.model.tile_name(tile).unwrap_or_default(),
            changed = changed.len(),
            "collapsed cell"
        );

        match report.outcome {
            PropagationOutcome::Contradiction(failed) => self.fail(failed),
            PropagationOutcome::FixedPoint if self.grid.is_complete() => {
                self.state = SolverState::Complete;
            }
            PropagationOutcome::FixedPoint => {}
        }
        self.result(Some(cell), Some(tile), changed)
    }

    fn result(
        &self,
        cell: Option<Coord>,
        assignment: Option<TileId>,
        changed: Vec<Coord>,
    ) -> StepResult {
        let domain = cell
            .and_then(|cell| self.grid.domain(cell))
            .map(|domain| domain.candidates().collect())
            .unwrap_or_default();
        StepResult {
            state: self.state.clone(),
            cell,
            assignment,
            domain,
            changed,
        }
    }

    fn fail(&mut self, cell: Coord) {
        tracing::warn!(%cell, steps = self.steps, seed = self.config.seed, "contradiction");
        self.queue.clear();
        self.state = SolverState::Contradiction(Contradiction {
            cell,
            snapshot: self.grid.snapshot(),
        });
    }

    /// Step until a terminal state, polling `cancel` before every step
    pub fn run(&mut self, cancel: &impl CancelSignal) -> SolveOutcome {
        loop {
            if let Some(outcome) = self.outcome() {
                return outcome;
            }
            if cancel.is_cancelled() {
                tracing::debug!(steps = self.steps, "solve cancelled");
                return SolveOutcome::Cancelled {
                    snapshot: self.grid.snapshot(),
                    steps: self.steps,
                };
            }
            self.advance();
        }
    }

    /// Step until a terminal state
    pub fn solve(&mut self) -> SolveOutcome {
        self.run(&NeverCancel)
    }

    /// Outcome of a terminal state, `None` while the solve can still step
    pub fn outcome(&self) -> Option<SolveOutcome> {
        match &self.state {
            SolverState::Complete => Some(SolveOutcome::Complete(self.grid.snapshot())),
            SolverState::Contradiction(contradiction) => {
                Some(SolveOutcome::Contradiction(contradiction.clone()))
            }
            SolverState::Ready | SolverState::Running => None,
        }
    }

    /// Roll back to the most recent collapse and exclude the tile chosen there
    ///
    /// Pops one checkpoint, restores its domains, removes the tile that led to
    /// the failure from the restored cell and propagates that removal. The
    /// solver is running again if that succeeds and stays in contradiction
    /// otherwise, ready for another call. Returns `false` once no checkpoint
    /// is left.
    ///
    /// Restoring a checkpoint is the one operation that grows domains again.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidState`] unless the solver is in
    /// contradiction.
    pub fn backtrack(&mut self) -> Result<bool> {
        if !matches!(self.state, SolverState::Contradiction(_)) {
            return Err(SolverError::InvalidState {
                operation: "backtrack",
                state: self.state.name(),
            });
        }
        let Some(Checkpoint {
            domains,
            cell,
            tile,
        }) = self.checkpoints.pop()
        else {
            return Ok(false);
        };

        self.backtracks += 1;
        self.queue.clear();
        self.grid.restore(domains);
        self.grid.remove(cell, tile);

        tracing::debug!(
            %cell,
            tile = self.model.tile_name(tile).unwrap_or_default(),
            depth = self.checkpoints.len(),
            backtracks = self.backtracks,
            "backtracked"
        );

        if let Some(failed) = self.grid.contradiction() {
            self.fail(failed);
            return Ok(true);
        }
        self.queue.push(cell);
        let report = propagate(&mut self.grid, self.model, &mut self.queue, &mut self.cache);
        match report.outcome {
            PropagationOutcome::Contradiction(failed) => self.fail(failed),
            PropagationOutcome::FixedPoint if self.grid.is_complete() => {
                self.state = SolverState::Complete;
            }
            PropagationOutcome::FixedPoint => self.state = SolverState::Running,
        }
        Ok(true)
    }

    /// Enqueue every cell and propagate to a fixed point
    ///
    /// On a grid already at a fixed point this changes nothing and reports no
    /// enqueued cells.
    pub fn propagate_all(&mut self) -> PropagationReport {
        seed_all(&self.grid, &mut self.queue);
        let report = propagate(&mut self.grid, self.model, &mut self.queue, &mut self.cache);
        if let PropagationOutcome::Contradiction(cell) = report.outcome
            && !matches!(self.state, SolverState::Contradiction(_))
        {
            self.fail(cell);
        }
        report
    }

    /// Current state
    pub const fn state(&self) -> &SolverState {
        &self.state
    }

    /// Read-only view of the grid
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Model the solver queries
    pub const fn model(&self) -> &'m AdjacencyModel {
        self.model
    }

    /// Immutable copy of every cell's state
    pub fn snapshot(&self) -> GridSnapshot {
        self.grid.snapshot()
    }

    /// Runtime configuration
    pub const fn config(&self) -> SolverConfig {
        self.config
    }

    /// Collapse decisions made so far
    pub const fn steps(&self) -> usize {
        self.steps
    }

    /// Checkpoints popped by [`Solver::backtrack`] so far
    pub const fn backtracks(&self) -> usize {
        self.backtracks
    }

    /// Number of checkpoints currently saved
    pub const fn checkpoint_depth(&self) -> usize {
        self.checkpoints.len()
    }

    /// Hit and miss counts of the neighbour support cache
    pub const fn cache_stats(&self) -> CacheStats {
        self.cache.stats
    }
}
