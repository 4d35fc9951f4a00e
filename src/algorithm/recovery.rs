//! Caller-side retry strategies for contradictions
//!
//! The solver reports a contradiction and stops. This driver decides what to
//! do next: report it, restart from a fresh seed, or roll back through the
//! solver's checkpoints.

use crate::{
    algorithm::executor::{
        CancelSignal, PrePlacements, SolveOutcome, Solver, SolverConfig, SolverState,
    },
    io::configuration::{DEFAULT_ATTEMPTS, DEFAULT_MAX_BACKTRACKS},
    io::error::Result,
    model::AdjacencyModel,
    spatial::Coord,
};

/// What to do when a solve ends in contradiction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RecoveryPolicy {
    /// Run once and report whatever happens
    #[default]
    Report,
    /// Reinitialise with seed, seed + 1, ... up to `attempts` solves
    Restart {
        /// Total solves to try, at least one
        attempts: usize,
    },
    /// Roll back through checkpoints within a single solve
    Backtrack {
        /// Checkpoints that may be popped before giving up
        max_backtracks: usize,
    },
}

impl RecoveryPolicy {
    /// Restart policy with the default attempt count
    pub const fn restart() -> Self {
        Self::Restart {
            attempts: DEFAULT_ATTEMPTS,
        }
    }

    /// Backtracking policy with the default rollback budget
    pub const fn backtrack() -> Self {
        Self::Backtrack {
            max_backtracks: DEFAULT_MAX_BACKTRACKS,
        }
    }

    const fn attempts(self) -> usize {
        match self {
            Self::Restart { attempts } if attempts > 1 => attempts,
            Self::Report | Self::Restart { .. } | Self::Backtrack { .. } => 1,
        }
    }
}

/// Inputs shared by every attempt
#[derive(Clone, Copy, Debug)]
pub struct SolveRequest<'a> {
    /// Adjacency model to solve against
    pub model: &'a AdjacencyModel,
    /// Grid width
    pub width: usize,
    /// Grid height
    pub height: usize,
    /// Cells fixed before solving; kept across restarts
    pub placements: &'a PrePlacements,
    /// Seed of the first attempt
    pub seed: u64,
}

/// Progress notifications emitted while driving a solve
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecoveryEvent {
    /// A fresh solver was created
    AttemptStarted {
        /// One-based attempt number
        attempt: usize,
        /// Seed of this attempt
        seed: u64,
    },
    /// A step finished
    Stepped {
        /// Cells currently collapsed
        collapsed: usize,
        /// Cells in the grid
        total: usize,
    },
    /// The solver rolled back to an earlier checkpoint
    Backtracked {
        /// Checkpoints popped so far
        backtracks: usize,
    },
    /// An attempt ended in contradiction
    Failed {
        /// One-based attempt number
        attempt: usize,
        /// Cell whose domain emptied
        cell: Coord,
    },
}

/// Final outcome of a recovery run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecoveryReport {
    /// Outcome of the last attempt
    pub outcome: SolveOutcome,
    /// Solves started
    pub attempts: usize,
    /// Checkpoints popped in the last attempt
    pub backtracks: usize,
    /// Seed of the last attempt
    pub seed: u64,
}

/// Solve, applying `policy` whenever an attempt ends in contradiction
///
/// Cancellation is checked between steps and ends the run with the partial
/// grid of the current attempt.
///
/// # Errors
///
/// Returns an error if the grid cannot be initialised, including
/// pre-placements that contradict each other; restarting cannot fix those
/// since initialisation does not depend on the seed.
pub fn solve_with_recovery(
    request: &SolveRequest<'_>,
    policy: RecoveryPolicy,
    cancel: &impl CancelSignal,
    mut observer: impl FnMut(RecoveryEvent),
) -> Result<RecoveryReport> {
    let backtracking = matches!(policy, RecoveryPolicy::Backtrack { .. });
    let max_backtracks = match policy {
        RecoveryPolicy::Backtrack { max_backtracks } => max_backtracks,
        RecoveryPolicy::Report | RecoveryPolicy::Restart { .. } => 0,
    };
    let attempts = policy.attempts();

    let mut attempt = 0;
    loop {
        attempt += 1;
        let seed = request.seed.wrapping_add(attempt as u64 - 1);
        observer(RecoveryEvent::AttemptStarted { attempt, seed });

        let config = SolverConfig::new(seed).with_backtracking(backtracking);
        let mut solver = Solver::new(
            request.model,
            request.width,
            request.height,
            request.placements,
            config,
        )?;
        let outcome = drive(&mut solver, max_backtracks, cancel, &mut observer)?;

        let report = RecoveryReport {
            outcome,
            attempts: attempt,
            backtracks: solver.backtracks(),
            seed,
        };
        let SolveOutcome::Contradiction(contradiction) = &report.outcome else {
            tracing::info!(attempt, seed, steps = solver.steps(), "solve finished");
            return Ok(report);
        };

        observer(RecoveryEvent::Failed {
            attempt,
            cell: contradiction.cell,
        });
        if attempt >= attempts {
            tracing::warn!(attempt, cell = %contradiction.cell, "giving up after contradiction");
            return Ok(report);
        }
        tracing::info!(attempt, seed, cell = %contradiction.cell, "restarting with next seed");
    }
}

fn drive(
    solver: &mut Solver<'_>,
    max_backtracks: usize,
    cancel: &impl CancelSignal,
    observer: &mut impl FnMut(RecoveryEvent),
) -> Result<SolveOutcome> {
    let total = solver.grid().cell_count();
    loop {
        if matches!(solver.state(), SolverState::Contradiction(_))
            && solver.backtracks() < max_backtracks
            && solver.backtrack()?
        {
            observer(RecoveryEvent::Backtracked {
                backtracks: solver.backtracks(),
            });
            continue;
        }
        if let Some(outcome) = solver.outcome() {
            return Ok(outcome);
        }
        if cancel.is_cancelled() {
            return Ok(SolveOutcome::Cancelled {
                snapshot: solver.snapshot(),
                steps: solver.steps(),
            });
        }

        solver.step()?;
        observer(RecoveryEvent::Stepped {
            collapsed: solver.grid().collapsed_count(),
            total,
        });
    }
}
