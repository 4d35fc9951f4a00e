//! Command-line interface for solving an atlas into a tile map

use crate::algorithm::executor::{Deadline, PrePlacements, SolveOutcome};
use crate::algorithm::recovery::{RecoveryPolicy, RecoveryReport, SolveRequest, solve_with_recovery};
use crate::io::atlas::AtlasDocument;
use crate::io::configuration::{DEFAULT_GRID_SIZE, DEFAULT_MAX_BACKTRACKS, DEFAULT_SEED};
use crate::io::error::{Result, SolverError};
use crate::io::prefill::{Placement, PrefillData};
use crate::io::progress::ProgressReporter;
use crate::io::snapshot::{MapDocument, render_text};
use crate::model::validation::{ValidationReport, validate_rules};
use crate::model::{AdjacencyModel, SymmetryPolicy};
use clap::{ArgAction, Parser};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "tilewave")]
#[command(
    author,
    version,
    about = "Fill a grid from tile adjacency rules using wave function collapse"
)]
/// Command-line arguments for the solver
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Atlas document (atlas.json) with tiles and adjacency rules
    #[arg(value_name = "ATLAS")]
    pub atlas: PathBuf,

    /// Grid width in cells
    #[arg(short = 'w', long, default_value_t = DEFAULT_GRID_SIZE)]
    pub width: usize,

    /// Grid height in cells
    #[arg(short = 'H', long, default_value_t = DEFAULT_GRID_SIZE)]
    pub height: usize,

    /// Random seed for reproducible generation
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Fix a cell before solving, e.g. `--place 0,0=grass` (repeatable)
    #[arg(long = "place", value_name = "X,Y=TILE")]
    pub placements: Vec<Placement>,

    /// Take the locked cells of a saved map as pre-placements
    #[arg(long, value_name = "MAP")]
    pub prefill: Option<PathBuf>,

    /// Restart with the next seed after a contradiction, up to this many solves
    #[arg(long, conflicts_with = "backtrack")]
    pub attempts: Option<usize>,

    /// Roll back to earlier collapse decisions after a contradiction
    #[arg(long)]
    pub backtrack: bool,

    /// Maximum rollbacks when backtracking
    #[arg(long, default_value_t = DEFAULT_MAX_BACKTRACKS)]
    pub max_backtracks: usize,

    /// Use rules only in the direction they were authored
    #[arg(long)]
    pub directional: bool,

    /// Stop solving after this many milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Write the map document (JSON) to this path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report rule completeness and exit without solving
    #[arg(long)]
    pub check: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log detail (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Recovery strategy selected by the flags
    pub const fn policy(&self) -> RecoveryPolicy {
        if self.backtrack {
            RecoveryPolicy::Backtrack {
                max_backtracks: self.max_backtracks,
            }
        } else if let Some(attempts) = self.attempts {
            RecoveryPolicy::Restart { attempts }
        } else {
            RecoveryPolicy::Report
        }
    }

    /// Rule symmetry selected by the flags
    pub const fn symmetry(&self) -> SymmetryPolicy {
        if self.directional {
            SymmetryPolicy::Directional
        } else {
            SymmetryPolicy::Derive
        }
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Loads the atlas, runs the solve and writes its results
pub struct MapProcessor {
    cli: Cli,
}

impl MapProcessor {
    /// Create a processor for the given arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the command
    ///
    /// Exits with failure status when the rules are incomplete under
    /// `--check` or the solve ends in contradiction.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The atlas or prefill map cannot be read, or the rules are invalid
    /// - A pre-placement is unknown, out of bounds or unsatisfiable
    /// - The output map cannot be written
    /// - The timeout expires before the solve finishes
    // Allow print for the solved map and user-facing reports
    #[allow(clippy::print_stdout, clippy::print_stderr)]
    pub fn process(&self) -> Result<ExitCode> {
        let rule_set = AtlasDocument::load(&self.cli.atlas)?.into_rule_set()?;
        let model = AdjacencyModel::new(&rule_set, self.cli.symmetry())?;
        tracing::info!(
            tiles = model.tile_count(),
            rules = model.rule_count(),
            policy = ?model.policy(),
            "built adjacency model"
        );

        if self.cli.check {
            let report = validate_rules(&model);
            print!("{}", format_report(&report));
            return Ok(if report.is_valid() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            });
        }

        let placements = self.placements(&model)?;
        let result = self.solve(&model, &placements)?;

        print!("{}", render_text(result.outcome.snapshot(), &model));
        if let Some(path) = &self.cli.output {
            MapDocument::from_outcome(&result.outcome, &model, &placements, result.seed)
                .save(path)?;
        }

        match result.outcome {
            SolveOutcome::Complete(_) => Ok(ExitCode::SUCCESS),
            SolveOutcome::Contradiction(contradiction) => {
                eprintln!(
                    "Contradiction at {} after {} attempt(s), last seed {}",
                    contradiction.cell, result.attempts, result.seed
                );
                Ok(ExitCode::FAILURE)
            }
            SolveOutcome::Cancelled { steps, .. } => Err(SolverError::Cancelled { steps }),
        }
    }

    fn placements(&self, model: &AdjacencyModel) -> Result<PrePlacements> {
        let mut prefill = match &self.cli.prefill {
            Some(path) => PrefillData::from_map_file(path)?,
            None => PrefillData::new(),
        };
        // Command-line placements override the map
        for placement in &self.cli.placements {
            prefill.insert(placement.clone());
        }
        prefill.resolve(model)
    }

    fn solve(&self, model: &AdjacencyModel, placements: &PrePlacements) -> Result<RecoveryReport> {
        let request = SolveRequest {
            model,
            width: self.cli.width,
            height: self.cli.height,
            placements,
            seed: self.cli.seed,
        };
        let deadline = self
            .cli
            .timeout_ms
            .map(|timeout| Deadline::after(Duration::from_millis(timeout)));
        let progress = self
            .cli
            .should_show_progress()
            .then(|| ProgressReporter::new(self.cli.width.saturating_mul(self.cli.height)));

        let result = solve_with_recovery(&request, self.cli.policy(), &deadline, |event| {
            if let Some(progress) = &progress {
                progress.handle(event);
            }
        });

        if let Some(progress) = &progress {
            progress.finish();
        }
        result
    }
}

/// Human-readable completeness report
pub fn format_report(report: &ValidationReport) -> String {
    let mut text = String::new();
    for (name, tile) in &report.tiles {
        for side in &tile.missing_sides {
            let _ = writeln!(text, "error: {name} has no neighbour on {side}");
        }
        for (side, total) in &tile.incomplete_sides {
            let _ = writeln!(text, "warning: {name} {side} weights total {total:.2}");
        }
    }
    for name in &report.orphan_tiles {
        let _ = writeln!(text, "error: {name} has no rules");
    }
    let _ = writeln!(
        text,
        "{} error(s), {} warning(s)",
        report.error_count(),
        report.warning_count()
    );
    text
}
