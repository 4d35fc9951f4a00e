//! Tests for the restart and backtracking recovery driver

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;
    use tilewave::algorithm::executor::{NeverCancel, PrePlacements, SolveOutcome};
    use tilewave::algorithm::recovery::{
        RecoveryEvent, RecoveryPolicy, SolveRequest, solve_with_recovery,
    };
    use tilewave::io::configuration::{DEFAULT_ATTEMPTS, DEFAULT_MAX_BACKTRACKS};
    use tilewave::model::{AdjacencyModel, RuleSet, Side, SymmetryPolicy, TileId};
    use tilewave::spatial::Coord;
    use tilewave::SolverError;

    fn stripes() -> AdjacencyModel {
        let rules = RuleSet::new()
            .with_tile("a", 1.0)
            .with_tile("b", 1.0)
            .with_rule("a", Side::Right, "b", 100.0)
            .with_rule("b", Side::Right, "a", 100.0)
            .with_rule("a", Side::Bottom, "a", 100.0)
            .with_rule("b", Side::Bottom, "b", 100.0);
        AdjacencyModel::new(&rules, SymmetryPolicy::Derive).expect("valid stripes model")
    }

    /// Non-commuting horizontal and vertical permutations: no 2x2 solution exists
    fn twisted() -> AdjacencyModel {
        let rules = RuleSet::new()
            .with_tile("t0", 1.0)
            .with_tile("t1", 1.0)
            .with_tile("t2", 1.0)
            .with_rule("t0", Side::Right, "t1", 100.0)
            .with_rule("t1", Side::Right, "t0", 100.0)
            .with_rule("t2", Side::Right, "t2", 100.0)
            .with_rule("t0", Side::Bottom, "t0", 100.0)
            .with_rule("t1", Side::Bottom, "t2", 100.0)
            .with_rule("t2", Side::Bottom, "t1", 100.0);
        AdjacencyModel::new(&rules, SymmetryPolicy::Derive).expect("valid twisted model")
    }

    fn request<'a>(model: &'a AdjacencyModel, placements: &'a PrePlacements) -> SolveRequest<'a> {
        SolveRequest {
            model,
            width: 2,
            height: 2,
            placements,
            seed: 40,
        }
    }

    // Tests default policy constructors use the configured budgets
    // Verified by swapping the two defaults
    #[test]
    fn test_policy_defaults() {
        assert_eq!(RecoveryPolicy::default(), RecoveryPolicy::Report);
        assert_eq!(
            RecoveryPolicy::restart(),
            RecoveryPolicy::Restart {
                attempts: DEFAULT_ATTEMPTS
            }
        );
        assert_eq!(
            RecoveryPolicy::backtrack(),
            RecoveryPolicy::Backtrack {
                max_backtracks: DEFAULT_MAX_BACKTRACKS
            }
        );
    }

    // Tests a solvable grid finishes on the first attempt
    // Verified by starting the attempt counter at zero in the report
    #[test]
    fn test_solvable_single_attempt() {
        let model = stripes();
        let placements = PrePlacements::new();
        let mut events = Vec::new();

        let report = solve_with_recovery(
            &request(&model, &placements),
            RecoveryPolicy::restart(),
            &NeverCancel,
            |event| events.push(event),
        )
        .expect("solve runs");

        assert!(report.outcome.is_complete());
        assert_eq!(report.attempts, 1);
        assert_eq!(report.seed, 40);
        assert_eq!(
            events.first(),
            Some(&RecoveryEvent::AttemptStarted {
                attempt: 1,
                seed: 40
            })
        );
        assert!(matches!(
            events.last(),
            Some(RecoveryEvent::Stepped {
                collapsed: 4,
                total: 4
            })
        ));
    }

    // Tests restarts advance the seed and stop at the attempt budget
    // Verified by reusing the first seed on every attempt
    #[test]
    fn test_restart_advances_seed() {
        let model = twisted();
        let placements = PrePlacements::new();
        let mut seeds = Vec::new();
        let mut failures = 0;

        let report = solve_with_recovery(
            &request(&model, &placements),
            RecoveryPolicy::Restart { attempts: 3 },
            &NeverCancel,
            |event| match event {
                RecoveryEvent::AttemptStarted { seed, .. } => seeds.push(seed),
                RecoveryEvent::Failed { .. } => failures += 1,
                RecoveryEvent::Stepped { .. } | RecoveryEvent::Backtracked { .. } => {}
            },
        )
        .expect("solve runs");

        assert!(matches!(report.outcome, SolveOutcome::Contradiction(_)));
        assert_eq!(report.attempts, 3);
        assert_eq!(report.seed, 42);
        assert_eq!(seeds, vec![40, 41, 42]);
        assert_eq!(failures, 3);
    }

    // Tests the report policy gives up after one contradiction
    // Verified by treating Report like an unbounded restart
    #[test]
    fn test_report_policy_single_attempt() {
        let model = twisted();
        let placements = PrePlacements::new();
        let report = solve_with_recovery(
            &request(&model, &placements),
            RecoveryPolicy::Report,
            &NeverCancel,
            |_| {},
        )
        .expect("solve runs");

        assert_eq!(report.attempts, 1);
        assert_eq!(report.backtracks, 0);
        assert!(matches!(report.outcome, SolveOutcome::Contradiction(_)));
    }

    // Tests backtracking exhausts every branch of an unsolvable grid
    // Verified by never calling backtrack from the driver
    #[test]
    fn test_backtrack_exhausts_unsolvable_grid() {
        let model = twisted();
        let placements = PrePlacements::new();
        let mut rollbacks = 0;

        let report = solve_with_recovery(
            &request(&model, &placements),
            RecoveryPolicy::Backtrack { max_backtracks: 100 },
            &NeverCancel,
            |event| {
                if let RecoveryEvent::Backtracked { .. } = event {
                    rollbacks += 1;
                }
            },
        )
        .expect("solve runs");

        assert!(matches!(report.outcome, SolveOutcome::Contradiction(_)));
        assert_eq!(report.attempts, 1);
        assert!(report.backtracks >= 1);
        assert!(report.backtracks < 100);
        assert_eq!(rollbacks, report.backtracks);
    }

    // Tests the rollback budget is honoured exactly
    // Verified by comparing the budget with less-or-equal
    #[test]
    fn test_backtrack_budget() {
        let model = twisted();
        let placements = PrePlacements::new();
        let report = solve_with_recovery(
            &request(&model, &placements),
            RecoveryPolicy::Backtrack { max_backtracks: 1 },
            &NeverCancel,
            |_| {},
        )
        .expect("solve runs");

        assert_eq!(report.backtracks, 1);
        assert!(matches!(report.outcome, SolveOutcome::Contradiction(_)));
    }

    // Tests cancellation ends the run with a partial grid
    // Verified by ignoring the signal in the driver loop
    #[test]
    fn test_cancelled_run() {
        let model = stripes();
        let placements = PrePlacements::new();
        let cancel = AtomicBool::new(true);

        let report = solve_with_recovery(
            &request(&model, &placements),
            RecoveryPolicy::restart(),
            &cancel,
            |_| {},
        )
        .expect("solve runs");

        assert!(matches!(report.outcome, SolveOutcome::Cancelled { steps: 0, .. }));
        assert_eq!(report.attempts, 1);
    }

    // Tests conflicting placements are an error rather than a retry
    // Verified by restarting after initialisation errors
    #[test]
    fn test_unsatisfiable_placements_error() {
        let model = stripes();
        let placements = PrePlacements::from([
            (Coord::new(0, 0), TileId::new(0)),
            (Coord::new(0, 1), TileId::new(1)),
        ]);

        let result = solve_with_recovery(
            &request(&model, &placements),
            RecoveryPolicy::restart(),
            &NeverCancel,
            |_| {},
        );
        assert!(matches!(result, Err(SolverError::UnsatisfiablePrePlacement(_))));
    }
}
