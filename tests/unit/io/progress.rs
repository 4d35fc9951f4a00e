//! Tests for the solve progress display

#[cfg(test)]
mod tests {
    use tilewave::algorithm::recovery::RecoveryEvent;
    use tilewave::io::progress::ProgressReporter;
    use tilewave::spatial::Coord;

    // Tests every event kind is accepted in a typical sequence
    // Verified by panicking on a length change
    #[test]
    fn test_handle_event_sequence() {
        let progress = ProgressReporter::new(4);

        progress.handle(RecoveryEvent::AttemptStarted {
            attempt: 1,
            seed: 42,
        });
        progress.handle(RecoveryEvent::Stepped {
            collapsed: 2,
            total: 4,
        });
        progress.handle(RecoveryEvent::Failed {
            attempt: 1,
            cell: Coord::new(1, 1),
        });
        progress.handle(RecoveryEvent::AttemptStarted {
            attempt: 2,
            seed: 43,
        });
        progress.handle(RecoveryEvent::Backtracked { backtracks: 1 });
        progress.handle(RecoveryEvent::Stepped {
            collapsed: 4,
            total: 4,
        });
        progress.finish();
    }

    // Tests an empty grid bar can be created and finished
    // Verified by dividing by the cell count
    #[test]
    fn test_empty_grid() {
        let progress = ProgressReporter::new(0);
        progress.finish();
    }
}
