//! Terminal progress display for solve attempts

use crate::algorithm::recovery::RecoveryEvent;
use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{prefix}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Single progress bar tracking collapsed cells of the current attempt
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Create a bar sized for a grid of `cell_count` cells
    pub fn new(cell_count: usize) -> Self {
        let bar = ProgressBar::new(cell_count as u64);
        bar.set_style(PROGRESS_STYLE.clone());
        Self { bar }
    }

    /// Update the display for a solver event
    pub fn handle(&self, event: RecoveryEvent) {
        match event {
            RecoveryEvent::AttemptStarted { attempt, seed } => {
                self.bar.set_position(0);
                self.bar.set_prefix(format!("attempt {attempt} (seed {seed})"));
                self.bar.set_message(String::new());
            }
            RecoveryEvent::Stepped { collapsed, total } => {
                self.bar.set_length(total as u64);
                self.bar.set_position(collapsed as u64);
            }
            RecoveryEvent::Backtracked { backtracks } => {
                self.bar.set_message(format!("{backtracks} backtracks"));
            }
            RecoveryEvent::Failed { cell, .. } => {
                self.bar.set_message(format!("contradiction at {cell}"));
            }
        }
    }

    /// Remove the bar from the terminal
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
