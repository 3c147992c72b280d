//! Progress reporting for review cycles.

use council_application::ReviewProgress;
use council_domain::{ReviewerOutcome, Verdict};
use indicatif::{ProgressBar, ProgressStyle};

/// Console progress bar tracking reviewer completion.
pub struct ConsoleProgress {
    bar: ProgressBar,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::hidden();
        bar.set_style(Self::style());
        Self { bar }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:20.cyan/dim}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("●○-")
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewProgress for ConsoleProgress {
    fn on_dispatch(&self, total_reviewers: usize) {
        self.bar.set_length(total_reviewers as u64);
        self.bar.set_prefix("council");
        self.bar.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        self.bar.enable_steady_tick(std::time::Duration::from_millis(120));
    }

    fn on_reviewer_settled(&self, outcome: &ReviewerOutcome) {
        self.bar.inc(1);
        let status = if outcome.is_success() { "ok" } else { "failed" };
        self.bar
            .set_message(format!("{} {}", outcome.reviewer, status));
    }

    fn on_complete(&self, _verdict: &Verdict) {
        self.bar.finish_and_clear();
    }
}
