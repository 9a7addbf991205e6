/*!
 * Progress reporting for aggregation runs
 */

use indicatif::ProgressBar;

/// Trait for reporting run progress
pub trait ProgressSink {
    /// Called after each top-level selection item has been processed
    fn report(&self, progress: &GatherProgress);
}

/// Progress over the top-level selection items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatherProgress {
    /// Number of top-level items processed so far
    pub processed: usize,
    /// Total number of top-level items
    pub total: usize,
}

impl GatherProgress {
    /// Get the progress percentage
    pub fn percentage(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }

        ((self.processed * 100) / self.total) as u8
    }
}

// Implement ProgressSink for closures
impl<F> ProgressSink for F
where
    F: Fn(&GatherProgress),
{
    fn report(&self, progress: &GatherProgress) {
        self(progress)
    }
}

/// Sink driving a terminal progress bar
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new(bar: ProgressBar) -> Self {
        Self { bar }
    }
}

impl ProgressSink for BarProgress {
    fn report(&self, progress: &GatherProgress) {
        self.bar.set_length(progress.total as u64);
        self.bar.set_position(progress.processed as u64);
    }
}

/// Sink that discards every update
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _progress: &GatherProgress) {}
}
