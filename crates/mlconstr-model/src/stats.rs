//! Optimize statistics.

use std::time::{Duration, Instant};

/// Statistics of the last optimize run.
///
/// # Example
///
/// ```
/// use mlconstr_model::OptimizeStats;
///
/// let mut stats = OptimizeStats::default();
/// stats.start();
/// stats.record_pass();
/// stats.record_fixed();
/// stats.record_propagated();
///
/// assert_eq!(stats.passes, 1);
/// assert_eq!(stats.determined(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct OptimizeStats {
    start_time: Option<Instant>,
    runtime: Option<Duration>,
    /// Propagation passes over the constraints.
    pub passes: u64,
    /// Variables fixed by their own bounds.
    pub fixed_by_bounds: u64,
    /// Variables whose value followed from a constraint.
    pub propagated: u64,
    /// Variables left free and placed at their default value.
    pub defaulted: u64,
}

impl OptimizeStats {
    /// Marks the start of optimization.
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
        self.runtime = None;
    }

    /// Freezes the runtime.
    pub fn finish(&mut self) {
        self.runtime = Some(self.elapsed());
    }

    /// Time spent optimizing; the frozen runtime once finished.
    pub fn elapsed(&self) -> Duration {
        self.runtime
            .or_else(|| self.start_time.map(|t| t.elapsed()))
            .unwrap_or_default()
    }

    pub fn record_pass(&mut self) {
        self.passes += 1;
    }

    pub fn record_fixed(&mut self) {
        self.fixed_by_bounds += 1;
    }

    pub fn record_propagated(&mut self) {
        self.propagated += 1;
    }

    pub fn record_defaulted(&mut self) {
        self.defaulted += 1;
    }

    /// Variables whose value was forced rather than defaulted.
    pub fn determined(&self) -> u64 {
        self.fixed_by_bounds + self.propagated
    }
}
