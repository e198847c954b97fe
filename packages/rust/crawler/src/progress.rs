//! Progress callbacks for long-running catalog walks.

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called right before a page is fetched.
    fn page_visited(&self, url: &str);
    /// Called when the run completes with the number of records collected.
    fn done(&self, records: usize);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn page_visited(&self, _url: &str) {}
    fn done(&self, _records: usize) {}
}
