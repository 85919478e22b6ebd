//! Apply context and progress reporting

use crate::types::{ApplyResult, ExecuteSummary};

/// Progress callback for execution operations
///
/// Results arrive in resource order after the parallel batch finishes.
pub trait ProgressCallback: Send {
    /// Called once before any resource is applied
    fn on_start(&mut self, total: usize, dry_run: bool);

    /// Called for every resource with its result
    fn on_resource_complete(&mut self, id: &str, description: &str, result: &ApplyResult);

    /// Called once with the final summary
    fn on_finish(&mut self, summary: &ExecuteSummary);
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_start(&mut self, _total: usize, _dry_run: bool) {}
    fn on_resource_complete(&mut self, _id: &str, _description: &str, _result: &ApplyResult) {}
    fn on_finish(&mut self, _summary: &ExecuteSummary) {}
}

/// Context passed to resource apply operations
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyContext {
    /// Whether this is a dry run (no actual changes)
    pub dry_run: bool,
}

impl ApplyContext {
    /// Create a new apply context
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }
}
