//! Core types for declarative resource management

use serde::{Deserialize, Serialize};

/// Observed state of a resource relative to its desired state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ResourceState {
    /// Already matches the desired state
    Converged { details: Option<String> },
    /// Exists but differs from the desired state
    Drifted { from: String, to: String },
    /// Not present at all; applying will create it
    Missing { to: String },
    /// State cannot be determined
    Unknown { reason: String },
}

impl ResourceState {
    /// Check if the resource already matches
    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged { .. })
    }

    /// Check if applying would change something
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Drifted { .. } | Self::Missing { .. })
    }
}

/// Result of applying a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplyResult {
    /// No changes needed
    NoChange,
    /// Resource was changed
    Modified,
    /// Apply failed
    Failed { error: String },
    /// Apply was skipped
    Skipped { reason: String },
}

impl ApplyResult {
    /// Check if the result represents success (no failure)
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

/// Summary of execution results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteSummary {
    pub modified: usize,
    pub no_change: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ExecuteSummary {
    /// Total number of actual changes made
    pub fn total_changes(&self) -> usize {
        self.modified
    }

    /// Check if execution was fully successful (no failures)
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Total number of resources processed
    pub fn total(&self) -> usize {
        self.modified + self.no_change + self.skipped + self.failed
    }

    /// Add a result to the summary
    pub fn add_result(&mut self, result: &ApplyResult) {
        match result {
            ApplyResult::NoChange => self.no_change += 1,
            ApplyResult::Modified => self.modified += 1,
            ApplyResult::Failed { .. } => self.failed += 1,
            ApplyResult::Skipped { .. } => self.skipped += 1,
        }
    }
}

/// Options for execution
#[derive(Debug, Clone)]
pub struct ExecuteOptions {
    /// Don't make changes, just report what would happen
    pub dry_run: bool,
    /// Number of resources applied concurrently
    pub jobs: usize,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            jobs: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_predicates() {
        assert!(ResourceState::Converged { details: None }.is_converged());
        assert!(
            ResourceState::Missing {
                to: "true".into()
            }
            .is_pending()
        );
        assert!(
            !ResourceState::Unknown {
                reason: "unknown type".into()
            }
            .is_pending()
        );
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = ExecuteSummary::default();
        summary.add_result(&ApplyResult::Modified);
        summary.add_result(&ApplyResult::NoChange);
        summary.add_result(&ApplyResult::Failed {
            error: "boom".into(),
        });

        assert_eq!(summary.total(), 3);
        assert_eq!(summary.total_changes(), 1);
        assert!(!summary.is_success());

        summary.add_result(&ApplyResult::Skipped {
            reason: "Dry run".into(),
        });
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.total(), 4);
    }
}
