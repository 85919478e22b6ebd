//! macOS defaults resource - one preference entry driven by a [`Reconciler`]

use anyhow::Result;
use declarative::{ApplyContext, ApplyResult, Resource, ResourceState};
use prefkit::{CurrentState, Outcome, Plan, PreferenceEntry, Reconciler};

/// A macOS default preference
#[derive(Debug, Clone)]
pub struct MacOSDefault {
    entry: PreferenceEntry,
    reconciler: Reconciler,
}

impl MacOSDefault {
    pub fn new(entry: PreferenceEntry, reconciler: Reconciler) -> Self {
        Self { entry, reconciler }
    }

    /// What reconciling would do, without writing
    pub fn plan(&self) -> Result<Plan> {
        self.reconciler
            .plan(&self.entry)
            .map_err(|e| self.entry_error(e))
    }

    /// Wrap a reconciler error with its category and the entry it belongs to
    fn entry_error(&self, err: prefkit::Error) -> anyhow::Error {
        let mut context = format!(
            "{}: failed to set {}",
            err.category().description(),
            self.entry
        );
        if err.is_retryable() {
            context.push_str(" (may succeed on retry)");
        }
        anyhow::Error::new(err).context(context)
    }
}

fn describe(current: &CurrentState) -> String {
    match &current.type_tag {
        Some(tag) => format!("{} ({tag})", current.value),
        None => current.value.to_string(),
    }
}

impl Resource for MacOSDefault {
    fn id(&self) -> String {
        self.entry.id()
    }

    fn description(&self) -> String {
        match self.entry.type_tag() {
            Some(tag) => format!("Set {} = {} ({tag})", self.entry.id(), self.entry.value()),
            None => format!("Set {} = {}", self.entry.id(), self.entry.value()),
        }
    }

    fn resource_type(&self) -> &'static str {
        "macos_default"
    }

    fn current_state(&self) -> Result<ResourceState> {
        let plan = self.plan()?;
        let current = plan.current();
        Ok(match &plan {
            Plan::InSync { .. } => ResourceState::Converged {
                details: Some(describe(current)),
            },
            Plan::Write {
                type_tag, encoded, ..
            } => {
                let to = format!("-{type_tag} {encoded}");
                if current.is_unreadable() {
                    ResourceState::Missing { to }
                } else {
                    ResourceState::Drifted {
                        from: describe(current),
                        to,
                    }
                }
            }
        })
    }

    fn needs_apply(&self) -> Result<bool> {
        Ok(self.plan()?.needs_write())
    }

    fn apply(&self, ctx: &ApplyContext) -> Result<ApplyResult> {
        if ctx.dry_run {
            return Ok(ApplyResult::Skipped {
                reason: "Dry run".to_string(),
            });
        }

        let outcome = self
            .reconciler
            .reconcile(&self.entry)
            .map_err(|e| self.entry_error(e))?;

        Ok(match outcome {
            Outcome::NoOp => ApplyResult::NoChange,
            Outcome::Applied { .. } => ApplyResult::Modified,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prefkit::{CodecRegistry, MemoryBackend, Value};
    use std::sync::Arc;

    fn fixture(entry: PreferenceEntry) -> (MacOSDefault, Arc<MemoryBackend>) {
        let backend = Arc::new(MemoryBackend::new());
        let reconciler = Reconciler::new(Arc::new(CodecRegistry::builtin()), backend.clone());
        (MacOSDefault::new(entry, reconciler), backend)
    }

    fn pathbar(value: impl Into<Value>) -> PreferenceEntry {
        PreferenceEntry::new("com.apple.finder", "ShowPathbar", value).unwrap()
    }

    #[test]
    fn test_id_and_type() {
        let (resource, _) = fixture(pathbar(true));
        assert_eq!(resource.id(), "com.apple.finder.ShowPathbar");
        assert_eq!(resource.resource_type(), "macos_default");
        assert_eq!(resource.description(), "Set com.apple.finder.ShowPathbar = true");
    }

    #[test]
    fn test_converged_when_equal() {
        let (resource, backend) = fixture(pathbar(true));
        backend.seed("com.apple.finder", "ShowPathbar", "boolean", "1");

        let state = resource.current_state().unwrap();
        assert_eq!(
            state,
            ResourceState::Converged {
                details: Some("true (boolean)".to_string())
            }
        );
        assert!(!resource.needs_apply().unwrap());
    }

    #[test]
    fn test_drifted_shows_write() {
        let (resource, backend) = fixture(pathbar(true));
        backend.seed("com.apple.finder", "ShowPathbar", "boolean", "0");

        assert_eq!(
            resource.current_state().unwrap(),
            ResourceState::Drifted {
                from: "false (boolean)".to_string(),
                to: "-boolean YES".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_infers_type() {
        let (resource, _) = fixture(pathbar("Nlsv"));
        assert_eq!(
            resource.current_state().unwrap(),
            ResourceState::Missing {
                to: "-string Nlsv".to_string()
            }
        );
    }

    #[test]
    fn test_apply_then_no_change() {
        let (resource, backend) = fixture(pathbar(true));
        let ctx = ApplyContext::default();

        assert_eq!(resource.apply(&ctx).unwrap(), ApplyResult::Modified);
        assert_eq!(resource.apply(&ctx).unwrap(), ApplyResult::NoChange);
        assert_eq!(backend.write_count(), 1);
    }

    #[test]
    fn test_dry_run_skips_write() {
        let (resource, backend) = fixture(pathbar(true));
        let result = resource.apply(&ApplyContext::new(true)).unwrap();

        assert!(matches!(result, ApplyResult::Skipped { .. }));
        assert_eq!(backend.write_count(), 0);
    }

    #[test]
    fn test_errors_carry_entry_context() {
        let entry = pathbar(true).with_type("dictionary");
        let (resource, backend) = fixture(entry);

        let err = resource.apply(&ApplyContext::default()).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.starts_with("Configuration error: failed to set"));
        assert!(message.contains("defaults[com.apple.finder ShowPathbar]"));
        assert!(message.contains("unknown type 'dictionary'"));
        assert!(!message.contains("retry"));
        assert_eq!(backend.write_count(), 0);
    }

    #[test]
    fn test_write_failure_is_labeled_retryable() {
        let (resource, backend) = fixture(pathbar(true));
        backend.reject_writes(true);

        let err = resource.apply(&ApplyContext::default()).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.starts_with("defaults command failed: failed to set"));
        assert!(message.contains("(may succeed on retry)"));
        assert!(matches!(
            err.downcast_ref::<prefkit::Error>(),
            Some(prefkit::Error::WriteFailed { .. })
        ));
    }

    #[test]
    fn test_needs_apply_follows_plan() {
        let (resource, backend) = fixture(pathbar(false));
        assert!(resource.needs_apply().unwrap());

        backend.seed("com.apple.finder", "ShowPathbar", "boolean", "0");
        assert!(!resource.needs_apply().unwrap());
        assert_eq!(backend.write_count(), 0);
    }
}
