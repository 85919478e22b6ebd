//! Idempotent reconciliation of one entry against the store.
//!
//! ```text
//! read current ─► resolve desired type ─► compare ─┬─ equal ──► NoOp
//!                 (explicit, else current)         └─ differ ─► infer type if needed
//!                                                               encode
//!                                                               write ─► Applied | WriteFailed
//! ```

use crate::backend::Backend;
use crate::entry::PreferenceEntry;
use crate::error::{Error, Result};
use crate::reader::{self, CurrentState};
use crate::registry::CodecRegistry;
use crate::value::Value;
use serde::Serialize;
use std::sync::Arc;

/// What a reconciliation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Store already matched; nothing was written
    NoOp,
    /// A write was issued and succeeded
    Applied { type_tag: String, encoded: String },
}

impl Outcome {
    pub fn changed(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// What a reconciliation would do, computed without writing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Plan {
    InSync {
        current: CurrentState,
    },
    Write {
        current: CurrentState,
        type_tag: String,
        encoded: String,
    },
}

impl Plan {
    pub fn current(&self) -> &CurrentState {
        match self {
            Self::InSync { current } | Self::Write { current, .. } => current,
        }
    }

    pub fn needs_write(&self) -> bool {
        matches!(self, Self::Write { .. })
    }
}

/// Compares entries with the store and writes the differences.
///
/// Cheap to clone; the registry and backend are shared.
#[derive(Debug, Clone)]
pub struct Reconciler {
    registry: Arc<CodecRegistry>,
    backend: Arc<dyn Backend>,
}

impl Reconciler {
    pub fn new(registry: Arc<CodecRegistry>, backend: Arc<dyn Backend>) -> Self {
        Self { registry, backend }
    }

    pub fn registry(&self) -> &CodecRegistry {
        &self.registry
    }

    /// Read the typed current state of `(domain, key)`.
    pub fn current_state(&self, domain: &str, key: &str) -> Result<CurrentState> {
        reader::read_state(self.backend.as_ref(), &self.registry, domain, key)
    }

    /// Decide whether `entry` needs a write, and what would be written.
    ///
    /// Fails with the same errors [`Reconciler::reconcile`] would raise
    /// before writing.
    pub fn plan(&self, entry: &PreferenceEntry) -> Result<Plan> {
        let current = self.current_state(entry.domain(), entry.key())?;
        let desired_type = entry
            .type_tag()
            .map(str::to_string)
            .or_else(|| current.type_tag.clone());

        if self.in_sync(&current, desired_type.as_deref(), entry.value()) {
            return Ok(Plan::InSync { current });
        }

        let type_tag = match desired_type {
            Some(tag) => tag,
            None => self
                .registry
                .infer_type(entry.value())
                .map(str::to_string)
                .ok_or_else(|| Error::TypeInferenceFailed {
                    domain: entry.domain().to_string(),
                    key: entry.key().to_string(),
                    value: entry.value().to_string(),
                })?,
        };

        let encoded = self
            .registry
            .encode(&type_tag, entry.value())?
            .ok_or_else(|| Error::UnrepresentableValue {
                domain: entry.domain().to_string(),
                key: entry.key().to_string(),
                tag: type_tag.clone(),
                value: entry.value().to_string(),
            })?;

        Ok(Plan::Write {
            current,
            type_tag,
            encoded,
        })
    }

    /// Bring the store in line with `entry`.
    ///
    /// Issues at most one write. Any error leaves the store untouched,
    /// except [`Error::WriteFailed`] where the outcome of the failed command
    /// is up to `defaults`.
    pub fn reconcile(&self, entry: &PreferenceEntry) -> Result<Outcome> {
        let (type_tag, encoded) = match self.plan(entry)? {
            Plan::InSync { .. } => {
                log::debug!("Skipping {entry} since the value is already set");
                return Ok(Outcome::NoOp);
            }
            Plan::Write {
                type_tag, encoded, ..
            } => (type_tag, encoded),
        };

        let write_failed = |status: i32, stderr: String| Error::WriteFailed {
            domain: entry.domain().to_string(),
            key: entry.key().to_string(),
            tag: type_tag.clone(),
            status,
            stderr,
        };

        let output = self
            .backend
            .write(entry.domain(), entry.key(), &type_tag, &encoded)
            .map_err(|e| write_failed(-1, e.to_string()))?;
        if !output.success() {
            return Err(write_failed(output.status, output.stderr.trim().to_string()));
        }

        log::info!("Ran {entry} successfully (-{type_tag} {encoded})");
        Ok(Outcome::Applied { type_tag, encoded })
    }

    /// Comparison of type and value as the store would hold it.
    ///
    /// Nothing matches an absent current value. Otherwise the desired value
    /// is compared after an encode/decode round trip under the desired type,
    /// so a desired absent boolean matches a stored `false` and a desired
    /// integer matches the same number stored as a float.
    fn in_sync(&self, current: &CurrentState, desired_type: Option<&str>, desired: &Value) -> bool {
        if current.value.is_absent() || current.type_tag.as_deref() != desired_type {
            return false;
        }
        if current.value == *desired {
            return true;
        }
        let tag = match desired_type {
            Some(tag) => tag,
            None => return false,
        };
        self.registry
            .encode(tag, desired)
            .ok()
            .flatten()
            .and_then(|raw| self.registry.decode(tag, &raw).ok())
            .is_some_and(|stored| stored == current.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MemoryBackend, ProbeOutput};
    use crate::registry::RegistryBuilder;
    use std::sync::Mutex;

    fn setup() -> (Reconciler, Arc<MemoryBackend>) {
        let store = Arc::new(MemoryBackend::new());
        let reconciler = Reconciler::new(Arc::new(CodecRegistry::builtin()), store.clone());
        (reconciler, store)
    }

    fn entry(value: impl Into<Value>) -> PreferenceEntry {
        PreferenceEntry::new("com.apple.finder", "ShowPathbar", value).unwrap()
    }

    /// Backend whose probes always fail and which records every write.
    #[derive(Debug, Default)]
    struct Unreadable {
        writes: Mutex<Vec<(String, String)>>,
    }

    impl Backend for Unreadable {
        fn read_type(&self, _: &str, _: &str) -> Result<ProbeOutput> {
            Ok(ProbeOutput::failed(1, "unreadable"))
        }

        fn read_value(&self, _: &str, _: &str) -> Result<ProbeOutput> {
            Ok(ProbeOutput::failed(1, "unreadable"))
        }

        fn write(&self, _: &str, _: &str, tag: &str, encoded: &str) -> Result<ProbeOutput> {
            self.writes
                .lock()
                .unwrap()
                .push((tag.to_string(), encoded.to_string()));
            Ok(ProbeOutput::ok(""))
        }
    }

    #[test]
    fn test_noop_when_inherited_type_and_value_match() {
        let (reconciler, store) = setup();
        store.seed("com.apple.finder", "ShowPathbar", "boolean", "0");

        let outcome = reconciler.reconcile(&entry(false)).unwrap();
        assert_eq!(outcome, Outcome::NoOp);
        assert!(!outcome.changed());
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_apply_infers_boolean_when_absent() {
        let (reconciler, store) = setup();

        let outcome = reconciler.reconcile(&entry(true)).unwrap();
        assert_eq!(
            outcome,
            Outcome::Applied {
                type_tag: "boolean".to_string(),
                encoded: "YES".to_string(),
            }
        );
        assert!(outcome.changed());
        assert_eq!(
            store.get("com.apple.finder", "ShowPathbar"),
            Some(("boolean".to_string(), "1".to_string()))
        );
    }

    #[test]
    fn test_second_reconcile_is_noop() {
        let (reconciler, store) = setup();
        let desired = entry(true);

        assert!(reconciler.reconcile(&desired).unwrap().changed());
        assert!(!reconciler.reconcile(&desired).unwrap().changed());
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_idempotent_for_text_values() {
        let (reconciler, store) = setup();
        let desired = PreferenceEntry::new("com.apple.finder", "FXPreferredViewStyle", "Nlsv").unwrap();

        assert!(reconciler.reconcile(&desired).unwrap().changed());
        assert!(!reconciler.reconcile(&desired).unwrap().changed());
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_value_change_is_applied() {
        let (reconciler, store) = setup();
        store.seed("com.apple.finder", "ShowPathbar", "boolean", "0");

        let outcome = reconciler.reconcile(&entry(true)).unwrap();
        assert!(outcome.changed());
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_unknown_type_fails_without_write() {
        let (reconciler, store) = setup();
        let desired = entry("anything").with_type("enum");

        let err = reconciler.reconcile(&desired).unwrap_err();
        assert!(matches!(err, Error::UnknownType { ref tag } if tag == "enum"));
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_inherited_unregistered_type_fails_without_write() {
        let (reconciler, store) = setup();
        store.seed("com.apple.dock", "tilesize", "integer", "48");
        let desired = PreferenceEntry::new("com.apple.dock", "tilesize", 36_i64).unwrap();

        let err = reconciler.reconcile(&desired).unwrap_err();
        assert!(matches!(err, Error::UnknownType { ref tag } if tag == "integer"));
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_unrepresentable_value_fails_without_write() {
        let (reconciler, store) = setup();
        let desired = entry(true).with_type("string");

        let err = reconciler.reconcile(&desired).unwrap_err();
        assert!(matches!(err, Error::UnrepresentableValue { ref tag, .. } if tag == "string"));
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_type_inference_failure_without_write() {
        let (reconciler, store) = setup();
        let desired = PreferenceEntry::new("com.apple.dock", "tilesize", 36_i64).unwrap();

        let err = reconciler.reconcile(&desired).unwrap_err();
        assert!(matches!(err, Error::TypeInferenceFailed { .. }));
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_numeric_codecs_when_registered() {
        let store = Arc::new(MemoryBackend::new());
        let mut builder = RegistryBuilder::with_builtins();
        builder.with_numeric();
        let reconciler = Reconciler::new(Arc::new(builder.build()), store.clone());
        store.seed("com.apple.dock", "tilesize", "integer", "48");

        let desired = PreferenceEntry::new("com.apple.dock", "tilesize", 36_i64).unwrap();
        assert!(reconciler.reconcile(&desired).unwrap().changed());
        assert!(!reconciler.reconcile(&desired).unwrap().changed());
        assert_eq!(
            store.get("com.apple.dock", "tilesize"),
            Some(("integer".to_string(), "36".to_string()))
        );
    }

    #[test]
    fn test_whole_number_float_is_idempotent() {
        let store = Arc::new(MemoryBackend::new());
        let mut builder = RegistryBuilder::with_builtins();
        builder.with_numeric();
        let reconciler = Reconciler::new(Arc::new(builder.build()), store.clone());
        store.seed("com.apple.dock", "autohide-delay", "float", "0.5");

        let desired = PreferenceEntry::new("com.apple.dock", "autohide-delay", 0_i64).unwrap();
        assert!(reconciler.reconcile(&desired).unwrap().changed());
        assert!(!reconciler.reconcile(&desired).unwrap().changed());
        assert!(!reconciler.reconcile(&desired).unwrap().changed());
        assert_eq!(store.write_count(), 1);
        assert_eq!(
            store.get("com.apple.dock", "autohide-delay"),
            Some(("float".to_string(), "0".to_string()))
        );
    }

    #[test]
    fn test_write_failure_is_reported() {
        let (reconciler, store) = setup();
        store.reject_writes(true);

        let err = reconciler.reconcile(&entry(true)).unwrap_err();
        match err {
            Error::WriteFailed {
                domain,
                key,
                tag,
                status,
                ..
            } => {
                assert_eq!(domain, "com.apple.finder");
                assert_eq!(key, "ShowPathbar");
                assert_eq!(tag, "boolean");
                assert_eq!(status, 1);
            }
            other => panic!("expected WriteFailed, got {other:?}"),
        }
        assert_eq!(store.get("com.apple.finder", "ShowPathbar"), None);
    }

    #[test]
    fn test_unreadable_current_forces_apply_even_for_false() {
        let backend = Arc::new(Unreadable::default());
        let reconciler = Reconciler::new(Arc::new(CodecRegistry::builtin()), backend.clone());

        assert!(reconciler.reconcile(&entry(false)).unwrap().changed());
        assert!(reconciler.reconcile(&entry(Value::Absent)).unwrap().changed());
        assert_eq!(
            *backend.writes.lock().unwrap(),
            vec![
                ("boolean".to_string(), "NO".to_string()),
                ("boolean".to_string(), "NO".to_string()),
            ]
        );
    }

    #[test]
    fn test_absent_desired_matches_decoded_false_only() {
        // Absent encodes as NO; once the store reads back false it is in sync.
        let (reconciler, store) = setup();
        let desired = entry(Value::Absent);

        assert!(reconciler.reconcile(&desired).unwrap().changed());
        assert_eq!(
            store.get("com.apple.finder", "ShowPathbar"),
            Some(("boolean".to_string(), "0".to_string()))
        );
        assert!(!reconciler.reconcile(&desired).unwrap().changed());

        // A stored true is not "absent".
        store.seed("com.apple.finder", "ShowPathbar", "boolean", "1");
        assert!(reconciler.reconcile(&desired).unwrap().changed());
    }

    #[test]
    fn test_unrecognized_current_value_forces_apply() {
        let (reconciler, store) = setup();
        store.seed("com.apple.finder", "ShowPathbar", "boolean", "maybe");

        assert!(reconciler.reconcile(&entry(false)).unwrap().changed());
    }

    #[test]
    fn test_explicit_type_differs_from_current() {
        let (reconciler, store) = setup();
        store.seed("com.example", "Mode", "boolean", "1");
        let desired = PreferenceEntry::new("com.example", "Mode", "YES")
            .unwrap()
            .with_type("string");

        let outcome = reconciler.reconcile(&desired).unwrap();
        assert_eq!(
            outcome,
            Outcome::Applied {
                type_tag: "string".to_string(),
                encoded: "YES".to_string(),
            }
        );
    }

    #[test]
    fn test_plan_does_not_write() {
        let (reconciler, store) = setup();

        let plan = reconciler.plan(&entry(true)).unwrap();
        assert!(plan.needs_write());
        assert!(plan.current().is_unreadable());
        assert_eq!(store.write_count(), 0);

        store.seed("com.apple.finder", "ShowPathbar", "boolean", "1");
        let plan = reconciler.plan(&entry(true)).unwrap();
        assert!(!plan.needs_write());
    }
}
