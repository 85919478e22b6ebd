//! # prefkit
//!
//! Typed codecs and idempotent reconciliation for macOS `defaults` entries.
//!
//! This crate provides:
//! - A [`CodecRegistry`] mapping type tags (`boolean`, `string`, ...) to
//!   decode/encode function pairs, frozen after construction
//! - Type inference for untyped values by trial encoding, in registration order
//! - A state reader that parses `defaults read-type` / `defaults read`
//! - A [`Reconciler`] that writes only when the store differs from the
//!   desired state
//!
//! ## Example
//!
//! ```no_run
//! use prefkit::{DefaultsCli, PreferenceEntry, Reconciler, registry};
//! use std::sync::Arc;
//!
//! let reconciler = Reconciler::new(registry::global(), Arc::new(DefaultsCli::new()));
//!
//! let entry = PreferenceEntry::new("com.apple.finder", "ShowPathbar", true)?;
//! let outcome = reconciler.reconcile(&entry)?;
//! println!("changed: {}", outcome.changed());
//! # Ok::<(), prefkit::Error>(())
//! ```
//!
//! ## Custom types
//!
//! Codecs are registered on a [`RegistryBuilder`] before any reconciliation
//! runs. Register narrow types before permissive ones: inference picks the
//! first codec that accepts a value.
//!
//! ```
//! use prefkit::{RegistryBuilder, Value};
//!
//! let mut builder = RegistryBuilder::with_builtins();
//! builder.with_numeric();
//! let registry = builder.build();
//!
//! assert_eq!(registry.infer_type(&Value::Bool(true)), Some("boolean"));
//! assert_eq!(registry.infer_type(&Value::Integer(48)), Some("integer"));
//! ```

pub mod backend;
pub mod codec;
pub mod entry;
pub mod error;
pub mod reader;
pub mod reconcile;
pub mod registry;
pub mod value;

pub use backend::{Backend, DefaultsCli, MemoryBackend, ProbeOutput};
pub use codec::Codec;
pub use entry::PreferenceEntry;
pub use error::{Error, ErrorCategory, Result};
pub use reader::CurrentState;
pub use reconcile::{Outcome, Plan, Reconciler};
pub use registry::{CodecRegistry, RegistryBuilder};
pub use value::Value;
