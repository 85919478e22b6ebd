//! Resource trait for declarative state management
//!
//! A Resource is something whose current state can be observed and
//! converged onto a desired state.

use crate::context::ApplyContext;
use crate::types::{ApplyResult, ResourceState};
use anyhow::Result;
use std::fmt;

/// Core trait for declarative resources
///
/// # Example
///
/// ```ignore
/// use declarative::{ApplyContext, ApplyResult, Resource, ResourceState};
///
/// #[derive(Debug)]
/// struct Marker { path: String }
///
/// impl Resource for Marker {
///     fn id(&self) -> String { self.path.clone() }
///     fn description(&self) -> String { format!("Touch {}", self.path) }
///     fn resource_type(&self) -> &'static str { "file" }
///
///     fn current_state(&self) -> anyhow::Result<ResourceState> {
///         if std::path::Path::new(&self.path).exists() {
///             Ok(ResourceState::Converged { details: None })
///         } else {
///             Ok(ResourceState::Missing { to: "present".into() })
///         }
///     }
///
///     fn apply(&self, _ctx: &ApplyContext) -> anyhow::Result<ApplyResult> {
///         std::fs::write(&self.path, "")?;
///         Ok(ApplyResult::Modified)
///     }
/// }
/// ```
pub trait Resource: Send + Sync + fmt::Debug {
    /// Unique identifier for this resource
    ///
    /// Stable across runs, e.g. "com.apple.finder.ShowPathbar".
    fn id(&self) -> String;

    /// Human-readable description of what this resource does
    fn description(&self) -> String;

    /// Resource type category, used for grouping and filtering
    fn resource_type(&self) -> &'static str;

    /// Observe the current state relative to the desired one
    fn current_state(&self) -> Result<ResourceState>;

    /// Check if the resource needs changes to reach desired state
    fn needs_apply(&self) -> Result<bool> {
        Ok(!self.current_state()?.is_converged())
    }

    /// Converge onto the desired state
    ///
    /// Must be idempotent: applying a converged resource returns
    /// [`ApplyResult::NoChange`] without side effects.
    fn apply(&self, ctx: &ApplyContext) -> Result<ApplyResult>;
}

/// A boxed resource for type-erased storage
pub type BoxedResource = Box<dyn Resource>;
