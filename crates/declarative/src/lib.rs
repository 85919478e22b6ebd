//! # Declarative
//!
//! A small framework for declarative resource management.
//!
//! ## Core Concepts
//!
//! - **Resource**: Something with state that can be observed and converged
//! - **ResourceState**: Converged, drifted, missing or unknown
//! - **ApplyResult**: What applying one resource did
//! - **Executor**: Applies independent resources in parallel and summarizes
//!
//! ## Example
//!
//! ```ignore
//! use declarative::{ExecuteOptions, execute_simple};
//!
//! let resources: Vec<declarative::BoxedResource> = load_resources()?;
//! let summary = execute_simple(&resources, &ExecuteOptions::default())?;
//! println!("{} changed, {} failed", summary.total_changes(), summary.failed);
//! ```
//!
//! Progress is reported through [`ProgressCallback`], so the crate has no
//! dependency on any terminal UI.

pub mod context;
pub mod executor;
pub mod resource;
pub mod types;

// Re-export main types at crate root
pub use context::{ApplyContext, NoProgress, ProgressCallback};
pub use executor::{execute, execute_simple};
pub use resource::{BoxedResource, Resource};
pub use types::{ApplyResult, ExecuteOptions, ExecuteSummary, ResourceState};
