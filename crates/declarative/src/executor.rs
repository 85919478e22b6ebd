//! Execution engine - applies independent resources in parallel

use crate::context::{ApplyContext, NoProgress, ProgressCallback};
use crate::resource::{BoxedResource, Resource};
use crate::types::{ApplyResult, ExecuteOptions, ExecuteSummary};
use anyhow::Result;
use rayon::prelude::*;

/// Execute resources with the given options
///
/// Resources are assumed independent: they are applied on a thread pool of
/// `opts.jobs` threads with no ordering between them. A resource whose
/// `apply` returns an error is counted as failed; the others still run.
///
/// In dry-run mode nothing is applied. Resources that would change are
/// reported as skipped, converged ones as unchanged.
pub fn execute<P: ProgressCallback>(
    resources: &[BoxedResource],
    opts: &ExecuteOptions,
    progress: &mut P,
) -> Result<ExecuteSummary> {
    progress.on_start(resources.len(), opts.dry_run);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opts.jobs.max(1))
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to create thread pool: {}", e))?;

    let ctx = ApplyContext::new(opts.dry_run);
    let results: Vec<ApplyResult> = pool.install(|| {
        resources
            .par_iter()
            .map(|resource| {
                if ctx.dry_run {
                    preview_resource(resource.as_ref())
                } else {
                    apply_resource(resource.as_ref(), &ctx)
                }
            })
            .collect()
    });

    let mut summary = ExecuteSummary::default();
    for (resource, result) in resources.iter().zip(&results) {
        progress.on_resource_complete(&resource.id(), &resource.description(), result);
        summary.add_result(result);
    }
    progress.on_finish(&summary);

    Ok(summary)
}

/// Execute without progress reporting
pub fn execute_simple(resources: &[BoxedResource], opts: &ExecuteOptions) -> Result<ExecuteSummary> {
    execute(resources, opts, &mut NoProgress)
}

fn apply_resource(resource: &dyn Resource, ctx: &ApplyContext) -> ApplyResult {
    match resource.apply(ctx) {
        Ok(result) => result,
        Err(e) => {
            log::debug!("{} failed: {:#}", resource.id(), e);
            ApplyResult::Failed {
                error: format!("{e:#}"),
            }
        }
    }
}

fn preview_resource(resource: &dyn Resource) -> ApplyResult {
    match resource.needs_apply() {
        Ok(true) => ApplyResult::Skipped {
            reason: "Dry run".to_string(),
        },
        Ok(false) => ApplyResult::NoChange,
        Err(e) => ApplyResult::Failed {
            error: format!("{e:#}"),
        },
    }
}
