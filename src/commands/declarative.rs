//! Declarative commands
//!
//! - `status` - Show configured defaults against the system
//! - `apply` - Write every configured default that differs

use anyhow::{Result, bail};
use colored::Colorize;
use declarative::{
    ApplyResult, BoxedResource, ExecuteOptions, ExecuteSummary, ProgressCallback, ResourceState,
};
use prefkit::Reconciler;
use serde::Serialize;

use super::Session;
use crate::Context;
use crate::cli::{ApplyArgs, StatusArgs};
use crate::resource::MacOSDefault;
use crate::schema::PrefsyncConfig;
use crate::ui;

/// Resources for every configured entry matching `target`
fn build_resources(
    config: &PrefsyncConfig,
    reconciler: &Reconciler,
    target: Option<&str>,
) -> Result<Vec<BoxedResource>> {
    Ok(config
        .entries(target)?
        .into_iter()
        .map(|entry| Box::new(MacOSDefault::new(entry, reconciler.clone())) as BoxedResource)
        .collect())
}

// ============================================================================
// Status Command
// ============================================================================

#[derive(Debug, Serialize)]
struct StatusRow {
    id: String,
    description: String,
    #[serde(flatten)]
    state: ResourceState,
}

fn collect_status(resources: &[BoxedResource]) -> Vec<StatusRow> {
    resources
        .iter()
        .map(|resource| StatusRow {
            id: resource.id(),
            description: resource.description(),
            state: resource
                .current_state()
                .unwrap_or_else(|e| ResourceState::Unknown {
                    reason: format!("{e:#}"),
                }),
        })
        .collect()
}

pub fn status(ctx: &Context, args: StatusArgs) -> Result<()> {
    let session = Session::open(ctx)?;
    let resources = build_resources(
        &session.config,
        &session.reconciler,
        args.target.as_deref(),
    )?;
    let rows = collect_status(&resources);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    ui::header("Defaults Status");

    if rows.is_empty() {
        ui::dim("No defaults configured");
        return Ok(());
    }

    for row in &rows {
        match &row.state {
            ResourceState::Converged { details } => {
                if !ctx.quiet {
                    println!("  {} {}", "✓".green(), row.id);
                    if ctx.verbose > 0
                        && let Some(details) = details
                    {
                        ui::dim(&format!("  {details}"));
                    }
                }
            }
            ResourceState::Drifted { from, to } => {
                println!("  {} {} {} → {}", "~".yellow(), row.id, from.dimmed(), to);
            }
            ResourceState::Missing { to } => {
                println!("  {} {} → {}", "+".green(), row.id, to);
            }
            ResourceState::Unknown { reason } => {
                println!("  {} {} {}", "?".red(), row.id, reason.dimmed());
            }
        }
    }

    let pending = rows.iter().filter(|r| r.state.is_pending()).count();
    let unknown = rows
        .iter()
        .filter(|r| matches!(r.state, ResourceState::Unknown { .. }))
        .count();

    println!();
    if pending == 0 && unknown == 0 {
        ui::success(&format!(
            "{} in sync",
            ui::count(rows.len(), "entry", "entries")
        ));
    } else {
        ui::info(&format!(
            "{} to apply, {} with errors",
            ui::count(pending, "entry", "entries"),
            unknown
        ));
    }

    Ok(())
}

// ============================================================================
// Apply Command
// ============================================================================

/// Prints each result as it is reported by the executor
struct UiProgress {
    verbose: bool,
    quiet: bool,
}

impl ProgressCallback for UiProgress {
    fn on_start(&mut self, total: usize, dry_run: bool) {
        if self.quiet {
            return;
        }
        println!();
        if dry_run {
            println!(
                "  {} Checking {} (dry run)...",
                "→".cyan(),
                ui::count(total, "entry", "entries")
            );
        } else {
            println!(
                "  {} Applying {}...",
                "→".cyan(),
                ui::count(total, "entry", "entries")
            );
        }
    }

    fn on_resource_complete(&mut self, id: &str, description: &str, result: &ApplyResult) {
        match result {
            ApplyResult::Modified => {
                if !self.quiet {
                    println!("    {} {}", "✓".green(), description);
                }
            }
            ApplyResult::NoChange => {
                if self.verbose {
                    println!("    {} {} {}", "·".dimmed(), id, "(unchanged)".dimmed());
                }
            }
            ApplyResult::Skipped { reason } => {
                if !self.quiet {
                    println!("    {} {} {}", "○".yellow(), description, reason.dimmed());
                }
            }
            ApplyResult::Failed { error } => {
                eprintln!("    {} {}: {}", "✗".red(), id, error);
            }
        }
    }

    fn on_finish(&mut self, _summary: &ExecuteSummary) {}
}

pub fn apply(ctx: &Context, args: ApplyArgs) -> Result<()> {
    let session = Session::open(ctx)?;
    let resources = build_resources(
        &session.config,
        &session.reconciler,
        args.target.as_deref(),
    )?;

    if resources.is_empty() {
        ui::info("No defaults configured");
        return Ok(());
    }

    if !args.dry_run && !args.yes {
        let pending = preview(&resources);
        if pending == 0 {
            ui::success("Everything is up to date");
            return Ok(());
        }
        if !confirm_proceed()? {
            println!();
            println!("  {} Aborted", "✗".red());
            return Ok(());
        }
    }

    let opts = ExecuteOptions {
        dry_run: args.dry_run,
        jobs: args.jobs.unwrap_or(session.config.settings.jobs),
    };
    let mut progress = UiProgress {
        verbose: ctx.verbose > 0,
        quiet: ctx.quiet,
    };
    let summary = declarative::execute(&resources, &opts, &mut progress)?;

    if !args.dry_run && summary.total_changes() > 0 && !session.config.restart.services.is_empty() {
        println!();
        println!("  {} Restarting services...", "→".cyan());
        for service in &session.config.restart.services {
            super::restart_service(service)?;
        }
    }

    print_summary(&summary, args.dry_run);

    if !summary.is_success() {
        bail!("{} could not be applied", ui::count(summary.failed, "entry", "entries"));
    }

    Ok(())
}

/// Show what apply would change, returning how many entries differ
fn preview(resources: &[BoxedResource]) -> usize {
    let mut pending = 0;
    for row in collect_status(resources) {
        match row.state {
            ResourceState::Drifted { from, to } => {
                pending += 1;
                println!("  {} {} {} → {}", "~".yellow(), row.id, from.dimmed(), to);
            }
            ResourceState::Missing { to } => {
                pending += 1;
                println!("  {} {} → {}", "+".green(), row.id, to);
            }
            ResourceState::Unknown { reason } => {
                pending += 1;
                println!("  {} {} {}", "?".red(), row.id, reason.dimmed());
            }
            ResourceState::Converged { .. } => {}
        }
    }
    pending
}

/// Confirm with user
fn confirm_proceed() -> Result<bool> {
    use dialoguer::Confirm;

    let confirmed = Confirm::new()
        .with_prompt("Continue?")
        .default(true)
        .interact()?;

    Ok(confirmed)
}

/// Print final summary
fn print_summary(summary: &ExecuteSummary, dry_run: bool) {
    println!();
    if dry_run {
        println!(
            "  {} Dry run - {} checked, no changes made",
            "ℹ".blue(),
            ui::count(summary.total(), "entry", "entries")
        );
    } else if summary.is_success() {
        println!("  {} Defaults applied successfully!", "✓".green().bold());
    } else {
        println!("  {} Defaults applied with errors", "⚠".yellow().bold());
    }

    if summary.modified > 0 {
        println!("    • {} modified", ui::count(summary.modified, "entry", "entries"));
    }
    if summary.no_change > 0 {
        println!("    • {} unchanged", ui::count(summary.no_change, "entry", "entries"));
    }
    if summary.skipped > 0 {
        println!("    • {} skipped", ui::count(summary.skipped, "entry", "entries"));
    }
    if summary.failed > 0 {
        println!(
            "    • {} {}",
            ui::count(summary.failed, "entry", "entries"),
            "failed".red()
        );
    }
}
