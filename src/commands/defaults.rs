use anyhow::{Context as _, Result, bail};
use colored::Colorize;
use prefkit::{CodecRegistry, Outcome, PreferenceEntry, Value, codec};

use super::Session;
use crate::Context;
use crate::ui;

/// Processes that only pick up their defaults after a restart
const RESTART_ON_WRITE: &[(&str, &str)] = &[
    ("com.apple.finder", "Finder"),
    ("com.apple.dock", "Dock"),
    ("com.apple.systemuiserver", "SystemUIServer"),
];

pub fn set(ctx: &Context, domain: &str, key: &str, value: &str, type_tag: Option<&str>) -> Result<()> {
    let session = Session::open(ctx)?;
    let parsed = parse_value(session.reconciler.registry(), value, type_tag)?;

    let mut entry = PreferenceEntry::new(domain, key, parsed)?;
    if let Some(tag) = type_tag {
        entry = entry.with_type(tag);
    }

    if !ctx.quiet {
        println!(
            "Setting {}.{} = {}",
            domain.bold(),
            key.bold(),
            entry.value()
        );
    }

    let outcome = session
        .reconciler
        .reconcile(&entry)
        .with_context(|| format!("Failed to set {entry}"))?;

    match outcome {
        Outcome::NoOp => {
            if !ctx.quiet {
                println!("{}", "  ✓ No change needed".dimmed());
            }
        }
        Outcome::Applied { type_tag, encoded } => {
            if !ctx.quiet {
                println!("{} {}", "  ✓ Updated".green(), format!("(-{type_tag} {encoded})").dimmed());
            }
            if let Some((_, service)) = RESTART_ON_WRITE
                .iter()
                .find(|(d, _)| d.eq_ignore_ascii_case(domain))
            {
                if !ctx.quiet {
                    println!("{}", format!("  Restarting {service} to apply changes...").dimmed());
                }
                super::restart_service(service)?;
            }
        }
    }

    Ok(())
}

pub fn read(ctx: &Context, domain: &str, key: &str) -> Result<()> {
    let session = Session::open(ctx)?;
    let state = session.reconciler.current_state(domain, key)?;

    if state.is_unreadable() {
        ui::warn(&format!("{domain} {key} is not set"));
        return Ok(());
    }

    ui::kv("type", state.type_tag.as_deref().unwrap_or("unknown"));
    ui::kv("value", &state.value.to_string());
    if state.value.is_absent()
        && let Some(tag) = &state.type_tag
    {
        ui::dim(&format!("No codec registered for '{tag}'"));
    }

    Ok(())
}

pub fn types(ctx: &Context) -> Result<()> {
    let session = Session::open(ctx)?;
    let registry = session.reconciler.registry();

    ui::header("Registered types");
    for (index, tag) in registry.tags().enumerate() {
        println!("  {} {}", format!("{}.", index + 1).dimmed(), tag);
    }
    if !ctx.quiet {
        println!();
        ui::dim("Values without an explicit type take the first type that accepts them");
    }

    Ok(())
}

/// Turn command-line text into a value
///
/// With a type tag the text must be valid for that type. Without one the
/// shape is guessed: boolean words, then integers, then floats, then text.
fn parse_value(registry: &CodecRegistry, value: &str, type_tag: Option<&str>) -> Result<Value> {
    match type_tag {
        Some(codec::BOOLEAN) => parse_bool(value)
            .map(Value::Bool)
            .ok_or_else(|| anyhow::anyhow!("Invalid boolean: {value}")),
        Some(codec::STRING) => Ok(Value::Text(value.to_string())),
        Some(tag) => match registry.decode(tag, value)? {
            Value::Absent => bail!("Invalid {tag}: {value}"),
            decoded => Ok(decoded),
        },
        None => {
            if let Some(b) = parse_bool(value) {
                Ok(Value::Bool(b))
            } else if let Ok(i) = value.parse::<i64>() {
                Ok(Value::Integer(i))
            } else if let Ok(f) = value.parse::<f64>() {
                Ok(Value::Float(f))
            } else {
                Ok(Value::Text(value.to_string()))
            }
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}
