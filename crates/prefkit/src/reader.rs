//! Current state of a preference entry, read through a [`Backend`].

use crate::backend::Backend;
use crate::error::Result;
use crate::registry::CodecRegistry;
use crate::value::Value;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static TYPE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Type is (\w+)").expect("type pattern is valid"));

/// What the store currently holds for one `(domain, key)`.
///
/// Either field may be unknown. An unreadable entry is
/// `{ type_tag: None, value: Absent }`, which is a state, not an error.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CurrentState {
    pub type_tag: Option<String>,
    pub value: Value,
}

impl CurrentState {
    /// Whether nothing readable was found.
    pub fn is_unreadable(&self) -> bool {
        self.type_tag.is_none() && self.value.is_absent()
    }
}

/// Extract the tag from `defaults read-type` output.
pub fn parse_type_line(stdout: &str) -> Option<String> {
    TYPE_LINE
        .captures(stdout)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Probe the store for the declared type and value of an entry.
///
/// A failed probe means "not known": a non-zero type probe leaves the type
/// unset, and a non-zero value probe, an unknown type or a type without a
/// registered codec all leave the value [`Value::Absent`]. Only a probe that
/// cannot be executed at all is returned as an error.
pub fn read_state(
    backend: &dyn Backend,
    registry: &CodecRegistry,
    domain: &str,
    key: &str,
) -> Result<CurrentState> {
    let type_probe = backend.read_type(domain, key)?;
    let type_tag = if type_probe.success() {
        parse_type_line(&type_probe.stdout)
    } else {
        None
    };

    let value_probe = backend.read_value(domain, key)?;
    if !value_probe.success() {
        log::debug!("{domain} {key}: no current value (status {})", value_probe.status);
        return Ok(CurrentState {
            type_tag,
            value: Value::Absent,
        });
    }

    // `defaults read` terminates its output with a newline.
    let raw = value_probe
        .stdout
        .strip_suffix('\n')
        .unwrap_or(&value_probe.stdout);

    let value = match type_tag.as_deref() {
        Some(tag) => match registry.get(tag) {
            Some(codec) => codec.decode(raw),
            None => {
                log::debug!("{domain} {key}: no codec for current type '{tag}'");
                Value::Absent
            }
        },
        None => Value::Absent,
    };

    Ok(CurrentState { type_tag, value })
}
