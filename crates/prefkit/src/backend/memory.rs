//! In-memory backend that answers like `defaults`.
//!
//! Entries are stored as `(type tag, raw text)`. Booleans are normalized to
//! `1`/`0` on write, the way `defaults read` prints them back.

use super::{Backend, ProbeOutput};
use crate::error::Result;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

type Store = HashMap<(String, String), (String, String)>;

/// A preference store held in memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<Store>,
    writes: AtomicUsize,
    reject_writes: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw entry directly, bypassing normalization.
    pub fn seed(&self, domain: &str, key: &str, type_tag: &str, raw: &str) {
        self.lock()
            .insert(entry_key(domain, key), (type_tag.to_string(), raw.to_string()));
    }

    /// The stored `(type tag, raw text)` for an entry.
    pub fn get(&self, domain: &str, key: &str) -> Option<(String, String)> {
        self.lock().get(&entry_key(domain, key)).cloned()
    }

    /// Number of write commands received, including rejected ones.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make subsequent writes fail with a non-zero status.
    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Backend for MemoryBackend {
    fn read_type(&self, domain: &str, key: &str) -> Result<ProbeOutput> {
        Ok(match self.get(domain, key) {
            Some((tag, _)) => ProbeOutput::ok(format!("Type is {tag}\n")),
            None => missing(domain, key),
        })
    }

    fn read_value(&self, domain: &str, key: &str) -> Result<ProbeOutput> {
        Ok(match self.get(domain, key) {
            Some((_, raw)) => ProbeOutput::ok(format!("{raw}\n")),
            None => missing(domain, key),
        })
    }

    fn write(
        &self,
        domain: &str,
        key: &str,
        type_tag: &str,
        encoded: &str,
    ) -> Result<ProbeOutput> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.reject_writes.load(Ordering::SeqCst) {
            return Ok(ProbeOutput::failed(
                1,
                format!("Could not write domain {domain}; exiting"),
            ));
        }

        let raw = match type_tag {
            "boolean" | "bool" => match encoded {
                "YES" | "yes" | "TRUE" | "true" | "1" => "1",
                _ => "0",
            }
            .to_string(),
            _ => encoded.to_string(),
        };
        self.lock()
            .insert(entry_key(domain, key), (type_tag.to_string(), raw));
        Ok(ProbeOutput::ok(""))
    }
}

fn entry_key(domain: &str, key: &str) -> (String, String) {
    (domain.to_string(), key.to_string())
}

fn missing(domain: &str, key: &str) -> ProbeOutput {
    ProbeOutput::failed(
        1,
        format!("The domain/default pair of ({domain}, {key}) does not exist\n"),
    )
}
