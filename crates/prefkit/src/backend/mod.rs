//! Backend abstraction for the preference store.
//!
//! The [`Backend`] trait is the only way the reconciler touches the outside
//! world, allowing for different implementations:
//! - [`DefaultsCli`] runs the real `defaults` command
//! - [`MemoryBackend`] keeps entries in memory for tests and dry runs

pub mod defaults;
pub mod memory;

pub use defaults::DefaultsCli;
pub use memory::MemoryBackend;

use crate::error::Result;
use std::fmt;
use std::process::Output;

/// Exit status and captured text of one store command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeOutput {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProbeOutput {
    /// Successful output with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed output with the given status and stderr.
    pub fn failed(status: i32, stderr: impl Into<String>) -> Self {
        Self {
            status,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.status == 0
    }
}

impl From<Output> for ProbeOutput {
    fn from(output: Output) -> Self {
        Self {
            // Killed by a signal: no exit code
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

/// Read/write access to a `(domain, key)` preference store.
///
/// Implementations report command outcomes through [`ProbeOutput`]; an `Err`
/// means the command could not be run at all. The encoded value passed to
/// [`Backend::write`] is one opaque token, and any quoting it needs is the
/// implementation's concern.
pub trait Backend: Send + Sync + fmt::Debug {
    /// Equivalent of `defaults read-type <domain> <key>`.
    fn read_type(&self, domain: &str, key: &str) -> Result<ProbeOutput>;

    /// Equivalent of `defaults read <domain> <key>`.
    fn read_value(&self, domain: &str, key: &str) -> Result<ProbeOutput>;

    /// Equivalent of `defaults write <domain> <key> -<type_tag> <encoded>`.
    fn write(&self, domain: &str, key: &str, type_tag: &str, encoded: &str)
    -> Result<ProbeOutput>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_output_constructors() {
        let ok = ProbeOutput::ok("Type is boolean\n");
        assert!(ok.success());
        assert_eq!(ok.stdout, "Type is boolean\n");

        let failed = ProbeOutput::failed(1, "does not exist");
        assert!(!failed.success());
        assert!(failed.stdout.is_empty());
    }
}
