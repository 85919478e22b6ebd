//! Real backend using the macOS `defaults` command.

use super::{Backend, ProbeOutput};
use crate::error::{Error, Result};
use std::process::Command;

/// Default program name, resolved through `PATH`.
pub const DEFAULTS_PROGRAM: &str = "defaults";

/// Backend that executes `defaults` subcommands.
///
/// Arguments are passed as separate argv entries, never through a shell, so
/// the encoded value reaches `defaults` as a single token.
#[derive(Debug, Clone)]
pub struct DefaultsCli {
    program: String,
}

impl DefaultsCli {
    pub fn new() -> Self {
        Self::with_program(DEFAULTS_PROGRAM)
    }

    /// Use a different executable (wrapper script, absolute path).
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn run(&self, args: &[&str]) -> Result<ProbeOutput> {
        log::trace!("Running {} {}", self.program, args.join(" "));
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| Error::Backend {
                message: format!("failed to execute {}: {e}", self.program),
            })?;
        Ok(output.into())
    }
}

impl Default for DefaultsCli {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for DefaultsCli {
    fn read_type(&self, domain: &str, key: &str) -> Result<ProbeOutput> {
        self.run(&["read-type", domain, key])
    }

    fn read_value(&self, domain: &str, key: &str) -> Result<ProbeOutput> {
        self.run(&["read", domain, key])
    }

    fn write(
        &self,
        domain: &str,
        key: &str,
        type_tag: &str,
        encoded: &str,
    ) -> Result<ProbeOutput> {
        let flag = format!("-{type_tag}");
        self.run(&["write", domain, key, &flag, encoded])
    }
}
