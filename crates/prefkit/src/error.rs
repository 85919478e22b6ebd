//! Error types for preference reconciliation.
//!
//! Every fatal path aborts before a write is issued, except
//! [`Error::WriteFailed`] which reports the write itself. An unreadable
//! current state is not an error: the reader turns it into
//! [`Value::Absent`](crate::Value::Absent).

use thiserror::Error;

/// Broad classes of reconciliation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The entry or registry is misconfigured (unknown type, bad entry)
    Config,
    /// The desired value cannot be expressed in the resolved type
    Encoding,
    /// The external `defaults` command failed or could not be run
    Command,
}

impl ErrorCategory {
    /// Whether rerunning the same reconciliation could succeed.
    ///
    /// Config and encoding errors are deterministic; a command failure may
    /// be transient (locked preference file, missing permissions fixed later).
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Command)
    }

    /// Get a user-friendly description of this error category.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Config => "Configuration error",
            Self::Encoding => "Value cannot be encoded",
            Self::Command => "defaults command failed",
        }
    }
}

/// Errors that can occur while reading, encoding or writing preferences.
#[derive(Debug, Error)]
pub enum Error {
    /// No codec is registered for the resolved type tag
    #[error("unknown type '{tag}': no codec registered")]
    UnknownType {
        /// The unregistered type tag
        tag: String,
    },

    /// The encoder for the resolved type rejected the desired value
    #[error("{domain} {key}: value {value} is not representable as '{tag}'")]
    UnrepresentableValue {
        /// Preference domain
        domain: String,
        /// Preference key
        key: String,
        /// Resolved type tag
        tag: String,
        /// Rendering of the rejected value
        value: String,
    },

    /// No registered encoder accepts the desired value
    #[error("{domain} {key}: no registered type accepts value {value}")]
    TypeInferenceFailed {
        /// Preference domain
        domain: String,
        /// Preference key
        key: String,
        /// Rendering of the value nothing could encode
        value: String,
    },

    /// The write command ran but did not succeed
    #[error("defaults write {domain} {key} -{tag} failed (status {status}): {stderr}")]
    WriteFailed {
        /// Preference domain
        domain: String,
        /// Preference key
        key: String,
        /// Type tag passed to the write
        tag: String,
        /// Exit status, `-1` when the command could not be run
        status: i32,
        /// Standard error of the failed command
        stderr: String,
    },

    /// Empty domain/key or malformed `domain.key` string
    #[error("invalid entry: {0}")]
    InvalidEntry(String),

    /// The process-wide registry was already installed
    #[error("codec registry is already installed")]
    RegistrySealed,

    /// A probe command could not be executed at all
    #[error("backend error: {message}")]
    Backend {
        /// What went wrong while spawning the command
        message: String,
    },
}

impl Error {
    /// Get the error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::UnknownType { .. } | Error::InvalidEntry(_) | Error::RegistrySealed => {
                ErrorCategory::Config
            }
            Error::UnrepresentableValue { .. } | Error::TypeInferenceFailed { .. } => {
                ErrorCategory::Encoding
            }
            Error::WriteFailed { .. } | Error::Backend { .. } => ErrorCategory::Command,
        }
    }

    /// Whether this error is worth retrying.
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }
}

/// Result type for preference operations.
pub type Result<T> = std::result::Result<T, Error>;
