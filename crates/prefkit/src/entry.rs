//! Desired state of one preference entry.

use crate::error::{Error, Result};
use crate::value::Value;
use std::fmt;

/// The global domain, addressed as a prefix in `domain.key` strings.
pub const GLOBAL_DOMAIN: &str = "NSGlobalDomain";

/// A `(domain, key)` entry with its desired type and value.
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceEntry {
    domain: String,
    key: String,
    type_tag: Option<String>,
    value: Value,
}

impl PreferenceEntry {
    /// Create an entry whose type is inherited or inferred.
    ///
    /// Fails if `domain` or `key` is empty.
    pub fn new(domain: &str, key: &str, value: impl Into<Value>) -> Result<Self> {
        if domain.trim().is_empty() {
            return Err(Error::InvalidEntry("domain must not be empty".to_string()));
        }
        if key.trim().is_empty() {
            return Err(Error::InvalidEntry(format!(
                "key must not be empty (domain {domain})"
            )));
        }
        Ok(Self {
            domain: domain.to_string(),
            key: key.to_string(),
            type_tag: None,
            value: value.into(),
        })
    }

    /// Parse the `domain.key` form, e.g. `com.apple.finder.ShowPathbar`.
    ///
    /// The key is everything after the last dot, except for
    /// `NSGlobalDomain.<key>` where the key may itself contain dots.
    pub fn from_domain_key(domain_key: &str, value: impl Into<Value>) -> Result<Self> {
        if let Some(key) = domain_key
            .strip_prefix(GLOBAL_DOMAIN)
            .and_then(|rest| rest.strip_prefix('.'))
        {
            return Self::new(GLOBAL_DOMAIN, key, value);
        }

        match domain_key.rsplit_once('.') {
            Some((domain, key)) => Self::new(domain, key, value),
            None => Err(Error::InvalidEntry(format!(
                "expected domain.key, got '{domain_key}'"
            ))),
        }
    }

    /// Pin the type tag instead of inheriting or inferring it.
    pub fn with_type(mut self, type_tag: impl Into<String>) -> Self {
        self.type_tag = Some(type_tag.into());
        self
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn type_tag(&self) -> Option<&str> {
        self.type_tag.as_deref()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Identifier in `domain.key` form.
    pub fn id(&self) -> String {
        format!("{}.{}", self.domain, self.key)
    }
}

impl fmt::Display for PreferenceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "defaults[{} {}]", self.domain, self.key)
    }
}
