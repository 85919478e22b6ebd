use anyhow::{Context, Result, bail};
use prefkit::{CodecRegistry, PreferenceEntry, RegistryBuilder, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

// ============================================================================
// Main Config Schema
// ============================================================================

/// The prefsync configuration file
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct PrefsyncConfig {
    /// Engine settings
    #[serde(default)]
    pub settings: Settings,

    /// Desired defaults entries
    #[serde(default)]
    pub defaults: Vec<DefaultEntry>,

    /// Services to restart after defaults change
    #[serde(default)]
    pub restart: RestartConfig,
}

impl PrefsyncConfig {
    /// Load the config from `path`, or from the default location
    ///
    /// A missing file yields the default (empty) config.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => crate::paths::config_file()?,
        };

        if !config_path.exists() {
            log::debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Could not read config file: {}", config_path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Invalid config file: {}", config_path.display()))
    }

    /// Parse and validate TOML content
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Invalid TOML format")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.settings.defaults_command.trim().is_empty() {
            bail!("settings.defaults_command must not be empty");
        }

        let mut seen = HashSet::new();
        for (index, entry) in self.defaults.iter().enumerate() {
            if entry.domain.trim().is_empty() || entry.key.trim().is_empty() {
                bail!("defaults[{index}]: domain and key are required");
            }
            if !seen.insert((entry.domain.as_str(), entry.key.as_str())) {
                bail!(
                    "defaults[{index}]: duplicate entry {}.{}",
                    entry.domain,
                    entry.key
                );
            }
        }

        Ok(())
    }

    /// Build the codec registry these settings call for
    pub fn registry(&self) -> CodecRegistry {
        let mut builder = RegistryBuilder::with_builtins();
        if self.settings.extra_types {
            builder.with_numeric();
        }
        builder.build()
    }

    /// Desired entries, optionally filtered by a `domain.key` substring
    pub fn entries(&self, target: Option<&str>) -> Result<Vec<PreferenceEntry>> {
        self.defaults
            .iter()
            .map(DefaultEntry::to_entry)
            .filter(|entry| match (entry, target) {
                (Ok(e), Some(t)) => e.id().contains(t),
                _ => true,
            })
            .collect()
    }
}

// ============================================================================
// Settings
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Number of entries reconciled in parallel
    #[serde(default = "default_jobs")]
    pub jobs: usize,

    /// Program used to read and write defaults
    #[serde(default = "default_command")]
    pub defaults_command: String,

    /// Register integer and float types after boolean and string
    #[serde(default = "default_true")]
    pub extra_types: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            jobs: default_jobs(),
            defaults_command: default_command(),
            extra_types: true,
        }
    }
}

fn default_jobs() -> usize {
    4
}

fn default_command() -> String {
    prefkit::backend::defaults::DEFAULTS_PROGRAM.to_string()
}

fn default_true() -> bool {
    true
}

// ============================================================================
// Defaults entries
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultEntry {
    /// Domain (e.g., "com.apple.finder")
    pub domain: String,

    /// Key (e.g., "ShowPathbar")
    pub key: String,

    /// Explicit type tag; inherited from the system or inferred when omitted
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_tag: Option<String>,

    /// Desired value
    #[serde(default)]
    pub value: Value,
}

impl DefaultEntry {
    pub fn to_entry(&self) -> Result<PreferenceEntry> {
        let entry = PreferenceEntry::new(&self.domain, &self.key, self.value.clone())?;
        Ok(match &self.type_tag {
            Some(tag) => entry.with_type(tag.clone()),
            None => entry,
        })
    }
}

// ============================================================================
// Restart
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestartConfig {
    /// Processes to `killall` after an apply that changed something
    #[serde(default)]
    pub services: Vec<String>,
}
