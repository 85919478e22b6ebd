//! Codec registry: type tag to codec, in registration order.
//!
//! Registries are assembled with a [`RegistryBuilder`] and frozen by
//! [`RegistryBuilder::build`]. A [`CodecRegistry`] has no mutating methods,
//! so once reconciliation starts the set of codecs cannot change and the
//! registry can be shared across threads without locking.
//!
//! Registration order matters: [`CodecRegistry::infer_type`] returns the
//! first codec whose encoder accepts a value, so narrow types (`boolean`)
//! must be registered before permissive ones (`string`).

use crate::codec::{self, Codec};
use crate::error::{Error, Result};
use crate::value::Value;
use indexmap::IndexMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Mutable registry under construction.
#[derive(Default)]
pub struct RegistryBuilder {
    codecs: IndexMap<String, Codec>,
}

impl RegistryBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder holding the built-in `boolean` and `string` codecs.
    pub fn with_builtins() -> Self {
        let mut builder = Self::new();
        builder.insert(codec::boolean()).insert(codec::string());
        builder
    }

    /// Register a codec from its parts.
    ///
    /// Re-registering a tag replaces the codec but keeps the tag's original
    /// position in the inference order.
    pub fn register<D, E>(&mut self, tag: impl Into<String>, decode: D, encode: E) -> &mut Self
    where
        D: Fn(&str) -> Value + Send + Sync + 'static,
        E: Fn(&Value) -> Option<String> + Send + Sync + 'static,
    {
        self.insert(Codec::new(tag, decode, encode))
    }

    /// Register a prebuilt codec.
    pub fn insert(&mut self, codec: Codec) -> &mut Self {
        if self.codecs.contains_key(codec.tag()) {
            log::debug!("Replacing codec for type '{}'", codec.tag());
        }
        self.codecs.insert(codec.tag().to_string(), codec);
        self
    }

    /// Register the optional `integer` and `float` codecs.
    pub fn with_numeric(&mut self) -> &mut Self {
        self.insert(codec::integer()).insert(codec::float())
    }

    /// Freeze the builder into a read-only registry.
    pub fn build(self) -> CodecRegistry {
        CodecRegistry {
            codecs: self.codecs,
        }
    }
}

/// Read-only mapping from type tag to codec.
#[derive(Clone)]
pub struct CodecRegistry {
    codecs: IndexMap<String, Codec>,
}

impl CodecRegistry {
    /// Registry with only the built-in codecs.
    pub fn builtin() -> Self {
        RegistryBuilder::with_builtins().build()
    }

    /// Look up a codec by tag.
    pub fn get(&self, tag: &str) -> Option<&Codec> {
        self.codecs.get(tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.codecs.contains_key(tag)
    }

    /// Registered tags in inference order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.codecs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }

    /// Decode raw text under `tag`.
    ///
    /// Text the codec does not recognize yields `Ok(Value::Absent)`; only an
    /// unregistered tag is an error.
    pub fn decode(&self, tag: &str, raw: &str) -> Result<Value> {
        Ok(self.lookup(tag)?.decode(raw))
    }

    /// Encode `value` under `tag`, `Ok(None)` when the value does not fit.
    pub fn encode(&self, tag: &str, value: &Value) -> Result<Option<String>> {
        Ok(self.lookup(tag)?.encode(value))
    }

    /// First tag, in registration order, whose encoder accepts `value`.
    pub fn infer_type(&self, value: &Value) -> Option<&str> {
        let tag = self
            .codecs
            .values()
            .find(|codec| codec.accepts(value))
            .map(Codec::tag);
        log::debug!("Guessing defaults type for {value}: {tag:?}");
        tag
    }

    fn lookup(&self, tag: &str) -> Result<&Codec> {
        self.codecs.get(tag).ok_or_else(|| Error::UnknownType {
            tag: tag.to_string(),
        })
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("tags", &self.tags().collect::<Vec<_>>())
            .finish()
    }
}

static GLOBAL: OnceLock<Arc<CodecRegistry>> = OnceLock::new();

/// Install the process-wide registry.
///
/// Succeeds once; afterwards (or after [`global`] has been called) the slot
/// is sealed and this returns [`Error::RegistrySealed`].
pub fn install(registry: CodecRegistry) -> Result<Arc<CodecRegistry>> {
    GLOBAL
        .set(Arc::new(registry))
        .map_err(|_| Error::RegistrySealed)?;
    Ok(global())
}

/// The process-wide registry, falling back to the built-ins.
pub fn global() -> Arc<CodecRegistry> {
    Arc::clone(GLOBAL.get_or_init(|| Arc::new(CodecRegistry::builtin())))
}
