// SPDX-License-Identifier: ISC
//! Codec lookup by name.
use std::collections::BTreeMap;

use crate::{Codec, CodecConfig, Error, LzfCodec, Result};

/// Builds a codec from its configuration.
pub type CodecConstructor = fn(CodecConfig) -> Result<Box<dyn Codec>>;

fn lzf_constructor(config: CodecConfig) -> Result<Box<dyn Codec>> {
    Ok(Box::new(LzfCodec::new(config)?))
}

/// Map from codec name to constructor.
///
/// # Example
///
/// ```
/// use lzf_codec::{CodecConfig, Registry};
///
/// let registry = Registry::with_defaults();
/// let codec = registry.create("lzf", CodecConfig::default().with_disk("local")).unwrap();
/// assert_eq!(codec.file_extension(), "lzf");
/// assert_eq!(codec.config().disk.as_deref(), Some("local"));
/// ```
#[derive(Clone, Debug)]
pub struct Registry {
    constructors: BTreeMap<String, CodecConstructor>,
}

impl Registry {
    /// Creates a registry with no codecs.
    pub fn new() -> Self {
        Self { constructors: BTreeMap::new() }
    }

    /// Creates a registry with the codecs built into this crate (`lzf`).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(LzfCodec::NAME, lzf_constructor);
        registry
    }

    /// Registers `constructor` under `name`, returning the one it replaced.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        constructor: CodecConstructor,
    ) -> Option<CodecConstructor> {
        self.constructors.insert(name.into(), constructor)
    }

    /// Builds the codec registered under `name`.
    ///
    /// Returns `Error::UnknownCodec` when nothing is registered under `name`.
    pub fn create(&self, name: &str, config: CodecConfig) -> Result<Box<dyn Codec>> {
        let constructor =
            self.constructors.get(name).ok_or_else(|| Error::UnknownCodec(name.to_owned()))?;
        constructor(config)
    }

    /// Returns `true` if a codec is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
