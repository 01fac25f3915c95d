//! External cache support.
//!
//! A compiled catalog can be stored in an external key/value cache,
//! so that processes other than the first one do not need to decode
//! and compile the catalog again. See [`CatalogCache`].

use ahash::HashMap;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    CapabilityProfile, CatalogConfig, CatalogIndex, CompiledPattern, MatchMemo,
    error::{BoxError, ErrorContext as _},
};

/// Cache key of the profile mapping.
pub const PROFILES_CACHE_KEY: &str = "browscap:user_agent_properties";
/// Cache key of the pattern mapping.
pub const PATTERNS_CACHE_KEY: &str = "browscap:user_agent_regexps";
/// Cache key of the match memo.
pub const MEMO_CACHE_KEY: &str = "browscap:match_cache";
/// Cache key of the [`CatalogConfig`] the cached catalog was compiled with.
pub const CONFIG_CACHE_KEY: &str = "browscap:catalog_config";

/// A key/value store used to persist a compiled catalog.
///
/// Eviction, expiry and coherency between processes
/// are all the responsibility of the implementation.
pub trait CatalogCache: Send + Sync + 'static {
    /// Read the value stored for the key, if any.
    fn read(&self, key: &str) -> Option<Vec<u8>>;

    /// Store a value for the key, replacing any previous value.
    fn write(&self, key: &str, value: Vec<u8>);
}

impl<C: CatalogCache + ?Sized> CatalogCache for Arc<C> {
    fn read(&self, key: &str) -> Option<Vec<u8>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: Vec<u8>) {
        (**self).write(key, value);
    }
}

impl<C: CatalogCache + ?Sized> CatalogCache for Box<C> {
    fn read(&self, key: &str) -> Option<Vec<u8>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: Vec<u8>) {
        (**self).write(key, value);
    }
}

/// An in-process [`CatalogCache`], mostly useful for testing.
#[derive(Debug, Default)]
pub struct MemoryCache {
    values: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryCache {
    /// Create a new empty [`MemoryCache`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if a value is stored for the key.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.read().contains_key(key)
    }
}

impl CatalogCache for MemoryCache {
    fn read(&self, key: &str) -> Option<Vec<u8>> {
        self.values.read().get(key).cloned()
    }

    fn write(&self, key: &str, value: Vec<u8>) {
        self.values.write().insert(key.to_owned(), value);
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredPattern {
    regex: String,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
struct StoredConfig {
    meta_sections: Vec<String>,
    parent_key: String,
}

impl From<&CatalogConfig> for StoredConfig {
    fn from(config: &CatalogConfig) -> Self {
        Self {
            meta_sections: config.meta_sections().map(ToOwned::to_owned).collect(),
            parent_key: config.parent_key().to_owned(),
        }
    }
}

pub(crate) fn store_index(
    cache: &dyn CatalogCache,
    index: &CatalogIndex,
    config: &CatalogConfig,
) -> Result<(), BoxError> {
    let stored_config =
        serde_json::to_vec(&StoredConfig::from(config)).context("encode catalog config")?;

    let profiles: IndexMap<&Arc<str>, &CapabilityProfile> = index.profiles().collect();
    let profiles = serde_json::to_vec(&profiles).context("encode catalog profiles")?;

    let patterns: IndexMap<&Arc<str>, StoredPattern> = index
        .patterns()
        .map(|(name, pattern)| {
            (
                name,
                StoredPattern {
                    regex: pattern.as_regex_str().to_owned(),
                },
            )
        })
        .collect();
    let patterns = serde_json::to_vec(&patterns).context("encode catalog patterns")?;

    cache.write(PROFILES_CACHE_KEY, profiles);
    cache.write(PATTERNS_CACHE_KEY, patterns);
    cache.write(CONFIG_CACHE_KEY, stored_config);
    Ok(())
}

/// Load a [`CatalogIndex`] from the cache.
///
/// Returns `Ok(None)` in case the cache holds no (or an empty) catalog,
/// or a catalog compiled with a different [`CatalogConfig`].
pub(crate) fn load_index(
    cache: &dyn CatalogCache,
    config: &CatalogConfig,
) -> Result<Option<CatalogIndex>, BoxError> {
    let (Some(profiles), Some(patterns), Some(stored_config)) = (
        cache.read(PROFILES_CACHE_KEY),
        cache.read(PATTERNS_CACHE_KEY),
        cache.read(CONFIG_CACHE_KEY),
    ) else {
        return Ok(None);
    };

    let stored_config: StoredConfig =
        serde_json::from_slice(&stored_config).context("decode cached catalog config")?;
    if stored_config != StoredConfig::from(config) {
        tracing::debug!(
            ?stored_config,
            "cached catalog index compiled with another catalog config"
        );
        return Ok(None);
    }

    let profiles: IndexMap<Arc<str>, CapabilityProfile> =
        serde_json::from_slice(&profiles).context("decode cached catalog profiles")?;
    let stored: IndexMap<Arc<str>, StoredPattern> =
        serde_json::from_slice(&patterns).context("decode cached catalog patterns")?;
    if profiles.is_empty() || stored.is_empty() {
        return Ok(None);
    }

    let mut patterns = IndexMap::with_capacity(stored.len());
    for (name, StoredPattern { regex }) in stored {
        let pattern = CompiledPattern::from_regex_source(&regex, &name)
            .with_context(|| format!("restore cached pattern for catalog entry '{name}'"))?;
        patterns.insert(name, pattern);
    }

    Ok(Some(CatalogIndex::from_parts(profiles, patterns)))
}

pub(crate) fn store_memo(cache: &dyn CatalogCache, memo: &MatchMemo) -> Result<(), BoxError> {
    let value = serde_json::to_vec(&memo.snapshot()).context("encode match memo")?;
    cache.write(MEMO_CACHE_KEY, value);
    Ok(())
}

pub(crate) fn load_memo(cache: &dyn CatalogCache) -> Result<MatchMemo, BoxError> {
    let memo = MatchMemo::new();
    if let Some(value) = cache.read(MEMO_CACHE_KEY) {
        let entries: HashMap<Arc<str>, Option<Arc<str>>> =
            serde_json::from_slice(&value).context("decode cached match memo")?;
        memo.extend(entries);
    }
    Ok(memo)
}
