use std::{fmt, sync::Arc};

use crate::{
    CapabilityProfile, CatalogConfig, CatalogIndex, Matcher, RawCatalog,
    cache::{self, CatalogCache},
    error::{BoxError, CatalogError},
};

/// Browser capabilities lookup.
///
/// Owns a compiled [`CatalogIndex`] together with the memo of
/// previous lookups. Build it once and share it (e.g. in an [`Arc`])
/// with whoever needs to look up user agents, it is `Send + Sync`.
///
/// # Example
///
/// ```
/// use browscap_core::{Browscap, CatalogEntry, RawCatalog};
///
/// let catalog: RawCatalog = [
///     CatalogEntry::new("Default Browser").with_attribute("JavaScript", "true"),
///     CatalogEntry::new("Mozilla/5.0*Firefox/*")
///         .with_parent("Default Browser")
///         .with_attribute("Browser", "Firefox")
///         .with_attribute("MajorVer", "99"),
/// ]
/// .into_iter()
/// .collect();
///
/// let browscap = Browscap::build(&catalog).unwrap();
/// let profile = browscap.query("Mozilla/5.0 (X11) Firefox/99.0").unwrap();
/// assert_eq!(profile.browser, "Firefox");
/// assert_eq!(profile.major_ver, 99);
/// assert!(profile.javascript);
///
/// assert!(browscap.query("curl/8.0").is_none());
/// ```
pub struct Browscap {
    index: CatalogIndex,
    matcher: Matcher,
    cache: Option<AttachedCache>,
}

/// External cache together with the config its catalog is compiled with.
struct AttachedCache {
    store: Arc<dyn CatalogCache>,
    config: CatalogConfig,
}

impl fmt::Debug for Browscap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Browscap")
            .field("index", &self.index)
            .field("matcher", &self.matcher)
            .field("cache", &self.cache.is_some())
            .finish()
    }
}

impl Browscap {
    /// Compile the catalog using the default [`CatalogConfig`].
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] in case the catalog has a defect,
    /// see [`CatalogIndex::build_with_config`].
    pub fn build(catalog: &RawCatalog) -> Result<Self, CatalogError> {
        Self::build_with_config(catalog, &CatalogConfig::default())
    }

    /// Compile the catalog using a custom [`CatalogConfig`].
    ///
    /// # Errors
    ///
    /// See [`CatalogIndex::build_with_config`].
    pub fn build_with_config(
        catalog: &RawCatalog,
        config: &CatalogConfig,
    ) -> Result<Self, CatalogError> {
        CatalogIndex::build_with_config(catalog, config).map(Self::from_index)
    }

    /// Create a [`Browscap`] from an already compiled [`CatalogIndex`].
    #[must_use]
    pub fn from_index(index: CatalogIndex) -> Self {
        Self {
            index,
            matcher: Matcher::new(),
            cache: None,
        }
    }

    /// Load a [`Browscap`] backed by an external [`CatalogCache`].
    ///
    /// In case the cache holds a catalog compiled with the same `config`,
    /// it is used as-is, together with any match memo stored alongside it.
    /// Otherwise the catalog is loaded using `load_catalog`,
    /// compiled, and stored in the cache for the next process,
    /// replacing whatever catalog the cache held.
    ///
    /// A cached catalog that cannot be decoded is ignored
    /// as if the cache was empty.
    ///
    /// # Errors
    ///
    /// Returns an error in case the catalog had to be loaded and
    /// `load_catalog` failed, or the loaded catalog has a defect.
    pub fn load<C, F, E>(
        cache: C,
        config: &CatalogConfig,
        load_catalog: F,
    ) -> Result<Self, BoxError>
    where
        C: CatalogCache,
        F: FnOnce() -> Result<RawCatalog, E>,
        E: Into<BoxError>,
    {
        let store: Arc<dyn CatalogCache> = Arc::new(cache);

        match cache::load_index(store.as_ref(), config) {
            Ok(Some(index)) => {
                let matcher = match cache::load_memo(store.as_ref()) {
                    Ok(memo) => Matcher::with_memo(memo),
                    Err(err) => {
                        tracing::warn!("ignore cached match memo: {err}");
                        Matcher::new()
                    }
                };
                tracing::info!(
                    entries = index.len(),
                    memoized = matcher.memo().len(),
                    "catalog index restored from cache"
                );
                return Ok(Self {
                    index,
                    matcher,
                    cache: Some(AttachedCache {
                        store,
                        config: config.clone(),
                    }),
                });
            }
            Ok(None) => tracing::debug!("no catalog index found in cache"),
            Err(err) => tracing::warn!("ignore cached catalog index: {err}"),
        }

        let catalog = load_catalog().map_err(Into::<BoxError>::into)?;
        let index = CatalogIndex::build_with_config(&catalog, config)?;
        let browscap = Self {
            index,
            matcher: Matcher::new(),
            cache: Some(AttachedCache {
                store,
                config: config.clone(),
            }),
        };
        browscap.persist()?;
        tracing::info!(
            entries = browscap.index.len(),
            "catalog index compiled and written to cache"
        );
        Ok(browscap)
    }

    /// Write the compiled catalog and the current match memo to the cache.
    ///
    /// Does nothing for a [`Browscap`] without a cache.
    ///
    /// # Errors
    ///
    /// Returns an error in case the data could not be encoded.
    pub fn persist(&self) -> Result<(), BoxError> {
        let Some(AttachedCache { store, config }) = &self.cache else {
            return Ok(());
        };
        cache::store_index(store.as_ref(), &self.index, config)?;
        cache::store_memo(store.as_ref(), self.matcher.memo())
    }

    /// Write only the current match memo to the cache.
    ///
    /// Does nothing for a [`Browscap`] without a cache.
    ///
    /// # Errors
    ///
    /// Returns an error in case the memo could not be encoded.
    pub fn persist_memo(&self) -> Result<(), BoxError> {
        match &self.cache {
            Some(AttachedCache { store, .. }) => {
                cache::store_memo(store.as_ref(), self.matcher.memo())
            }
            None => Ok(()),
        }
    }

    /// Look up the [`CapabilityProfile`] of the given user agent.
    ///
    /// Returns `None` in case no entry of the catalog matches.
    #[must_use]
    pub fn query(&self, user_agent: &str) -> Option<&CapabilityProfile> {
        self.query_entry(user_agent).map(|(_, profile)| profile)
    }

    /// Look up the name of the best matching catalog entry
    /// of the given user agent, together with its [`CapabilityProfile`].
    #[must_use]
    pub fn query_entry(&self, user_agent: &str) -> Option<(Arc<str>, &CapabilityProfile)> {
        let entry = self.matcher.find(&self.index, user_agent)?;
        match self.index.profile(&entry) {
            Some(profile) => Some((entry, profile)),
            None => {
                tracing::debug!(%entry, "matched catalog entry has no profile");
                None
            }
        }
    }

    /// The compiled catalog.
    #[must_use]
    pub fn index(&self) -> &CatalogIndex {
        &self.index
    }

    /// Number of user agents memoized so far.
    #[must_use]
    pub fn memo_len(&self) -> usize {
        self.matcher.memo().len()
    }

    /// Forget all memoized lookups.
    pub fn clear_memo(&self) {
        self.matcher.memo().clear();
    }
}
