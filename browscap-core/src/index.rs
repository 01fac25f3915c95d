use ahash::HashSet;
use indexmap::IndexMap;
use std::sync::Arc;

use crate::{
    CapabilityProfile, CatalogConfig, CompiledPattern, RawCatalog,
    error::{CatalogError, CatalogErrorKind},
    resolve::{parent_chain, resolve_attributes_with},
};

/// The compiled, queryable form of a [`RawCatalog`].
///
/// Only leaf entries (entries that are never used as the parent
/// of another entry) are indexed. All other entries only exist to
/// provide attributes to their descendants.
///
/// Both mappings keep the section order of the catalog,
/// which is the order in which patterns are tried by the matcher.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    profiles: IndexMap<Arc<str>, CapabilityProfile>,
    patterns: IndexMap<Arc<str>, CompiledPattern>,
}

impl CatalogIndex {
    /// Compile a [`RawCatalog`] using the default [`CatalogConfig`].
    ///
    /// # Errors
    ///
    /// See [`Self::build_with_config`].
    pub fn build(catalog: &RawCatalog) -> Result<Self, CatalogError> {
        Self::build_with_config(catalog, &CatalogConfig::default())
    }

    /// Compile a [`RawCatalog`] into a [`CatalogIndex`].
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] for the first entry (in catalog order) that has
    /// a missing or cyclic parent, whether or not a leaf descends from it,
    /// or for the first leaf entry whose name does not compile into a pattern.
    /// Meta sections are not part of the catalog as far as parents are concerned.
    pub fn build_with_config(
        catalog: &RawCatalog,
        config: &CatalogConfig,
    ) -> Result<Self, CatalogError> {
        let _span = tracing::debug_span!("catalog_index_build", entries = catalog.len()).entered();

        let parent_key = config.parent_key();
        let entries: Vec<_> = catalog
            .iter()
            .filter(|entry| !config.is_meta_section(entry.name()))
            .collect();
        tracing::debug!(
            stripped = catalog.len() - entries.len(),
            "meta entries stripped from catalog"
        );

        let parents: HashSet<&str> = entries
            .iter()
            .filter_map(|entry| entry.attribute(parent_key))
            .collect();

        let lookup = |name: &str| catalog.get(name).filter(|_| !config.is_meta_section(name));

        let mut index = Self::default();
        for entry in entries {
            let name = entry.name();
            if parents.contains(name) {
                // never matched, but its chain still has to be sound
                parent_chain(name, parent_key, lookup)?;
                continue;
            }

            let attributes = resolve_attributes_with(name, parent_key, lookup)?;
            let profile = CapabilityProfile::from_attributes(&attributes);
            let pattern = CompiledPattern::compile(name)
                .map_err(|err| CatalogError::new(name, CatalogErrorKind::InvalidPattern(err)))?;

            let name: Arc<str> = Arc::from(name);
            index.profiles.insert(name.clone(), profile);
            index.patterns.insert(name, pattern);
        }

        tracing::debug!(
            leaves = index.len(),
            parents = parents.len(),
            "catalog index built"
        );
        Ok(index)
    }

    pub(crate) fn from_parts(
        profiles: IndexMap<Arc<str>, CapabilityProfile>,
        patterns: IndexMap<Arc<str>, CompiledPattern>,
    ) -> Self {
        Self { profiles, patterns }
    }

    /// Get the [`CapabilityProfile`] of an indexed entry.
    #[must_use]
    pub fn profile(&self, name: &str) -> Option<&CapabilityProfile> {
        self.profiles.get(name)
    }

    /// Get the [`CompiledPattern`] of an indexed entry.
    #[must_use]
    pub fn pattern(&self, name: &str) -> Option<&CompiledPattern> {
        self.patterns.get(name)
    }

    /// Returns `true` if the entry is indexed.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.patterns.contains_key(name)
    }

    /// Iterate over all profiles, in catalog order.
    pub fn profiles(&self) -> impl Iterator<Item = (&Arc<str>, &CapabilityProfile)> {
        self.profiles.iter()
    }

    /// Iterate over all patterns, in catalog order.
    pub fn patterns(&self) -> impl Iterator<Item = (&Arc<str>, &CompiledPattern)> {
        self.patterns.iter()
    }

    /// Number of indexed (leaf) entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns `true` if no entries are indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
