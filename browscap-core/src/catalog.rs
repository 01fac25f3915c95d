use indexmap::IndexMap;
use indexmap::map::Entry;

/// Attribute key used by browscap catalogs to name the parent entry.
pub const DEFAULT_PARENT_KEY: &str = "Parent";

/// Name of the root (default) meta entry of a browscap catalog.
pub const DEFAULT_ROOT_SECTION: &str = "*";

/// Name of the version marker meta entry of a browscap catalog.
pub const DEFAULT_VERSION_SECTION: &str = "GJK_Browscap_Version";

/// A single named section of a raw (not yet compiled) catalog.
///
/// The name doubles as the wildcard pattern which user agents are matched against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    name: String,
    attributes: IndexMap<String, String>,
}

impl CatalogEntry {
    /// Create a new [`CatalogEntry`] without any attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
        }
    }

    /// Add (or overwrite) an attribute of the [`CatalogEntry`].
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Add (or overwrite) an attribute of the [`CatalogEntry`].
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Declare the parent of this [`CatalogEntry`],
    /// using the default [`DEFAULT_PARENT_KEY`] attribute.
    #[must_use]
    pub fn with_parent(self, parent: impl Into<String>) -> Self {
        self.with_attribute(DEFAULT_PARENT_KEY, parent)
    }

    /// Name (wildcard pattern) of the entry.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the raw value of an attribute.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Iterate over the attributes of this entry, in the order they were declared.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// An ordered collection of [`CatalogEntry`] values,
/// as decoded from a catalog source (e.g. a `browscap.ini` file).
///
/// Section order is preserved, as it determines which entry
/// wins a match in case of equally specific patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCatalog {
    entries: IndexMap<String, CatalogEntry>,
}

impl RawCatalog {
    /// Create a new empty [`RawCatalog`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry into the catalog.
    ///
    /// An entry with a name already present is merged into
    /// the existing entry, attributes of the new entry winning.
    /// The original position of the entry is kept.
    pub fn insert(&mut self, entry: CatalogEntry) {
        match self.entries.entry(entry.name.clone()) {
            Entry::Occupied(mut occupied) => {
                occupied.get_mut().attributes.extend(entry.attributes);
            }
            Entry::Vacant(vacant) => {
                vacant.insert(entry);
            }
        }
    }

    /// Insert an entry into the catalog, see [`Self::insert`].
    #[must_use]
    pub fn with_entry(mut self, entry: CatalogEntry) -> Self {
        self.insert(entry);
        self
    }

    /// Get an entry by its name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.get(name)
    }

    /// Returns `true` if an entry with this name is part of the catalog.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterate over all entries, in section order.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    /// Number of entries in the catalog, meta entries included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the catalog has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<CatalogEntry> for RawCatalog {
    fn from_iter<T: IntoIterator<Item = CatalogEntry>>(iter: T) -> Self {
        let mut catalog = Self::new();
        for entry in iter {
            catalog.insert(entry);
        }
        catalog
    }
}

impl Extend<CatalogEntry> for RawCatalog {
    fn extend<T: IntoIterator<Item = CatalogEntry>>(&mut self, iter: T) {
        for entry in iter {
            self.insert(entry);
        }
    }
}

/// Configuration used to compile a [`RawCatalog`] into a [`CatalogIndex`].
///
/// [`CatalogIndex`]: crate::CatalogIndex
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    meta_sections: Vec<String>,
    parent_key: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            meta_sections: vec![
                DEFAULT_ROOT_SECTION.to_owned(),
                DEFAULT_VERSION_SECTION.to_owned(),
            ],
            parent_key: DEFAULT_PARENT_KEY.to_owned(),
        }
    }
}

impl CatalogConfig {
    /// Create a new [`CatalogConfig`] with browscap defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the meta sections stripped before indexing.
    #[must_use]
    pub fn with_meta_sections<I, S>(mut self, sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_meta_sections(sections);
        self
    }

    /// Replace the meta sections stripped before indexing.
    pub fn set_meta_sections<I, S>(&mut self, sections: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.meta_sections = sections.into_iter().map(Into::into).collect();
        self
    }

    /// Overwrite the attribute key naming the parent of an entry.
    #[must_use]
    pub fn with_parent_key(mut self, key: impl Into<String>) -> Self {
        self.parent_key = key.into();
        self
    }

    /// Overwrite the attribute key naming the parent of an entry.
    pub fn set_parent_key(&mut self, key: impl Into<String>) -> &mut Self {
        self.parent_key = key.into();
        self
    }

    /// Returns `true` if the section name is one of the meta sections.
    #[must_use]
    pub fn is_meta_section(&self, name: &str) -> bool {
        self.meta_sections.iter().any(|s| s == name)
    }

    /// Names of the meta sections stripped before indexing.
    pub fn meta_sections(&self) -> impl Iterator<Item = &str> {
        self.meta_sections.iter().map(String::as_str)
    }

    /// Attribute key naming the parent of an entry.
    #[must_use]
    pub fn parent_key(&self) -> &str {
        &self.parent_key
    }
}
