use ahash::{HashMap, HashMapExt as _, HashSet, HashSetExt as _};
use std::sync::Arc;

use crate::{
    CatalogEntry, RawCatalog,
    error::{CatalogError, CatalogErrorKind},
};

/// Flattened attributes of a catalog entry,
/// borrowed from the [`RawCatalog`] they were resolved from.
pub type ResolvedAttributes<'a> = HashMap<&'a str, &'a str>;

/// Resolve the attributes of a catalog entry,
/// merging in the attributes of all its ancestors.
///
/// Attributes declared closer to the entry win over
/// the ones declared further up the parent chain.
///
/// # Errors
///
/// Returns a [`CatalogError`] carrying `name` in case the entry or
/// one of its ancestors is not found, or the parent chain is cyclic.
pub fn resolve_attributes<'a>(
    catalog: &'a RawCatalog,
    name: &str,
    parent_key: &str,
) -> Result<ResolvedAttributes<'a>, CatalogError> {
    resolve_attributes_with(name, parent_key, |name| catalog.get(name))
}

/// Same as [`resolve_attributes`], but with entries looked up using `lookup`,
/// allowing a subset of the catalog to be hidden.
pub(crate) fn resolve_attributes_with<'a, F>(
    name: &str,
    parent_key: &str,
    lookup: F,
) -> Result<ResolvedAttributes<'a>, CatalogError>
where
    F: Fn(&str) -> Option<&'a CatalogEntry>,
{
    let chain = parent_chain(name, parent_key, lookup)?;

    let mut attributes = HashMap::new();
    for entry in chain.into_iter().rev() {
        attributes.extend(entry.attributes());
    }
    Ok(attributes)
}

/// Collect the entry and all its ancestors, the entry itself first.
pub(crate) fn parent_chain<'a, F>(
    name: &str,
    parent_key: &str,
    lookup: F,
) -> Result<Vec<&'a CatalogEntry>, CatalogError>
where
    F: Fn(&str) -> Option<&'a CatalogEntry>,
{
    let mut chain = Vec::new();
    let mut visited = HashSet::new();

    let mut current =
        lookup(name).ok_or_else(|| CatalogError::new(name, CatalogErrorKind::UnknownEntry))?;
    loop {
        if !visited.insert(current.name()) {
            return Err(CatalogError::new(name, CatalogErrorKind::ParentCycle));
        }
        chain.push(current);

        let Some(parent) = current.attribute(parent_key) else {
            break;
        };
        current = lookup(parent).ok_or_else(|| {
            CatalogError::new(name, CatalogErrorKind::MissingParent(Arc::from(parent)))
        })?;
    }

    Ok(chain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_PARENT_KEY;

    fn catalog() -> RawCatalog {
        [
            CatalogEntry::new("Default Browser")
                .with_attribute("Browser", "Default")
                .with_attribute("JavaScript", "true")
                .with_attribute("Cookies", "false"),
            CatalogEntry::new("Firefox")
                .with_parent("Default Browser")
                .with_attribute("Browser", "Firefox")
                .with_attribute("Cookies", "true"),
            CatalogEntry::new("Mozilla/5.0*Firefox/99*")
                .with_parent("Firefox")
                .with_attribute("MajorVer", "99"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn child_overrides_ancestors() {
        let catalog = catalog();
        let attrs = resolve_attributes(&catalog, "Mozilla/5.0*Firefox/99*", DEFAULT_PARENT_KEY)
            .unwrap();
        assert_eq!(attrs.get("Browser"), Some(&"Firefox"));
        assert_eq!(attrs.get("Cookies"), Some(&"true"));
        assert_eq!(attrs.get("JavaScript"), Some(&"true"));
        assert_eq!(attrs.get("MajorVer"), Some(&"99"));
        assert_eq!(attrs.get("Parent"), Some(&"Firefox"));
    }

    #[test]
    fn root_entry_only_has_own_attributes() {
        let catalog = catalog();
        let attrs = resolve_attributes(&catalog, "Default Browser", DEFAULT_PARENT_KEY).unwrap();
        assert_eq!(attrs.len(), 3);
        assert_eq!(attrs.get("Browser"), Some(&"Default"));
    }

    #[test]
    fn missing_parent_is_an_error() {
        let catalog: RawCatalog = [CatalogEntry::new("a").with_parent("nope")]
            .into_iter()
            .collect();
        let err = resolve_attributes(&catalog, "a", DEFAULT_PARENT_KEY).unwrap_err();
        assert_eq!(err.entry(), "a");
        assert!(
            matches!(err.kind(), CatalogErrorKind::MissingParent(parent) if &**parent == "nope")
        );
    }

    #[test]
    fn cyclic_parent_chain_is_an_error() {
        let catalog: RawCatalog = [
            CatalogEntry::new("a").with_parent("b"),
            CatalogEntry::new("b").with_parent("c"),
            CatalogEntry::new("c").with_parent("a"),
            CatalogEntry::new("leaf").with_parent("a"),
        ]
        .into_iter()
        .collect();
        let err = resolve_attributes(&catalog, "leaf", DEFAULT_PARENT_KEY).unwrap_err();
        assert_eq!(err.entry(), "leaf");
        assert!(matches!(err.kind(), CatalogErrorKind::ParentCycle));

        let catalog: RawCatalog = [CatalogEntry::new("self").with_parent("self")]
            .into_iter()
            .collect();
        let err = resolve_attributes(&catalog, "self", DEFAULT_PARENT_KEY).unwrap_err();
        assert!(matches!(err.kind(), CatalogErrorKind::ParentCycle));
    }

    #[test]
    fn unknown_entry_is_an_error() {
        let err = resolve_attributes(&catalog(), "Opera*", DEFAULT_PARENT_KEY).unwrap_err();
        assert!(matches!(err.kind(), CatalogErrorKind::UnknownEntry));
    }
}
