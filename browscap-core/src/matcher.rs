use ahash::HashMap;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::CatalogIndex;

/// Find the best matching entry of the index for the given input,
/// without consulting or updating any memo.
///
/// All patterns of the index are tried. Of all matching entries the one
/// with the longest name wins, as a longer wildcard name leaves less
/// to the wildcards. Names of equal length are resolved in favour
/// of the entry that comes first in the index.
#[must_use]
pub fn find_best_match(index: &CatalogIndex, input: &str) -> Option<Arc<str>> {
    let mut best: Option<(&Arc<str>, usize)> = None;
    for (name, pattern) in index.patterns() {
        let len = pattern.name_len();
        if best.is_some_and(|(_, best_len)| len <= best_len) {
            continue;
        }
        if pattern.is_match(input) {
            best = Some((name, len));
        }
    }
    best.map(|(name, _)| name.clone())
}

/// Memo of previously matched inputs.
///
/// Maps an input to the name of the entry it matched,
/// or `None` in case nothing matched. It is never evicted,
/// which is fine as the result for an input never changes
/// for the lifetime of a [`CatalogIndex`].
#[derive(Debug, Default)]
pub struct MatchMemo {
    entries: RwLock<HashMap<Arc<str>, Option<Arc<str>>>>,
}

impl MatchMemo {
    /// Create a new empty [`MatchMemo`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the memoized result for an input, if any.
    ///
    /// The outer `Option` tells whether the input was memoized,
    /// the inner one whether it matched an entry.
    #[must_use]
    pub fn get(&self, input: &str) -> Option<Option<Arc<str>>> {
        self.entries.read().get(input).cloned()
    }

    /// Memoize the result for an input, overwriting any previous result.
    pub fn insert(&self, input: impl Into<Arc<str>>, entry: Option<Arc<str>>) {
        self.entries.write().insert(input.into(), entry);
    }

    /// Remove all memoized results.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Number of memoized inputs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if nothing is memoized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub(crate) fn snapshot(&self) -> HashMap<Arc<str>, Option<Arc<str>>> {
        self.entries.read().clone()
    }

    pub(crate) fn extend(&self, entries: impl IntoIterator<Item = (Arc<str>, Option<Arc<str>>)>) {
        self.entries.write().extend(entries);
    }
}

/// Matches inputs against a [`CatalogIndex`], memoizing the outcome.
#[derive(Debug, Default)]
pub struct Matcher {
    memo: MatchMemo,
}

impl Matcher {
    /// Create a new [`Matcher`] with an empty memo.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new [`Matcher`] using an existing memo.
    #[must_use]
    pub fn with_memo(memo: MatchMemo) -> Self {
        Self { memo }
    }

    /// Find the best matching entry name of the index for the given input.
    ///
    /// Memoized results (including "no match") are returned without scanning the index.
    /// See [`find_best_match`] for how the best match is selected.
    pub fn find(&self, index: &CatalogIndex, input: &str) -> Option<Arc<str>> {
        if let Some(entry) = self.memo.get(input) {
            tracing::trace!(input, entry = entry.as_deref(), "match memo hit");
            return entry;
        }

        let entry = find_best_match(index, input);
        tracing::trace!(input, entry = entry.as_deref(), "match memo miss");
        self.memo.insert(input, entry.clone());
        entry
    }

    /// The memo used by this matcher.
    #[must_use]
    pub fn memo(&self) -> &MatchMemo {
        &self.memo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CatalogEntry, RawCatalog};

    fn build_index(names: &[&str]) -> CatalogIndex {
        let catalog: RawCatalog = names.iter().map(|name| CatalogEntry::new(*name)).collect();
        CatalogIndex::build(&catalog).unwrap()
    }

    #[test]
    fn longest_name_wins() {
        let index = build_index(&["Mozilla*", "Mozilla*Firefox*", "*"]);
        assert_eq!(
            find_best_match(&index, "Mozilla/5.0 Firefox/99").as_deref(),
            Some("Mozilla*Firefox*")
        );
        assert_eq!(
            find_best_match(&index, "Mozilla/5.0 Chrome/99").as_deref(),
            Some("Mozilla*")
        );
        assert_eq!(find_best_match(&index, "curl/8.0").as_deref(), Some("*"));
    }

    #[test]
    fn first_entry_wins_ties() {
        let index = build_index(&["Mozilla/?*", "Mozilla?/*"]);
        assert_eq!(
            find_best_match(&index, "Mozilla//x").as_deref(),
            Some("Mozilla/?*")
        );

        let index = build_index(&["Mozilla?/*", "Mozilla/?*"]);
        assert_eq!(
            find_best_match(&index, "Mozilla//x").as_deref(),
            Some("Mozilla?/*")
        );
    }

    #[test]
    fn no_match() {
        let index = build_index(&["Mozilla*"]);
        assert!(find_best_match(&index, "curl/8.0").is_none());
        assert!(find_best_match(&CatalogIndex::default(), "curl/8.0").is_none());
    }

    #[test]
    fn memo_is_consulted_first() {
        let index = build_index(&["Mozilla*"]);
        let matcher = Matcher::new();

        assert_eq!(matcher.find(&index, "Mozilla/5.0").as_deref(), Some("Mozilla*"));
        assert!(matcher.find(&index, "curl/8.0").is_none());
        assert_eq!(matcher.memo().len(), 2);
        assert_eq!(matcher.memo().get("curl/8.0"), Some(None));

        // a memoized result is trusted, even when the index says otherwise
        matcher.memo().insert("curl/8.0", Some(Arc::from("Mozilla*")));
        assert_eq!(matcher.find(&index, "curl/8.0").as_deref(), Some("Mozilla*"));
    }

    #[test]
    fn clearing_memo_reproduces_results() {
        let index = build_index(&["Mozilla*", "Mozilla*Firefox*", "Opera*"]);
        let matcher = Matcher::new();
        let inputs = ["Mozilla/5.0 Firefox/99", "Opera/9.80", "Lynx/2.8", "Mozilla"];

        let first: Vec<_> = inputs.iter().map(|ua| matcher.find(&index, ua)).collect();
        let warm: Vec<_> = inputs.iter().map(|ua| matcher.find(&index, ua)).collect();
        matcher.memo().clear();
        assert!(matcher.memo().is_empty());
        let cold: Vec<_> = inputs.iter().map(|ua| matcher.find(&index, ua)).collect();

        assert_eq!(first, warm);
        assert_eq!(first, cold);
    }

    #[test]
    fn concurrent_queries_agree() {
        let index = build_index(&["Mozilla*", "Mozilla*Firefox*"]);
        let matcher = Matcher::new();
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..32 {
                        assert_eq!(
                            matcher.find(&index, "Mozilla/5.0 Firefox/99").as_deref(),
                            Some("Mozilla*Firefox*")
                        );
                    }
                });
            }
        });
        assert_eq!(matcher.memo().len(), 1);
    }
}
