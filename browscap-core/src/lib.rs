//! Catalog compiler and matching engine for browscap catalogs.
//!
//! A browscap catalog is a list of entries, each named by a wildcard
//! pattern (e.g. `Mozilla/5.0*Firefox/99*`) and carrying attributes
//! (e.g. `Browser=Firefox`), optionally inherited from a parent entry.
//! This crate compiles such a [`RawCatalog`] into a [`CatalogIndex`]
//! and finds, for any user agent, the most specific matching entry
//! and its [`CapabilityProfile`].
//!
//! The main entrypoint is [`Browscap`], which combines a compiled catalog
//! with a memo of previous lookups and optionally an external [`CatalogCache`].
//!
//! # Matching
//!
//! Only leaf entries (entries which are not the parent of another entry)
//! take part in matching. Of all leaf entries whose pattern matches the entire
//! user agent, the one with the longest name wins. In case of a tie the
//! entry that comes first in the catalog wins.
//!
//! Decoding catalogs from `browscap.ini` files is done by the `browscap-ini` crate.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(not(test), warn(clippy::print_stdout, clippy::dbg_macro))]

pub mod error;

mod catalog;
pub use catalog::{
    CatalogConfig, CatalogEntry, DEFAULT_PARENT_KEY, DEFAULT_ROOT_SECTION, DEFAULT_VERSION_SECTION,
    RawCatalog,
};

mod pattern;
pub use pattern::CompiledPattern;

mod resolve;
pub use resolve::{ResolvedAttributes, resolve_attributes};

mod profile;
pub use profile::CapabilityProfile;

mod index;
pub use index::CatalogIndex;

mod matcher;
pub use matcher::{MatchMemo, Matcher, find_best_match};

pub mod cache;
#[doc(inline)]
pub use cache::{CatalogCache, MemoryCache};

mod browscap;
pub use browscap::Browscap;
