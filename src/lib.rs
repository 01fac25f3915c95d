//! Browser capabilities lookup, driven by a browscap catalog.
//!
//! A browscap catalog (typically a `browscap.ini` file) names browsers by
//! wildcard patterns over the `User-Agent` header, and describes the
//! capabilities of each of them (e.g. javascript support, platform,
//! whether it is a crawler). This crate compiles such a catalog once into
//! an index, and answers lookups against it for the lifetime of the process.
//!
//! ```
//! use browscap::Browscap;
//!
//! let catalog = browscap::ini::parse_str(r#"
//! [Default Browser]
//! Cookies=true
//!
//! [Mozilla/5.0*Firefox/*]
//! Parent=Default Browser
//! Browser=Firefox
//! MajorVer=99
//! "#).unwrap();
//!
//! let browscap = Browscap::build(&catalog).unwrap();
//! let profile = browscap.query("Mozilla/5.0 (X11; Linux) Firefox/99.0").unwrap();
//! assert_eq!(profile.browser, "Firefox");
//! assert_eq!(profile.major_ver, 99);
//! assert!(profile.cookies);
//! ```
//!
//! | crate | purpose |
//! |-|-|
//! | [`browscap-core`](browscap_core) | catalog model, compilation and matching |
//! | [`browscap-ini`](browscap_ini) | decoding of `browscap.ini` files |

#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(not(test), warn(clippy::print_stdout, clippy::dbg_macro))]

#[doc(inline)]
pub use browscap_core::{
    Browscap, CapabilityProfile, CatalogConfig, CatalogEntry, CatalogIndex, Matcher, RawCatalog,
};

pub mod error {
    //! Error types and utilities for browscap.

    #[doc(inline)]
    pub use browscap_core::error::*;

    #[doc(inline)]
    pub use browscap_ini::{IniError, IniErrorKind};
}

pub mod cache {
    //! External cache support for compiled catalogs.

    #[doc(inline)]
    pub use browscap_core::cache::*;
}

pub mod catalog {
    //! Catalog model, compilation and matching.

    #[doc(inline)]
    pub use browscap_core::*;
}

pub mod ini {
    //! Decoding of `browscap.ini` files.

    #[doc(inline)]
    pub use browscap_ini::*;
}
