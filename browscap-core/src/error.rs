//! Error types for browscap.
//!
//! The [`BoxError`] type is a type-erased error type used where it matters
//! more _that_ something failed than _what_ failed, for example while loading
//! a catalog from disk or from an external cache. Catalog defects found while
//! compiling a catalog are reported as a concrete [`CatalogError`] instead.

use std::{
    error::Error as StdError,
    fmt::{self, Debug, Display},
    sync::Arc,
};

/// Alias for a type-erased error type.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Configuration defect found while compiling a catalog.
///
/// These are fatal: a catalog that produces one of these
/// cannot be turned into a [`CatalogIndex`](crate::CatalogIndex).
#[derive(Debug, Clone)]
pub struct CatalogError {
    entry: Arc<str>,
    kind: CatalogErrorKind,
}

/// The kind of [`CatalogError`].
#[derive(Debug, Clone)]
pub enum CatalogErrorKind {
    /// The wildcard name of the entry did not compile into a pattern.
    InvalidPattern(regex::Error),
    /// Following the parent chain of the entry leads back to an entry already visited.
    ParentCycle,
    /// The entry (or one of its ancestors) names a parent which is not part of the catalog.
    MissingParent(Arc<str>),
    /// The entry itself is not part of the catalog.
    UnknownEntry,
}

impl CatalogError {
    pub(crate) fn new(entry: impl Into<Arc<str>>, kind: CatalogErrorKind) -> Self {
        Self {
            entry: entry.into(),
            kind,
        }
    }

    /// Name of the offending catalog entry.
    #[must_use]
    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// Kind of catalog defect.
    #[must_use]
    pub fn kind(&self) -> &CatalogErrorKind {
        &self.kind
    }
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            CatalogErrorKind::InvalidPattern(err) => {
                write!(f, "catalog entry '{}': invalid pattern: {err}", self.entry)
            }
            CatalogErrorKind::ParentCycle => {
                write!(f, "catalog entry '{}': cyclic parent chain", self.entry)
            }
            CatalogErrorKind::MissingParent(parent) => write!(
                f,
                "catalog entry '{}': parent '{parent}' not found in catalog",
                self.entry
            ),
            CatalogErrorKind::UnknownEntry => {
                write!(f, "catalog entry '{}': not found in catalog", self.entry)
            }
        }
    }
}

impl StdError for CatalogError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.kind {
            CatalogErrorKind::InvalidPattern(err) => Some(err),
            CatalogErrorKind::ParentCycle
            | CatalogErrorKind::MissingParent(_)
            | CatalogErrorKind::UnknownEntry => None,
        }
    }
}

/// A type-erased error, mostly used to carry a message
/// or a [`BoxError`] with some context attached.
pub struct OpaqueError(BoxError);

impl OpaqueError {
    /// create an [`OpaqueError`] from a display object
    pub fn from_display(msg: impl Display + Debug + Send + Sync + 'static) -> Self {
        Self(Box::new(MessageError(msg)))
    }

    /// create an [`OpaqueError`] from a boxed error
    #[must_use]
    pub fn from_boxed(inner: BoxError) -> Self {
        Self(inner)
    }

    /// Consumes the [`OpaqueError`] and returns it as a [`BoxError`].
    #[must_use]
    pub fn into_boxed(self) -> BoxError {
        self.0
    }
}

impl Debug for OpaqueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for OpaqueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl StdError for OpaqueError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

struct MessageError<M>(M);

impl<M: Debug> Debug for MessageError<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl<M: Display> Display for MessageError<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<M: Display + Debug> StdError for MessageError<M> {}

struct ContextError<C> {
    context: C,
    error: BoxError,
}

impl<C: Display> Debug for ContextError<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextError")
            .field("context", &format_args!("{}", self.context))
            .field("error", &self.error)
            .finish()
    }
}

impl<C: Display> Display for ContextError<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.context, self.error)
    }
}

impl<C: Display> StdError for ContextError<C> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.error.as_ref())
    }
}

/// Extends the `Result` and `Option` types with methods for adding context to errors.
///
/// # Examples
///
/// ```
/// use browscap_core::error::ErrorContext;
///
/// let result = "hello".parse::<i32>().context("parse integer");
/// assert_eq!("parse integer: invalid digit found in string", result.unwrap_err().to_string());
/// ```
pub trait ErrorContext: private::SealedErrorContext {
    /// The resulting context type after adding context to the contained error.
    type Context;

    /// Add a static context to the contained error.
    fn context<M>(self, context: M) -> Self::Context
    where
        M: Display + Send + Sync + 'static;

    /// Lazily add a context to the contained error, if it exists.
    fn with_context<C, F>(self, context: F) -> Self::Context
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> ErrorContext for Result<T, E>
where
    E: Into<BoxError>,
{
    type Context = Result<T, OpaqueError>;

    fn context<M>(self, context: M) -> Self::Context
    where
        M: Display + Send + Sync + 'static,
    {
        self.map_err(|error| {
            OpaqueError(Box::new(ContextError {
                context,
                error: error.into(),
            }))
        })
    }

    fn with_context<C, F>(self, context: F) -> Self::Context
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|error| {
            OpaqueError(Box::new(ContextError {
                context: context(),
                error: error.into(),
            }))
        })
    }
}

impl<T> ErrorContext for Option<T> {
    type Context = Result<T, OpaqueError>;

    fn context<M>(self, context: M) -> Self::Context
    where
        M: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| {
            OpaqueError(Box::new(ContextError {
                context,
                error: Box::new(MessageError("Option is None")),
            }))
        })
    }

    fn with_context<C, F>(self, context: F) -> Self::Context
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| {
            OpaqueError(Box::new(ContextError {
                context: context(),
                error: Box::new(MessageError("Option is None")),
            }))
        })
    }
}

mod private {
    pub trait SealedErrorContext {}

    impl<T, E> SealedErrorContext for Result<T, E> where E: Into<super::BoxError> {}
    impl<T> SealedErrorContext for Option<T> {}
}
