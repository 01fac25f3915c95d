//! Decoder of `browscap.ini` files into a [`RawCatalog`].
//!
//! Only the subset of the INI format used by browscap catalogs is supported:
//!
//! - `[name]` section headers, where the name is taken verbatim;
//! - `key=value` pairs, the value optionally wrapped in double quotes;
//! - comment lines starting with `;` or `#`, and blank lines.
//!
//! Sections declared more than once are merged, later keys winning.
//!
//! ```
//! let catalog = browscap_ini::parse_str(r#"
//! ;;; browscap.ini
//! [Default Browser]
//! JavaScript=true
//!
//! [Mozilla/5.0*Firefox/*]
//! Parent="Default Browser"
//! Browser="Firefox"
//! "#).unwrap();
//!
//! assert_eq!(catalog.len(), 2);
//! let entry = catalog.get("Mozilla/5.0*Firefox/*").unwrap();
//! assert_eq!(entry.attribute("Parent"), Some("Default Browser"));
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(not(test), warn(clippy::print_stdout, clippy::dbg_macro))]

use browscap_core::{CatalogEntry, RawCatalog};
use std::{
    fmt, io,
    path::{Path, PathBuf},
};

/// Error returned when a `browscap.ini` source could not be decoded.
#[derive(Debug)]
pub struct IniError {
    path: Option<PathBuf>,
    line: Option<usize>,
    kind: IniErrorKind,
}

/// The kind of [`IniError`].
#[derive(Debug)]
#[non_exhaustive]
pub enum IniErrorKind {
    /// The source could not be read.
    Io(io::Error),
    /// A `key=value` pair was found before the first section header.
    PairOutsideSection,
    /// A section header is missing its closing `]`.
    UnterminatedSection,
    /// The line is neither a section header, a pair nor a comment.
    InvalidLine,
}

impl IniError {
    fn syntax(line: usize, kind: IniErrorKind) -> Self {
        Self {
            path: None,
            line: Some(line),
            kind,
        }
    }

    fn with_path(mut self, path: &Path) -> Self {
        self.path = Some(path.to_owned());
        self
    }

    /// The file the error occurred in, if decoded from a file.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The 1-based line number the error occurred at, if any.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    /// The kind of error.
    #[must_use]
    pub fn kind(&self) -> &IniErrorKind {
        &self.kind
    }
}

impl fmt::Display for IniError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(path) = &self.path {
            write!(f, "{}: ", path.display())?;
        }
        if let Some(line) = self.line {
            write!(f, "line {line}: ")?;
        }
        match &self.kind {
            IniErrorKind::Io(err) => write!(f, "read browscap ini: {err}"),
            IniErrorKind::PairOutsideSection => f.write_str("key/value pair outside of a section"),
            IniErrorKind::UnterminatedSection => f.write_str("unterminated section header"),
            IniErrorKind::InvalidLine => f.write_str("invalid line"),
        }
    }
}

impl std::error::Error for IniError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            IniErrorKind::Io(err) => Some(err),
            _ => None,
        }
    }
}

/// Decode the contents of a `browscap.ini` file.
///
/// # Errors
///
/// Returns an [`IniError`] for the first line that cannot be decoded.
pub fn parse_str(input: &str) -> Result<RawCatalog, IniError> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);

    let mut catalog = RawCatalog::new();
    let mut section: Option<CatalogEntry> = None;

    for (idx, line) in input.lines().enumerate() {
        let line_nr = idx + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let Some(end) = header.rfind(']') else {
                return Err(IniError::syntax(line_nr, IniErrorKind::UnterminatedSection));
            };
            if let Some(entry) = section.take() {
                catalog.insert(entry);
            }
            section = Some(CatalogEntry::new(&header[..end]));
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            return Err(IniError::syntax(line_nr, IniErrorKind::InvalidLine));
        };
        let Some(entry) = section.as_mut() else {
            return Err(IniError::syntax(line_nr, IniErrorKind::PairOutsideSection));
        };
        entry.set_attribute(key.trim(), unquote(value.trim()));
    }

    if let Some(entry) = section {
        catalog.insert(entry);
    }

    tracing::debug!(entries = catalog.len(), "browscap ini decoded");
    Ok(catalog)
}

/// Read and decode a `browscap.ini` file.
///
/// # Errors
///
/// Returns an [`IniError`] carrying the path in case the file
/// could not be read or decoded.
pub fn load_path(path: impl AsRef<Path>) -> Result<RawCatalog, IniError> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "load browscap ini");

    let input = std::fs::read_to_string(path).map_err(|err| IniError {
        path: Some(path.to_owned()),
        line: None,
        kind: IniErrorKind::Io(err),
    })?;
    parse_str(&input).map_err(|err| err.with_path(path))
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    const INI: &str = r#"
;;; Provided courtesy of https://browscap.org/
[GJK_Browscap_Version]
Version=5020
Released=Mon, 01 Jan 2024 00:00:00 +0000

; default
[*]
Browser="Default Browser"

[Default Browser]
Browser=Default
JavaScript=true

[Mozilla/5.0 (*Linux*)*Firefox/99.0*]
Parent="Default Browser"
Browser="Firefox"
Version="99.0"
Comment = "ignore ; in values"
"#;

    #[test]
    fn parse_browscap_sections() {
        let catalog = parse_str(INI).unwrap();
        let names: Vec<_> = catalog.iter().map(CatalogEntry::name).collect();
        assert_eq!(
            names,
            [
                "GJK_Browscap_Version",
                "*",
                "Default Browser",
                "Mozilla/5.0 (*Linux*)*Firefox/99.0*"
            ]
        );

        let entry = catalog.get("Mozilla/5.0 (*Linux*)*Firefox/99.0*").unwrap();
        assert_eq!(entry.attribute("Parent"), Some("Default Browser"));
        assert_eq!(entry.attribute("Version"), Some("99.0"));
        assert_eq!(entry.attribute("Comment"), Some("ignore ; in values"));
        assert_eq!(
            catalog
                .get("GJK_Browscap_Version")
                .unwrap()
                .attribute("Released"),
            Some("Mon, 01 Jan 2024 00:00:00 +0000")
        );
    }

    #[test]
    fn duplicate_sections_merge() {
        let catalog = parse_str("[a]\nx=1\ny=1\n[b]\n[a]\ny=2\n").unwrap();
        assert_eq!(catalog.len(), 2);
        let a = catalog.get("a").unwrap();
        assert_eq!(a.attribute("x"), Some("1"));
        assert_eq!(a.attribute("y"), Some("2"));
    }

    #[test]
    fn byte_order_mark_and_empty_values() {
        let catalog = parse_str("\u{feff}[a]\nBrowser=\nPlatform=\"\"\n").unwrap();
        let a = catalog.get("a").unwrap();
        assert_eq!(a.attribute("Browser"), Some(""));
        assert_eq!(a.attribute("Platform"), Some(""));
    }

    #[test]
    fn syntax_errors_carry_line() {
        let err = parse_str("; comment\nBrowser=Lynx\n").unwrap_err();
        assert_eq!(err.line(), Some(2));
        assert!(matches!(err.kind(), IniErrorKind::PairOutsideSection));
        assert_eq!(err.to_string(), "line 2: key/value pair outside of a section");

        let err = parse_str("[a]\n\n[b\n").unwrap_err();
        assert_eq!(err.line(), Some(3));
        assert!(matches!(err.kind(), IniErrorKind::UnterminatedSection));

        let err = parse_str("[a]\nnot a pair\n").unwrap_err();
        assert_eq!(err.line(), Some(2));
        assert!(matches!(err.kind(), IniErrorKind::InvalidLine));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(INI.as_bytes()).unwrap();

        let catalog = load_path(file.path()).unwrap();
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn load_errors_carry_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.ini");
        let err = load_path(&path).unwrap_err();
        assert_eq!(err.path(), Some(path.as_path()));
        assert!(matches!(err.kind(), IniErrorKind::Io(_)));
        assert!(err.line().is_none());

        let path = dir.path().join("broken.ini");
        std::fs::write(&path, "[a]\n[b\n").unwrap();
        let err = load_path(&path).unwrap_err();
        assert_eq!(err.path(), Some(path.as_path()));
        assert_eq!(err.line(), Some(2));
        assert!(err.to_string().ends_with("line 2: unterminated section header"));
    }
}
