//! Compilation of browscap wildcard names into anchored patterns.

use regex::Regex;
use std::fmt;

/// A catalog entry name compiled into a pattern matching
/// entire user agent strings.
///
/// # Pattern syntax
///
/// - `?` matches exactly one character;
/// - `*` matches any (possibly empty) sequence of characters;
/// - any other character matches itself, case-sensitive.
///
/// The whole input has to match, not just a substring of it.
#[derive(Clone)]
pub struct CompiledPattern {
    regex: Regex,
    name_len: usize,
}

impl CompiledPattern {
    /// Compile a wildcard name into a [`CompiledPattern`].
    ///
    /// # Errors
    ///
    /// Returns the error of the underlying regex engine
    /// in case the translated pattern does not compile,
    /// e.g. because it exceeds the engine size limits.
    pub fn compile(name: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&wildcard_to_regex(name))?;
        Ok(Self {
            regex,
            name_len: name.chars().count(),
        })
    }

    /// Restore a [`CompiledPattern`] from the regex source
    /// previously returned by [`Self::as_regex_str`].
    pub(crate) fn from_regex_source(source: &str, name: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(source)?;
        Ok(Self {
            regex,
            name_len: name.chars().count(),
        })
    }

    /// Returns `true` if the entire input matches this pattern.
    #[inline]
    #[must_use]
    pub fn is_match(&self, input: &str) -> bool {
        self.regex.is_match(input)
    }

    /// Length in characters of the wildcard name this pattern was compiled from.
    #[inline]
    #[must_use]
    pub fn name_len(&self) -> usize {
        self.name_len
    }

    /// The regex source this pattern was translated into.
    #[must_use]
    pub fn as_regex_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl fmt::Debug for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledPattern")
            .field("regex", &self.regex.as_str())
            .field("name_len", &self.name_len)
            .finish()
    }
}

/// Translate a wildcard name into an anchored regex source.
///
/// Literal runs are escaped as a whole, so regex meta characters
/// in the name (`.`, `(`, `[`, `-`, `+`, ...) only ever match themselves.
/// Wildcards match any character, line breaks included.
fn wildcard_to_regex(name: &str) -> String {
    let mut out = String::with_capacity(name.len() * 2 + 6);
    out.push_str("(?s)^");

    let mut literal_start = 0;
    for (idx, c) in name.char_indices() {
        let wildcard = match c {
            '?' => ".",
            '*' => ".*?",
            _ => continue,
        };
        out.push_str(&regex::escape(&name[literal_start..idx]));
        out.push_str(wildcard);
        literal_start = idx + c.len_utf8();
    }
    out.push_str(&regex::escape(&name[literal_start..]));

    out.push('$');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn wildcard_translation() {
        for (name, expected) in [
            ("Mozilla*", r"(?s)^Mozilla.*?$"),
            ("Mozilla?Firefox*", r"(?s)^Mozilla.Firefox.*?$"),
            ("Opera/9.80 (*)", r"(?s)^Opera/9\.80 \(.*?\)$"),
            ("[x]-$^", r"(?s)^\[x\]\-\$\^$"),
            ("", "(?s)^$"),
        ] {
            assert_eq!(wildcard_to_regex(name), expected, "name: {name}");
        }
    }

    #[test]
    fn single_char_wildcard() {
        let pattern = CompiledPattern::compile("Mozilla?Firefox*").unwrap();
        assert!(pattern.is_match("MozillaXFirefoxANYTHING"));
        assert!(pattern.is_match("Mozilla/Firefox"));
        assert!(!pattern.is_match("MozillaFirefox"));
        assert!(!pattern.is_match("MozillaXYFirefox1"));
    }

    #[test]
    fn anchored_at_both_ends() {
        let pattern = CompiledPattern::compile("Firefox").unwrap();
        assert!(pattern.is_match("Firefox"));
        assert!(!pattern.is_match("Mozilla Firefox"));
        assert!(!pattern.is_match("Firefox/99"));
    }

    #[test]
    fn meta_characters_are_literal() {
        let pattern = CompiledPattern::compile("Mozilla/5.0 (Windows NT 10.0*)*").unwrap();
        assert!(pattern.is_match("Mozilla/5.0 (Windows NT 10.0; Win64; x64) Gecko"));
        assert!(!pattern.is_match("Mozilla/5x0 (Windows NT 10.0; Win64; x64) Gecko"));

        let pattern = CompiledPattern::compile("a+b|c{2}").unwrap();
        assert!(pattern.is_match("a+b|c{2}"));
        assert!(!pattern.is_match("aab"));
    }

    #[test]
    fn question_mark_counts_characters_not_bytes() {
        let pattern = CompiledPattern::compile("caf?").unwrap();
        assert!(pattern.is_match("café"));
        assert_eq!(CompiledPattern::compile("café*").unwrap().name_len(), 5);
    }

    #[test]
    fn no_blowup_on_many_wildcards() {
        let pattern = CompiledPattern::compile("*a*a*a*a*a*a*a*a*a*a*a*a*b").unwrap();
        let input = "a".repeat(4096);
        assert!(!pattern.is_match(&input));
    }

    #[test]
    fn restore_from_regex_source() {
        let pattern = CompiledPattern::compile("Mozilla?Firefox*").unwrap();
        let restored =
            CompiledPattern::from_regex_source(pattern.as_regex_str(), "Mozilla?Firefox*")
                .unwrap();
        assert_eq!(restored.name_len(), pattern.name_len());
        assert!(restored.is_match("MozillaXFirefox"));
    }

    #[quickcheck]
    fn literal_name_matches_itself(name: String) -> bool {
        let name: String = name.chars().filter(|c| !matches!(c, '?' | '*')).collect();
        CompiledPattern::compile(&name)
            .map(|pattern| pattern.is_match(&name))
            .unwrap_or(false)
    }

    #[quickcheck]
    fn star_matches_any_suffix(prefix: String, suffix: String) -> bool {
        let prefix: String = prefix
            .chars()
            .filter(|c| !matches!(c, '?' | '*'))
            .collect();
        CompiledPattern::compile(&format!("{prefix}*"))
            .map(|pattern| pattern.is_match(&format!("{prefix}{suffix}")))
            .unwrap_or(false)
    }
}
