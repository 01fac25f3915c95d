use serde::{Deserialize, Serialize};

use crate::ResolvedAttributes;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// The capabilities of a browser (or bot) as known by the catalog.
///
/// Every field has a value: attributes missing from the catalog resolve
/// to an empty string, `0` or `false`.
pub struct CapabilityProfile {
    /// Name of the browser, e.g. `Firefox`.
    pub browser: String,
    /// Full version of the browser, e.g. `99.0`.
    pub version: String,
    /// Major version of the browser.
    pub major_ver: i64,
    /// Minor version of the browser.
    pub minor_ver: i64,
    /// Platform the browser runs on, e.g. `Linux`.
    pub platform: String,

    pub alpha: bool,
    pub beta: bool,
    pub win16: bool,
    pub win32: bool,
    pub win64: bool,
    pub frames: bool,
    pub iframes: bool,
    pub tables: bool,
    pub cookies: bool,
    pub background_sounds: bool,
    pub javascript: bool,
    pub vbscript: bool,
    pub java_applets: bool,
    pub activex_controls: bool,
    pub is_mobile_device: bool,
    pub is_syndication_reader: bool,
    pub crawler: bool,

    /// Supported CSS level.
    pub css_version: i64,
    /// AOL (online service) version, `0` if not an AOL client.
    pub aol_version: i64,
}

impl CapabilityProfile {
    /// Build a [`CapabilityProfile`] from the resolved (flattened) attributes of a catalog entry.
    #[must_use]
    pub fn from_attributes(attrs: &ResolvedAttributes<'_>) -> Self {
        let string = |key: &str| attrs.get(key).map(|v| (*v).to_owned()).unwrap_or_default();
        let int = |key: &str| attrs.get(key).map(|v| parse_lenient_int(v)).unwrap_or_default();
        let flag = |key: &str| attrs.get(key).is_some_and(|v| *v == "true");

        Self {
            browser: string("Browser"),
            version: string("Version"),
            major_ver: int("MajorVer"),
            minor_ver: int("MinorVer"),
            platform: string("Platform"),
            alpha: flag("Alpha"),
            beta: flag("Beta"),
            win16: flag("Win16"),
            win32: flag("Win32"),
            win64: flag("Win64"),
            frames: flag("Frames"),
            iframes: flag("IFrames"),
            tables: flag("Tables"),
            cookies: flag("Cookies"),
            background_sounds: flag("BackgroundSounds"),
            javascript: flag("JavaScript"),
            vbscript: flag("VBScript"),
            java_applets: flag("JavaApplets"),
            activex_controls: flag("ActiveXControls"),
            is_mobile_device: flag("isMobileDevice"),
            is_syndication_reader: flag("isSyndicationReader"),
            crawler: flag("Crawler"),
            css_version: int("CssVersion"),
            aol_version: int("aolVersion"),
        }
    }
}

/// Parse the leading integer of a value, `0` if there is none.
///
/// Leading whitespace and a sign are accepted, parsing stops
/// at the first non-digit (so `"3.5"` is `3`). Overflow saturates.
fn parse_lenient_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut n: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        let d = i64::from(b - b'0');
        n = n.saturating_mul(10);
        n = if negative {
            n.saturating_sub(d)
        } else {
            n.saturating_add(d)
        };
    }
    n
}
