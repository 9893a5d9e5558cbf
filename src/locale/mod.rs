//! Locale model and cookie contract for the portal.
//!
//! The first URL path segment carries the locale; the `preferred_language`
//! cookie mirrors it. Absent or unrecognized cookie values are treated as
//! absent and never fail a request.

pub mod middleware;
pub mod negotiate;

use axum::http::HeaderMap;

/// Cookie mirroring the visitor's locale choice.
pub const PREFERRED_LANGUAGE_COOKIE: &str = "preferred_language";

/// Supported portal locales.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Locale {
    /// English (default).
    En,
    /// Arabic.
    Ar,
}

/// Ordered list of supported locales, default first.
pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::En, Locale::Ar];

impl Locale {
    /// Returns the canonical locale label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
        }
    }

    /// Attempts to parse a locale value (case-insensitive, tolerant of region
    /// tags such as `ar-SA`).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        let normalized = value.to_ascii_lowercase();
        let lang = normalized.split(['-', '_']).next().unwrap_or("");
        match lang {
            "en" => Some(Self::En),
            "ar" => Some(Self::Ar),
            _ => None,
        }
    }

    /// Whether the locale reads right-to-left.
    #[must_use]
    pub const fn is_rtl(self) -> bool {
        matches!(self, Self::Ar)
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reads a valid locale from the `preferred_language` cookie.
/// Unrecognized values are treated as absent.
#[must_use]
pub fn preferred_language(headers: &HeaderMap) -> Option<Locale> {
    crate::web::cookies::get(headers, PREFERRED_LANGUAGE_COOKIE)
        .as_deref()
        .and_then(Locale::parse)
}

/// Splits a path into its locale prefix and the remainder, if the first
/// segment is a supported locale.
#[must_use]
pub fn path_locale(path: &str) -> Option<(Locale, &str)> {
    let trimmed = path.strip_prefix('/')?;
    let (first, rest) = match trimmed.split_once('/') {
        Some((first, rest)) => (first, rest),
        None => (trimmed, ""),
    };
    Locale::parse(first).map(|locale| (locale, rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn parse_supported_codes() {
        assert_eq!(Locale::parse("en"), Some(Locale::En));
        assert_eq!(Locale::parse("ar"), Some(Locale::Ar));
        assert_eq!(Locale::parse("AR"), Some(Locale::Ar));
        assert_eq!(Locale::parse("ar-SA"), Some(Locale::Ar));
        assert_eq!(Locale::parse("en_US"), Some(Locale::En));
    }

    #[test]
    fn parse_rejects_unknown() {
        assert_eq!(Locale::parse("fr"), None);
        assert_eq!(Locale::parse(""), None);
        assert_eq!(Locale::parse("  "), None);
        assert_eq!(Locale::parse("arabic"), None);
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(Locale::En.to_string(), "en");
        assert_eq!(Locale::Ar.to_string(), "ar");
        assert!(Locale::Ar.is_rtl());
        assert!(!Locale::En.is_rtl());
    }

    #[test]
    fn preferred_language_ignores_invalid_values() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            HeaderValue::from_static("preferred_language=de"),
        );
        assert_eq!(preferred_language(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            HeaderValue::from_static("preferred_language=ar"),
        );
        assert_eq!(preferred_language(&headers), Some(Locale::Ar));
    }

    #[test]
    fn path_locale_splits_prefix() {
        assert_eq!(path_locale("/en/industries"), Some((Locale::En, "industries")));
        assert_eq!(path_locale("/ar"), Some((Locale::Ar, "")));
        assert_eq!(path_locale("/industries"), None);
        assert_eq!(path_locale("/"), None);
    }
}
