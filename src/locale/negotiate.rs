//! `Accept-Language` negotiation for paths that arrive without a locale
//! prefix or cookie preference.

use crate::locale::{Locale, SUPPORTED_LOCALES};
use axum::http::{header::ACCEPT_LANGUAGE, HeaderMap};

/// Picks the best supported locale from an `Accept-Language` header value.
///
/// Entries are ordered by their q-value (default 1.0); unsupported tags are
/// skipped. Returns `None` when nothing matches.
#[must_use]
pub fn best_match(header: &str) -> Option<Locale> {
    let mut candidates: Vec<(f32, Locale)> = header
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split(';');
            let tag = parts.next()?.trim();
            if tag == "*" {
                return Some((quality(parts.next()), SUPPORTED_LOCALES[0]));
            }
            let locale = Locale::parse(tag)?;
            Some((quality(parts.next()), locale))
        })
        .filter(|(q, _)| *q > 0.0)
        .collect();

    // Stable sort keeps header order for equal q-values.
    candidates.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    candidates.first().map(|(_, locale)| *locale)
}

fn quality(param: Option<&str>) -> f32 {
    param
        .and_then(|p| p.trim().strip_prefix("q="))
        .and_then(|q| q.trim().parse::<f32>().ok())
        .unwrap_or(1.0)
}

/// Negotiates a locale for the request, falling back to the given default.
#[must_use]
pub fn negotiate(headers: &HeaderMap, default: Locale) -> Locale {
    headers
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .and_then(best_match)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn best_match_orders_by_quality() {
        assert_eq!(best_match("ar,en;q=0.8"), Some(Locale::Ar));
        assert_eq!(best_match("en;q=0.5, ar;q=0.9"), Some(Locale::Ar));
        assert_eq!(best_match("fr, en;q=0.3"), Some(Locale::En));
    }

    #[test]
    fn best_match_skips_zero_quality() {
        assert_eq!(best_match("ar;q=0, en;q=0.2"), Some(Locale::En));
        assert_eq!(best_match("ar;q=0"), None);
    }

    #[test]
    fn best_match_handles_region_tags_and_wildcard() {
        assert_eq!(best_match("ar-SA"), Some(Locale::Ar));
        assert_eq!(best_match("fr-FR, *;q=0.1"), Some(Locale::En));
        assert_eq!(best_match("de, fr"), None);
    }

    #[test]
    fn negotiate_falls_back_to_default() {
        let headers = HeaderMap::new();
        assert_eq!(negotiate(&headers, Locale::Ar), Locale::Ar);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("zh-CN"));
        assert_eq!(negotiate(&headers, Locale::En), Locale::En);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("ar"));
        assert_eq!(negotiate(&headers, Locale::En), Locale::Ar);
    }
}
