//! Request middleware guaranteeing every non-asset route resolves to exactly
//! one locale before page logic runs.
//!
//! Ordering per request:
//! 1. Legacy callback URLs carrying a token in the path are normalized to
//!    `/{locale}/callback?token=` with a temporary redirect. The rewrite is
//!    idempotent: its output no longer matches the pattern.
//! 2. The root path redirects to `/{locale}` from the cookie or default.
//! 3. Unprefixed paths redirect to the cookie locale when one is set,
//!    otherwise to the `Accept-Language` negotiated locale.
//! 4. Locale-prefixed paths pass through untouched.

use crate::locale::{negotiate, path_locale, preferred_language, Locale};
use crate::web::state::PortalState;
use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Extension,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::debug;
use url::form_urlencoded;

static CALLBACK_TOKEN_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^/(?:(?P<locale>en|ar)/)?callback/(?P<token>[^/]+)$")
        .expect("valid callback path pattern")
});

pub async fn locale_redirects(
    Extension(state): Extension<Arc<PortalState>>,
    req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(str::to_string);
    let default = state.config().default_locale();

    // Callback normalization runs first: the token segment contains a `.`
    // and would otherwise trip the asset heuristic below.
    if let Some(target) = rewrite_callback(&path, query.as_deref(), req.headers(), default) {
        debug!("Normalizing legacy callback path to {}", target);
        return Redirect::temporary(&target).into_response();
    }

    if is_exempt(&path) {
        return next.run(req).await;
    }

    if path_locale(&path).is_none() {
        let target = locale_prefixed_target(&path, query.as_deref(), req.headers(), default);
        return Redirect::temporary(&target).into_response();
    }

    next.run(req).await
}

/// Health checks and asset-like paths (final segment with an extension)
/// resolve no locale.
fn is_exempt(path: &str) -> bool {
    if path == "/health" {
        return true;
    }
    path.rsplit('/').next().is_some_and(|seg| seg.contains('.'))
}

/// Builds the redirect target for a path without a locale prefix.
///
/// The root path follows the cookie or the default; other paths negotiate
/// `Accept-Language` when no cookie preference exists.
fn locale_prefixed_target(
    path: &str,
    query: Option<&str>,
    headers: &HeaderMap,
    default: Locale,
) -> String {
    let cookie = preferred_language(headers);
    let locale = if path == "/" {
        cookie.unwrap_or(default)
    } else {
        cookie.unwrap_or_else(|| negotiate::negotiate(headers, default))
    };

    let mut target = if path == "/" {
        format!("/{locale}")
    } else {
        format!("/{locale}{path}")
    };
    if let Some(query) = query {
        target.push('?');
        target.push_str(query);
    }
    target
}

/// Rewrites `/{locale?}/callback/{token}` to `/{locale}/callback?token=`.
///
/// Only token segments containing a `.` qualify; anything else is left for
/// normal routing. Pre-existing query parameters are preserved after the
/// token.
fn rewrite_callback(
    path: &str,
    query: Option<&str>,
    headers: &HeaderMap,
    default: Locale,
) -> Option<String> {
    let caps = CALLBACK_TOKEN_PATH.captures(path)?;
    let token = caps.name("token")?.as_str();
    if !token.contains('.') {
        return None;
    }

    let locale = caps
        .name("locale")
        .and_then(|m| Locale::parse(m.as_str()))
        .or_else(|| preferred_language(headers))
        .unwrap_or(default);

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    serializer.append_pair("token", token);
    if let Some(query) = query {
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            serializer.append_pair(&key, &value);
        }
    }

    Some(format!("/{}/callback?{}", locale, serializer.finish()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::COOKIE, HeaderValue};

    fn cookie_headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn callback_rewrite_uses_path_locale() {
        let target = rewrite_callback("/ar/callback/aa.bb.cc", None, &HeaderMap::new(), Locale::En);
        assert_eq!(target.as_deref(), Some("/ar/callback?token=aa.bb.cc"));
    }

    #[test]
    fn callback_rewrite_falls_back_to_cookie_then_default() {
        let headers = cookie_headers("preferred_language=ar");
        let target = rewrite_callback("/callback/aa.bb", None, &headers, Locale::En);
        assert_eq!(target.as_deref(), Some("/ar/callback?token=aa.bb"));

        let target = rewrite_callback("/callback/aa.bb", None, &HeaderMap::new(), Locale::En);
        assert_eq!(target.as_deref(), Some("/en/callback?token=aa.bb"));
    }

    #[test]
    fn callback_rewrite_preserves_existing_query() {
        let target = rewrite_callback(
            "/en/callback/aa.bb",
            Some("next=%2Fen%2Findustries"),
            &HeaderMap::new(),
            Locale::En,
        );
        assert_eq!(
            target.as_deref(),
            Some("/en/callback?token=aa.bb&next=%2Fen%2Findustries")
        );
    }

    #[test]
    fn callback_rewrite_requires_jwt_shape() {
        assert_eq!(
            rewrite_callback("/en/callback/opaque", None, &HeaderMap::new(), Locale::En),
            None
        );
    }

    #[test]
    fn callback_rewrite_is_idempotent() {
        let target = rewrite_callback("/en/callback/aa.bb", None, &HeaderMap::new(), Locale::En)
            .expect("first pass rewrites");
        let path = target.split('?').next().expect("target has a path");
        assert_eq!(
            rewrite_callback(path, None, &HeaderMap::new(), Locale::En),
            None
        );
    }

    #[test]
    fn exempt_paths_skip_locale_handling() {
        assert!(is_exempt("/health"));
        assert!(is_exempt("/favicon.ico"));
        assert!(is_exempt("/assets/logo.svg"));
        assert!(!is_exempt("/industries"));
        assert!(!is_exempt("/"));
    }

    #[test]
    fn root_follows_cookie_or_default() {
        let headers = cookie_headers("preferred_language=ar");
        assert_eq!(locale_prefixed_target("/", None, &headers, Locale::En), "/ar");
        assert_eq!(
            locale_prefixed_target("/", None, &HeaderMap::new(), Locale::En),
            "/en"
        );
    }

    #[test]
    fn unprefixed_path_follows_cookie_and_keeps_query() {
        let headers = cookie_headers("preferred_language=en");
        assert_eq!(
            locale_prefixed_target("/industries", Some("page=2"), &headers, Locale::En),
            "/en/industries?page=2"
        );
    }

    #[test]
    fn invalid_cookie_negotiates_accept_language() {
        let mut headers = cookie_headers("preferred_language=de");
        headers.insert(
            axum::http::header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("ar"),
        );
        assert_eq!(
            locale_prefixed_target("/industries", None, &headers, Locale::En),
            "/ar/industries"
        );
    }
}
