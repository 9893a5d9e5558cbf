//! Cookie-header helpers shared by the middleware and handlers.

use axum::http::{header::InvalidHeaderValue, HeaderMap, HeaderValue};

/// Looks up a cookie value by name from the `Cookie` header.
/// Unreadable headers are treated as absent.
#[must_use]
pub fn get(headers: &HeaderMap, name: &str) -> Option<String> {
    let header = headers.get(axum::http::header::COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == name {
            return Some(val.to_string());
        }
    }
    None
}

/// Builds a `Set-Cookie` value for a portal-owned cookie.
pub fn build(
    name: &str,
    value: &str,
    max_age_seconds: i64,
    secure: bool,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie =
        format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_seconds}");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::COOKIE;

    #[test]
    fn get_finds_named_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("preferred_language=ar; token=aa.bb; knoldg_sid=s1"),
        );
        assert_eq!(get(&headers, "token").as_deref(), Some("aa.bb"));
        assert_eq!(get(&headers, "knoldg_sid").as_deref(), Some("s1"));
        assert_eq!(get(&headers, "preferred_language").as_deref(), Some("ar"));
    }

    #[test]
    fn get_returns_none_when_missing() {
        let headers = HeaderMap::new();
        assert_eq!(get(&headers, "token"), None);

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("other=value"));
        assert_eq!(get(&headers, "token"), None);
    }

    #[test]
    fn build_sets_attributes() {
        let cookie = build("knoldg_sid", "s1", 3600, false).expect("valid cookie");
        assert_eq!(
            cookie.to_str().ok(),
            Some("knoldg_sid=s1; Path=/; HttpOnly; SameSite=Lax; Max-Age=3600")
        );

        let cookie = build("knoldg_sid", "s1", 3600, true).expect("valid cookie");
        assert!(cookie.to_str().is_ok_and(|v| v.ends_with("; Secure")));
    }
}
