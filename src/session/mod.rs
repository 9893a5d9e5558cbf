//! Single logical "is the user authenticated" signal over two physical
//! storage locations, plus detection of inconsistent session state.
//!
//! The `token` cookie set by the external identity application is
//! authoritative. The legacy per-session store keeps a fallback token copy
//! and a user marker written at login; a marker without a cookie means the
//! session went stale elsewhere and local artifacts must be cleaned up.

pub mod links;
pub mod reconcile;
pub mod store;

use anyhow::{Context, Result};
use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{rngs::OsRng, RngCore};
use secrecy::SecretString;

/// Bearer credential cookie, written by the identity application.
pub const TOKEN_COOKIE: &str = "token";

/// Browsing-session cookie keying the legacy local store.
pub const SID_COOKIE: &str = "knoldg_sid";

/// Session state derived from the cookie and the legacy store.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Never logged in here: no credential, no marker.
    Unauthenticated,
    /// The authoritative cookie is present.
    Authenticated,
    /// A user marker persists but the cookie is gone: stale session
    /// requiring cleanup and sign-out.
    Inconsistent,
}

/// Classifies the session from the authoritative cookie and the marker.
///
/// The legacy token copy never influences classification: if the cookie is
/// absent the credential is absent.
#[must_use]
pub fn classify(cookie_token: Option<&str>, has_user_marker: bool) -> SessionState {
    match (cookie_token, has_user_marker) {
        (Some(_), _) => SessionState::Authenticated,
        (None, true) => SessionState::Inconsistent,
        (None, false) => SessionState::Unauthenticated,
    }
}

/// Resolves the bearer token with cookie-first precedence.
///
/// The legacy store value is a backward-compatible fallback read only; no
/// side effects.
#[must_use]
pub fn resolve_token(cookie: Option<&str>, legacy: Option<&SecretString>) -> Option<SecretString> {
    match cookie {
        Some(value) => Some(SecretString::from(value.to_string())),
        None => legacy.cloned(),
    }
}

/// Mints a new browsing-session id.
/// The raw value only travels in the `knoldg_sid` cookie.
pub fn new_sid() -> Result<String> {
    let mut bytes = [0u8; 24];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate browsing session id")?;
    Ok(Base64UrlUnpadded::encode_string(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn classify_cookie_wins() {
        assert_eq!(classify(Some("aa.bb"), true), SessionState::Authenticated);
        assert_eq!(classify(Some("aa.bb"), false), SessionState::Authenticated);
    }

    #[test]
    fn classify_marker_without_cookie_is_inconsistent() {
        assert_eq!(classify(None, true), SessionState::Inconsistent);
    }

    #[test]
    fn classify_nothing_is_unauthenticated() {
        assert_eq!(classify(None, false), SessionState::Unauthenticated);
    }

    #[test]
    fn resolve_token_prefers_cookie() {
        let legacy = SecretString::from("legacy.token".to_string());
        let resolved = resolve_token(Some("cookie.token"), Some(&legacy));
        assert_eq!(
            resolved.as_ref().map(ExposeSecret::expose_secret),
            Some("cookie.token")
        );
    }

    #[test]
    fn resolve_token_falls_back_to_legacy() {
        let legacy = SecretString::from("legacy.token".to_string());
        let resolved = resolve_token(None, Some(&legacy));
        assert_eq!(
            resolved.as_ref().map(ExposeSecret::expose_secret),
            Some("legacy.token")
        );
        assert!(resolve_token(None, None).is_none());
    }

    #[test]
    fn new_sid_is_url_safe() {
        let sid = new_sid().expect("sid generated");
        assert_eq!(
            Base64UrlUnpadded::decode_vec(&sid).map(|bytes| bytes.len()),
            Ok(24)
        );
        let other = new_sid().expect("sid generated");
        assert_ne!(sid, other);
    }
}
