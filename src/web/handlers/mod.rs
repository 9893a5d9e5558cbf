//! Route handlers for the portal.
//!
//! Every locale-prefixed handler re-validates the path locale: the routing
//! middleware only redirects unprefixed paths, so an unsupported prefix is
//! answered conservatively with 404.

pub mod callback;
pub mod content;
pub mod health;
pub mod home;
pub mod links;

use crate::locale::Locale;
use axum::http::StatusCode;

pub(crate) fn require_locale(raw: &str) -> Result<Locale, StatusCode> {
    Locale::parse(raw).ok_or(StatusCode::NOT_FOUND)
}
