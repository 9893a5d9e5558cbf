use crate::{
    session::{new_sid, SID_COOKIE},
    web::{cookies, handlers::require_locale, state::PortalState},
};
use axum::{
    extract::{Path, Query},
    http::{header::SET_COOKIE, HeaderMap},
    response::{IntoResponse, Redirect, Response},
    Extension,
};
use secrecy::SecretString;
use std::{collections::HashMap, sync::Arc};
use tracing::{debug, error, info};

/// Browsing-session cookie lifetime.
const SID_COOKIE_TTL_SECONDS: i64 = 30 * 24 * 60 * 60;

/// Login landing from the external identity application.
///
/// The identity app has already set the authoritative `token` cookie on its
/// redirect; this handler records the legacy artifacts (token copy + user
/// marker), binds the notification feed, and sends the visitor home.
pub async fn callback(
    Extension(state): Extension<Arc<PortalState>>,
    Path(raw_locale): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let locale = match require_locale(&raw_locale) {
        Ok(locale) => locale,
        Err(status) => return status.into_response(),
    };
    let home = format!("/{locale}");

    // JWT heuristic mirrors the routing middleware: no dot, no credential.
    let Some(token) = params.get("token").filter(|token| token.contains('.')) else {
        debug!("Callback without a usable token, continuing unauthenticated");
        return Redirect::temporary(&home).into_response();
    };

    let (sid, minted) = match cookies::get(&headers, SID_COOKIE) {
        Some(sid) => (sid, false),
        None => match new_sid() {
            Ok(sid) => (sid, true),
            Err(err) => {
                error!("Could not mint a browsing session id: {err}");
                return Redirect::temporary(&home).into_response();
            }
        },
    };

    let secret = SecretString::from(token.clone());
    state.store().login(&sid, secret.clone()).await;
    state.feed().bind(&sid, &secret).await;
    info!("Login landing recorded for locale {}", locale);

    let mut response_headers = HeaderMap::new();
    if minted {
        match cookies::build(
            SID_COOKIE,
            &sid,
            SID_COOKIE_TTL_SECONDS,
            state.config().sid_cookie_secure(),
        ) {
            Ok(cookie) => {
                response_headers.insert(SET_COOKIE, cookie);
            }
            Err(err) => error!("Could not build session cookie: {err}"),
        }
    }

    (response_headers, Redirect::temporary(&home)).into_response()
}
