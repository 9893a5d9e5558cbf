use crate::{
    locale::Locale,
    session::{links, SID_COOKIE},
    web::{cookies, handlers::require_locale, state::PortalState},
};
use axum::{
    extract::Path,
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    Extension,
};
use std::sync::Arc;
use tracing::{error, info};

/// Plain navigation to the external login page with a return trip.
pub async fn signin(
    Extension(state): Extension<Arc<PortalState>>,
    Path(raw_locale): Path<String>,
) -> Response {
    external_redirect(&state, &raw_locale, links::login_url)
}

/// Plain navigation to the external signup page with a return trip.
pub async fn signup(
    Extension(state): Extension<Arc<PortalState>>,
    Path(raw_locale): Path<String>,
) -> Response {
    external_redirect(&state, &raw_locale, links::signup_url)
}

/// Full sign-out: clear local artifacts, then hand the visitor to the
/// external logout endpoint which finishes the round trip.
///
/// The `token` cookie lives on the identity app's domain and cannot be
/// cleared here; the external endpoint owns it.
pub async fn signout(
    Extension(state): Extension<Arc<PortalState>>,
    Path(raw_locale): Path<String>,
    headers: HeaderMap,
) -> Response {
    let locale = match require_locale(&raw_locale) {
        Ok(locale) => locale,
        Err(status) => return status.into_response(),
    };

    if let Some(sid) = cookies::get(&headers, SID_COOKIE) {
        if state.store().clear(&sid).await {
            info!("Cleared local session artifacts on sign-out");
        }
        state.feed().unbind(&sid).await;
    }

    match links::logout_url(state.config(), locale) {
        Ok(url) => Redirect::temporary(url.as_str()).into_response(),
        Err(err) => {
            error!("Failed to build logout URL: {err}");
            Redirect::temporary(&format!("/{locale}")).into_response()
        }
    }
}

fn external_redirect(
    state: &PortalState,
    raw_locale: &str,
    build: fn(&crate::web::state::PortalConfig, Locale) -> anyhow::Result<url::Url>,
) -> Response {
    let locale = match require_locale(raw_locale) {
        Ok(locale) => locale,
        Err(status) => return status.into_response(),
    };

    match build(state.config(), locale) {
        Ok(url) => Redirect::temporary(url.as_str()).into_response(),
        Err(err) => {
            error!("Failed to build external auth URL: {err}");
            Redirect::temporary(&format!("/{locale}")).into_response()
        }
    }
}
