use crate::{
    session::{self, links, SID_COOKIE, TOKEN_COOKIE},
    web::{cookies, handlers::require_locale, state::PortalState},
};
use axum::{
    extract::Path,
    http::HeaderMap,
    response::{IntoResponse, Json, Response},
    Extension,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

#[derive(Serialize)]
struct HomeShell {
    locale: &'static str,
    rtl: bool,
    authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    login_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    signup_url: Option<String>,
}

fn external_link(result: anyhow::Result<url::Url>) -> Option<String> {
    match result {
        Ok(url) => Some(url.into()),
        Err(err) => {
            error!("Failed to build external link: {err}");
            None
        }
    }
}

/// Localized home shell: the auth signal plus entry links into the external
/// identity application.
pub async fn home(
    Extension(state): Extension<Arc<PortalState>>,
    Path(raw_locale): Path<String>,
    headers: HeaderMap,
) -> Response {
    let locale = match require_locale(&raw_locale) {
        Ok(locale) => locale,
        Err(status) => return status.into_response(),
    };

    let cookie_token = cookies::get(&headers, TOKEN_COOKIE);
    let legacy = match cookies::get(&headers, SID_COOKIE) {
        Some(sid) => state.store().token(&sid).await,
        None => None,
    };
    let authenticated = session::resolve_token(cookie_token.as_deref(), legacy.as_ref()).is_some();

    let (login_url, signup_url) = if authenticated {
        (None, None)
    } else {
        (
            external_link(links::login_url(state.config(), locale)),
            external_link(links::signup_url(state.config(), locale)),
        )
    };

    Json(HomeShell {
        locale: locale.as_str(),
        rtl: locale.is_rtl(),
        authenticated,
        login_url,
        signup_url,
    })
    .into_response()
}
