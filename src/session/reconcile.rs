//! Session reconciliation: the on-request ("on mount") check plus the
//! periodic sweeper.
//!
//! Cookie state is only observable at the request boundary, so the precise
//! inconsistent-state detection runs per request; the sweeper handles store
//! hygiene for sessions that stopped calling back.

use crate::{
    locale::path_locale,
    session::{classify, links, SessionState, SID_COOKIE, TOKEN_COOKIE},
    web::{cookies, state::PortalState},
};
use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Extension,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{sync::Arc, time::Duration};
use tokio::{task::JoinHandle, time::sleep};
use tracing::{debug, info};

/// Sessions not seen for this long are dropped by the sweeper.
const STALE_SESSION_RETENTION: Duration = Duration::from_secs(24 * 60 * 60);

/// Routes that must not trigger reconciliation: the callback landing and the
/// sign-out flow are in-flight transitions and must not be disturbed.
#[must_use]
pub fn is_exempt_route(path: &str) -> bool {
    let rest = match path_locale(path) {
        Some((_, rest)) => rest,
        None => path.trim_start_matches('/'),
    };
    let mut segments = rest.split('/').filter(|segment| !segment.is_empty());
    match segments.next() {
        Some("callback") => true,
        Some("auth") => matches!(segments.next(), Some("signout")),
        _ => false,
    }
}

/// Request-boundary reconciliation layer.
///
/// A user marker without the authoritative cookie classifies the session as
/// inconsistent: local artifacts are cleared exactly once, the silent
/// cross-app logout fires, and the client is steered into the sign-out flow.
pub async fn layer(
    Extension(state): Extension<Arc<PortalState>>,
    req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path();
    if path == "/health" || is_exempt_route(path) {
        return next.run(req).await;
    }

    let cookie_token = cookies::get(req.headers(), TOKEN_COOKIE);
    let Some(sid) = cookies::get(req.headers(), SID_COOKIE) else {
        // No browsing session: nothing stored locally, nothing to reconcile.
        return next.run(req).await;
    };

    state.store().observe(&sid).await;
    let has_marker = state.store().has_user(&sid).await;

    match classify(cookie_token.as_deref(), has_marker) {
        SessionState::Inconsistent => {
            let locale = path_locale(path)
                .map(|(locale, _)| locale)
                .unwrap_or_else(|| state.config().default_locale());

            // First clearer wins: side effects fire once per detection.
            if state.store().clear(&sid).await {
                info!("Stale session detected, clearing local artifacts");
                state.feed().unbind(&sid).await;
                links::spawn_silent_logout(state.http().clone(), state.config(), locale);
            }

            Redirect::temporary(&format!("/{locale}/auth/signout")).into_response()
        }
        SessionState::Authenticated | SessionState::Unauthenticated => next.run(req).await,
    }
}

/// Spawns the periodic sweep over tracked sessions.
///
/// The interval is jittered so a fleet of portal instances does not sweep in
/// lockstep.
pub fn spawn_sweeper(state: Arc<PortalState>) -> JoinHandle<()> {
    let interval = state.config().reconcile_interval();

    tokio::spawn(async move {
        let mut rng = StdRng::from_entropy();

        loop {
            let factor = rng.gen_range(90..110);
            sleep(interval * factor / 100).await;

            let removed = state.store().prune(STALE_SESSION_RETENTION).await;
            for sid in &removed {
                state.feed().unbind(sid).await;
            }
            if !removed.is_empty() {
                debug!("Swept {} stale browsing sessions", removed.len());
            }
        }
    })
}
