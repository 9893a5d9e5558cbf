//! Router assembly and HTTP serving for the portal.

pub mod cookies;
pub mod handlers;
pub mod state;

use crate::{locale, session};
use anyhow::{anyhow, Context, Result};
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method, Request,
    },
    middleware,
    routing::get,
    Extension, Router,
};
use state::PortalState;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use url::Url;

/// Build the portal router with the full middleware stack.
///
/// # Errors
/// Returns an error if the CORS origin cannot be derived from the configured
/// app base URL.
pub fn app(state: Arc<PortalState>) -> Result<Router> {
    let origin = app_origin(state.config().app_base_url())?;
    let cors = CorsLayer::new()
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_methods([Method::GET])
        .allow_origin(AllowOrigin::exact(origin))
        .allow_credentials(true);

    let router = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/:locale", get(handlers::home::home))
        .route("/:locale/callback", get(handlers::callback::callback))
        .route("/:locale/auth/signin", get(handlers::links::signin))
        .route("/:locale/auth/signup", get(handlers::links::signup))
        .route("/:locale/auth/signout", get(handlers::links::signout))
        .route("/:locale/industries", get(handlers::content::industries))
        .route("/:locale/industries/:slug", get(handlers::content::industry))
        .route(
            "/:locale/knowledge/:kind/:slug",
            get(handlers::content::knowledge),
        )
        .route("/:locale/countries", get(handlers::content::countries))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(Extension(state.clone()))
                .layer(middleware::from_fn(locale::middleware::locale_redirects))
                .layer(middleware::from_fn(session::reconcile::layer)),
        );

    Ok(router)
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, state: Arc<PortalState>) -> Result<()> {
    let sweeper = session::reconcile::spawn_sweeper(state.clone());

    let app = app(state)?;

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Gracefully shutdown");
        })
        .await?;

    sweeper.abort();

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

fn app_origin(app_base_url: &Url) -> Result<HeaderValue> {
    let host = app_base_url
        .host_str()
        .ok_or_else(|| anyhow!("App base URL must include a valid host: {app_base_url}"))?;
    let port = app_base_url
        .port()
        .map_or_else(String::new, |port| format!(":{port}"));
    let origin = format!("{}://{}{}", app_base_url.scheme(), host, port);
    HeaderValue::from_str(&origin).context("Failed to build app origin header")
}
