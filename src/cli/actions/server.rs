use crate::{
    locale::Locale,
    web::{
        self,
        state::{PortalConfig, PortalState},
    },
};
use anyhow::Result;
use std::sync::Arc;
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub app_base_url: Url,
    pub public_base_url: Url,
    pub api_base_url: Url,
    pub default_locale: Locale,
    pub reconcile_interval_seconds: u64,
    pub notify_poll_seconds: u64,
    pub cache_ttl_seconds: u64,
    pub request_timeout_seconds: u64,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the HTTP client cannot be built or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let config = PortalConfig::new(args.app_base_url, args.public_base_url, args.api_base_url)
        .with_default_locale(args.default_locale)
        .with_reconcile_interval_seconds(args.reconcile_interval_seconds)
        .with_notify_poll_seconds(args.notify_poll_seconds)
        .with_cache_ttl_seconds(args.cache_ttl_seconds)
        .with_request_timeout_seconds(args.request_timeout_seconds);

    let state = Arc::new(PortalState::new(config)?);

    web::new(args.port, state).await
}
