//! Long-lived portal configuration and shared state.

use crate::{
    backend::{
        cache::TtlCache,
        types::{Country, Industry},
        Backend,
    },
    locale::Locale,
    notify::NotificationFeed,
    session::store::LocalStore,
};
use anyhow::{Context, Result};
use reqwest::Client;
use std::{sync::Arc, time::Duration};
use url::Url;

const DEFAULT_RECONCILE_INTERVAL_SECONDS: u64 = 5;
const DEFAULT_NOTIFY_POLL_SECONDS: u64 = 30;
const DEFAULT_CACHE_TTL_SECONDS: u64 = 300;
const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 10;

#[derive(Clone, Debug)]
pub struct PortalConfig {
    app_base_url: Url,
    public_base_url: Url,
    api_base_url: Url,
    default_locale: Locale,
    reconcile_interval_seconds: u64,
    notify_poll_seconds: u64,
    cache_ttl_seconds: u64,
    request_timeout_seconds: u64,
}

impl PortalConfig {
    #[must_use]
    pub fn new(app_base_url: Url, public_base_url: Url, api_base_url: Url) -> Self {
        Self {
            app_base_url,
            public_base_url,
            api_base_url,
            default_locale: Locale::En,
            reconcile_interval_seconds: DEFAULT_RECONCILE_INTERVAL_SECONDS,
            notify_poll_seconds: DEFAULT_NOTIFY_POLL_SECONDS,
            cache_ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
        }
    }

    #[must_use]
    pub fn with_default_locale(mut self, locale: Locale) -> Self {
        self.default_locale = locale;
        self
    }

    #[must_use]
    pub fn with_reconcile_interval_seconds(mut self, seconds: u64) -> Self {
        self.reconcile_interval_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_notify_poll_seconds(mut self, seconds: u64) -> Self {
        self.notify_poll_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_cache_ttl_seconds(mut self, seconds: u64) -> Self {
        self.cache_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_request_timeout_seconds(mut self, seconds: u64) -> Self {
        self.request_timeout_seconds = seconds;
        self
    }

    #[must_use]
    pub fn app_base_url(&self) -> &Url {
        &self.app_base_url
    }

    #[must_use]
    pub fn public_base_url(&self) -> &Url {
        &self.public_base_url
    }

    #[must_use]
    pub fn api_base_url(&self) -> &Url {
        &self.api_base_url
    }

    #[must_use]
    pub fn default_locale(&self) -> Locale {
        self.default_locale
    }

    #[must_use]
    pub fn reconcile_interval(&self) -> Duration {
        Duration::from_secs(self.reconcile_interval_seconds)
    }

    #[must_use]
    pub fn notify_poll_interval(&self) -> Duration {
        Duration::from_secs(self.notify_poll_seconds)
    }

    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Portal-owned cookies are only marked `Secure` behind HTTPS.
    #[must_use]
    pub fn sid_cookie_secure(&self) -> bool {
        self.public_base_url.scheme() == "https"
    }
}

/// Shared state owned by the router and background tasks.
#[derive(Debug)]
pub struct PortalState {
    config: PortalConfig,
    http: Client,
    store: LocalStore,
    backend: Backend,
    feed: NotificationFeed,
    industries: TtlCache<Locale, Vec<Industry>>,
    countries: TtlCache<Locale, Vec<Country>>,
}

impl PortalState {
    /// Builds the shared state and its HTTP client.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: PortalConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .timeout(config.request_timeout())
            .build()
            .context("Failed to build HTTP client")?;

        let backend = Backend::new(http.clone(), config.api_base_url().clone());
        let feed = NotificationFeed::new(
            http.clone(),
            config.app_base_url().clone(),
            config.notify_poll_interval(),
        );
        let cache_ttl = config.cache_ttl();

        Ok(Self {
            config,
            http,
            store: LocalStore::default(),
            backend,
            feed,
            industries: TtlCache::new(cache_ttl),
            countries: TtlCache::new(cache_ttl),
        })
    }

    #[must_use]
    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    #[must_use]
    pub fn http(&self) -> &Client {
        &self.http
    }

    #[must_use]
    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    #[must_use]
    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    #[must_use]
    pub fn feed(&self) -> &NotificationFeed {
        &self.feed
    }

    /// Industry list for the locale, cached with single-flight semantics.
    pub async fn industries(&self, locale: Locale) -> Result<Arc<Vec<Industry>>> {
        self.industries
            .get_or_fetch(locale, || self.backend.industries(locale))
            .await
    }

    /// Country lookup data for the locale, cached with single-flight semantics.
    pub async fn countries(&self, locale: Locale) -> Result<Arc<Vec<Country>>> {
        self.countries
            .get_or_fetch(locale, || self.backend.countries(locale))
            .await
    }
}
