//! Client for the marketplace backend API.
//!
//! Every fetch retries up to three attempts with exponential backoff and
//! sends `Accept-Language` for the requested locale. Detail lookups map 404
//! to `Ok(None)` so handlers can answer conservatively.

pub mod cache;
pub mod types;

use crate::locale::Locale;
use anyhow::{anyhow, Context, Result};
use reqwest::{header::ACCEPT_LANGUAGE, Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::{sleep, Duration};
use tracing::{debug, instrument, warn};
use url::Url;

use types::{Country, Industry, IndustryDetail, Knowledge};

const MAX_ATTEMPTS: u32 = 3;

/// Exponential backoff schedule: 1s, 2s, 4s before attempts 2..=4.
#[must_use]
pub const fn retry_backoff_secs(attempt: u32) -> u64 {
    2u64.pow(attempt.saturating_sub(1))
}

/// Marketplace backend client.
#[derive(Debug, Clone)]
pub struct Backend {
    http: Client,
    base_url: Url,
}

impl Backend {
    #[must_use]
    pub fn new(http: Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// `GET /api/industries`
    pub async fn industries(&self, locale: Locale) -> Result<Vec<Industry>> {
        self.get_json(locale, "api/industries")
            .await?
            .ok_or_else(|| anyhow!("industries endpoint returned 404"))
    }

    /// `GET /api/industries/{slug}`
    pub async fn industry(&self, locale: Locale, slug: &str) -> Result<Option<IndustryDetail>> {
        self.get_json(locale, &format!("api/industries/{slug}"))
            .await
    }

    /// `GET /api/knowledge/{kind}/{slug}`
    pub async fn knowledge(
        &self,
        locale: Locale,
        kind: &str,
        slug: &str,
    ) -> Result<Option<Knowledge>> {
        self.get_json(locale, &format!("api/knowledge/{kind}/{slug}"))
            .await
    }

    /// `GET /api/countries`
    pub async fn countries(&self, locale: Locale) -> Result<Vec<Country>> {
        self.get_json(locale, "api/countries")
            .await?
            .ok_or_else(|| anyhow!("countries endpoint returned 404"))
    }

    #[instrument(skip(self), fields(base = %self.base_url))]
    async fn get_json<T: DeserializeOwned>(&self, locale: Locale, path: &str) -> Result<Option<T>> {
        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("invalid backend path: {path}"))?;

        let mut last_error = anyhow!("request not attempted");

        for attempt in 1..=MAX_ATTEMPTS {
            if attempt > 1 {
                let backoff = retry_backoff_secs(attempt);
                warn!("Backing off for {} seconds", backoff);
                sleep(Duration::from_secs(backoff)).await;
            }

            match self
                .http
                .get(url.clone())
                .header(ACCEPT_LANGUAGE, locale.as_str())
                .send()
                .await
            {
                Ok(response) if response.status() == StatusCode::NOT_FOUND => {
                    return Ok(None);
                }
                Ok(response) => match response.error_for_status() {
                    Ok(response) => {
                        let value = response
                            .json::<T>()
                            .await
                            .with_context(|| format!("invalid response body from {path}"))?;
                        debug!("Fetched {} on attempt {}", path, attempt);
                        return Ok(Some(value));
                    }
                    Err(err) => {
                        warn!("Backend returned error status for {}: {}", path, err);
                        last_error = err.into();
                    }
                },
                Err(err) => {
                    warn!("Backend request for {} failed: {}", path, err);
                    last_error = err.into();
                }
            }
        }

        Err(last_error.context(format!("giving up on {path} after {MAX_ATTEMPTS} attempts")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_schedule_doubles() {
        assert_eq!(retry_backoff_secs(1), 1);
        assert_eq!(retry_backoff_secs(2), 2);
        assert_eq!(retry_backoff_secs(3), 4);
    }

    #[test]
    fn backend_joins_paths_against_base() {
        let base = Url::parse("https://api.knoldg.com").expect("valid base");
        let joined = base.join("api/industries/energy").expect("joins");
        assert_eq!(joined.as_str(), "https://api.knoldg.com/api/industries/energy");
    }
}
