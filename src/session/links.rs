//! URL builders for the external identity/dashboard application, plus the
//! best-effort silent logout side channel.

use crate::{locale::Locale, web::state::PortalConfig};
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// How long the silent logout request may run before being dropped.
const SILENT_LOGOUT_TIMEOUT: Duration = Duration::from_secs(5);

/// `GET {app}/auth/login?redirect_uri={public}/{locale}/callback`
pub fn login_url(config: &PortalConfig, locale: Locale) -> Result<Url> {
    external_url(config, "auth/login", &callback_return(config, locale)?)
}

/// `GET {app}/auth/signup?redirect_uri={public}/{locale}/callback`
pub fn signup_url(config: &PortalConfig, locale: Locale) -> Result<Url> {
    external_url(config, "auth/signup", &callback_return(config, locale)?)
}

/// `GET {app}/auth/logout?redirect_uri={public}/{locale}`
pub fn logout_url(config: &PortalConfig, locale: Locale) -> Result<Url> {
    let return_to = config
        .public_base_url()
        .join(locale.as_str())
        .context("invalid public base URL for logout return")?;
    external_url(config, "auth/logout", &return_to)
}

fn callback_return(config: &PortalConfig, locale: Locale) -> Result<Url> {
    config
        .public_base_url()
        .join(&format!("{locale}/callback"))
        .context("invalid public base URL for callback return")
}

fn external_url(config: &PortalConfig, path: &str, return_to: &Url) -> Result<Url> {
    let mut url = config
        .app_base_url()
        .join(path)
        .with_context(|| format!("invalid app base URL for {path}"))?;
    url.query_pairs_mut()
        .append_pair("redirect_uri", return_to.as_str());
    Ok(url)
}

/// Fires the cross-app logout without awaiting it: the hidden-iframe analog.
/// Failures are logged and never retried.
pub fn spawn_silent_logout(http: reqwest::Client, config: &PortalConfig, locale: Locale) {
    let url = match logout_url(config, locale) {
        Ok(url) => url,
        Err(err) => {
            warn!("Could not build silent logout URL: {err}");
            return;
        }
    };

    tokio::spawn(async move {
        match tokio::time::timeout(SILENT_LOGOUT_TIMEOUT, http.get(url.clone()).send()).await {
            Ok(Ok(response)) => debug!("Silent logout returned {}", response.status()),
            Ok(Err(err)) => warn!("Silent logout request failed: {err}"),
            Err(_) => warn!("Silent logout timed out after {SILENT_LOGOUT_TIMEOUT:?}"),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> PortalConfig {
        PortalConfig::new(
            Url::parse("https://app.knoldg.com").expect("valid app URL"),
            Url::parse("https://knoldg.com").expect("valid public URL"),
            Url::parse("https://api.knoldg.com").expect("valid api URL"),
        )
    }

    #[test]
    fn login_url_carries_callback_return() {
        let url = login_url(&test_config(), Locale::En).expect("login URL");
        assert_eq!(
            url.as_str(),
            "https://app.knoldg.com/auth/login?redirect_uri=https%3A%2F%2Fknoldg.com%2Fen%2Fcallback"
        );
    }

    #[test]
    fn signup_url_respects_locale() {
        let url = signup_url(&test_config(), Locale::Ar).expect("signup URL");
        assert!(url.as_str().starts_with("https://app.knoldg.com/auth/signup?"));
        assert!(url.as_str().contains("%2Far%2Fcallback"));
    }

    #[test]
    fn logout_url_returns_to_locale_home() {
        let url = logout_url(&test_config(), Locale::Ar).expect("logout URL");
        assert_eq!(
            url.as_str(),
            "https://app.knoldg.com/auth/logout?redirect_uri=https%3A%2F%2Fknoldg.com%2Far"
        );
    }
}
