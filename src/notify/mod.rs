//! Notification feed subscriptions against the external application.
//!
//! One subscription per browsing session, established at callback landing
//! and rebound whenever the auth context changes. Thin by design: a
//! bearer-authenticated poll loop with jittered sleeps, log-and-continue on
//! failure, torn down on sign-out or reconciliation cleanup.

use rand::{rngs::StdRng, Rng, SeedableRng};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::HashMap;
use tokio::{sync::Mutex, task::JoinHandle, time::sleep};
use tracing::{debug, warn};
use url::Url;

#[derive(Debug, Deserialize)]
struct Notification {
    #[allow(dead_code)]
    id: String,
}

struct Subscription {
    token: SecretString,
    task: JoinHandle<()>,
}

/// Per-session subscription registry.
pub struct NotificationFeed {
    http: Client,
    app_base_url: Url,
    poll_interval: tokio::time::Duration,
    subscriptions: Mutex<HashMap<String, Subscription>>,
}

impl NotificationFeed {
    #[must_use]
    pub fn new(http: Client, app_base_url: Url, poll_interval: tokio::time::Duration) -> Self {
        Self {
            http,
            app_base_url,
            poll_interval,
            subscriptions: Mutex::new(HashMap::new()),
        }
    }

    /// Binds the session to a feed subscription for `token`.
    ///
    /// Rebinding with the same token is a no-op; a changed token tears the
    /// old subscription down first.
    pub async fn bind(&self, sid: &str, token: &SecretString) {
        let mut subscriptions = self.subscriptions.lock().await;

        if let Some(existing) = subscriptions.get(sid) {
            if existing.token.expose_secret() == token.expose_secret() {
                return;
            }
            debug!("Auth context changed, rebinding notification feed");
            existing.task.abort();
        }

        let task = self.spawn_poll_loop(token.clone());
        subscriptions.insert(
            sid.to_string(),
            Subscription {
                token: token.clone(),
                task,
            },
        );
    }

    /// Tears down the session's subscription, if any.
    pub async fn unbind(&self, sid: &str) {
        let mut subscriptions = self.subscriptions.lock().await;
        if let Some(subscription) = subscriptions.remove(sid) {
            subscription.task.abort();
            debug!("Notification feed unbound");
        }
    }

    /// Number of live subscriptions.
    pub async fn active(&self) -> usize {
        self.subscriptions.lock().await.len()
    }

    fn spawn_poll_loop(&self, token: SecretString) -> JoinHandle<()> {
        let http = self.http.clone();
        let interval = self.poll_interval;
        let url = self.app_base_url.join("api/notifications").ok();

        tokio::spawn(async move {
            let Some(url) = url else {
                warn!("Invalid notification feed URL, subscription idle");
                return;
            };
            let mut rng = StdRng::from_entropy();

            loop {
                let factor = rng.gen_range(90..110);
                sleep(interval * factor / 100).await;

                match http
                    .get(url.clone())
                    .bearer_auth(token.expose_secret())
                    .send()
                    .await
                {
                    Ok(response) if response.status().is_success() => {
                        match response.json::<Vec<Notification>>().await {
                            Ok(items) => debug!("Fetched {} notifications", items.len()),
                            Err(err) => warn!("Invalid notification payload: {err}"),
                        }
                    }
                    Ok(response) => {
                        warn!("Notification poll returned {}", response.status());
                    }
                    Err(err) => warn!("Notification poll failed: {err}"),
                }
            }
        })
    }
}

impl std::fmt::Debug for NotificationFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationFeed")
            .field("app_base_url", &self.app_base_url.as_str())
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}
