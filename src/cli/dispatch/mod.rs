//! Command-line argument dispatch and server initialization.
//!
//! This module parses validated CLI arguments and maps them to the
//! appropriate action, such as starting the portal server with its full
//! configuration state.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{backend, portal};
use crate::locale::Locale;
use anyhow::{Context, Result};
use url::Url;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or malformed.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(3000);

    let app_base_url = parse_url(matches, portal::ARG_APP_BASE_URL)?;
    let public_base_url = parse_url(matches, portal::ARG_PUBLIC_BASE_URL)?;
    let api_base_url = parse_url(matches, backend::ARG_API_BASE_URL)?;

    let default_locale = matches
        .get_one::<Locale>(portal::ARG_DEFAULT_LOCALE)
        .copied()
        .unwrap_or(Locale::En);

    Ok(Action::Server(Args {
        port,
        app_base_url,
        public_base_url,
        api_base_url,
        default_locale,
        reconcile_interval_seconds: matches
            .get_one::<u64>(portal::ARG_RECONCILE_INTERVAL)
            .copied()
            .unwrap_or(5),
        notify_poll_seconds: matches
            .get_one::<u64>(portal::ARG_NOTIFY_POLL)
            .copied()
            .unwrap_or(30),
        cache_ttl_seconds: matches
            .get_one::<u64>(backend::ARG_CACHE_TTL)
            .copied()
            .unwrap_or(300),
        request_timeout_seconds: matches
            .get_one::<u64>(backend::ARG_REQUEST_TIMEOUT)
            .copied()
            .unwrap_or(10),
    }))
}

fn parse_url(matches: &clap::ArgMatches, arg: &str) -> Result<Url> {
    let raw = matches
        .get_one::<String>(arg)
        .cloned()
        .with_context(|| format!("missing required argument: --{arg}"))?;
    Url::parse(&raw).with_context(|| format!("invalid URL for --{arg}: {raw}"))
}
