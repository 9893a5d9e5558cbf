//! # Knoldg Web Portal
//!
//! `knoldg-web` is the localized marketing and content-browsing portal for the
//! Knoldg knowledge marketplace. It serves English and Arabic page shells for
//! industries, topics and knowledge items, and interoperates with the
//! separately deployed identity/dashboard application through cookies,
//! redirects and a per-session notification subscription.
//!
//! ## Locale Routing
//!
//! Every non-asset request resolves to exactly one locale (`en` or `ar`)
//! before page logic runs. The first path segment carries the locale, the
//! `preferred_language` cookie mirrors it, and legacy callback URLs with a
//! token embedded in the path are normalized to `/{locale}/callback?token=`
//! with a temporary redirect. Unknown cookie values never fail a request;
//! they fall through to `Accept-Language` negotiation and the default locale.
//!
//! ## Auth Token Reconciliation
//!
//! The `token` cookie set by the identity application is the authoritative
//! credential; a legacy per-session store keeps a fallback copy plus a user
//! marker written at login. A marker without a cookie means the session went
//! stale elsewhere: local artifacts are cleared exactly once, a silent
//! cross-app logout fires best-effort, and the client is steered through the
//! sign-out flow. Callback and sign-out routes are exempt so in-flight
//! transitions are never disturbed.

pub mod backend;
pub mod cli;
pub mod locale;
pub mod notify;
pub mod session;
pub mod web;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
