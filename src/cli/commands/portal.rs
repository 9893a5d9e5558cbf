use crate::locale::Locale;
use clap::{builder::ValueParser, Arg, Command};

pub const ARG_APP_BASE_URL: &str = "app-base-url";
pub const ARG_PUBLIC_BASE_URL: &str = "public-base-url";
pub const ARG_DEFAULT_LOCALE: &str = "default-locale";
pub const ARG_RECONCILE_INTERVAL: &str = "reconcile-interval-seconds";
pub const ARG_NOTIFY_POLL: &str = "notify-poll-seconds";

#[must_use]
pub fn validator_locale() -> ValueParser {
    ValueParser::from(
        move |value: &str| -> std::result::Result<Locale, String> {
            Locale::parse(value).ok_or_else(|| format!("unsupported locale: {value}"))
        },
    )
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_APP_BASE_URL)
                .long(ARG_APP_BASE_URL)
                .help("Base URL of the external identity/dashboard application")
                .env("KNOLDG_APP_BASE_URL")
                .default_value("https://app.knoldg.com"),
        )
        .arg(
            Arg::new(ARG_PUBLIC_BASE_URL)
                .long(ARG_PUBLIC_BASE_URL)
                .help("Public base URL of this portal, used for redirect_uri return trips")
                .env("KNOLDG_PUBLIC_BASE_URL")
                .default_value("https://knoldg.com"),
        )
        .arg(
            Arg::new(ARG_DEFAULT_LOCALE)
                .long(ARG_DEFAULT_LOCALE)
                .help("Locale used when neither the path, cookie, nor Accept-Language decide")
                .env("KNOLDG_DEFAULT_LOCALE")
                .default_value("en")
                .value_parser(validator_locale()),
        )
        .arg(
            Arg::new(ARG_RECONCILE_INTERVAL)
                .long(ARG_RECONCILE_INTERVAL)
                .help("Interval for the session reconciliation sweep in seconds")
                .env("KNOLDG_RECONCILE_INTERVAL_SECONDS")
                .default_value("5")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_NOTIFY_POLL)
                .long(ARG_NOTIFY_POLL)
                .help("Poll interval for notification feed subscriptions in seconds")
                .env("KNOLDG_NOTIFY_POLL_SECONDS")
                .default_value("30")
                .value_parser(clap::value_parser!(u64)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_validator_accepts_supported() {
        temp_env::with_vars([("KNOLDG_DEFAULT_LOCALE", Some("ar"))], || {
            let command = with_args(Command::new("test"));
            let matches = command.get_matches_from(vec!["test"]);
            assert_eq!(
                matches.get_one::<Locale>(ARG_DEFAULT_LOCALE).copied(),
                Some(Locale::Ar)
            );
        });
    }

    #[test]
    fn locale_validator_rejects_unknown() {
        temp_env::with_vars([("KNOLDG_DEFAULT_LOCALE", Some("fr"))], || {
            let command = with_args(Command::new("test"));
            let result = command.try_get_matches_from(vec!["test"]);
            assert!(result.is_err());
        });
    }

    #[test]
    fn interval_defaults() {
        temp_env::with_vars(
            [
                ("KNOLDG_RECONCILE_INTERVAL_SECONDS", None::<&str>),
                ("KNOLDG_NOTIFY_POLL_SECONDS", None::<&str>),
            ],
            || {
                let command = with_args(Command::new("test"));
                let matches = command.get_matches_from(vec!["test"]);
                assert_eq!(
                    matches.get_one::<u64>(ARG_RECONCILE_INTERVAL).copied(),
                    Some(5)
                );
                assert_eq!(matches.get_one::<u64>(ARG_NOTIFY_POLL).copied(), Some(30));
            },
        );
    }
}
