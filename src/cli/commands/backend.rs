use clap::{Arg, Command};

pub const ARG_API_BASE_URL: &str = "api-base-url";
pub const ARG_CACHE_TTL: &str = "cache-ttl-seconds";
pub const ARG_REQUEST_TIMEOUT: &str = "request-timeout-seconds";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_BASE_URL)
                .long(ARG_API_BASE_URL)
                .help("Base URL of the marketplace backend API")
                .env("KNOLDG_API_BASE_URL")
                .default_value("https://api.knoldg.com"),
        )
        .arg(
            Arg::new(ARG_CACHE_TTL)
                .long(ARG_CACHE_TTL)
                .help("TTL for cached lookup data (industries, countries) in seconds")
                .env("KNOLDG_CACHE_TTL_SECONDS")
                .default_value("300")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_REQUEST_TIMEOUT)
                .long(ARG_REQUEST_TIMEOUT)
                .help("Per-request timeout for backend fetches in seconds")
                .env("KNOLDG_REQUEST_TIMEOUT_SECONDS")
                .default_value("10")
                .value_parser(clap::value_parser!(u64)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_defaults() {
        temp_env::with_vars(
            [
                ("KNOLDG_API_BASE_URL", None::<&str>),
                ("KNOLDG_CACHE_TTL_SECONDS", None::<&str>),
                ("KNOLDG_REQUEST_TIMEOUT_SECONDS", None::<&str>),
            ],
            || {
                let command = with_args(Command::new("test"));
                let matches = command.get_matches_from(vec!["test"]);
                assert_eq!(
                    matches.get_one::<String>(ARG_API_BASE_URL).cloned(),
                    Some("https://api.knoldg.com".to_string())
                );
                assert_eq!(matches.get_one::<u64>(ARG_CACHE_TTL).copied(), Some(300));
                assert_eq!(
                    matches.get_one::<u64>(ARG_REQUEST_TIMEOUT).copied(),
                    Some(10)
                );
            },
        );
    }

    #[test]
    fn backend_env_overrides() {
        temp_env::with_vars(
            [
                ("KNOLDG_API_BASE_URL", Some("https://api.staging.knoldg.com")),
                ("KNOLDG_CACHE_TTL_SECONDS", Some("60")),
            ],
            || {
                let command = with_args(Command::new("test"));
                let matches = command.get_matches_from(vec!["test"]);
                assert_eq!(
                    matches.get_one::<String>(ARG_API_BASE_URL).cloned(),
                    Some("https://api.staging.knoldg.com".to_string())
                );
                assert_eq!(matches.get_one::<u64>(ARG_CACHE_TTL).copied(), Some(60));
            },
        );
    }
}
