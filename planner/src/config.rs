use std::env;

/// Default bounds on the number of candidate dates in a poll
pub const DEFAULT_POLL_MIN_OPTIONS: usize = 2;
pub const DEFAULT_POLL_MAX_OPTIONS: usize = 30;

pub const DEFAULT_LOG_FILTER: &str = "info,evently_planner=debug,evently_mcp=debug";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Minimum number of distinct dates a new poll must offer
    pub poll_min_options: usize,
    /// Maximum number of dates a poll may hold
    pub poll_max_options: usize,
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_min_options: DEFAULT_POLL_MIN_OPTIONS,
            poll_max_options: DEFAULT_POLL_MAX_OPTIONS,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let poll_min_options = parse_count(
            "EVENTLY_POLL_MIN_OPTIONS",
            lookup("EVENTLY_POLL_MIN_OPTIONS"),
            DEFAULT_POLL_MIN_OPTIONS,
        );
        let poll_max_options = parse_count(
            "EVENTLY_POLL_MAX_OPTIONS",
            lookup("EVENTLY_POLL_MAX_OPTIONS"),
            DEFAULT_POLL_MAX_OPTIONS,
        );

        let (poll_min_options, poll_max_options) = if poll_min_options > poll_max_options {
            tracing::warn!(
                min = poll_min_options,
                max = poll_max_options,
                "Poll option bounds are inverted, using defaults"
            );
            (DEFAULT_POLL_MIN_OPTIONS, DEFAULT_POLL_MAX_OPTIONS)
        } else {
            (poll_min_options, poll_max_options)
        };

        Self {
            poll_min_options,
            poll_max_options,
            log_filter: lookup("EVENTLY_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }
}

fn parse_count(key: &str, raw: Option<String>, default: usize) -> usize {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse::<usize>() {
        Ok(value) if value > 0 => value,
        _ => {
            tracing::warn!(key = key, value = %raw, "Invalid count, using default {}", default);
            default
        }
    }
}
