//! Environment driven settings
//!
//! All knobs are read once at process start:
//!
//! - `GITLET_LOG`: tracing filter directive (default `warn`)
//! - `GITLET_DATE`: fixed commit timestamp, `%Y-%m-%d %H:%M:%S %z` or RFC 2822
//! - `NO_PAGER`: disable the pager for history output

use chrono::{DateTime, FixedOffset};

pub const LOG_ENV: &str = "GITLET_LOG";
pub const DATE_ENV: &str = "GITLET_DATE";
pub const NO_PAGER_ENV: &str = "NO_PAGER";

const DEFAULT_LOG_FILTER: &str = "warn";
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub log_filter: String,
    pub fixed_date: Option<DateTime<FixedOffset>>,
    pub use_pager: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            fixed_date: None,
            use_pager: true,
        }
    }
}

impl Settings {
    pub fn load_from_env() -> anyhow::Result<Self> {
        let log_filter =
            std::env::var(LOG_ENV).unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());

        let fixed_date = match std::env::var(DATE_ENV) {
            Ok(date_str) => Some(Self::parse_date(&date_str)?),
            Err(_) => None,
        };

        let use_pager = std::env::var_os(NO_PAGER_ENV).is_none();

        Ok(Settings {
            log_filter,
            fixed_date,
            use_pager,
        })
    }

    pub fn parse_date(date_str: &str) -> anyhow::Result<DateTime<FixedOffset>> {
        DateTime::parse_from_str(date_str, DATE_FORMAT)
            .or_else(|_| DateTime::parse_from_rfc2822(date_str))
            .map_err(|_| anyhow::anyhow!("invalid {} value: {}", DATE_ENV, date_str))
    }

    /// Timestamp for a commit created now
    pub fn commit_timestamp(&self) -> DateTime<FixedOffset> {
        self.fixed_date
            .unwrap_or_else(|| chrono::Local::now().fixed_offset())
    }
}
