use std::path::PathBuf;

use crate::error::{AppError, Result};

pub const BASE_URL: &str = "https://www.nesine.com/iddaa";

/// Desktop UA presented to the site; the headless default gets served a stripped page.
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Browser viewport (width, height).
pub const WINDOW_SIZE: (u32, u32) = (1920, 1080);

/// Extra Chrome flags on top of headless/sandbox/window-size.
pub const CHROME_ARGS: &[&str] = &[
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--disable-web-security",
    "--disable-features=VizDisplayCompositor",
];

/// Upper bound on the wait for the first match container (seconds).
pub const FETCH_TIMEOUT_SECS: u64 = 10;

/// Next-day matches starting at or before this many minutes past midnight are
/// folded into the requested day. 360 = 06:00.
pub const NEXT_DAY_CUTOFF_MINUTES: u32 = 6 * 60;

/// Sort key for times that cannot be parsed: end of day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Wire format of every date the API reads or writes.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Timestamp embedded in CSV download filenames.
pub const FILENAME_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub api_port: u16,
    /// Listing root; basketball lives under `/basketbol` (NESINE_BASE_URL)
    pub base_url: String,
    /// Marker wait bound in seconds (FETCH_TIMEOUT_SECS)
    pub fetch_timeout_secs: u64,
    /// Inclusive next-day cutoff in minutes past midnight (NEXT_DAY_CUTOFF_MINUTES)
    pub cutoff_minutes: u32,
    /// Explicit Chrome binary; auto-detected when unset (CHROME_PATH)
    pub chrome_path: Option<PathBuf>,
    /// Run Chrome with its sandbox enabled (BROWSER_SANDBOX). Off by default since
    /// the sandbox does not start inside most containers.
    pub browser_sandbox: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            api_port: std::env::var("API_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .map_err(|_| AppError::Config("API_PORT must be a valid port number".to_string()))?,
            base_url: std::env::var("NESINE_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| BASE_URL.to_string()),
            fetch_timeout_secs: std::env::var("FETCH_TIMEOUT_SECS")
                .unwrap_or_else(|_| FETCH_TIMEOUT_SECS.to_string())
                .parse::<u64>()
                .map_err(|_| {
                    AppError::Config("FETCH_TIMEOUT_SECS must be a whole number of seconds".to_string())
                })?,
            cutoff_minutes: parse_cutoff(
                &std::env::var("NEXT_DAY_CUTOFF_MINUTES")
                    .unwrap_or_else(|_| NEXT_DAY_CUTOFF_MINUTES.to_string()),
            )?,
            chrome_path: std::env::var("CHROME_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            browser_sandbox: std::env::var("BROWSER_SANDBOX")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            api_port: 3000,
            base_url: BASE_URL.to_string(),
            fetch_timeout_secs: FETCH_TIMEOUT_SECS,
            cutoff_minutes: NEXT_DAY_CUTOFF_MINUTES,
            chrome_path: None,
            browser_sandbox: false,
        }
    }
}

fn parse_cutoff(raw: &str) -> Result<u32> {
    match raw.trim().parse::<u32>() {
        Ok(m) if m < MINUTES_PER_DAY => Ok(m),
        _ => Err(AppError::Config(format!(
            "NEXT_DAY_CUTOFF_MINUTES must be 0-{}, got '{raw}'",
            MINUTES_PER_DAY - 1
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cutoff_accepts_minutes_within_a_day() {
        assert_eq!(parse_cutoff("360").unwrap(), 360);
        assert_eq!(parse_cutoff(" 0 ").unwrap(), 0);
        assert_eq!(parse_cutoff("1439").unwrap(), 1439);
    }

    #[test]
    fn cutoff_rejects_out_of_range_and_garbage() {
        assert!(matches!(parse_cutoff("1440"), Err(AppError::Config(_))));
        assert!(matches!(parse_cutoff("six"), Err(AppError::Config(_))));
        assert!(matches!(parse_cutoff("-1"), Err(AppError::Config(_))));
    }

    #[test]
    fn default_matches_constants() {
        let cfg = Config::default();
        assert_eq!(cfg.base_url, BASE_URL);
        assert_eq!(cfg.cutoff_minutes, 360);
        assert_eq!(cfg.fetch_timeout_secs, 10);
        assert!(!cfg.browser_sandbox);
    }
}
