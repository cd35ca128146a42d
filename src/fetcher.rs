use std::ffi::OsStr;
use std::time::Duration;

use chrono::NaiveDate;
use headless_chrome::{Browser, LaunchOptions};
use tracing::{debug, info};

use crate::config::{Config, CHROME_ARGS, USER_AGENT, WINDOW_SIZE};
use crate::error::{AppError, Result};
use crate::extractor::selectors::MATCH_CONTAINER;
use crate::types::{format_date, Sport};

/// Source of rendered listing HTML for one sport and day.
pub trait PageSource: Send + Sync {
    fn fetch_page(&self, sport: Sport, date: NaiveDate) -> Result<String>;
}

/// Listing URL for a sport/day: football sits at the root, basketball under `/basketbol`.
pub fn listing_url(base_url: &str, sport: Sport, date: NaiveDate) -> String {
    let base = base_url.trim_end_matches('/');
    let date = format_date(date);
    match sport {
        Sport::Football => format!("{base}?dt={date}"),
        Sport::Basketball => format!("{base}/basketbol?dt={date}"),
    }
}

/// Renders listing pages in a fresh headless Chrome per call.
#[derive(Debug, Clone)]
pub struct BrowserFetcher {
    cfg: Config,
}

impl BrowserFetcher {
    pub fn new(cfg: Config) -> Self {
        Self { cfg }
    }

    fn launch(&self) -> Result<Browser> {
        let args: Vec<&OsStr> = CHROME_ARGS.iter().map(OsStr::new).collect();
        let options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(self.cfg.browser_sandbox)
            .window_size(Some(WINDOW_SIZE))
            .path(self.cfg.chrome_path.clone())
            .args(args)
            .build()
            .map_err(|e| AppError::BrowserLaunch(e.to_string()))?;

        Browser::new(options).map_err(|e| AppError::BrowserLaunch(e.to_string()))
    }
}

impl PageSource for BrowserFetcher {
    fn fetch_page(&self, sport: Sport, date: NaiveDate) -> Result<String> {
        let url = listing_url(&self.cfg.base_url, sport, date);
        info!(sport = %sport, "Fetching {url}");

        // Dropping `browser` kills the Chrome process on every exit path below.
        let browser = self.launch()?;
        let tab = browser
            .new_tab()
            .map_err(|e| AppError::BrowserLaunch(format!("could not open tab: {e}")))?;

        tab.set_user_agent(USER_AGENT, None, None)
            .map_err(|e| AppError::Navigation(format!("{url}: {e}")))?;
        tab.navigate_to(&url)
            .map_err(|e| AppError::Navigation(format!("{url}: {e}")))?;

        let timeout = Duration::from_secs(self.cfg.fetch_timeout_secs);
        tab.wait_for_element_with_custom_timeout(MATCH_CONTAINER, timeout)
            .map_err(|e| {
                debug!("marker wait failed for {url}: {e}");
                AppError::FetchTimeout { url: url.clone(), secs: self.cfg.fetch_timeout_secs }
            })?;

        let html = tab
            .get_content()
            .map_err(|e| AppError::Navigation(format!("{url}: could not read page: {e}")))?;
        debug!(bytes = html.len(), "Rendered {url}");
        Ok(html)
    }
}
