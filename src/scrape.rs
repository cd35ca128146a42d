use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::api::health::HealthState;
use crate::api::latency::LatencyStats;
use crate::error::Result;
use crate::extractor::{extract_matches, Selectors};
use crate::fetcher::PageSource;
use crate::merger::{merge_combined, merge_window, next_day};
use crate::types::{MatchRecord, Sport};

/// What a request asks to be scraped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeKind {
    /// One sport, requested day only.
    Day(Sport),
    /// One sport, requested day plus early next-day matches.
    Window(Sport),
    /// Every sport, requested day plus early next-day matches, sorted.
    Combined,
}

impl ScrapeKind {
    /// Tag echoed as `sport` in JSON responses.
    pub fn tag(self) -> &'static str {
        match self {
            ScrapeKind::Day(s) | ScrapeKind::Window(s) => s.slug(),
            ScrapeKind::Combined => "mixed",
        }
    }
}

/// Runs fetch + extract cycles sequentially and merges their output.
/// Blocking; callers on the async runtime go through `spawn_blocking`.
#[derive(Clone)]
pub struct Scraper {
    source: Arc<dyn PageSource>,
    cutoff_minutes: u32,
    health: Arc<HealthState>,
    latency: Arc<LatencyStats>,
}

impl Scraper {
    pub fn new(
        source: Arc<dyn PageSource>,
        cutoff_minutes: u32,
        health: Arc<HealthState>,
        latency: Arc<LatencyStats>,
    ) -> Self {
        Self { source, cutoff_minutes, health, latency }
    }

    pub fn run(&self, kind: ScrapeKind, date: NaiveDate) -> Result<Vec<MatchRecord>> {
        let sel = Selectors::compile()?;
        let matches = match kind {
            ScrapeKind::Day(sport) => self.cycle(&sel, sport, date)?,
            ScrapeKind::Window(sport) => {
                let next = next_day(date)?;
                let day = self.cycle(&sel, sport, date)?;
                let tomorrow = self.cycle(&sel, sport, next)?;
                merge_window(day, tomorrow, self.cutoff_minutes)
            }
            ScrapeKind::Combined => {
                let next = next_day(date)?;
                let mut days = Vec::with_capacity(Sport::ALL.len());
                for sport in Sport::ALL {
                    days.push(self.cycle(&sel, sport, date)?);
                }
                let mut nexts = Vec::with_capacity(Sport::ALL.len());
                for sport in Sport::ALL {
                    nexts.push(self.cycle(&sel, sport, next)?);
                }
                merge_combined(days, nexts, self.cutoff_minutes)
            }
        };
        info!(kind = kind.tag(), count = matches.len(), "Scrape complete");
        Ok(matches)
    }

    /// One fetch + extract for a single sport and day.
    fn cycle(&self, sel: &Selectors, sport: Sport, date: NaiveDate) -> Result<Vec<MatchRecord>> {
        let started = Instant::now();
        let html = match self.source.fetch_page(sport, date) {
            Ok(html) => html,
            Err(e) => {
                warn!(sport = %sport, "Fetch failed: {e}");
                self.health.record_failure();
                return Err(e);
            }
        };

        let extraction = extract_matches(&html, sport, date, sel);
        self.latency.record(started.elapsed());
        self.health.record_cycle(extraction.records.len(), extraction.skipped);
        info!(
            sport = %sport,
            containers = extraction.containers,
            kept = extraction.records.len(),
            skipped = extraction.skipped,
            "Parsed listing"
        );
        Ok(extraction.records)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;
    use crate::error::AppError;
    use crate::types::{format_date, parse_date};

    /// Serves canned HTML keyed by (sport, date); unknown keys time out.
    #[derive(Default)]
    pub(crate) struct StubSource {
        pages: HashMap<(&'static str, String), String>,
        pub(crate) calls: Mutex<Vec<(Sport, NaiveDate)>>,
    }

    impl StubSource {
        pub(crate) fn with_page(mut self, sport: Sport, date: &str, rows: &[(&str, &str)]) -> Self {
            let body: String = rows
                .iter()
                .map(|(code, time)| {
                    format!(
                        r#"<div data-code="{code}" data-nid="n{code}" data-sport-id="1">
                             <span data-testid="time">{time}</span>
                             <a data-test-id="matchName">Team {code} - Rival {code}</a>
                           </div>"#
                    )
                })
                .collect();
            self.pages.insert((sport.slug(), date.to_string()), format!("<html><body>{body}</body></html>"));
            self
        }
    }

    impl PageSource for StubSource {
        fn fetch_page(&self, sport: Sport, date: NaiveDate) -> Result<String> {
            self.calls.lock().unwrap().push((sport, date));
            self.pages
                .get(&(sport.slug(), format_date(date)))
                .cloned()
                .ok_or_else(|| AppError::FetchTimeout { url: format!("stub://{sport}/{date}"), secs: 0 })
        }
    }

    fn scraper(source: StubSource) -> (Scraper, Arc<StubSource>, Arc<HealthState>) {
        let source = Arc::new(source);
        let health = Arc::new(HealthState::new());
        let s = Scraper::new(source.clone(), 360, health.clone(), Arc::new(LatencyStats::new()));
        (s, source, health)
    }

    fn codes(records: &[MatchRecord]) -> Vec<&str> {
        records.iter().map(|r| r.code.as_str()).collect()
    }

    #[test]
    fn window_fetches_day_then_next_and_filters_next() {
        let source = StubSource::default()
            .with_page(Sport::Basketball, "31.12.2024", &[("1", "20:30"), ("2", "23:00")])
            .with_page(Sport::Basketball, "01.01.2025", &[("3", "03:00"), ("4", "06:01"), ("5", "?")]);
        let (s, source, health) = scraper(source);

        let out = s.run(ScrapeKind::Window(Sport::Basketball), parse_date("31.12.2024").unwrap()).unwrap();
        assert_eq!(codes(&out), ["1", "2", "3"]);
        assert_eq!(format_date(out[2].match_date), "01.01.2025");

        let calls = source.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(format_date(calls[1].1), "01.01.2025");
        assert_eq!(health.snapshot().cycles, 2);
    }

    #[test]
    fn combined_runs_four_cycles_and_sorts() {
        let source = StubSource::default()
            .with_page(Sport::Football, "10.05.2025", &[("F1", "22:00")])
            .with_page(Sport::Basketball, "10.05.2025", &[("B1", "09:00")])
            .with_page(Sport::Football, "11.05.2025", &[("F2", "05:00"), ("F3", "12:00")])
            .with_page(Sport::Basketball, "11.05.2025", &[("B2", "01:00")]);
        let (s, source, _) = scraper(source);

        let out = s.run(ScrapeKind::Combined, parse_date("10.05.2025").unwrap()).unwrap();
        assert_eq!(codes(&out), ["B1", "F1", "B2", "F2"]);
        assert_eq!(out[0].sport, "Basketbol");

        let order: Vec<_> = source
            .calls
            .lock()
            .unwrap()
            .iter()
            .map(|(sport, date)| format!("{sport}@{}", format_date(*date)))
            .collect();
        assert_eq!(
            order,
            ["futbol@10.05.2025", "basketbol@10.05.2025", "futbol@11.05.2025", "basketbol@11.05.2025"]
        );
    }

    #[test]
    fn day_kind_skips_next_day() {
        let source = StubSource::default().with_page(Sport::Football, "01.06.2025", &[("9", "01:00")]);
        let (s, source, _) = scraper(source);

        let out = s.run(ScrapeKind::Day(Sport::Football), parse_date("01.06.2025").unwrap()).unwrap();
        assert_eq!(codes(&out), ["9"]);
        assert_eq!(source.calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn fetch_failure_aborts_and_is_counted() {
        let source = StubSource::default().with_page(Sport::Football, "01.06.2025", &[("9", "01:00")]);
        let (s, _, health) = scraper(source);

        let err = s.run(ScrapeKind::Window(Sport::Football), parse_date("01.06.2025").unwrap()).unwrap_err();
        assert!(matches!(err, AppError::FetchTimeout { .. }));
        let snap = health.snapshot();
        assert_eq!(snap.cycles, 1);
        assert_eq!(snap.failures, 1);
    }

    #[test]
    fn kind_tags() {
        assert_eq!(ScrapeKind::Window(Sport::Football).tag(), "futbol");
        assert_eq!(ScrapeKind::Day(Sport::Basketball).tag(), "basketbol");
        assert_eq!(ScrapeKind::Combined.tag(), "mixed");
    }
}
