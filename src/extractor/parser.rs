use chrono::NaiveDate;
use scraper::{ElementRef, Html};
use tracing::{debug, warn};

use super::selectors::{Selectors, CODE_ATTR, MATCH_RESULT_LABELS, ODD_ID_ATTR};
use crate::error::RecordParseError;
use crate::types::{MatchRecord, Odds, Sport};

/// Result of parsing one rendered listing page.
#[derive(Debug, Default)]
pub struct Extraction {
    /// Kept records, in DOM order.
    pub records: Vec<MatchRecord>,
    /// Containers matched by the marker selector.
    pub containers: usize,
    /// Containers dropped because a required field was missing.
    pub skipped: usize,
}

/// Parse every match container in `html`. Containers that fail to parse are
/// counted and skipped; they never abort the page.
pub fn extract_matches(html: &str, sport: Sport, date: NaiveDate, sel: &Selectors) -> Extraction {
    let document = Html::parse_document(html);
    let mut out = Extraction::default();

    for container in document.select(&sel.container) {
        out.containers += 1;
        match parse_container(container, sport, date, sel) {
            Ok(record) => out.records.push(record),
            Err(reason) => {
                out.skipped += 1;
                debug!(
                    code = container.value().attr(CODE_ATTR).unwrap_or(""),
                    "skipping container: {reason}"
                );
            }
        }
    }

    if out.containers == 0 {
        warn!(sport = %sport, "no match containers on page");
    }

    out
}

/// Read one marker container into a record.
pub fn parse_container(
    container: ElementRef<'_>,
    sport: Sport,
    date: NaiveDate,
    sel: &Selectors,
) -> Result<MatchRecord, RecordParseError> {
    let code = container.value().attr(CODE_ATTR).unwrap_or("").to_string();
    if code.is_empty() {
        return Err(RecordParseError::MissingCode);
    }

    let title = first_text(container, &sel.match_name);
    if title.is_empty() {
        return Err(RecordParseError::MissingTitle);
    }

    Ok(MatchRecord {
        code,
        time: first_text(container, &sel.time),
        title,
        market_count: first_text(container, &sel.market_count),
        sport: sport.label().to_string(),
        match_date: date,
        odds: read_odds(container, sel),
    })
}

fn read_odds(container: ElementRef<'_>, sel: &Selectors) -> Odds {
    let mut odds = Odds::default();

    for button in container.select(&sel.odd_button) {
        let test_id = button.value().attr(ODD_ID_ATTR).unwrap_or("");
        if !MATCH_RESULT_LABELS.iter().any(|label| test_id.contains(label)) {
            continue;
        }
        let slot = if test_id.ends_with("_1") {
            &mut odds.odd_1
        } else if test_id.ends_with("_X") {
            &mut odds.odd_x
        } else if test_id.ends_with("_2") {
            &mut odds.odd_2
        } else {
            continue;
        };
        *slot = stripped_text(button);
    }

    odds
}

fn first_text(scope: ElementRef<'_>, selector: &scraper::Selector) -> String {
    scope.select(selector).next().map(stripped_text).unwrap_or_default()
}

/// Text nodes with each fragment trimmed, then concatenated.
fn stripped_text(el: ElementRef<'_>) -> String {
    el.text().map(str::trim).collect()
}
