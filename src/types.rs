use chrono::NaiveDate;
use serde::Serialize;

use crate::config::DATE_FORMAT;
use crate::error::{AppError, Result};

// ---------------------------------------------------------------------------
// Sport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sport {
    Football,
    Basketball,
}

impl Sport {
    pub const ALL: [Sport; 2] = [Sport::Football, Sport::Basketball];

    /// Site slug, used in URLs and as the response `sport` tag.
    pub fn slug(self) -> &'static str {
        match self {
            Sport::Football => "futbol",
            Sport::Basketball => "basketbol",
        }
    }

    /// Capitalised label stored on each record.
    pub fn label(self) -> &'static str {
        match self {
            Sport::Football => "Futbol",
            Sport::Basketball => "Basketbol",
        }
    }

    /// Accepts the site slugs and the English names, case-insensitively.
    pub fn parse(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "futbol" | "football" | "soccer" => Ok(Sport::Football),
            "basketbol" | "basketball" => Ok(Sport::Basketball),
            _ => Err(AppError::UnknownSport(name.to_string())),
        }
    }
}

impl std::fmt::Display for Sport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| AppError::DateFormat(raw.to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Writes `NaiveDate` as `DD.MM.YYYY`.
fn serialize_dotted<S: serde::Serializer>(date: &NaiveDate, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.collect_str(&date.format(DATE_FORMAT))
}

// ---------------------------------------------------------------------------
// Match record
// ---------------------------------------------------------------------------

/// Odds read from a match container. Only the 1/X/2 market is ever filled;
/// `under_odd`/`over_odd` are kept so the output shape stays fixed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Odds {
    pub odd_1: String,
    pub odd_x: String,
    pub odd_2: String,
    pub under_odd: String,
    pub over_odd: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    #[serde(rename = "kod")]
    pub code: String,
    #[serde(rename = "saat")]
    pub time: String,
    #[serde(rename = "mac")]
    pub title: String,
    #[serde(rename = "mbs")]
    pub market_count: String,
    #[serde(rename = "spor")]
    pub sport: String,
    #[serde(serialize_with = "serialize_dotted")]
    pub match_date: NaiveDate,
    #[serde(flatten)]
    pub odds: Odds,
}
