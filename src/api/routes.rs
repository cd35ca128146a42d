use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::{header, HeaderMap, Method},
    response::{IntoResponse, Response},
    routing::{get, MethodRouter},
    Json, Router,
};
use chrono::Local;
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use super::health::HealthState;
use super::latency::LatencyStats;
use crate::error::{AppError, Result};
use crate::export::{csv_filename, to_csv_bytes, MatchesResponse};
use crate::fetcher::PageSource;
use crate::scrape::{ScrapeKind, Scraper};
use crate::types::{format_date, parse_date, Sport};

pub const SERVICE_NAME: &str = "Nesine Scraper API";

#[derive(Clone)]
pub struct ApiState {
    pub scraper: Scraper,
    pub health: Arc<HealthState>,
    pub latency: Arc<LatencyStats>,
}

impl ApiState {
    pub fn new(source: Arc<dyn PageSource>, cutoff_minutes: u32) -> Self {
        let health = Arc::new(HealthState::new());
        let latency = Arc::new(LatencyStats::new());
        let scraper = Scraper::new(source, cutoff_minutes, Arc::clone(&health), Arc::clone(&latency));
        Self { scraper, health, latency }
    }
}

pub fn router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/futbol", endpoint(Endpoint::Football))
        .route("/api/basketbol", endpoint(Endpoint::Basketball))
        .route("/api/mixed", endpoint(Endpoint::Mixed))
        .route("/api/scrape", endpoint(Endpoint::Scrape))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Football,
    Basketball,
    Mixed,
    /// Sport taken from the body, requested day only.
    Scrape,
}

impl Endpoint {
    pub fn name(self) -> &'static str {
        match self {
            Endpoint::Football => "futbol",
            Endpoint::Basketball => "basketbol",
            Endpoint::Mixed => "mixed",
            Endpoint::Scrape => "scrape",
        }
    }

    fn kind(self, req: &ScrapeRequest) -> Result<ScrapeKind> {
        Ok(match self {
            Endpoint::Football => ScrapeKind::Window(Sport::Football),
            Endpoint::Basketball => ScrapeKind::Window(Sport::Basketball),
            Endpoint::Mixed => ScrapeKind::Combined,
            Endpoint::Scrape => {
                let sport = req.sport.as_deref().map(Sport::parse).transpose()?;
                ScrapeKind::Day(sport.unwrap_or(Sport::Football))
            }
        })
    }
}

fn endpoint(ep: Endpoint) -> MethodRouter<ApiState> {
    get(move |State(state): State<ApiState>| async move { health(state, ep) }).post(
        move |State(state): State<ApiState>,
              RawQuery(query): RawQuery,
              headers: HeaderMap,
              body: Bytes| async move { scrape(state, ep, query, headers, body).await },
    )
}

// ---------------------------------------------------------------------------
// Request body
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct ScrapeRequest {
    /// `DD.MM.YYYY`; server's local date when absent.
    pub date: Option<String>,
    pub format: Option<String>,
    /// Only read by `/api/scrape`.
    pub sport: Option<String>,
}

/// CSV when the query string, the body, or the Accept header asks for it.
pub fn wants_csv(query: Option<&str>, body_format: Option<&str>, headers: &HeaderMap) -> bool {
    let in_query = query.is_some_and(|q| q.contains("format=csv"));
    let in_body = body_format == Some("csv");
    let in_accept = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("text/csv"));
    in_query || in_body || in_accept
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn scrape(
    state: ApiState,
    ep: Endpoint,
    query: Option<String>,
    headers: HeaderMap,
    body: Bytes,
) -> std::result::Result<Response, AppError> {
    let req: ScrapeRequest = if body.iter().all(u8::is_ascii_whitespace) {
        ScrapeRequest::default()
    } else {
        serde_json::from_slice(&body)?
    };

    let date = match req.date.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => Local::now().date_naive(),
    };
    let kind = ep.kind(&req)?;
    info!(endpoint = ep.name(), date = %format_date(date), "Scrape request");

    let scraper = state.scraper.clone();
    let matches = tokio::task::spawn_blocking(move || scraper.run(kind, date)).await??;

    if wants_csv(query.as_deref(), req.format.as_deref(), &headers) {
        let bytes = to_csv_bytes(&matches)?;
        let filename = csv_filename(Local::now().naive_local());
        return Ok((
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}\"")),
            ],
            bytes,
        )
            .into_response());
    }

    Ok(Json(MatchesResponse::new(&matches, kind.tag(), date)).into_response())
}

fn health(state: ApiState, ep: Endpoint) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "OK",
        "endpoint": ep.name(),
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Local::now().to_rfc3339(),
        "scrapes": state.health.snapshot(),
        "latency": state.latency.summary(),
    }))
}
