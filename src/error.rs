use axum::{http::StatusCode, response::IntoResponse, Json};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Timed out after {secs}s waiting for match containers at {url}")]
    FetchTimeout { url: String, secs: u64 },

    #[error("Browser launch error: {0}")]
    BrowserLaunch(String),

    #[error("Navigation error: {0}")]
    Navigation(String),

    #[error("Page structure error: {0}")]
    PageStructure(String),

    #[error("Invalid date '{0}', expected DD.MM.YYYY")]
    DateFormat(String),

    #[error("Unknown sport '{0}'")]
    UnknownSport(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Scrape task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Why a single match container was skipped. Always recovered by the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RecordParseError {
    #[error("container has no data-code")]
    MissingCode,

    #[error("container has no match name")]
    MissingTitle,
}
