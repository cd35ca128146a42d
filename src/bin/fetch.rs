//! Command-line client for a running nesine-api server.
//!
//!   nesine-fetch <futbol|basketbol|mixed|scrape> [DD.MM.YYYY] [--csv]
//!
//! `--csv` saves the download under the server's filename; otherwise prints a summary.

use std::time::Duration;

use clap::{Parser, ValueEnum};
use reqwest::header::{ACCEPT, CONTENT_DISPOSITION};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Endpoint {
    Futbol,
    Basketbol,
    Mixed,
    Scrape,
}

impl Endpoint {
    fn path(self) -> &'static str {
        match self {
            Endpoint::Futbol => "futbol",
            Endpoint::Basketbol => "basketbol",
            Endpoint::Mixed => "mixed",
            Endpoint::Scrape => "scrape",
        }
    }
}

/// Fetch nesine match listings from a running nesine-api server.
///
/// The server address comes from API_URL (default http://localhost:3000).
#[derive(Parser, Debug, PartialEq, Eq)]
#[command(name = "nesine-fetch", long_about = None)]
struct Args {
    /// Endpoint to call.
    #[arg(value_enum)]
    endpoint: Endpoint,

    /// Day to scrape as DD.MM.YYYY; the server's today when omitted.
    date: Option<String>,

    /// Save the CSV download instead of printing a summary.
    #[arg(long)]
    csv: bool,
}

/// `attachment; filename="x.csv"` → `x.csv`
fn filename_from_disposition(value: &str) -> Option<&str> {
    let (_, rest) = value.split_once("filename=")?;
    let name = rest.trim().trim_matches('"');
    (!name.is_empty() && !name.contains(['/', '\\'])).then_some(name)
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("Request failed: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let base_url = std::env::var("API_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    // Up to four browser cycles per request.
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(180))
        .build()?;

    let mut body = serde_json::Map::new();
    if let Some(date) = &args.date {
        body.insert("date".to_string(), date.clone().into());
    }
    if args.csv {
        body.insert("format".to_string(), "csv".into());
    }

    let url = format!("{}/api/{}", base_url.trim_end_matches('/'), args.endpoint.path());
    let mut req = client.post(&url).json(&body);
    if args.csv {
        req = req.header(ACCEPT, "text/csv");
    }
    let resp = req.send().await?;

    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        return Err(format!("{status}: {text}").into());
    }

    if args.csv {
        let filename = resp
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_disposition)
            .unwrap_or("nesine_matches.csv")
            .to_string();
        let bytes = resp.bytes().await?;
        std::fs::write(&filename, &bytes)?;
        println!("Saved {} bytes to {filename}", bytes.len());
        return Ok(());
    }

    let v: serde_json::Value = resp.json().await?;
    println!("{} matches ({} / {})", v["count"], v["sport"], v["date"]);
    let matches = v["matches"].as_array().cloned().unwrap_or_default();
    for (i, m) in matches.iter().take(3).enumerate() {
        println!(
            "{}. {} - {} - MBS: {}  [{} {} {}]",
            i + 1,
            m["saat"].as_str().unwrap_or(""),
            m["mac"].as_str().unwrap_or("Unknown"),
            m["mbs"].as_str().unwrap_or("N/A"),
            m["odd_1"].as_str().unwrap_or(""),
            m["odd_x"].as_str().unwrap_or(""),
            m["odd_2"].as_str().unwrap_or(""),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("nesine-fetch").chain(v.iter().copied()))
    }

    #[test]
    fn parses_endpoint_date_and_flag_in_any_order() {
        assert_eq!(
            args(&["--csv", "mixed", "31.12.2024"]).unwrap(),
            Args { endpoint: Endpoint::Mixed, date: Some("31.12.2024".into()), csv: true }
        );
        assert_eq!(
            args(&["futbol"]).unwrap(),
            Args { endpoint: Endpoint::Futbol, date: None, csv: false }
        );
    }

    #[test]
    fn rejects_unknown_endpoint_and_extra_args() {
        assert!(args(&["tenis"]).is_err());
        assert!(args(&[]).is_err());
        assert!(args(&["futbol", "01.01.2025", "extra"]).is_err());
    }

    #[test]
    fn endpoint_paths_match_server_routes() {
        assert_eq!(Endpoint::Basketbol.path(), "basketbol");
        assert_eq!(Endpoint::Scrape.path(), "scrape");
    }

    #[test]
    fn filename_comes_from_disposition() {
        assert_eq!(
            filename_from_disposition(r#"attachment; filename="nesine_matches_20250101_120000.csv""#),
            Some("nesine_matches_20250101_120000.csv")
        );
        assert_eq!(filename_from_disposition("attachment"), None);
        assert_eq!(filename_from_disposition(r#"attachment; filename="../x.csv""#), None);
    }
}
