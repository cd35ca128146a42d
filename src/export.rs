//! Response bodies: the JSON envelope and the spreadsheet-friendly CSV download.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::config::FILENAME_TIMESTAMP_FORMAT;
use crate::error::{AppError, Result};
use crate::types::{format_date, MatchRecord};

/// Excel needs the BOM to read the file as UTF-8 (team names carry Turkish letters).
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub const CSV_HEADER: [&str; 11] = [
    "Kod", "Saat", "Maç", "MBS", "Spor", "match_date",
    "odd_1", "odd_x", "odd_2", "under_odd", "over_odd",
];

#[derive(Debug, Serialize)]
pub struct MatchesResponse<'a> {
    pub matches: &'a [MatchRecord],
    pub count: usize,
    pub sport: &'a str,
    pub date: String,
    pub status: &'static str,
}

impl<'a> MatchesResponse<'a> {
    pub fn new(matches: &'a [MatchRecord], sport: &'a str, date: NaiveDate) -> Self {
        Self {
            matches,
            count: matches.len(),
            sport,
            date: format_date(date),
            status: "success",
        }
    }
}

/// BOM-prefixed UTF-8 CSV with the fixed 11-column header.
pub fn to_csv_bytes(matches: &[MatchRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(UTF8_BOM.to_vec());

    writer.write_record(CSV_HEADER)?;
    for m in matches {
        let date = format_date(m.match_date);
        writer.write_record([
            m.code.as_str(),
            m.time.as_str(),
            m.title.as_str(),
            m.market_count.as_str(),
            m.sport.as_str(),
            date.as_str(),
            m.odds.odd_1.as_str(),
            m.odds.odd_x.as_str(),
            m.odds.odd_2.as_str(),
            m.odds.under_odd.as_str(),
            m.odds.over_odd.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Io(e.into_error()))
}

/// Download name, stamped with the serialisation time rather than the match date.
pub fn csv_filename(now: NaiveDateTime) -> String {
    format!("nesine_matches_{}.csv", now.format(FILENAME_TIMESTAMP_FORMAT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{parse_date, Odds};

    fn record(code: &str, title: &str) -> MatchRecord {
        MatchRecord {
            code: code.to_string(),
            time: "19:00".to_string(),
            title: title.to_string(),
            market_count: String::new(),
            sport: "Futbol".to_string(),
            match_date: parse_date("14.03.2025").unwrap(),
            odds: Odds::default(),
        }
    }

    fn parse_csv(bytes: &[u8]) -> (Vec<String>, Vec<Vec<String>>) {
        let body = bytes.strip_prefix(UTF8_BOM).expect("BOM prefix");
        let mut rdr = csv::Reader::from_reader(body);
        let header = rdr.headers().unwrap().iter().map(str::to_string).collect();
        let rows = rdr
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect();
        (header, rows)
    }

    #[test]
    fn csv_starts_with_bom_and_fixed_header() {
        let bytes = to_csv_bytes(&[]).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        let text = std::str::from_utf8(&bytes[UTF8_BOM.len()..]).unwrap();
        assert_eq!(
            text,
            "Kod,Saat,Maç,MBS,Spor,match_date,odd_1,odd_x,odd_2,under_odd,over_odd\r\n"
        );
    }

    #[test]
    fn csv_reparse_recovers_fields_and_keeps_empties_empty() {
        let bytes = to_csv_bytes(&[record("101", "Team A - Team B")]).unwrap();
        let (header, rows) = parse_csv(&bytes);

        assert_eq!(header, CSV_HEADER);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row[0], "101");
        assert_eq!(row[1], "19:00");
        assert_eq!(row[2], "Team A - Team B");
        assert_eq!(row[3], "");
        assert_eq!(row[4], "Futbol");
        assert_eq!(row[5], "14.03.2025");
        assert!(row[6..].iter().all(String::is_empty), "odds: {:?}", &row[6..]);
    }

    #[test]
    fn csv_quotes_commas_and_quotes_in_titles() {
        let mut r = record("7", r#"Real Madrid, "B" - Getafe"#);
        r.odds.odd_1 = "1.45".to_string();
        let (_, rows) = parse_csv(&to_csv_bytes(&[r]).unwrap());
        assert_eq!(rows[0][2], r#"Real Madrid, "B" - Getafe"#);
        assert_eq!(rows[0][6], "1.45");
    }

    #[test]
    fn json_envelope_shape() {
        let matches = vec![record("1", "A - B"), record("2", "C - D")];
        let body = MatchesResponse::new(&matches, "mixed", parse_date("14.03.2025").unwrap());
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["count"], 2);
        assert_eq!(v["sport"], "mixed");
        assert_eq!(v["date"], "14.03.2025");
        assert_eq!(v["status"], "success");
        assert_eq!(v["matches"][1]["kod"], "2");
        assert_eq!(v["matches"][0]["odd_x"], "");
    }

    #[test]
    fn filename_uses_timestamp() {
        let now = NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(9, 5, 7)
            .unwrap();
        assert_eq!(csv_filename(now), "nesine_matches_20250314_090507.csv");
    }
}
