//! Every CSS selector and attribute name the scraper knows about the listing page.
//! When the site changes its markup, this is the file to update.

use scraper::Selector;

use crate::error::{AppError, Result};

/// One match row. The same selector gates the fetcher's readiness wait.
pub const MATCH_CONTAINER: &str = "div[data-code][data-nid][data-sport-id]";
pub const CODE_ATTR: &str = "data-code";

pub const TIME: &str = r#"span[data-testid^="time"]"#;
pub const MATCH_NAME: &str = r#"a[data-test-id="matchName"]"#;
pub const MARKET_COUNT: &str = r#"[data-test-id="event_mbs"] span"#;

pub const ODD_BUTTON: &str = r#"button[data-testid^="odd_"]"#;
pub const ODD_ID_ATTR: &str = "data-testid";

/// Test-id fragments naming the 1/X/2 market. The site has used both spellings.
pub const MATCH_RESULT_LABELS: &[&str] = &["Maç Sonucu", "MaçSonucu"];

/// Compiled selector set, built once per extraction.
#[derive(Debug)]
pub struct Selectors {
    pub container: Selector,
    pub time: Selector,
    pub match_name: Selector,
    pub market_count: Selector,
    pub odd_button: Selector,
}

impl Selectors {
    pub fn compile() -> Result<Self> {
        Ok(Self {
            container: compile_one(MATCH_CONTAINER)?,
            time: compile_one(TIME)?,
            match_name: compile_one(MATCH_NAME)?,
            market_count: compile_one(MARKET_COUNT)?,
            odd_button: compile_one(ODD_BUTTON)?,
        })
    }
}

fn compile_one(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| AppError::PageStructure(format!("invalid selector `{css}`: {e:?}")))
}
