pub mod parser;
pub mod selectors;

pub use parser::{extract_matches, Extraction};
pub use selectors::Selectors;
