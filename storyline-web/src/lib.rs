//! Homepage acquisition and heuristic story extraction.
//!
//! - Site targeting: which homepage, which domain counts as "ours" (`site`)
//! - Fetcher trait and reqwest-backed implementation (`fetch`)
//! - Regex-driven story extraction over raw markup (`extract`)
//!
//! Note: extraction never builds a DOM. It scans the document text with a
//! handful of linear patterns and degrades to fewer stories on odd markup.

pub mod extract;
pub mod fetch;
pub mod site;

pub use extract::{Extraction, StoryExtractor};
pub use fetch::{HttpFetcher, StoryFetcher};
pub use site::SiteProfile;
