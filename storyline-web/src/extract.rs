//! Heuristic story extraction over raw homepage markup.
//!
//! No DOM is built. The pipeline scans the text with a handful of patterns:
//! discover same-site links, filter them down to plausible articles, resolve a
//! title for each through a fallback chain, then clean and validate it. Odd
//! markup never errors; it only yields fewer stories.

mod clean;
mod links;
mod title;

pub use clean::{clean_title, is_stoplisted};
pub use links::{
    CandidateLink, discover_links, filter_candidates, is_plausible_article, normalize_link,
};
pub use title::{
    ResolvedTitle, TitleSource, broad_area_title, link_text, nearby_title, resolve_title,
    slug_title,
};

use crate::site::SiteProfile;
use regex::Regex;
use storyline_common::{Result, Story, StorylineError};
use tracing::{debug, info};

pub const MAX_STORIES: usize = 6;
pub const MIN_TITLE_CHARS: usize = 5;
pub const MAX_TITLE_CHARS: usize = 500;

/// Result of one pass over a document, with counters for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub stories: Vec<Story>,
    /// Raw same-site hrefs matched, duplicates included.
    pub links_found: usize,
    /// Candidates left after normalization, dedup and filtering.
    pub candidates: usize,
    /// Candidates for which title resolution was attempted.
    pub evaluated: usize,
}

/// Extractor bound to one site. Holds only the compiled discovery pattern, so
/// it is cheap to share across requests.
#[derive(Debug, Clone)]
pub struct StoryExtractor {
    link_pattern: Regex,
    authority: String,
}

fn accept_title(title: &str) -> bool {
    let chars = title.chars().count();
    (MIN_TITLE_CHARS..=MAX_TITLE_CHARS).contains(&chars) && !is_stoplisted(title)
}

impl StoryExtractor {
    pub fn new(site: &SiteProfile) -> Result<Self> {
        let link_pattern = links::link_pattern(site.scheme(), site.authority())
            .map_err(|e| StorylineError::Extraction(e.to_string()))?;
        Ok(Self {
            link_pattern,
            authority: site.authority().to_string(),
        })
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Run the full pipeline over `html`.
    ///
    /// ```
    /// use storyline_web::{SiteProfile, StoryExtractor};
    ///
    /// let site = SiteProfile::new("https://time.com/").unwrap();
    /// let extractor = StoryExtractor::new(&site).unwrap();
    /// let html = r#"<a href="https://time.com/7001234/senate-budget-vote/">Senate Passes the Budget Bill</a>"#;
    ///
    /// let result = extractor.extract(html);
    /// assert_eq!(result.stories.len(), 1);
    /// assert_eq!(result.stories[0].title, "Senate Passes the Budget Bill");
    /// assert_eq!(result.stories[0].link, "https://time.com/7001234/senate-budget-vote");
    /// ```
    pub fn extract(&self, html: &str) -> Extraction {
        let found = discover_links(&self.link_pattern, html);
        // Unique by URL, so no link can back two stories.
        let candidates = filter_candidates(&found);
        debug!(
            site = %self.authority,
            links_found = found.len(),
            candidates = candidates.len(),
            "extract.candidates"
        );

        let mut stories = Vec::with_capacity(MAX_STORIES);
        let mut evaluated = 0;

        for candidate in &candidates {
            if stories.len() >= MAX_STORIES {
                break;
            }
            evaluated += 1;

            let Some(resolved) = resolve_title(html, candidate) else {
                debug!(link = %candidate.url, position = candidate.position, "extract.no_title");
                continue;
            };
            let title = clean_title(&resolved.text);
            if !accept_title(&title) {
                debug!(link = %candidate.url, title = %title, "extract.rejected_title");
                continue;
            }

            debug!(
                link = %candidate.url,
                source = resolved.source.as_str(),
                title = %title,
                "extract.accepted"
            );
            stories.push(Story::new(title, candidate.url.clone()));
        }

        info!(
            site = %self.authority,
            links_found = found.len(),
            candidates = candidates.len(),
            evaluated,
            stories = stories.len(),
            "extract.done"
        );

        Extraction {
            stories,
            links_found: found.len(),
            candidates: candidates.len(),
            evaluated,
        }
    }

    pub fn extract_latest_stories(&self, html: &str) -> Vec<Story> {
        self.extract(html).stories
    }
}
