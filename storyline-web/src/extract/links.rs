//! Candidate link discovery and filtering.

use regex::Regex;
use std::collections::HashSet;

/// Substrings (lowercase) that mark a link as an asset or a non-article page.
const EXCLUDED_FRAGMENTS: &[&str] = &[
    "wp-content",
    "/img/",
    "/static/",
    "/css/",
    "/js/",
    ".png",
    ".jpg",
    ".jpeg",
    ".gif",
    ".svg",
    ".pdf",
    ".css",
    ".js",
    "subscribe",
    "newsletter",
    "privacy-policy",
    "terms-of-service",
    "contact",
    "about",
];

const MIN_ARTICLE_URL_CHARS: usize = 31;
const MIN_URL_SEGMENTS: usize = 4;

/// A same-site link and the byte offset of its `href` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateLink {
    pub url: String,
    pub position: usize,
}

impl CandidateLink {
    pub fn new(url: impl Into<String>, position: usize) -> Self {
        Self {
            url: url.into(),
            position,
        }
    }
}

/// Compile the `href="<scheme>://<authority>/..."` scanner for one site.
pub(crate) fn link_pattern(scheme: &str, authority: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r#"(?i)href="({}://{}/[^"]+)""#,
        regex::escape(scheme),
        regex::escape(authority)
    ))
}

/// Every matching href in document order, duplicates included.
pub fn discover_links(pattern: &Regex, html: &str) -> Vec<CandidateLink> {
    pattern
        .captures_iter(html)
        .filter_map(|caps| {
            let attr = caps.get(0)?;
            let url = caps.get(1)?;
            Some(CandidateLink::new(url.as_str(), attr.start()))
        })
        .collect()
}

/// Drop query and fragment, then trailing `/`, `\` and `"` artifacts.
///
/// ```
/// use storyline_web::extract::normalize_link;
///
/// assert_eq!(
///     normalize_link("https://time.com/7012345/fed-rates/?utm_source=x#top"),
///     "https://time.com/7012345/fed-rates"
/// );
/// ```
pub fn normalize_link(raw: &str) -> String {
    let end = raw.find(['?', '#']).unwrap_or(raw.len());
    raw[..end].trim_end_matches(['/', '\\', '"']).to_string()
}

pub fn is_excluded(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    EXCLUDED_FRAGMENTS.iter().any(|frag| lower.contains(frag))
}

/// Article paths are long and deep; section and home links are not.
pub fn is_structurally_plausible(url: &str) -> bool {
    url.chars().count() >= MIN_ARTICLE_URL_CHARS && url.split('/').count() >= MIN_URL_SEGMENTS
}

pub fn is_plausible_article(url: &str) -> bool {
    !is_excluded(url) && is_structurally_plausible(url)
}

/// Normalize, dedupe (first occurrence wins) and keep plausible articles,
/// ordered by position.
pub fn filter_candidates(found: &[CandidateLink]) -> Vec<CandidateLink> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut kept = Vec::new();
    for link in found {
        let url = normalize_link(&link.url);
        if !seen.insert(url.clone()) {
            continue;
        }
        if is_plausible_article(&url) {
            kept.push(CandidateLink::new(url, link.position));
        }
    }
    kept.sort_by_key(|c| c.position);
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time_pattern() -> Regex {
        link_pattern("https", "time.com").unwrap()
    }

    #[test]
    fn discovers_same_site_hrefs_with_offsets() {
        let html = r#"<a href="https://time.com/1/a-story">x</a><a HREF="https://TIME.com/2/b">y</a><a href="https://cnn.com/3/c">z</a>"#;
        let found = discover_links(&time_pattern(), html);
        assert_eq!(
            found,
            vec![
                CandidateLink::new("https://time.com/1/a-story", 3),
                CandidateLink::new("https://TIME.com/2/b", 45),
            ]
        );
    }

    #[test]
    fn unterminated_attributes_are_ignored() {
        let html = r#"<a href="https://time.com/1/never-closed>text</a>"#;
        assert!(discover_links(&time_pattern(), html).is_empty());
    }

    #[test]
    fn domain_dots_are_literal() {
        let html = r#"<a href="https://timexcom/1/fake-story-path">x</a>"#;
        assert!(discover_links(&time_pattern(), html).is_empty());
    }

    #[test]
    fn normalizes_query_fragment_and_trailing_artifacts() {
        assert_eq!(normalize_link("https://time.com/a/b/\\\\"), "https://time.com/a/b");
        assert_eq!(normalize_link("https://time.com/a/b\"\""), "https://time.com/a/b");
        assert_eq!(normalize_link("https://time.com/a/b#c?d"), "https://time.com/a/b");
        assert_eq!(normalize_link("https://time.com/a/b"), "https://time.com/a/b");
    }

    #[test]
    fn assets_are_excluded_regardless_of_length() {
        assert!(!is_plausible_article("https://example.com/img/foo.png"));
        assert!(!is_plausible_article(
            "https://example.com/wp-content/uploads/2024/very-long-file-name"
        ));
        assert!(!is_plausible_article("https://example.com/newsroom/Contact-Us-Today"));
    }

    #[test]
    fn short_or_shallow_links_are_dropped() {
        assert!(!is_plausible_article("https://example.com/ab"));
        assert!(is_plausible_article(
            "https://example.com/very/long/real/article/path-name"
        ));
    }

    #[test]
    fn first_occurrence_wins_after_normalization() {
        let found = vec![
            CandidateLink::new("https://time.com/7000001/markets-rally-again/", 120),
            CandidateLink::new("https://time.com/7000001/markets-rally-again?ref=nav", 480),
            CandidateLink::new("https://time.com/7000001/markets-rally-again#comments", 900),
        ];
        let kept = filter_candidates(&found);
        assert_eq!(
            kept,
            vec![CandidateLink::new(
                "https://time.com/7000001/markets-rally-again",
                120
            )]
        );
    }

    #[test]
    fn output_is_sorted_by_position() {
        let found = vec![
            CandidateLink::new("https://time.com/7000050/fifty-story-here", 50),
            CandidateLink::new("https://time.com/7000010/ten-story-here", 10),
            CandidateLink::new("https://time.com/7000090/ninety-story-here", 90),
        ];
        let positions: Vec<usize> = filter_candidates(&found).iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![10, 50, 90]);
    }
}
