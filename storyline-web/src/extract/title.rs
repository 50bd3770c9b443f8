//! Title resolution: the fallback chain run for each candidate link.
//!
//! Strategies, first success wins:
//! 1. the anchor's own text
//! 2. the longest heading / `<title>` / `title=` / `<span>` text within ±3000 bytes
//! 3. the longest multi-word text node from 5000 bytes before to 2000 after
//! 4. a title-cased rendering of the URL slug
//!
//! Every strategy returns `Option`; odd markup only ever means "no result".
//! The window sizes are tuned against real homepages.

use super::clean::clean_title;
use super::links::CandidateLink;
use regex::Regex;
use std::ops::RangeInclusive;
use std::sync::LazyLock;

const ANCHOR_SPAN_LIMIT: usize = 1000;
const NEARBY_RADIUS: usize = 3000;
const BROAD_BEFORE: usize = 5000;
const BROAD_AFTER: usize = 2000;

const MIN_STRUCTURED_CHARS: usize = 10;
const NEARBY_CHARS: RangeInclusive<usize> = 15..=200;
const BROAD_CHARS: RangeInclusive<usize> = 15..=300;
const MIN_BROAD_WORDS: usize = 3;
const MIN_SLUG_SEGMENT_CHARS: usize = 4;
const MIN_SLUG_CHARS: usize = 6;

/// Generic page furniture the broad-area scan must not mistake for a headline.
const GENERIC_TEXT: &[&str] = &[
    "subscribe",
    "sign",
    "login",
    "menu",
    "search",
    "home",
    "news",
    "time",
    "click",
    "read",
    "view",
    "see",
    "watch",
    "more",
    "here",
    "advertisement",
    "ad",
];

// Priority order matters: only the first class with a usable match is consulted.
static NEARBY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)<h[1-6][^>]*>([^<]+(?:<[^>]*>[^<]*)*?)</h[1-6]>",
        r"(?i)<title>([^<]+)</title>",
        r#"(?i)title="([^"]+)""#,
        r"(?i)<span[^>]*>([^<]+(?:<[^>]*>[^<]*)*?)</span>",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid nearby-title regex"))
    .collect()
});

static TEXT_BETWEEN_TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">([^<]+)<").expect("valid text-node regex"));

/// Which fallback produced a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleSource {
    LinkText,
    Nearby,
    BroadArea,
    Slug,
}

impl TitleSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LinkText => "link_text",
            Self::Nearby => "nearby",
            Self::BroadArea => "broad_area",
            Self::Slug => "slug",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTitle {
    pub text: String,
    pub source: TitleSource,
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn floor_boundary(s: &str, idx: usize) -> usize {
    let mut idx = idx.min(s.len());
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

/// Slice `before` bytes behind and `after` bytes past `position`, clamped to
/// the document and snapped to char boundaries.
fn window(html: &str, position: usize, before: usize, after: usize) -> &str {
    let start = floor_boundary(html, position.saturating_sub(before));
    let end = floor_boundary(html, position.saturating_add(after));
    &html[start..end.max(start)]
}

/// First strictly-longest entry, so ties keep document order.
fn longest(candidates: impl Iterator<Item = String>) -> Option<String> {
    candidates.fold(None, |best: Option<String>, t| match best {
        Some(b) if char_len(&b) >= char_len(&t) => Some(b),
        _ => Some(t),
    })
}

/// Text between the end of the opening tag and the next `</a>`.
pub fn link_text(html: &str, position: usize) -> Option<String> {
    let open_end = position + html.get(position..)?.find('>')?;
    let close = open_end + html[open_end..].find("</a>")?;
    if close - open_end > ANCHOR_SPAN_LIMIT {
        return None;
    }
    Some(clean_title(&html[open_end + 1..close]))
}

pub fn nearby_title(html: &str, position: usize) -> Option<String> {
    let area = window(html, position, NEARBY_RADIUS, NEARBY_RADIUS);
    NEARBY_PATTERNS.iter().find_map(|pattern| {
        longest(
            pattern
                .captures_iter(area)
                .filter_map(|caps| caps.get(1))
                .map(|m| clean_title(m.as_str()))
                .filter(|t| NEARBY_CHARS.contains(&char_len(t))),
        )
    })
}

fn is_generic(text: &str) -> bool {
    GENERIC_TEXT.iter().any(|w| text.eq_ignore_ascii_case(w))
}

pub fn broad_area_title(html: &str, position: usize) -> Option<String> {
    let area = window(html, position, BROAD_BEFORE, BROAD_AFTER);
    longest(
        TEXT_BETWEEN_TAGS
            .captures_iter(area)
            .filter_map(|caps| caps.get(1))
            .map(|m| clean_title(m.as_str()))
            .filter(|t| {
                BROAD_CHARS.contains(&char_len(t))
                    && !is_generic(t)
                    && t.split(' ').count() >= MIN_BROAD_WORDS
            }),
    )
}

/// Upper-case every ASCII word character that starts a word.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for ch in text.chars() {
        let is_word = ch.is_ascii_alphanumeric() || ch == '_';
        if is_word && !in_word {
            out.push(ch.to_ascii_uppercase());
        } else {
            out.push(ch);
        }
        in_word = is_word;
    }
    out
}

/// Derive a title from the last meaningful path segment.
///
/// ```
/// use storyline_web::extract::slug_title;
///
/// assert_eq!(
///     slug_title("https://time.com/7001234/breaking-news-story-today").as_deref(),
///     Some("Breaking News Story Today")
/// );
/// ```
pub fn slug_title(url: &str) -> Option<String> {
    let slug = url.split('/').rev().find(|part| {
        char_len(part) >= MIN_SLUG_SEGMENT_CHARS && !part.bytes().all(|b| b.is_ascii_digit())
    })?;
    if char_len(slug) < MIN_SLUG_CHARS {
        return None;
    }
    Some(title_case(&slug.replace(['-', '_'], " ")).trim().to_string())
}

/// Run the fallback chain for one candidate. Later strategies only run when
/// every earlier one came up empty.
pub fn resolve_title(html: &str, link: &CandidateLink) -> Option<ResolvedTitle> {
    let structured = || {
        link_text(html, link.position)
            .filter(|t| char_len(t) >= MIN_STRUCTURED_CHARS)
            .map(|text| ResolvedTitle {
                text,
                source: TitleSource::LinkText,
            })
            .or_else(|| {
                nearby_title(html, link.position)
                    .filter(|t| char_len(t) >= MIN_STRUCTURED_CHARS)
                    .map(|text| ResolvedTitle {
                        text,
                        source: TitleSource::Nearby,
                    })
            })
    };

    structured()
        .or_else(|| {
            broad_area_title(html, link.position).map(|text| ResolvedTitle {
                text,
                source: TitleSource::BroadArea,
            })
        })
        .or_else(|| {
            slug_title(&link.url).map(|text| ResolvedTitle {
                text,
                source: TitleSource::Slug,
            })
        })
}
