use storyline_common::Story;
use storyline_web::extract::{TitleSource, discover_links, filter_candidates, resolve_title};
use storyline_web::{SiteProfile, StoryExtractor};

const HOMEPAGE: &str = include_str!("fixtures/homepage.html");

fn time_extractor() -> StoryExtractor {
    let site = SiteProfile::new("https://time.com/").expect("valid site");
    StoryExtractor::new(&site).expect("extractor builds")
}

#[test]
fn homepage_yields_six_latest_stories_in_order() {
    let result = time_extractor().extract(HOMEPAGE);

    assert_eq!(result.links_found, 11);
    assert_eq!(result.candidates, 7);
    assert_eq!(result.evaluated, 6);
    assert_eq!(
        result.stories,
        vec![
            Story::new(
                "Senate Reaches a Deal on the Budget",
                "https://time.com/7012001/senate-budget-deal"
            ),
            Story::new(
                "Wildfire Season Arrives Early in the West",
                "https://time.com/7012002/wildfire-season-west"
            ),
            Story::new(
                "Markets Rally as Fed Holds Rates & Signals Cuts",
                "https://time.com/7012003/markets-rally-fed"
            ),
            Story::new(
                "AI Chip Export Rules Tighten Again",
                "https://time.com/7012004/ai-chip-exports"
            ),
            Story::new(
                "July Jobs Report Beats Expectations",
                "https://time.com/7012006/jobs-report-july"
            ),
            Story::new(
                "NASA Delays Moon Launch Again",
                "https://time.com/7012007/space-launch-delay"
            ),
        ]
    );
}

#[test]
fn image_only_anchor_borrows_the_adjacent_headline() {
    let site = SiteProfile::new("https://time.com/").unwrap();
    let extractor = StoryExtractor::new(&site).unwrap();
    assert_eq!(extractor.authority(), "time.com");

    let pattern = regex::Regex::new(r#"(?i)href="(https://time\.com/[^"]+)""#).unwrap();
    let candidates = filter_candidates(&discover_links(&pattern, HOMEPAGE));
    let chip = candidates
        .iter()
        .find(|c| c.url.ends_with("ai-chip-exports"))
        .expect("chip story is a candidate");

    let resolved = resolve_title(HOMEPAGE, chip).expect("title resolves");
    assert_eq!(resolved.source, TitleSource::Nearby);
    assert_eq!(resolved.text, "AI Chip Export Rules Tighten Again");
}

#[test]
fn links_are_unique_and_titles_are_clean() {
    let stories = time_extractor().extract_latest_stories(HOMEPAGE);
    let mut links: Vec<&str> = stories.iter().map(|s| s.link.as_str()).collect();
    links.sort_unstable();
    links.dedup();
    assert_eq!(links.len(), stories.len());

    for story in &stories {
        assert!(!story.title.contains('<'), "markup left in {:?}", story.title);
        assert!(!story.title.contains("&amp;"), "entity left in {:?}", story.title);
        assert!((5..=500).contains(&story.title.chars().count()));
        assert!(story.link.starts_with("https://time.com/"));
    }
}

#[test]
fn other_sites_can_be_targeted() {
    let site = SiteProfile::new("http://localhost:8080/").unwrap();
    let extractor = StoryExtractor::new(&site).unwrap();
    let html = r#"<a href="http://localhost:8080/news/2024/local-council-vote">Local Council Approves New Park</a>
                  <a href="https://time.com/7012001/senate-budget-deal/">Senate Reaches a Deal on the Budget</a>"#;

    let stories = extractor.extract_latest_stories(html);
    assert_eq!(
        stories,
        vec![Story::new(
            "Local Council Approves New Park",
            "http://localhost:8080/news/2024/local-council-vote"
        )]
    );
}

#[test]
fn malformed_markup_degrades_without_panicking() {
    let html = r#"<div><a href="https://time.com/7099999/unclosed-anchor-story/">Unclosed anchor <b>text"#;
    let stories = time_extractor().extract_latest_stories(html);
    // No `</a>`, no heading, no multi-word text node: the slug is all that is left.
    assert_eq!(
        stories,
        vec![Story::new(
            "Unclosed Anchor Story",
            "https://time.com/7099999/unclosed-anchor-story"
        )]
    );
}
