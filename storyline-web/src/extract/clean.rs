//! Text cleanup for title candidates.

use regex::Regex;
use std::sync::LazyLock;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

/// Named entities we decode, applied in this order.
const ENTITIES: &[(&str, &str)] = &[
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&#x27;", "'"),
    ("&nbsp;", " "),
    ("&rsquo;", "'"),
    ("&lsquo;", "'"),
    ("&rdquo;", "\""),
    ("&ldquo;", "\""),
];

/// Single navigational words that never make a story title.
const STOPLIST: &[&str] = &[
    "home",
    "menu",
    "search",
    "login",
    "sign",
    "subscribe",
    "click",
    "read",
    "view",
    "see",
    "watch",
    "more",
    "here",
    "link",
    "url",
    "image",
    "photo",
];

fn clean_once(text: &str) -> String {
    let mut decoded = TAG.replace_all(text, " ").into_owned();
    for (entity, plain) in ENTITIES {
        if decoded.contains(entity) {
            decoded = decoded.replace(entity, plain);
        }
    }
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip tags, decode entities, collapse whitespace.
///
/// Runs to a fixpoint so double-encoded input (`&amp;lt;b&amp;gt;`) ends up
/// clean too; every pass that changes anything after the first one shortens
/// the string, so this terminates.
///
/// ```
/// use storyline_web::extract::clean_title;
///
/// assert_eq!(
///     clean_title("  <span>Rock &amp; Roll</span>\n&ldquo;Forever&rdquo; "),
///     "Rock & Roll \"Forever\""
/// );
/// ```
pub fn clean_title(text: &str) -> String {
    let mut current = clean_once(text);
    loop {
        let next = clean_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Whole-string, case-insensitive match against the navigation stoplist.
pub fn is_stoplisted(title: &str) -> bool {
    STOPLIST.iter().any(|word| title.eq_ignore_ascii_case(word))
}
