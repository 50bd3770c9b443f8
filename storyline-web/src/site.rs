use storyline_common::{Result, StorylineError};
use url::Url;

/// The homepage we fetch and the authority whose links count as articles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteProfile {
    base_url: Url,
    authority: String,
}

impl SiteProfile {
    /// Parse a homepage URL into a profile.
    ///
    /// ```
    /// use storyline_web::SiteProfile;
    ///
    /// let site = SiteProfile::new("https://Time.com/").unwrap();
    /// assert_eq!(site.authority(), "time.com");
    /// assert_eq!(site.scheme(), "https");
    /// ```
    pub fn new(base_url: &str) -> Result<Self> {
        let url = Url::parse(base_url)
            .map_err(|e| StorylineError::Config(format!("invalid site URL {base_url:?}: {e}")))?;
        if !matches!(url.scheme(), "https" | "http") {
            return Err(StorylineError::Config(format!(
                "site URL must be http(s), got {}",
                url.scheme()
            )));
        }
        let host = url
            .host_str()
            .ok_or_else(|| StorylineError::Config(format!("site URL {base_url:?} has no host")))?
            .to_ascii_lowercase();
        let authority = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host,
        };
        Ok(Self {
            base_url: url,
            authority,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn scheme(&self) -> &str {
        self.base_url.scheme()
    }

    /// Host, plus `:port` when the URL names a non-default one.
    pub fn authority(&self) -> &str {
        &self.authority
    }
}
