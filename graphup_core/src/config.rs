use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://graph.facebook.com";
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client configuration shared by every object created from one `Graph`.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub user_agent: String,
    /// When set, a successful comment download with zero entries is reported
    /// on `comments-download-failed` instead of `comments-downloaded`.
    pub empty_comments_is_failure: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: format!("graphup/{}", env!("CARGO_PKG_VERSION")),
            empty_comments_is_failure: true,
        }
    }
}

impl GraphConfig {
    /// Defaults overridden by `GRAPHUP_BASE_URL` and
    /// `GRAPHUP_CONNECT_TIMEOUT_SECS` when present.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("GRAPHUP_BASE_URL") {
            if !url.trim().is_empty() {
                config.base_url = url;
            }
        }
        if let Ok(secs) = std::env::var("GRAPHUP_CONNECT_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(secs) => config.connect_timeout = Duration::from_secs(secs),
                Err(_) => log::warn!(
                    "[config] ignoring GRAPHUP_CONNECT_TIMEOUT_SECS={:?}: not a number",
                    secs
                ),
            }
        }
        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_empty_comments_is_failure(mut self, value: bool) -> Self {
        self.empty_comments_is_failure = value;
        self
    }

    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn photos_url(&self) -> String {
        format!("{}/me/photos", self.base())
    }

    pub fn comments_url(&self, object_id: &str) -> String {
        format!("{}/{}/comments", self.base(), object_id)
    }

    pub fn likes_url(&self, object_id: &str) -> String {
        format!("{}/{}/likes", self.base(), object_id)
    }
}
