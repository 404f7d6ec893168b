use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::keywords::KeywordSet;
use crate::{Error, Result};

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_TRAILING_PARAGRAPHS: usize = 3;
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// Settings shared by every scraper. Every field has a default, so a config
/// file only needs the values it wants to change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    pub keywords: KeywordSet,
    pub user_agent: String,
    /// Number of trailing El Tiempo paragraphs treated as footer and dropped.
    pub trailing_paragraphs_dropped: usize,
    pub endpoints: Endpoints,
    pub listing: ListingConfig,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            keywords: KeywordSet::default(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            trailing_paragraphs_dropped: DEFAULT_TRAILING_PARAGRAPHS,
            endpoints: Endpoints::default(),
            listing: ListingConfig::default(),
        }
    }
}

impl ScraperConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be greater than zero".to_string()));
        }
        if self.keywords.is_empty() {
            return Err(Error::Config("at least one keyword is required".to_string()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Base URLs of every remote service. Paths and query strings are appended
/// by the scrapers, so pointing these at another host is enough to redirect
/// all traffic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub el_tiempo: String,
    /// Viafoura live-comments API used by El Tiempo.
    pub el_tiempo_comments: String,
    pub el_espectador: String,
    pub vanguardia: String,
    /// GDELT DOC 2.0 article search.
    pub gdelt: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            el_tiempo: "https://www.eltiempo.com".to_string(),
            el_tiempo_comments: "https://livecomments.viafoura.co/v4/livecomments".to_string(),
            el_espectador: "https://www.elespectador.com".to_string(),
            vanguardia: "https://www.vanguardia.com".to_string(),
            gdelt: "https://api.gdeltproject.org/api/v2/doc/doc".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    pub query: String,
    pub pages: usize,
    /// El Tiempo search window, `YYYY-MM-DD`.
    pub el_tiempo_from: String,
    pub el_tiempo_until: String,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            query: "migrantes venezolanos en colombia".to_string(),
            pages: 100,
            el_tiempo_from: "2024-01-20".to_string(),
            el_tiempo_until: "2024-07-20".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScraperConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.trailing_paragraphs_dropped, 3);
        assert_eq!(config.keywords, KeywordSet::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: ScraperConfig = serde_json::from_str(
            r#"{"timeout_secs": 3, "keywords": ["venezolanos"], "endpoints": {"el_tiempo": "http://127.0.0.1:9000"}}"#,
        )
        .unwrap();
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.keywords.keywords(), ["venezolanos".to_string()]);
        assert_eq!(config.endpoints.el_tiempo, "http://127.0.0.1:9000");
        assert_eq!(config.endpoints.el_espectador, "https://www.elespectador.com");
        assert_eq!(config.listing.pages, 100);
    }

    #[test]
    fn test_validate_rejects_zero_timeout_and_empty_keywords() {
        let mut config = ScraperConfig::default();
        config.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = ScraperConfig::default();
        config.keywords = KeywordSet::new(Vec::<String>::new());
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
