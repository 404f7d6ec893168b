use async_trait::async_trait;
use scraper::Html;
use tracing::warn;
use vm_core::ScraperConfig;

use super::REGION;
use crate::scrapers::{jsonld, Scraper, SourceMetadata};

const DOMAIN: &str = "vanguardia.com";

/// Vanguardia only exposes its body through JSON-LD; it has no comments,
/// tags or search listing here.
#[derive(Debug, Clone)]
pub struct VanguardiaScraper {
    base_url: String,
}

impl VanguardiaScraper {
    pub fn new(config: &ScraperConfig) -> Self {
        Self {
            base_url: config.endpoints.vanguardia.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for VanguardiaScraper {
    fn default() -> Self {
        Self::new(&ScraperConfig::default())
    }
}

#[async_trait]
impl Scraper for VanguardiaScraper {
    fn source_metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: "Vanguardia",
            emoji: "🚩",
            region: REGION,
        }
    }

    fn domain(&self) -> &str {
        DOMAIN
    }

    fn can_handle(&self, url: &str) -> bool {
        url.contains(DOMAIN) || url.starts_with(&self.base_url)
    }

    fn cli_names(&self) -> Vec<&str> {
        vec!["vanguardia"]
    }

    /// `articleBody` of the first JSON-LD block, whatever its type.
    fn extract_body(&self, document: &Html) -> Option<String> {
        match jsonld::first_block(document)? {
            Ok(block) => jsonld::string_field(&block, "articleBody"),
            Err(e) => {
                warn!("Vanguardia JSON-LD block is not valid JSON: {}", e);
                None
            }
        }
    }
}
