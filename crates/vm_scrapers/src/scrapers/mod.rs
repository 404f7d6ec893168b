use async_trait::async_trait;
use scraper::Html;
use vm_core::{ArticleReference, Result, ScraperConfig};

use crate::http::HttpClient;

pub mod colombia;
pub mod gdelt;
pub mod jsonld;
pub mod pipeline;

use colombia::elespectador::ElEspectadorScraper;
use colombia::eltiempo::ElTiempoScraper;
use colombia::vanguardia::VanguardiaScraper;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub name: &'static str,
    pub emoji: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceMetadata {
    pub name: &'static str,
    pub emoji: &'static str,
    pub region: Region,
}

/// Where and how to fetch the comments of one article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentsRequest {
    pub url: String,
    /// Field of the response object holding the comment array.
    pub items_field: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleStatus {
    New,
    Updated,
    Unchanged,
}

/// Outlet plug-in for the shared extraction pipeline. Only the body
/// extractor is mandatory; outlets without comments, tags or a search
/// listing keep the defaults.
#[async_trait]
pub trait Scraper: Send + Sync {
    /// Returns the name, emoji and region of the news source
    fn source_metadata(&self) -> SourceMetadata;

    /// Bare domain used in references, e.g. `eltiempo.com`
    fn domain(&self) -> &str;

    /// Returns true if this scraper can handle the given URL
    fn can_handle(&self, url: &str) -> bool;

    /// Returns a list of CLI shorthand names for this scraper
    fn cli_names(&self) -> Vec<&str> {
        vec![]
    }

    /// Article body from the parsed page; `None` when there is none
    fn extract_body(&self, document: &Html) -> Option<String>;

    /// Outlet-internal article id. `Ok(None)` for outlets without comments.
    fn resolve_article_id(&self, _document: &Html, _raw_html: &str) -> Result<Option<String>> {
        Ok(None)
    }

    /// Comments API request for a resolved article id
    fn comments_request(&self, _article_id: &str) -> Option<CommentsRequest> {
        None
    }

    fn extract_tags(&self, _document: &Html) -> Option<Vec<String>> {
        None
    }

    /// Walks `pages` pages of the outlet search. Stops at the first failure
    /// and returns what was collected until then.
    async fn list_articles(&self, _client: &HttpClient, _query: &str, _pages: usize) -> Vec<ArticleReference> {
        tracing::info!("{} has no search listing", self.source_metadata().name);
        Vec::new()
    }
}

/// Enum that holds all possible scraper types
#[derive(Debug, Clone)]
pub enum ScraperType {
    ElTiempo(ElTiempoScraper),
    ElEspectador(ElEspectadorScraper),
    Vanguardia(VanguardiaScraper),
}

impl ScraperType {
    pub fn as_scraper(&self) -> &dyn Scraper {
        match self {
            ScraperType::ElTiempo(s) => s as &dyn Scraper,
            ScraperType::ElEspectador(s) => s as &dyn Scraper,
            ScraperType::Vanguardia(s) => s as &dyn Scraper,
        }
    }

    pub fn source_metadata(&self) -> SourceMetadata {
        self.as_scraper().source_metadata()
    }

    pub fn domain(&self) -> &str {
        self.as_scraper().domain()
    }

    pub fn can_handle(&self, url: &str) -> bool {
        self.as_scraper().can_handle(url)
    }

    pub fn cli_names(&self) -> Vec<&str> {
        self.as_scraper().cli_names()
    }

    pub async fn list_articles(&self, client: &HttpClient, query: &str, pages: usize) -> Vec<ArticleReference> {
        self.as_scraper().list_articles(client, query, pages).await
    }
}

/// Every available scraper, configured from `config`
pub fn get_scrapers(config: &ScraperConfig) -> Vec<ScraperType> {
    colombia::get_scrapers(config)
}

/// Common utilities for scrapers
pub(crate) mod utils {
    use scraper::{ElementRef, Selector};

    /// Trimmed text of the first match of `selector` under `element`
    pub fn child_text(element: &ElementRef, selector: &Selector) -> Option<String> {
        element
            .select(selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
    }

    /// Absolute URL for an outlet-relative `href`
    pub fn absolute_url(base: &str, href: &str) -> String {
        if href.starts_with("http") {
            href.to_string()
        } else {
            format!("{}{}", base.trim_end_matches('/'), href)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Selector;

    #[test]
    fn test_get_scrapers_handle_their_urls() {
        let scrapers = get_scrapers(&ScraperConfig::default());
        assert_eq!(scrapers.len(), 3);

        let tiempo_url = "https://www.eltiempo.com/mundo/venezuela/una-nota-3356789";
        let espectador_url = "https://www.elespectador.com/colombia/una-nota/";
        let vanguardia_url = "https://www.vanguardia.com/area-metropolitana/bucaramanga/una-nota-NG8069823";

        assert!(scrapers.iter().any(|s| s.can_handle(tiempo_url) && s.domain() == "eltiempo.com"));
        assert!(scrapers.iter().any(|s| s.can_handle(espectador_url) && s.domain() == "elespectador.com"));
        assert!(scrapers.iter().any(|s| s.can_handle(vanguardia_url) && s.domain() == "vanguardia.com"));
        assert_eq!(scrapers.iter().filter(|s| s.can_handle(tiempo_url)).count(), 1);
    }

    #[test]
    fn test_child_text() {
        let document = Html::parse_fragment(r#"<article><h3 class="t"> Título </h3><time></time></article>"#);
        let article = document.select(&Selector::parse("article").unwrap()).next().unwrap();
        assert_eq!(utils::child_text(&article, &Selector::parse("h3.t").unwrap()).as_deref(), Some("Título"));
        assert_eq!(utils::child_text(&article, &Selector::parse("time").unwrap()), None);
        assert_eq!(utils::child_text(&article, &Selector::parse("a").unwrap()), None);
    }

    #[test]
    fn test_absolute_url() {
        assert_eq!(utils::absolute_url("https://www.eltiempo.com", "/mundo/nota"), "https://www.eltiempo.com/mundo/nota");
        assert_eq!(utils::absolute_url("https://www.eltiempo.com/", "/mundo/nota"), "https://www.eltiempo.com/mundo/nota");
        assert_eq!(utils::absolute_url("https://www.eltiempo.com", "https://otra.com/x"), "https://otra.com/x");
    }
}
