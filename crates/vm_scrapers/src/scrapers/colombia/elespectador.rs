use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use scraper::Html;
use serde_json::Value;
use vm_core::{ArticleReference, Error, Result, ScraperConfig};

use super::REGION;
use crate::http::HttpClient;
use crate::logging::Logger;
use crate::scrapers::utils::absolute_url;
use crate::scrapers::{jsonld, CommentsRequest, Scraper, SourceMetadata};

const DOMAIN: &str = "elespectador.com";

lazy_static! {
    static ref ARTICLE_ID: Regex = Regex::new(r#""_id":"([A-Z0-9]+)""#).expect("valid article id pattern");
}

/// `from` offset of the search API: `0` for the first page, otherwise the
/// page index followed by a literal `0` (page 3 is `30`).
pub fn search_offset(page: usize) -> String {
    if page == 0 {
        "0".to_string()
    } else {
        format!("{}0", page)
    }
}

/// Id of the article in El Espectador's content store, found anywhere in the
/// raw page as `"_id":"<ID>"`.
pub fn find_article_id(raw_html: &str) -> Option<String> {
    ARTICLE_ID
        .captures(raw_html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[derive(Debug, Clone)]
pub struct ElEspectadorScraper {
    base_url: String,
}

impl ElEspectadorScraper {
    pub fn new(config: &ScraperConfig) -> Self {
        Self {
            base_url: config.endpoints.el_espectador.trim_end_matches('/').to_string(),
        }
    }

    pub fn search_url(&self, keyword: &str, page: usize) -> String {
        format!(
            "{}/pf/api/v3/content/fetch/searcherTag?query=%7B%22author%22%3Anull%2C%22date%22%3Anull%2C%22from%22%3A{}%2C%22keyword%22%3A%22{}%22%2C%22section%22%3A%5B%22%2Fcolombia%22%5D%2C%22subtype%22%3A%5B%22Art%C3%ADculos%22%5D%7D&d=937&_website=el-espectador",
            self.base_url,
            search_offset(page),
            urlencoding::encode(keyword)
        )
    }

    pub fn comments_url(&self, article_id: &str) -> String {
        format!(
            "{}/pf/api/v3/content/fetch/comments?query=%7B%22articleId%22%3A%22{}%22%7D&d=937&_website=el-espectador",
            self.base_url, article_id
        )
    }

    /// References in one page of the search API response.
    pub fn parse_search_page(&self, data: &Value) -> Vec<ArticleReference> {
        data.get("content_elements")
            .and_then(Value::as_array)
            .map(|elements| {
                elements
                    .iter()
                    .map(|element| {
                        let title = element
                            .pointer("/headlines/basic")
                            .and_then(Value::as_str)
                            .unwrap_or_default();
                        let date = element
                            .get("display_date")
                            .and_then(Value::as_str)
                            .unwrap_or("No Date");
                        let path = element
                            .get("canonical_url")
                            .and_then(Value::as_str)
                            .unwrap_or("not found");
                        ArticleReference::new(absolute_url(&self.base_url, path), title, date, DOMAIN)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Default for ElEspectadorScraper {
    fn default() -> Self {
        Self::new(&ScraperConfig::default())
    }
}

#[async_trait]
impl Scraper for ElEspectadorScraper {
    fn source_metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: "El Espectador",
            emoji: "👁️",
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
        vec!["elespectador", "el-espectador"]
    }

    /// `articleBody` of the first `NewsArticle` JSON-LD block.
    fn extract_body(&self, document: &Html) -> Option<String> {
        jsonld::find_typed(document, "NewsArticle").and_then(|article| jsonld::string_field(&article, "articleBody"))
    }

    fn resolve_article_id(&self, _document: &Html, raw_html: &str) -> Result<Option<String>> {
        find_article_id(raw_html)
            .map(Some)
            .ok_or_else(|| Error::Scraping("No \"_id\" found in page".to_string()))
    }

    fn comments_request(&self, article_id: &str) -> Option<CommentsRequest> {
        Some(CommentsRequest {
            url: self.comments_url(article_id),
            items_field: "body",
        })
    }

    async fn list_articles(&self, client: &HttpClient, query: &str, pages: usize) -> Vec<ArticleReference> {
        let logger = Logger::new().with_prefix(self.source_metadata().emoji);
        let mut references = Vec::new();

        for page in 0..pages {
            let url = self.search_url(query, page);
            match client.get_json(&url, client.timeout()).await {
                Ok(data) => {
                    let rows = self.parse_search_page(&data);
                    logger.debug(&format!("Offset {} listed {} articles", search_offset(page), rows.len()));
                    references.extend(rows);
                }
                Err(e) => {
                    logger.warn(&format!("Listing stopped at page {}: {}", page, e));
                    break;
                }
            }
        }

        logger.info(&format!("Listed {} articles", references.len()));
        references
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_offset() {
        assert_eq!(search_offset(0), "0");
        assert_eq!(search_offset(1), "10");
        assert_eq!(search_offset(3), "30");
        assert_eq!(search_offset(12), "120");
    }

    #[test]
    fn test_search_url() {
        let scraper = ElEspectadorScraper::default();
        assert_eq!(
            scraper.search_url("migrante-venezolano", 3),
            "https://www.elespectador.com/pf/api/v3/content/fetch/searcherTag?query=%7B%22author%22%3Anull%2C%22date%22%3Anull%2C%22from%22%3A30%2C%22keyword%22%3A%22migrante-venezolano%22%2C%22section%22%3A%5B%22%2Fcolombia%22%5D%2C%22subtype%22%3A%5B%22Art%C3%ADculos%22%5D%7D&d=937&_website=el-espectador"
        );
    }

    #[test]
    fn test_comments_url() {
        let scraper = ElEspectadorScraper::default();
        assert_eq!(
            scraper.comments_url("ABC123XYZ"),
            "https://www.elespectador.com/pf/api/v3/content/fetch/comments?query=%7B%22articleId%22%3A%22ABC123XYZ%22%7D&d=937&_website=el-espectador"
        );
        assert_eq!(scraper.comments_request("ABC123XYZ").unwrap().items_field, "body");
    }

    #[test]
    fn test_find_article_id() {
        let html = r#"<script>window.Fusion={"globalContent":{"_id":"ABC123XYZ","type":"story"}}</script>"#;
        assert_eq!(find_article_id(html).as_deref(), Some("ABC123XYZ"));
        assert_eq!(find_article_id(r#"{"_id":"lowercase1"}"#), None);
        assert_eq!(find_article_id("<html></html>"), None);
    }

    #[test]
    fn test_resolve_article_id_reports_missing_id() {
        let scraper = ElEspectadorScraper::default();
        let html = "<html><body>sin id</body></html>";
        let document = Html::parse_document(html);
        assert!(matches!(scraper.resolve_article_id(&document, html), Err(Error::Scraping(_))));
    }

    #[test]
    fn test_extract_body_from_news_article_block() {
        let scraper = ElEspectadorScraper::default();
        let html = r#"<html><head>
            <script type="application/ld+json">{"@type":"WebSite","name":"El Espectador"}</script>
            <script type="application/ld+json">{"@type":"NewsArticle","articleBody":"X"}</script>
            </head></html>"#;
        assert_eq!(scraper.extract_body(&Html::parse_document(html)).as_deref(), Some("X"));

        let without_body = r#"<html><head><script type="application/ld+json">{"@type":"NewsArticle","headline":"h"}</script></head></html>"#;
        assert_eq!(scraper.extract_body(&Html::parse_document(without_body)), None);

        let empty_body = r#"<html><head><script type="application/ld+json">{"@type":"NewsArticle","articleBody":""}</script></head></html>"#;
        assert_eq!(scraper.extract_body(&Html::parse_document(empty_body)), None);
    }

    #[test]
    fn test_parse_search_page_defaults() {
        let scraper = ElEspectadorScraper::default();
        let data = json!({
            "content_elements": [
                {
                    "headlines": {"basic": "Migrantes venezolanos en Bogotá"},
                    "display_date": "2024-07-19T21:30:00.000Z",
                    "canonical_url": "/bogota/migrantes-venezolanos/"
                },
                {"headlines": {}}
            ]
        });
        let references = scraper.parse_search_page(&data);
        assert_eq!(references.len(), 2);
        assert_eq!(references[0].url, "https://www.elespectador.com/bogota/migrantes-venezolanos/");
        assert_eq!(references[0].title, "Migrantes venezolanos en Bogotá");
        assert_eq!(references[0].source_domain, "elespectador.com");
        assert_eq!(references[1].publication_date, "No Date");
        assert_eq!(references[1].url, "https://www.elespectador.comnot found");
        assert!(scraper.parse_search_page(&json!({})).is_empty());
    }
}
