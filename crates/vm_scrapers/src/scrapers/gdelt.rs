//! Article discovery through the GDELT DOC 2.0 article list API.

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;
use vm_core::{ArticleReference, Result};

use crate::http::HttpClient;

pub const DEFAULT_DISCOVERY_KEYWORD: &str = "Venezuela";
pub const DEFAULT_SOURCE_COUNTRY: &str = "CO";
const MAX_RECORDS: usize = 250;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryQuery {
    pub keyword: String,
    pub domain: String,
    pub country: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DiscoveryQuery {
    pub fn new(domain: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            keyword: DEFAULT_DISCOVERY_KEYWORD.to_string(),
            domain: domain.into(),
            country: DEFAULT_SOURCE_COUNTRY.to_string(),
            start,
            end,
        }
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }
}

#[derive(Debug, Default, Deserialize)]
struct ArticleList {
    #[serde(default)]
    articles: Vec<GdeltArticle>,
}

#[derive(Debug, Deserialize)]
struct GdeltArticle {
    #[serde(default)]
    url: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    seendate: String,
    #[serde(default)]
    domain: String,
}

impl From<GdeltArticle> for ArticleReference {
    fn from(article: GdeltArticle) -> Self {
        ArticleReference::new(article.url, article.title, article.seendate, article.domain)
    }
}

pub fn discovery_url(endpoint: &str, query: &DiscoveryQuery) -> String {
    format!(
        "{}?query={}%20domainis:{}%20sourcecountry:{}&mode=artlist&format=json&maxrecords={}&startdatetime={}000000&enddatetime={}000000",
        endpoint,
        urlencoding::encode(&query.keyword),
        query.domain,
        query.country,
        MAX_RECORDS,
        query.start.format("%Y%m%d"),
        query.end.format("%Y%m%d")
    )
}

/// References GDELT has seen for `query.domain` in the date window.
/// An empty response body means no matches.
pub async fn discover(client: &HttpClient, endpoint: &str, query: &DiscoveryQuery) -> Result<Vec<ArticleReference>> {
    let url = discovery_url(endpoint, query);
    let body = client.get_text(&url, client.timeout()).await?;
    let list: ArticleList = if body.trim().is_empty() {
        ArticleList::default()
    } else {
        serde_json::from_str(body.trim())?
    };

    let references: Vec<ArticleReference> = list.articles.into_iter().map(ArticleReference::from).collect();
    info!("GDELT returned {} articles for {}", references.len(), query.domain);
    Ok(references)
}
