//! Shared fetch → parse → gate → comments skeleton used by every outlet.
//!
//! Outlets only supply the parsing plug-ins of [`Scraper`]; the HTTP calls,
//! the keyword gate and the conversion of failures into `None` fields all
//! live here.

use std::time::Duration;

use scraper::Html;
use serde_json::Value;
use vm_core::{ArticleContent, KeywordSet};

use crate::http::HttpClient;
use crate::logging::Logger;
use crate::scrapers::{CommentsRequest, Scraper};

/// What survives parsing and the keyword gate, before any further request.
#[derive(Debug)]
struct ParsedPage {
    body: String,
    comments: Option<CommentsRequest>,
    tags: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    client: HttpClient,
    keywords: KeywordSet,
}

impl Pipeline {
    pub fn new(client: HttpClient, keywords: KeywordSet) -> Self {
        Self { client, keywords }
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    /// Extracts body, comments and tags of the article at `url`.
    ///
    /// Never fails: transport errors, timeouts and non-2xx statuses give an
    /// empty [`ArticleContent`]; a body without any keyword gives an empty
    /// one as well. Comments and tags are only filled for bodies that pass
    /// the keyword gate.
    pub async fn extract(&self, scraper: &dyn Scraper, url: &str, timeout: Duration) -> ArticleContent {
        let logger = Logger::new().with_prefix(scraper.source_metadata().emoji);

        let html = match self.client.get_text(url, timeout).await {
            Ok(html) => html,
            Err(e) => {
                logger.error(&format!("Failed to fetch {}: {}", url, e));
                return ArticleContent::empty();
            }
        };

        let Some(page) = parse_page(scraper, &html, &self.keywords, &logger) else {
            return ArticleContent::empty();
        };

        let comments = match page.comments {
            Some(request) => self.fetch_comments(&request, timeout, &logger).await,
            None => None,
        };

        logger.info(&format!(
            "Extracted {} ({} chars, {} comments, {} tags)",
            url,
            page.body.chars().count(),
            comments.as_ref().map_or(0, Vec::len),
            page.tags.as_ref().map_or(0, Vec::len)
        ));

        ArticleContent {
            body_text: Some(page.body),
            comments,
            tags: page.tags,
        }
    }

    /// Single request to a comments API. Every failure gives `None`; an API
    /// answering without comments gives an empty list.
    async fn fetch_comments(&self, request: &CommentsRequest, timeout: Duration, logger: &Logger) -> Option<Vec<String>> {
        match self.client.get_json(&request.url, timeout).await {
            Ok(data) => Some(comment_bodies(&data, request.items_field)),
            Err(e) => {
                logger.warn(&format!("Failed to fetch comments from {}: {}", request.url, e));
                None
            }
        }
    }
}

/// Parses the page and applies the keyword gate. Kept synchronous so the
/// parsed document never lives across an await point.
fn parse_page(scraper: &dyn Scraper, html: &str, keywords: &KeywordSet, logger: &Logger) -> Option<ParsedPage> {
    let document = Html::parse_document(html);

    let Some(body) = scraper.extract_body(&document) else {
        logger.warn("No article body found");
        return None;
    };
    if !keywords.contains_keyword(&body) {
        logger.debug("Article body has none of the keywords, discarding");
        return None;
    }

    let comments = match scraper.resolve_article_id(&document, html) {
        Ok(Some(id)) => scraper.comments_request(&id),
        Ok(None) => None,
        Err(e) => {
            logger.warn(&format!("Could not resolve article id: {}", e));
            None
        }
    };

    let tags = scraper.extract_tags(&document);

    Some(ParsedPage { body, comments, tags })
}

/// `content` of every item in `data[items_field]`. Items without a string
/// `content` are skipped.
pub fn comment_bodies(data: &Value, items_field: &str) -> Vec<String> {
    data.get(items_field)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("content").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
