use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{Html, Selector};
use vm_core::{ArticleReference, Error, Result, ScraperConfig};

use super::REGION;
use crate::http::HttpClient;
use crate::logging::Logger;
use crate::scrapers::utils::{absolute_url, child_text};
use crate::scrapers::{jsonld, CommentsRequest, Scraper, SourceMetadata};

const DOMAIN: &str = "eltiempo.com";

/// Viafoura section that holds El Tiempo's comment containers.
const VIAFOURA_SECTION: &str = "00000000-0000-4000-8000-9c5d48314ca1";

/// "See also" call-outs inserted between paragraphs.
const SEE_ALSO_PHRASES: [&str; 7] = [
    "Lea además",
    "Siga leyendo",
    "Le recomendamos",
    "Además",
    "Puede leer",
    "Lea también",
    "Le puede interesar",
];

lazy_static! {
    static ref SEE_ALSO: Vec<Regex> = SEE_ALSO_PHRASES
        .iter()
        .map(|phrase| Regex::new(&format!(r"(?i)\({}:[^)]*\)", regex::escape(phrase))).expect("valid see-also pattern"))
        .collect();
    static ref ARTICLE_NUMBER: Regex = Regex::new(r"article-(\d+)").expect("valid article number pattern");
    static ref TAGS_ARTICLE: Regex =
        Regex::new(r"let tagsArticle\s*=\s*'([^']*)'").expect("valid tags pattern");
    static ref PARAGRAPH: Selector = Selector::parse("div.paragraph").expect("valid selector");
    static ref SCRIPT: Selector = Selector::parse("script").expect("valid selector");
    static ref LISTING_ARTICLE: Selector = Selector::parse("article.c-article").expect("valid selector");
    static ref LISTING_TITLE: Selector = Selector::parse("h3.c-article__title").expect("valid selector");
    static ref LISTING_LINK: Selector = Selector::parse("a.page-link").expect("valid selector");
    static ref LISTING_DATE: Selector = Selector::parse("time.c-article__date").expect("valid selector");
}

/// True for paragraphs that are only a parenthesised "see also" link.
pub fn is_see_also(paragraph: &str) -> bool {
    SEE_ALSO.iter().any(|pattern| pattern.is_match(paragraph))
}

#[derive(Debug, Clone)]
pub struct ElTiempoScraper {
    base_url: String,
    comments_base_url: String,
    trailing_paragraphs_dropped: usize,
    search_from: String,
    search_until: String,
}

impl ElTiempoScraper {
    pub fn new(config: &ScraperConfig) -> Self {
        Self {
            base_url: config.endpoints.el_tiempo.trim_end_matches('/').to_string(),
            comments_base_url: config.endpoints.el_tiempo_comments.trim_end_matches('/').to_string(),
            trailing_paragraphs_dropped: config.trailing_paragraphs_dropped,
            search_from: config.listing.el_tiempo_from.clone(),
            search_until: config.listing.el_tiempo_until.clone(),
        }
    }

    pub fn listing_url(&self, query: &str, page: usize) -> String {
        format!(
            "{}/buscar/?q={}&sort_field=_score&articleTypes=default,gallery,especial_modular,especial-tipo-d,video_detail,play_video_detail&categories_ids_or=&from={}&until={}&page={}",
            self.base_url,
            urlencoding::encode(query),
            self.search_from,
            self.search_until,
            page
        )
    }

    pub fn comments_url(&self, article_id: &str) -> String {
        format!(
            "{}/{}?limit=100&container_id={}&reply_limit=4&sorted_by=newest",
            self.comments_base_url, VIAFOURA_SECTION, article_id
        )
    }

    /// Title, date and URL of every result card on one search page. Cards
    /// missing any of the three are skipped.
    pub fn parse_listing(&self, html: &str) -> Vec<ArticleReference> {
        let document = Html::parse_document(html);
        document
            .select(&LISTING_ARTICLE)
            .filter_map(|card| {
                let title = child_text(&card, &LISTING_TITLE)?;
                let href = card.select(&LISTING_LINK).next()?.value().attr("href")?;
                let date = child_text(&card, &LISTING_DATE)?;
                Some(ArticleReference::new(
                    absolute_url(&self.base_url, href),
                    title,
                    date,
                    DOMAIN,
                ))
            })
            .collect()
    }
}

impl Default for ElTiempoScraper {
    fn default() -> Self {
        Self::new(&ScraperConfig::default())
    }
}

#[async_trait]
impl Scraper for ElTiempoScraper {
    fn source_metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: "El Tiempo",
            emoji: "⏳",
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
        vec!["eltiempo", "el-tiempo"]
    }

    /// Joins the `div.paragraph` blocks, leaving out "see also" call-outs
    /// and the trailing footer paragraphs.
    fn extract_body(&self, document: &Html) -> Option<String> {
        let paragraphs: Vec<String> = document
            .select(&PARAGRAPH)
            .map(|div| div.text().collect::<String>().trim().to_string())
            .filter(|text| !is_see_also(text))
            .collect();

        let keep = paragraphs.len().saturating_sub(self.trailing_paragraphs_dropped);
        let body = paragraphs[..keep].join("\n");
        if body.trim().is_empty() {
            None
        } else {
            Some(body)
        }
    }

    /// Number in the first JSON-LD block's `@id` (`...#article-3356789`).
    fn resolve_article_id(&self, document: &Html, _raw_html: &str) -> Result<Option<String>> {
        let block = jsonld::first_block(document)
            .ok_or_else(|| Error::Scraping("No JSON-LD script in page".to_string()))??;
        let id = block.get("@id").and_then(|v| v.as_str()).unwrap_or_default();
        ARTICLE_NUMBER
            .captures(id)
            .and_then(|caps| caps.get(1))
            .map(|m| Some(m.as_str().to_string()))
            .ok_or_else(|| Error::Scraping(format!("No article number in @id {:?}", id)))
    }

    fn comments_request(&self, article_id: &str) -> Option<CommentsRequest> {
        Some(CommentsRequest {
            url: self.comments_url(article_id),
            items_field: "contents",
        })
    }

    fn extract_tags(&self, document: &Html) -> Option<Vec<String>> {
        document.select(&SCRIPT).find_map(|script| {
            let code = script.text().collect::<String>();
            TAGS_ARTICLE
                .captures(&code)
                .and_then(|caps| caps.get(1))
                .map(|tags| tags.as_str().split(',').map(str::to_string).collect())
        })
    }

    async fn list_articles(&self, client: &HttpClient, query: &str, pages: usize) -> Vec<ArticleReference> {
        let logger = Logger::new().with_prefix(self.source_metadata().emoji);
        let mut references = Vec::new();

        for page in 0..pages {
            let url = self.listing_url(query, page);
            match client.get_text(&url, client.timeout()).await {
                Ok(html) => {
                    let rows = self.parse_listing(&html);
                    logger.debug(&format!("Page {} listed {} articles", page, rows.len()));
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
