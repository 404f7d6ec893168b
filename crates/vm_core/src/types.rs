use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use url::Url;

/// A candidate article found by a listing or a discovery search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleReference {
    pub url: String,
    pub title: String,
    /// Publication date exactly as the source rendered it.
    pub publication_date: String,
    pub source_domain: String,
}

impl ArticleReference {
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        publication_date: impl Into<String>,
        source_domain: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            publication_date: publication_date.into(),
            source_domain: source_domain.into(),
        }
    }

    /// Reference for a bare URL, with the domain taken from its host.
    pub fn from_url(url: &str) -> crate::Result<Self> {
        let parsed = Url::parse(url)?;
        let host = parsed
            .host_str()
            .ok_or_else(|| crate::Error::InvalidUrl(format!("{} has no host", url)))?;
        let domain = host.strip_prefix("www.").unwrap_or(host);
        Ok(Self::new(url, "", "", domain))
    }

    /// Calendar date of `publication_date`, if it is in one of the formats
    /// the sources use.
    pub fn published_on(&self) -> Option<NaiveDate> {
        parse_publication_date(&self.publication_date)
    }
}

const SPANISH_MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Parses RFC 3339 timestamps, GDELT `seendate` values (`20240115T120000Z`),
/// ISO dates and El Tiempo's Spanish text dates (`"19 julio de 2024"`,
/// day, month name and year at tokens 0, 1 and 3).
pub fn parse_publication_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y%m%dT%H%M%SZ") {
        return Some(dt.date());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    parse_spanish_date(raw)
}

fn parse_spanish_date(raw: &str) -> Option<NaiveDate> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    if tokens.len() < 4 {
        return None;
    }
    let day = tokens[0].trim_end_matches(',').parse::<u32>().ok()?;
    let month_name = tokens[1].trim_end_matches(',').to_lowercase();
    let month = SPANISH_MONTHS.iter().position(|m| *m == month_name)? as u32 + 1;
    let year = tokens[3].trim_end_matches(',').parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// What the extractor recovered from one article page. Each field is
/// independently optional: `None` means extraction failed or the keyword
/// filter rejected the article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleContent {
    pub body_text: Option<String>,
    pub comments: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

impl ArticleContent {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.body_text.is_none() && self.comments.is_none() && self.tags.is_none()
    }

    pub fn comment_count(&self) -> usize {
        self.comments.as_ref().map_or(0, Vec::len)
    }
}

/// One row of scraped output: where the article came from and what was
/// extracted from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub reference: ArticleReference,
    pub content: ArticleContent,
}

impl ArticleRecord {
    pub fn new(reference: ArticleReference, content: ArticleContent) -> Self {
        Self { reference, content }
    }

    pub fn url(&self) -> &str {
        &self.reference.url
    }

    pub fn source(&self) -> &str {
        &self.reference.source_domain
    }
}
