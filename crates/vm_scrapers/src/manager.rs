use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};
use vm_core::{ArticleContent, ArticleRecord, ArticleReference, ArticleStorage, Error, Result, ScraperConfig};

use crate::http::HttpClient;
use crate::scrapers::gdelt::{self, DiscoveryQuery};
use crate::scrapers::pipeline::Pipeline;
use crate::scrapers::{get_scrapers, ArticleStatus, ScraperType, SourceMetadata};

pub struct ScraperManager {
    storage: Arc<dyn ArticleStorage>,
    scrapers: Vec<ScraperType>,
    pipeline: Pipeline,
    config: ScraperConfig,
}

impl ScraperManager {
    pub fn new(storage: Arc<dyn ArticleStorage>, config: ScraperConfig) -> Result<Self> {
        config.validate()?;
        let client = HttpClient::new(&config)?;
        Ok(Self {
            storage,
            scrapers: get_scrapers(&config),
            pipeline: Pipeline::new(client, config.keywords.clone()),
            config,
        })
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    pub fn storage(&self) -> Arc<dyn ArticleStorage> {
        self.storage.clone()
    }

    pub fn get_scrapers(&self) -> &[ScraperType] {
        &self.scrapers
    }

    pub fn get_scraper_for_url(&self, url: &str) -> Result<&ScraperType> {
        self.scrapers
            .iter()
            .find(|s| s.can_handle(url))
            .ok_or_else(|| Error::Scraping(format!("No scraper found for URL: {}", url)))
    }

    pub fn get_scraper_for_domain(&self, domain: &str) -> Option<&ScraperType> {
        let domain = domain.trim().trim_start_matches("www.");
        self.scrapers.iter().find(|s| s.domain() == domain)
    }

    /// Scrapers named by `region` or `region/name`, e.g. `colombia` or
    /// `colombia/eltiempo`.
    pub fn get_scrapers_for_source(&self, source: &str) -> Result<Vec<&ScraperType>> {
        let (region, name) = parse_source(source)?;
        let result: Vec<&ScraperType> = self
            .scrapers
            .iter()
            .filter(|s| s.source_metadata().region.name == region)
            .filter(|s| name.map_or(true, |name| s.cli_names().contains(&name)))
            .collect();
        if result.is_empty() {
            return Err(Error::Scraping(format!("No scraper found for {}", source)));
        }
        Ok(result)
    }

    /// Available scrapers grouped by region, as `(cli name, metadata)`.
    pub fn list_scrapers(&self) -> BTreeMap<&'static str, Vec<(String, SourceMetadata)>> {
        let mut regions: BTreeMap<&'static str, Vec<(String, SourceMetadata)>> = BTreeMap::new();
        for scraper in &self.scrapers {
            let meta = scraper.source_metadata();
            let name = scraper.cli_names().first().map(|n| n.to_string()).unwrap_or_default();
            regions.entry(meta.region.name).or_default().push((name, meta));
        }
        regions
    }

    /// Extracts the article behind `reference`, dispatching on its source
    /// domain and falling back to its URL. Unknown outlets give an empty
    /// [`ArticleContent`].
    pub async fn extract(&self, reference: &ArticleReference) -> ArticleContent {
        self.extract_with_timeout(reference, self.config.timeout()).await
    }

    pub async fn extract_with_timeout(&self, reference: &ArticleReference, timeout: Duration) -> ArticleContent {
        let scraper = self
            .get_scraper_for_domain(&reference.source_domain)
            .or_else(|| self.get_scraper_for_url(&reference.url).ok());

        match scraper {
            Some(scraper) => self.pipeline.extract(scraper.as_scraper(), &reference.url, timeout).await,
            None => {
                warn!("No scraper for domain {:?} ({})", reference.source_domain, reference.url);
                ArticleContent::empty()
            }
        }
    }

    /// Extracts and stores one reference, reporting how it compares to what
    /// the storage already held for that URL.
    pub async fn scrape_reference(&self, reference: &ArticleReference) -> Result<(ArticleRecord, ArticleStatus)> {
        let content = self.extract(reference).await;
        let record = ArticleRecord::new(reference.clone(), content);

        let existing = self.storage.get_by_source(record.source()).await?;
        let status = match existing.iter().find(|r| r.url() == record.url()) {
            None => ArticleStatus::New,
            Some(previous) if previous.content == record.content => ArticleStatus::Unchanged,
            Some(_) => ArticleStatus::Updated,
        };

        if status != ArticleStatus::Unchanged {
            self.storage.store_article(&record).await?;
        }
        Ok((record, status))
    }

    pub async fn scrape_url(&self, url: &str) -> Result<(ArticleRecord, ArticleStatus)> {
        let reference = ArticleReference::from_url(url)?;
        self.scrape_reference(&reference).await
    }

    /// Scrapes every reference in order. A reference that cannot be stored
    /// is logged and skipped.
    pub async fn scrape_references(&self, references: &[ArticleReference]) -> Vec<(ArticleRecord, ArticleStatus)> {
        let mut results = Vec::with_capacity(references.len());
        for reference in references {
            match self.scrape_reference(reference).await {
                Ok(result) => results.push(result),
                Err(e) => warn!("Failed to scrape {}: {}", reference.url, e),
            }
        }
        results
    }

    /// Search listing of every scraper named by `source`. `None` query and
    /// pages fall back to the configured listing defaults.
    pub async fn list_source(
        &self,
        source: &str,
        query: Option<&str>,
        pages: Option<usize>,
    ) -> Result<Vec<ArticleReference>> {
        let query = query.unwrap_or(&self.config.listing.query);
        let pages = pages.unwrap_or(self.config.listing.pages);

        let mut references = Vec::new();
        for scraper in self.get_scrapers_for_source(source)? {
            references.extend(scraper.list_articles(self.pipeline.client(), query, pages).await);
        }
        info!("Listed {} articles for {}", references.len(), source);
        Ok(references)
    }

    pub async fn scrape_source(
        &self,
        source: &str,
        query: Option<&str>,
        pages: Option<usize>,
    ) -> Result<Vec<(ArticleRecord, ArticleStatus)>> {
        let references = self.list_source(source, query, pages).await?;
        Ok(self.scrape_references(&references).await)
    }

    pub async fn discover(&self, query: &DiscoveryQuery) -> Result<Vec<ArticleReference>> {
        gdelt::discover(self.pipeline.client(), &self.config.endpoints.gdelt, query).await
    }
}

#[async_trait]
impl ArticleStorage for ScraperManager {
    async fn store_article(&self, record: &ArticleRecord) -> Result<()> {
        self.storage.store_article(record).await
    }

    async fn get_by_source(&self, source: &str) -> Result<Vec<ArticleRecord>> {
        self.storage.get_by_source(source).await
    }

    async fn all_articles(&self) -> Result<Vec<ArticleRecord>> {
        self.storage.all_articles().await
    }
}

fn parse_source(source: &str) -> Result<(&str, Option<&str>)> {
    let parts: Vec<&str> = source.split('/').collect();
    match parts.as_slice() {
        [region] if !region.is_empty() => Ok((*region, None)),
        [region, name] if !region.is_empty() && !name.is_empty() => Ok((*region, Some(*name))),
        _ => Err(Error::Scraping(format!("Invalid source format: {}", source))),
    }
}
