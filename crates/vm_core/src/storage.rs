use async_trait::async_trait;
use crate::types::ArticleRecord;
use crate::Result;

#[async_trait]
pub trait ArticleStorage: Send + Sync {
    /// Store a scraped record, replacing any earlier record for the same URL
    async fn store_article(&self, record: &ArticleRecord) -> Result<()>;

    /// Get all records whose source domain matches `source`
    async fn get_by_source(&self, source: &str) -> Result<Vec<ArticleRecord>>;

    /// Get every stored record
    async fn all_articles(&self) -> Result<Vec<ArticleRecord>>;
}
