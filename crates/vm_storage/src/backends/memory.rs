use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use vm_core::{ArticleRecord, ArticleStorage, Result};

#[derive(Default)]
pub struct MemoryStore {
    records: Vec<ArticleRecord>,
}

impl MemoryStore {
    pub fn store_article(&mut self, record: &ArticleRecord) {
        if let Some(existing) = self.records.iter_mut().find(|r| r.url() == record.url()) {
            *existing = record.clone();
        } else {
            self.records.push(record.clone());
        }
    }

    pub fn get_by_source(&self, source: &str) -> Vec<ArticleRecord> {
        self.records
            .iter()
            .filter(|record| record.source() == source)
            .cloned()
            .collect()
    }
}

#[derive(Default, Clone)]
pub struct MemoryStorage {
    store: Arc<RwLock<MemoryStore>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ArticleStorage for MemoryStorage {
    async fn store_article(&self, record: &ArticleRecord) -> Result<()> {
        self.store.write().await.store_article(record);
        Ok(())
    }

    async fn get_by_source(&self, source: &str) -> Result<Vec<ArticleRecord>> {
        Ok(self.store.read().await.get_by_source(source))
    }

    async fn all_articles(&self) -> Result<Vec<ArticleRecord>> {
        Ok(self.store.read().await.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vm_core::{ArticleContent, ArticleReference};

    fn record(url: &str, domain: &str, body: &str) -> ArticleRecord {
        ArticleRecord::new(
            ArticleReference::new(url, "Título", "2024-07-19", domain),
            ArticleContent {
                body_text: Some(body.to_string()),
                comments: None,
                tags: None,
            },
        )
    }

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = MemoryStorage::new();
        storage.store_article(&record("https://www.eltiempo.com/a", "eltiempo.com", "uno")).await.unwrap();
        storage.store_article(&record("https://www.elespectador.com/b", "elespectador.com", "dos")).await.unwrap();

        let tiempo = storage.get_by_source("eltiempo.com").await.unwrap();
        assert_eq!(tiempo.len(), 1);
        assert_eq!(tiempo[0].url(), "https://www.eltiempo.com/a");
        assert_eq!(storage.all_articles().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_store_replaces_same_url() {
        let storage = MemoryStorage::new();
        storage.store_article(&record("https://www.eltiempo.com/a", "eltiempo.com", "uno")).await.unwrap();
        storage.store_article(&record("https://www.eltiempo.com/a", "eltiempo.com", "otro")).await.unwrap();

        let all = storage.all_articles().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].content.body_text.as_deref(), Some("otro"));
    }
}
