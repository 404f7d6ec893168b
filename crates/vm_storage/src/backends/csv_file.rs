use std::fs::File;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::{debug, info};
use vm_core::{ArticleContent, ArticleRecord, ArticleReference, ArticleStorage, Error, Result};

const RECORD_HEADER: [&str; 8] = [
    "title",
    "date",
    "url",
    "domain",
    "content",
    "comment_count",
    "comments",
    "tags",
];

fn csv_error(e: ::csv::Error) -> Error {
    Error::Storage(format!("CSV error: {}", e))
}

/// On-disk row layout. `comments` and `tags` hold JSON arrays; an empty cell
/// means the field was never extracted.
#[derive(Debug, Serialize, Deserialize)]
struct RecordRow {
    title: String,
    date: String,
    url: String,
    domain: String,
    content: String,
    comment_count: usize,
    comments: String,
    tags: String,
}

impl RecordRow {
    fn from_record(record: &ArticleRecord) -> Result<Self> {
        Ok(Self {
            title: record.reference.title.clone(),
            date: record.reference.publication_date.clone(),
            url: record.reference.url.clone(),
            domain: record.reference.source_domain.clone(),
            content: record.content.body_text.clone().unwrap_or_default(),
            comment_count: record.content.comment_count(),
            comments: encode_list(record.content.comments.as_deref())?,
            tags: encode_list(record.content.tags.as_deref())?,
        })
    }

    fn into_record(self) -> Result<ArticleRecord> {
        Ok(ArticleRecord {
            reference: ArticleReference::new(self.url, self.title, self.date, self.domain),
            content: ArticleContent {
                body_text: Some(self.content).filter(|c| !c.is_empty()),
                comments: decode_list(&self.comments)?,
                tags: decode_list(&self.tags)?,
            },
        })
    }
}

fn encode_list(items: Option<&[String]>) -> Result<String> {
    match items {
        Some(items) => Ok(serde_json::to_string(items)?),
        None => Ok(String::new()),
    }
}

fn decode_list(cell: &str) -> Result<Option<Vec<String>>> {
    if cell.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(cell)?))
}

/// Reads every record from a CSV file written by [`CsvStorage`].
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<ArticleRecord>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = ::csv::Reader::from_path(path).map_err(csv_error)?;
    let mut records = Vec::new();
    for row in reader.deserialize::<RecordRow>() {
        records.push(row.map_err(csv_error)?.into_record()?);
    }
    Ok(records)
}

/// Writes a fresh copy of `path` through `write` into a temp file in the same
/// directory and renames it into place. On error the old file is untouched.
fn replace_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut ::csv::Writer<&mut File>) -> Result<()>,
{
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = ::csv::Writer::from_writer(tmp.as_file_mut());
        write(&mut writer)?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

fn write_records(path: &Path, records: &[ArticleRecord]) -> Result<()> {
    replace_file(path, |writer| {
        if records.is_empty() {
            writer.write_record(RECORD_HEADER).map_err(csv_error)?;
        }
        for record in records {
            writer.serialize(RecordRow::from_record(record)?).map_err(csv_error)?;
        }
        Ok(())
    })
}

/// Writes listing results as `url,title,date,domain` rows.
pub fn write_references(path: impl AsRef<Path>, references: &[ArticleReference]) -> Result<()> {
    let path = path.as_ref();
    replace_file(path, |writer| {
        writer
            .write_record(["url", "title", "date", "domain"])
            .map_err(csv_error)?;
        for reference in references {
            writer
                .write_record([
                    reference.url.as_str(),
                    reference.title.as_str(),
                    reference.publication_date.as_str(),
                    reference.source_domain.as_str(),
                ])
                .map_err(csv_error)?;
        }
        Ok(())
    })?;
    info!("💾 Wrote {} references to {}", references.len(), path.display());
    Ok(())
}

/// Keeps every record in a single CSV file, replaced on each store so a URL
/// appears at most once.
pub struct CsvStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CsvStorage {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        if !path.exists() {
            write_records(&path, &[])?;
        }
        debug!("Opened CSV storage at {}", path.display());
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ArticleStorage for CsvStorage {
    async fn store_article(&self, record: &ArticleRecord) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut records = read_records(&self.path)?;
        if let Some(existing) = records.iter_mut().find(|r| r.url() == record.url()) {
            *existing = record.clone();
        } else {
            records.push(record.clone());
        }
        write_records(&self.path, &records)
    }

    async fn get_by_source(&self, source: &str) -> Result<Vec<ArticleRecord>> {
        let _guard = self.lock.lock().await;
        Ok(read_records(&self.path)?
            .into_iter()
            .filter(|record| record.source() == source)
            .collect())
    }

    async fn all_articles(&self) -> Result<Vec<ArticleRecord>> {
        let _guard = self.lock.lock().await;
        read_records(&self.path)
    }
}
