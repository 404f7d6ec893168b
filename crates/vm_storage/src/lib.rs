use std::path::Path;
use std::sync::Arc;

use vm_core::{ArticleStorage, Error, Result};

pub mod backends;
pub mod query;

pub use backends::*;
pub use query::{top_tags, RecordFilter};

/// Builds the storage backend named on the command line.
///
/// `memory` keeps records for the lifetime of the process; `csv` needs a
/// path and persists every record to that file.
pub async fn create_storage(kind: &str, path: Option<&Path>) -> Result<Arc<dyn ArticleStorage>> {
    match kind {
        "memory" => Ok(Arc::new(MemoryStorage::new())),
        "csv" => {
            let path = path.ok_or_else(|| {
                Error::Storage("csv storage requires an output path".to_string())
            })?;
            Ok(Arc::new(CsvStorage::open(path).await?))
        }
        other => Err(Error::Storage(format!(
            "Unknown storage backend: {} (expected memory or csv)",
            other
        ))),
    }
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::query::{top_tags, RecordFilter};
}
