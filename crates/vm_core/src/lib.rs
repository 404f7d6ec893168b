pub mod config;
pub mod error;
pub mod keywords;
pub mod storage;
pub mod types;

pub use config::{Endpoints, ListingConfig, ScraperConfig};
pub use error::Error;
pub use keywords::KeywordSet;
pub use storage::ArticleStorage;
pub use types::{ArticleContent, ArticleRecord, ArticleReference};

pub type Result<T> = std::result::Result<T, Error>;
