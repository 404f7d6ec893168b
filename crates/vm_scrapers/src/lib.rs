pub mod cli;
pub mod http;
pub mod logging;
pub mod manager;
pub mod scrapers;

pub use cli::{handle_command, ScraperArgs, ScraperCommands};
pub use http::HttpClient;
pub use logging::{init_logging, Logger};
pub use manager::ScraperManager;
pub use scrapers::gdelt::DiscoveryQuery;
pub use scrapers::pipeline::Pipeline;
pub use scrapers::{ArticleStatus, Scraper, ScraperType};

pub mod prelude {
    pub use super::manager::ScraperManager;
    pub use super::scrapers::{ArticleStatus, Scraper, ScraperType};
    pub use vm_core::{ArticleContent, ArticleRecord, ArticleReference, Error, Result};
}
