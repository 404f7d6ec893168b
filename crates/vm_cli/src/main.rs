use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::info;
use vm_core::{ArticleStorage, Result, ScraperConfig};
use vm_scrapers::cli::{handle_command, status_emoji, ScraperArgs};
use vm_scrapers::scrapers::gdelt::DEFAULT_SOURCE_COUNTRY;
use vm_scrapers::{init_logging, DiscoveryQuery, ScraperManager};
use vm_storage::{read_records, top_tags, write_references, RecordFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Venezuelan migration coverage scraper for Colombian outlets", long_about = None)]
pub struct Cli {
    /// JSON configuration file; defaults apply when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Storage backend for scraped records (memory or csv)
    #[arg(long, global = true, default_value = "memory")]
    storage: String,
    /// CSV file for scraped records when --storage csv is used
    #[arg(long, global = true)]
    output: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List sources, or list and scrape their articles
    Scrape(ScraperArgs),
    /// Find candidate articles of an outlet through GDELT
    Discover {
        /// Outlet domain, e.g. vanguardia.com
        domain: String,
        /// First day of the window (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,
        /// Last day of the window (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,
        #[arg(long, default_value = DEFAULT_SOURCE_COUNTRY)]
        country: String,
        /// Write the discovered references to this CSV file
        #[arg(long)]
        references: Option<PathBuf>,
        /// Scrape every discovered article
        #[arg(long)]
        scrape: bool,
    },
    /// Filter a scraped records CSV
    Query {
        csv: PathBuf,
        #[arg(long)]
        since: Option<NaiveDate>,
        #[arg(long)]
        until: Option<NaiveDate>,
        /// Case-insensitive title keyword
        #[arg(long)]
        keyword: Option<String>,
        /// Print the N most frequent tags instead of the records
        #[arg(long)]
        top_tags: Option<usize>,
    },
}

fn load_config(path: Option<&Path>) -> Result<ScraperConfig> {
    match path {
        Some(path) => {
            info!("⚙️ Loading configuration from {}", path.display());
            ScraperConfig::from_file(path)
        }
        None => Ok(ScraperConfig::default()),
    }
}

async fn build_manager(config: Option<&Path>, storage: &str, output: Option<&Path>) -> Result<ScraperManager> {
    let config = load_config(config)?;
    let backend: Arc<dyn ArticleStorage> = vm_storage::create_storage(storage, output).await?;
    info!("💾 Storage initialized (using {})", storage);

    let manager = ScraperManager::new(backend, config)?;
    let names: Vec<&str> = manager.get_scrapers().iter().map(|s| s.source_metadata().name).collect();
    info!("🦗 Scrapers initialized: {}", names.join(", "));
    Ok(manager)
}

fn run_query(csv: &Path, filter: RecordFilter, top: Option<usize>) -> Result<()> {
    let records = read_records(csv)?;
    let selected = filter.apply(&records);
    info!("🔎 {} of {} records match", selected.len(), records.len());

    if let Some(n) = top {
        for (tag, count) in top_tags(selected, n) {
            println!("{:>5}  {}", count, tag);
        }
        return Ok(());
    }

    for record in selected {
        println!(
            "{} | {} | {} | {} comments",
            record.reference.publication_date,
            record.reference.title,
            record.url(),
            record.content.comment_count()
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let Cli {
        config,
        storage,
        output,
        command,
    } = Cli::parse();

    match command {
        Commands::Scrape(args) => {
            let manager = build_manager(config.as_deref(), &storage, output.as_deref()).await?;
            handle_command(args, &manager).await?;
        }
        Commands::Discover {
            domain,
            start,
            end,
            country,
            references,
            scrape,
        } => {
            let manager = build_manager(config.as_deref(), &storage, output.as_deref()).await?;
            let query = DiscoveryQuery::new(domain, start, end).with_country(country);
            let found = manager.discover(&query).await?;
            println!("Discovered {} articles", found.len());

            match references {
                Some(path) => {
                    write_references(&path, &found)?;
                    println!("References written to {}", path.display());
                }
                None if !scrape => {
                    for reference in &found {
                        println!("{} | {} | {}", reference.publication_date, reference.title, reference.url);
                    }
                }
                None => {}
            }

            if scrape {
                for (record, status) in manager.scrape_references(&found).await {
                    println!("{} {} - {}", status_emoji(status), record.reference.title, record.url());
                }
            }
        }
        Commands::Query {
            csv,
            since,
            until,
            keyword,
            top_tags,
        } => {
            let filter = RecordFilter {
                since,
                until,
                title_keyword: keyword,
            };
            run_query(&csv, filter, top_tags)?;
        }
    }

    Ok(())
}
