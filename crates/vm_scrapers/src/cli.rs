use std::path::PathBuf;

use clap::{Args, Subcommand};
use vm_core::{ArticleRecord, Result};
use vm_storage::write_references;

use crate::manager::ScraperManager;
use crate::scrapers::ArticleStatus;

#[derive(Debug, Args)]
pub struct ScraperArgs {
    #[command(subcommand)]
    pub command: ScraperCommands,
}

#[derive(Debug, Subcommand)]
pub enum ScraperCommands {
    /// List available scrapers
    List,
    /// List and scrape articles from a source
    Source {
        /// Region or region/outlet (e.g. colombia or colombia/eltiempo)
        source: String,
        /// Search query, defaults to the configured listing query
        #[arg(long)]
        query: Option<String>,
        /// Number of listing pages to walk
        #[arg(long)]
        pages: Option<usize>,
        /// Also write the listed references to this CSV file
        #[arg(long)]
        references: Option<PathBuf>,
        /// Only list the references, do not scrape them
        #[arg(long)]
        list_only: bool,
    },
    /// Scrape a single article URL
    Url {
        url: String,
    },
}

pub async fn handle_command(args: ScraperArgs, manager: &ScraperManager) -> Result<()> {
    match args.command {
        ScraperCommands::List => {
            for (region, scrapers) in manager.list_scrapers() {
                println!("{}:", region);
                for (name, meta) in scrapers {
                    println!("  {} {}/{} ({})", meta.emoji, region, name, meta.name);
                }
            }
        }
        ScraperCommands::Source {
            source,
            query,
            pages,
            references,
            list_only,
        } => {
            let listed = manager.list_source(&source, query.as_deref(), pages).await?;
            println!("Found {} articles", listed.len());

            if let Some(path) = references {
                write_references(&path, &listed)?;
                println!("References written to {}", path.display());
            }
            if list_only {
                return Ok(());
            }

            for (record, status) in manager.scrape_references(&listed).await {
                print_record(&record, status);
            }
        }
        ScraperCommands::Url { url } => {
            let (record, status) = manager.scrape_url(&url).await?;
            print_record(&record, status);
        }
    }
    Ok(())
}

pub fn status_emoji(status: ArticleStatus) -> &'static str {
    match status {
        ArticleStatus::New => "🆕",
        ArticleStatus::Updated => "📝",
        ArticleStatus::Unchanged => "⏭️",
    }
}

fn print_record(record: &ArticleRecord, status: ArticleStatus) {
    let kept = if record.content.body_text.is_some() { "✅" } else { "➖" };
    println!(
        "{} {} {} - {} ({} comments)",
        status_emoji(status),
        kept,
        record.reference.title,
        record.url(),
        record.content.comment_count()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        args: ScraperArgs,
    }

    #[test]
    fn test_parse_source_command() {
        let cli = TestCli::parse_from(["vmig", "source", "colombia/elespectador", "--pages", "3", "--list-only"]);
        match cli.args.command {
            ScraperCommands::Source {
                source,
                pages,
                query,
                list_only,
                ..
            } => {
                assert_eq!(source, "colombia/elespectador");
                assert_eq!(pages, Some(3));
                assert_eq!(query, None);
                assert!(list_only);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_status_emoji() {
        assert_eq!(status_emoji(ArticleStatus::New), "🆕");
        assert_eq!(status_emoji(ArticleStatus::Unchanged), "⏭️");
    }
}
