use clap::{Args, Subcommand};
use nd_core::{DigestConfig, Error, Result};
use crate::collector::FeedCollector;

#[derive(Args, Debug, Clone)]
pub struct FeedArgs {
    #[command(subcommand)]
    pub command: FeedCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum FeedCommands {
    /// List configured categories and their feeds
    List,
    /// Fetch articles without classifying them
    Fetch {
        /// Only fetch this category
        category: Option<String>,
        /// Print articles as JSON
        #[arg(long)]
        json: bool,
    },
}

pub async fn handle_command(args: FeedArgs, config: &DigestConfig, collector: &FeedCollector) -> Result<()> {
    match args.command {
        FeedCommands::List => {
            for category in &config.categories {
                println!("{}", category.name);
                for feed in &category.feeds {
                    println!("  {}", feed);
                }
            }
        }
        FeedCommands::Fetch { category, json } => {
            let articles = match category {
                Some(name) => {
                    let category = config
                        .categories
                        .iter()
                        .find(|c| c.name.eq_ignore_ascii_case(&name))
                        .ok_or_else(|| Error::Config(format!("unknown category: {}", name)))?;
                    collector.collect_category(category).await
                }
                None => collector.collect(&config.categories).await,
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&articles)?);
            } else {
                for article in &articles {
                    println!("[{}] {} ({}) - {}", article.feed_category, article.title, article.source, article.link);
                }
            }
        }
    }
    Ok(())
}
