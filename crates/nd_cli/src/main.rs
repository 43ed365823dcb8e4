use std::path::{Path, PathBuf};
use std::sync::Arc;
use anyhow::{bail, Context, Result};
use clap::Parser;
use nd_core::{DigestConfig, FeedSource, Mailer, Vectorizer, VectorizerSettings};
use nd_digest::{DigestPipeline, DigestRun, SmtpMailer};
use nd_feeds::cli::{handle_command, FeedArgs};
use nd_feeds::{FeedCollector, HttpFeedSource};
use tracing::info;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(author, version, about = "Personalized news digests from RSS feeds", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration
    #[arg(long, env = "ND_CONFIG", default_value = "digest.toml")]
    config: PathBuf,
    /// Log debug output
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,
    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
    /// Use the dummy vectorizer instead of the configured one (no model needed,
    /// but matching is not meaningful)
    #[arg(long)]
    offline: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Build a digest and print it, write it out or mail it
    Run {
        /// User to build the digest for (defaults to the first configured user)
        #[arg(long, conflicts_with = "all")]
        user: Option<String>,
        /// Build a digest for every configured user
        #[arg(long)]
        all: bool,
        /// Mail the digest to the user's address
        #[arg(long)]
        send: bool,
        /// Write the document here instead of stdout (a directory with --all)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List configured users and their interests
    Users,
    /// Fetch and classify articles without personalizing them
    Classify {
        #[arg(long)]
        json: bool,
    },
    Feeds(FeedArgs),
}

fn log_level(cli: &Cli) -> Level {
    if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    }
}

/// `Alex Parker` -> `alex-parker.md`
fn digest_file_name(user: &str) -> String {
    let slug = user
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    format!("{}.md", if slug.is_empty() { "digest" } else { slug.as_str() })
}

fn load_config(path: &Path, offline: bool) -> Result<DigestConfig> {
    let mut config = DigestConfig::read(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    if offline {
        config.vectorizer = VectorizerSettings::Dummy;
    }
    config
        .validate()
        .with_context(|| format!("invalid configuration in {}", path.display()))?;
    Ok(config)
}

fn write_digest(path: &Path, run: &DigestRun) -> Result<()> {
    std::fs::write(path, &run.document)
        .with_context(|| format!("failed to write digest for {} to {}", run.user, path.display()))?;
    info!("📝 Wrote digest for {} to {}", run.user, path.display());
    Ok(())
}

fn report(run: &DigestRun) {
    info!("📰 {}: {} articles in digest", run.user, run.articles.len());
    if let Some(delivery) = &run.delivery {
        info!("📮 {}: {}", run.user, delivery);
    }
}

async fn build_pipeline(config: DigestConfig, source: Arc<dyn FeedSource>) -> Result<DigestPipeline> {
    let vectorizer = nd_inference::create_vectorizer(&config.vectorizer)
        .await
        .context("failed to initialize the vectorizer")?;
    info!("🧠 Vectorizer initialized (using {})", vectorizer.name());

    let mailer = SmtpMailer::new(&config.smtp).context("failed to configure mail delivery")?;
    info!("✉️ Mail delivery initialized (using {})", mailer.name());

    Ok(DigestPipeline::new(config, source, vectorizer, Arc::new(mailer))?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt().with_max_level(log_level(&cli)).init();

    let config = load_config(&cli.config, cli.offline)?;
    info!(
        "⚙️ Loaded {} categories and {} users from {}",
        config.categories.len(),
        config.users.len(),
        cli.config.display()
    );

    let source: Arc<dyn FeedSource> = Arc::new(HttpFeedSource::new().context("failed to build the HTTP client")?);

    match cli.command {
        Commands::Users => {
            for user in &config.users {
                println!("{} <{}>: {}", user.name, user.email, user.interests.join(", "));
            }
        }
        Commands::Feeds(args) => {
            let collector = FeedCollector::with_cap(source, config.pipeline.max_articles_per_category);
            handle_command(args, &config, &collector).await?;
        }
        Commands::Classify { json } => {
            let pipeline = build_pipeline(config, source).await?;
            let groups = pipeline.prepare().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&groups)?);
            } else {
                for group in &groups {
                    println!("{}", group.category);
                    for article in &group.articles {
                        println!("  [{}] {} - {}", article.feed_category, article.title, article.link);
                    }
                }
            }
        }
        Commands::Run { user, all, send, output } => {
            let user = match (all, user) {
                (true, _) => None,
                (false, Some(user)) => Some(user),
                (false, None) => match config.users.first() {
                    Some(first) => Some(first.name.clone()),
                    None => bail!("no users configured in {}", cli.config.display()),
                },
            };

            let pipeline = build_pipeline(config, source).await?;
            match user {
                Some(user) => {
                    let run = pipeline.run(&user, send).await;
                    report(&run);
                    match &output {
                        Some(path) => write_digest(path, &run)?,
                        None => print!("{}", run.document),
                    }
                }
                None => {
                    let runs = pipeline.run_all(send).await;
                    if let Some(dir) = &output {
                        std::fs::create_dir_all(dir)
                            .with_context(|| format!("failed to create {}", dir.display()))?;
                    }
                    for run in &runs {
                        report(run);
                        match &output {
                            Some(dir) => write_digest(&dir.join(digest_file_name(&run.user)), run)?,
                            None => println!("{}", run.document),
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
