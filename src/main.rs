//! # verso
//!
//! Splits published articles into heading-anchored fragments and keeps a
//! hosted search index in sync with them.
//!
//! ## Commands
//!
//! - `verso serve` - run the webhook gateway
//! - `verso fragment <FILE>` - print the fragments of the posts in a file
//! - `verso publish <FILE>` - fragment posts and write them to the index
//! - `verso remove <SLUG>` - delete every fragment of an article
//! - `verso delete <OBJECT_ID>...` - delete individual fragments
//! - `verso settings` - push ranking settings to the index

mod config;
mod input;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::sync::watch;
use verso_core::FragmentPipeline;
use verso_gateway::{GatewayServer, IndexingService, parse_slug_list};
use verso_index::{InMemoryIndex, SearchIndex};

use crate::config::{Config, resolve_config_path};
use crate::input::load_documents;

#[derive(Parser)]
#[command(name = "verso")]
#[command(about = "Heading-anchored search fragments for published articles")]
#[command(version)]
struct Cli {
    /// Path to config file (default: $VERSO_CONFIG or config/default.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the webhook gateway
    Serve,

    /// Print the fragments of the posts in FILE as JSON
    Fragment {
        /// Post, list of posts, or saved webhook body
        file: PathBuf,

        /// Comma-separated slugs to leave out (default: configured ignore list)
        #[arg(long)]
        ignore: Option<String>,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },

    /// Fragment the posts in FILE and write them to the index
    Publish {
        file: PathBuf,

        /// Fragment and report without contacting the index
        #[arg(long)]
        dry_run: bool,
    },

    /// Delete every fragment of the article with SLUG
    Remove { slug: String },

    /// Delete individual fragments by object id, e.g. `5f1_3`
    Delete {
        #[arg(required = true)]
        object_ids: Vec<String>,
    },

    /// Push ranking settings to the index
    Settings,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_subscriber();

    let cli = Cli::parse();
    let config_path = resolve_config_path(cli.config.as_deref());
    let config = Config::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    tracing::debug!(path = %config_path.display(), "configuration loaded");

    match cli.command {
        Commands::Serve => serve(config).await,
        Commands::Fragment {
            file,
            ignore,
            pretty,
        } => fragment(&config, &file, ignore.as_deref(), pretty),
        Commands::Publish { file, dry_run } => publish(&config, &file, dry_run).await,
        Commands::Remove { slug } => {
            let index = config.search_index()?;
            index.delete_by_slug(&slug).await?;
            println!("Post \"{slug}\" has been removed from the index.");
            Ok(())
        }
        Commands::Delete { object_ids } => {
            let index = config.search_index()?;
            let count = object_ids.len();
            index.delete_objects(object_ids).await?;
            println!("{count} fragments deleted from index \"{}\".", index.index_name());
            Ok(())
        }
        Commands::Settings => {
            let index = config.search_index()?;
            index.push_settings(&config.algolia.settings).await?;
            println!("Settings pushed to index \"{}\".", index.index_name());
            Ok(())
        }
    }
}

fn init_subscriber() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn pipeline(config: &Config) -> anyhow::Result<FragmentPipeline> {
    FragmentPipeline::from_config(config.pipeline.clone()).context("invalid [pipeline] section")
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let index: Arc<dyn SearchIndex> = Arc::new(config.search_index()?);
    let service = IndexingService::new(pipeline(&config)?, index, config.algolia.settings.clone());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {e:#}");
            return;
        }
        tracing::info!("received shutdown signal");
        let _ = shutdown_tx.send(true);
    });

    let secret = config.gateway.secret.as_ref().map(|s| s.expose().to_owned());
    GatewayServer::new(
        &config.gateway.bind,
        config.gateway.port,
        service,
        config.control_source(),
        shutdown_rx,
    )
    .with_secret(secret)
    .with_rate_limit(config.gateway.rate_limit)
    .with_rate_window(Duration::from_secs(config.gateway.rate_window_secs))
    .with_max_body_size(config.gateway.max_body_size)
    .serve()
    .await?;
    Ok(())
}

fn fragment(config: &Config, file: &Path, ignore: Option<&str>, pretty: bool) -> anyhow::Result<()> {
    let documents = load_documents(file)?;
    let ignore_slugs = ignore.map_or_else(|| config.controls.ignore_slugs.clone(), parse_slug_list);

    let acc = pipeline(config)?.fragments_for(&documents, &ignore_slugs)?;
    for skipped in &acc.skipped {
        tracing::warn!(object_id = %skipped.object_id, slug = %skipped.slug, "skipped: {}", skipped.reason);
    }

    let out = if pretty {
        serde_json::to_string_pretty(&acc.fragments)?
    } else {
        serde_json::to_string(&acc.fragments)?
    };
    println!("{out}");
    Ok(())
}

async fn publish(config: &Config, file: &Path, dry_run: bool) -> anyhow::Result<()> {
    let documents = load_documents(file)?;
    let index: Arc<dyn SearchIndex> = if dry_run {
        Arc::new(InMemoryIndex::new())
    } else {
        Arc::new(config.search_index()?)
    };
    let service = IndexingService::new(pipeline(config)?, index, config.algolia.settings.clone());

    let outcome = service
        .publish(&documents, &config.controls.ignore_slugs)
        .await?;
    for skipped in &outcome.skipped {
        tracing::warn!(object_id = %skipped.object_id, slug = %skipped.slug, "skipped: {}", skipped.reason);
    }

    let verb = if dry_run { "would be written" } else { "written" };
    println!(
        "{} fragments from {} posts {verb}, {} skipped.",
        outcome.fragments,
        documents.len(),
        outcome.skipped.len()
    );
    Ok(())
}
