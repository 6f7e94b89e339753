use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use progress_store::{LinkStore, ProgressStore};
use reelscope_core::{CoreError, ErrorExt, ErrorReporter, ReelscopeConfig};
use sentiment::SentimentAggregator;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use visualizer::Visualizer;

#[derive(Parser)]
#[command(name = "reelscope", about = "Reel engagement and comment sentiment toolkit")]
struct Cli {
    /// Path to config TOML file (defaults apply when it does not exist)
    #[arg(long, default_value = "reelscope.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add reel URLs to the saved link list
    AddLinks {
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Show which saved links still need collecting
    Pending,
    /// Score collected comments and write the analysis file
    Analyze,
    /// Render the likes-vs-sentiment plot
    Visualize,
    /// Run the sentiment endpoint for the browser extension
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("reelscope=info,progress_store=info,sentiment=info,sentiment_server=info,visualizer=info")
        }))
        .init();

    let cli = Cli::parse();

    let config = ReelscopeConfig::load_or_default(&cli.config)
        .with_context(|| format!("Invalid config file: {}", cli.config.display()))?;
    tracing::debug!(config = %cli.config.display(), "Config loaded");

    let paths = &config.paths;
    match cli.command {
        Command::AddLinks { urls } => {
            let links = LinkStore::new(&paths.reels_file);
            let before = links.load().map_err(fatal)?.len();
            let saved = links
                .save_union(&urls)
                .with_context(|| format!("Failed to write {}", paths.reels_file.display()))?;
            tracing::info!(
                "saved {} reels ({} new)",
                saved.len(),
                saved.len() - before
            );
        }
        Command::Pending => {
            let links = LinkStore::new(&paths.reels_file).load().map_err(fatal)?;
            let work = ProgressStore::new(&paths.output_file)
                .pending(&links)
                .map_err(fatal)?;
            tracing::info!(
                "{} reels already collected, {} pending",
                work.already_done,
                work.pending.len()
            );
            for url in &work.pending {
                println!("{url}");
            }
            if !work.unrecognized.is_empty() {
                tracing::warn!("{} links are not reel URLs", work.unrecognized.len());
            }
        }
        Command::Analyze => {
            SentimentAggregator::from_config(&config.sentiment)
                .and_then(|aggregator| {
                    aggregator.run_analysis(&paths.output_file, &paths.analysis_file)
                })
                .map_err(fatal)?;
            tracing::info!("analysis complete!");
        }
        Command::Visualize => {
            let plotted = Visualizer::new(&paths.analysis_file, &paths.plot_file)
                .run()
                .map_err(fatal)?;
            tracing::info!("plotted {} reels", plotted);
        }
        Command::Serve => {
            sentiment_server::serve(&config.server)
                .await
                .context("Sentiment endpoint stopped")?;
        }
    }

    Ok(())
}

fn fatal(error: CoreError) -> anyhow::Error {
    ErrorReporter::new().report_error(&error);
    anyhow::anyhow!(error.user_friendly_message())
}
