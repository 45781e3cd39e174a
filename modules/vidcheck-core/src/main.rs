use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use vidcheck_common::{AppConfig, FileConfig};
use vidcheck_core::{analyze, link, providers};

#[derive(Parser)]
#[command(name = "vidcheck", about = "Check a short video's central claim against trusted sources")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze one YouTube or TikTok link.
    Analyze {
        url: String,
        /// Print the full run record as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List stored runs, newest first.
    Recent {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Show how a link resolves, without fetching anything.
    Resolve { url: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("vidcheck=info".parse()?))
        .init();

    let cli = Cli::parse();

    if let Command::Resolve { url } = &cli.command {
        println!("{}", serde_json::to_string_pretty(&link::resolve(url))?);
        return Ok(());
    }

    let config = AppConfig::from_env()?;
    let settings = Arc::new(FileConfig::load_or_default(config.config_path.as_deref())?);
    let store = providers::connect_store(&config).await?;

    match cli.command {
        Command::Analyze { url, json } => {
            let deps = providers::build_deps(&config, settings, store)?;
            info!("Analyzing link");
            let analysis = analyze(&deps, &url).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                let record = &analysis.record;
                println!("Confidence: {}", record.confidence);
                if !record.claim_extracted.is_empty() {
                    println!("Claim: {}", record.claim_extracted);
                }
                println!("\n{}\n", record.explanation);
                for source in &record.sources {
                    println!("  - {source}");
                }
                if let Some(warning) = &analysis.warning {
                    eprintln!("warning: {warning}");
                }
            }
        }
        Command::Recent { limit } => {
            for record in store.list_recent(limit.clamp(1, 100)).await? {
                println!(
                    "{}  {:<7}  {:<6}  {}",
                    record.created_at.format("%Y-%m-%d %H:%M"),
                    record.platform,
                    record.confidence,
                    record.video_url
                );
            }
        }
        Command::Resolve { .. } => {}
    }

    Ok(())
}
