//! Spendview main entry point

use clap::Parser;
use spendview_api::start_server;
use spendview_config::Config;
use spendview_core::FeedController;
use spendview_source::{CachedFetch, Dataset, FetchRef, StaticDataSource};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tokio::sync::RwLock;

#[derive(Parser, Debug)]
#[command(name = "spendview")]
#[command(version = "0.1.0")]
#[command(about = "A lightweight employee transaction feed service", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let (config, config_err) = match Config::load(args.config.clone()) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    if let Some(e) = config_err {
        log::warn!(
            "Config {}: {} ({}); using default configuration",
            args.config.display(),
            e,
            e.severity()
        );
    }

    let rt = Runtime::new()?;
    rt.block_on(async move {
        let dataset_path = config.dataset_path();
        log::info!("Loading dataset: {}", dataset_path.display());

        let source = match StaticDataSource::load(dataset_path.clone(), config.feed.page_size).await
        {
            Ok(source) => source,
            Err(e) => {
                log::warn!(
                    "Failed to load dataset {}: {}; starting with an empty dataset",
                    dataset_path.display(),
                    e
                );
                StaticDataSource::new(Dataset::default(), config.feed.page_size)
            }
        };

        let fetch = Arc::new(CachedFetch::new(Arc::new(source)));
        let fetch_ref: FetchRef = fetch.clone();
        let mut controller = FeedController::new(config.feed.clone(), fetch_ref);

        // First entry into the all-transactions feed; a failure here leaves
        // the retry path open through the API.
        if let Err(e) = controller.initialize().await {
            log::error!("Initial feed load failed: {}", e);
        }

        let controller = Arc::new(RwLock::new(controller));
        start_server(config, controller, fetch).await;
    });

    Ok(())
}
