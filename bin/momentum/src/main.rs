use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use common::{Config, RunMode};
use engine::{DailySchedule, Engine, RebalanceDriver};
use paper::{InMemoryFeed, PaperClient};
use strategy::MomentumConfig;

#[tokio::main]
async fn main() {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env();
    info!(mode = %cfg.run_mode, "Momentum rebalancer starting");

    let strategy_cfg = MomentumConfig::load(&cfg.strategy_config_path)
        .unwrap_or_else(|e| panic!("Strategy config error: {e}"));

    // ── Market data ───────────────────────────────────────────────────────────
    let feed = Arc::new(
        InMemoryFeed::from_file(&cfg.price_data_path)
            .unwrap_or_else(|e| panic!("Failed to load price data: {e}")),
    );
    let sessions = feed.sessions();

    // ── Execution ─────────────────────────────────────────────────────────────
    let client = Arc::new(PaperClient::new(cfg.paper_non_tradable.clone()));
    let holdings = client.holdings_handle();
    let driver = RebalanceDriver::new(client);

    let engine = Engine::new(&strategy_cfg, feed, driver);

    match cfg.run_mode {
        RunMode::Replay => {
            if sessions.len() < 2 {
                warn!(sessions = sessions.len(), "Price file needs at least two sessions to replay");
                return;
            }
            let reports = engine.replay(&sessions).await;
            info!(days = reports.len(), "Replay complete");

            for (asset, weight) in holdings.read().await.iter() {
                info!(asset = %asset, weight, "Final paper holding");
            }
        }
        RunMode::Scheduled => {
            tokio::select! {
                _ = engine.run_scheduled(DailySchedule::default()) => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received. Exiting.");
                }
            }
        }
    }
}
