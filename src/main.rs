//! betslip-odds entry point.
//!
//! Loads configuration, initialises structured logging, wires the odds
//! client, cache and service together, and serves HTTP until Ctrl+C.

use anyhow::Result;
use chrono::Duration;
use std::sync::Arc;
use tracing::{info, warn};

use betslip_odds::api;
use betslip_odds::cache::TtlCache;
use betslip_odds::clock::{Clock, SystemClock};
use betslip_odds::config::{AppConfig, LogFormat, LoggingConfig};
use betslip_odds::odds_api::TheOddsApiClient;
use betslip_odds::service::OddsService;

const CONFIG_PATH_ENV: &str = "BETSLIP_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.toml";
/// Forces JSON log lines regardless of `[logging] format`.
const LOG_JSON_ENV: &str = "BETSLIP_LOG_JSON";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let config_path =
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let mut cfg = AppConfig::load_or_default(&config_path)?;
    if std::env::var(LOG_JSON_ENV).is_ok() {
        cfg.logging.format = LogFormat::Json;
    }

    init_logging(&cfg.logging);

    let api_key = cfg.odds_api.api_key();
    if api_key.is_none() {
        // Still start: /health stays useful and odds routes answer 500.
        warn!(
            env = %cfg.odds_api.api_key_env,
            "API key not set. Live odds routes will fail."
        );
    }

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let client = TheOddsApiClient::new(&cfg.odds_api, api_key)?;
    let cache = TtlCache::new(clock.clone(), Duration::seconds(cfg.cache.ttl_secs));
    let service = OddsService::new(
        Arc::new(client),
        cache,
        clock,
        cfg.sports.clone(),
        cfg.books.priority.clone(),
    );

    info!(
        config = %config_path,
        base_url = %cfg.odds_api.base_url,
        ttl_secs = cfg.cache.ttl_secs,
        books = ?cfg.books.priority,
        "betslip-odds starting up"
    );

    api::serve(Arc::new(service), &cfg.bind_addr(), shutdown_signal()).await?;

    info!("betslip-odds shut down cleanly.");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received."),
        Err(e) => {
            warn!(error = %e, "Cannot listen for Ctrl+C; running until killed");
            std::future::pending::<()>().await;
        }
    }
}

/// Install the global `tracing` subscriber. `RUST_LOG` wins over the
/// configured filter.
fn init_logging(cfg: &LoggingConfig) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.filter));
    let subscriber = fmt().with_env_filter(filter).with_target(true);

    match cfg.format {
        LogFormat::Json => subscriber.json().with_current_span(false).init(),
        LogFormat::Text => subscriber.compact().init(),
    }
}
