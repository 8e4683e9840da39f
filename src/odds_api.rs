//! The Odds API (v4) client.
//!
//! One call per request: `GET {base}/sports/{sport}/odds` for US books with
//! moneyline, spread and total markets in American format. Failures come
//! back as typed `OddsError`s; nothing is retried here.
//!
//! API docs: https://the-odds-api.com/liveapi/guides/v4/
//! Auth: `apiKey` query parameter.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::OddsApiConfig;
use crate::types::{OddsError, RawEvent};

const SOURCE_NAME: &str = "the-odds-api";

/// Anything that can supply raw events for a provider sport key.
#[async_trait]
pub trait OddsSource: Send + Sync {
    async fn fetch_odds(&self, sport_key: &str) -> Result<Vec<RawEvent>, OddsError>;

    /// Source name for logging.
    fn name(&self) -> &str;
}

/// reqwest-backed client for The Odds API.
pub struct TheOddsApiClient {
    http: Client,
    base_url: String,
    api_key: Option<Secret<String>>,
    regions: String,
    markets: String,
    odds_format: String,
    timeout: Duration,
}

impl TheOddsApiClient {
    /// Build a client. A missing key is allowed here; every fetch will then
    /// fail with `OddsError::Misconfigured`.
    pub fn new(cfg: &OddsApiConfig, api_key: Option<Secret<String>>) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(cfg.timeout_secs);
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("betslip-odds/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client for The Odds API")?;

        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key,
            regions: cfg.regions.clone(),
            markets: cfg.markets.clone(),
            odds_format: cfg.odds_format.clone(),
            timeout,
        })
    }

    fn odds_url(&self, sport_key: &str) -> String {
        format!("{}/sports/{}/odds", self.base_url, sport_key)
    }

    fn transport_error(&self, err: reqwest::Error) -> OddsError {
        if err.is_timeout() {
            OddsError::Network(format!("timed out after {}s", self.timeout.as_secs()))
        } else {
            // The request URL carries the API key; keep it out of messages.
            OddsError::Network(err.without_url().to_string())
        }
    }
}

/// Log the provider's credit headers when present.
fn log_quota(headers: &reqwest::header::HeaderMap) {
    let read = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_owned);
    if let Some(remaining) = read("x-requests-remaining") {
        debug!(
            remaining = %remaining,
            used = %read("x-requests-used").unwrap_or_else(|| "?".into()),
            "Odds API quota"
        );
    }
}

#[async_trait]
impl OddsSource for TheOddsApiClient {
    async fn fetch_odds(&self, sport_key: &str) -> Result<Vec<RawEvent>, OddsError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| OddsError::Misconfigured("Server missing ODDS_API_KEY".into()))?;

        let url = self.odds_url(sport_key);
        debug!(url = %url, "Fetching odds");

        let resp = self
            .http
            .get(&url)
            .query(&[
                ("regions", self.regions.as_str()),
                ("markets", self.markets.as_str()),
                ("oddsFormat", self.odds_format.as_str()),
                ("apiKey", api_key.expose_secret().as_str()),
            ])
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        log_quota(resp.headers());

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!(sport = sport_key, "Odds API rate limited");
            return Err(OddsError::RateLimited);
        }

        let body = resp.text().await.map_err(|e| self.transport_error(e))?;

        if status != StatusCode::OK {
            warn!(sport = sport_key, status = status.as_u16(), "Odds API error");
            return Err(OddsError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let events: Vec<RawEvent> =
            serde_json::from_str(&body).map_err(|e| OddsError::Decode(e.to_string()))?;

        info!(sport = sport_key, events = events.len(), "Fetched events from The Odds API");
        Ok(events)
    }

    fn name(&self) -> &str {
        SOURCE_NAME
    }
}
