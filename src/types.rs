//! Shared types for the odds proxy.
//!
//! Two halves: the provider's loosely-typed event payload as it arrives
//! from The Odds API, and the stable `Game` shape served to clients.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Upstream payload (The Odds API v4)
// ---------------------------------------------------------------------------

/// One event from `/v4/sports/{sport}/odds`.
///
/// Every field defaults so that one malformed record degrades into a
/// normalization exclusion rather than failing the whole response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawEvent {
    pub id: String,
    pub sport_key: String,
    pub home_team: String,
    pub away_team: String,
    /// ISO-8601, normally with a trailing `Z`.
    pub commence_time: String,
    pub bookmakers: Vec<RawBookmaker>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawBookmaker {
    pub key: String,
    pub title: String,
    pub markets: Vec<RawMarket>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawMarket {
    /// "h2h", "spreads" or "totals".
    pub key: String,
    pub outcomes: Vec<RawOutcome>,
}

/// A single priced outcome. `price` and `point` are kept as raw JSON
/// because books send integers, floats and numeric strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawOutcome {
    pub name: String,
    pub price: serde_json::Value,
    pub point: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Served shape
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Moneyline {
    pub home: i32,
    pub away: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spread {
    pub favorite: String,
    /// Point spread magnitude, never negative.
    pub line: f64,
    /// Price on the favorite's side.
    pub price: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Total {
    pub line: f64,
    pub over_price: i32,
    pub under_price: i32,
}

/// A normalized game with one bookmaker's three core markets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    /// Placeholder; always 1 until real week mapping exists.
    pub week: u32,
    pub kickoff_iso: String,
    pub home: String,
    pub away: String,
    pub moneyline: Moneyline,
    pub spread: Spread,
    pub total: Total,
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ {} ({}) ML {:+}/{:+} | {} -{} ({:+}) | O/U {}",
            self.away,
            self.home,
            self.kickoff_iso,
            self.moneyline.away,
            self.moneyline.home,
            self.spread.favorite,
            self.spread.line,
            self.spread.price,
            self.total.line,
        )
    }
}

/// Body of every games endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GamesResponse {
    pub as_of: String,
    pub games: Vec<Game>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub as_of: String,
}

// ---------------------------------------------------------------------------
// Leagues and slates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum League {
    Nfl,
    Cfb,
}

impl League {
    pub fn as_str(&self) -> &'static str {
        match self {
            League::Nfl => "nfl",
            League::Cfb => "cfb",
        }
    }
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which time filter an endpoint applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slate {
    Weekend,
    Today,
}

impl fmt::Display for Slate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slate::Weekend => write!(f, "weekend"),
            Slate::Today => write!(f, "today"),
        }
    }
}

/// Cache key for a league/slate pair, e.g. `nfl_weekend`.
pub fn cache_key(league: League, slate: Slate) -> String {
    format!("{league}_{slate}")
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Failures that abort a whole request.
#[derive(Debug, thiserror::Error)]
pub enum OddsError {
    #[error("Server misconfigured: {0}")]
    Misconfigured(String),

    #[error("Upstream rate limited (429). Try again shortly.")]
    RateLimited,

    #[error("Provider error {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("Upstream unreachable: {0}")]
    Network(String),

    #[error("Unreadable provider payload: {0}")]
    Decode(String),

    #[error("No sport key configured for league '{0}'")]
    UnknownLeague(String),
}

/// Why an event produced no `Game`. Never surfaced to clients.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Exclusion {
    #[error("event has no bookmakers")]
    NoBookmaker,

    #[error("market '{0}' missing")]
    MissingMarket(&'static str),

    #[error("market '{0}' has no outcomes")]
    EmptyOutcomes(&'static str),

    #[error("market '{market}' has no {side} outcome")]
    MissingOutcome { market: &'static str, side: String },

    #[error("market '{market}' price unusable: {value}")]
    BadPrice { market: &'static str, value: String },

    #[error("market '{market}' point unusable: {value}")]
    BadPoint { market: &'static str, value: String },
}
