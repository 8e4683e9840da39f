//! Event normalization.
//!
//! Turns one upstream event plus its chosen bookmaker into a `Game`, or
//! explains why it cannot. A game is only produced when all three core
//! markets (moneyline, spread, total) resolve completely.

use serde_json::Value;
use std::collections::HashMap;

use crate::types::{
    Exclusion, Game, Moneyline, RawBookmaker, RawEvent, RawMarket, RawOutcome, Spread, Total,
};

const H2H: &str = "h2h";
const SPREADS: &str = "spreads";
const TOTALS: &str = "totals";

/// Generic outcome labels some books use instead of team names.
const HOME_LABEL: &str = "Home";
const AWAY_LABEL: &str = "Away";

/// Week label served on every game until real schedule mapping exists.
pub const WEEK_PLACEHOLDER: u32 = 1;

// ---------------------------------------------------------------------------
// Coercion
// ---------------------------------------------------------------------------

/// Read a loosely-typed numeric field.
///
/// Accepts JSON numbers and strings holding a number (surrounding
/// whitespace and a leading `+` are fine). Null, booleans, objects,
/// non-numeric strings and non-finite values yield `None`.
pub fn point_value(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// Coerce a price to integer American odds.
///
/// Same accepted shapes as [`point_value`]; fractional values truncate
/// toward zero (`-110.0` → `-110`, `"+130"` → `130`). Values outside the
/// `i32` range are rejected.
pub fn american_odds(value: &Value) -> Option<i32> {
    if let Some(i) = value.as_i64() {
        return i32::try_from(i).ok();
    }
    let truncated = point_value(value)?.trunc();
    if truncated < f64::from(i32::MIN) || truncated > f64::from(i32::MAX) {
        return None;
    }
    Some(truncated as i32)
}

fn price(outcome: &RawOutcome, market: &'static str) -> Result<i32, Exclusion> {
    american_odds(&outcome.price).ok_or_else(|| Exclusion::BadPrice {
        market,
        value: outcome.price.to_string(),
    })
}

fn point(outcome: &RawOutcome, market: &'static str) -> Result<f64, Exclusion> {
    point_value(&outcome.point).ok_or_else(|| Exclusion::BadPoint {
        market,
        value: outcome.point.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Markets
// ---------------------------------------------------------------------------

fn required_market<'a>(
    markets: &HashMap<&str, &'a RawMarket>,
    key: &'static str,
) -> Result<&'a RawMarket, Exclusion> {
    let market = markets.get(key).copied().ok_or(Exclusion::MissingMarket(key))?;
    if market.outcomes.is_empty() {
        return Err(Exclusion::EmptyOutcomes(key));
    }
    Ok(market)
}

fn missing(market: &'static str, side: &str) -> Exclusion {
    Exclusion::MissingOutcome {
        market,
        side: side.to_string(),
    }
}

fn moneyline(market: &RawMarket, home: &str, away: &str) -> Result<Moneyline, Exclusion> {
    let by_name: HashMap<&str, &RawOutcome> = market
        .outcomes
        .iter()
        .map(|o| (o.name.as_str(), o))
        .collect();
    let pick = |team: &str, label: &str| by_name.get(team).or_else(|| by_name.get(label)).copied();

    let home_outcome = pick(home, HOME_LABEL).ok_or_else(|| missing(H2H, "home"))?;
    let away_outcome = pick(away, AWAY_LABEL).ok_or_else(|| missing(H2H, "away"))?;

    Ok(Moneyline {
        home: price(home_outcome, H2H)?,
        away: price(away_outcome, H2H)?,
    })
}

/// The side with the lower (more negative) point is the favorite. On equal
/// points the away side is taken.
fn spread(market: &RawMarket, home: &str, away: &str) -> Result<Spread, Exclusion> {
    let find = |team: &str, label: &str| {
        market
            .outcomes
            .iter()
            .find(|o| o.name == team || o.name == label)
    };

    let home_outcome = find(home, HOME_LABEL).ok_or_else(|| missing(SPREADS, "home"))?;
    let away_outcome = find(away, AWAY_LABEL).ok_or_else(|| missing(SPREADS, "away"))?;

    let home_point = point(home_outcome, SPREADS)?;
    let away_point = point(away_outcome, SPREADS)?;

    let (favorite, fav_point, fav_outcome) = if home_point < away_point {
        (home, home_point, home_outcome)
    } else {
        (away, away_point, away_outcome)
    };

    Ok(Spread {
        favorite: favorite.to_string(),
        line: fav_point.abs(),
        price: price(fav_outcome, SPREADS)?,
    })
}

fn total(market: &RawMarket) -> Result<Total, Exclusion> {
    let find = |prefix: &str| {
        market
            .outcomes
            .iter()
            .find(|o| o.name.to_lowercase().starts_with(prefix))
    };

    let over = find("over").ok_or_else(|| missing(TOTALS, "over"))?;
    let under = find("under").ok_or_else(|| missing(TOTALS, "under"))?;

    Ok(Total {
        line: point(over, TOTALS)?,
        over_price: price(over, TOTALS)?,
        under_price: price(under, TOTALS)?,
    })
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// Normalize one event using the given bookmaker's markets.
///
/// Duplicate market keys resolve to the last occurrence.
pub fn map_event(event: &RawEvent, book: &RawBookmaker) -> Result<Game, Exclusion> {
    let markets: HashMap<&str, &RawMarket> = book
        .markets
        .iter()
        .map(|m| (m.key.as_str(), m))
        .collect();

    let home = event.home_team.as_str();
    let away = event.away_team.as_str();

    let moneyline = moneyline(required_market(&markets, H2H)?, home, away)?;
    let spread = spread(required_market(&markets, SPREADS)?, home, away)?;
    let total = total(required_market(&markets, TOTALS)?)?;

    Ok(Game {
        week: WEEK_PLACEHOLDER,
        kickoff_iso: event.commence_time.clone(),
        home: home.to_string(),
        away: away.to_string(),
        moneyline,
        spread,
        total,
    })
}
