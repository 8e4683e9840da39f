//! Games assembly: cache → fetch → filter → pick book → normalize.
//!
//! `OddsService` is built once at startup and shared by every handler.
//! Upstream failures abort the request; per-event normalization failures
//! only shrink the result set.

use chrono::{DateTime, SecondsFormat, Utc};
use std::sync::Arc;
use tracing::{debug, info};

use crate::books::choose_book;
use crate::cache::TtlCache;
use crate::clock::Clock;
use crate::config::SportsConfig;
use crate::normalize::map_event;
use crate::odds_api::OddsSource;
use crate::types::{
    cache_key, Exclusion, Game, GamesResponse, League, OddsError, RawEvent, Slate,
};
use crate::window::{in_window, is_same_utc_date, week_window};

/// How many earliest events `today` serves when nothing kicks off today.
pub const TODAY_FALLBACK_GAMES: usize = 2;

/// Render an instant the way every `as_of` field is served.
pub fn iso_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Games produced from a batch of events, plus how many were dropped.
#[derive(Debug, Default)]
struct Normalized {
    games: Vec<Game>,
    excluded: usize,
}

pub struct OddsService {
    source: Arc<dyn OddsSource>,
    cache: TtlCache<GamesResponse>,
    clock: Arc<dyn Clock>,
    sports: SportsConfig,
    book_priority: Vec<String>,
}

impl OddsService {
    pub fn new(
        source: Arc<dyn OddsSource>,
        cache: TtlCache<GamesResponse>,
        clock: Arc<dyn Clock>,
        sports: SportsConfig,
        book_priority: Vec<String>,
    ) -> Self {
        Self {
            source,
            cache,
            clock,
            sports,
            book_priority,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Games kicking off in this week's Thursday to Monday window.
    pub async fn weekend(&self, league: League) -> Result<GamesResponse, OddsError> {
        self.cached(league, Slate::Weekend, |events, now| {
            let (start, end) = week_window(now);
            let in_range: Vec<&RawEvent> = events
                .iter()
                .filter(|ev| in_window(&ev.commence_time, start, end))
                .collect();
            self.normalize_all(in_range)
        })
        .await
    }

    /// Games kicking off on the current UTC date.
    ///
    /// When that yields no games, the earliest events overall are served
    /// instead (by raw `commence_time` order) so clients never see an empty
    /// slate while the provider has anything listed.
    pub async fn today(&self, league: League) -> Result<GamesResponse, OddsError> {
        self.cached(league, Slate::Today, |events, now| {
            let today = now.date_naive();
            let todays: Vec<&RawEvent> = events
                .iter()
                .filter(|ev| is_same_utc_date(&ev.commence_time, today))
                .collect();
            let first = self.normalize_all(todays);
            if !first.games.is_empty() {
                return first;
            }

            let mut earliest: Vec<&RawEvent> = events.iter().collect();
            earliest.sort_by(|a, b| a.commence_time.cmp(&b.commence_time));
            earliest.truncate(TODAY_FALLBACK_GAMES);
            debug!(
                league = %league,
                candidates = earliest.len(),
                "No games today, using earliest events"
            );
            let mut fallback = self.normalize_all(earliest);
            fallback.excluded += first.excluded;
            fallback
        })
        .await
    }

    /// Shared read-through path for every endpoint.
    async fn cached<F>(
        &self,
        league: League,
        slate: Slate,
        select: F,
    ) -> Result<GamesResponse, OddsError>
    where
        F: FnOnce(&[RawEvent], DateTime<Utc>) -> Normalized,
    {
        let key = cache_key(league, slate);
        if let Some(hit) = self.cache.get(&key).await {
            debug!(key = %key, "Cache hit");
            return Ok(hit);
        }

        let sport_key = self
            .sports
            .sport_key(league)
            .ok_or_else(|| OddsError::UnknownLeague(league.to_string()))?;

        let events = self.source.fetch_odds(sport_key).await?;
        let now = self.clock.now();
        let Normalized { games, excluded } = select(&events, now);

        info!(
            key = %key,
            source = self.source.name(),
            upstream = events.len(),
            served = games.len(),
            excluded,
            "Built games response"
        );

        let response = GamesResponse {
            as_of: iso_timestamp(now),
            games,
        };
        self.cache.set(key, response.clone()).await;
        Ok(response)
    }

    fn normalize_all<'a>(&self, events: impl IntoIterator<Item = &'a RawEvent>) -> Normalized {
        let mut out = Normalized::default();
        for ev in events {
            match self.normalize_one(ev) {
                Ok(game) => {
                debug!(game = %game, "Event normalized");
                out.games.push(game);
            }
                Err(reason) => {
                    out.excluded += 1;
                    debug!(
                        event = %ev.id,
                        home = %ev.home_team,
                        away = %ev.away_team,
                        reason = %reason,
                        "Event excluded"
                    );
                }
            }
        }
        if out.excluded > 0 {
            debug!(excluded = out.excluded, kept = out.games.len(), "Normalization summary");
        }
        out
    }

    fn normalize_one(&self, ev: &RawEvent) -> Result<Game, Exclusion> {
        let book = choose_book(&ev.bookmakers, self.book_priority.as_slice())
            .ok_or(Exclusion::NoBookmaker)?;
        map_event(ev, book)
    }
}
