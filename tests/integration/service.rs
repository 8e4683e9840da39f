//! End-to-end games assembly against the mock source.

use chrono::{Duration, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Arc;

use betslip_odds::books::DEFAULT_BOOK_PRIORITY;
use betslip_odds::cache::TtlCache;
use betslip_odds::clock::ManualClock;
use betslip_odds::config::SportsConfig;
use betslip_odds::service::OddsService;
use betslip_odds::types::{League, OddsError, RawEvent};

use crate::mock_source::{
    book_json, event, event_without_books, event_without_totals, ForcedError, MockSource,
};

struct Harness {
    clock: Arc<ManualClock>,
    source: Arc<MockSource>,
    service: OddsService,
}

/// Sunday 2025-09-07 15:00 UTC; weekend window is Sep 4 to Sep 9.
fn harness(events: Vec<RawEvent>) -> Harness {
    harness_with_sports(events, SportsConfig::default())
}

fn harness_with_sports(events: Vec<RawEvent>, sports: SportsConfig) -> Harness {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 9, 7, 15, 0, 0).unwrap(),
    ));
    let source = MockSource::with_events(events);
    let service = OddsService::new(
        source.clone(),
        TtlCache::new(clock.clone(), Duration::seconds(45)),
        clock.clone(),
        sports,
        DEFAULT_BOOK_PRIORITY.iter().map(|s| s.to_string()).collect(),
    );
    Harness { clock, source, service }
}

fn homes(resp: &betslip_odds::types::GamesResponse) -> Vec<&str> {
    resp.games.iter().map(|g| g.home.as_str()).collect()
}

// -- Weekend --

#[tokio::test]
async fn test_weekend_filters_to_window() {
    let h = harness(vec![
        event("Early", "X", "2025-09-03T23:59:00Z"),
        event("Thursday", "X", "2025-09-05T00:15:00Z"),
        event("Sunday", "X", "2025-09-07T17:00:00Z"),
        // Tuesday 00:15 UTC is past the exclusive end.
        event("PastEnd", "X", "2025-09-09T00:15:00Z"),
        event("NextWeek", "X", "2025-09-11T00:15:00Z"),
        event("Broken", "X", "not-a-date"),
    ]);
    let resp = h.service.weekend(League::Nfl).await.unwrap();
    assert_eq!(homes(&resp), vec!["Thursday", "Sunday"]);
    assert_eq!(h.source.sports_requested(), vec!["americanfootball_nfl".to_string()]);
}

#[tokio::test]
async fn test_monday_night_inside_window() {
    let h = harness(vec![event("MNF", "X", "2025-09-08T20:15:00Z")]);
    let resp = h.service.weekend(League::Nfl).await.unwrap();
    assert_eq!(homes(&resp), vec!["MNF"]);
}

#[tokio::test]
async fn test_incomplete_events_dropped_silently() {
    let h = harness(vec![
        event("Full", "X", "2025-09-07T17:00:00Z"),
        event_without_totals("NoTotals", "X", "2025-09-07T17:00:00Z"),
        event_without_books("NoBooks", "X", "2025-09-07T20:25:00Z"),
    ]);
    let resp = h.service.weekend(League::Nfl).await.unwrap();
    assert_eq!(homes(&resp), vec!["Full"]);
}

#[tokio::test]
async fn test_cfb_uses_ncaaf_sport_key() {
    let h = harness(vec![event("Georgia", "Clemson", "2025-09-06T19:30:00Z")]);
    let resp = h.service.weekend(League::Cfb).await.unwrap();
    assert_eq!(resp.games.len(), 1);
    assert_eq!(h.source.sports_requested(), vec!["americanfootball_ncaaf".to_string()]);
}

#[tokio::test]
async fn test_preferred_book_chosen_over_listing_order() {
    let ev: RawEvent = serde_json::from_value(serde_json::json!({
        "id": "ev",
        "home_team": "A",
        "away_team": "B",
        "commence_time": "2025-09-07T17:00:00Z",
        "bookmakers": [
            book_json("FanDuel", "A", "B", -140),
            book_json("DraftKings", "A", "B", -155)
        ]
    }))
    .unwrap();
    let h = harness(vec![ev]);
    let resp = h.service.weekend(League::Nfl).await.unwrap();
    assert_eq!(resp.games[0].moneyline.home, -155);
}

// -- Today --

#[tokio::test]
async fn test_today_serves_todays_games() {
    let h = harness(vec![
        event("Yesterday", "X", "2025-09-06T17:00:00Z"),
        event("Today1", "X", "2025-09-07T17:00:00Z"),
        event("Today2", "X", "2025-09-07T20:25:00Z"),
        event("Tomorrow", "X", "2025-09-08T17:00:00Z"),
    ]);
    let resp = h.service.today(League::Nfl).await.unwrap();
    assert_eq!(homes(&resp), vec!["Today1", "Today2"]);
}

#[tokio::test]
async fn test_today_falls_back_to_two_earliest() {
    let h = harness(vec![
        event("Third", "X", "2025-09-14T17:00:00Z"),
        event("First", "X", "2025-09-11T00:15:00Z"),
        event("Second", "X", "2025-09-14T13:30:00Z"),
    ]);
    let resp = h.service.today(League::Nfl).await.unwrap();
    assert_eq!(homes(&resp), vec!["First", "Second"]);
}

#[tokio::test]
async fn test_today_fallback_when_todays_games_are_incomplete() {
    let h = harness(vec![
        event_without_totals("TodayBroken", "X", "2025-09-07T17:00:00Z"),
        event("Later", "X", "2025-09-11T00:15:00Z"),
    ]);
    let resp = h.service.today(League::Nfl).await.unwrap();
    // Earliest two are TodayBroken (excluded again) and Later.
    assert_eq!(homes(&resp), vec!["Later"]);
}

#[tokio::test]
async fn test_today_with_empty_upstream() {
    let h = harness(Vec::new());
    let resp = h.service.today(League::Nfl).await.unwrap();
    assert!(resp.games.is_empty());
    assert_eq!(resp.as_of, "2025-09-07T15:00:00.000000+00:00");
}

// -- Cache --

#[tokio::test]
async fn test_cache_hit_within_ttl_then_refetch() {
    let h = harness(vec![event("A", "B", "2025-09-07T17:00:00Z")]);
    let first = h.service.weekend(League::Nfl).await.unwrap();

    h.source.set_events(Vec::new());
    h.clock.advance(Duration::seconds(30));
    let second = h.service.weekend(League::Nfl).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(h.source.calls(), 1);

    h.clock.advance(Duration::seconds(15));
    let third = h.service.weekend(League::Nfl).await.unwrap();
    assert!(third.games.is_empty());
    assert_eq!(h.source.calls(), 2);
}

#[tokio::test]
async fn test_endpoints_cache_independently() {
    let h = harness(vec![event("A", "B", "2025-09-07T17:00:00Z")]);
    h.service.weekend(League::Nfl).await.unwrap();
    h.service.today(League::Nfl).await.unwrap();
    h.service.weekend(League::Cfb).await.unwrap();
    h.service.weekend(League::Nfl).await.unwrap();
    assert_eq!(h.source.calls(), 3);
}

#[tokio::test]
async fn test_errors_are_not_cached() {
    let h = harness(vec![event("A", "B", "2025-09-07T17:00:00Z")]);
    h.source.set_error(ForcedError::RateLimited);
    assert!(matches!(h.service.weekend(League::Nfl).await, Err(OddsError::RateLimited)));

    h.source.clear_error();
    let resp = h.service.weekend(League::Nfl).await.unwrap();
    assert_eq!(resp.games.len(), 1);
    assert_eq!(h.source.calls(), 2);
}

// -- Errors --

#[tokio::test]
async fn test_fetch_errors_propagate() {
    let h = harness(Vec::new());

    h.source.set_error(ForcedError::Provider(401, "bad key".into()));
    match h.service.today(League::Nfl).await {
        Err(OddsError::Provider { status, body }) => {
            assert_eq!(status, 401);
            assert_eq!(body, "bad key");
        }
        other => panic!("expected provider error, got {other:?}"),
    }

    h.source.set_error(ForcedError::Network);
    assert!(matches!(h.service.weekend(League::Cfb).await, Err(OddsError::Network(_))));

    h.source.set_error(ForcedError::Misconfigured);
    assert!(matches!(h.service.weekend(League::Nfl).await, Err(OddsError::Misconfigured(_))));
}

#[tokio::test]
async fn test_unconfigured_league_never_calls_upstream() {
    let sports = SportsConfig(HashMap::from([(
        "nfl".to_string(),
        "americanfootball_nfl".to_string(),
    )]));
    let h = harness_with_sports(Vec::new(), sports);
    assert!(matches!(
        h.service.weekend(League::Cfb).await,
        Err(OddsError::UnknownLeague(_))
    ));
    assert_eq!(h.source.calls(), 0);
}
