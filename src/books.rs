//! Bookmaker selection.
//!
//! Each event carries quotes from many books; the proxy serves exactly one.
//! A fixed priority list picks the preferred book, falling back to whatever
//! the provider listed first.

use std::collections::HashMap;

use crate::types::RawBookmaker;

/// Default preference order, matched against the bookmaker `title`.
pub const DEFAULT_BOOK_PRIORITY: &[&str] = &[
    "DraftKings",
    "FanDuel",
    "BetMGM",
    "Caesars",
    "PointsBet (US)",
    "bet365",
];

/// Pick one bookmaker for an event.
///
/// Duplicate titles resolve to the last occurrence. With no priority match
/// the first bookmaker in upstream order wins.
pub fn choose_book<'a, S: AsRef<str>>(
    bookmakers: &'a [RawBookmaker],
    priority: &[S],
) -> Option<&'a RawBookmaker> {
    let first = bookmakers.first()?;

    let by_title: HashMap<&str, &RawBookmaker> = bookmakers
        .iter()
        .map(|b| (b.title.as_str(), b))
        .collect();

    priority
        .iter()
        .find_map(|name| by_title.get(name.as_ref()).copied())
        .or(Some(first))
}
