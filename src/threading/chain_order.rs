//! Chain ordering shared by every reconstruction pass
//!
//! A chain is ordered by, in priority:
//!
//! 1. Explicit `threadPosition`/`threadIndex`, only when every member has one
//! 2. `createdAt` ascending
//! 3. Snowflake id magnitude
//!
//! Timestamps only take part when every member of the chain has a parseable
//! one. A single malformed `createdAt` drops the whole chain to id order, which
//! keeps the comparison total and still agrees with every pairwise fallback.

use chrono::{DateTime, Utc};

use super::container::TweetTable;
use super::snowflake::SnowflakeId;
use crate::models::Tweet;

/// Legacy v1.1 `created_at` format, e.g. `Wed Oct 10 20:19:24 +0000 2018`
const LEGACY_TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Parse a raw `createdAt` value
///
/// Tries RFC 3339 first, then the legacy platform format, then the free-form
/// formats understood by `dateparser`.
pub fn parse_created_at(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_str(raw, LEGACY_TIMESTAMP_FORMAT) {
        return Some(dt.with_timezone(&Utc));
    }

    dateparser::parse(raw).ok().map(|dt| dt.with_timezone(&Utc))
}

/// Sort key combining the parsed timestamp and the id
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ChronoKey<'a> {
    created_at: Option<DateTime<Utc>>,
    id: SnowflakeId<'a>,
}

impl<'a> ChronoKey<'a> {
    pub fn new(created_at: Option<DateTime<Utc>>, id: &'a str) -> Self {
        ChronoKey {
            created_at,
            id: SnowflakeId::new(id),
        }
    }

    /// The same key ordered by id alone
    pub fn undated(self) -> Self {
        ChronoKey {
            created_at: None,
            ..self
        }
    }
}

/// Order `members` (indices into `table`) as one chain
pub fn order_chain(table: &TweetTable, members: &mut [usize]) {
    let all_positioned = members
        .iter()
        .all(|&idx| table.tweet(idx).explicit_position().is_some());
    let all_dated = members.iter().all(|&idx| table.created_at(idx).is_some());

    let key = |idx: usize| {
        let key = table.chrono_key(idx);
        if all_dated { key } else { key.undated() }
    };

    if all_positioned {
        members.sort_by_cached_key(|&idx| (table.tweet(idx).explicit_position(), key(idx)));
    } else {
        members.sort_by_cached_key(|&idx| key(idx));
    }
}

/// Earliest member of `members` in chain order
pub fn earliest(table: &TweetTable, members: &[usize]) -> Option<usize> {
    let mut ordered = members.to_vec();
    order_chain(table, &mut ordered);
    ordered.first().copied()
}

/// Sort a standalone list of tweets as one chain and stamp their positions
pub fn sort_chain(tweets: &mut Vec<Tweet>) {
    let table = TweetTable::from_ordered(std::mem::take(tweets));
    let mut order: Vec<usize> = (0..table.len()).collect();
    order_chain(&table, &mut order);

    let mut slots: Vec<Option<Tweet>> = table.into_tweets().into_iter().map(Some).collect();
    for (position, idx) in order.into_iter().enumerate() {
        if let Some(mut tweet) = slots[idx].take() {
            tweet.stamp_position(position);
            tweets.push(tweet);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(tweets: &[Tweet]) -> Vec<&str> {
        tweets.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_parse_formats() {
        let expected = DateTime::parse_from_rfc3339("2018-10-10T20:19:24Z")
            .unwrap()
            .with_timezone(&Utc);

        assert_eq!(parse_created_at("2018-10-10T20:19:24Z"), Some(expected));
        assert_eq!(parse_created_at("2018-10-10T22:19:24+02:00"), Some(expected));
        assert_eq!(
            parse_created_at("Wed Oct 10 20:19:24 +0000 2018"),
            Some(expected)
        );
        assert_eq!(parse_created_at("2018-10-10 20:19:24 UTC"), Some(expected));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_created_at(""), None);
        assert_eq!(parse_created_at("   "), None);
        assert_eq!(parse_created_at("not a date"), None);
    }

    #[test]
    fn test_orders_by_timestamp() {
        let mut tweets = vec![
            Tweet::new("1", "u1", "2024-01-01T00:02:00Z"),
            Tweet::new("2", "u1", "2024-01-01T00:00:00Z"),
            Tweet::new("3", "u1", "2024-01-01T00:01:00Z"),
        ];
        sort_chain(&mut tweets);

        assert_eq!(ids(&tweets), vec!["2", "3", "1"]);
        let positions: Vec<_> = tweets.iter().map(|t| t.thread_position).collect();
        assert_eq!(positions, vec![Some(0), Some(1), Some(2)]);
        assert_eq!(tweets[2].thread_index, Some(2));
    }

    #[test]
    fn test_equal_timestamps_fall_back_to_id_magnitude() {
        let mut tweets = vec![
            Tweet::new("10000000000000000002", "u1", "2024-01-01T00:00:00Z"),
            Tweet::new("10000000000000000001", "u1", "2024-01-01T00:00:00Z"),
        ];
        sort_chain(&mut tweets);

        assert_eq!(
            ids(&tweets),
            vec!["10000000000000000001", "10000000000000000002"]
        );
    }

    #[test]
    fn test_malformed_timestamps_use_id() {
        let mut tweets = vec![
            Tweet::new("300", "u1", "garbage"),
            Tweet::new("20", "u1", "also garbage"),
        ];
        sort_chain(&mut tweets);

        assert_eq!(ids(&tweets), vec!["20", "300"]);
    }

    #[test]
    fn test_one_malformed_timestamp_orders_chain_by_id() {
        let mut tweets = vec![
            Tweet::new("3", "u1", "2024-01-01T10:02:00Z"),
            Tweet::new("2", "u1", "garbage"),
            Tweet::new("1", "u1", "2024-01-01T10:00:00Z"),
        ];
        sort_chain(&mut tweets);
        assert_eq!(ids(&tweets), vec!["1", "2", "3"]);

        // Timestamps that disagree with the ids are ignored too
        let mut tweets = vec![
            Tweet::new("5", "u1", "2024-01-01T10:00:00Z"),
            Tweet::new("1", "u1", "2024-01-01T10:05:00Z"),
            Tweet::new("3", "u1", "garbage"),
        ];
        sort_chain(&mut tweets);
        assert_eq!(ids(&tweets), vec!["1", "3", "5"]);
    }

    #[test]
    fn test_explicit_positions_win_over_malformed_timestamps() {
        let mut first = Tweet::new("9", "u1", "garbage");
        first.thread_position = Some(0);
        let mut second = Tweet::new("2", "u1", "2024-01-01T00:00:00Z");
        second.thread_position = Some(1);

        let mut tweets = vec![second, first];
        sort_chain(&mut tweets);
        assert_eq!(ids(&tweets), vec!["9", "2"]);
    }

    #[test]
    fn test_explicit_positions_win_when_complete() {
        let mut first = Tweet::new("5", "u1", "2024-01-01T00:05:00Z");
        first.thread_position = Some(0);
        let mut second = Tweet::new("1", "u1", "2024-01-01T00:00:00Z");
        second.thread_index = Some(1);

        let mut tweets = vec![second, first];
        sort_chain(&mut tweets);
        assert_eq!(ids(&tweets), vec!["5", "1"]);
    }

    #[test]
    fn test_partial_positions_are_ignored() {
        let mut positioned = Tweet::new("5", "u1", "2024-01-01T00:05:00Z");
        positioned.thread_position = Some(0);
        let unpositioned = Tweet::new("1", "u1", "2024-01-01T00:00:00Z");

        let mut tweets = vec![positioned, unpositioned];
        sort_chain(&mut tweets);
        assert_eq!(ids(&tweets), vec!["1", "5"]);
    }
}
