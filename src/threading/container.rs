//! Working table for one reconstruction run
//!
//! Every pass addresses tweets by their index in this table rather than by id, so
//! duplicate ids in the input stay distinct entries and are never lost.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::chain_order::{ChronoKey, parse_created_at};
use super::snowflake::compare_ids;
use crate::error::Degradation;
use crate::models::Tweet;

/// Tweets of one invocation, with timestamps parsed once and an id index.
#[derive(Debug)]
pub struct TweetTable {
    tweets: Vec<Tweet>,

    /// Parsed `createdAt`, `None` when the raw value is malformed
    created_at: Vec<Option<DateTime<Utc>>>,

    /// First index holding each id
    by_id: HashMap<String, usize>,
}

impl TweetTable {
    /// Build the table in canonical order so every pass iterates the same way
    /// no matter how the caller ordered its input.
    pub fn new(mut tweets: Vec<Tweet>, degradations: &mut Vec<Degradation>) -> Self {
        tweets.sort_by(|a, b| {
            compare_ids(&a.id, &b.id)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.author_id.cmp(&b.author_id))
                .then_with(|| a.text.cmp(&b.text))
        });

        let table = Self::from_ordered(tweets);
        for (idx, parsed) in table.created_at.iter().enumerate() {
            if parsed.is_none() {
                let tweet = &table.tweets[idx];
                log::debug!(
                    "tweet {} has unparseable timestamp `{}`",
                    tweet.id,
                    tweet.created_at
                );
                degradations.push(Degradation::TimestampParseFailure {
                    tweet_id: tweet.id.clone(),
                    raw: tweet.created_at.clone(),
                });
            }
        }

        table
    }

    /// Build the table keeping the given order
    pub fn from_ordered(tweets: Vec<Tweet>) -> Self {
        let created_at = tweets
            .iter()
            .map(|tweet| parse_created_at(&tweet.created_at))
            .collect();

        let mut by_id = HashMap::with_capacity(tweets.len());
        for (idx, tweet) in tweets.iter().enumerate() {
            by_id.entry(tweet.id.clone()).or_insert(idx);
        }

        TweetTable {
            tweets,
            created_at,
            by_id,
        }
    }

    pub fn len(&self) -> usize {
        self.tweets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweets.is_empty()
    }

    pub fn tweet(&self, idx: usize) -> &Tweet {
        &self.tweets[idx]
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// Index of the tweet `idx` replies to, when that tweet is in the table
    pub fn parent_of(&self, idx: usize) -> Option<usize> {
        let target = self.tweets[idx].in_reply_to_tweet_id.as_deref()?;
        self.index_of(target).filter(|&parent| parent != idx)
    }

    pub fn same_author(&self, a: usize, b: usize) -> bool {
        self.tweets[a].author_id == self.tweets[b].author_id
    }

    /// Parsed `createdAt` of `idx`, `None` when malformed
    pub fn created_at(&self, idx: usize) -> Option<DateTime<Utc>> {
        self.created_at[idx]
    }

    pub fn chrono_key(&self, idx: usize) -> ChronoKey<'_> {
        ChronoKey::new(self.created_at[idx], &self.tweets[idx].id)
    }

    /// Stamp zero-based chain positions following `order`
    pub fn stamp_positions(&mut self, order: &[usize]) {
        for (position, &idx) in order.iter().enumerate() {
            self.tweets[idx].stamp_position(position);
        }
    }

    pub fn into_tweets(self) -> Vec<Tweet> {
        self.tweets
    }
}
