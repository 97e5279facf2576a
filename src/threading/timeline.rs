//! Timeline assembly
//!
//! Merges ordered chains and standalone tweets into one newest-first sequence.

use std::cmp::Reverse;
use std::collections::VecDeque;

use super::container::TweetTable;
use super::snowflake::SnowflakeId;
use crate::models::{TimelineItem, Tweet};

enum Slot {
    Standalone(usize),
    Chain(Vec<usize>),
}

impl Slot {
    /// Index of the tweet that dates this slot
    fn anchor(&self) -> Option<usize> {
        match self {
            Slot::Standalone(idx) => Some(*idx),
            Slot::Chain(order) => order.first().copied(),
        }
    }
}

/// Stamp chain positions and build the final timeline
///
/// Items are sorted by descending effective timestamp: a thread is dated by its
/// first tweet. Ties fall back to descending id magnitude. Items whose anchor
/// timestamp is malformed are merged in by id magnitude, ahead of the first
/// dated item with a smaller id.
pub fn assemble_timeline(
    mut table: TweetTable,
    chains: Vec<Vec<usize>>,
    standalone: Vec<usize>,
) -> Vec<TimelineItem> {
    for chain in chains.iter().filter(|chain| chain.len() >= 2) {
        table.stamp_positions(chain);
    }

    let (mut dated, mut undated): (Vec<(usize, Slot)>, Vec<(usize, Slot)>) = chains
        .into_iter()
        .map(Slot::Chain)
        .chain(standalone.into_iter().map(Slot::Standalone))
        .filter_map(|slot| slot.anchor().map(|anchor| (anchor, slot)))
        .partition(|(anchor, _)| table.created_at(*anchor).is_some());

    dated.sort_by_cached_key(|(anchor, _)| Reverse(table.chrono_key(*anchor)));
    undated.sort_by_cached_key(|(anchor, _)| Reverse(SnowflakeId::new(&table.tweet(*anchor).id)));

    let slots = merge_by_id(&table, dated.into(), undated.into());

    let mut pool: Vec<Option<Tweet>> = table.into_tweets().into_iter().map(Some).collect();
    slots
        .into_iter()
        .filter_map(|slot| match slot {
            Slot::Standalone(idx) => pool[idx].take().map(TimelineItem::Tweet),
            Slot::Chain(order) => {
                let tweets: Vec<Tweet> = order.iter().filter_map(|&idx| pool[idx].take()).collect();
                TimelineItem::from_chain(tweets)
            }
        })
        .collect()
}

/// Interleave the undated slots into the dated sequence by anchor id
fn merge_by_id(
    table: &TweetTable,
    mut dated: VecDeque<(usize, Slot)>,
    mut undated: VecDeque<(usize, Slot)>,
) -> Vec<Slot> {
    let id = |anchor: usize| SnowflakeId::new(&table.tweet(anchor).id);

    let mut slots = Vec::with_capacity(dated.len() + undated.len());
    loop {
        let take_undated = match (dated.front(), undated.front()) {
            (Some((d, _)), Some((u, _))) => id(*u) > id(*d),
            (None, Some(_)) => true,
            (_, None) => false,
        };
        let next = if take_undated {
            undated.pop_front()
        } else {
            dated.pop_front()
        };
        match next {
            Some((_, slot)) => slots.push(slot),
            None => break,
        }
    }
    slots
}
