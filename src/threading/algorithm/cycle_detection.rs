//! Reply cycle detection
//!
//! A group where every member replies to another member has no natural root: its
//! reply edges must loop somewhere. This module finds the loop so it can be
//! reported before an arbitrary root is chosen.

use std::collections::HashSet;

use super::super::container::TweetTable;

/// Find the reply cycle reached by following reply targets up from `start`
///
/// Walks the ancestry chain (`inReplyToTweetId` links) restricted to `members`.
/// The first tweet seen twice lies on a cycle; the cycle is then traced once
/// more from that tweet to collect all of its members.
///
/// ## Returns
///
/// Table indices of the tweets forming the cycle, starting at the first
/// repeated tweet, or an empty vector when the chain leaves the group or ends.
///
/// ## Example
///
/// ```text
/// A replies to B, B replies to C, C replies to B
///
/// Walking up from A: A → B → C → B (seen)
/// Result: [B, C]
/// ```
pub fn find_reply_cycle(table: &TweetTable, members: &HashSet<usize>, start: usize) -> Vec<usize> {
    let in_group = |idx: usize| table.parent_of(idx).filter(|parent| members.contains(parent));

    // Track visited nodes to detect the first repeat
    let mut visited = HashSet::new();
    let mut current = Some(start);
    let mut entry = None;

    while let Some(idx) = current {
        if !visited.insert(idx) {
            entry = Some(idx);
            break;
        }
        current = in_group(idx);
    }

    let Some(entry) = entry else {
        return Vec::new();
    };

    let mut cycle = vec![entry];
    let mut next = in_group(entry);
    while let Some(idx) = next {
        if idx == entry {
            break;
        }
        cycle.push(idx);
        next = in_group(idx);
    }

    cycle
}
