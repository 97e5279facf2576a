//! Self-thread detection
//!
//! Finds chains of tweets where one author keeps replying to themselves, using two
//! signals:
//!
//! - the platform's explicit `isSelfThread` marker, keyed by `conversationId`
//! - same-author reply edges, keyed by `conversationId ?? threadId ?? inReplyToTweetId`
//!
//! Tweets sharing a key, or joined by a reply edge, fall into one equivalence set.
//! Sets with more than one member become thread candidates.

use std::collections::{BTreeMap, HashMap};

use super::super::chain_order::order_chain;
use super::super::container::TweetTable;

/// Union-find over table indices
struct EquivalenceSets {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl EquivalenceSets {
    fn new(len: usize) -> Self {
        EquivalenceSets {
            parent: (0..len).collect(),
            size: vec![1; len],
        }
    }

    fn find(&mut self, idx: usize) -> usize {
        let mut root = idx;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        // Path compression
        let mut current = idx;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }

        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let (mut a, mut b) = (self.find(a), self.find(b));
        if a == b {
            return;
        }
        if self.size[a] < self.size[b] {
            std::mem::swap(&mut a, &mut b);
        }
        self.parent[b] = a;
        self.size[a] += self.size[b];
    }
}

fn join_key<'a>(
    sets: &mut EquivalenceSets,
    key_owners: &mut HashMap<&'a str, usize>,
    key: &'a str,
    idx: usize,
) {
    let owner = *key_owners.entry(key).or_insert(idx);
    sets.union(owner, idx);
}

/// Detect self-threads and mark their members as processed
///
/// ## Returns
///
/// One ordered chain (table indices) per detected self-thread, each with at
/// least two members. Chains are listed in order of their lowest table index.
pub fn detect_self_threads(table: &TweetTable, processed: &mut [bool]) -> Vec<Vec<usize>> {
    let mut sets = EquivalenceSets::new(table.len());

    // First member seen under each key; later members join its set
    let mut key_owners: HashMap<&str, usize> = HashMap::new();

    for idx in 0..table.len() {
        if processed[idx] {
            continue;
        }
        let tweet = table.tweet(idx);
        let parent = table.parent_of(idx).filter(|&p| !processed[p]);

        if tweet.is_self_thread {
            if let Some(conversation_id) = tweet.conversation_id.as_deref() {
                join_key(&mut sets, &mut key_owners, conversation_id, idx);
                if let Some(parent_idx) = parent {
                    sets.union(idx, parent_idx);
                }
            }
        }

        if let Some(parent_idx) = parent {
            if table.same_author(idx, parent_idx) {
                let key = tweet
                    .conversation_id
                    .as_deref()
                    .or(tweet.thread_id.as_deref())
                    .or(tweet.in_reply_to_tweet_id.as_deref());
                if let Some(key) = key {
                    join_key(&mut sets, &mut key_owners, key, idx);
                }
                sets.union(idx, parent_idx);
            }
        }
    }

    // Collect members per set root, in ascending table order
    let mut members_by_root: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for idx in 0..table.len() {
        if processed[idx] {
            continue;
        }
        let root = sets.find(idx);
        if sets.size[root] > 1 {
            members_by_root.entry(root).or_default().push(idx);
        }
    }

    let mut chains: Vec<Vec<usize>> = members_by_root.into_values().collect();
    chains.sort_by_key(|members| members[0]);

    for chain in &mut chains {
        order_chain(table, chain);
        for &idx in chain.iter() {
            processed[idx] = true;
        }
        log::trace!(
            "self-thread of {} tweets rooted at {}",
            chain.len(),
            table.tweet(chain[0]).id
        );
    }

    log::debug!("detected {} self-threads", chains.len());
    chains
}
