//! Generic thread grouping
//!
//! Groups every tweet the self-thread pass did not claim, then orders each group
//! by walking its reply tree.
//!
//! ## Algorithm Overview
//!
//! 1. **Group**: tweets sharing `conversationId ?? threadId ?? id`, plus tweets
//!    linked to a member by a same-author reply edge
//! 2. **Link**: build `parent → children` from reply edges inside the group
//! 3. **Pick Root**: the member whose reply target is missing or outside the group
//! 4. **Walk**: depth-limited DFS from the root, children in chain order
//! 5. **Fallback**: if the walk misses members, sort the whole group as one chain
//!
//! Groups may mix authors when they share a conversation id; only the reply-edge
//! expansion in step 1 is restricted to a single author.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use super::super::chain_order::{earliest, order_chain};
use super::super::container::TweetTable;
use super::cycle_detection::find_reply_cycle;
use super::tree_traversal::walk_reply_tree;
use crate::config::ThreadingConfig;
use crate::error::Degradation;

/// Output of the grouping pass, as table indices
#[derive(Debug, Default, PartialEq, Eq)]
pub struct GroupedTweets {
    /// Ordered chains with at least two members
    pub threads: Vec<Vec<usize>>,

    /// Tweets whose group held only themselves
    pub standalone: Vec<usize>,
}

/// Group every unprocessed tweet and mark it processed
pub fn group_replies(
    table: &TweetTable,
    processed: &mut [bool],
    config: &ThreadingConfig,
    degradations: &mut Vec<Degradation>,
) -> GroupedTweets {
    let mut grouped = GroupedTweets::default();

    // Unprocessed tweets per grouping key, and same-author replies per parent
    let mut by_key: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    let mut replies: HashMap<usize, Vec<usize>> = HashMap::new();
    for idx in 0..table.len() {
        if processed[idx] {
            continue;
        }
        by_key
            .entry(table.tweet(idx).grouping_key())
            .or_default()
            .push(idx);
        if let Some(parent) = table.parent_of(idx) {
            if !processed[parent] && table.same_author(idx, parent) {
                replies.entry(parent).or_default().push(idx);
            }
        }
    }

    for seed in 0..table.len() {
        if processed[seed] {
            continue;
        }

        let key = table.tweet(seed).grouping_key();
        let members = collect_group(table, processed, &by_key, &replies, seed);
        for &idx in &members {
            processed[idx] = true;
        }

        if members.len() == 1 {
            grouped.standalone.push(seed);
            continue;
        }

        let order = order_group(table, key, &members, config, degradations);
        if order.len() >= 2 {
            log::trace!("group {} ordered into {} tweets", key, order.len());
            grouped.threads.push(order);
        } else {
            grouped.standalone.extend(order);
        }
    }

    log::debug!(
        "grouped {} threads and {} standalone tweets",
        grouped.threads.len(),
        grouped.standalone.len()
    );
    grouped
}

/// Members of the group seeded by `seed`, in ascending table order
fn collect_group(
    table: &TweetTable,
    processed: &[bool],
    by_key: &BTreeMap<&str, Vec<usize>>,
    replies: &HashMap<usize, Vec<usize>>,
    seed: usize,
) -> Vec<usize> {
    let mut members: BTreeSet<usize> = BTreeSet::new();
    let mut pending: Vec<usize> = by_key
        .get(table.tweet(seed).grouping_key())
        .map(|same_key| same_key.iter().copied().filter(|&idx| !processed[idx]).collect())
        .unwrap_or_default();
    pending.push(seed);

    while let Some(idx) = pending.pop() {
        if processed[idx] || !members.insert(idx) {
            continue;
        }

        if let Some(parent) = table.parent_of(idx) {
            if table.same_author(idx, parent) {
                pending.push(parent);
            }
        }
        if let Some(children) = replies.get(&idx) {
            pending.extend(children.iter().copied());
        }
    }

    members.into_iter().collect()
}

/// Order a group of two or more tweets
fn order_group(
    table: &TweetTable,
    key: &str,
    members: &[usize],
    config: &ThreadingConfig,
    degradations: &mut Vec<Degradation>,
) -> Vec<usize> {
    let member_set: HashSet<usize> = members.iter().copied().collect();

    // Reply adjacency within the group
    let mut children: HashMap<usize, Vec<usize>> = HashMap::new();
    let mut root_candidates = Vec::new();
    for &idx in members {
        match table.parent_of(idx).filter(|parent| member_set.contains(parent)) {
            Some(parent) => children.entry(parent).or_default().push(idx),
            None => root_candidates.push(idx),
        }
    }
    for replies in children.values_mut() {
        order_chain(table, replies);
    }

    let root = match root_candidates.len() {
        1 => root_candidates[0],
        0 => {
            let root = earliest(table, members).unwrap_or(members[0]);
            let cycle = find_reply_cycle(table, &member_set, root);
            report_cycle(table, key, &cycle, degradations);
            root
        }
        candidates => {
            log::debug!("group {} has {} root candidates", key, candidates);
            degradations.push(Degradation::AmbiguousRoot {
                group_key: key.to_string(),
                candidates,
            });
            earliest(table, &root_candidates).unwrap_or(root_candidates[0])
        }
    };

    let walk = walk_reply_tree(root, &children, config.max_walk_depth);

    if walk.depth_limited {
        log::debug!(
            "group {} exceeds walk depth {}",
            key,
            config.max_walk_depth
        );
        degradations.push(Degradation::DepthLimitReached {
            group_key: key.to_string(),
            max_depth: config.max_walk_depth,
        });
    }
    if !root_candidates.is_empty() && !walk.revisited.is_empty() {
        report_cycle(table, key, &walk.revisited, degradations);
    }

    if walk.order.len() == members.len() {
        return walk.order;
    }

    log::debug!(
        "group {} walk reached {} of {} tweets, sorting whole group",
        key,
        walk.order.len(),
        members.len()
    );
    degradations.push(Degradation::DisconnectedGroup {
        group_key: key.to_string(),
        reached: walk.order.len(),
        members: members.len(),
    });

    let mut order = members.to_vec();
    order_chain(table, &mut order);
    order
}

fn report_cycle(
    table: &TweetTable,
    key: &str,
    cycle: &[usize],
    degradations: &mut Vec<Degradation>,
) {
    if cycle.is_empty() {
        return;
    }
    let tweet_ids: Vec<String> = cycle.iter().map(|&idx| table.tweet(idx).id.clone()).collect();
    log::debug!("group {} has reply cycle through {:?}", key, tweet_ids);
    degradations.push(Degradation::CycleDetected {
        group_key: key.to_string(),
        tweet_ids,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tweet;

    struct Outcome {
        threads: Vec<Vec<String>>,
        standalone: Vec<String>,
        degradations: Vec<Degradation>,
    }

    fn run_with(tweets: Vec<Tweet>, config: ThreadingConfig) -> Outcome {
        let mut degradations = Vec::new();
        let table = TweetTable::new(tweets, &mut degradations);
        let mut processed = vec![false; table.len()];
        let grouped = group_replies(&table, &mut processed, &config, &mut degradations);
        assert!(processed.iter().all(|&p| p));

        let id = |idx: usize| table.tweet(idx).id.clone();
        Outcome {
            threads: grouped
                .threads
                .iter()
                .map(|chain| chain.iter().map(|&idx| id(idx)).collect())
                .collect(),
            standalone: grouped.standalone.iter().map(|&idx| id(idx)).collect(),
            degradations,
        }
    }

    fn run(tweets: Vec<Tweet>) -> Outcome {
        run_with(tweets, ThreadingConfig::default())
    }

    #[test]
    fn test_conversation_tree_walk() {
        // 1 ← 2 ← 4
        //   ← 3
        let outcome = run(vec![
            Tweet::new("1", "alice", "2024-01-01T10:00:00Z").in_conversation("1"),
            Tweet::new("2", "bob", "2024-01-01T10:01:00Z")
                .in_conversation("1")
                .replying_to("1"),
            Tweet::new("3", "carol", "2024-01-01T10:02:00Z")
                .in_conversation("1")
                .replying_to("1"),
            Tweet::new("4", "dave", "2024-01-01T10:03:00Z")
                .in_conversation("1")
                .replying_to("2"),
        ]);

        assert_eq!(outcome.threads, vec![vec!["1", "2", "4", "3"]]);
        assert!(outcome.standalone.is_empty());
        assert!(outcome.degradations.is_empty());
    }

    #[test]
    fn test_singleton_groups_are_standalone() {
        let outcome = run(vec![
            Tweet::new("1", "alice", "2024-01-01T10:00:00Z"),
            Tweet::new("2", "bob", "2024-01-01T10:01:00Z").in_conversation("77"),
        ]);

        assert!(outcome.threads.is_empty());
        assert_eq!(outcome.standalone, vec!["1", "2"]);
    }

    #[test]
    fn test_thread_id_groups_when_conversation_missing() {
        let outcome = run(vec![
            Tweet::new("5", "alice", "2024-01-01T10:05:00Z").with_thread_id("t1"),
            Tweet::new("6", "bob", "2024-01-01T10:00:00Z").with_thread_id("t1"),
        ]);

        // No reply edges: two root candidates, whole-group sort by time
        assert_eq!(outcome.threads, vec![vec!["6", "5"]]);
        assert!(matches!(
            outcome.degradations[0],
            Degradation::AmbiguousRoot { candidates: 2, .. }
        ));
        assert!(matches!(
            outcome.degradations[1],
            Degradation::DisconnectedGroup {
                reached: 1,
                members: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_cross_author_cycle_in_conversation() {
        let outcome = run(vec![
            Tweet::new("8", "alice", "2024-01-01T10:00:00Z")
                .in_conversation("c")
                .replying_to("9"),
            Tweet::new("9", "bob", "2024-01-01T10:01:00Z")
                .in_conversation("c")
                .replying_to("8"),
        ]);

        assert_eq!(outcome.threads, vec![vec!["8", "9"]]);
        assert_eq!(
            outcome.degradations,
            vec![Degradation::CycleDetected {
                group_key: "c".to_string(),
                tweet_ids: vec!["8".to_string(), "9".to_string()],
            }]
        );
    }

    #[test]
    fn test_deep_chain_falls_back_to_sort() {
        let mut tweets = vec![Tweet::new("100", "u0", "2024-01-01T10:00:00Z").in_conversation("c")];
        for i in 1..5 {
            tweets.push(
                Tweet::new(
                    format!("{}", 100 + i),
                    format!("u{}", i),
                    format!("2024-01-01T10:0{}:00Z", i),
                )
                .in_conversation("c")
                .replying_to(format!("{}", 99 + i)),
            );
        }

        let outcome = run_with(tweets, ThreadingConfig::default().with_max_walk_depth(2));
        assert_eq!(
            outcome.threads,
            vec![vec!["100", "101", "102", "103", "104"]]
        );
        assert!(outcome
            .degradations
            .iter()
            .any(|d| matches!(d, Degradation::DepthLimitReached { max_depth: 2, .. })));
        assert!(outcome
            .degradations
            .iter()
            .any(|d| matches!(d, Degradation::DisconnectedGroup { reached: 3, .. })));
    }

    #[test]
    fn test_same_author_reply_edge_joins_across_keys() {
        // 31 has no conversation id but replies to 30 by the same author
        let outcome = run(vec![
            Tweet::new("30", "alice", "2024-01-01T10:00:00Z").in_conversation("c"),
            Tweet::new("31", "alice", "2024-01-01T10:01:00Z").replying_to("30"),
        ]);

        assert_eq!(outcome.threads, vec![vec!["30", "31"]]);
    }
}
