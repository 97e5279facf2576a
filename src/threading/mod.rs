//! Tweet thread reconstruction
//!
//! Rebuilds conversation threads from a flat, unordered collection of tweets that
//! carry reply-chain metadata, and merges them with the remaining tweets into one
//! newest-first timeline.
//!
//! ## Threading Strategy
//!
//! 1. **Self-threads**: same-author continuation chains, found through the
//!    platform's `isSelfThread` marker and same-author reply edges
//! 2. **Generic groups**: remaining tweets grouped by
//!    `conversationId ?? threadId ?? id` and ordered by walking their reply tree
//! 3. **Standalone tweets**: anything left over
//! 4. **Timeline**: threads (dated by their first tweet) and standalone tweets,
//!    newest first
//!
//! Every pass orders chains the same way (see `chain_order`): explicit positions
//! when complete, then timestamps, then snowflake id magnitude.
//!
//! The engine never fails. Malformed input degrades to a fallback ordering and
//! the fallback is reported as a [`Degradation`].
//!
//! ## Module Structure
//!
//! - `container`: per-run working table of tweets
//! - `snowflake`: arbitrary-precision id comparison
//! - `chain_order`: the shared chain ordering primitive
//! - `algorithm`: self-thread detection and generic grouping
//! - `timeline`: final assembly

pub mod algorithm;
pub mod chain_order;
pub mod container;
pub mod snowflake;
pub mod timeline;

pub use chain_order::{parse_created_at, sort_chain};
pub use snowflake::{SnowflakeId, compare_ids};

use crate::config::ThreadingConfig;
use crate::error::Degradation;
use crate::models::{TimelineItem, Tweet};
use algorithm::{detect_self_threads, group_replies};
use container::TweetTable;
use timeline::assemble_timeline;

/// Timeline produced by one reconstruction run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconstruction {
    pub items: Vec<TimelineItem>,

    /// Fallbacks taken along the way, in the order they happened
    pub degradations: Vec<Degradation>,
}

#[derive(Debug, Clone, Default)]
pub struct ThreadReconstructor {
    config: ThreadingConfig,
}

impl ThreadReconstructor {
    pub fn new(config: ThreadingConfig) -> Self {
        ThreadReconstructor { config }
    }

    pub fn config(&self) -> &ThreadingConfig {
        &self.config
    }

    /// Reconstruct threads and the timeline from `tweets`
    ///
    /// The input is copied; positions are stamped on the copies only.
    pub fn reconstruct(&self, tweets: &[Tweet]) -> Reconstruction {
        let mut degradations = Vec::new();
        let table = TweetTable::new(tweets.to_vec(), &mut degradations);
        let mut processed = vec![false; table.len()];

        // Step 1: Same-author continuation chains
        let mut chains = detect_self_threads(&table, &mut processed);

        // Step 2: Conversation groups over what is left
        let grouped = group_replies(&table, &mut processed, &self.config, &mut degradations);
        chains.extend(grouped.threads);

        // Step 3: Anything never claimed stands alone
        let mut standalone = grouped.standalone;
        standalone.extend((0..table.len()).filter(|&idx| !processed[idx]));

        // Step 4: Merge into one newest-first timeline
        let items = assemble_timeline(table, chains, standalone);

        log::debug!(
            "reconstructed {} tweets into {} timeline items ({} threads, {} degradations)",
            tweets.len(),
            items.len(),
            items.iter().filter(|item| item.is_thread()).count(),
            degradations.len()
        );

        Reconstruction {
            items,
            degradations,
        }
    }
}

/// Reconstruct the timeline for `tweets` with the default configuration
pub fn reconstruct(tweets: &[Tweet]) -> Vec<TimelineItem> {
    ThreadReconstructor::default().reconstruct(tweets).items
}

/// Flatten timeline items back into a tweet list, in timeline order
pub fn flatten_timeline(items: &[TimelineItem]) -> Vec<Tweet> {
    items
        .iter()
        .flat_map(|item| item.tweets().iter().cloned())
        .collect()
}
