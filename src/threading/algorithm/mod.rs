//! Thread grouping passes
//!
//! - `self_thread`: same-author continuation chains (runs first)
//! - `reply_grouping`: everything else, grouped by conversation and reply edges
//!
//! Both passes work on table indices and hand back ordered chains; stamping
//! positions and building output records happens in the timeline assembler.

mod cycle_detection;
mod reply_grouping;
mod self_thread;
mod tree_traversal;

pub use reply_grouping::{GroupedTweets, group_replies};
pub use self_thread::detect_self_threads;
pub use tree_traversal::{ReplyWalk, walk_reply_tree};
