use thiserror::Error;

/// Hard failures at the I/O edge (loading tweet payloads).
///
/// The reconstruction engine itself never fails; see [`Degradation`].
#[derive(Debug, Error)]
pub enum ThreadingError {
    #[error("failed to read tweets from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode tweet payload: {0}")]
    Json(#[from] serde_json::Error),
}

impl ThreadingError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        ThreadingError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Soft fallbacks taken while reconstructing threads from malformed input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Degradation {
    #[error("tweet {tweet_id} has unparseable timestamp `{raw}`, ordering by id")]
    TimestampParseFailure { tweet_id: String, raw: String },
    #[error("group {group_key} has {candidates} root candidates, using the earliest")]
    AmbiguousRoot { group_key: String, candidates: usize },
    #[error("reply walk of group {group_key} reached {reached} of {members} tweets, sorting whole group")]
    DisconnectedGroup {
        group_key: String,
        reached: usize,
        members: usize,
    },
    #[error("reply cycle in group {group_key} through tweets {tweet_ids:?}")]
    CycleDetected {
        group_key: String,
        tweet_ids: Vec<String>,
    },
    #[error("reply walk of group {group_key} stopped descending at depth {max_depth}")]
    DepthLimitReached { group_key: String, max_depth: usize },
}
