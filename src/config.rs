use std::env;

/// Depth at which the reply walk stops descending.
pub const DEFAULT_MAX_WALK_DEPTH: usize = 10;

fn env_usize(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: usize) -> usize {
    lookup(key)
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

/// Tunables for thread reconstruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadingConfig {
    pub max_walk_depth: usize,
}

impl ThreadingConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup; missing or malformed values
    /// keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            max_walk_depth: env_usize(&lookup, "THREADING_MAX_WALK_DEPTH", DEFAULT_MAX_WALK_DEPTH),
        }
    }

    pub fn with_max_walk_depth(mut self, max_walk_depth: usize) -> Self {
        self.max_walk_depth = max_walk_depth;
        self
    }
}

impl Default for ThreadingConfig {
    fn default() -> Self {
        Self {
            max_walk_depth: DEFAULT_MAX_WALK_DEPTH,
        }
    }
}
