use serde::{Deserialize, Serialize};

// ===== Author & Tweet Models =====

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub media_key: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub preview_image_url: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TweetMetrics {
    pub retweet_count: u64,
    pub reply_count: u64,
    pub like_count: u64,
    pub quote_count: u64,
    pub impression_count: Option<u64>,
}

/// A single post as delivered by the upstream proxy.
///
/// Everything except `thread_position`/`thread_index` is treated as read-only by
/// the engine. Those two fields are stamped on tweets that end up inside a
/// [`Thread`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tweet {
    /// Snowflake id, kept as a string because it exceeds f64 precision
    pub id: String,

    pub author_id: String,

    /// Resolved author record, when the caller attached one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,

    #[serde(default)]
    pub conversation_id: Option<String>,

    #[serde(default)]
    pub thread_id: Option<String>,

    #[serde(default)]
    pub in_reply_to_tweet_id: Option<String>,

    #[serde(default)]
    pub in_reply_to_user_id: Option<String>,

    /// Explicit platform marker for same-author continuation tweets
    #[serde(default)]
    pub is_self_thread: bool,

    /// Raw timestamp; may be malformed
    #[serde(default)]
    pub created_at: String,

    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub media: Vec<Media>,

    #[serde(default)]
    pub metrics: TweetMetrics,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_position: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_index: Option<usize>,
}

impl Tweet {
    /// Create a bare tweet with no reply metadata
    pub fn new(
        id: impl Into<String>,
        author_id: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Tweet {
            id: id.into(),
            author_id: author_id.into(),
            author: None,
            conversation_id: None,
            thread_id: None,
            in_reply_to_tweet_id: None,
            in_reply_to_user_id: None,
            is_self_thread: false,
            created_at: created_at.into(),
            text: String::new(),
            media: Vec::new(),
            metrics: TweetMetrics::default(),
            thread_position: None,
            thread_index: None,
        }
    }

    pub fn replying_to(mut self, tweet_id: impl Into<String>) -> Self {
        self.in_reply_to_tweet_id = Some(tweet_id.into());
        self
    }

    pub fn in_conversation(mut self, conversation_id: impl Into<String>) -> Self {
        self.conversation_id = Some(conversation_id.into());
        self
    }

    pub fn with_thread_id(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_author(mut self, author: Author) -> Self {
        self.author = Some(author);
        self
    }

    pub fn marked_self_thread(mut self) -> Self {
        self.is_self_thread = true;
        self
    }

    /// Position supplied by the caller or stamped by a previous run
    pub fn explicit_position(&self) -> Option<usize> {
        self.thread_position.or(self.thread_index)
    }

    /// Key used by the generic grouper: `conversationId ?? threadId ?? id`
    pub fn grouping_key(&self) -> &str {
        self.conversation_id
            .as_deref()
            .or(self.thread_id.as_deref())
            .unwrap_or(&self.id)
    }

    pub(crate) fn stamp_position(&mut self, position: usize) {
        self.thread_position = Some(position);
        self.thread_index = Some(position);
    }
}

// ===== Reconstructed Output =====

/// Two or more tweets forming one reply chain, in chain order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    /// Id of the first tweet in the chain
    pub id: String,
    pub author_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    pub created_at: String,
    pub tweets: Vec<Tweet>,
}

impl Thread {
    /// Wrap an ordered chain. Returns the tweets back when fewer than two remain.
    pub fn from_chain(tweets: Vec<Tweet>) -> Result<Self, Vec<Tweet>> {
        if tweets.len() < 2 {
            return Err(tweets);
        }

        let first = &tweets[0];
        Ok(Thread {
            id: first.id.clone(),
            author_id: first.author_id.clone(),
            author: first.author.clone(),
            created_at: first.created_at.clone(),
            tweets,
        })
    }

    /// First tweet of the chain; `None` only for a hand-built or decoded empty thread
    pub fn root(&self) -> Option<&Tweet> {
        self.tweets.first()
    }

    pub fn len(&self) -> usize {
        self.tweets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweets.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TimelineItem {
    Tweet(Tweet),
    Thread(Thread),
}

impl TimelineItem {
    /// Build the right variant for an ordered chain; `None` when it is empty.
    pub fn from_chain(tweets: Vec<Tweet>) -> Option<Self> {
        match Thread::from_chain(tweets) {
            Ok(thread) => Some(TimelineItem::Thread(thread)),
            Err(mut rest) => rest.pop().map(TimelineItem::Tweet),
        }
    }

    /// The tweet whose timestamp places this item on the timeline
    pub fn anchor(&self) -> Option<&Tweet> {
        match self {
            TimelineItem::Tweet(tweet) => Some(tweet),
            TimelineItem::Thread(thread) => thread.root(),
        }
    }

    pub fn effective_created_at(&self) -> &str {
        match self {
            TimelineItem::Tweet(tweet) => &tweet.created_at,
            TimelineItem::Thread(thread) => &thread.created_at,
        }
    }

    pub fn tweets(&self) -> &[Tweet] {
        match self {
            TimelineItem::Tweet(tweet) => std::slice::from_ref(tweet),
            TimelineItem::Thread(thread) => &thread.tweets,
        }
    }

    pub fn is_thread(&self) -> bool {
        matches!(self, TimelineItem::Thread(_))
    }
}
