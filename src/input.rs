//! Loading tweet payloads
//!
//! Accepts either a bare JSON array of tweets or the platform's response envelope:
//!
//! ```json
//! { "data": [ { "id": "1", "authorId": "u1", ... } ],
//!   "includes": { "users": [ { "id": "u1", "username": "alice", ... } ] } }
//! ```
//!
//! Users from `includes` are attached to tweets that do not already carry an
//! author.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use crate::error::ThreadingError;
use crate::models::{Author, Tweet};

#[derive(Debug, Default, Deserialize)]
struct Includes {
    #[serde(default)]
    users: Vec<Author>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TweetPayload {
    List(Vec<Tweet>),
    Envelope {
        data: Vec<Tweet>,
        #[serde(default)]
        includes: Includes,
    },
}

impl TweetPayload {
    fn into_tweets(self) -> Vec<Tweet> {
        match self {
            TweetPayload::List(tweets) => tweets,
            TweetPayload::Envelope { data, includes } => attach_authors(data, includes.users),
        }
    }
}

fn attach_authors(mut tweets: Vec<Tweet>, users: Vec<Author>) -> Vec<Tweet> {
    let by_id: HashMap<String, Author> = users
        .into_iter()
        .map(|author| (author.id.clone(), author))
        .collect();

    for tweet in tweets.iter_mut().filter(|tweet| tweet.author.is_none()) {
        tweet.author = by_id.get(&tweet.author_id).cloned();
    }

    tweets
}

/// Decode tweets from any reader
pub fn load_tweets<R: Read>(reader: R) -> Result<Vec<Tweet>, ThreadingError> {
    let payload: TweetPayload = serde_json::from_reader(reader)?;
    let tweets = payload.into_tweets();
    log::debug!("loaded {} tweets", tweets.len());
    Ok(tweets)
}

/// Decode tweets from a JSON file
pub fn load_tweets_from_path(path: &Path) -> Result<Vec<Tweet>, ThreadingError> {
    let file = File::open(path).map_err(|err| ThreadingError::io(path.display().to_string(), err))?;
    load_tweets(BufReader::new(file))
}
