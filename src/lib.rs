pub mod config;
pub mod error;
pub mod input;
pub mod models;
pub mod threading;

pub use config::ThreadingConfig;
pub use error::{Degradation, ThreadingError};
pub use models::{Author, Media, Thread, TimelineItem, Tweet, TweetMetrics};
pub use threading::{Reconstruction, ThreadReconstructor, flatten_timeline, reconstruct};
