mod feed_error;
pub mod feed_reader;
mod feed_store;
pub mod feed_writer;
mod memory_feed;

pub use feed_error::FeedError;
pub use feed_reader::read_feed;
pub use feed_store::{FeedStore, StopTimeKey};
pub use feed_writer::{write_feed, OutputFormat, WriteOptions};
pub use memory_feed::Feed;

#[cfg(test)]
pub(crate) use memory_feed::test as feed_fixtures;
