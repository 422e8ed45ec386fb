pub mod feed;

pub use feed::{BroadcastFeed, ChangeFeed, NotificationStream};
