pub mod cli;
pub mod collector;
pub mod logging;
pub mod sources;

pub use cli::{handle_command, FeedArgs, FeedCommands};
pub use collector::FeedCollector;
pub use sources::{parse_feed, HttpFeedSource};

pub mod prelude {
    pub use super::collector::FeedCollector;
    pub use super::sources::HttpFeedSource;
    pub use nd_core::{Article, Error, Feed, FeedEntry, FeedSource, Result};
}
