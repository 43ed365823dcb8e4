pub mod config;
pub mod delivery;
pub mod error;
pub mod models;
pub mod sources;
pub mod types;

pub use config::{CategoryFeeds, DigestConfig, PipelineSettings, SmtpSettings, VectorizerSettings};
pub use delivery::{Mailer, OutgoingMessage};
pub use error::{Error, Result};
pub use models::{cosine_similarity, Vector, Vectorizer};
pub use sources::FeedSource;
pub use types::{group_by_category, Article, CategoryGroup, Feed, FeedEntry, UserProfile};
