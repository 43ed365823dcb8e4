pub mod cache;
pub mod classifier;
pub mod interests;
pub mod models;
pub mod scoring;
pub mod tokenize;

pub use cache::CachedVectorizer;
pub use classifier::{CategoryClassifier, Classification};
pub use interests::{InterestMatch, InterestMatcher};
pub use models::create_vectorizer;

pub mod prelude {
    pub use super::classifier::CategoryClassifier;
    pub use super::interests::InterestMatcher;
    pub use super::models::create_vectorizer;
    pub use nd_core::{Article, CategoryGroup, Error, Result, Vectorizer};
}
