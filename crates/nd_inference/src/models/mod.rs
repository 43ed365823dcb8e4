use std::sync::Arc;
use nd_core::{Error, Result, VectorizerSettings, Vectorizer};
use crate::cache::CachedVectorizer;

pub mod dummy;
pub mod remote;
pub mod word_vectors;

pub use dummy::DummyVectorizer;
pub use remote::RemoteEmbeddings;
pub use word_vectors::WordVectors;

/// Builds the configured model, wrapped in a per-run cache.
pub async fn create_vectorizer(settings: &VectorizerSettings) -> Result<Arc<dyn Vectorizer>> {
    let model: Arc<dyn Vectorizer> = match settings {
        VectorizerSettings::WordVectors { path } => Arc::new(WordVectors::load(path).await?),
        VectorizerSettings::Remote { url, model, api_key_env } => {
            let api_key = match api_key_env {
                Some(var) => Some(std::env::var(var).map_err(|_| {
                    Error::Config(format!("environment variable {} is not set", var))
                })?),
                None => None,
            };
            Arc::new(RemoteEmbeddings::new(url, model, api_key))
        }
        VectorizerSettings::Dummy => {
            tracing::warn!("⚠️ Using the dummy vectorizer; categories and interest matches will not be meaningful");
            Arc::new(DummyVectorizer)
        }
    };

    Ok(Arc::new(CachedVectorizer::new(model)))
}
