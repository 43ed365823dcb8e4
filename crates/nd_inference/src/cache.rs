use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use async_trait::async_trait;
use tokio::sync::RwLock;
use nd_core::{Result, Vector, Vectorizer};

/// Memoizes another vectorizer for the lifetime of a run. Errors are not
/// cached, so a transient failure is retried the next time the text comes up.
pub struct CachedVectorizer {
    inner: Arc<dyn Vectorizer>,
    cache: RwLock<HashMap<String, Option<Vector>>>,
}

impl CachedVectorizer {
    pub fn new(inner: Arc<dyn Vectorizer>) -> Self {
        Self {
            inner,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub async fn cached_entries(&self) -> usize {
        self.cache.read().await.len()
    }
}

impl fmt::Debug for CachedVectorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedVectorizer")
            .field("inner", &self.inner)
            .finish()
    }
}

#[async_trait]
impl Vectorizer for CachedVectorizer {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn vectorize(&self, text: &str) -> Result<Option<Vector>> {
        if let Some(hit) = self.cache.read().await.get(text) {
            return Ok(hit.clone());
        }
        let vector = self.inner.vectorize(text).await?;
        self.cache.write().await.insert(text.to_string(), vector.clone());
        Ok(vector)
    }

    fn similarity(&self, a: &[f32], b: &[f32]) -> f32 {
        self.inner.similarity(a, b)
    }
}
