use std::fmt;
use nd_core::{Result, Vector, Vectorizer};

const DIMENSIONS: usize = 768;

/// Offline placeholder model: a character-frequency embedding. Deterministic
/// and always available, but carries no semantics.
pub struct DummyVectorizer;

impl fmt::Debug for DummyVectorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyVectorizer").finish()
    }
}

#[async_trait::async_trait]
impl Vectorizer for DummyVectorizer {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn vectorize(&self, text: &str) -> Result<Option<Vector>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let mut embedding = vec![0.0; DIMENSIONS];

        // Use text length as a feature
        let text_len = text.chars().count() as f32;
        embedding[0] = text_len / 1000.0;

        // Character frequencies, bucketed by code point
        for c in text.to_lowercase().chars() {
            let bucket = 1 + (c as u32 as usize % (DIMENSIONS - 1));
            embedding[bucket] += 1.0 / text_len;
        }

        Ok(Some(embedding))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dummy_model() {
        let model = DummyVectorizer;

        let embedding = model.vectorize("Test text").await.unwrap().unwrap();
        assert_eq!(embedding.len(), 768);
        assert!(embedding[0] > 0.0); // Text length feature should be non-zero

        let again = model.vectorize("Test text").await.unwrap().unwrap();
        assert_eq!(embedding, again);

        assert!(model.vectorize("   ").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_identical_text_is_maximally_similar() {
        let model = DummyVectorizer;
        let a = model.vectorize("football").await.unwrap().unwrap();
        let b = model.vectorize("Football").await.unwrap().unwrap();
        assert!((model.similarity(&a, &b) - 1.0).abs() < 1e-5);
    }
}
