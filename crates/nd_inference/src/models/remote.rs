use std::fmt;
use std::sync::Arc;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use nd_core::{Result, Vector, Vectorizer};

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a str,
    model: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Embeddings from an OpenAI-compatible `/embeddings` endpoint (OpenAI,
/// DeepSeek, Ollama's `/v1`, ...).
pub struct RemoteEmbeddings {
    client: Arc<Client>,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl RemoteEmbeddings {
    pub fn new(base_url: &str, model: &str, api_key: Option<String>) -> Self {
        Self {
            client: Arc::new(Client::new()),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }
}

impl fmt::Debug for RemoteEmbeddings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteEmbeddings")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl Vectorizer for RemoteEmbeddings {
    fn name(&self) -> &str {
        "RemoteEmbeddings"
    }

    async fn vectorize(&self, text: &str) -> Result<Option<Vector>> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        let request = EmbeddingRequest {
            input: text,
            model: &self.model,
        };

        let mut builder = self.client
            .post(format!("{}/embeddings", self.base_url))
            .json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await?
            .error_for_status()?
            .json::<EmbeddingResponse>()
            .await?;

        Ok(response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .filter(|e| !e.is_empty()))
    }
}
