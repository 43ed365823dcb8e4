use std::collections::HashSet;
use std::path::Path;
use serde::{Deserialize, Serialize};
use url::Url;
use crate::types::UserProfile;
use crate::{Error, Result};

pub const DEFAULT_MAX_ARTICLES_PER_CATEGORY: usize = 5;
pub const DEFAULT_TRENDING_COUNT: usize = 5;
pub const DEFAULT_INCLUSION_THRESHOLD: f32 = 0.5;
pub const DEFAULT_SMTP_PASSWORD_ENV: &str = "ND_SMTP_PASSWORD";

/// Everything a digest run needs besides its collaborators.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DigestConfig {
    #[serde(default)]
    pub pipeline: PipelineSettings,
    #[serde(default)]
    pub vectorizer: VectorizerSettings,
    #[serde(default)]
    pub smtp: SmtpSettings,
    #[serde(default)]
    pub categories: Vec<CategoryFeeds>,
    #[serde(default)]
    pub users: Vec<UserProfile>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub max_articles_per_category: usize,
    pub trending_count: usize,
    pub inclusion_threshold: f32,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_articles_per_category: DEFAULT_MAX_ARTICLES_PER_CATEGORY,
            trending_count: DEFAULT_TRENDING_COUNT,
            inclusion_threshold: DEFAULT_INCLUSION_THRESHOLD,
        }
    }
}

/// A category label and the feeds bucketed under it, in fetch order.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CategoryFeeds {
    pub name: String,
    #[serde(default)]
    pub feeds: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VectorizerSettings {
    /// GloVe / word2vec text file
    WordVectors {
        #[serde(default)]
        path: String,
    },
    /// OpenAI-compatible embeddings endpoint
    Remote {
        #[serde(default = "default_remote_url")]
        url: String,
        #[serde(default = "default_remote_model")]
        model: String,
        #[serde(default)]
        api_key_env: Option<String>,
    },
    /// Offline character-frequency vectors. Too coarse to separate topics,
    /// so only for trying the pipeline without a model.
    Dummy,
}

impl Default for VectorizerSettings {
    fn default() -> Self {
        Self::WordVectors { path: String::new() }
    }
}

fn default_remote_url() -> String {
    "http://localhost:11434/v1".to_string()
}

fn default_remote_model() -> String {
    "nomic-embed-text".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SmtpSettings {
    /// An empty host puts delivery in no-op mode.
    pub host: String,
    pub port: u16,
    pub starttls: bool,
    pub from: String,
    pub username: Option<String>,
    /// Name of the environment variable holding the SMTP password.
    pub password_env: String,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 587,
            starttls: true,
            from: "News Digest <digest@example.com>".to_string(),
            username: None,
            password_env: DEFAULT_SMTP_PASSWORD_ENV.to_string(),
        }
    }
}

impl SmtpSettings {
    pub fn password(&self) -> Option<String> {
        std::env::var(&self.password_env).ok().filter(|p| !p.is_empty())
    }
}

impl DigestConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::read(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses the file without validating it, for callers that adjust
    /// settings before calling `validate`.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(toml::from_str(&raw)?)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            return Err(Error::Config("at least one category is required".to_string()));
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            if category.name.trim().is_empty() {
                return Err(Error::Config("category names must not be empty".to_string()));
            }
            if !seen.insert(category.name.as_str()) {
                return Err(Error::Config(format!("duplicate category: {}", category.name)));
            }
            for feed in &category.feeds {
                Url::parse(feed).map_err(|e| Error::InvalidUrl(format!("{}: {}", feed, e)))?;
            }
        }

        let mut seen = HashSet::new();
        for user in &self.users {
            if !seen.insert(user.name.as_str()) {
                return Err(Error::Config(format!("duplicate user: {}", user.name)));
            }
        }

        if !self.pipeline.inclusion_threshold.is_finite() {
            return Err(Error::Config("inclusion_threshold must be a finite number".to_string()));
        }

        if let VectorizerSettings::WordVectors { path } = &self.vectorizer {
            if path.trim().is_empty() {
                return Err(Error::Config(
                    "[vectorizer] needs a path to a GloVe or word2vec file".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// The category label set, in configuration order.
    pub fn categories(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.name.clone()).collect()
    }

    pub fn user(&self, name: &str) -> Option<&UserProfile> {
        self.users.iter().find(|u| u.name == name)
    }

    /// Interests of `name`. Unknown users resolve to an empty list rather
    /// than an error, which yields an empty digest.
    pub fn interests_for(&self, name: &str) -> &[String] {
        match self.user(name) {
            Some(user) => &user.interests,
            None => {
                tracing::warn!("Unknown user '{}', using an empty interest list", name);
                &[]
            }
        }
    }
}
