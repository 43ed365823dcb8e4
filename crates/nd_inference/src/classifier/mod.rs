use std::fmt;
use std::sync::Arc;
use nd_core::{group_by_category, Article, CategoryGroup, Error, Result, Vectorizer};
use crate::scoring::{best_score, score, term_vectors, vectorize_or_absent};

/// Assigns each article the category label its summary is most similar to.
pub struct CategoryClassifier {
    vectorizer: Arc<dyn Vectorizer>,
    labels: Vec<String>,
}

impl fmt::Debug for CategoryClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CategoryClassifier")
            .field("vectorizer", &self.vectorizer.name())
            .field("labels", &self.labels)
            .finish()
    }
}

/// A chosen label and its summed similarity.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub category: String,
    pub score: f32,
}

impl CategoryClassifier {
    /// `labels` is the enumeration order used to break ties.
    pub fn new(vectorizer: Arc<dyn Vectorizer>, labels: Vec<String>) -> Result<Self> {
        if labels.is_empty() {
            return Err(Error::Config("the classifier needs at least one category".to_string()));
        }
        Ok(Self { vectorizer, labels })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Scores `summary` against every label. Always yields a label: with no
    /// vectorizable terms every score is 0 and the first label wins.
    pub async fn classify(&self, summary: &str) -> Classification {
        let vectorizer = self.vectorizer.as_ref();
        let terms = term_vectors(vectorizer, summary).await;

        let mut scores = Vec::with_capacity(self.labels.len());
        for label in &self.labels {
            let target = vectorize_or_absent(vectorizer, label).await;
            scores.push((label.as_str(), score(vectorizer, &terms, target.as_deref())));
        }
        tracing::debug!("Category scores: {:?}", scores);

        match best_score(scores) {
            Some((category, score)) => Classification {
                category: category.to_string(),
                score,
            },
            None => Classification {
                category: self.labels[0].clone(),
                score: 0.0,
            },
        }
    }

    /// Sets `article.category`, replacing any earlier classification.
    pub async fn classify_article(&self, article: &mut Article) {
        let classification = self.classify(&article.summary).await;
        article.category = Some(classification.category);
    }

    /// Classifies the whole batch and groups it by derived category, in order
    /// of first appearance.
    pub async fn classify_all(&self, mut articles: Vec<Article>) -> Vec<CategoryGroup> {
        let total = articles.len();
        tracing::info!("🏷️ Starting categorization of {} articles", total);
        for (i, article) in articles.iter_mut().enumerate() {
            self.classify_article(article).await;
            let done = i + 1;
            if done % 5 == 0 {
                tracing::info!(
                    "Categorizing... {}/{} articles ({:.1}%)",
                    done,
                    total,
                    done as f32 / total as f32 * 100.0
                );
            }
        }
        let groups = group_by_category(articles);
        tracing::info!("✨ Categorized into {} categories", groups.len());
        groups
    }
}
