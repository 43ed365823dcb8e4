use std::fmt;
use std::sync::Arc;
use nd_core::config::DEFAULT_INCLUSION_THRESHOLD;
use nd_core::{Article, CategoryGroup, Vectorizer};
use crate::scoring::{best_score, score, term_vectors, vectorize_or_absent};

/// Decides which articles belong in a user's digest.
pub struct InterestMatcher {
    vectorizer: Arc<dyn Vectorizer>,
    threshold: f32,
}

impl fmt::Debug for InterestMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterestMatcher")
            .field("vectorizer", &self.vectorizer.name())
            .field("threshold", &self.threshold)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterestMatch {
    pub interest: String,
    pub score: f32,
}

impl InterestMatcher {
    pub fn new(vectorizer: Arc<dyn Vectorizer>) -> Self {
        Self::with_threshold(vectorizer, DEFAULT_INCLUSION_THRESHOLD)
    }

    /// An article is included only when its best score is strictly above `threshold`.
    pub fn with_threshold(vectorizer: Arc<dyn Vectorizer>, threshold: f32) -> Self {
        Self { vectorizer, threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Best-scoring interest for the article's title and summary, ignoring the
    /// threshold. `None` when there are no interests or no vectorizable terms.
    /// Ties go to the interest listed first.
    pub async fn best_interest(&self, article: &Article, interests: &[String]) -> Option<InterestMatch> {
        if interests.is_empty() {
            return None;
        }

        let vectorizer = self.vectorizer.as_ref();
        let text = format!("{} {}", article.title, article.summary);
        let terms = term_vectors(vectorizer, &text).await;
        if terms.is_empty() {
            return None;
        }

        let mut scores = Vec::with_capacity(interests.len());
        for interest in interests {
            let target = vectorize_or_absent(vectorizer, interest).await;
            scores.push((interest.as_str(), score(vectorizer, &terms, target.as_deref())));
        }
        tracing::debug!("Interest scores for '{}': {:?}", article.title, scores);

        best_score(scores).map(|(interest, score)| InterestMatch {
            interest: interest.to_string(),
            score,
        })
    }

    /// The matched interest, if the article clears the threshold.
    pub async fn match_article(&self, article: &Article, interests: &[String]) -> Option<InterestMatch> {
        self.best_interest(article, interests)
            .await
            .filter(|m| m.score > self.threshold)
    }

    /// Articles from `groups` that match `interests`, annotated with the
    /// matched interest. Group order and in-group order are preserved.
    pub async fn personalize(&self, groups: &[CategoryGroup], interests: &[String]) -> Vec<Article> {
        let mut selected = Vec::new();
        if interests.is_empty() {
            return selected;
        }

        for group in groups {
            for article in &group.articles {
                if let Some(matched) = self.match_article(article, interests).await {
                    tracing::debug!(
                        "✅ '{}' matched '{}' ({:.2})",
                        article.title,
                        matched.interest,
                        matched.score
                    );
                    let mut article = article.clone();
                    article.matched_interest = Some(matched.interest);
                    selected.push(article);
                }
            }
        }
        selected
    }
}
