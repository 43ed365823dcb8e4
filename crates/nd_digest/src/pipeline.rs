use std::sync::Arc;
use nd_core::{Article, CategoryGroup, DigestConfig, FeedSource, Mailer, OutgoingMessage, Result, Vectorizer};
use nd_feeds::FeedCollector;
use nd_inference::{CategoryClassifier, InterestMatcher};
use crate::delivery::{deliver, DeliveryReport};
use crate::newsletter::DigestAssembler;

/// Result of one user's pass through the pipeline.
#[derive(Debug, Clone)]
pub struct DigestRun {
    pub user: String,
    pub articles: Vec<Article>,
    pub document: String,
    pub delivery: Option<DeliveryReport>,
}

/// fetch → classify → personalize → render → deliver, in that order, once
/// per invocation.
pub struct DigestPipeline {
    config: DigestConfig,
    collector: FeedCollector,
    classifier: CategoryClassifier,
    matcher: InterestMatcher,
    assembler: DigestAssembler,
    mailer: Arc<dyn Mailer>,
}

impl DigestPipeline {
    pub fn new(
        config: DigestConfig,
        source: Arc<dyn FeedSource>,
        vectorizer: Arc<dyn Vectorizer>,
        mailer: Arc<dyn Mailer>,
    ) -> Result<Self> {
        config.validate()?;
        let settings = &config.pipeline;
        let collector = FeedCollector::with_cap(source, settings.max_articles_per_category);
        let classifier = CategoryClassifier::new(vectorizer.clone(), config.categories())?;
        let matcher = InterestMatcher::with_threshold(vectorizer, settings.inclusion_threshold);
        let assembler = DigestAssembler::new(settings.trending_count);

        Ok(Self {
            config,
            collector,
            classifier,
            matcher,
            assembler,
            mailer,
        })
    }

    pub fn config(&self) -> &DigestConfig {
        &self.config
    }

    pub async fn collect(&self) -> Vec<Article> {
        self.collector.collect(&self.config.categories).await
    }

    pub async fn classify(&self, articles: Vec<Article>) -> Vec<CategoryGroup> {
        self.classifier.classify_all(articles).await
    }

    /// Fetches and classifies the batch shared by every user of this run.
    pub async fn prepare(&self) -> Vec<CategoryGroup> {
        let articles = self.collect().await;
        self.classify(articles).await
    }

    /// An unknown user has no interests and so gets an empty selection.
    pub async fn personalize(&self, groups: &[CategoryGroup], user: &str) -> Vec<Article> {
        tracing::info!("🎯 Personalizing for {}", user);
        let interests = self.config.interests_for(user);
        let selected = self.matcher.personalize(groups, interests).await;
        tracing::info!("✨ Selected {} personalized articles", selected.len());
        selected
    }

    pub fn render(&self, user: &str, articles: &[Article]) -> String {
        self.assembler.render(user, articles)
    }

    pub async fn deliver(&self, user: &str, document: &str) -> DeliveryReport {
        let Some(profile) = self.config.user(user) else {
            tracing::warn!("No address for unknown user '{}', not sending", user);
            return DeliveryReport::Skipped {
                reason: format!("unknown user {}", user),
            };
        };

        let message = OutgoingMessage {
            to: profile.email.clone(),
            subject: format!("Your Personalized Newsletter, {}", profile.name),
            body: document.to_string(),
        };
        deliver(self.mailer.as_ref(), &message).await
    }

    /// Personalizes, renders and optionally delivers for one user over an
    /// already classified batch.
    pub async fn run_for(&self, groups: &[CategoryGroup], user: &str, send: bool) -> DigestRun {
        let articles = self.personalize(groups, user).await;
        let document = self.render(user, &articles);
        let delivery = if send {
            Some(self.deliver(user, &document).await)
        } else {
            None
        };

        DigestRun {
            user: user.to_string(),
            articles,
            document,
            delivery,
        }
    }

    pub async fn run(&self, user: &str, send: bool) -> DigestRun {
        let groups = self.prepare().await;
        self.run_for(&groups, user, send).await
    }

    /// One run per configured user, sharing a single fetch and classification.
    pub async fn run_all(&self, send: bool) -> Vec<DigestRun> {
        let groups = self.prepare().await;
        let mut runs = Vec::with_capacity(self.config.users.len());
        for user in &self.config.users {
            runs.push(self.run_for(&groups, &user.name, send).await);
        }
        runs
    }
}
