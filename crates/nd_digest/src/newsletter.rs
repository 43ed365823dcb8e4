use nd_core::config::DEFAULT_TRENDING_COUNT;
use nd_core::{group_by_category, Article};

/// Renders a personalized article list as a Markdown newsletter.
///
/// Output depends only on the user name and the list as given, so rendering
/// the same list twice yields the same bytes.
#[derive(Debug, Clone)]
pub struct DigestAssembler {
    trending_count: usize,
}

impl Default for DigestAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_TRENDING_COUNT)
    }
}

impl DigestAssembler {
    pub fn new(trending_count: usize) -> Self {
        Self { trending_count }
    }

    /// Articles shown in the trending section: the first few, unranked.
    pub fn trending<'a>(&self, articles: &'a [Article]) -> &'a [Article] {
        &articles[..articles.len().min(self.trending_count)]
    }

    pub fn render(&self, user_name: &str, articles: &[Article]) -> String {
        let mut out = format!("# Personalized Newsletter for {}\n\n", user_name);

        out.push_str("## Trending Articles\n");
        for article in self.trending(articles) {
            out.push_str(&format!(
                "- [{}]({}) ({})\n",
                article.title,
                article.link,
                article.matched_interest.as_deref().unwrap_or_default()
            ));
        }

        out.push_str("\n## Detailed Articles by Category\n");
        for group in group_by_category(articles.iter().cloned()) {
            out.push_str(&format!("### {}\n", group.category));
            for article in &group.articles {
                out.push_str(&format!("[{}]({})\n\n{}\n\n", article.title, article.link, article.summary));
            }
        }
        out
    }
}
