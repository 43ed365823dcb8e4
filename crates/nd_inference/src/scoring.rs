use nd_core::{Vector, Vectorizer};
use crate::tokenize::tokenize;

/// Vectorizes `text`, treating model errors as "no representation".
pub async fn vectorize_or_absent(vectorizer: &dyn Vectorizer, text: &str) -> Option<Vector> {
    match vectorizer.vectorize(text).await {
        Ok(vector) => vector,
        Err(e) => {
            tracing::warn!("⚠️ {} could not vectorize {:?}: {}", vectorizer.name(), text, e);
            None
        }
    }
}

/// Vectors of every term in `text` the model can represent, in text order.
pub async fn term_vectors(vectorizer: &dyn Vectorizer, text: &str) -> Vec<Vector> {
    let mut vectors = Vec::new();
    for term in tokenize(text) {
        if let Some(vector) = vectorize_or_absent(vectorizer, term).await {
            vectors.push(vector);
        }
    }
    vectors
}

/// Sum of similarities between each term and `target`. A missing target, or a
/// non-finite similarity, contributes nothing.
pub fn score(vectorizer: &dyn Vectorizer, terms: &[Vector], target: Option<&[f32]>) -> f32 {
    let Some(target) = target else {
        return 0.0;
    };
    terms
        .iter()
        .map(|term| vectorizer.similarity(term, target))
        .filter(|s| s.is_finite())
        .sum()
}

/// Highest-scoring candidate. Ties go to the candidate seen first and NaN
/// never wins.
pub fn best_score<'a, I>(scores: I) -> Option<(&'a str, f32)>
where
    I: IntoIterator<Item = (&'a str, f32)>,
{
    let mut best: Option<(&'a str, f32)> = None;
    for (candidate, score) in scores {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((candidate, score)),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::word_vectors::WordVectors;

    fn table() -> WordVectors {
        WordVectors::from_pairs(vec![
            ("robot", vec![1.0, 0.0]),
            ("ball", vec![0.0, 1.0]),
        ])
    }

    #[test]
    fn test_best_score_first_seen_wins_ties() {
        let best = best_score(vec![("a", 1.0), ("b", 2.0), ("c", 2.0)]);
        assert_eq!(best, Some(("b", 2.0)));

        let best = best_score(vec![("a", 0.0), ("b", 0.0)]);
        assert_eq!(best, Some(("a", 0.0)));
    }

    #[test]
    fn test_best_score_ignores_nan_and_handles_negatives() {
        assert_eq!(best_score(vec![("a", f32::NAN), ("b", -1.0)]), Some(("b", -1.0)));
        assert_eq!(best_score(vec![("a", -2.0), ("b", -1.0)]), Some(("b", -1.0)));
        assert_eq!(best_score(Vec::<(&str, f32)>::new()), None);
    }

    #[tokio::test]
    async fn test_term_vectors_skip_unknown_terms() {
        let model = table();
        let vectors = term_vectors(&model, "the robot kicked a ball").await;
        assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        assert!(term_vectors(&model, "   ").await.is_empty());
    }

    #[tokio::test]
    async fn test_score_sums_similarities() {
        let model = table();
        let terms = term_vectors(&model, "robot robot ball").await;
        let target = vec![1.0, 0.0];
        assert!((score(&model, &terms, Some(&target)) - 2.0).abs() < 1e-6);
        assert_eq!(score(&model, &terms, None), 0.0);
        assert_eq!(score(&model, &[], Some(&target)), 0.0);
    }
}
