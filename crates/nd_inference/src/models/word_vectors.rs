use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use nd_core::{Error, Result, Vector, Vectorizer};
use crate::tokenize::tokenize;

/// Static word-embedding table (GloVe / word2vec text format).
///
/// A term has a vector when it, or its lowercase form, is in the table. Longer
/// text is represented by the mean of its known terms' vectors, so a label
/// such as "General News" is comparable with single terms.
pub struct WordVectors {
    vectors: HashMap<String, Vector>,
    dimensions: usize,
}

impl fmt::Debug for WordVectors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WordVectors")
            .field("words", &self.vectors.len())
            .field("dimensions", &self.dimensions)
            .finish()
    }
}

impl WordVectors {
    pub fn from_pairs<W, I>(pairs: I) -> Self
    where
        W: Into<String>,
        I: IntoIterator<Item = (W, Vector)>,
    {
        let mut vectors = HashMap::new();
        let mut dimensions = 0;
        for (word, vector) in pairs {
            if dimensions == 0 {
                dimensions = vector.len();
            }
            if vector.len() == dimensions {
                vectors.insert(word.into(), vector);
            }
        }
        Self { vectors, dimensions }
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await?;
        let table = Self::parse(&raw)?;
        tracing::info!(
            "📚 Loaded {} word vectors ({} dimensions) from {}",
            table.len(),
            table.dimensions,
            path.display()
        );
        Ok(table)
    }

    /// Parses `word v1 v2 ...` lines. A leading word2vec `count dimensions`
    /// header is skipped, malformed lines are dropped.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut vectors = HashMap::new();
        let mut dimensions = 0;
        let mut skipped = 0usize;

        for (line_no, line) in raw.lines().enumerate() {
            let mut fields = line.split_whitespace();
            let Some(word) = fields.next() else {
                continue;
            };
            let values: std::result::Result<Vector, _> = fields.map(str::parse::<f32>).collect();
            let Ok(values) = values else {
                skipped += 1;
                continue;
            };
            if line_no == 0 && values.len() == 1 && word.parse::<usize>().is_ok() {
                continue;
            }
            if values.is_empty() {
                skipped += 1;
                continue;
            }
            if dimensions == 0 {
                dimensions = values.len();
            }
            if values.len() != dimensions {
                skipped += 1;
                continue;
            }
            vectors.insert(word.to_string(), values);
        }

        if skipped > 0 {
            tracing::warn!("Skipped {} malformed word vector lines", skipped);
        }
        if vectors.is_empty() {
            return Err(Error::Inference("word vector table is empty".to_string()));
        }
        Ok(Self { vectors, dimensions })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn lookup(&self, term: &str) -> Option<&Vector> {
        self.vectors
            .get(term)
            .or_else(|| self.vectors.get(&term.to_lowercase()))
    }
}

#[async_trait::async_trait]
impl Vectorizer for WordVectors {
    fn name(&self) -> &str {
        "WordVectors"
    }

    async fn vectorize(&self, text: &str) -> Result<Option<Vector>> {
        let mut sum = vec![0.0f32; self.dimensions];
        let mut known = 0usize;
        for term in tokenize(text) {
            if let Some(vector) = self.lookup(term) {
                for (acc, v) in sum.iter_mut().zip(vector) {
                    *acc += v;
                }
                known += 1;
            }
        }
        if known == 0 {
            return Ok(None);
        }
        let n = known as f32;
        Ok(Some(sum.into_iter().map(|v| v / n).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_lookup_is_case_insensitive_fallback() {
        let table = WordVectors::from_pairs(vec![("ai", vec![1.0, 0.0]), ("AI", vec![0.0, 1.0])]);
        assert_eq!(table.vectorize("AI").await.unwrap(), Some(vec![0.0, 1.0]));
        assert_eq!(table.vectorize("Ai").await.unwrap(), Some(vec![1.0, 0.0]));
        assert_eq!(table.vectorize("robots").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_multi_word_text_is_averaged() {
        let table = WordVectors::from_pairs(vec![
            ("general", vec![1.0, 0.0]),
            ("news", vec![0.0, 1.0]),
        ]);
        let vector = table.vectorize("General News today").await.unwrap().unwrap();
        assert_eq!(vector, vec![0.5, 0.5]);
        assert_eq!(table.vectorize("").await.unwrap(), None);
    }

    #[test]
    fn test_parse_glove_and_word2vec() {
        let glove = WordVectors::parse("the 0.1 0.2 0.3\nnews 0.4 0.5 0.6\n").unwrap();
        assert_eq!(glove.len(), 2);
        assert_eq!(glove.dimensions(), 3);

        let w2v = WordVectors::parse("2 2\nsports 1 0\nball 0.5 0.5\n").unwrap();
        assert_eq!(w2v.len(), 2);
        assert_eq!(w2v.lookup("ball"), Some(&vec![0.5, 0.5]));
    }

    #[test]
    fn test_parse_drops_malformed_lines() {
        let table = WordVectors::parse("a 1 0\nb 1\nc x y\n\nd 0 1\n").unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.lookup("b").is_none());
        assert!(table.lookup("c").is_none());

        assert!(WordVectors::parse("").is_err());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "technology 0.9 0.1").unwrap();
        writeln!(file, "sports 0.1 0.9").unwrap();
        let table = WordVectors::load(file.path()).await.unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.name(), "WordVectors");
    }
}
