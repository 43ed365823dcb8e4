/// Splits text into terms: runs of alphanumeric characters, where a single
/// apostrophe or hyphen between two alphanumerics stays inside the term.
pub fn tokenize(text: &str) -> Vec<&str> {
    let mut terms = Vec::new();
    let mut start: Option<usize> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c.is_alphanumeric() {
            if start.is_none() {
                start = Some(i);
            }
            continue;
        }

        let joins = matches!(c, '\'' | '-' | '\u{2019}')
            && start.is_some()
            && chars.peek().map_or(false, |(_, next)| next.is_alphanumeric());
        if joins {
            continue;
        }

        if let Some(s) = start.take() {
            terms.push(&text[s..i]);
        }
    }

    if let Some(s) = start {
        terms.push(&text[s..]);
    }
    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_whitespace_and_punctuation() {
        assert_eq!(
            tokenize("The new iPhone was released today."),
            vec!["The", "new", "iPhone", "was", "released", "today"]
        );
        assert_eq!(tokenize("AI, robotics & (more)!"), vec!["AI", "robotics", "more"]);
    }

    #[test]
    fn test_keeps_inner_apostrophes_and_hyphens() {
        assert_eq!(
            tokenize("Don't miss state-of-the-art F1 - news"),
            vec!["Don't", "miss", "state-of-the-art", "F1", "news"]
        );
        assert_eq!(tokenize("'quoted' -dash"), vec!["quoted", "dash"]);
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\t ").is_empty());
        assert!(tokenize("...").is_empty());
    }

    #[test]
    fn test_unicode_terms() {
        assert_eq!(tokenize("Clarín informó"), vec!["Clarín", "informó"]);
    }
}
