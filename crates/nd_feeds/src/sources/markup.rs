use scraper::Html;

/// Reduces an HTML fragment to its text with whitespace collapsed. Plain text
/// passes through with only whitespace normalized.
pub fn plain_text(fragment: &str) -> String {
    let text = if fragment.contains('<') || fragment.contains('&') {
        Html::parse_fragment(fragment)
            .root_element()
            .text()
            .collect::<String>()
    } else {
        fragment.to_string()
    };
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
