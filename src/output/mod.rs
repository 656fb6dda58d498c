// Output formatting: terminal display of verdicts and scan reports.

pub mod terminal;

/// Shorten a URL for a fixed-width verdict column, ending in "..." when cut.
///
/// Counts characters rather than bytes, so hosts like `bücher.de` are cut
/// cleanly.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate_chars("https://a.com", 60), "https://a.com");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate_chars("https://bücher.de/ä", 10), "https://bü...");
    }
}
