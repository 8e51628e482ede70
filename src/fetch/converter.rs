/// Converts a scraped HTML fragment into a single line of readable text.
/// Markup becomes Markdown; runs of whitespace collapse to one space.
pub fn fragment_to_text(fragment: &str) -> String {
    let markdown = html2md::rewrite_html(fragment, false);
    collapse_whitespace(&markdown)
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_collapses_whitespace() {
        assert_eq!(fragment_to_text("a   good\n  day"), "a good day");
    }

    #[test]
    fn markup_is_removed() {
        let text = fragment_to_text("<span class=\"def\"><b>good</b> day</span>");
        assert!(text.contains("good"), "got: {text}");
        assert!(text.contains("day"), "got: {text}");
        assert!(!text.contains('<'), "got: {text}");
    }

    #[test]
    fn blank_fragment_is_empty() {
        assert_eq!(fragment_to_text("   \n\t"), "");
    }

    #[test]
    fn collapse_handles_unicode_whitespace() {
        assert_eq!(collapse_whitespace("bom\u{00a0}\u{2003}dia"), "bom dia");
    }
}
