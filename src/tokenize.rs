use std::sync::LazyLock;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

/// Whitespace, Unicode punctuation and ASCII punctuation (which includes `+`, `$`, `^`).
static NON_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{P}[:punct:]\s]*$").expect("NON_WORD pattern compiles")
});

/// Splits `expression` into sentences, then into word tokens.
/// Tokens made only of whitespace or punctuation are dropped; symbols such as `€` stay.
pub fn tokenize(expression: &str) -> Vec<String> {
    expression
        .unicode_sentences()
        .flat_map(|sentence| sentence.split_word_bounds())
        .filter(|token| is_word(token))
        .map(str::to_string)
        .collect()
}

fn is_word(token: &str) -> bool {
    !NON_WORD.is_match(token)
}
