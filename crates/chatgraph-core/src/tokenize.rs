//! Word extraction for per-member word clouds.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Tokens shorter than this (in characters) are discarded.
const MIN_TOKEN_CHARS: usize = 3;

static SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9']+").unwrap());

/// Function words, chat filler and URL fragments that carry no topic.
const STOPWORDS: &[&str] = &[
    // Articles, pronouns, auxiliaries
    "the", "and", "for", "are", "but", "not", "you", "your", "yours", "all", "any", "can",
    "had", "her", "hers", "was", "one", "our", "ours", "out", "has", "have", "him", "his",
    "how", "its", "it's", "may", "who", "why", "what", "when", "where", "which", "whom",
    "this", "that", "these", "those", "with", "from", "they", "them", "their", "theirs",
    "there", "then", "than", "were", "will", "would", "should", "could", "been", "being",
    "into", "onto", "about", "above", "below", "after", "before", "again", "also", "just",
    "only", "over", "under", "some", "such", "very", "too", "off", "own", "same", "both",
    "each", "few", "more", "most", "other", "does", "did", "doing", "done", "don't",
    "didn't", "doesn't", "isn't", "aren't", "wasn't", "weren't", "won't", "can't",
    "i'm", "i've", "i'll", "i'd", "you're", "you've", "you'll", "we're", "they're",
    "that's", "there's", "what's", "let's", "she", "herself", "himself", "itself",
    "myself", "yourself", "ourselves", "themselves", "because", "while", "until",
    "through", "during", "between", "against", "here", "now", "yes", "get", "got",
    "like", "well", "still", "even", "much", "many", "really", "want", "know", "think",
    "make", "going", "gonna", "yeah", "yep", "nope", "okay",
    // Chat filler
    "lol", "lmao", "rofl", "haha", "hahaha", "hehe", "hmm", "omg", "wtf", "btw", "idk",
    "imo", "tbh", "thx", "pls", "plz", "ahh", "ohh", "uhh", "umm",
    // URL fragments
    "http", "https", "www", "com", "org", "net", "html", "amp",
];

static STOPWORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOPWORDS.iter().copied().collect());

/// Whether a lower-cased token is a stopword.
pub fn is_stopword(token: &str) -> bool {
    STOPWORD_SET.contains(token)
}

/// Lower-case `text` and return its content words in order.
///
/// Text is split on anything that is not `a-z`, `0-9` or an apostrophe.
/// Tokens of two characters or fewer and stopwords are dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    SEPARATOR
        .split(&lowered)
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
        .filter(|token| !is_stopword(token))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_url_and_short_tokens_dropped() {
        assert_eq!(tokenize("Hello, world! http://x.com"), vec!["hello", "world"]);
    }

    #[test]
    fn test_order_and_duplicates_preserved() {
        assert_eq!(
            tokenize("Rust rust RUST compiler"),
            vec!["rust", "rust", "rust", "compiler"]
        );
    }

    #[test]
    fn test_apostrophes_kept_inside_tokens() {
        assert_eq!(tokenize("Nobody's perfect"), vec!["nobody's", "perfect"]);
        assert_eq!(tokenize("I'm sure it's fine"), vec!["sure", "fine"]);
    }

    #[test]
    fn test_chat_filler_removed() {
        assert_eq!(tokenize("lol haha that was great"), vec!["great"]);
    }

    #[test]
    fn test_non_ascii_letters_split() {
        assert_eq!(tokenize("café olé 2024"), vec!["caf", "2024"]);
    }

    #[test]
    fn test_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("!!! ... ???").is_empty());
    }
}
