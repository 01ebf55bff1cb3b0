//! Text normalization shared by every strategy and vectorizer.
//!
//! Pipeline: lowercase, strip everything that is not a word character or whitespace, split on
//! whitespace, then drop stopwords and tokens of two chars or fewer.

pub mod stopwords;

use std::collections::HashSet;
use std::sync::Arc;

pub use stopwords::ENGLISH_STOPWORDS;

/// Tokens of this many chars or fewer are discarded.
pub const MIN_TOKEN_CHARS: usize = 2;

/// Deterministic tokenizer/normalizer.
///
/// Cheap to clone: the stopword set is shared.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    stop_words: Arc<HashSet<&'static str>>,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Preprocessor {
    /// Creates a preprocessor with the English stopword list.
    pub fn new() -> Self {
        Self {
            stop_words: Arc::new(ENGLISH_STOPWORDS.iter().copied().collect()),
        }
    }

    /// Returns `true` if `token` is in the stopword set.
    #[inline]
    pub fn is_stopword(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    /// Tokenizes and normalizes `text`. Empty input yields an empty vector.
    pub fn preprocess(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        let cleaned: String = text
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
            .collect();

        cleaned
            .split_whitespace()
            .filter(|token| token.chars().count() > MIN_TOKEN_CHARS && !self.is_stopword(token))
            .map(str::to_string)
            .collect()
    }

    /// Same as [`preprocess`](Self::preprocess) but deduplicated into a set.
    pub fn token_set(&self, text: &str) -> HashSet<String> {
        self.preprocess(text).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preprocess_empty_input() {
        let pre = Preprocessor::new();
        assert!(pre.preprocess("").is_empty());
        assert!(pre.preprocess("   ").is_empty());
    }

    #[test]
    fn test_preprocess_lowercases_and_strips_punctuation() {
        let pre = Preprocessor::new();
        let tokens = pre.preprocess("Machine-Learning, Robotics; HCI!");
        assert_eq!(tokens, vec!["machinelearning", "robotics", "hci"]);
    }

    #[test]
    fn test_preprocess_drops_stopwords_and_short_tokens() {
        let pre = Preprocessor::new();
        let tokens = pre.preprocess("the theory of ai and an ml system");
        assert_eq!(tokens, vec!["theory", "system"]);
    }

    #[test]
    fn test_preprocess_keeps_order_and_duplicates() {
        let pre = Preprocessor::new();
        let tokens = pre.preprocess("networks security networks");
        assert_eq!(tokens, vec!["networks", "security", "networks"]);
    }

    #[test]
    fn test_preprocess_apostrophes_removed_before_stopword_check() {
        let pre = Preprocessor::new();
        // "don't" -> "dont", which is not itself a stopword and is long enough to survive.
        let tokens = pre.preprocess("don't");
        assert_eq!(tokens, vec!["dont"]);
    }

    #[test]
    fn test_preprocess_is_deterministic() {
        let pre = Preprocessor::new();
        let text = "Distributed Systems and Cloud Computing";
        assert_eq!(pre.preprocess(text), pre.preprocess(text));
    }

    #[test]
    fn test_token_set_dedupes() {
        let pre = Preprocessor::new();
        let set = pre.token_set("graphics graphics vision");
        assert_eq!(set.len(), 2);
        assert!(set.contains("graphics"));
        assert!(set.contains("vision"));
    }

    #[test]
    fn test_preprocess_unicode_letters_survive() {
        let pre = Preprocessor::new();
        let tokens = pre.preprocess("Über Systeme");
        assert_eq!(tokens, vec!["über", "systeme"]);
    }
}
