use std::collections::BTreeSet;

use crate::engine::charset::Charset;

/// Keep the words made only of `legal` characters that also contain at least
/// one `required` character (when `required` is non-empty). Input order is
/// preserved.
pub fn filter_words(
    words: &[String],
    legal: &BTreeSet<char>,
    required: &BTreeSet<char>,
) -> Vec<String> {
    if words.is_empty() || legal.is_empty() {
        return Vec::new();
    }
    words
        .iter()
        .filter(|w| word_is_valid(w, legal, required))
        .cloned()
        .collect()
}

fn word_is_valid(word: &str, legal: &BTreeSet<char>, required: &BTreeSet<char>) -> bool {
    !word.is_empty()
        && word.chars().all(|c| legal.contains(&c))
        && (required.is_empty() || word.chars().any(|c| required.contains(&c)))
}

pub struct WordFilter {
    pub legal: BTreeSet<char>,
    pub required: BTreeSet<char>,
    pub only_lowercase: bool,
}

impl WordFilter {
    pub fn new(charset: &Charset, only_lowercase: bool) -> Self {
        Self {
            legal: charset.legal.clone(),
            required: charset.required.clone(),
            only_lowercase,
        }
    }

    pub fn is_allowed(&self, ch: char) -> bool {
        self.legal.contains(&ch)
    }

    /// Words with any uppercase letter are rejected outright when capitals
    /// are disallowed; they are never lowercased to make them fit.
    pub fn accepts(&self, word: &str) -> bool {
        if self.only_lowercase && word.chars().any(char::is_uppercase) {
            return false;
        }
        word_is_valid(word, &self.legal, &self.required)
    }

    pub fn filter(&self, words: &[String]) -> Vec<String> {
        if self.legal.is_empty() {
            return Vec::new();
        }
        words.iter().filter(|w| self.accepts(w)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(s: &str) -> BTreeSet<char> {
        s.chars().collect()
    }

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_filter_excludes_illegal_characters() {
        let corpus = words(&["as", "sad", "fads", "dog"]);
        let result = filter_words(&corpus, &set("asdf"), &set("asdf"));
        assert_eq!(result, words(&["as", "sad", "fads"]));
    }

    #[test]
    fn test_required_letters_must_appear() {
        let corpus = words(&["sad", "gas", "hag", "dad"]);
        let result = filter_words(&corpus, &set("asdfgh"), &set("gh"));
        assert_eq!(result, words(&["gas", "hag"]));
    }

    #[test]
    fn test_empty_required_means_no_constraint() {
        let corpus = words(&["sad", "dad"]);
        let result = filter_words(&corpus, &set("asd"), &BTreeSet::new());
        assert_eq!(result, corpus);
    }

    #[test]
    fn test_degenerate_inputs_return_empty() {
        assert!(filter_words(&[], &set("abc"), &set("a")).is_empty());
        assert!(filter_words(&words(&["abc"]), &BTreeSet::new(), &BTreeSet::new()).is_empty());
    }

    #[test]
    fn test_empty_string_is_never_a_word() {
        let corpus = words(&["", "a"]);
        assert_eq!(filter_words(&corpus, &set("a"), &BTreeSet::new()), words(&["a"]));
    }

    #[test]
    fn test_filter_is_case_sensitive() {
        let corpus = words(&["Sad", "sad"]);
        assert_eq!(filter_words(&corpus, &set("asd"), &set("s")), words(&["sad"]));
        assert_eq!(
            filter_words(&corpus, &set("asdS"), &set("sS")),
            words(&["Sad", "sad"])
        );
    }

    #[test]
    fn test_word_filter_rejects_uppercase_when_lowercase_only() {
        let filter = WordFilter {
            legal: set("asdASD"),
            required: BTreeSet::new(),
            only_lowercase: true,
        };
        assert!(!filter.accepts("Sad"));
        assert!(filter.accepts("sad"));

        let filter = WordFilter {
            only_lowercase: false,
            ..filter
        };
        assert!(filter.accepts("Sad"));
    }
}
