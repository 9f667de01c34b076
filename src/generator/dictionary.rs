const WORDS_EN: &str = include_str!("../../assets/words-en.json");

/// Read-only source of candidate words, case as authored.
pub trait Corpus {
    fn words(&self) -> &[String];
}

impl Corpus for Vec<String> {
    fn words(&self) -> &[String] {
        self
    }
}

pub struct Dictionary {
    words: Vec<String>,
}

impl Dictionary {
    pub fn load() -> Self {
        let words: Vec<String> = serde_json::from_str(WORDS_EN).unwrap_or_default();
        Self::from_words(words)
    }

    /// Blank and multi-token entries can never be typed as one word.
    pub fn from_words(words: Vec<String>) -> Self {
        let words = words
            .into_iter()
            .filter(|w| !w.is_empty() && !w.chars().any(char::is_whitespace))
            .collect();
        Self { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Corpus for Dictionary {
    fn words(&self) -> &[String] {
        &self.words
    }
}
