use std::collections::VecDeque;

/// Words queued for typing, head first.
#[derive(Clone, Debug, Default)]
pub struct AnswerBuffer {
    words: VecDeque<String>,
    initial_loaded: usize,
    total_loaded: usize,
}

impl AnswerBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents with a fresh initial load.
    pub fn fill(&mut self, words: Vec<String>) {
        self.words = words.into();
        self.initial_loaded = self.words.len();
        self.total_loaded = self.words.len();
    }

    pub fn extend(&mut self, words: Vec<String>) {
        self.total_loaded += words.len();
        self.words.extend(words);
    }

    pub fn clear(&mut self) {
        self.words.clear();
        self.initial_loaded = 0;
        self.total_loaded = 0;
    }

    pub fn current(&self) -> Option<&str> {
        self.words.front().map(|s| s.as_str())
    }

    pub fn shift(&mut self) -> Option<String> {
        self.words.pop_front()
    }

    pub fn remaining(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn initial_loaded(&self) -> usize {
        self.initial_loaded
    }

    pub fn total_loaded(&self) -> usize {
        self.total_loaded
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(|s| s.as_str())
    }

    pub fn display(&self) -> String {
        self.words().collect::<Vec<_>>().join(" ")
    }
}
