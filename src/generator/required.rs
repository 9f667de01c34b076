/// Rotation of the letters a line must still show the learner. Each accepted
/// word drains the letters it contains; once every letter has appeared the
/// rotation refills from the full set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequiredLetters {
    full: Vec<char>,
    remaining: Vec<char>,
    refills: usize,
}

impl RequiredLetters {
    pub fn new(required: Vec<char>) -> Self {
        Self {
            remaining: required.clone(),
            full: required,
            refills: 0,
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.full.is_empty()
    }

    /// A word is acceptable if it shows at least one letter still owed.
    pub fn accepts(&self, word: &str) -> bool {
        self.is_unconstrained() || word.chars().any(|c| self.remaining.contains(&c))
    }

    /// Remove the first remaining occurrence of each character in `word`.
    pub fn consume(&mut self, word: &str) {
        if self.is_unconstrained() {
            return;
        }
        for ch in word.chars() {
            if let Some(pos) = self.remaining.iter().position(|&r| r == ch) {
                self.remaining.remove(pos);
            }
        }
        if self.remaining.is_empty() {
            self.refill();
        }
    }

    /// Start a new rotation regardless of progress.
    pub fn reset(&mut self) {
        self.refill();
    }

    fn refill(&mut self) {
        self.remaining = self.full.clone();
        self.refills += 1;
    }

    pub fn remaining(&self) -> &[char] {
        &self.remaining
    }

    pub fn full(&self) -> &[char] {
        &self.full
    }

    pub fn refills(&self) -> usize {
        self.refills
    }
}
