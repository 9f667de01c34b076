use serde::{Deserialize, Serialize};

pub const DEFAULT_TARGET_LINE_LENGTH: usize = 23;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    WordLimit,
    TimeLimit,
}

impl GameMode {
    pub fn as_str(self) -> &'static str {
        match self {
            GameMode::WordLimit => "word-limit",
            GameMode::TimeLimit => "time-limit",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            GameMode::WordLimit => GameMode::TimeLimit,
            GameMode::TimeLimit => GameMode::WordLimit,
        }
    }
}

/// The subset of user preferences the word engine consumes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub only_lowercase: bool,
    pub punctuation: String,
    pub game_mode: GameMode,
    pub sentence_mode: bool,
    pub target_line_length: usize,
}

impl Settings {
    /// True when switching from `self` to `other` changes which words are legal.
    pub fn affects_legality(&self, other: &Settings) -> bool {
        self.only_lowercase != other.only_lowercase || self.punctuation != other.punctuation
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            only_lowercase: true,
            punctuation: String::new(),
            game_mode: GameMode::WordLimit,
            sentence_mode: false,
            target_line_length: DEFAULT_TARGET_LINE_LENGTH,
        }
    }
}
