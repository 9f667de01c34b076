use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::settings::GameMode;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionResult {
    pub wpm: f64,
    pub accuracy: f64,
    pub correct_chars: usize,
    pub incorrect_chars: usize,
    pub words_completed: usize,
    pub words_missed: usize,
    pub elapsed_secs: f64,
    pub layout: String,
    pub level: u8,
    pub game_mode: GameMode,
    pub timestamp: DateTime<Utc>,
}

impl SessionResult {
    pub fn summary(&self) -> String {
        format!(
            "{} level {} ({}): {:.0} wpm, {:.1}% accuracy, {} words in {:.0}s",
            self.layout,
            self.level,
            self.game_mode.as_str(),
            self.wpm,
            self.accuracy,
            self.words_completed,
            self.elapsed_secs,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_serde_roundtrip() {
        let result = SessionResult {
            wpm: 42.0,
            accuracy: 97.5,
            correct_chars: 210,
            incorrect_chars: 5,
            words_completed: 40,
            words_missed: 2,
            elapsed_secs: 60.0,
            layout: "colemak".to_string(),
            level: 3,
            game_mode: GameMode::TimeLimit,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&result).unwrap();
        let back: SessionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.words_completed, 40);
        assert_eq!(back.game_mode, GameMode::TimeLimit);
        assert!(back.summary().contains("42 wpm"));
    }
}
