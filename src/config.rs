use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::engine::settings::{DEFAULT_TARGET_LINE_LENGTH, GameMode, Settings};
use crate::generator::composer::{
    ComposerLimits, DEFAULT_FALLBACK_TOKEN_AFTER, DEFAULT_REQUIRED_RESET_AFTER,
};
use crate::keyboard::levels::{LEVEL_COUNT, LevelRegistry, SENTENCE_LEVEL};
use crate::session::game::SessionLimits;
use crate::session::supply::DEFAULT_BATCH_SIZE;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_keyboard_layout")]
    pub keyboard_layout: String,
    #[serde(default = "default_level")]
    pub level: u8,
    #[serde(default = "default_only_lowercase")]
    pub only_lowercase: bool,
    #[serde(default)]
    pub punctuation: String,
    #[serde(default = "default_game_mode")]
    pub game_mode: GameMode,
    #[serde(default = "default_word_limit")]
    pub word_limit: usize,
    #[serde(default = "default_time_limit_secs")]
    pub time_limit_secs: u64,
    #[serde(default)]
    pub sentence_mode: bool,
    #[serde(default = "default_target_line_length")]
    pub target_line_length: usize,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_custom_levels")]
    pub custom_levels: Vec<String>,
    #[serde(default = "default_required_reset_threshold")]
    pub required_reset_threshold: usize,
    #[serde(default = "default_fallback_token_threshold")]
    pub fallback_token_threshold: usize,
    #[serde(default = "default_supply_batch_size")]
    pub supply_batch_size: usize,
}

fn default_keyboard_layout() -> String {
    "colemak".to_string()
}
fn default_level() -> u8 {
    1
}
fn default_only_lowercase() -> bool {
    true
}
fn default_game_mode() -> GameMode {
    GameMode::WordLimit
}
fn default_word_limit() -> usize {
    25
}
fn default_time_limit_secs() -> u64 {
    60
}
fn default_target_line_length() -> usize {
    DEFAULT_TARGET_LINE_LENGTH
}
fn default_theme() -> String {
    "terminal-default".to_string()
}
fn default_custom_levels() -> Vec<String> {
    let registry = LevelRegistry::builtin();
    (1..=LEVEL_COUNT)
        .filter_map(|lvl| registry.level_characters("qwerty", lvl).ok())
        .map(str::to_string)
        .collect()
}
fn default_required_reset_threshold() -> usize {
    DEFAULT_REQUIRED_RESET_AFTER
}
fn default_fallback_token_threshold() -> usize {
    DEFAULT_FALLBACK_TOKEN_AFTER
}
fn default_supply_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keyboard_layout: default_keyboard_layout(),
            level: default_level(),
            only_lowercase: default_only_lowercase(),
            punctuation: String::new(),
            game_mode: default_game_mode(),
            word_limit: default_word_limit(),
            time_limit_secs: default_time_limit_secs(),
            sentence_mode: false,
            target_line_length: default_target_line_length(),
            theme: default_theme(),
            custom_levels: default_custom_levels(),
            required_reset_threshold: default_required_reset_threshold(),
            fallback_token_threshold: default_fallback_token_threshold(),
            supply_batch_size: default_supply_batch_size(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("typetutor")
            .join("config.toml")
    }

    /// Registry with this config's custom levels installed.
    pub fn registry(&self) -> LevelRegistry {
        LevelRegistry::with_custom(self.custom_levels.clone())
    }

    /// Pull hand-edited values back into range. Call after deserialization.
    pub fn normalize(&mut self, registry: &LevelRegistry) {
        if !registry.contains(&self.keyboard_layout) {
            self.keyboard_layout = default_keyboard_layout();
        }
        self.level = self.level.clamp(1, SENTENCE_LEVEL);
        self.target_line_length = self.target_line_length.max(1);
        self.word_limit = self.word_limit.max(1);
        self.time_limit_secs = self.time_limit_secs.max(1);
        self.supply_batch_size = self.supply_batch_size.max(1);
    }

    pub fn settings(&self) -> Settings {
        Settings {
            only_lowercase: self.only_lowercase,
            punctuation: self.punctuation.clone(),
            game_mode: self.game_mode,
            sentence_mode: self.sentence_mode,
            target_line_length: self.target_line_length,
        }
    }

    pub fn composer_limits(&self) -> ComposerLimits {
        ComposerLimits {
            required_reset_after: self.required_reset_threshold,
            fallback_token_after: self.fallback_token_threshold,
        }
    }

    pub fn session_limits(&self) -> SessionLimits {
        SessionLimits {
            word_limit: self.word_limit,
            time_limit_secs: self.time_limit_secs,
        }
    }
}
