use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{info, warn};

use typetutor::config::Config;
use typetutor::error::TutorResult;
use typetutor::generator::composer::{LineComposer, LineRequest};
use typetutor::generator::dictionary::Dictionary;
use typetutor::generator::pool::WordPool;
use typetutor::keyboard::levels::{LevelRegistry, SENTENCE_LEVEL};
use typetutor::session::clock::SystemClock;
use typetutor::session::game::Session;
use typetutor::session::result::SessionResult;
use typetutor::session::supply::LazySupply;

use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Typing,
    Result,
}

pub struct App {
    pub screen: AppScreen,
    pub session: Session<Dictionary, SystemClock>,
    pub config: Config,
    pub theme: Theme,
    pub last_result: Option<SessionResult>,
    /// Last error surfaced by the core, shown in the footer until the next
    /// successful action.
    pub status: Option<String>,
    pub should_quit: bool,
    registry: LevelRegistry,
}

/// Composer over the embedded dictionary, seeded from OS entropy.
pub fn build_composer(config: &Config, registry: LevelRegistry) -> LineComposer<Dictionary> {
    let pool = WordPool::new(
        Dictionary::load(),
        registry,
        config.settings(),
        SmallRng::from_entropy(),
    );
    LineComposer::new(pool, config.composer_limits(), SmallRng::from_entropy())
}

impl App {
    pub fn new(config: Config, theme: Theme) -> Result<Self> {
        let registry = config.registry();
        let request = LineRequest::new(&config.keyboard_layout, config.level);
        let mut session = Session::new(
            build_composer(&config, registry.clone()),
            SystemClock,
            request,
            config.session_limits(),
            LazySupply::new(config.supply_batch_size),
        );
        session.start()?;

        Ok(Self {
            screen: AppScreen::Typing,
            session,
            config,
            theme,
            last_result: None,
            status: None,
            should_quit: false,
            registry,
        })
    }

    fn request(&self) -> LineRequest {
        LineRequest::new(&self.config.keyboard_layout, self.config.level)
    }

    pub fn type_char(&mut self, ch: char) {
        if self.screen != AppScreen::Typing {
            return;
        }
        let outcome = self.session.type_char(ch).map(|_| ());
        self.report(outcome);
        self.check_finished();
    }

    pub fn backspace(&mut self) {
        if self.screen == AppScreen::Typing {
            self.session.backspace();
        }
    }

    pub fn tick(&mut self) {
        if self.session.tick() {
            self.check_finished();
        }
    }

    fn check_finished(&mut self) {
        if self.screen == AppScreen::Typing && self.session.is_finished() {
            let result = self.session.result();
            info!(summary = %result.summary(), "session complete");
            self.last_result = Some(result);
            self.screen = AppScreen::Result;
        }
    }

    pub fn restart(&mut self) {
        let outcome = self.session.reset(self.request());
        self.screen = AppScreen::Typing;
        self.report(outcome);
    }

    pub fn next_level(&mut self) {
        if self.config.level < SENTENCE_LEVEL {
            self.config.level += 1;
            self.restart();
        }
    }

    pub fn prev_level(&mut self) {
        if self.config.level > 1 {
            self.config.level -= 1;
            self.restart();
        }
    }

    pub fn next_layout(&mut self) {
        let next = self
            .registry
            .next_layout(&self.config.keyboard_layout)
            .map(str::to_string);
        if let Some(next) = next {
            self.config.keyboard_layout = next;
            self.restart();
        }
    }

    pub fn prev_layout(&mut self) {
        let prev = self
            .registry
            .prev_layout(&self.config.keyboard_layout)
            .map(str::to_string);
        if let Some(prev) = prev {
            self.config.keyboard_layout = prev;
            self.restart();
        }
    }

    pub fn toggle_game_mode(&mut self) {
        self.config.game_mode = self.config.game_mode.toggled();
        self.apply_settings();
    }

    pub fn toggle_sentence_mode(&mut self) {
        self.config.sentence_mode = !self.config.sentence_mode;
        self.apply_settings();
    }

    pub fn toggle_capitals(&mut self) {
        self.config.only_lowercase = !self.config.only_lowercase;
        self.apply_settings();
    }

    fn apply_settings(&mut self) {
        let outcome = self.session.apply_settings(self.config.settings());
        self.screen = AppScreen::Typing;
        self.report(outcome);
    }

    fn report(&mut self, outcome: TutorResult<()>) {
        match outcome {
            Ok(()) => self.status = None,
            Err(err) => {
                warn!(%err, "session error");
                self.status = Some(err.to_string());
            }
        }
    }

    pub fn quit(&mut self) {
        if let Err(err) = self.config.save() {
            warn!(%err, "could not save config");
        }
        self.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use typetutor::engine::settings::GameMode;

    use super::*;

    fn app() -> App {
        App::new(Config::default(), Theme::default()).unwrap()
    }

    #[test]
    fn test_new_app_has_words_ready() {
        let app = app();
        assert_eq!(app.screen, AppScreen::Typing);
        assert_eq!(app.session.buffer().remaining(), 25);
        assert!(app.status.is_none());
    }

    #[test]
    fn test_level_changes_are_clamped() {
        let mut app = app();
        app.prev_level();
        assert_eq!(app.config.level, 1);
        for _ in 0..20 {
            app.next_level();
        }
        assert_eq!(app.config.level, SENTENCE_LEVEL);
        assert_eq!(app.session.request().level, SENTENCE_LEVEL);
    }

    #[test]
    fn test_layout_cycle_wraps() {
        let mut app = app();
        let start = app.config.keyboard_layout.clone();
        let count = app.registry.layouts().len();
        for _ in 0..count {
            app.next_layout();
        }
        assert_eq!(app.config.keyboard_layout, start);
        app.prev_layout();
        assert_ne!(app.config.keyboard_layout, start);
        assert_eq!(app.session.request().layout, app.config.keyboard_layout);
    }

    #[test]
    fn test_typing_whole_game_shows_result() {
        let mut config = Config::default();
        config.word_limit = 2;
        let mut app = App::new(config, Theme::default()).unwrap();
        let words: Vec<String> = app.session.buffer().words().map(str::to_string).collect();
        for (i, word) in words.iter().enumerate() {
            for ch in word.chars() {
                app.type_char(ch);
            }
            if i + 1 < words.len() {
                app.type_char(' ');
            }
        }
        assert_eq!(app.screen, AppScreen::Result);
        let result = app.last_result.as_ref().unwrap();
        assert_eq!(result.words_completed, 2);

        app.restart();
        assert_eq!(app.screen, AppScreen::Typing);
        assert_eq!(app.session.buffer().remaining(), 2);
    }

    #[test]
    fn test_toggle_game_mode_reloads_buffer() {
        let mut app = app();
        app.toggle_game_mode();
        assert_eq!(app.session.mode(), GameMode::TimeLimit);
        assert_eq!(app.session.buffer().remaining(), 40);
    }
}
