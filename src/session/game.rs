use std::time::Instant;

use chrono::Utc;
use tracing::info;

use crate::engine::settings::{GameMode, Settings};
use crate::error::TutorResult;
use crate::generator::composer::{LineComposer, LineRequest};
use crate::generator::dictionary::Corpus;
use crate::generator::pool::PoolStats;
use crate::session::buffer::AnswerBuffer;
use crate::session::clock::Clock;
use crate::session::result::SessionResult;
use crate::session::supply::LazySupply;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionLimits {
    pub word_limit: usize,
    pub time_limit_secs: u64,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            word_limit: 25,
            time_limit_secs: 60,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeystrokeEvent {
    pub expected: Option<char>,
    pub actual: char,
    pub correct: bool,
    pub timestamp: Instant,
}

/// One typing game: owns the composer, the answer buffer and the scores.
pub struct Session<C: Corpus, K: Clock> {
    composer: LineComposer<C>,
    clock: K,
    request: LineRequest,
    limits: SessionLimits,
    supply: LazySupply,
    buffer: AnswerBuffer,
    typed: String,
    started_at: Option<Instant>,
    finished_at: Option<Instant>,
    correct_chars: usize,
    incorrect_chars: usize,
    words_completed: usize,
    words_missed: usize,
}

impl<C: Corpus, K: Clock> Session<C, K> {
    pub fn new(
        composer: LineComposer<C>,
        clock: K,
        request: LineRequest,
        limits: SessionLimits,
        supply: LazySupply,
    ) -> Self {
        Self {
            composer,
            clock,
            request,
            limits,
            supply,
            buffer: AnswerBuffer::new(),
            typed: String::new(),
            started_at: None,
            finished_at: None,
            correct_chars: 0,
            incorrect_chars: 0,
            words_completed: 0,
            words_missed: 0,
        }
    }

    pub fn mode(&self) -> GameMode {
        self.composer.settings().game_mode
    }

    pub fn request(&self) -> &LineRequest {
        &self.request
    }

    pub fn settings(&self) -> &Settings {
        self.composer.settings()
    }

    pub fn limits(&self) -> SessionLimits {
        self.limits
    }

    pub fn buffer(&self) -> &AnswerBuffer {
        &self.buffer
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    pub fn stats(&self) -> PoolStats {
        self.composer.stats()
    }

    pub fn composer(&self) -> &LineComposer<C> {
        &self.composer
    }

    /// Load the buffer for a new game. Word-limited games get exactly the
    /// word limit; time-limited games get an initial batch that the lazy
    /// supply tops up.
    pub fn start(&mut self) -> TutorResult<()> {
        let target = match self.mode() {
            GameMode::WordLimit => self.limits.word_limit.max(1),
            GameMode::TimeLimit => self.supply.initial_size(),
        };
        let words = self.compose_words(target)?;
        self.buffer.fill(words);
        info!(
            layout = %self.request.layout,
            level = self.request.level,
            mode = self.mode().as_str(),
            words = self.buffer.remaining(),
            "session ready"
        );
        Ok(())
    }

    /// Words taken line by line so the required-letter rotation shapes them.
    fn compose_words(&mut self, target: usize) -> TutorResult<Vec<String>> {
        let mut words = Vec::with_capacity(target);
        while words.len() < target {
            let line = self
                .composer
                .generate_line(target - words.len(), &self.request)?;
            if line.is_empty() {
                break;
            }
            words.extend(line.split_whitespace().map(str::to_string));
        }
        words.truncate(target);
        Ok(words)
    }

    /// Start over with a (possibly different) layout and level.
    pub fn reset(&mut self, request: LineRequest) -> TutorResult<()> {
        self.request = request;
        self.composer.reset_session();
        self.buffer.clear();
        self.typed.clear();
        self.started_at = None;
        self.finished_at = None;
        self.correct_chars = 0;
        self.incorrect_chars = 0;
        self.words_completed = 0;
        self.words_missed = 0;
        self.start()
    }

    pub fn apply_settings(&mut self, settings: Settings) -> TutorResult<()> {
        self.composer.set_settings(settings);
        self.reset(self.request.clone())
    }

    pub fn set_limits(&mut self, limits: SessionLimits) {
        self.limits = limits;
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    pub fn is_active(&self) -> bool {
        self.is_started() && !self.is_finished()
    }

    /// Handle one typed character. Space submits the current word.
    pub fn type_char(&mut self, ch: char) -> TutorResult<Option<KeystrokeEvent>> {
        if self.is_finished() || self.buffer.is_empty() {
            return Ok(None);
        }
        if ch == ' ' {
            return self.submit_word();
        }

        let now = self.clock.now();
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }

        let expected = self
            .buffer
            .current()
            .and_then(|w| w.chars().nth(self.typed.chars().count()));
        let correct = expected == Some(ch);
        if correct {
            self.correct_chars += 1;
        } else {
            self.incorrect_chars += 1;
        }
        self.typed.push(ch);

        // The last word of a word-limited game needs no trailing space.
        if self.mode() == GameMode::WordLimit
            && self.buffer.remaining() == 1
            && self.buffer.current() == Some(self.typed.as_str())
        {
            self.finish_word()?;
        }

        Ok(Some(KeystrokeEvent {
            expected,
            actual: ch,
            correct,
            timestamp: now,
        }))
    }

    pub fn backspace(&mut self) {
        if !self.is_finished() {
            self.typed.pop();
        }
    }

    fn submit_word(&mut self) -> TutorResult<Option<KeystrokeEvent>> {
        if self.typed.is_empty() {
            return Ok(None);
        }
        let expected = self.buffer.current() == Some(self.typed.as_str());
        if expected {
            self.correct_chars += 1;
        } else {
            self.incorrect_chars += 1;
        }
        self.finish_word()?;
        Ok(Some(KeystrokeEvent {
            expected: Some(' '),
            actual: ' ',
            correct: expected,
            timestamp: self.clock.now(),
        }))
    }

    fn finish_word(&mut self) -> TutorResult<()> {
        let Some(word) = self.buffer.shift() else {
            return Ok(());
        };
        if word == self.typed {
            self.words_completed += 1;
        } else {
            self.words_missed += 1;
            let missing = word.chars().count().saturating_sub(self.typed.chars().count());
            self.incorrect_chars += missing;
        }
        self.typed.clear();

        match self.mode() {
            GameMode::WordLimit => {
                if self.buffer.is_empty() {
                    self.finish();
                }
            }
            GameMode::TimeLimit => {
                self.supply.check_and_load(
                    &mut self.buffer,
                    GameMode::TimeLimit,
                    &mut self.composer,
                    &self.request,
                )?;
            }
        }
        Ok(())
    }

    /// Once-per-second timer hook. Returns true when this tick ended the game.
    pub fn tick(&mut self) -> bool {
        if self.mode() != GameMode::TimeLimit || !self.is_active() {
            return false;
        }
        if self.elapsed_secs() >= self.limits.time_limit_secs as f64 {
            self.finish();
            return true;
        }
        false
    }

    fn finish(&mut self) {
        if self.finished_at.is_none() {
            self.finished_at = Some(self.clock.now());
            info!(wpm = self.wpm(), accuracy = self.accuracy(), "session finished");
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => end.duration_since(start).as_secs_f64(),
            (Some(start), None) => self.clock.now().duration_since(start).as_secs_f64(),
            _ => 0.0,
        }
    }

    pub fn remaining_secs(&self) -> Option<f64> {
        match self.mode() {
            GameMode::TimeLimit => {
                Some((self.limits.time_limit_secs as f64 - self.elapsed_secs()).max(0.0))
            }
            GameMode::WordLimit => None,
        }
    }

    pub fn wpm(&self) -> f64 {
        let elapsed = self.elapsed_secs();
        if elapsed < 0.1 {
            return 0.0;
        }
        (self.correct_chars as f64 / 5.0) / (elapsed / 60.0)
    }

    pub fn accuracy(&self) -> f64 {
        let total = self.correct_chars + self.incorrect_chars;
        if total == 0 {
            return 100.0;
        }
        self.correct_chars as f64 / total as f64 * 100.0
    }

    pub fn words_completed(&self) -> usize {
        self.words_completed
    }

    pub fn result(&self) -> SessionResult {
        SessionResult {
            wpm: self.wpm(),
            accuracy: self.accuracy(),
            correct_chars: self.correct_chars,
            incorrect_chars: self.incorrect_chars,
            words_completed: self.words_completed,
            words_missed: self.words_missed,
            elapsed_secs: self.elapsed_secs(),
            layout: self.request.layout.clone(),
            level: self.request.level,
            game_mode: self.mode(),
            timestamp: Utc::now(),
        }
    }
}
