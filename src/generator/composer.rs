use rand::Rng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::settings::Settings;
use crate::error::{TutorError, TutorResult};
use crate::generator::dictionary::Corpus;
use crate::generator::pool::{PoolKey, PoolStats, WordPool};
use crate::generator::required::RequiredLetters;
use crate::generator::sentence::SentenceCursor;
use crate::keyboard::levels::SENTENCE_LEVEL;

pub const DEFAULT_REQUIRED_RESET_AFTER: usize = 7000;
pub const DEFAULT_FALLBACK_TOKEN_AFTER: usize = 12000;

const JUMBLE_MIN_LEN: usize = 1;
const JUMBLE_MAX_LEN: usize = 5;

/// Circuit-breaker knobs for line composition. Both count consecutive
/// rejected draws; they are empirically tuned, not derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposerLimits {
    pub required_reset_after: usize,
    pub fallback_token_after: usize,
}

impl Default for ComposerLimits {
    fn default() -> Self {
        Self {
            required_reset_after: DEFAULT_REQUIRED_RESET_AFTER,
            fallback_token_after: DEFAULT_FALLBACK_TOKEN_AFTER,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineRequest {
    pub layout: String,
    pub level: u8,
}

impl LineRequest {
    pub fn new(layout: &str, level: u8) -> Self {
        Self {
            layout: layout.to_string(),
            level,
        }
    }

    fn key(&self) -> PoolKey {
        PoolKey {
            layout: self.layout.clone(),
            level: self.level,
        }
    }
}

/// Where candidate words come from for the prepared (layout, level).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WordSource {
    Pool,
    /// No corpus word fits; synthesize letter jumbles instead.
    Jumble,
    /// The level has no legal characters at all.
    Empty,
}

pub struct LineComposer<C: Corpus> {
    pool: WordPool<C>,
    required: RequiredLetters,
    sentences: SentenceCursor,
    rng: SmallRng,
    limits: ComposerLimits,
    prepared: Option<PoolKey>,
    source: WordSource,
    legal: Vec<char>,
    breaker_resets: usize,
}

impl<C: Corpus> LineComposer<C> {
    pub fn new(pool: WordPool<C>, limits: ComposerLimits, rng: SmallRng) -> Self {
        Self {
            pool,
            required: RequiredLetters::default(),
            sentences: SentenceCursor::builtin(),
            rng,
            limits,
            prepared: None,
            source: WordSource::Empty,
            legal: Vec::new(),
            breaker_resets: 0,
        }
    }

    pub fn with_sentences(mut self, sentences: SentenceCursor) -> Self {
        self.sentences = sentences;
        self
    }

    pub fn pool(&self) -> &WordPool<C> {
        &self.pool
    }

    pub fn stats(&self) -> PoolStats {
        self.pool.stats()
    }

    pub fn required(&self) -> &RequiredLetters {
        &self.required
    }

    /// Times the rejection limit forced the rotation to start over.
    pub fn breaker_resets(&self) -> usize {
        self.breaker_resets
    }

    pub fn limits(&self) -> ComposerLimits {
        self.limits
    }

    pub fn settings(&self) -> &Settings {
        self.pool.settings()
    }

    pub fn source(&self) -> WordSource {
        self.source
    }

    pub fn set_settings(&mut self, settings: Settings) {
        if self.pool.settings().affects_legality(&settings) {
            self.prepared = None;
        }
        self.pool.set_settings(settings);
    }

    /// Session-scoped state goes back to its start: the sentence cursor and
    /// the required-letter rotation. The pool itself is kept.
    pub fn reset_session(&mut self) {
        self.sentences.reset();
        self.required.reset();
    }

    fn is_sentence_request(&self, request: &LineRequest) -> bool {
        self.pool.settings().sentence_mode || request.level == SENTENCE_LEVEL
    }

    /// Make sure the pool, rotation and legal set match `request`.
    /// Configuration errors propagate; an empty pool switches to jumbles.
    pub fn prepare(&mut self, request: &LineRequest) -> TutorResult<WordSource> {
        let key = request.key();
        let stale = self.prepared.as_ref() != Some(&key)
            || (self.source == WordSource::Pool
                && self.pool.needs_regeneration(&request.layout, request.level));
        if !stale {
            return Ok(self.source);
        }

        self.prepared = None;
        let charset = self.pool.charset(&request.layout, request.level)?;
        self.legal = charset.legal_chars();
        self.required = RequiredLetters::new(charset.required_chars());

        self.source = if charset.is_empty() {
            warn!(layout = %request.layout, level = request.level, "level has no legal characters");
            self.pool.invalidate();
            WordSource::Empty
        } else {
            match self.pool.generate(&request.layout, request.level) {
                Ok(_) => WordSource::Pool,
                Err(err) if err.is_exhaustion() => {
                    warn!(%err, "falling back to letter jumbles");
                    WordSource::Jumble
                }
                Err(err) => return Err(err),
            }
        };
        self.prepared = Some(key);
        Ok(self.source)
    }

    /// One display line of at most `max_words` words: the next sentence in
    /// sentence mode, otherwise pool words within the target line length.
    pub fn generate_line(&mut self, max_words: usize, request: &LineRequest) -> TutorResult<String> {
        if self.is_sentence_request(request) {
            self.pool
                .registry()
                .level_characters(&request.layout, request.level)?;
            let sentence = self.sentences.next_sentence().unwrap_or_default();
            let words: Vec<&str> = sentence.split_whitespace().take(max_words).collect();
            return Ok(words.join(" "));
        }

        let source = self.prepare(request)?;
        if source == WordSource::Empty || max_words == 0 {
            return Ok(String::new());
        }

        let budget = self.pool.settings().target_line_length.max(1);
        let mut words: Vec<String> = Vec::new();
        let mut line_len = 0;
        let mut rejections = 0usize;

        while words.len() < max_words {
            let forced = rejections >= self.limits.fallback_token_after;
            let candidate = self.draw_one(source)?;

            if !forced && !self.required.accepts(&candidate) {
                rejections += 1;
                if rejections == self.limits.required_reset_after {
                    debug!(rejections, "no draw satisfies the required letters, resetting rotation");
                    self.required.reset();
                    self.breaker_resets += 1;
                }
                continue;
            }

            let added = if words.is_empty() {
                candidate.chars().count()
            } else {
                candidate.chars().count() + 1
            };
            // A lone over-long word still makes a line; otherwise stop short.
            if !words.is_empty() && line_len + added > budget {
                break;
            }

            if forced {
                debug!(token = %candidate, "injecting unfiltered token");
            }
            self.required.consume(&candidate);
            line_len += added;
            words.push(candidate);
            rejections = 0;
        }

        Ok(words.join(" "))
    }

    /// `count` standalone words for buffer refills, bypassing line shaping.
    /// Refill words neither consult nor drain the required-letter rotation.
    pub fn draw_words(&mut self, count: usize, request: &LineRequest) -> TutorResult<Vec<String>> {
        if count < 1 {
            return Err(TutorError::InvalidCount(count));
        }

        if self.is_sentence_request(request) {
            let mut words = Vec::with_capacity(count);
            while words.len() < count {
                let line = self.generate_line(count, request)?;
                if line.is_empty() {
                    break;
                }
                words.extend(line.split_whitespace().map(str::to_string));
            }
            words.truncate(count);
            return Ok(words);
        }

        match self.prepare(request)? {
            WordSource::Pool => self.pool.random_words(count),
            WordSource::Jumble => Ok((0..count).map(|_| self.jumble()).collect()),
            WordSource::Empty => Ok(Vec::new()),
        }
    }

    fn draw_one(&mut self, source: WordSource) -> TutorResult<String> {
        match source {
            WordSource::Pool => self
                .pool
                .random_words(1)?
                .pop()
                .ok_or(TutorError::PoolNotInitialized),
            WordSource::Jumble | WordSource::Empty => Ok(self.jumble()),
        }
    }

    fn jumble(&mut self) -> String {
        if self.legal.is_empty() {
            return String::new();
        }
        let legal = &self.legal;
        let rng = &mut self.rng;
        let len = rng.gen_range(JUMBLE_MIN_LEN..=JUMBLE_MAX_LEN);
        (0..len)
            .map(|_| legal[rng.gen_range(0..legal.len())])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::keyboard::levels::LevelRegistry;

    fn registry() -> LevelRegistry {
        let mut registry = LevelRegistry::empty();
        registry.insert(
            "qwerty",
            ["asdf", "gh", "xyz", "", "", "", ""]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        registry.insert("blank", vec![String::new(); 7]);
        registry
    }

    fn composer_with(words: &[&str], settings: Settings) -> LineComposer<Vec<String>> {
        let corpus = words.iter().map(|s| s.to_string()).collect();
        let pool = WordPool::new(corpus, registry(), settings, SmallRng::seed_from_u64(3));
        LineComposer::new(pool, ComposerLimits::default(), SmallRng::seed_from_u64(4))
    }

    fn composer(words: &[&str]) -> LineComposer<Vec<String>> {
        composer_with(words, Settings::default())
    }

    #[test]
    fn test_line_respects_max_words() {
        let mut composer = composer(&["as", "sad", "fads", "dad"]);
        let request = LineRequest::new("qwerty", 1);
        for _ in 0..50 {
            let line = composer.generate_line(3, &request).unwrap();
            assert!(line.split(' ').count() <= 3, "{line}");
            assert!(!line.ends_with(' '));
        }
    }

    #[test]
    fn test_line_respects_length_budget() {
        let mut composer = composer(&["as", "sad", "fads", "dad"]);
        let request = LineRequest::new("qwerty", 1);
        for _ in 0..50 {
            let line = composer.generate_line(100, &request).unwrap();
            assert!(line.chars().count() <= 23, "{line}");
            assert!(!line.is_empty());
        }
    }

    #[test]
    fn test_empty_pool_falls_back_to_jumbles() {
        let mut composer = composer(&["as", "sad"]);
        let request = LineRequest::new("qwerty", 3);
        let line = composer.generate_line(5, &request).unwrap();
        assert!(!line.is_empty());
        assert_eq!(composer.source(), WordSource::Jumble);
        for word in line.split(' ') {
            assert!((1..=5).contains(&word.chars().count()));
            assert!(word.chars().all(|c| "asdfghxyz".contains(c)), "{word}");
        }
    }

    #[test]
    fn test_no_legal_characters_gives_empty_line() {
        let mut composer = composer(&["as"]);
        let line = composer.generate_line(5, &LineRequest::new("blank", 1)).unwrap();
        assert_eq!(line, "");
    }

    #[test]
    fn test_unknown_layout_propagates() {
        let mut composer = composer(&["as"]);
        let err = composer
            .generate_line(5, &LineRequest::new("azerty", 1))
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_required_rotation_covers_new_letters() {
        let mut composer = composer(&["gas", "has", "sad", "dash", "hag"]);
        let request = LineRequest::new("qwerty", 2);
        composer.generate_line(4, &request).unwrap();
        assert_eq!(composer.required().full(), &['g', 'h']);
        let line = composer.generate_line(2, &request).unwrap();
        assert!(line.split(' ').all(|w| w.contains('g') || w.contains('h')));
    }

    #[test]
    fn test_unsatisfiable_rotation_hits_circuit_breaker() {
        let corpus = ["gas"];
        let pool = WordPool::new(
            corpus.iter().map(|s| s.to_string()).collect::<Vec<String>>(),
            registry(),
            Settings::default(),
            SmallRng::seed_from_u64(1),
        );
        let limits = ComposerLimits {
            required_reset_after: 5,
            fallback_token_after: 10,
        };
        let mut composer = LineComposer::new(pool, limits, SmallRng::seed_from_u64(2));
        let request = LineRequest::new("qwerty", 2);
        // Only 'g' can ever be consumed; 'h' is owed forever.
        let line = composer.generate_line(3, &request).unwrap();
        assert_eq!(line, "gas gas gas");
        assert!(composer.breaker_resets() >= 1);
    }

    #[test]
    fn test_capitals_keep_rotation_on_lowercase_letters() {
        let settings = Settings {
            only_lowercase: false,
            ..Settings::default()
        };
        let mut composer = composer_with(&["gas", "Hag", "hag", "sad", "Gash"], settings);
        let request = LineRequest::new("qwerty", 2);
        for _ in 0..5 {
            composer.generate_line(4, &request).unwrap();
        }
        assert_eq!(composer.required().full(), &['g', 'h']);
        assert!(composer.required().refills() >= 1);
        assert_eq!(composer.breaker_resets(), 0);
    }

    #[test]
    fn test_sentence_mode_returns_sentences() {
        let settings = Settings {
            sentence_mode: true,
            ..Settings::default()
        };
        let mut composer = composer_with(&["as"], settings)
            .with_sentences(SentenceCursor::new("First one. Second one."));
        let request = LineRequest::new("qwerty", 1);
        assert_eq!(composer.generate_line(3, &request).unwrap(), "First one.");
        assert_eq!(composer.generate_line(3, &request).unwrap(), "Second one.");
        composer.reset_session();
        assert_eq!(composer.generate_line(3, &request).unwrap(), "First one.");
    }

    #[test]
    fn test_sentence_line_is_capped_to_max_words() {
        let settings = Settings {
            sentence_mode: true,
            ..Settings::default()
        };
        let mut composer = composer_with(&["as"], settings)
            .with_sentences(SentenceCursor::new("The quick brown fox jumps over the dog."));
        let request = LineRequest::new("qwerty", 1);
        assert_eq!(composer.generate_line(3, &request).unwrap(), "The quick brown");
        composer.reset_session();
        assert_eq!(composer.generate_line(0, &request).unwrap(), "");
    }

    #[test]
    fn test_sentence_level_alias() {
        let mut composer =
            composer(&["as"]).with_sentences(SentenceCursor::new("Only this."));
        let request = LineRequest::new("qwerty", SENTENCE_LEVEL);
        assert_eq!(composer.generate_line(3, &request).unwrap(), "Only this.");
    }

    #[test]
    fn test_draw_words_from_pool_and_jumbles() {
        let mut composer = composer(&["as", "sad", "fads"]);
        let words = composer.draw_words(6, &LineRequest::new("qwerty", 1)).unwrap();
        assert_eq!(words.len(), 6);
        assert!(words.iter().all(|w| ["as", "sad", "fads"].contains(&w.as_str())));

        let jumbles = composer.draw_words(4, &LineRequest::new("qwerty", 3)).unwrap();
        assert_eq!(jumbles.len(), 4);
        assert_eq!(
            composer.draw_words(0, &LineRequest::new("qwerty", 1)),
            Err(TutorError::InvalidCount(0))
        );
    }

    #[test]
    fn test_draw_words_leaves_rotation_alone() {
        let mut composer = composer(&["gas", "has", "hag", "gash"]);
        let request = LineRequest::new("qwerty", 2);
        composer.prepare(&request).unwrap();
        let before = composer.required().clone();
        let words = composer.draw_words(10, &request).unwrap();
        assert_eq!(words.len(), 10);
        assert_eq!(composer.required(), &before);
    }

    #[test]
    fn test_legality_change_regenerates_pool() {
        let mut composer = composer(&["sad", "Sad", "Dad"]);
        let request = LineRequest::new("qwerty", 1);
        composer.prepare(&request).unwrap();
        assert_eq!(composer.stats().pool_size, 1);

        let settings = Settings {
            only_lowercase: false,
            ..composer.settings().clone()
        };
        composer.set_settings(settings);
        composer.prepare(&request).unwrap();
        assert_eq!(composer.stats().pool_size, 3);
    }
}
