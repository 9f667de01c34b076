use std::collections::HashSet;

use rand::Rng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::debug;

use crate::engine::charset::Charset;
use crate::engine::filter::WordFilter;
use crate::engine::settings::Settings;
use crate::error::{TutorError, TutorResult};
use crate::generator::dictionary::Corpus;
use crate::keyboard::levels::LevelRegistry;

const MAX_RANDOM_RETRIES: usize = 3;
/// Recency tracking is dropped once it covers more than this share of the pool.
const RECENT_CLEAR_RATIO: f64 = 0.8;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolKey {
    pub layout: String,
    pub level: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    pub pool_size: usize,
    pub layout: Option<String>,
    pub level: Option<u8>,
    pub recent_count: usize,
}

/// Shuffled, filtered words for the current (layout, level).
pub struct WordPool<C: Corpus> {
    corpus: C,
    registry: LevelRegistry,
    settings: Settings,
    rng: SmallRng,
    words: Vec<String>,
    key: Option<PoolKey>,
    recent: HashSet<usize>,
}

impl<C: Corpus> WordPool<C> {
    pub fn new(corpus: C, registry: LevelRegistry, settings: Settings, rng: SmallRng) -> Self {
        Self {
            corpus,
            registry,
            settings,
            rng,
            words: Vec::new(),
            key: None,
            recent: HashSet::new(),
        }
    }

    pub fn registry(&self) -> &LevelRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace settings, dropping the pool if the change alters word legality.
    pub fn set_settings(&mut self, settings: Settings) {
        if self.settings.affects_legality(&settings) {
            self.invalidate();
        }
        self.settings = settings;
    }

    pub fn invalidate(&mut self) {
        self.words.clear();
        self.key = None;
        self.recent.clear();
    }

    pub fn charset(&self, layout: &str, level: u8) -> TutorResult<Charset> {
        Charset::for_level(&self.registry, layout, level, &self.settings)
    }

    /// Filter the corpus for `(layout, level)` and shuffle the result into a
    /// fresh pool. On failure the previous pool is discarded as well.
    pub fn generate(&mut self, layout: &str, level: u8) -> TutorResult<usize> {
        self.invalidate();

        let charset = self.charset(layout, level)?;
        let filter = WordFilter::new(&charset, self.settings.only_lowercase);
        let mut words = filter.filter(self.corpus.words());
        if words.is_empty() {
            return Err(TutorError::EmptyPool {
                layout: layout.to_string(),
                level,
            });
        }

        words.shuffle(&mut self.rng);
        self.words = words;
        self.key = Some(PoolKey {
            layout: layout.to_string(),
            level,
        });
        debug!(layout, level, pool_size = self.words.len(), "generated word pool");
        Ok(self.words.len())
    }

    /// Draw `count` words, steering away from recently drawn entries.
    pub fn random_words(&mut self, count: usize) -> TutorResult<Vec<String>> {
        if self.key.is_none() || self.words.is_empty() {
            return Err(TutorError::PoolNotInitialized);
        }
        if count < 1 {
            return Err(TutorError::InvalidCount(count));
        }

        let mut drawn = Vec::with_capacity(count);
        for _ in 0..count {
            let idx = self.pick_index();
            drawn.push(self.words[idx].clone());
            self.recent.insert(idx);
            if self.recent.len() as f64 > self.words.len() as f64 * RECENT_CLEAR_RATIO {
                self.recent.clear();
            }
        }
        Ok(drawn)
    }

    fn pick_index(&mut self) -> usize {
        let len = self.words.len();
        let mut idx = self.rng.gen_range(0..len);
        for _ in 0..MAX_RANDOM_RETRIES.min(len) {
            if !self.recent.contains(&idx) {
                return idx;
            }
            idx = self.rng.gen_range(0..len);
        }
        if !self.recent.contains(&idx) {
            return idx;
        }
        // Random retries exhausted: pick uniformly among the fresh indices,
        // or repeat when every index is recent.
        let fresh: Vec<usize> = (0..len).filter(|i| !self.recent.contains(i)).collect();
        fresh.choose(&mut self.rng).copied().unwrap_or(idx)
    }

    pub fn needs_regeneration(&self, layout: &str, level: u8) -> bool {
        match &self.key {
            Some(key) => key.layout != layout || key.level != level,
            None => true,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.key.is_some()
    }

    pub fn key(&self) -> Option<&PoolKey> {
        self.key.as_ref()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            pool_size: self.words.len(),
            layout: self.key.as_ref().map(|k| k.layout.clone()),
            level: self.key.as_ref().map(|k| k.level),
            recent_count: self.recent.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn registry() -> LevelRegistry {
        let mut registry = LevelRegistry::empty();
        registry.insert(
            "qwerty",
            ["asdf", "gh", "xyz", "", "", "", ""]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        registry
    }

    fn pool(words: &[&str]) -> WordPool<Vec<String>> {
        let corpus = words.iter().map(|s| s.to_string()).collect();
        WordPool::new(
            corpus,
            registry(),
            Settings::default(),
            SmallRng::seed_from_u64(7),
        )
    }

    #[test]
    fn test_generate_filters_and_shuffles() {
        let mut pool = pool(&["as", "sad", "fads", "dog"]);
        assert_eq!(pool.generate("qwerty", 1).unwrap(), 3);
        let mut words = pool.words().to_vec();
        words.sort();
        assert_eq!(words, vec!["as", "fads", "sad"]);
    }

    #[test]
    fn test_sampling_before_generate_fails() {
        let mut pool = pool(&["as"]);
        assert_eq!(pool.random_words(1), Err(TutorError::PoolNotInitialized));
    }

    #[test]
    fn test_zero_count_is_rejected() {
        let mut pool = pool(&["as", "sad"]);
        pool.generate("qwerty", 1).unwrap();
        assert_eq!(pool.random_words(0), Err(TutorError::InvalidCount(0)));
    }

    #[test]
    fn test_empty_pool_discards_previous_pool() {
        let mut pool = pool(&["as", "sad"]);
        pool.generate("qwerty", 1).unwrap();
        assert!(matches!(
            pool.generate("qwerty", 3),
            Err(TutorError::EmptyPool { level: 3, .. })
        ));
        assert!(!pool.is_initialized());
        assert!(pool.needs_regeneration("qwerty", 1));
        assert_eq!(pool.random_words(1), Err(TutorError::PoolNotInitialized));
    }

    #[test]
    fn test_small_pool_draw_is_a_permutation() {
        let mut pool = pool(&["as", "sad", "fads"]);
        pool.generate("qwerty", 1).unwrap();
        for _ in 0..20 {
            let mut drawn = pool.random_words(3).unwrap();
            drawn.sort();
            assert_eq!(drawn, vec!["as", "fads", "sad"]);
        }
    }

    #[test]
    fn test_recency_clears_past_eighty_percent() {
        let mut pool = pool(&["a", "as", "sad", "dad", "fad"]);
        pool.generate("qwerty", 1).unwrap();
        pool.random_words(4).unwrap();
        assert_eq!(pool.stats().recent_count, 4);
        pool.random_words(1).unwrap();
        assert_eq!(pool.stats().recent_count, 0);
    }

    #[test]
    fn test_fallback_spreads_over_fresh_indices() {
        let mut pool = pool(&[
            "a", "as", "ad", "sad", "dad", "fad", "add", "ads", "fads", "dads",
        ]);
        pool.generate("qwerty", 1).unwrap();
        assert_eq!(pool.len(), 10);

        let mut counts = [0usize; 10];
        for _ in 0..1000 {
            pool.recent = (0..8).collect();
            counts[pool.pick_index()] += 1;
        }
        assert!(counts[..8].iter().all(|&c| c == 0));
        for &c in &counts[8..] {
            assert!((400..=600).contains(&c), "uneven fresh picks: {counts:?}");
        }
    }

    #[test]
    fn test_single_word_pool_repeats() {
        let mut pool = pool(&["sad"]);
        pool.generate("qwerty", 1).unwrap();
        assert_eq!(pool.random_words(3).unwrap(), vec!["sad", "sad", "sad"]);
    }

    #[test]
    fn test_needs_regeneration_tracks_identity() {
        let mut pool = pool(&["as", "gash"]);
        assert!(pool.needs_regeneration("qwerty", 1));
        pool.generate("qwerty", 1).unwrap();
        assert!(!pool.needs_regeneration("qwerty", 1));
        assert!(pool.needs_regeneration("qwerty", 2));
        assert!(pool.needs_regeneration("colemak", 1));
    }

    #[test]
    fn test_legality_settings_invalidate_pool() {
        let mut pool = pool(&["as", "sad"]);
        pool.generate("qwerty", 1).unwrap();

        let mut settings = pool.settings().clone();
        settings.target_line_length = 40;
        pool.set_settings(settings.clone());
        assert!(!pool.needs_regeneration("qwerty", 1));

        settings.only_lowercase = false;
        pool.set_settings(settings);
        assert!(pool.needs_regeneration("qwerty", 1));
    }

    #[test]
    fn test_stats_snapshot() {
        let mut pool = pool(&["as", "sad", "fads"]);
        assert_eq!(pool.stats().layout, None);
        pool.generate("qwerty", 1).unwrap();
        pool.random_words(1).unwrap();
        let stats = pool.stats();
        assert_eq!(stats.pool_size, 3);
        assert_eq!(stats.layout.as_deref(), Some("qwerty"));
        assert_eq!(stats.level, Some(1));
        assert_eq!(stats.recent_count, 1);
    }
}
