use tracing::debug;

use crate::engine::settings::GameMode;
use crate::error::TutorResult;
use crate::generator::composer::{LineComposer, LineRequest};
use crate::generator::dictionary::Corpus;
use crate::session::buffer::AnswerBuffer;

pub const DEFAULT_BATCH_SIZE: usize = 20;
const MIN_THRESHOLD: usize = 10;

/// Keeps a time-limited session's buffer ahead of the typist. Word-limited
/// sessions are sized up front and never pass through here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LazySupply {
    pub batch_size: usize,
}

impl LazySupply {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    /// Initial load for a time-limited session.
    pub fn initial_size(&self) -> usize {
        self.batch_size * 2
    }

    pub fn threshold(&self, buffer: &AnswerBuffer) -> usize {
        MIN_THRESHOLD.max(buffer.initial_loaded() / 3)
    }

    /// Append a batch when the buffer runs low. Returns the number of words
    /// appended.
    pub fn check_and_load<C: Corpus>(
        &self,
        buffer: &mut AnswerBuffer,
        mode: GameMode,
        composer: &mut LineComposer<C>,
        request: &LineRequest,
    ) -> TutorResult<usize> {
        if mode != GameMode::TimeLimit {
            return Ok(0);
        }
        let threshold = self.threshold(buffer);
        if buffer.remaining() >= threshold {
            return Ok(0);
        }

        let words = composer.draw_words(self.batch_size, request)?;
        let added = words.len();
        buffer.extend(words);
        debug!(added, remaining = buffer.remaining(), threshold, "refilled answer buffer");
        Ok(added)
    }
}

impl Default for LazySupply {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}
