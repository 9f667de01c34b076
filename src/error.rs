use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TutorError {
    #[error("unknown keyboard layout: {0}")]
    UnknownLayout(String),

    #[error("unknown level {level} for layout {layout}")]
    UnknownLevel { layout: String, level: u8 },

    #[error("no words in the corpus are usable for layout {layout} at level {level}")]
    EmptyPool { layout: String, level: u8 },

    #[error("word pool sampled before it was generated")]
    PoolNotInitialized,

    #[error("invalid word count: {0} (must be at least 1)")]
    InvalidCount(usize),
}

impl TutorError {
    /// Registry data or setup defects; never retried.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            TutorError::UnknownLayout(_) | TutorError::UnknownLevel { .. }
        )
    }

    pub fn is_exhaustion(&self) -> bool {
        matches!(self, TutorError::EmptyPool { .. })
    }

    /// API called out of order or with bad arguments.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            TutorError::PoolNotInitialized | TutorError::InvalidCount(_)
        )
    }
}

pub type TutorResult<T> = Result<T, TutorError>;
