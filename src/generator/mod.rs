pub mod composer;
pub mod dictionary;
pub mod pool;
pub mod required;
pub mod sentence;

pub use composer::{LineComposer, LineRequest};
pub use dictionary::{Corpus, Dictionary};
pub use pool::{PoolStats, WordPool};
