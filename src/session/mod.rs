pub mod buffer;
pub mod clock;
pub mod game;
pub mod result;
pub mod supply;

pub use game::{Session, SessionLimits};
