pub mod levels;

pub use levels::LevelRegistry;
