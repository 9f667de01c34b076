pub mod charset;
pub mod filter;
pub mod settings;

pub use charset::Charset;
pub use filter::WordFilter;
pub use settings::{GameMode, Settings};
