// Core library for the typing tutor. The binary in main.rs layers the
// terminal front end (app, event, ui) on top of these modules; integration
// tests and criterion benches import them as `typetutor::*`.

pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod keyboard;
pub mod session;

pub use error::{TutorError, TutorResult};
