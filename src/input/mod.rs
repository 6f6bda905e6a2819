//! Input processing module
//! Handles file detection, format decoding, and token loading

pub mod decoder;
pub mod file_detector;
pub mod manager;

pub use manager::{load_tokens, InputManager};
