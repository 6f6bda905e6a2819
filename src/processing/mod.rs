//! Token data processing module
//! Normalization of decoded files and overlap result summaries

pub mod normalizer;
pub mod overlap;

pub use normalizer::{normalize, Record};
