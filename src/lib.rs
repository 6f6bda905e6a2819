//! Token loader library

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;
pub mod storage;

pub use config::Config;
pub use error::{Result, TokenLoaderError};
pub use input::load_tokens;
pub use processing::Record;
