//! Input manager for loading token files of different formats

use crate::error::{Result, TokenLoaderError};
use crate::input::decoder::{CsvDecoder, JsonDecoder, PickleDecoder, TokenDecoder};
use crate::input::file_detector::FileType;
use crate::processing::normalizer::{normalize, Record};
use log::{debug, info};
use serde_json::Value;
use std::path::Path;

#[derive(Debug, Default, Clone, Copy)]
pub struct InputManager;

impl InputManager {
    pub fn new() -> Self {
        Self
    }

    /// Load a token file and normalize it into a list of records
    pub fn load_tokens(&self, path: &Path) -> Result<Vec<Record>> {
        let value = self.decode(path)?;
        let records = normalize(value)?;
        debug!("Normalized {} records from {}", records.len(), path.display());
        Ok(records)
    }

    /// Decode a token file into its raw value without normalizing it
    pub fn decode(&self, path: &Path) -> Result<Value> {
        if !path.exists() {
            return Err(TokenLoaderError::NotFound(path.to_path_buf()));
        }

        let value = match FileType::from_path(path) {
            FileType::Pickle => {
                info!("Decoding pickle file: {}", path.display());
                PickleDecoder.decode(path)?
            }
            FileType::Json => {
                info!("Reading JSON file: {}", path.display());
                JsonDecoder.decode(path)?
            }
            FileType::Csv => {
                info!("Reading CSV file: {}", path.display());
                CsvDecoder.decode(path)?
            }
            FileType::Unknown => return Err(unsupported_extension(path)),
        };

        Ok(value)
    }
}

fn unsupported_extension(path: &Path) -> TokenLoaderError {
    let extension = path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default();
    TokenLoaderError::UnsupportedExtension(format!("'{}' ({})", extension, path.display()))
}

/// Load a token file with a default [`InputManager`]
pub fn load_tokens(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    InputManager::new().load_tokens(path.as_ref())
}
