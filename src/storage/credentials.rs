//! Storage service credentials

use crate::error::{Result, TokenLoaderError};

pub const URL_ENV_VAR: &str = "SUPABASE_URL";
pub const KEY_ENV_VAR: &str = "SUPABASE_KEY";

/// Service URL and key for the object storage service.
///
/// Both values are passed through to the service untouched.
#[derive(Clone)]
pub struct StorageCredentials {
    pub url: String,
    key: String,
}

impl StorageCredentials {
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            key: key.into(),
        }
    }

    /// Read the credentials from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the credentials through `lookup`. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        match (read(URL_ENV_VAR), read(KEY_ENV_VAR)) {
            (Some(url), Some(key)) => Ok(Self::new(url, key)),
            (url, key) => {
                let missing: Vec<&str> = [(URL_ENV_VAR, url.is_none()), (KEY_ENV_VAR, key.is_none())]
                    .iter()
                    .filter(|(_, absent)| *absent)
                    .map(|(name, _)| *name)
                    .collect();
                Err(TokenLoaderError::MissingCredentials(format!(
                    "{} not set in environment variables",
                    missing.join(" and ")
                )))
            }
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl std::fmt::Debug for StorageCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageCredentials")
            .field("url", &self.url)
            .field("key", &"<redacted>")
            .finish()
    }
}
