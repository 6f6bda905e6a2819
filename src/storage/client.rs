//! HTTP client for the Supabase Storage REST API

use crate::error::{Result, TokenLoaderError};
use crate::storage::credentials::StorageCredentials;
use log::debug;
use reqwest::{header, Client, Response, Url};
use std::time::Duration;
use tokio::sync::OnceCell;

type CredentialSource = Box<dyn Fn() -> Result<StorageCredentials> + Send + Sync>;

struct Connection {
    http: Client,
    base_url: Url,
}

/// Object storage client.
///
/// Credentials are resolved on the first request, not at construction, so a
/// process can hold a client without having storage configured. A failed
/// resolution is retried on the next request.
pub struct StorageClient {
    timeout: Duration,
    source: CredentialSource,
    connection: OnceCell<Connection>,
}

impl StorageClient {
    /// Client reading `SUPABASE_URL` and `SUPABASE_KEY` on first use
    pub fn new(timeout: Duration) -> Self {
        Self::with_credential_source(timeout, StorageCredentials::from_env)
    }

    pub fn with_credential_source<F>(timeout: Duration, source: F) -> Self
    where
        F: Fn() -> Result<StorageCredentials> + Send + Sync + 'static,
    {
        Self {
            timeout,
            source: Box::new(source),
            connection: OnceCell::new(),
        }
    }

    /// Resolve credentials and build the HTTP client if not done yet
    pub async fn connect(&self) -> Result<()> {
        self.connection().await.map(|_| ())
    }

    async fn connection(&self) -> Result<&Connection> {
        self.connection
            .get_or_try_init(|| async {
                let credentials = (self.source)()?;
                Self::build_connection(&credentials, self.timeout)
            })
            .await
    }

    fn build_connection(credentials: &StorageCredentials, timeout: Duration) -> Result<Connection> {
        let base_url = Url::parse(&credentials.url).map_err(|e| {
            TokenLoaderError::Configuration(format!("Invalid storage URL '{}': {}", credentials.url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(TokenLoaderError::Configuration(format!(
                "Invalid storage URL '{}'",
                credentials.url
            )));
        }

        let mut headers = header::HeaderMap::new();
        let bearer = header::HeaderValue::from_str(&format!("Bearer {}", credentials.key()))
            .map_err(|e| TokenLoaderError::Configuration(format!("Invalid storage key: {}", e)))?;
        let api_key = header::HeaderValue::from_str(credentials.key())
            .map_err(|e| TokenLoaderError::Configuration(format!("Invalid storage key: {}", e)))?;
        headers.insert(header::AUTHORIZATION, bearer);
        headers.insert("apikey", api_key);

        let http = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| TokenLoaderError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Connection { http, base_url })
    }

    /// Delete objects from a bucket
    pub async fn remove(&self, bucket: &str, names: &[&str]) -> Result<()> {
        let connection = self.connection().await?;
        let url = object_url(&connection.base_url, &[bucket])?;
        debug!("DELETE {} {:?}", url, names);

        let response = connection
            .http
            .delete(url)
            .json(&serde_json::json!({ "prefixes": names }))
            .send()
            .await?;
        check_status(response, "remove").await?;
        Ok(())
    }

    /// Upload raw bytes as `name`; fails if the object already exists
    pub async fn upload(&self, bucket: &str, name: &str, bytes: Vec<u8>) -> Result<()> {
        let connection = self.connection().await?;
        let url = object_url(&connection.base_url, &[bucket, name])?;
        debug!("POST {} ({} bytes)", url, bytes.len());

        let response = connection
            .http
            .post(url)
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;
        check_status(response, "upload").await?;
        Ok(())
    }

    /// Download an object's raw bytes
    pub async fn download(&self, bucket: &str, name: &str) -> Result<Vec<u8>> {
        let connection = self.connection().await?;
        let url = object_url(&connection.base_url, &[bucket, name])?;
        debug!("GET {}", url);

        let response = connection.http.get(url).send().await?;
        let response = check_status(response, "download").await?;
        Ok(response.bytes().await?.to_vec())
    }
}

/// `<base>/storage/v1/object/<segments...>`, each segment percent-encoded
pub fn object_url(base_url: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|_| TokenLoaderError::Configuration(format!("Invalid storage URL '{}'", base_url)))?
        .pop_if_empty()
        .extend(["storage", "v1", "object"])
        .extend(segments);
    Ok(url)
}

async fn check_status(response: Response, operation: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(TokenLoaderError::Storage(format!(
        "{} failed with status {}: {}",
        operation,
        status,
        body.trim()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_object_url_layout() {
        let base = Url::parse("https://example.supabase.co/").unwrap();
        let url = object_url(&base, &["bot-data", "overlap_results.pkl"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.supabase.co/storage/v1/object/bot-data/overlap_results.pkl"
        );
    }

    #[test]
    fn test_object_url_encodes_segments() {
        let base = Url::parse("https://example.supabase.co").unwrap();
        let url = object_url(&base, &["bot data", "a/b.json"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.supabase.co/storage/v1/object/bot%20data/a%2Fb.json"
        );
    }

    #[tokio::test]
    async fn test_credentials_are_resolved_lazily() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let client = StorageClient::with_credential_source(Duration::from_secs(1), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(TokenLoaderError::MissingCredentials("SUPABASE_URL".to_string()))
        });
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let err = client.download("bot-data", "x.pkl").await.unwrap_err();
        assert!(matches!(err, TokenLoaderError::MissingCredentials(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_credentials_resolved_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let client = StorageClient::with_credential_source(Duration::from_secs(1), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(StorageCredentials::new("https://example.supabase.co", "key"))
        });

        client.connect().await.unwrap();
        client.connect().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_url_is_a_configuration_error() {
        let client = StorageClient::with_credential_source(Duration::from_secs(1), || {
            Ok(StorageCredentials::new("not a url", "key"))
        });
        let err = client.connect().await.unwrap_err();
        assert!(matches!(err, TokenLoaderError::Configuration(_)));
    }
}
