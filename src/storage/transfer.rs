//! File upload and download against a storage bucket

use crate::config::StorageConfig;
use crate::error::{Result, TokenLoaderError};
use crate::storage::client::StorageClient;
use log::{info, warn};
use std::path::Path;
use tokio::fs;

/// Upload a local file under its base name, replacing any existing object.
///
/// The old object is removed first; a failed removal is only logged since the
/// object usually does not exist yet. Returns the object name.
pub async fn upload_file(client: &StorageClient, file_path: &Path, bucket: &str) -> Result<String> {
    client.connect().await?;

    let file_name = file_path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            TokenLoaderError::InvalidInput(format!("No file name in path: {}", file_path.display()))
        })?
        .to_string();

    if let Err(e) = client.remove(bucket, &[file_name.as_str()]).await {
        warn!("Could not remove old '{}' from bucket '{}': {}", file_name, bucket, e);
    }

    let bytes = fs::read(file_path).await?;
    client.upload(bucket, &file_name, bytes).await?;
    info!("Uploaded {} to bucket '{}'", file_name, bucket);

    Ok(file_name)
}

/// Download `file_name` into `save_path`.
///
/// Best effort: any failure is logged as a warning and reported as `false`.
pub async fn download_file(client: &StorageClient, save_path: &Path, file_name: &str, bucket: &str) -> bool {
    match try_download(client, save_path, file_name, bucket).await {
        Ok(size) => {
            info!(
                "Downloaded '{}' ({} bytes) from bucket '{}' to '{}'",
                file_name,
                size,
                bucket,
                save_path.display()
            );
            true
        }
        Err(e) => {
            warn!("Could not download '{}': {}", file_name, e);
            false
        }
    }
}

async fn try_download(client: &StorageClient, save_path: &Path, file_name: &str, bucket: &str) -> Result<usize> {
    let bytes = client.download(bucket, file_name).await?;
    fs::write(save_path, &bytes).await?;
    Ok(bytes.len())
}

pub async fn upload_overlap_results(client: &StorageClient, file_path: &Path, bucket: &str) -> Result<String> {
    upload_file(client, file_path, bucket).await
}

pub async fn download_overlap_results(client: &StorageClient, save_path: &Path, config: &StorageConfig) -> bool {
    download_file(client, save_path, &config.results_file_name, &config.bucket).await
}
