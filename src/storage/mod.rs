//! Object storage module
//! Results file upload/download against a Supabase Storage bucket

pub mod client;
pub mod credentials;
pub mod transfer;

pub use client::StorageClient;
pub use credentials::StorageCredentials;
pub use transfer::{download_file, download_overlap_results, upload_file, upload_overlap_results};
