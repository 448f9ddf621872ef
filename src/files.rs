//! File references attached to entity records.
//!
//! Records persist only the storage key of each attachment (inside a JSON
//! column); the download URL is derived from configuration on every read
//! and never stored. Signed-URL generation lives in the storage service,
//! not here.

use serde::{Deserialize, Serialize};

/// Persisted shape of one attachment inside an entity's JSON column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub name: String,
    #[serde(default)]
    pub size_in_bytes: Option<i64>,
    pub storage_key: String,
}

/// Read-side shape of an attachment, with its download URL resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRef {
    pub name: String,
    pub size_in_bytes: Option<i64>,
    pub storage_key: String,
    pub download_url: String,
}

/// Computes the download URL for a single storage key.
pub fn download_url(base_url: &str, storage_key: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), storage_key)
}

/// Resolves download URLs for an ordered list of stored files, preserving
/// order.
pub fn fill_download_urls(stored: Vec<StoredFile>, base_url: &str) -> Vec<FileRef> {
    stored
        .into_iter()
        .map(|file| {
            let download_url = download_url(base_url, &file.storage_key);
            FileRef {
                name: file.name,
                size_in_bytes: file.size_in_bytes,
                storage_key: file.storage_key,
                download_url,
            }
        })
        .collect()
}
