// SPDX-License-Identifier: GPL-2.0-only
// vmvault/vault-lib/src/downloader.rs

use crate::error::VaultError;
use crate::image::{ProgressMonitor, ProgressPhase};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use std::io::Write;
use std::path::Path;

/// Fetches remote artifacts into target paths. The seam exists so tests can
/// substitute canned downloads for the network.
#[async_trait]
pub trait UrlDownloader: Send + Sync {
    /// Download `url` into `dest`, reporting percent progress for `phase`.
    /// `expected_size` drives the progress denominator when positive;
    /// otherwise the response's own length is used.
    async fn download_to(
        &self,
        url: &str,
        dest: &Path,
        expected_size: i64,
        phase: ProgressPhase,
        monitor: &ProgressMonitor,
    ) -> Result<(), VaultError>;

    /// The upstream modification timestamp for `url`, when the server
    /// exposes one.
    async fn last_modified(&self, url: &str) -> Result<Option<DateTime<Utc>>, VaultError>;
}

/// reqwest-backed downloader streaming response bodies straight to disk.
pub struct HttpDownloader {
    client: reqwest::Client,
}

impl Default for HttpDownloader {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpDownloader {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent("vmvault-image-downloader")
            .build()
            .expect("failed to build HTTP client");
        HttpDownloader { client }
    }
}

#[async_trait]
impl UrlDownloader for HttpDownloader {
    async fn download_to(
        &self,
        url: &str,
        dest: &Path,
        expected_size: i64,
        phase: ProgressPhase,
        monitor: &ProgressMonitor,
    ) -> Result<(), VaultError> {
        tracing::info!(url, dest = %dest.display(), "downloading image artifact");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| VaultError::DownloadFailed(e.to_string()))?;
        if !response.status().is_success() {
            return Err(VaultError::DownloadFailed(format!(
                "HTTP {} from {url}",
                response.status()
            )));
        }

        let total = if expected_size > 0 {
            expected_size as u64
        } else {
            response.content_length().unwrap_or(0)
        };

        let mut file = std::fs::File::create(dest)
            .map_err(|e| VaultError::Io(format!("cannot create {}: {e}", dest.display())))?;
        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;
        let mut last_percent = -1;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| VaultError::DownloadFailed(format!("stream error: {e}")))?;
            file.write_all(&chunk)
                .map_err(|e| VaultError::Io(format!("cannot write {}: {e}", dest.display())))?;
            written += chunk.len() as u64;
            if total > 0 {
                let percent = (written * 100 / total).min(100) as i32;
                if percent != last_percent {
                    monitor(phase, percent);
                    last_percent = percent;
                }
            }
        }

        monitor(phase, 100);
        Ok(())
    }

    async fn last_modified(&self, url: &str) -> Result<Option<DateTime<Utc>>, VaultError> {
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|e| VaultError::DownloadFailed(e.to_string()))?;

        let parsed = response
            .headers()
            .get(reqwest::header::LAST_MODIFIED)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| DateTime::parse_from_rfc2822(value).ok())
            .map(|value| value.with_timezone(&Utc));
        Ok(parsed)
    }
}
