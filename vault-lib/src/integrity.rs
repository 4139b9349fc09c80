// SPDX-License-Identifier: GPL-2.0-only
// vmvault/vault-lib/src/integrity.rs

use crate::error::VaultError;
use crate::image::{ProgressMonitor, ProgressPhase};
use sha2::{Digest, Sha256};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

const CHUNK_SIZE: usize = 64 * 1024;

/// SHA-256 hex digest of a byte slice.
pub fn sha256_hex_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// SHA-256 hex digest of a file, streamed in fixed-size chunks.
pub fn sha256_hex_file(path: &Path) -> Result<String, VaultError> {
    let mut file = std::fs::File::open(path)
        .map_err(|e| VaultError::Io(format!("cannot open {} for hashing: {e}", path.display())))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let n = file
            .read(&mut buf)
            .map_err(|e| VaultError::Io(format!("cannot read {}: {e}", path.display())))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Check a downloaded file against its expected lowercase hex SHA-256.
pub fn verify_image(path: &Path, expected: &str) -> Result<(), VaultError> {
    let actual = sha256_hex_file(path)?;
    if actual != expected {
        return Err(VaultError::HashMismatch {
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(())
}

/// Streaming xz decompressor for image payloads.
///
/// Progress is reported against compressed bytes consumed, so the percentage
/// is meaningful even when the decompressed size is unknown up front.
pub struct XzImageDecoder {
    source: PathBuf,
}

impl XzImageDecoder {
    pub fn new(source: &Path) -> Self {
        XzImageDecoder {
            source: source.to_path_buf(),
        }
    }

    pub fn decode_to(&self, dest: &Path, monitor: &ProgressMonitor) -> Result<(), VaultError> {
        let total = std::fs::metadata(&self.source)
            .map_err(|e| VaultError::Io(format!("cannot stat {}: {e}", self.source.display())))?
            .len();
        let mut reader = std::fs::File::open(&self.source)
            .map_err(|e| VaultError::Io(format!("cannot open {}: {e}", self.source.display())))?;
        let dest_file = std::fs::File::create(dest)
            .map_err(|e| VaultError::Io(format!("cannot create {}: {e}", dest.display())))?;
        let mut decoder = xz2::write::XzDecoder::new(dest_file);

        let mut buf = [0u8; CHUNK_SIZE];
        let mut consumed: u64 = 0;
        let mut last_percent = -1;
        loop {
            let n = reader
                .read(&mut buf)
                .map_err(|e| VaultError::Io(format!("cannot read {}: {e}", self.source.display())))?;
            if n == 0 {
                break;
            }
            decoder
                .write_all(&buf[..n])
                .map_err(|e| VaultError::Io(format!("xz decompression failed: {e}")))?;
            consumed += n as u64;
            if total > 0 {
                let percent = (consumed * 100 / total) as i32;
                if percent != last_percent {
                    monitor(ProgressPhase::Image, percent);
                    last_percent = percent;
                }
            }
        }
        decoder
            .finish()
            .map_err(|e| VaultError::Io(format!("xz decompression failed: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Arc;

    fn xz_compress(data: &[u8]) -> Vec<u8> {
        let mut compressed = Vec::new();
        {
            let mut encoder = xz2::write::XzEncoder::new(&mut compressed, 6);
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap();
        }
        compressed
    }

    #[test]
    fn sha256_of_bytes() {
        assert_eq!(
            sha256_hex_bytes(b"hello world"),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn sha256_of_file_matches_bytes() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("data.bin");
        std::fs::write(&path, b"hello world").unwrap();
        assert_eq!(sha256_hex_file(&path).unwrap(), sha256_hex_bytes(b"hello world"));
    }

    #[test]
    fn verify_accepts_matching_hash() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("image.img");
        std::fs::write(&path, b"image bytes").unwrap();
        verify_image(&path, &sha256_hex_bytes(b"image bytes")).unwrap();
    }

    #[test]
    fn verify_rejects_mismatch() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("image.img");
        std::fs::write(&path, b"image bytes").unwrap();
        let err = verify_image(&path, "deadbeef").unwrap_err();
        assert!(matches!(err, VaultError::HashMismatch { .. }));
    }

    #[test]
    fn xz_decode_round_trips_and_reports_progress() {
        let tmp = tempfile::tempdir().unwrap();
        let payload = vec![7u8; 256 * 1024];
        let src = tmp.path().join("image.img.xz");
        std::fs::write(&src, xz_compress(&payload)).unwrap();

        let final_percent = Arc::new(AtomicI32::new(-1));
        let seen = Arc::clone(&final_percent);
        let monitor: ProgressMonitor = Arc::new(move |phase, percent| {
            assert_eq!(phase, ProgressPhase::Image);
            seen.store(percent, Ordering::SeqCst);
        });

        let dest = tmp.path().join("image.img");
        XzImageDecoder::new(&src).decode_to(&dest, &monitor).unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), payload);
        assert_eq!(final_percent.load(Ordering::SeqCst), 100);
        assert!(src.exists());
    }

    #[test]
    fn xz_decode_rejects_garbage() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("bogus.xz");
        std::fs::write(&src, b"definitely not xz").unwrap();

        let monitor: ProgressMonitor = Arc::new(|_, _| {});
        let result = XzImageDecoder::new(&src).decode_to(&tmp.path().join("out"), &monitor);
        assert!(result.is_err());
    }
}
