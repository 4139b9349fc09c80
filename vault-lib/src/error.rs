// SPDX-License-Identifier: GPL-2.0-only
// vmvault/vault-lib/src/error.rs

/// Errors surfaced by vault operations.
///
/// Every variant carries a plain message so errors emitted inside a shared
/// fetch future can be cloned to all of its waiters.
#[derive(Debug, Clone, PartialEq)]
pub enum VaultError {
    /// A local-file image source does not exist.
    NotFound(String),
    /// http/file based image sources are disabled on this platform.
    UnsupportedScheme(String),
    /// The platform rejects the requested remote.
    UnsupportedRemote(String),
    /// The platform rejects the requested alias.
    UnsupportedAlias(String),
    /// No registered host serves the requested remote.
    UnknownRemote(String),
    /// No host produced image info for the query.
    NoImage(String),
    /// Downloaded bytes failed SHA-256 verification.
    HashMismatch { expected: String, actual: String },
    /// The underlying downloader failed.
    DownloadFailed(String),
    /// Any failure raised while building a prepared image; all waiters on
    /// the same fetch observe the same instance of this error.
    CreateImage(String),
    /// Catalog read/write failure.
    Catalog(String),
    /// File I/O failure outside the catalogs.
    Io(String),
}

impl std::fmt::Display for VaultError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VaultError::NotFound(e) => write!(f, "not found: {e}"),
            VaultError::UnsupportedScheme(e) => write!(f, "unsupported image source: {e}"),
            VaultError::UnsupportedRemote(e) => {
                write!(f, "{e} is not a supported remote on this platform")
            }
            VaultError::UnsupportedAlias(e) => {
                write!(f, "{e} is not a supported alias on this platform")
            }
            VaultError::UnknownRemote(e) => write!(f, "remote \"{e}\" is unknown"),
            VaultError::NoImage(e) => write!(f, "unable to find an image matching \"{e}\""),
            VaultError::HashMismatch { expected, actual } => {
                write!(f, "SHA256 mismatch: expected {expected}, got {actual}")
            }
            VaultError::DownloadFailed(e) => write!(f, "download failed: {e}"),
            VaultError::CreateImage(e) => write!(f, "cannot create image: {e}"),
            VaultError::Catalog(e) => write!(f, "catalog error: {e}"),
            VaultError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for VaultError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = VaultError::HashMismatch {
            expected: "aaa".to_string(),
            actual: "bbb".to_string(),
        };
        assert!(err.to_string().contains("SHA256 mismatch"));
        assert!(err.to_string().contains("aaa"));

        let err = VaultError::UnknownRemote("daily".to_string());
        assert!(err.to_string().contains("daily"));

        let err = VaultError::CreateImage("download failed: boom".to_string());
        assert!(err.to_string().contains("cannot create image"));
    }

    #[test]
    fn errors_clone_equal() {
        let err = VaultError::DownloadFailed("HTTP 503".to_string());
        assert_eq!(err.clone(), err);
    }
}
