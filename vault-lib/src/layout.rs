// SPDX-License-Identifier: GPL-2.0-only
// vmvault/vault-lib/src/layout.rs

use crate::error::VaultError;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// On-disk layout of the vault.
///
/// Two roots with separate lifetimes: the cache side holds shared prepared
/// images and their catalog, the data side holds per-instance copies and
/// theirs.
#[derive(Debug, Clone)]
pub struct VaultLayout {
    pub cache_dir: PathBuf,
    pub data_dir: PathBuf,
    pub images_dir: PathBuf,
    pub instances_dir: PathBuf,
}

pub const IMAGE_DB_NAME: &str = "multipassd-image-records.json";
pub const INSTANCE_DB_NAME: &str = "multipassd-instance-image-records.json";

impl VaultLayout {
    pub fn new(cache_root: &Path, data_root: &Path) -> Self {
        let cache_dir = cache_root.join("vault");
        let data_dir = data_root.join("vault");
        let images_dir = cache_dir.join("images");
        let instances_dir = data_dir.join("instances");
        VaultLayout {
            cache_dir,
            data_dir,
            images_dir,
            instances_dir,
        }
    }

    /// Create the images and instances subtrees.
    pub fn ensure(&self) -> Result<(), VaultError> {
        for dir in [&self.images_dir, &self.instances_dir] {
            std::fs::create_dir_all(dir)
                .map_err(|e| VaultError::Io(format!("cannot create {}: {e}", dir.display())))?;
        }
        Ok(())
    }

    pub fn image_db_path(&self) -> PathBuf {
        self.cache_dir.join(IMAGE_DB_NAME)
    }

    pub fn instance_db_path(&self) -> PathBuf {
        self.data_dir.join(INSTANCE_DB_NAME)
    }

    pub fn instance_dir(&self, name: &str) -> PathBuf {
        self.instances_dir.join(name)
    }

    /// Create (if needed) and return the directory for an instance's files.
    pub fn make_instance_dir(&self, name: &str) -> Result<PathBuf, VaultError> {
        let dir = self.instance_dir(name);
        std::fs::create_dir_all(&dir)
            .map_err(|e| VaultError::Io(format!("cannot create {}: {e}", dir.display())))?;
        Ok(dir)
    }

    /// Create (if needed) and return an image directory under the cache.
    pub fn make_image_dir(&self, dir_name: &str) -> Result<PathBuf, VaultError> {
        let dir = self.images_dir.join(dir_name);
        std::fs::create_dir_all(&dir)
            .map_err(|e| VaultError::Io(format!("cannot create {}: {e}", dir.display())))?;
        Ok(dir)
    }
}

/// Directory name for an alias-sourced image: `<release>-<version>`.
pub fn alias_image_dir_name(release: &str, version: &str) -> String {
    format!("{release}-{version}")
}

/// Directory name for a URL-sourced image: the filename with its extensions
/// stripped, stamped with the upstream modification date.
pub fn http_image_dir_name(filename: &str, last_modified: Option<DateTime<Utc>>) -> String {
    let stamp = last_modified.unwrap_or_else(Utc::now).format("%Y%m%d");
    format!("{}-{stamp}", image_dir_stem(filename))
}

/// The filename component of a URL or filesystem path.
pub fn filename_for(location: &str) -> String {
    location
        .rsplit('/')
        .next()
        .unwrap_or(location)
        .to_string()
}

fn image_dir_stem(filename: &str) -> String {
    let without_xz = filename.strip_suffix(".xz").unwrap_or(filename);
    match without_xz.rfind('.') {
        Some(dot) if dot > 0 => without_xz[..dot].to_string(),
        _ => without_xz.to_string(),
    }
}

/// Claims a to-be-written file ahead of a fallible operation. Dropping the
/// guard deletes the file unless `commit` was called first, so a failed
/// fetch never leaves partial artifacts behind.
pub struct DeleteOnFailure {
    path: PathBuf,
    armed: bool,
}

impl DeleteOnFailure {
    pub fn new(path: PathBuf) -> Self {
        DeleteOnFailure { path, armed: true }
    }

    /// Keep the file: the enclosing operation succeeded.
    pub fn commit(&mut self) {
        self.armed = false;
    }
}

impl Drop for DeleteOnFailure {
    fn drop(&mut self) {
        if self.armed {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}
