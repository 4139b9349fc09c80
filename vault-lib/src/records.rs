// SPDX-License-Identifier: GPL-2.0-only
// vmvault/vault-lib/src/records.rs

//! Catalog persistence. Each catalog is a single JSON document keyed by
//! entry key; loads are best-effort (a damaged document yields an empty
//! catalog), writes are atomic at the file level.

use crate::error::VaultError;
use crate::image::VaultRecord;
use std::collections::HashMap;
use std::path::Path;

/// Load a catalog. Missing files and malformed documents both produce an
/// empty catalog; a partial load is never returned.
pub fn load_records(path: &Path) -> HashMap<String, VaultRecord> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(_) => return HashMap::new(),
    };

    match serde_json::from_slice(&bytes) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "discarding unreadable image record catalog"
            );
            HashMap::new()
        }
    }
}

/// Persist a catalog via temp-file-then-rename in the target directory, so
/// concurrent readers observe either the prior or the new full document.
pub fn persist_records(
    records: &HashMap<String, VaultRecord>,
    path: &Path,
) -> Result<(), VaultError> {
    let json = serde_json::to_vec_pretty(records)
        .map_err(|e| VaultError::Catalog(format!("cannot serialize records: {e}")))?;

    let tmp_path = path.with_extension("tmp");
    std::fs::write(&tmp_path, &json).map_err(|e| {
        VaultError::Catalog(format!("cannot write {}: {e}", tmp_path.display()))
    })?;
    std::fs::rename(&tmp_path, path).map_err(|e| {
        VaultError::Catalog(format!("cannot rename over {}: {e}", path.display()))
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{Query, QueryType, VMImage, VaultRecord};
    use std::path::PathBuf;
    use std::time::{Duration, UNIX_EPOCH};

    fn sample_record(release: &str, persistent: bool) -> VaultRecord {
        VaultRecord {
            image: VMImage {
                image_path: PathBuf::from(format!("/cache/vault/images/{release}/img")),
                kernel_path: PathBuf::from("/cache/vault/images/x/kernel"),
                id: "ab12".to_string(),
                original_release: "18.04 LTS".to_string(),
                release_date: "Tue, 01 Jan 2019 00:00:00 +0000".to_string(),
                aliases: vec![release.to_string(), "lts".to_string()],
                ..Default::default()
            },
            query: Query {
                name: String::new(),
                release: release.to_string(),
                persistent,
                remote_name: "release".to_string(),
                query_type: QueryType::Alias,
            },
            last_accessed: UNIX_EPOCH + Duration::from_secs(1_546_300_800),
        }
    }

    #[test]
    fn round_trip_preserves_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("records.json");

        let mut records = HashMap::new();
        records.insert("ab12".to_string(), sample_record("bionic", false));
        records.insert("cd34".to_string(), sample_record("xenial", true));

        persist_records(&records, &db_path).unwrap();
        let reloaded = load_records(&db_path);

        assert_eq!(reloaded, records);
    }

    #[test]
    fn missing_file_loads_empty() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(load_records(&tmp.path().join("absent.json")).is_empty());
    }

    #[test]
    fn malformed_document_loads_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("records.json");
        std::fs::write(&db_path, b"{ not json").unwrap();
        assert!(load_records(&db_path).is_empty());
    }

    #[test]
    fn missing_required_field_voids_whole_document() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("records.json");
        // Second entry has no image.path; the whole catalog is discarded.
        let json = r#"{
            "ab12": {
                "image": {"path": "/img"},
                "query": {"release": "bionic", "persistent": false},
                "last_accessed": 1
            },
            "cd34": {
                "image": {"id": "cd34"},
                "query": {"release": "xenial", "persistent": false},
                "last_accessed": 1
            }
        }"#;
        std::fs::write(&db_path, json).unwrap();
        assert!(load_records(&db_path).is_empty());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("records.json");
        let json = r#"{
            "ab12": {
                "image": {"path": "/img", "flavor": "server"},
                "query": {"release": "bionic", "persistent": false, "arch": "amd64"},
                "last_accessed": 1,
                "pinned": true
            }
        }"#;
        std::fs::write(&db_path, json).unwrap();
        let records = load_records(&db_path);
        assert_eq!(records.len(), 1);
        assert_eq!(records["ab12"].image.image_path, PathBuf::from("/img"));
    }

    #[test]
    fn legacy_type_key_is_accepted() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("records.json");
        let json = r#"{
            "ab12": {
                "image": {"path": "/img"},
                "query": {"release": "bionic", "persistent": false, "type": 1},
                "last_accessed": 1
            }
        }"#;
        std::fs::write(&db_path, json).unwrap();
        let records = load_records(&db_path);
        assert_eq!(records["ab12"].query.query_type, QueryType::HttpUrl);
    }

    #[test]
    fn failed_write_leaves_prior_document() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("records.json");

        let mut records = HashMap::new();
        records.insert("ab12".to_string(), sample_record("bionic", false));
        persist_records(&records, &db_path).unwrap();

        // Writing into a directory that no longer exists must fail without
        // touching the committed document.
        let gone = tmp.path().join("gone").join("records.json");
        assert!(persist_records(&records, &gone).is_err());
        assert_eq!(load_records(&db_path), records);
    }
}
