// SPDX-License-Identifier: GPL-2.0-only
// vmvault/vault-lib/src/image.rs

use crate::error::VaultError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// What kind of source a query's `release` field names.
///
/// Persisted in the catalogs as its integer discriminant; the numbering is
/// stable across releases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QueryType {
    #[default]
    Alias = 0,
    HttpUrl = 1,
    LocalFile = 2,
}

impl Serialize for QueryType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(*self as i32)
    }
}

impl<'de> Deserialize<'de> for QueryType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Unrecognized discriminants fold to Alias, matching how older
        // catalog files are tolerated on load.
        let value = i64::deserialize(deserializer)?;
        Ok(match value {
            1 => QueryType::HttpUrl,
            2 => QueryType::LocalFile,
            _ => QueryType::Alias,
        })
    }
}

/// Which artifacts a fetch should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchType {
    ImageOnly,
    ImageKernelAndInitrd,
}

/// A user image query: an alias, a remote URL, or a local file path.
///
/// `name` is the instance identity and may be empty when a caller only wants
/// to resolve image info. It is never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    #[serde(skip)]
    pub name: String,
    #[serde(default)]
    pub release: String,
    pub persistent: bool,
    #[serde(default)]
    pub remote_name: String,
    #[serde(alias = "type", default)]
    pub query_type: QueryType,
}

// ---------------------------------------------------------------------------
// Image info and on-disk artifacts
// ---------------------------------------------------------------------------

/// Image metadata returned by an [`ImageHost`](crate::host::ImageHost):
/// download locations plus the expected SHA-256 of the root image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VMImageInfo {
    pub id: String,
    pub release: String,
    pub release_title: String,
    pub version: String,
    pub aliases: Vec<String>,
    pub image_location: String,
    pub kernel_location: String,
    pub initrd_location: String,
    pub size: i64,
}

/// An on-disk VM image artifact set. Paths are absolute; an empty path
/// means the artifact is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VMImage {
    #[serde(rename = "path")]
    pub image_path: PathBuf,
    #[serde(default)]
    pub kernel_path: PathBuf,
    #[serde(default)]
    pub initrd_path: PathBuf,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub original_release: String,
    #[serde(default)]
    pub current_release: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default, with = "alias_entries")]
    pub aliases: Vec<String>,
}

/// A catalog entry: the artifact, the query that produced it, and when it
/// was last handed out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultRecord {
    pub image: VMImage,
    pub query: Query,
    #[serde(default = "SystemTime::now", with = "nanos_since_epoch")]
    pub last_accessed: SystemTime,
}

// Aliases persist as `[{"alias": "..."}]` objects.
mod alias_entries {
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Entry {
        #[serde(default)]
        alias: String,
    }

    pub fn serialize<S>(aliases: &[String], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(aliases.len()))?;
        for alias in aliases {
            seq.serialize_element(&Entry { alias: alias.clone() })?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = Vec::<Entry>::deserialize(deserializer)?;
        Ok(entries.into_iter().map(|e| e.alias).collect())
    }
}

// `last_accessed` persists as integer nanoseconds since the UNIX epoch.
// A stored zero loads as "now" rather than as 1970.
mod nanos_since_epoch {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    pub fn serialize<S>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let nanos = time
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as i64)
            .unwrap_or(0);
        serializer.serialize_i64(nanos)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SystemTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let nanos = i64::deserialize(deserializer)?;
        if nanos <= 0 {
            Ok(SystemTime::now())
        } else {
            Ok(UNIX_EPOCH + Duration::from_nanos(nanos as u64))
        }
    }
}

// ---------------------------------------------------------------------------
// Progress reporting and prepare hooks
// ---------------------------------------------------------------------------

/// Phases reported to a [`ProgressMonitor`] during a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressPhase {
    Image,
    Kernel,
    Initrd,
    Verify,
    Waiting,
}

/// Caller-supplied progress sink. Percent is in `[0, 100]`, or `-1` when
/// the phase has no measurable progress.
pub type ProgressMonitor = Arc<dyn Fn(ProgressPhase, i32) + Send + Sync>;

/// Caller-supplied transform turning a freshly fetched source image into the
/// prepared image that instances are cloned from. May be the identity.
pub type PrepareAction = Arc<dyn Fn(VMImage) -> Result<VMImage, VaultError> + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn query_type_serializes_as_int() {
        assert_eq!(serde_json::to_string(&QueryType::Alias).unwrap(), "0");
        assert_eq!(serde_json::to_string(&QueryType::HttpUrl).unwrap(), "1");
        assert_eq!(serde_json::to_string(&QueryType::LocalFile).unwrap(), "2");
    }

    #[test]
    fn query_type_tolerates_unknown_discriminants() {
        let parsed: QueryType = serde_json::from_str("42").unwrap();
        assert_eq!(parsed, QueryType::Alias);
    }

    #[test]
    fn query_name_is_not_persisted() {
        let query = Query {
            name: "ultimo".to_string(),
            release: "bionic".to_string(),
            persistent: false,
            remote_name: "release".to_string(),
            query_type: QueryType::Alias,
        };
        let json = serde_json::to_string(&query).unwrap();
        assert!(!json.contains("ultimo"));

        let reloaded: Query = serde_json::from_str(&json).unwrap();
        assert!(reloaded.name.is_empty());
        assert_eq!(reloaded.release, "bionic");
    }

    #[test]
    fn query_accepts_legacy_type_key() {
        let json = r#"{"release":"bionic","persistent":true,"remote_name":"","type":2}"#;
        let query: Query = serde_json::from_str(json).unwrap();
        assert_eq!(query.query_type, QueryType::LocalFile);
        assert!(query.persistent);
    }

    #[test]
    fn image_serializes_with_catalog_field_names() {
        let image = VMImage {
            image_path: PathBuf::from("/cache/vault/images/bionic-20190101/b.img"),
            id: "abcd".to_string(),
            aliases: vec!["bionic".to_string(), "lts".to_string()],
            ..Default::default()
        };
        let json = serde_json::to_value(&image).unwrap();
        assert_eq!(json["path"], "/cache/vault/images/bionic-20190101/b.img");
        assert_eq!(json["aliases"][0]["alias"], "bionic");
        assert_eq!(json["aliases"][1]["alias"], "lts");
        assert_eq!(json["kernel_path"], "");
    }

    #[test]
    fn record_round_trips_last_accessed() {
        let record = VaultRecord {
            image: VMImage {
                image_path: PathBuf::from("/img"),
                ..Default::default()
            },
            query: Query {
                persistent: false,
                ..Default::default()
            },
            last_accessed: UNIX_EPOCH + Duration::from_nanos(1_234_567_890),
        };
        let json = serde_json::to_string(&record).unwrap();
        let reloaded: VaultRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(reloaded.last_accessed, record.last_accessed);
    }

    #[test]
    fn zero_last_accessed_loads_as_now() {
        let json = r#"{"image":{"path":"/img"},"query":{"persistent":false},"last_accessed":0}"#;
        let record: VaultRecord = serde_json::from_str(json).unwrap();
        let age = SystemTime::now()
            .duration_since(record.last_accessed)
            .unwrap_or_default();
        assert!(age < Duration::from_secs(60));
    }
}
