// SPDX-License-Identifier: GPL-2.0-only
// vmvault/vault-lib/src/host.rs

use crate::error::VaultError;
use crate::image::{Query, VMImageInfo};
use std::collections::HashMap;
use std::sync::Arc;

/// A provider of image metadata. Each host owns one or more named remotes
/// (alias namespaces) and resolves queries against them.
pub trait ImageHost: Send + Sync {
    /// Resolve a query to image info, or `None` when this host has no match.
    fn info_for(&self, query: &Query) -> Result<Option<VMImageInfo>, VaultError>;

    /// The remote names this host serves.
    fn supported_remotes(&self) -> Vec<String>;
}

/// Routes queries to hosts by remote name. With an empty remote name the
/// hosts are consulted in registration order and the first match wins.
pub struct HostRegistry {
    hosts: Vec<Arc<dyn ImageHost>>,
    by_remote: HashMap<String, usize>,
}

impl HostRegistry {
    pub fn new(hosts: Vec<Arc<dyn ImageHost>>) -> Self {
        let mut by_remote = HashMap::new();
        for (index, host) in hosts.iter().enumerate() {
            for remote in host.supported_remotes() {
                by_remote.entry(remote).or_insert(index);
            }
        }
        HostRegistry { hosts, by_remote }
    }

    pub fn info_for(&self, query: &Query) -> Result<VMImageInfo, VaultError> {
        if !query.remote_name.is_empty() {
            let index = self
                .by_remote
                .get(&query.remote_name)
                .ok_or_else(|| VaultError::UnknownRemote(query.remote_name.clone()))?;
            if let Some(info) = self.hosts[*index].info_for(query)? {
                return Ok(info);
            }
        } else {
            for host in &self.hosts {
                if let Some(info) = host.info_for(query)? {
                    return Ok(info);
                }
            }
        }
        Err(VaultError::NoImage(query.release.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedHost {
        remote: &'static str,
        releases: Vec<&'static str>,
    }

    impl ImageHost for FixedHost {
        fn info_for(&self, query: &Query) -> Result<Option<VMImageInfo>, VaultError> {
            if self.releases.contains(&query.release.as_str()) {
                Ok(Some(VMImageInfo {
                    id: format!("{}-{}", self.remote, query.release),
                    release: query.release.clone(),
                    ..Default::default()
                }))
            } else {
                Ok(None)
            }
        }

        fn supported_remotes(&self) -> Vec<String> {
            vec![self.remote.to_string()]
        }
    }

    fn registry() -> HostRegistry {
        HostRegistry::new(vec![
            Arc::new(FixedHost {
                remote: "release",
                releases: vec!["bionic", "xenial"],
            }),
            Arc::new(FixedHost {
                remote: "daily",
                releases: vec!["devel", "bionic"],
            }),
        ])
    }

    fn query(release: &str, remote: &str) -> Query {
        Query {
            release: release.to_string(),
            remote_name: remote.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn routes_by_remote_name() {
        let info = registry().info_for(&query("bionic", "daily")).unwrap();
        assert_eq!(info.id, "daily-bionic");
    }

    #[test]
    fn empty_remote_takes_first_match_in_registration_order() {
        let info = registry().info_for(&query("bionic", "")).unwrap();
        assert_eq!(info.id, "release-bionic");

        let info = registry().info_for(&query("devel", "")).unwrap();
        assert_eq!(info.id, "daily-devel");
    }

    #[test]
    fn unknown_remote_is_an_error() {
        let err = registry().info_for(&query("bionic", "nightly")).unwrap_err();
        assert!(matches!(err, VaultError::UnknownRemote(_)));
    }

    #[test]
    fn no_matching_release_is_an_error() {
        let err = registry().info_for(&query("warty", "release")).unwrap_err();
        assert_eq!(err, VaultError::NoImage("warty".to_string()));

        let err = registry().info_for(&query("warty", "")).unwrap_err();
        assert!(matches!(err, VaultError::NoImage(_)));
    }
}
