// SPDX-License-Identifier: GPL-2.0-only
// vmvault/vault-lib/src/platform.rs

//! Per-platform query admission. Ports tighten these predicates; the fetch
//! engine consults them before touching the network.

/// Whether http/file based image sources may be used at all.
pub fn is_image_url_supported() -> bool {
    cfg!(any(target_os = "linux", target_os = "macos"))
}

/// Whether the given remote may be used on this platform.
pub fn is_remote_supported(remote: &str) -> bool {
    if cfg!(target_os = "linux") {
        true
    } else {
        remote.is_empty() || remote == "release"
    }
}

/// Whether the given alias may be used on this platform.
pub fn is_alias_supported(alias: &str, _remote: &str) -> bool {
    if cfg!(target_os = "linux") {
        true
    } else {
        !matches!(alias, "core" | "core16" | "core18")
    }
}
