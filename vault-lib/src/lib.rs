// SPDX-License-Identifier: GPL-2.0-only
pub mod config;
pub mod downloader;
pub mod error;
pub mod host;
pub mod image;
pub mod integrity;
pub mod layout;
pub mod platform;
pub mod records;
pub mod vault;
