//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. The intent is to avoid reading process-wide environment variables
//! during request handling, which can lead to inconsistent behaviour in multi-threaded runtimes
//! and test harnesses.

use crate::constants::{DEFAULT_PUBLIC_BASE_URL, DEFAULT_ROOT_DIR};
use crate::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    root_dir: PathBuf,
    public_base_url: String,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// The root directory is canonicalised so that every path handed out later is absolute.
    /// The public base URL loses any trailing `/`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidConfig` if:
    /// - the root directory does not exist or is not a directory,
    /// - the root directory cannot be canonicalised,
    /// - the base URL is empty or is not an `http://` / `https://` URL.
    pub fn new(root_dir: PathBuf, public_base_url: String) -> CoreResult<Self> {
        if !root_dir.is_dir() {
            return Err(CoreError::InvalidConfig(format!(
                "root directory does not exist or is not a directory: {}",
                root_dir.display()
            )));
        }

        let root_dir = root_dir.canonicalize().map_err(|e| {
            CoreError::InvalidConfig(format!(
                "cannot canonicalize root directory {}: {}",
                root_dir.display(),
                e
            ))
        })?;

        let public_base_url = public_base_url.trim().trim_end_matches('/').to_string();
        if public_base_url.is_empty() {
            return Err(CoreError::InvalidConfig(
                "public_base_url cannot be empty".into(),
            ));
        }
        if !(public_base_url.starts_with("http://") || public_base_url.starts_with("https://")) {
            return Err(CoreError::InvalidConfig(format!(
                "public_base_url must start with http:// or https://: {public_base_url}"
            )));
        }

        Ok(Self {
            root_dir,
            public_base_url,
        })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn public_base_url(&self) -> &str {
        &self.public_base_url
    }
}

/// Resolve the served root directory from an optional environment value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_ROOT_DIR`].
pub fn root_dir_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT_DIR))
}

/// Resolve the public base URL from an optional environment value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_PUBLIC_BASE_URL`].
pub fn public_base_url_from_env_value(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_PUBLIC_BASE_URL.to_string())
}
