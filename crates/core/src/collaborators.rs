//! Capabilities the listing pipeline consumes from its environment.
//!
//! MIME sniffing, recursive directory sizing and link construction are injected rather than
//! called directly, so that the HTTP layer, the CLI and tests can each supply their own.
//! [`Collaborators::with_defaults`] wires the filesystem-backed implementations from
//! `filecdn-files` and a [`PublicLinkBuilder`] rooted at the configured base URL.

use crate::config::CoreConfig;
use crate::constants::FILES_ROUTE;
use crate::CoreResult;
use filecdn_files::{ContentSniffer, WalkDirSizer};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Resolves the MIME type of a regular file.
pub trait ContentTypeDetector: Send + Sync {
    fn content_type(&self, path: &Path) -> CoreResult<String>;
}

/// Computes the total byte size of a directory subtree.
pub trait DirectorySizer: Send + Sync {
    fn recursive_size(&self, path: &Path) -> CoreResult<u64>;
}

/// Maps a root-relative path (`""` for the root) to its externally addressable URL.
pub trait LinkBuilder: Send + Sync {
    fn canonical_link(&self, relative_path: &str) -> String;
}

impl ContentTypeDetector for ContentSniffer {
    fn content_type(&self, path: &Path) -> CoreResult<String> {
        Ok(self.sniff_path(path)?)
    }
}

impl DirectorySizer for WalkDirSizer {
    fn recursive_size(&self, path: &Path) -> CoreResult<u64> {
        Ok(WalkDirSizer::recursive_size(self, path)?)
    }
}

/// Builds links of the form `<base>/files/<relative path>`.
///
/// Each path segment is percent-encoded; `/` separators are kept.
#[derive(Debug, Clone)]
pub struct PublicLinkBuilder {
    base_url: String,
}

impl PublicLinkBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }
}

impl LinkBuilder for PublicLinkBuilder {
    fn canonical_link(&self, relative_path: &str) -> String {
        let encoded: Vec<String> = relative_path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(encode_path_segment)
            .collect();

        if encoded.is_empty() {
            format!("{}{}", self.base_url, FILES_ROUTE)
        } else {
            format!("{}{}/{}", self.base_url, FILES_ROUTE, encoded.join("/"))
        }
    }
}

/// Percent-encodes everything outside the RFC 3986 unreserved set.
fn encode_path_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            other => out.push_str(&format!("%{other:02X}")),
        }
    }
    out
}

/// The set of capabilities handed to the listing pipeline.
#[derive(Clone)]
pub struct Collaborators {
    pub content_types: Arc<dyn ContentTypeDetector>,
    pub sizer: Arc<dyn DirectorySizer>,
    pub links: Arc<dyn LinkBuilder>,
}

impl Collaborators {
    /// Filesystem-backed defaults, with links rooted at the configured public base URL.
    pub fn with_defaults(cfg: &CoreConfig) -> Self {
        Self {
            content_types: Arc::new(ContentSniffer::new()),
            sizer: Arc::new(WalkDirSizer::new()),
            links: Arc::new(PublicLinkBuilder::new(cfg.public_base_url())),
        }
    }
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
