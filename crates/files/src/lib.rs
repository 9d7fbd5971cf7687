//! filecdn filesystem capabilities
//!
//! This crate provides the filesystem-facing building blocks that the listing pipeline in
//! `filecdn-core` calls into:
//!
//! - Streaming SHA-512 digests of file content ([`sha512_file`])
//! - Raw file reads for delivery over HTTP ([`read_file`])
//! - Best-effort MIME type detection from magic numbers ([`ContentSniffer`])
//! - Recursive directory sizing, `du`-style ([`WalkDirSizer`])
//!
//! Everything here is read-only. Nothing is cached; every call goes back to the filesystem.
//!
//! ## Example Usage
//!
//! ```no_run
//! use filecdn_files::{sha512_file, ContentSniffer, WalkDirSizer};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let digest = sha512_file(Path::new("shared/report.pdf"))?;
//! let mime = ContentSniffer::new().sniff_path(Path::new("shared/report.pdf"))?;
//! let total = WalkDirSizer::new().recursive_size(Path::new("shared"))?;
//! println!("{digest} {mime} {total}");
//! # Ok(())
//! # }
//! ```

mod constants;
mod files;
mod sizing;
mod sniff;

pub use constants::{
    EMPTY_MIME_TYPE, HASH_CHUNK_SIZE, OCTET_STREAM_MIME_TYPE, SNIFF_BUFFER_SIZE,
    TEXT_PLAIN_MIME_TYPE,
};
pub use files::{read_file, sha512_file};
pub use sizing::WalkDirSizer;
pub use sniff::ContentSniffer;

/// Errors that can occur during file operations
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// Path does not exist (or vanished while being read)
    #[error("Path not found: {0}")]
    NotFound(String),

    /// Path exists but is not a regular file
    #[error("Not a regular file: {0}")]
    NotAFile(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for file operations.
pub type FilesResult<T> = Result<T, FilesError>;
