//! Constants shared by the filesystem capabilities.

/// Chunk size used when streaming file content through the hasher.
pub const HASH_CHUNK_SIZE: usize = 4096;

/// Number of leading bytes inspected when sniffing a content type.
pub const SNIFF_BUFFER_SIZE: usize = 8192;

/// MIME type reported for zero-length files.
pub const EMPTY_MIME_TYPE: &str = "inode/x-empty";

/// MIME type reported for content that decodes as UTF-8 text.
pub const TEXT_PLAIN_MIME_TYPE: &str = "text/plain";

/// Fallback MIME type for unrecognised binary content.
pub const OCTET_STREAM_MIME_TYPE: &str = "application/octet-stream";
