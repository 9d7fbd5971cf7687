//! Content type detection.
//!
//! Detection is best-effort and should not be considered authoritative. Known binary formats are
//! recognised by magic number via `infer`; anything else is classified as empty, plain text or
//! opaque bytes.

use crate::constants::{
    EMPTY_MIME_TYPE, OCTET_STREAM_MIME_TYPE, SNIFF_BUFFER_SIZE, TEXT_PLAIN_MIME_TYPE,
};
use crate::files::{io_error, open_regular_file};
use crate::FilesResult;
use std::io::Read;
use std::path::Path;

/// Sniffs MIME types from the leading bytes of a file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentSniffer;

impl ContentSniffer {
    pub fn new() -> Self {
        Self
    }

    /// Detects the MIME type of the file at `path`.
    ///
    /// Only the first [`SNIFF_BUFFER_SIZE`] bytes are read.
    ///
    /// # Errors
    ///
    /// Returns `FilesError::NotFound` if the file vanished, `FilesError::NotAFile` for
    /// directories, and `FilesError::Io` if the read fails.
    pub fn sniff_path(&self, path: &Path) -> FilesResult<String> {
        let file = open_regular_file(path)?;
        let mut head = Vec::with_capacity(SNIFF_BUFFER_SIZE);
        file.take(SNIFF_BUFFER_SIZE as u64)
            .read_to_end(&mut head)
            .map_err(|e| io_error(path, e))?;

        Ok(self.sniff_bytes(&head).to_owned())
    }

    /// Detects the MIME type of an in-memory prefix.
    pub fn sniff_bytes(&self, head: &[u8]) -> &'static str {
        if head.is_empty() {
            return EMPTY_MIME_TYPE;
        }

        if let Some(kind) = infer::get(head) {
            return kind.mime_type();
        }

        if looks_like_text(head) {
            TEXT_PLAIN_MIME_TYPE
        } else {
            OCTET_STREAM_MIME_TYPE
        }
    }
}

fn looks_like_text(head: &[u8]) -> bool {
    if head.contains(&0) {
        return false;
    }
    match std::str::from_utf8(head) {
        Ok(_) => true,
        // A multi-byte character cut off by the sniff window is still text.
        Err(e) => e.error_len().is_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_sniff_png_header() {
        let sniffer = ContentSniffer::new();
        let png_header = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

        assert_eq!(sniffer.sniff_bytes(&png_header), "image/png");
    }

    #[test]
    fn test_sniff_plain_text() {
        let sniffer = ContentSniffer::new();

        assert_eq!(sniffer.sniff_bytes(b"quarterly figures\n"), "text/plain");
        assert_eq!(sniffer.sniff_bytes("отчёт".as_bytes()), "text/plain");
    }

    #[test]
    fn test_sniff_truncated_utf8_is_text() {
        let sniffer = ContentSniffer::new();
        let bytes = "ok ё".as_bytes();
        let truncated = &bytes[..bytes.len() - 1];

        assert_eq!(sniffer.sniff_bytes(truncated), "text/plain");
    }

    #[test]
    fn test_sniff_binary_and_empty() {
        let sniffer = ContentSniffer::new();

        assert_eq!(sniffer.sniff_bytes(&[0x13, 0x37, 0x00, 0xFE]), "application/octet-stream");
        assert_eq!(sniffer.sniff_bytes(&[]), "inode/x-empty");
    }

    #[test]
    fn test_sniff_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.txt");
        fs::write(&path, "meeting notes").unwrap();

        let mime = ContentSniffer::new().sniff_path(&path).unwrap();

        assert_eq!(mime, "text/plain");
    }

    #[test]
    fn test_sniff_path_missing() {
        let temp = TempDir::new().unwrap();
        let result = ContentSniffer::new().sniff_path(&temp.path().join("missing.txt"));

        assert!(matches!(result, Err(crate::FilesError::NotFound(_))));
    }
}
