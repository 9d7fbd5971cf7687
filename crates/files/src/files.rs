//! Content hashing and raw reads.
//!
//! Digests are computed by streaming the file in [`HASH_CHUNK_SIZE`] chunks, so memory use
//! stays flat regardless of file size. Raw reads load the whole file and are intended for
//! delivering the bytes in a single HTTP response.

use crate::constants::HASH_CHUNK_SIZE;
use crate::{FilesError, FilesResult};
use sha2::{Digest, Sha512};
use std::fs;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Computes the SHA-512 digest of a file as lowercase hex.
///
/// # Arguments
///
/// * `path` - Path to the file to hash
///
/// # Returns
///
/// The 128-character hexadecimal digest.
///
/// # Errors
///
/// Returns `FilesError` if:
/// - The file does not exist (`NotFound`)
/// - The path is not a regular file (`NotAFile`)
/// - Reading fails part way through (`Io`)
pub fn sha512_file(path: &Path) -> FilesResult<String> {
    let mut file = open_regular_file(path)?;

    let mut hasher = Sha512::new();
    let mut chunk = [0u8; HASH_CHUNK_SIZE];
    loop {
        let read = match file.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(io_error(path, e)),
        };
        hasher.update(&chunk[..read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Reads the whole content of a regular file.
///
/// # Errors
///
/// Returns `FilesError::NotFound` if the path is missing, `FilesError::NotAFile` if it is a
/// directory or special file, and `FilesError::Io` for any other read failure.
pub fn read_file(path: &Path) -> FilesResult<Vec<u8>> {
    let mut file = open_regular_file(path)?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)
        .map_err(|e| io_error(path, e))?;
    Ok(buffer)
}

pub(crate) fn open_regular_file(path: &Path) -> FilesResult<fs::File> {
    let metadata = fs::metadata(path).map_err(|e| io_error(path, e))?;
    if !metadata.is_file() {
        return Err(FilesError::NotAFile(path.display().to_string()));
    }
    fs::File::open(path).map_err(|e| io_error(path, e))
}

/// Maps `ErrorKind::NotFound` onto `FilesError::NotFound`, keeping other errors as I/O.
pub(crate) fn io_error(path: &Path, e: std::io::Error) -> FilesError {
    if e.kind() == ErrorKind::NotFound {
        FilesError::NotFound(path.display().to_string())
    } else {
        FilesError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sha512_known_digest() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("abc.txt");
        fs::write(&path, b"abc").unwrap();

        let digest = sha512_file(&path).unwrap();

        assert_eq!(
            digest,
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
             2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
        );
    }

    #[test]
    fn test_sha512_empty_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty");
        fs::write(&path, b"").unwrap();

        let digest = sha512_file(&path).unwrap();

        assert_eq!(digest.len(), 128);
        assert!(digest.starts_with("cf83e1357eefb8bd"));
    }

    #[test]
    fn test_sha512_spans_multiple_chunks() {
        let temp = TempDir::new().unwrap();
        let small = temp.path().join("small");
        let large = temp.path().join("large");
        let content: Vec<u8> = (0..(HASH_CHUNK_SIZE * 3 + 17))
            .map(|i| (i % 251) as u8)
            .collect();
        fs::write(&large, &content).unwrap();
        fs::write(&small, &content[..HASH_CHUNK_SIZE]).unwrap();

        let mut hasher = Sha512::new();
        hasher.update(&content);
        let expected = hex::encode(hasher.finalize());

        assert_eq!(sha512_file(&large).unwrap(), expected);
        assert_ne!(sha512_file(&small).unwrap(), expected);
    }

    #[test]
    fn test_sha512_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = sha512_file(&temp.path().join("gone.bin"));

        assert!(matches!(result, Err(FilesError::NotFound(_))));
    }

    #[test]
    fn test_sha512_rejects_directory() {
        let temp = TempDir::new().unwrap();
        let result = sha512_file(temp.path());

        assert!(matches!(result, Err(FilesError::NotAFile(_))));
    }

    #[test]
    fn test_read_file_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("binary.dat");
        let data: Vec<u8> = (0..=255).collect();
        fs::write(&path, &data).unwrap();

        assert_eq!(read_file(&path).unwrap(), data);
    }

    #[test]
    fn test_read_file_not_found() {
        let temp = TempDir::new().unwrap();
        let result = read_file(&temp.path().join("nothing"));

        assert!(matches!(result, Err(FilesError::NotFound(_))));
    }
}
