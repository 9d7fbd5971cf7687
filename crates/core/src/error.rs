use filecdn_files::FilesError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("invalid path: {0}")]
    InvalidPath(String),
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("invalid entry name: {0}")]
    InvalidEntryName(String),
    #[error("malformed search query (expected field:value tokens): {0}")]
    MalformedQuery(String),
    #[error("malformed sort expression: {0}")]
    MalformedSort(String),
    #[error("file operation failed: {0}")]
    Files(#[source] FilesError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<FilesError> for CoreError {
    fn from(e: FilesError) -> Self {
        match e {
            FilesError::NotFound(path) => CoreError::NotFound(PathBuf::from(path)),
            other => CoreError::Files(other),
        }
    }
}

impl CoreError {
    /// Maps a raw I/O error on `path`, turning `NotFound` into [`CoreError::NotFound`].
    pub(crate) fn from_io(path: &std::path::Path, e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            CoreError::NotFound(path.to_path_buf())
        } else {
            CoreError::Io(e)
        }
    }
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
