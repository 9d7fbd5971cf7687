//! Filesystem entry metadata.
//!
//! A [`FileSystemEntry`] is an immutable snapshot of one file or directory taken at request time:
//! name, type, size (raw and human-readable), timestamps, content hash for files, and a canonical
//! link. Entries are built by [`MetadataExtractor`] and never mutated or cached afterwards.
//!
//! # Fields
//!
//! Search and sort both address entry attributes through the closed [`EntryField`] enum. Each
//! variant maps to one accessor, so there is no name-based reflection at comparison time.

use crate::collaborators::Collaborators;
use crate::constants::{DIRECTORY_TYPE, TIMESTAMP_FORMAT};
use crate::size::FormattedSize;
use crate::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

/// The last path segment of an entry. Never empty and never contains `/`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct EntryName(String);

impl EntryName {
    /// # Errors
    ///
    /// Returns `CoreError::InvalidEntryName` if `name` is empty or contains a path separator.
    pub fn new(name: impl Into<String>) -> CoreResult<Self> {
        let name = name.into();
        if name.is_empty() || name.contains('/') {
            return Err(CoreError::InvalidEntryName(name));
        }
        Ok(Self(name))
    }

    /// Takes the final component of `path`. Non-UTF-8 names are converted lossily.
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| CoreError::InvalidEntryName(path.display().to_string()))?;
        Self::new(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EntryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Directory, or file with its sniffed MIME type and content digest.
///
/// Holding the hash inside the file variant keeps "directory ⇔ no hash" true by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File { mime_type: String, hash: String },
}

impl EntryKind {
    /// The `type` string reported for this kind.
    pub fn type_name(&self) -> &str {
        match self {
            EntryKind::Directory => DIRECTORY_TYPE,
            EntryKind::File { mime_type, .. } => mime_type,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, EntryKind::Directory)
    }
}

/// Entry attributes addressable by search and sort parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryField {
    Name,
    Type,
    Created,
    Modified,
    SizeBytes,
    SizeNumber,
    SizeSuffix,
}

impl EntryField {
    pub const ALL: [EntryField; 7] = [
        EntryField::Name,
        EntryField::SizeNumber,
        EntryField::SizeSuffix,
        EntryField::Type,
        EntryField::Created,
        EntryField::Modified,
        EntryField::SizeBytes,
    ];

    /// Parses the wire name of a field (`name`, `sizeBytes`, ...). Case-sensitive.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "name" => Some(EntryField::Name),
            "type" => Some(EntryField::Type),
            "created" => Some(EntryField::Created),
            "modified" => Some(EntryField::Modified),
            "sizeBytes" => Some(EntryField::SizeBytes),
            "sizeNumber" => Some(EntryField::SizeNumber),
            "sizeSuffix" => Some(EntryField::SizeSuffix),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryField::Name => "name",
            EntryField::Type => "type",
            EntryField::Created => "created",
            EntryField::Modified => "modified",
            EntryField::SizeBytes => "sizeBytes",
            EntryField::SizeNumber => "sizeNumber",
            EntryField::SizeSuffix => "sizeSuffix",
        }
    }
}

/// Immutable metadata record for one filesystem object.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSystemEntry {
    name: EntryName,
    path: PathBuf,
    kind: EntryKind,
    link: String,
    size_bytes: u64,
    size: FormattedSize,
    created: String,
    modified: String,
}

impl FileSystemEntry {
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Absolute path on the serving host. Internal only; never serialised.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> &EntryKind {
        &self.kind
    }

    pub fn type_name(&self) -> &str {
        self.kind.type_name()
    }

    pub fn is_directory(&self) -> bool {
        self.kind.is_directory()
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn size_number(&self) -> f64 {
        self.size.number
    }

    pub fn size_suffix(&self) -> &str {
        &self.size.suffix
    }

    pub fn created(&self) -> &str {
        &self.created
    }

    pub fn modified(&self) -> &str {
        &self.modified
    }

    /// SHA-512 hex digest; `None` for directories.
    pub fn hash(&self) -> Option<&str> {
        match &self.kind {
            EntryKind::File { hash, .. } => Some(hash.as_str()),
            EntryKind::Directory => None,
        }
    }

    /// Text value of `field` as seen by search predicates.
    pub fn field_text(&self, field: EntryField) -> Cow<'_, str> {
        match field {
            EntryField::Name => Cow::Borrowed(self.name()),
            EntryField::Type => Cow::Borrowed(self.type_name()),
            EntryField::Created => Cow::Borrowed(self.created()),
            EntryField::Modified => Cow::Borrowed(self.modified()),
            EntryField::SizeBytes => Cow::Owned(self.size_bytes.to_string()),
            EntryField::SizeNumber => Cow::Owned(self.size.number_text()),
            EntryField::SizeSuffix => Cow::Borrowed(self.size_suffix()),
        }
    }
}

impl Serialize for FileSystemEntry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let hash = self.hash();
        let len = if hash.is_some() { 9 } else { 8 };
        let mut state = serializer.serialize_struct("FileSystemEntry", len)?;
        state.serialize_field("name", self.name())?;
        state.serialize_field("type", self.type_name())?;
        state.serialize_field("link", &self.link)?;
        state.serialize_field("sizeBytes", &self.size_bytes)?;
        state.serialize_field("sizeNumber", &self.size.number)?;
        state.serialize_field("sizeSuffix", &self.size.suffix)?;
        state.serialize_field("created", &self.created)?;
        state.serialize_field("modified", &self.modified)?;
        if let Some(hash) = hash {
            state.serialize_field("hash", hash)?;
        }
        state.end()
    }
}

/// Builds [`FileSystemEntry`] values for paths under a served root.
#[derive(Debug)]
pub struct MetadataExtractor<'a> {
    root: &'a Path,
    collaborators: &'a Collaborators,
}

impl<'a> MetadataExtractor<'a> {
    pub fn new(root: &'a Path, collaborators: &'a Collaborators) -> Self {
        Self {
            root,
            collaborators,
        }
    }

    /// Reads metadata for `path`.
    ///
    /// Files get their size from `stat`, their type from the content-type collaborator and a
    /// streamed SHA-512 digest. Directories get the `directory` type and a recursive size from
    /// the sizer collaborator.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if the path is gone by the time it is read, or
    /// another `CoreError` if a collaborator or the hash computation fails.
    pub fn extract(&self, path: &Path) -> CoreResult<FileSystemEntry> {
        let metadata = fs::metadata(path).map_err(|e| CoreError::from_io(path, e))?;
        let name = EntryName::from_path(path)?;
        let link = self
            .collaborators
            .links
            .canonical_link(&relative_link_path(self.root, path));

        let (kind, size_bytes) = if metadata.is_dir() {
            let size = self.collaborators.sizer.recursive_size(path)?;
            (EntryKind::Directory, size)
        } else {
            let mime_type = self.collaborators.content_types.content_type(path)?;
            let hash = filecdn_files::sha512_file(path)?;
            (EntryKind::File { mime_type, hash }, metadata.len())
        };

        let modified = metadata.modified()?;
        // Not every filesystem records a creation time.
        let created = metadata.created().unwrap_or(modified);

        Ok(FileSystemEntry {
            name,
            path: path.to_path_buf(),
            kind,
            link,
            size_bytes,
            size: FormattedSize::from_bytes(size_bytes),
            created: render_timestamp(created),
            modified: render_timestamp(modified),
        })
    }
}

/// Renders a timestamp in UTC, truncated to whole seconds.
pub fn render_timestamp(time: SystemTime) -> String {
    let datetime: DateTime<Utc> = time.into();
    datetime.format(TIMESTAMP_FORMAT).to_string()
}

/// `path` relative to `root`, `/`-joined. Falls back to the file name outside the root.
fn relative_link_path(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(relative) => relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
pub(crate) fn test_entry(
    name: &str,
    kind: EntryKind,
    size_bytes: u64,
    modified: &str,
) -> FileSystemEntry {
    FileSystemEntry {
        name: EntryName::new(name).unwrap(),
        path: PathBuf::from("/srv").join(name),
        link: format!("http://cdn.test/files/{name}"),
        kind,
        size_bytes,
        size: FormattedSize::from_bytes(size_bytes),
        created: modified.to_string(),
        modified: modified.to_string(),
    }
}
