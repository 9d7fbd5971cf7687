//! # filecdn Core
//!
//! Core listing logic for the filecdn directory server.
//!
//! This crate turns a directory under the served root into a paginated listing:
//! - Metadata extraction for files and directories (type, sizes, timestamps, SHA-512)
//! - Search filtering over `field:value` expressions
//! - Stable multi-key sorting
//! - Windowed pagination with reversible previous/next links
//! - Assembly of the JSON listing body
//!
//! **No API concerns**: HTTP routing, response envelopes and image transformation belong in
//! `api-rest` and `api-shared`.

pub mod collaborators;
pub mod config;
pub mod constants;
pub mod entry;
pub mod error;
pub mod listing;
pub mod pagination;
pub mod query;
pub mod search;
pub mod size;
pub mod sort;

pub use collaborators::{
    Collaborators, ContentTypeDetector, DirectorySizer, LinkBuilder, PublicLinkBuilder,
};
pub use config::{public_base_url_from_env_value, root_dir_from_env_value, CoreConfig};
pub use entry::{EntryField, EntryKind, EntryName, FileSystemEntry, MetadataExtractor};
pub use error::{CoreError, CoreResult};
pub use listing::{DirectoryListing, ListingService, ResolvedPath};
pub use pagination::{paginate, Page, PageRequest, PaginationData};
pub use query::QueryParams;
pub use search::SearchQuery;
pub use size::FormattedSize;
pub use sort::{SortDirection, SortSpec, SortingParams};
