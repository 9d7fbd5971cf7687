//! Directory listing service.
//!
//! Ties the pipeline together for one request: resolve the path under the served root, extract
//! metadata for every child, filter by the search expression, sort, paginate and assemble the
//! response. Nothing is cached; every call reads the filesystem afresh.

use crate::collaborators::Collaborators;
use crate::config::CoreConfig;
use crate::constants::{
    ROOT_DIRECTORY_SENTINEL, SEARCH_QUERY_PARAM, SORT_FIELDS_PARAM, SORT_ORDER_PARAM,
};
use crate::entry::{FileSystemEntry, MetadataExtractor};
use crate::pagination::{paginate, PaginationData};
use crate::query::QueryParams;
use crate::search::SearchQuery;
use crate::sort::{SortSpec, SortingParams};
use crate::{CoreError, CoreResult};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// The JSON body returned for a directory request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryListing {
    pub parent_directory: String,
    pub files_list: Vec<FileSystemEntry>,
    pub pagination_data: PaginationData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_params: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sorting_params: Option<SortingParams>,
}

/// A request path resolved against the served root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedPath {
    Directory(PathBuf),
    File(PathBuf),
}

impl ResolvedPath {
    pub fn path(&self) -> &Path {
        match self {
            ResolvedPath::Directory(path) | ResolvedPath::File(path) => path,
        }
    }
}

/// Serves listings and entry metadata for the configured root.
#[derive(Debug, Clone)]
pub struct ListingService {
    cfg: Arc<CoreConfig>,
    collaborators: Collaborators,
}

impl ListingService {
    /// Creates a service using the filesystem-backed collaborators.
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        let collaborators = Collaborators::with_defaults(&cfg);
        Self::with_collaborators(cfg, collaborators)
    }

    pub fn with_collaborators(cfg: Arc<CoreConfig>, collaborators: Collaborators) -> Self {
        Self { cfg, collaborators }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    pub fn collaborators(&self) -> &Collaborators {
        &self.collaborators
    }

    /// Resolves a root-relative request path (`""` for the root).
    ///
    /// # Errors
    ///
    /// - `CoreError::InvalidPath` if the path tries to leave the root (`..`, drive prefixes).
    /// - `CoreError::NotFound` if nothing exists at the resolved location.
    pub fn resolve(&self, relative: &str) -> CoreResult<ResolvedPath> {
        let segments = normalize_relative(relative)?;
        self.resolve_segments(&segments)
    }

    /// Metadata for the single entry at `relative`.
    ///
    /// # Errors
    ///
    /// As [`ListingService::resolve`], plus any extraction failure.
    pub fn entry(&self, relative: &str) -> CoreResult<FileSystemEntry> {
        let resolved = self.resolve(relative)?;
        self.extractor().extract(resolved.path())
    }

    /// Lists the directory at `relative`.
    ///
    /// `params` is the full request query: `q`, `sf`, `so`, `start` and `limit` drive the
    /// pipeline and every parameter except `start` / `limit` is echoed into the page links.
    ///
    /// # Errors
    ///
    /// - `CoreError::InvalidPath` / `CoreError::NotFound` as for [`ListingService::resolve`].
    /// - `CoreError::NotADirectory` if `relative` names a file.
    /// - `CoreError::MalformedQuery` / `CoreError::MalformedSort` for unparseable `q` / `sf`.
    /// - `CoreError::Io` if the directory cannot be read.
    pub fn list_directory(
        &self,
        relative: &str,
        params: &QueryParams,
    ) -> CoreResult<DirectoryListing> {
        let segments = normalize_relative(relative)?;
        let dir = match self.resolve_segments(&segments)? {
            ResolvedPath::Directory(dir) => dir,
            ResolvedPath::File(path) => return Err(CoreError::NotADirectory(path)),
        };

        let search = params
            .get(SEARCH_QUERY_PARAM)
            .filter(|q| !q.is_empty())
            .map(SearchQuery::parse)
            .transpose()?;
        let sort = SortSpec::parse(params.get(SORT_FIELDS_PARAM), params.get(SORT_ORDER_PARAM))?;

        let mut entries = self.read_children(&dir)?;
        if let Some(search) = &search {
            entries.retain(|entry| search.matches(entry));
        }
        sort.sort(&mut entries);

        let base_url = self.collaborators.links.canonical_link(&segments.join("/"));
        let page = paginate(entries, &base_url, params);

        tracing::debug!(
            "listed {} ({} of {} entries)",
            dir.display(),
            page.items.len(),
            page.data.items_count
        );

        Ok(DirectoryListing {
            parent_directory: self.parent_link(&segments),
            files_list: page.items,
            pagination_data: page.data,
            search_params: search.map(|s| s.diagnostics()),
            sorting_params: sort.diagnostics(),
        })
    }

    fn extractor(&self) -> MetadataExtractor<'_> {
        MetadataExtractor::new(self.cfg.root_dir(), &self.collaborators)
    }

    fn resolve_segments(&self, segments: &[String]) -> CoreResult<ResolvedPath> {
        let path = segments
            .iter()
            .fold(self.cfg.root_dir().to_path_buf(), |acc, s| acc.join(s));
        let metadata = fs::metadata(&path).map_err(|e| CoreError::from_io(&path, e))?;

        if metadata.is_dir() {
            Ok(ResolvedPath::Directory(path))
        } else {
            Ok(ResolvedPath::File(path))
        }
    }

    /// Extracts every immediate child of `dir`. Children that vanish or cannot be read are
    /// logged and skipped.
    fn read_children(&self, dir: &Path) -> CoreResult<Vec<FileSystemEntry>> {
        let extractor = self.extractor();
        let mut entries = Vec::new();

        for child in fs::read_dir(dir).map_err(|e| CoreError::from_io(dir, e))? {
            let child = match child {
                Ok(child) => child,
                Err(e) => {
                    tracing::warn!("failed to read entry in {}: {}", dir.display(), e);
                    continue;
                }
            };
            let path = child.path();
            match extractor.extract(&path) {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::warn!("skipping {}: {}", path.display(), e),
            }
        }

        // read_dir order is platform-defined; pin it so ties sort the same on every request.
        entries.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(entries)
    }

    fn parent_link(&self, segments: &[String]) -> String {
        match segments.split_last() {
            None => ROOT_DIRECTORY_SENTINEL.to_string(),
            Some((_, parent)) => self.collaborators.links.canonical_link(&parent.join("/")),
        }
    }
}

/// Splits a request path into plain segments, rejecting `..`, absolute and prefixed components.
///
/// Leading, trailing and repeated `/` and `.` segments are ignored. Symlinks inside the served
/// root are followed when the segments are resolved, so a link may expose content stored
/// elsewhere on disk.
fn normalize_relative(relative: &str) -> CoreResult<Vec<String>> {
    let mut segments = Vec::new();
    for component in Path::new(relative.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => segments.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(CoreError::InvalidPath(relative.to_string()));
            }
        }
    }
    Ok(segments)
}
