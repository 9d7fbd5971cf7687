//! Constants used throughout the filecdn core crate.
//!
//! Request parameter names, defaults and the fixed strings that appear in listing responses
//! live here so the HTTP layer and the CLI agree on them.

/// Default directory served when no explicit root is configured.
pub const DEFAULT_ROOT_DIR: &str = "files_root";

/// Default externally visible base URL used to build canonical links.
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:3000";

/// Route prefix under which the served tree is addressable.
pub const FILES_ROUTE: &str = "/files";

/// `type` value reported for directories.
pub const DIRECTORY_TYPE: &str = "directory";

/// `parentDirectory` value reported when listing the root itself.
pub const ROOT_DIRECTORY_SENTINEL: &str = "This is root directory!";

/// Rendering of `created` / `modified` timestamps (whole seconds).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Search expression parameter (`field1:value1 field2:value2`).
pub const SEARCH_QUERY_PARAM: &str = "q";

/// Sort field list parameter (`field1 field2`).
pub const SORT_FIELDS_PARAM: &str = "sf";

/// Sort order parameter (`d` for descending).
pub const SORT_ORDER_PARAM: &str = "so";

/// 1-based window start parameter.
pub const START_PARAM: &str = "start";

/// Window size parameter.
pub const LIMIT_PARAM: &str = "limit";

pub const DEFAULT_START: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;

/// Diagnostic marker for search fields outside the allow-list.
pub const UNSUPPORTED_MARKER: &str = "unsupported";

/// Diagnostic marker for recognised fields that are deliberately not applied.
pub const UNPROCESSED_MARKER: &str = "unprocessed";
