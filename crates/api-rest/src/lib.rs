//! # API REST
//!
//! REST API implementation for filecdn.
//!
//! Handles:
//! - HTTP endpoints with axum (`/`, `/health`, `/files`, `/files/*path`)
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON envelopes, CORS, request tracing)
//!
//! Uses `filecdn-core` for listings and `api-shared` for the response envelope.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod imaging;

use axum::{
    extract::{Path as AxumPath, RawQuery, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{ApiMessage, DebugFlag, HealthRes, HealthService, ResponseType};
use filecdn_core::constants::FILES_ROUTE;
use filecdn_core::{DirectoryListing, ListingService, QueryParams, ResolvedPath};

pub use error::ApiError;
pub use imaging::{ImageRequest, ImageTransformer, TransformedImage};

/// Query parameter switching on `debugInfo` in error replies.
pub const DEBUG_PARAM: &str = "dbg";

/// Application state for the REST API server
///
/// Shared by all request handlers. The listing service is read-only; the image transformer is
/// optional and derived-image requests fail with 501 without one.
#[derive(Clone)]
pub struct AppState {
    pub listing: Arc<ListingService>,
    pub images: Option<Arc<dyn ImageTransformer>>,
}

impl AppState {
    pub fn new(listing: Arc<ListingService>) -> Self {
        Self {
            listing,
            images: None,
        }
    }

    pub fn with_image_transformer(mut self, images: Arc<dyn ImageTransformer>) -> Self {
        self.images = Some(images);
        self
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, list_root, get_path),
    components(schemas(HealthRes, ApiMessage, ResponseType))
)]
pub struct ApiDoc;

/// Builds the REST router with Swagger UI, permissive CORS and request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_redirect))
        .route("/health", get(health))
        .route(FILES_ROUTE, get(list_root))
        .route(&format!("{FILES_ROUTE}/*path"), get(get_path))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Sends bare `/` to the root listing.
async fn root_redirect() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, FILES_ROUTE)]).into_response()
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// # Returns
/// * `Json<HealthRes>` - Health status response containing service status
async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/files",
    params(
        ("q" = Option<String>, Query, description = "Search expression, `field:value` tokens separated by spaces"),
        ("sf" = Option<String>, Query, description = "Sort fields separated by spaces"),
        ("so" = Option<String>, Query, description = "`d` for descending order"),
        ("start" = Option<String>, Query, description = "1-based index of the first item"),
        ("limit" = Option<String>, Query, description = "Page size"),
        ("dbg" = Option<String>, Query, description = "Include debug details in error replies")
    ),
    responses(
        (status = 200, description = "Paginated listing of the served root"),
        (status = 400, description = "Malformed search or sort expression", body = ApiMessage),
        (status = 500, description = "Internal server error", body = ApiMessage)
    )
)]
/// List the served root directory
#[axum::debug_handler]
async fn list_root(State(state): State<AppState>, RawQuery(raw): RawQuery) -> Response {
    serve(state, String::new(), raw).await
}

#[utoipa::path(
    get,
    path = "/files/{path}",
    params(
        ("path" = String, Path, description = "Path relative to the served root"),
        ("thumbnail" = Option<String>, Query, description = "Return a thumbnail (boolean)"),
        ("size" = Option<String>, Query, description = "Thumbnail box, `INT` or `INTxINT`"),
        ("crop" = Option<String>, Query, description = "Crop the thumbnail to fill the box (boolean)"),
        ("watermark" = Option<String>, Query, description = "Stamp a watermark (boolean)"),
        ("dbg" = Option<String>, Query, description = "Include debug details in error replies")
    ),
    responses(
        (status = 200, description = "Directory listing, or file contents"),
        (status = 400, description = "Bad request", body = ApiMessage),
        (status = 404, description = "Not found", body = ApiMessage),
        (status = 500, description = "Internal server error", body = ApiMessage),
        (status = 501, description = "Image transformation is not configured", body = ApiMessage)
    )
)]
/// List a directory or fetch a file
///
/// Directories return the same listing as `/files`. Files are returned as raw bytes with a
/// sniffed `Content-Type`, or as a derived image when `thumbnail` / `watermark` are set.
#[axum::debug_handler]
async fn get_path(
    State(state): State<AppState>,
    AxumPath(path): AxumPath<String>,
    RawQuery(raw): RawQuery,
) -> Response {
    serve(state, path, raw).await
}

/// What a `/files` request resolved to.
enum FileReply {
    Listing(DirectoryListing),
    Bytes { bytes: Vec<u8>, content_type: String },
}

async fn serve(state: AppState, path: String, raw_query: Option<String>) -> Response {
    let params = QueryParams::parse(raw_query.as_deref().unwrap_or(""));
    let debug = DebugFlag::from_param(params.get(DEBUG_PARAM));

    let outcome = tokio::task::spawn_blocking(move || resolve_reply(&state, &path, &params)).await;

    let reply = match outcome {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!("Request task failed: {:?}", e);
            Err(ApiError::internal(e.to_string()))
        }
    };

    match reply {
        Ok(FileReply::Listing(listing)) => Json(listing).into_response(),
        Ok(FileReply::Bytes {
            bytes,
            content_type,
        }) => ([(header::CONTENT_TYPE, content_type)], bytes).into_response(),
        Err(e) => e.with_debug(debug).into_response(),
    }
}

/// Runs on the blocking pool: every step here touches the filesystem.
fn resolve_reply(
    state: &AppState,
    relative: &str,
    params: &QueryParams,
) -> Result<FileReply, ApiError> {
    match state.listing.resolve(relative)? {
        ResolvedPath::Directory(_) => Ok(FileReply::Listing(
            state.listing.list_directory(relative, params)?,
        )),
        ResolvedPath::File(path) => file_reply(state, &path, params),
    }
}

fn file_reply(state: &AppState, path: &Path, params: &QueryParams) -> Result<FileReply, ApiError> {
    let request = ImageRequest::from_params(params).map_err(|e| ApiError::bad_request(e.0))?;

    if request.is_passthrough() {
        let content_type = state
            .listing
            .collaborators()
            .content_types
            .content_type(path)?;
        let bytes = filecdn_files::read_file(path).map_err(filecdn_core::CoreError::from)?;
        return Ok(FileReply::Bytes {
            bytes,
            content_type,
        });
    }

    let Some(images) = &state.images else {
        return Err(ApiError::new(
            StatusCode::NOT_IMPLEMENTED,
            Some("Image transformation is not available on this server".into()),
            "no image transformer configured",
        ));
    };

    match images.transform(path, &request) {
        Ok(image) => Ok(FileReply::Bytes {
            bytes: image.bytes,
            content_type: image.content_type,
        }),
        Err(e) => {
            tracing::error!("Image transform error for {}: {:?}", path.display(), e);
            Err(ApiError::internal(format!("{e:?}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use filecdn_core::CoreConfig;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt;

    struct EchoTransformer;

    impl ImageTransformer for EchoTransformer {
        fn transform(
            &self,
            source: &Path,
            request: &ImageRequest,
        ) -> anyhow::Result<TransformedImage> {
            let name = source.file_name().unwrap().to_string_lossy();
            let size = request
                .thumbnail
                .map(|t| format!("{}x{}", t.width, t.height))
                .unwrap_or_default();
            Ok(TransformedImage {
                bytes: format!("{name}:{size}:{}", request.watermark.is_some()).into_bytes(),
                content_type: "image/jpeg".into(),
            })
        }
    }

    fn fixture() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("docs")).unwrap();
        fs::write(temp.path().join("docs").join("readme.txt"), "hello").unwrap();
        for i in 0..12 {
            fs::write(temp.path().join(format!("item_{i:02}.txt")), "x").unwrap();
        }
        temp
    }

    fn app(root: &Path, images: bool) -> Router {
        let cfg = CoreConfig::new(root.to_path_buf(), "http://cdn.test".into()).unwrap();
        let mut state = AppState::new(Arc::new(ListingService::new(Arc::new(cfg))));
        if images {
            state = state.with_image_transformer(Arc::new(EchoTransformer));
        }
        router(state)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>, Option<String>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec(), content_type)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let (status, body, _) = get(app, uri).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let temp = fixture();

        let (status, json) = get_json(app(temp.path(), false), "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["ok"], true);
    }

    #[tokio::test]
    async fn test_root_redirects_to_files() {
        let temp = fixture();

        let response = app(temp.path(), false)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/files");
    }

    #[tokio::test]
    async fn test_root_listing() {
        let temp = fixture();

        let (status, json) = get_json(app(temp.path(), false), "/files").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["parentDirectory"], "This is root directory!");
        assert_eq!(json["paginationData"]["itemsCount"], 13);
        assert_eq!(json["paginationData"]["pages"], 2);
        assert_eq!(json["filesList"][0]["name"], "docs");
        assert_eq!(
            json["paginationData"]["nextPage"],
            "http://cdn.test/files?start=11&limit=10"
        );
    }

    #[tokio::test]
    async fn test_listing_with_search_sort_and_paging() {
        let temp = fixture();

        let (status, json) = get_json(
            app(temp.path(), false),
            "/files?q=name:item&sf=name&so=d&limit=5&start=6",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["filesList"][0]["name"], "item_06.txt");
        assert_eq!(json["paginationData"]["itemsCount"], 12);
        assert_eq!(json["searchParams"]["name"], "item");
        assert_eq!(json["sortingParams"]["sortingDirection"], "Desc");
        assert_eq!(
            json["paginationData"]["previousPage"],
            "http://cdn.test/files?start=1&limit=5&q=name%3Aitem&sf=name&so=d"
        );
    }

    #[tokio::test]
    async fn test_nested_listing() {
        let temp = fixture();

        let (status, json) = get_json(app(temp.path(), false), "/files/docs").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["parentDirectory"], "http://cdn.test/files");
        assert_eq!(
            json["filesList"][0]["link"],
            "http://cdn.test/files/docs/readme.txt"
        );
    }

    #[tokio::test]
    async fn test_raw_file() {
        let temp = fixture();

        let (status, body, content_type) =
            get(app(temp.path(), false), "/files/docs/readme.txt").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"hello");
        assert_eq!(content_type.as_deref(), Some("text/plain"));
    }

    #[tokio::test]
    async fn test_missing_path_is_404_envelope() {
        let temp = fixture();

        let (status, json) = get_json(app(temp.path(), false), "/files/nope").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["responseType"], "Error");
        assert_eq!(json["message"], "Not found!");
        assert_eq!(json["status"], 404);
        assert!(json.get("debugInfo").is_none());
    }

    #[tokio::test]
    async fn test_malformed_query_is_400() {
        let temp = fixture();

        let (status, json) = get_json(app(temp.path(), false), "/files?q=name").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], error::MALFORMED_QUERY_MESSAGE);
    }

    #[tokio::test]
    async fn test_malformed_sort_is_400() {
        let temp = fixture();

        let (status, json) = get_json(app(temp.path(), false), "/files?sf=name,type").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], error::MALFORMED_SORT_MESSAGE);
    }

    #[tokio::test]
    async fn test_debug_info() {
        let temp = fixture();

        let (_, on) = get_json(app(temp.path(), false), "/files/nope?dbg=1").await;
        let (_, invalid) = get_json(app(temp.path(), false), "/files/nope?dbg=perhaps").await;

        assert!(on["debugInfo"].as_str().unwrap().contains("NotFound"));
        assert_eq!(
            invalid["debugInfo"],
            api_shared::message::DEBUG_FLAG_INVALID_MESSAGE
        );
    }

    #[tokio::test]
    async fn test_thumbnail_without_transformer_is_501() {
        let temp = fixture();

        let (status, json) =
            get_json(app(temp.path(), false), "/files/docs/readme.txt?thumbnail=1").await;

        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
        assert_eq!(json["status"], 501);
    }

    #[tokio::test]
    async fn test_thumbnail_and_watermark_with_transformer() {
        let temp = fixture();

        let (status, body, content_type) = get(
            app(temp.path(), true),
            "/files/docs/readme.txt?thumbnail=yes&size=64x32&watermark=on",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"readme.txt:64x32:true");
        assert_eq!(content_type.as_deref(), Some("image/jpeg"));
    }

    #[tokio::test]
    async fn test_invalid_image_flag_is_400() {
        let temp = fixture();

        let (status, json) = get_json(
            app(temp.path(), true),
            "/files/docs/readme.txt?watermark=sometimes",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json["message"],
            "Incorrect value of parameter 'watermark' (should be boolean)"
        );
    }
}
