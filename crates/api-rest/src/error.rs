use api_shared::{ApiMessage, DebugFlag};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use filecdn_core::CoreError;

pub const MALFORMED_QUERY_MESSAGE: &str =
    "Incorrect value of parameter 'q' (should be 'field1:value1+field2:value2')";
pub const MALFORMED_SORT_MESSAGE: &str =
    "Incorrect value of parameter 'sf' (should be 'field1+field2')";

/// An error reply rendered as an [`ApiMessage`].
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    /// `None` uses the stock message for the status.
    message: Option<String>,
    /// Shown in `debugInfo` when the client asked for it.
    details: String,
    debug: DebugFlag,
}

impl ApiError {
    pub fn new(status: StatusCode, message: Option<String>, details: impl Into<String>) -> Self {
        Self {
            status,
            message,
            details: details.into(),
            debug: DebugFlag::Off,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(StatusCode::BAD_REQUEST, Some(message.clone()), message)
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, None, details)
    }

    pub fn with_debug(mut self, debug: DebugFlag) -> Self {
        self.debug = debug;
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        let details = format!("{e:?}");
        match e {
            CoreError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, None, details),
            CoreError::InvalidPath(_) | CoreError::NotADirectory(_) => {
                Self::new(StatusCode::BAD_REQUEST, Some(e.to_string()), details)
            }
            CoreError::MalformedQuery(_) => Self::new(
                StatusCode::BAD_REQUEST,
                Some(MALFORMED_QUERY_MESSAGE.into()),
                details,
            ),
            CoreError::MalformedSort(_) => Self::new(
                StatusCode::BAD_REQUEST,
                Some(MALFORMED_SORT_MESSAGE.into()),
                details,
            ),
            other => {
                tracing::error!("Request failed: {:?}", other);
                Self::internal(details)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status.as_u16();
        let message = match self.message {
            Some(message) => ApiMessage::with_message(status, message),
            None => ApiMessage::new(status),
        };
        let details = self.details;
        let body = message.with_debug(self.debug, || details);
        (self.status, Json(body)).into_response()
    }
}
