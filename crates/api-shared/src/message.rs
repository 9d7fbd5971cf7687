//! JSON message envelope for non-listing responses.
//!
//! Every error (and the occasional informational reply) is returned as
//! `{ "responseType", "message", "status", "debugInfo"? }`. `debugInfo` is only filled when the
//! caller asked for it with a truthy `dbg` query parameter.

use crate::flags::parse_bool_flag;
use serde::Serialize;
use utoipa::ToSchema;

/// Message shown in `debugInfo` when `dbg` is present but not a boolean.
pub const DEBUG_FLAG_INVALID_MESSAGE: &str = "Debugging info is turned off, because incorrect \
     type of value of parameter 'dbg' (should be boolean)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum ResponseType {
    Error,
    Success,
    Warning,
    Info,
}

impl ResponseType {
    /// Classifies an HTTP status code.
    pub fn for_status(status: u16) -> Self {
        match status {
            200..=299 => ResponseType::Success,
            300..=399 => ResponseType::Warning,
            400..=599 => ResponseType::Error,
            _ => ResponseType::Info,
        }
    }
}

/// State of the `dbg` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DebugFlag {
    #[default]
    Off,
    On,
    Invalid,
}

impl DebugFlag {
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw.map(parse_bool_flag) {
            None | Some(Some(false)) => DebugFlag::Off,
            Some(Some(true)) => DebugFlag::On,
            Some(None) => DebugFlag::Invalid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiMessage {
    pub response_type: ResponseType,
    pub message: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_info: Option<String>,
}

impl ApiMessage {
    /// An envelope carrying the stock message for `status`.
    pub fn new(status: u16) -> Self {
        Self::with_message(status, default_message(status))
    }

    pub fn with_message(status: u16, message: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::for_status(status),
            message: message.into(),
            status,
            debug_info: None,
        }
    }

    /// Attaches debug details according to `flag`.
    ///
    /// `details` is only evaluated when debugging is switched on.
    pub fn with_debug(mut self, flag: DebugFlag, details: impl FnOnce() -> String) -> Self {
        self.debug_info = match flag {
            DebugFlag::Off => None,
            DebugFlag::On => Some(details()),
            DebugFlag::Invalid => Some(DEBUG_FLAG_INVALID_MESSAGE.to_string()),
        };
        self
    }
}

fn default_message(status: u16) -> &'static str {
    match status {
        200 => "OK!",
        201 => "Created!",
        304 => "Not modified!",
        400 => "Bad request!",
        401 => "Unauthorized!",
        403 => "Forbidden",
        404 => "Not found!",
        500 => "Internal server error!",
        501 => "Not implemented!",
        _ => "No further details.",
    }
}
