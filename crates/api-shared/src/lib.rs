//! # API Shared
//!
//! Shared utilities and definitions for filecdn API front ends.
//!
//! Contains:
//! - The JSON response envelope (`ApiMessage`) and its `dbg` handling
//! - Boolean query flag parsing
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` for common functionality.

pub mod flags;
pub mod health;
pub mod message;

pub use flags::parse_bool_flag;
pub use health::{HealthRes, HealthService};
pub use message::{ApiMessage, DebugFlag, ResponseType};
