//! Data models for the guestbook.
//!
//! Field names follow the JSON document and the widget's wire format.

mod comment;
mod document;
mod login;
mod memo;

pub use comment::*;
pub use document::*;
pub use login::*;
pub use memo::*;

use serde::Serialize;

/// Current time as Unix epoch milliseconds, the unit every record's `time` uses.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Acknowledgement body for writes that return no record.
#[derive(Debug, Clone, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn new() -> Self {
        Self { ok: true }
    }
}

impl Default for OkResponse {
    fn default() -> Self {
        Self::new()
    }
}
