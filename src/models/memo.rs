//! Administrator memo model.

use serde::{Deserialize, Serialize};

/// Background color given to memos created without one.
pub const DEFAULT_MEMO_COLOR: &str = "#e9ecef";

/// A freeform note kept by the administrator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminMemo {
    pub id: String,
    pub title: String,
    pub content: String,
    pub color: String,
    pub time: i64,
}

/// Request body for creating a memo.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMemoRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Request body for updating a memo. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMemoRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}
