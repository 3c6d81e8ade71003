//! Root document persisted to disk.

use serde::{Deserialize, Serialize};

use super::{AdminMemo, Comment, LoginRecord};

/// The whole guestbook state, stored as a single JSON file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub logins: Vec<LoginRecord>,
    #[serde(default)]
    pub admin_memos: Vec<AdminMemo>,
}
