//! Guestbook comment model.

use serde::{Deserialize, Serialize};

/// Longest comment text accepted, in characters.
pub const MAX_COMMENT_CHARS: usize = 1000;

/// A guestbook entry left by an authenticated visitor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    pub id: String,
    pub name: String,
    pub image: String,
    pub text: String,
    pub time: i64,
}

/// Request body for posting a comment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub text: Option<String>,
}

/// Response to a successful comment post.
#[derive(Debug, Clone, Serialize)]
pub struct CreateCommentResponse {
    pub ok: bool,
    pub comment: Comment,
}
