//! Visitor login history model.

use serde::{Deserialize, Serialize};

/// Message stored when the client does not supply one.
pub const DEFAULT_LOGIN_MSG: &str = "로그인";

/// Longest login message kept, in characters. Longer messages are truncated.
pub const MAX_LOGIN_MSG_CHARS: usize = 200;

/// One successful visitor login, visible only to the administrator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRecord {
    pub id: String,
    pub name: String,
    pub image: String,
    pub time: i64,
    pub msg: String,
}

/// Request body for recording a login event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordLoginRequest {
    #[serde(default)]
    pub msg: Option<String>,
}

impl RecordLoginRequest {
    /// Normalized message: trimmed, defaulted when blank, capped in length.
    pub fn message(&self) -> String {
        match self.msg.as_deref().map(str::trim) {
            Some(msg) if !msg.is_empty() => msg.chars().take(MAX_LOGIN_MSG_CHARS).collect(),
            _ => DEFAULT_LOGIN_MSG.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_defaults_when_blank() {
        assert_eq!(RecordLoginRequest::default().message(), DEFAULT_LOGIN_MSG);
        let req = RecordLoginRequest {
            msg: Some("   ".to_string()),
        };
        assert_eq!(req.message(), DEFAULT_LOGIN_MSG);
    }

    #[test]
    fn test_message_is_trimmed_and_capped() {
        let req = RecordLoginRequest {
            msg: Some("  hello  ".to_string()),
        };
        assert_eq!(req.message(), "hello");

        let req = RecordLoginRequest {
            msg: Some("가".repeat(MAX_LOGIN_MSG_CHARS + 10)),
        };
        assert_eq!(req.message().chars().count(), MAX_LOGIN_MSG_CHARS);
    }
}
