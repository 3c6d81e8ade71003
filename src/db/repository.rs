//! Repository for guestbook CRUD operations.
//!
//! Mutations are serialized behind a lock and applied to a copy of the
//! document; memory is only updated once the file write succeeds.

use std::cmp::Reverse;
use std::path::PathBuf;

use tokio::sync::Mutex;

use super::write_document;
use crate::errors::{codes, AppError};
use crate::identity::VisitorProfile;
use crate::models::{
    now_millis, AdminMemo, Comment, CreateMemoRequest, Document, LoginRecord, UpdateMemoRequest,
    DEFAULT_MEMO_COLOR,
};

/// Data access for every record kind in the document.
pub struct Repository {
    path: PathBuf,
    document: Mutex<Document>,
}

impl Repository {
    pub fn new(path: PathBuf, document: Document) -> Self {
        Self {
            path,
            document: Mutex::new(document),
        }
    }

    /// Apply `change` to a copy of the document, persist it, then publish it.
    async fn mutate<T, F>(&self, change: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut Document) -> Result<T, AppError>,
    {
        let mut current = self.document.lock().await;
        let mut next = current.clone();
        let result = change(&mut next)?;
        write_document(&self.path, &next).await?;
        *current = next;
        Ok(result)
    }

    // ==================== COMMENT OPERATIONS ====================

    /// List all comments, newest first.
    pub async fn list_comments(&self) -> Result<Vec<Comment>, AppError> {
        let mut comments = self.document.lock().await.comments.clone();
        comments.sort_by_key(|c| Reverse(c.time));
        Ok(comments)
    }

    /// Store a new comment written by `author`. `text` must already be validated.
    pub async fn create_comment(
        &self,
        author: &VisitorProfile,
        text: &str,
    ) -> Result<Comment, AppError> {
        let comment = Comment {
            id: uuid::Uuid::new_v4().to_string(),
            name: author.name.clone(),
            image: author.image.clone(),
            text: text.to_string(),
            time: now_millis(),
        };

        let stored = comment.clone();
        self.mutate(move |doc| {
            doc.comments.push(stored);
            Ok(())
        })
        .await?;

        Ok(comment)
    }

    /// Delete a comment.
    pub async fn delete_comment(&self, id: &str) -> Result<(), AppError> {
        self.mutate(|doc| {
            let before = doc.comments.len();
            doc.comments.retain(|c| c.id != id);
            if doc.comments.len() == before {
                return Err(AppError::NotFound(format!("Comment {} not found", id)));
            }
            Ok(())
        })
        .await
    }

    // ==================== LOGIN HISTORY ====================

    /// Append a login event for `visitor`.
    pub async fn record_login(
        &self,
        visitor: &VisitorProfile,
        msg: String,
    ) -> Result<LoginRecord, AppError> {
        let record = LoginRecord {
            id: uuid::Uuid::new_v4().to_string(),
            name: visitor.name.clone(),
            image: visitor.image.clone(),
            time: now_millis(),
            msg,
        };

        let stored = record.clone();
        self.mutate(move |doc| {
            doc.logins.push(stored);
            Ok(())
        })
        .await?;

        Ok(record)
    }

    /// List the login history, newest first.
    pub async fn list_logins(&self) -> Result<Vec<LoginRecord>, AppError> {
        let mut logins = self.document.lock().await.logins.clone();
        logins.sort_by_key(|l| Reverse(l.time));
        Ok(logins)
    }

    // ==================== MEMO OPERATIONS ====================

    /// List all memos, most recently touched first.
    pub async fn list_memos(&self) -> Result<Vec<AdminMemo>, AppError> {
        let mut memos = self.document.lock().await.admin_memos.clone();
        memos.sort_by_key(|m| Reverse(m.time));
        Ok(memos)
    }

    /// Get a memo by ID.
    pub async fn get_memo(&self, id: &str) -> Result<Option<AdminMemo>, AppError> {
        let document = self.document.lock().await;
        Ok(document.admin_memos.iter().find(|m| m.id == id).cloned())
    }

    /// Create a new memo.
    pub async fn create_memo(&self, request: &CreateMemoRequest) -> Result<AdminMemo, AppError> {
        let title = required_field(request.title.as_deref(), codes::TITLE_REQUIRED, "Title")?;
        let content =
            required_field(request.content.as_deref(), codes::CONTENT_REQUIRED, "Content")?;

        let memo = AdminMemo {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            content,
            color: normalize_color(request.color.as_deref())
                .unwrap_or_else(|| DEFAULT_MEMO_COLOR.to_string()),
            time: now_millis(),
        };

        let stored = memo.clone();
        self.mutate(move |doc| {
            doc.admin_memos.push(stored);
            Ok(())
        })
        .await?;

        Ok(memo)
    }

    /// Update a memo. Absent fields keep their value; `time` is refreshed.
    pub async fn update_memo(
        &self,
        id: &str,
        request: &UpdateMemoRequest,
    ) -> Result<AdminMemo, AppError> {
        let title = request
            .title
            .as_deref()
            .map(|t| required_field(Some(t), codes::TITLE_REQUIRED, "Title"))
            .transpose()?;
        let content = request
            .content
            .as_deref()
            .map(|c| required_field(Some(c), codes::CONTENT_REQUIRED, "Content"))
            .transpose()?;
        let color = normalize_color(request.color.as_deref());

        self.mutate(|doc| {
            let memo = doc
                .admin_memos
                .iter_mut()
                .find(|m| m.id == id)
                .ok_or_else(|| AppError::NotFound(format!("Memo {} not found", id)))?;

            if let Some(title) = title {
                memo.title = title;
            }
            if let Some(content) = content {
                memo.content = content;
            }
            if let Some(color) = color {
                memo.color = color;
            }
            memo.time = now_millis();

            Ok(memo.clone())
        })
        .await
    }

    /// Delete a memo.
    pub async fn delete_memo(&self, id: &str) -> Result<(), AppError> {
        self.mutate(|doc| {
            let before = doc.admin_memos.len();
            doc.admin_memos.retain(|m| m.id != id);
            if doc.admin_memos.len() == before {
                return Err(AppError::NotFound(format!("Memo {} not found", id)));
            }
            Ok(())
        })
        .await
    }
}

fn required_field(
    value: Option<&str>,
    code: &'static str,
    label: &str,
) -> Result<String, AppError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(AppError::required(code, &format!("{} is required", label))),
    }
}

fn normalize_color(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_store;
    use tempfile::TempDir;

    async fn repo_in(dir: &TempDir) -> Repository {
        let path = dir.path().join("db.json");
        let document = init_store(&path).await.unwrap();
        Repository::new(path, document)
    }

    fn visitor(name: &str) -> VisitorProfile {
        VisitorProfile {
            name: name.to_string(),
            image: "https://img.example/a.png".to_string(),
        }
    }

    fn memo_request(title: &str, content: &str) -> CreateMemoRequest {
        CreateMemoRequest {
            title: Some(title.to_string()),
            content: Some(content.to_string()),
            color: None,
        }
    }

    #[tokio::test]
    async fn test_comments_sorted_newest_first() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.json");
        let mut document = Document::default();
        for (id, time) in [("old", 1), ("new", 3), ("mid", 2)] {
            document.comments.push(Comment {
                id: id.to_string(),
                name: "n".to_string(),
                image: "i".to_string(),
                text: "t".to_string(),
                time,
            });
        }
        let repo = Repository::new(path, document);

        let ids: Vec<String> = repo
            .list_comments()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn test_comment_persists_across_reload() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir).await;

        let created = repo.create_comment(&visitor("Kim"), "hello").await.unwrap();
        assert_eq!(created.name, "Kim");

        let reloaded = repo_in(&dir).await;
        let comments = reloaded.list_comments().await.unwrap();
        assert_eq!(comments, vec![created]);
    }

    #[tokio::test]
    async fn test_delete_missing_comment_is_not_found() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir).await;

        let err = repo.delete_comment("nope").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_comment_removes_only_target() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir).await;

        let keep = repo.create_comment(&visitor("A"), "keep").await.unwrap();
        let drop = repo.create_comment(&visitor("B"), "drop").await.unwrap();
        repo.delete_comment(&drop.id).await.unwrap();

        let comments = repo.list_comments().await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].id, keep.id);
    }

    #[tokio::test]
    async fn test_record_login_appends() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir).await;

        repo.record_login(&visitor("Lee"), "hi".to_string())
            .await
            .unwrap();
        repo.record_login(&visitor("Lee"), "again".to_string())
            .await
            .unwrap();

        let logins = repo.list_logins().await.unwrap();
        assert_eq!(logins.len(), 2);
        assert!(logins[0].time >= logins[1].time);
    }

    #[tokio::test]
    async fn test_memo_crud() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir).await;

        let memo = repo
            .create_memo(&memo_request("  Title ", " Body "))
            .await
            .unwrap();
        assert_eq!(memo.title, "Title");
        assert_eq!(memo.content, "Body");
        assert_eq!(memo.color, DEFAULT_MEMO_COLOR);

        let updated = repo
            .update_memo(
                &memo.id,
                &UpdateMemoRequest {
                    content: Some("New body".to_string()),
                    color: Some("#ffeeaa".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "Title");
        assert_eq!(updated.content, "New body");
        assert_eq!(updated.color, "#ffeeaa");
        assert!(updated.time >= memo.time);

        assert_eq!(repo.get_memo(&memo.id).await.unwrap(), Some(updated));

        repo.delete_memo(&memo.id).await.unwrap();
        assert!(repo.get_memo(&memo.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete_memo(&memo.id).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_memo_requires_title_and_content() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir).await;

        let err = repo.create_memo(&memo_request(" ", "x")).await.unwrap_err();
        assert_eq!(err.error_code(), codes::TITLE_REQUIRED);

        let err = repo.create_memo(&memo_request("x", "")).await.unwrap_err();
        assert_eq!(err.error_code(), codes::CONTENT_REQUIRED);

        let memo = repo.create_memo(&memo_request("t", "c")).await.unwrap();
        let err = repo
            .update_memo(
                &memo.id,
                &UpdateMemoRequest {
                    title: Some("   ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), codes::TITLE_REQUIRED);
    }

    #[tokio::test]
    async fn test_update_missing_memo_is_not_found() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir).await;

        let err = repo
            .update_memo("ghost", &UpdateMemoRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_failed_write_keeps_memory_unchanged() {
        let dir = TempDir::new().unwrap();
        // A directory in place of the file makes the rename fail.
        let path = dir.path().join("blocked");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("occupant"), "x").unwrap();
        let repo = Repository::new(path, Document::default());

        assert!(repo.create_comment(&visitor("A"), "t").await.is_err());
        assert!(repo.list_comments().await.unwrap().is_empty());
    }
}
