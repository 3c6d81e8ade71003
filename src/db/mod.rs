//! JSON document store.
//!
//! The document file on disk is the source of truth; the repository keeps an
//! in-memory copy and rewrites the file after every mutation.

mod repository;

pub use repository::*;

use std::path::{Path, PathBuf};

use crate::errors::AppError;
use crate::models::Document;

/// Load the document at `db_path`, creating an empty one if the file is missing.
pub async fn init_store(db_path: &Path) -> Result<Document, AppError> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    match tokio::fs::read(db_path).await {
        Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => {
            tracing::warn!("Document {:?} is empty, starting fresh", db_path);
            let document = Document::default();
            write_document(db_path, &document).await?;
            Ok(document)
        }
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!("Creating new document at {:?}", db_path);
            let document = Document::default();
            write_document(db_path, &document).await?;
            Ok(document)
        }
        Err(err) => Err(err.into()),
    }
}

/// Persist the document by writing a sibling temp file and renaming it over the target.
pub async fn write_document(db_path: &Path, document: &Document) -> Result<(), AppError> {
    let bytes = serde_json::to_vec_pretty(document)?;
    let tmp_path = temp_path(db_path);

    tokio::fs::write(&tmp_path, &bytes).await?;
    tokio::fs::rename(&tmp_path, db_path).await?;
    Ok(())
}

fn temp_path(db_path: &Path) -> PathBuf {
    let mut name = db_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "db.json".into());
    name.push(".tmp");
    db_path.with_file_name(name)
}
