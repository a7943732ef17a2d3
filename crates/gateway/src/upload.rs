use axum::extract::Multipart;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Extensions accepted for upload, matched case-insensitively.
const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// Display strings are the exact wire messages clients already parse.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("No file part")]
    NoFilePart,

    #[error("No selected file")]
    NoSelectedFile,

    #[error("File type not allowed")]
    FileTypeNotAllowed,

    #[error("Failed to store upload: {0}")]
    Storage(#[from] io::Error),
}

pub struct StoredUpload {
    pub filename: String,
    pub path: PathBuf,
}

/// Validate and persist one uploaded image.
///
/// Walks the multipart stream looking for a file field named `file`,
/// validates its filename against the extension allow-set, then writes the
/// bytes under a timestamp-prefixed sanitized name in `upload_dir`.
/// Validation short-circuits on the first failure and nothing is written for
/// a rejected upload.
pub async fn accept(
    multipart: &mut Multipart,
    upload_dir: &Path,
) -> Result<StoredUpload, UploadError> {
    // A malformed stream and a stream with no file field look the same to
    // the caller: "No file part".
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") || field.file_name().is_none() {
            continue;
        }

        let original_name = field.file_name().unwrap_or_default().to_string();
        if original_name.is_empty() {
            return Err(UploadError::NoSelectedFile);
        }
        if !allowed_file(&original_name) {
            return Err(UploadError::FileTypeNotAllowed);
        }

        let data = field.bytes().await.map_err(io::Error::other)?;

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let filename = format!("{}_{}", timestamp, sanitize_filename(&original_name));
        let path = upload_dir.join(&filename);

        tokio::fs::write(&path, &data).await?;

        tracing::debug!(filename = %filename, bytes = data.len(), "Upload stored");
        return Ok(StoredUpload { filename, path });
    }

    Err(UploadError::NoFilePart)
}

/// A filename is accepted when it has an extension in the allow-set.
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Strip path components and anything outside ASCII alphanumerics, `.`,
/// `_` and `-`, so the stored name can never traverse out of the upload
/// directory.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");
    base.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect()
}
