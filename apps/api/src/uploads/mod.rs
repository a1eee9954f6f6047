//! Application file uploads (resumes, attachments).
//!
//! Files are stored in S3/MinIO before the form is submitted; the session
//! only ever holds the returned `FileRef`, and the submission transformer
//! passes that reference through untouched.

use aws_sdk_s3::primitives::ByteStream;
use axum::extract::{Multipart, State};
use axum::Json;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::forms::schema::FileRef;
use crate::state::AppState;

/// POST /api/v1/uploads
/// Accepts a single multipart part named `file` and returns the stored
/// reference to put into the session's value map.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<FileRef>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field
            .file_name()
            .map(sanitize_file_name)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "upload".to_string());
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        if data.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".to_string()));
        }

        let file_name = format!("{}-{}", Uuid::new_v4(), original_name);
        let key = format!("uploads/{file_name}");

        state
            .s3
            .put_object()
            .bucket(&state.config.s3_bucket)
            .key(&key)
            .body(ByteStream::from(data.to_vec()))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::S3(format!("Upload failed: {e}")))?;

        info!("Stored upload {original_name} as s3://{}/{key}", state.config.s3_bucket);

        return Ok(Json(FileRef {
            file_name,
            original_name,
            path: key,
        }));
    }

    Err(AppError::Validation(
        "Missing multipart part 'file'".to_string(),
    ))
}

/// Keeps only the final path segment and drops characters that would break
/// an S3 key.
fn sanitize_file_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    base.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_path_components() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name(r#"C:\cv\resume.pdf"#), "resume.pdf");
    }

    #[test]
    fn test_sanitize_drops_odd_characters() {
        assert_eq!(sanitize_file_name("my cv (final).pdf"), "mycvfinal.pdf");
    }

    #[test]
    fn test_sanitize_keeps_simple_names() {
        assert_eq!(sanitize_file_name("resume-v2_final.pdf"), "resume-v2_final.pdf");
    }
}
