//! Multipart upload forms and the image validation policy.
//!
//! The forms are Actix extractors; everything they accept has already
//! passed multipart parsing. `validate` then applies the operation's text
//! field requirements, the image allow-list, and the size ceiling - in
//! that order, before any storage write.

use actix_multipart::form::{MultipartForm, bytes::Bytes, text::Text};
use chrono::Utc;

use quill_core::domain::PostChanges;

use crate::middleware::error::AppError;

/// File types accepted for cover images, matched against both the
/// file extension and the declared MIME subtype.
pub const IMAGE_TYPES: [&str; 5] = ["jpeg", "jpg", "png", "gif", "webp"];

/// Upload constraints, applied before any storage write.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    /// Size ceiling for a cover image, in bytes.
    pub max_bytes: usize,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: 1_000_000,
        }
    }
}

impl UploadPolicy {
    /// Load the policy from environment variables.
    pub fn from_env() -> Self {
        Self {
            max_bytes: std::env::var("UPLOAD_MAX_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1_000_000),
        }
    }
}

/// A cover image that passed validation, ready for object storage.
#[derive(Debug)]
pub struct CoverFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl CoverFile {
    /// Timestamp-prefixed object key, unique enough for this write.
    pub fn object_key(&self) -> String {
        format!("uploads/{}-{}", Utc::now().timestamp_millis(), self.file_name)
    }
}

/// The validated text fields of a new post.
#[derive(Debug)]
pub struct NewPostFields {
    pub title: String,
    pub summary: String,
    pub content: String,
}

/// Multipart form for `POST /api/v1/post`: all fields and the cover required.
#[derive(Debug, MultipartForm)]
#[multipart(deny_unknown_fields)]
pub struct NewPostForm {
    pub title: Option<Text<String>>,
    pub summary: Option<Text<String>>,
    pub content: Option<Text<String>>,
    pub cover: Option<Bytes>,
}

impl NewPostForm {
    pub fn validate(self, policy: &UploadPolicy) -> Result<(NewPostFields, CoverFile), AppError> {
        let title = required_text(self.title)?;
        let summary = required_text(self.summary)?;
        let content = required_text(self.content)?;

        let cover = self
            .cover
            .ok_or_else(|| AppError::BadRequest("All fields are required".to_string()))?;
        let cover = check_cover(cover, policy)?;

        Ok((
            NewPostFields {
                title,
                summary,
                content,
            },
            cover,
        ))
    }
}

/// Multipart form for `PUT /api/v1/post/{id}`: any subset of fields,
/// at least one change required.
#[derive(Debug, MultipartForm)]
#[multipart(deny_unknown_fields)]
pub struct UpdatePostForm {
    pub title: Option<Text<String>>,
    pub summary: Option<Text<String>>,
    pub content: Option<Text<String>>,
    pub cover: Option<Bytes>,
}

impl UpdatePostForm {
    pub fn validate(
        self,
        policy: &UploadPolicy,
    ) -> Result<(PostChanges, Option<CoverFile>), AppError> {
        let changes = PostChanges {
            title: optional_text(self.title, "title")?,
            summary: optional_text(self.summary, "summary")?,
            content: optional_text(self.content, "content")?,
            cover_url: None,
        };

        let cover = self
            .cover
            .map(|cover| check_cover(cover, policy))
            .transpose()?;

        if changes.is_empty() && cover.is_none() {
            return Err(AppError::BadRequest(
                "At least one field is required".to_string(),
            ));
        }

        Ok((changes, cover))
    }
}

fn required_text(field: Option<Text<String>>) -> Result<String, AppError> {
    match field {
        Some(text) => {
            let value = text.into_inner();
            if value.trim().is_empty() {
                Err(AppError::BadRequest("All fields are required".to_string()))
            } else {
                Ok(value)
            }
        }
        None => Err(AppError::BadRequest("All fields are required".to_string())),
    }
}

fn optional_text(field: Option<Text<String>>, name: &str) -> Result<Option<String>, AppError> {
    match field {
        Some(text) => {
            let value = text.into_inner();
            if value.trim().is_empty() {
                Err(AppError::BadRequest(format!("Field '{name}' cannot be empty")))
            } else {
                Ok(Some(value))
            }
        }
        None => Ok(None),
    }
}

/// Validate one in-memory file against the image allow-list and the
/// size ceiling. Rejections happen here, before any storage write.
fn check_cover(file: Bytes, policy: &UploadPolicy) -> Result<CoverFile, AppError> {
    let file_name = file.file_name.clone().unwrap_or_default();

    let extension = std::path::Path::new(&file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    let extension_ok = extension
        .as_deref()
        .is_some_and(|e| IMAGE_TYPES.contains(&e));

    let mime_ok = file.content_type.as_ref().is_some_and(|mime| {
        mime.type_().as_str() == "image" && IMAGE_TYPES.contains(&mime.subtype().as_str())
    });

    if !extension_ok || !mime_ok {
        return Err(AppError::BadRequest(
            "Images only! (jpeg, jpg, png, gif, webp)".to_string(),
        ));
    }

    if file.data.len() > policy.max_bytes {
        return Err(AppError::BadRequest(format!(
            "Cover image exceeds the {} byte limit",
            policy.max_bytes
        )));
    }

    let content_type = file
        .content_type
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string());

    Ok(CoverFile {
        file_name: sanitize_file_name(&file_name),
        content_type,
        data: file.data.to_vec(),
    })
}

/// Keep alphanumerics, dots, dashes and underscores; everything else
/// becomes an underscore so the name is safe inside an object key.
fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
