// Media upload domain model
use super::event::ValidationError;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Presigned form-post authorisation issued by the file manager.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadPolicy {
    pub key: String,
    pub policy: String,
    #[serde(rename = "x-amz-algorithm")]
    pub algorithm: String,
    #[serde(rename = "x-amz-credential")]
    pub credential: String,
    #[serde(rename = "x-amz-date")]
    pub date: String,
    #[serde(rename = "x-amz-signature")]
    pub signature: String,
    pub bucket: String,
    #[serde(rename = "contentId")]
    pub content_id: String,
}

impl UploadPolicy {
    /// Form fields in submission order. The file part goes after these.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("key", self.key.clone()),
            ("Policy", self.policy.clone()),
            ("X-Amz-Algorithm", self.algorithm.clone()),
            ("X-Amz-Credential", self.credential.clone()),
            ("X-Amz-Date", self.date.clone()),
            ("X-Amz-Signature", self.signature.clone()),
            ("x-amz-meta-contentid", self.content_id.clone()),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Poster,
}

impl MediaKind {
    fn expected_prefix(&self) -> &'static str {
        match self {
            MediaKind::Video => "video/",
            MediaKind::Poster => "image/",
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Poster => "image",
        }
    }
}

#[derive(Debug, Clone)]
pub struct MediaFile {
    pub file_name: String,
    pub content_type: String,
    pub kind: MediaKind,
    pub bytes: Bytes,
}

impl MediaFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        kind: MediaKind,
        bytes: Bytes,
    ) -> Result<Self, ValidationError> {
        let file_name = file_name.into().trim().to_string();
        let content_type = content_type.into();
        if file_name.is_empty() {
            return Err(ValidationError::MissingFileName);
        }
        if !content_type.starts_with(kind.expected_prefix()) {
            return Err(ValidationError::UnsupportedMedia {
                expected: kind.describe(),
                content_type,
            });
        }
        Ok(Self {
            file_name,
            content_type,
            kind,
            bytes,
        })
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Ordered steps of the upload handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStep {
    RequestPolicy,
    SubmitObject,
    RegisterContent,
    ResolveUrl,
}

impl std::fmt::Display for UploadStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            UploadStep::RequestPolicy => "request upload policy",
            UploadStep::SubmitObject => "submit object",
            UploadStep::RegisterContent => "register content",
            UploadStep::ResolveUrl => "resolve delivery url",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UploadOutcome {
    Uploaded { url: String },
    Failed { step: UploadStep, reason: String },
}

/// Whole-percent progress, rounded the way browsers report upload progress.
pub fn progress_percent(loaded: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let pct = ((loaded.min(total) as f64 * 100.0) / total as f64).round();
    pct as u8
}
