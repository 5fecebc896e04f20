// Upload service - Three-step presigned media upload as one operation
use crate::application::media_store::{MediaStore, ProgressObserver};
use crate::domain::upload::{MediaFile, UploadOutcome, UploadStep};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Failed to {step}: {reason}")]
pub struct UploadError {
    pub step: UploadStep,
    pub reason: String,
}

impl UploadError {
    fn at(step: UploadStep) -> impl FnOnce(anyhow::Error) -> Self {
        move |err| Self {
            step,
            reason: format!("{err:#}"),
        }
    }
}

#[derive(Clone)]
pub struct UploadService {
    store: Arc<dyn MediaStore>,
}

impl UploadService {
    pub fn new(store: Arc<dyn MediaStore>) -> Self {
        Self { store }
    }

    /// Upload `file` and resolve its public URL. Progress is published on
    /// `progress`; on failure it is reset to zero.
    pub async fn upload(&self, file: MediaFile, progress: &ProgressObserver) -> UploadOutcome {
        tracing::info!(
            "Uploading {:?} {} ({} bytes, {})",
            file.kind,
            file.file_name,
            file.len(),
            file.content_type
        );

        match self.run(&file, progress).await {
            Ok(url) => {
                progress.send_replace(100);
                tracing::info!("Uploaded {} to {}", file.file_name, url);
                UploadOutcome::Uploaded { url }
            }
            Err(err) => {
                progress.send_replace(0);
                tracing::error!("File upload error for {}: {}", file.file_name, err);
                UploadOutcome::Failed {
                    step: err.step,
                    reason: err.reason,
                }
            }
        }
    }

    async fn run(&self, file: &MediaFile, progress: &ProgressObserver) -> Result<String, UploadError> {
        let policy = self
            .store
            .request_policy(&file.file_name)
            .await
            .map_err(UploadError::at(UploadStep::RequestPolicy))?;

        self.store
            .submit_object(&policy, file, progress)
            .await
            .map_err(UploadError::at(UploadStep::SubmitObject))?;

        let content_id = self
            .store
            .register_content(&policy.key, &policy.content_id)
            .await
            .map_err(UploadError::at(UploadStep::RegisterContent))?;

        self.store
            .resolve_url(&content_id)
            .await
            .map_err(UploadError::at(UploadStep::ResolveUrl))
    }
}
