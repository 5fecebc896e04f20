// Store trait for the presigned media upload handshake
use crate::domain::upload::{MediaFile, UploadPolicy};
use async_trait::async_trait;
use tokio::sync::watch;

/// Receives whole-percent upload progress (0-100).
pub type ProgressObserver = watch::Sender<u8>;

/// Create a progress observer and the subscription that reads it.
pub fn progress_channel() -> (ProgressObserver, watch::Receiver<u8>) {
    watch::channel(0)
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Step 1: obtain an upload authorisation for `file_name`
    async fn request_policy(&self, file_name: &str) -> anyhow::Result<UploadPolicy>;

    /// Step 2: post the file to object storage, reporting progress
    async fn submit_object(
        &self,
        policy: &UploadPolicy,
        file: &MediaFile,
        progress: &ProgressObserver,
    ) -> anyhow::Result<()>;

    /// Step 3a: register the stored object, returning its content id
    async fn register_content(&self, storage_key: &str, content_id: &str) -> anyhow::Result<String>;

    /// Step 3b: resolve a content id to a public delivery URL
    async fn resolve_url(&self, content_id: &str) -> anyhow::Result<String>;
}
