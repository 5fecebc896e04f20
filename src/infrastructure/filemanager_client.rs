// File manager and object store client for media uploads
use crate::application::media_store::{MediaStore, ProgressObserver};
use crate::domain::upload::{MediaFile, UploadPolicy, progress_percent};
use crate::infrastructure::config::fill_template;
use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::collections::HashMap;
use tokio::sync::mpsc;

const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Deserialize)]
struct RegisteredContent {
    contentid: String,
}

#[derive(Debug, Deserialize)]
struct DeliveryUrl {
    url: String,
}

#[derive(Debug, Clone)]
pub struct FileManagerClient {
    client: Client,
    api_url: String,
    endpoint_template: String,
}

impl FileManagerClient {
    pub fn new(client: Client, base_url: String, endpoint_template: String) -> Self {
        Self {
            client,
            api_url: format!("{}/api/filemanager", base_url.trim_end_matches('/')),
            endpoint_template,
        }
    }

    fn storage_endpoint(&self, bucket: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert("bucket".to_string(), bucket.to_string());
        fill_template(&self.endpoint_template, &vars)
    }

    async fn post_json<T: DeserializeOwned>(&self, path: &str, body: serde_json::Value) -> Result<T> {
        let url = format!("{}{}", self.api_url, path);
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("File manager request failed with status {}: {}", status, body);
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))
    }
}

/// Split a file into chunks so the request body can report how much was read.
fn chunked(bytes: &Bytes) -> Vec<Bytes> {
    (0..bytes.len())
        .step_by(UPLOAD_CHUNK_SIZE)
        .map(|start| bytes.slice(start..(start + UPLOAD_CHUNK_SIZE).min(bytes.len())))
        .collect()
}

#[async_trait]
impl MediaStore for FileManagerClient {
    async fn request_policy(&self, file_name: &str) -> Result<UploadPolicy> {
        self.post_json("/upload-policy/", json!({ "fileName": file_name }))
            .await
    }

    async fn submit_object(
        &self,
        policy: &UploadPolicy,
        file: &MediaFile,
        progress: &ProgressObserver,
    ) -> Result<()> {
        let total = file.len();
        let (loaded_tx, mut loaded_rx) = mpsc::unbounded_channel::<u64>();

        let mut loaded = 0u64;
        let body_stream = futures::stream::iter(chunked(&file.bytes)).map(move |chunk| {
            loaded += chunk.len() as u64;
            let _ = loaded_tx.send(loaded);
            Ok::<Bytes, std::io::Error>(chunk)
        });

        let file_part = Part::stream_with_length(Body::wrap_stream(body_stream), total)
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)
            .context("Invalid content type")?;

        // The file field must be the last field in the form
        let form = policy
            .form_fields()
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value))
            .part("file", file_part);

        let endpoint = self.storage_endpoint(&policy.bucket);
        tracing::debug!("Submitting {} to {}", policy.key, endpoint);

        let send = self.client.post(&endpoint).multipart(form).send();
        tokio::pin!(send);
        let response = loop {
            tokio::select! {
                result = &mut send => break result,
                Some(loaded) = loaded_rx.recv() => {
                    progress.send_replace(progress_percent(loaded, total));
                }
            }
        };
        while let Ok(loaded) = loaded_rx.try_recv() {
            progress.send_replace(progress_percent(loaded, total));
        }

        let response = response.context("Upload failed")?;
        if response.status() != StatusCode::NO_CONTENT {
            anyhow::bail!("Upload failed with status: {}", response.status());
        }
        Ok(())
    }

    async fn register_content(&self, storage_key: &str, content_id: &str) -> Result<String> {
        let registered: RegisteredContent = self
            .post_json(
                "/content",
                json!({ "filePath": storage_key, "contentId": content_id }),
            )
            .await?;
        Ok(registered.contentid)
    }

    async fn resolve_url(&self, content_id: &str) -> Result<String> {
        let delivery: DeliveryUrl = self
            .post_json("/content/getcdnurl", json!({ "content_id": content_id }))
            .await?;
        Ok(delivery.url)
    }
}
