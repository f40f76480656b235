//! Multipart upload with a progress event stream.
//!
//! The upload surface differs from the other operations: instead of one
//! value, callers get a lazy stream that emits a progress event per
//! transferred chunk and a final completed event carrying the server's
//! response body. Nothing is read or sent until the stream is polled, and
//! dropping the stream aborts the transfer.

use std::path::Path;

use bytes::Bytes;
use futures::channel::mpsc;
use futures::stream::{self, Stream, StreamExt};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE};
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use modica_core::{ModelId, UploadEvent, UploadProgress};

use crate::error::{ApiError, Result};
use crate::ApiClient;

/// Upload body chunk size; one progress event is emitted per chunk.
const CHUNK_SIZE: usize = 64 * 1024;

impl ApiClient {
    /// Upload a file as the content of an existing instance.
    ///
    /// POSTs a multipart form to the instance URL, with the file part keyed
    /// by the file's own name. The returned stream emits one
    /// [`UploadProgress::Sent`] event per transferred chunk, each carrying
    /// the pre-upload `instance`, and finally one
    /// [`UploadProgress::Complete`] event where `instance` is the decoded
    /// server response.
    pub fn upload_instance_content_from_file<MD>(
        &self,
        model_name: &str,
        instance: MD,
        file_path: &Path,
    ) -> impl Stream<Item = Result<UploadEvent<MD>>> + Send
    where
        MD: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
    {
        let file_path = file_path.to_path_buf();
        let url = instance_id(&instance, self.id_field())
            .map(|id| self.instance_url(model_name, None, Some(&id)))
            .ok_or_else(|| ApiError::MissingId(self.id_field().to_string()));
        let client = self.client().clone();
        let locale = self.locale().to_string();

        let (tx, rx) = mpsc::unbounded::<Result<UploadEvent<MD>>>();

        let run = async move {
            let outcome: Result<MD> = async {
                let url = url?;
                let bytes = tokio::fs::read(&file_path).await?;
                let total = bytes.len() as u64;
                let file_name = file_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("upload.bin")
                    .to_string();

                let chunks: Vec<Bytes> = bytes
                    .chunks(CHUNK_SIZE)
                    .map(Bytes::copy_from_slice)
                    .collect();

                // Progress is observed by wrapping the multipart body: each
                // chunk handed to the transport pushes one event into the
                // channel before the final response event.
                let progress_tx = tx.clone();
                let pre_upload = instance.clone();
                let mut sent = 0u64;
                let body_stream = stream::iter(chunks).map(move |chunk| {
                    sent += chunk.len() as u64;
                    let _ = progress_tx.unbounded_send(Ok(UploadEvent {
                        instance: Some(pre_upload.clone()),
                        progress: UploadProgress::Sent { sent, total },
                    }));
                    Ok::<Bytes, std::io::Error>(chunk)
                });

                let part = Part::stream_with_length(Body::wrap_stream(body_stream), total)
                    .file_name(file_name.clone());
                let form = Form::new().part(file_name, part);

                debug!("POST {} (multipart upload)", url);
                let response = client
                    .post(&url)
                    .header(ACCEPT, "application/json")
                    .header(ACCEPT_LANGUAGE, locale.as_str())
                    .header("x-requested-with", "XMLHttpRequest")
                    .multipart(form)
                    .send()
                    .await?;

                let response = ApiClient::check(response).await?;
                let body = response.text().await?;
                serde_json::from_str::<MD>(&body).map_err(|e| ApiError::Decode(e.to_string()))
            }
            .await;

            let _ = tx.unbounded_send(outcome.map(|body| UploadEvent {
                instance: Some(body),
                progress: UploadProgress::Complete,
            }));
        };

        // The driver yields no events itself; selecting it alongside the
        // receiver keeps the request future polled while events drain, and
        // the single FIFO channel keeps the completed event last.
        let driver =
            stream::once(run).filter_map(|()| async { None::<Result<UploadEvent<MD>>> });
        stream::select(rx, driver)
    }
}

/// Lift the identifier out of a typed instance by serializing it.
fn instance_id<MD: Serialize>(instance: &MD, id_field: &str) -> Option<ModelId> {
    let value = serde_json::to_value(instance).ok()?;
    ModelId::from_value(value.get(id_field)?)
}
