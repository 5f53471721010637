use crate::events::{AppEvent, EventSender};
use crate::services::api_client::resolve_download_url;
use futures_util::StreamExt;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::runtime::Handle;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("Download request failed: {0}")]
    Request(String),
    #[error("Download failed with status {0}")]
    Status(u16),
    #[error("Could not open browser: {0}")]
    Browser(String),
    #[error("Failed to save file: {0}")]
    Persist(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fetches processed files from the server's download links.
#[derive(Clone)]
pub struct DownloadService {
    client: reqwest::Client,
    base_url: String,
    runtime: Handle,
    event_sender: EventSender,
}

impl DownloadService {
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        runtime: Handle,
        event_sender: EventSender,
    ) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            runtime,
            event_sender,
        }
    }

    pub fn resolve(&self, href: &str) -> String {
        resolve_download_url(&self.base_url, href)
    }

    pub fn open_in_browser(&self, href: &str) -> Result<(), DownloadError> {
        let url = self.resolve(href);
        tracing::info!("Opening {} in browser", url);
        webbrowser::open(&url).map_err(|e| DownloadError::Browser(e.to_string()))
    }

    /// Streams the file to `destination` in the background.
    pub fn save(&self, href: &str, destination: PathBuf) -> Uuid {
        let task_id = Uuid::new_v4();
        let url = self.resolve(href);
        let client = self.client.clone();
        let event_sender = self.event_sender.clone();

        tracing::info!("Downloading {} to {:?}", url, destination);
        self.runtime.spawn(async move {
            let progress_sender = event_sender.clone();
            let on_progress = move |percentage: f32| {
                let _ = progress_sender.send(AppEvent::DownloadProgress {
                    task_id,
                    percentage,
                });
            };

            let event = match fetch_to_file(&client, &url, &destination, on_progress).await {
                Ok(path) => AppEvent::DownloadCompleted { task_id, path },
                Err(e) => {
                    tracing::error!("Download of {} failed: {}", url, e);
                    AppEvent::DownloadFailed {
                        task_id,
                        error: e.to_string(),
                    }
                }
            };

            if let Err(e) = event_sender.send(event) {
                tracing::error!("Failed to send download result: {}", e);
            }
        });

        task_id
    }
}

/// Writes into a temporary file next to `destination` and moves it into
/// place once the body is complete.
async fn fetch_to_file(
    client: &reqwest::Client,
    url: &str,
    destination: &Path,
    progress_callback: impl Fn(f32),
) -> Result<PathBuf, DownloadError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| DownloadError::Request(e.to_string()))?;

    if !response.status().is_success() {
        return Err(DownloadError::Status(response.status().as_u16()));
    }

    let total_size = response.content_length().unwrap_or(0);
    let mut downloaded = 0u64;

    let directory = destination
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let temp_file = NamedTempFile::new_in(directory)?;
    let mut file = tokio::fs::File::from_std(temp_file.as_file().try_clone()?);

    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| DownloadError::Request(e.to_string()))?;
        file.write_all(&chunk).await?;

        downloaded += chunk.len() as u64;
        if total_size > 0 {
            progress_callback((downloaded as f32 / total_size as f32) * 100.0);
        }
    }

    file.flush().await?;
    drop(file);

    temp_file
        .persist(destination)
        .map_err(|e| DownloadError::Persist(e.error.to_string()))?;

    tracing::info!("Saved {} bytes to {:?}", downloaded, destination);
    Ok(destination.to_path_buf())
}
