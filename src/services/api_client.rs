use crate::constants::{
    APP_VERSION, CONFIG_DIR_NAME, FALLBACK_MIME, PROCESS_ENDPOINT, UPLOAD_ENDPOINT,
    UPLOAD_FIELD_NAME,
};
use crate::errors::TransportError;
use crate::models::{ErrorBody, ProcessResult, UploadReply};
use serde::de::DeserializeOwned;
use std::path::Path;

/// The remote service that summarizes and converts files.
#[async_trait::async_trait]
pub trait ConversionApi: Send + Sync {
    async fn upload(&self, path: &Path) -> Result<UploadReply, TransportError>;
    async fn process(&self, filename: &str, action: &str) -> Result<ProcessResult, TransportError>;
}

pub struct HttpConversionApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpConversionApi {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(format!("{}/{}", CONFIG_DIR_NAME, APP_VERSION))
            .build()
            .map_err(|e| TransportError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn file_part(path: &Path) -> Result<reqwest::multipart::Part, TransportError> {
        let io_error = |e: std::io::Error| TransportError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        let file = tokio::fs::File::open(path).await.map_err(io_error)?;
        let length = file.metadata().await.map_err(io_error)?.len();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());
        let mime = infer::get_from_path(path)
            .ok()
            .flatten()
            .map(|kind| kind.mime_type())
            .unwrap_or(FALLBACK_MIME);

        tracing::debug!("Uploading {} ({} bytes, {})", file_name, length, mime);

        reqwest::multipart::Part::stream_with_length(reqwest::Body::from(file), length)
            .file_name(file_name)
            .mime_str(mime)
            .map_err(|e| TransportError::Network(e.to_string()))
    }
}

#[async_trait::async_trait]
impl ConversionApi for HttpConversionApi {
    async fn upload(&self, path: &Path) -> Result<UploadReply, TransportError> {
        let form = reqwest::multipart::Form::new().part(UPLOAD_FIELD_NAME, Self::file_part(path).await?);

        let response = self
            .client
            .post(endpoint_url(&self.base_url, UPLOAD_ENDPOINT))
            .multipart(form)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        read_json(response).await
    }

    async fn process(&self, filename: &str, action: &str) -> Result<ProcessResult, TransportError> {
        let response = self
            .client
            .post(endpoint_url(&self.base_url, PROCESS_ENDPOINT))
            .form(&[("filename", filename), ("action", action)])
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        read_json(response).await
    }
}

/// Non-2xx responses become [`TransportError::Http`] carrying the body's
/// `message`, or a synthesized one when the body has none.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, TransportError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.json::<ErrorBody>().await.unwrap_or_default();
        return Err(TransportError::Http {
            status: status.as_u16(),
            message: body
                .message
                .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16())),
            code: body.code,
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| TransportError::Decode(e.to_string()))
}

pub fn endpoint_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Download links are usually server-relative.
pub fn resolve_download_url(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        endpoint_url(base_url, href)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url() {
        assert_eq!(
            endpoint_url("http://127.0.0.1:5000/", UPLOAD_ENDPOINT),
            "http://127.0.0.1:5000/upload"
        );
        assert_eq!(
            endpoint_url("http://host", PROCESS_ENDPOINT),
            "http://host/process"
        );
    }

    #[test]
    fn test_resolve_download_url() {
        assert_eq!(
            resolve_download_url("http://host:5000", "/downloads/a_compressed.mp4"),
            "http://host:5000/downloads/a_compressed.mp4"
        );
        assert_eq!(
            resolve_download_url("http://host:5000", "https://cdn.example/a.mp3"),
            "https://cdn.example/a.mp3"
        );
    }

    #[test]
    fn test_client_trims_base_url() {
        let api = HttpConversionApi::new("http://host:5000/").unwrap();
        assert_eq!(api.base_url(), "http://host:5000");
    }

    #[tokio::test]
    async fn test_upload_missing_file_is_io_error() {
        let api = HttpConversionApi::new("http://127.0.0.1:9").unwrap();
        let err = api
            .upload(Path::new("/definitely/not/here.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Io { .. }));
        assert!(!err.is_size_limit());
    }
}
