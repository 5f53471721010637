use serde::{Deserialize, Serialize};

/// Summary of an uploaded file, as computed by the upload endpoint.
///
/// Owned by the server; the client only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSummary {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub size: String,
    #[serde(rename = "type", default)]
    pub file_type: String,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub modified: String,
    #[serde(default)]
    pub convertible: bool,
    #[serde(default)]
    pub compressible: bool,
    #[serde(default)]
    pub conversion_options: Vec<String>,
    #[serde(default)]
    pub compression_options: Vec<String>,
    /// Set when the server failed to inspect the file.
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_type: Option<String>,
}

impl FileSummary {
    #[cfg(test)]
    pub fn new(filename: &str, file_type: &str) -> Self {
        Self {
            filename: filename.to_string(),
            size: String::new(),
            file_type: file_type.to_lowercase(),
            created: String::new(),
            modified: String::new(),
            convertible: false,
            compressible: false,
            conversion_options: Vec::new(),
            compression_options: Vec::new(),
            error: None,
            error_type: None,
        }
    }

    #[cfg(test)]
    pub fn with_convertible(mut self, convertible: bool) -> Self {
        self.convertible = convertible;
        self
    }

    /// Rows shown in the summary panel.
    pub fn display_rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = vec![
            ("Name", self.filename.clone()),
            ("Size", self.size.clone()),
            ("Type", self.file_type.clone()),
            ("Created", self.created.clone()),
            ("Modified", self.modified.clone()),
        ];

        if self.compressible && !self.compression_options.is_empty() {
            rows.push(("Compression", self.compression_options.join(", ")));
        }
        if self.convertible && !self.conversion_options.is_empty() {
            rows.push(("Converts to", self.conversion_options.join(", ")));
        }
        rows
    }

    /// The server's inspection error, if any, with its error type.
    pub fn failure(&self) -> Option<String> {
        let error = self.error.as_ref()?;
        Some(match &self.error_type {
            Some(kind) => format!("{} ({})", error, kind),
            None => error.clone(),
        })
    }
}

/// Structured body of the upload endpoint, tagged by `status`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum UploadReply {
    Success {
        filename: String,
        summary: FileSummary,
    },
    Warning {
        message: String,
        #[serde(default)]
        details: Option<String>,
    },
    Error {
        message: String,
        #[serde(default)]
        details: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessStatus {
    Success,
    Warning,
    Error,
}

/// Body of the processing endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProcessResult {
    pub status: ProcessStatus,
    #[serde(default)]
    pub message: String,
    #[serde(default, alias = "downloadUrl")]
    pub download_url: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

impl ProcessResult {
    /// Download link, only honoured for successful results.
    pub fn download_link(&self) -> Option<&str> {
        match self.status {
            ProcessStatus::Success => self
                .download_url
                .as_deref()
                .filter(|url| !url.is_empty()),
            _ => None,
        }
    }
}

/// Error body the server attaches to non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_success_reply() {
        let body = r#"{
            "status": "success",
            "filename": "report.pdf",
            "summary": {
                "filename": "report.pdf",
                "size": "1.20 MB",
                "type": "pdf",
                "created": "2024-01-01 10:00:00",
                "modified": "2024-01-01 10:00:00",
                "convertible": false,
                "compressible": false
            }
        }"#;

        let reply: UploadReply = serde_json::from_str(body).unwrap();
        match reply {
            UploadReply::Success { filename, summary } => {
                assert_eq!(filename, "report.pdf");
                assert_eq!(summary.file_type, "pdf");
                assert_eq!(summary.size, "1.20 MB");
                assert!(summary.failure().is_none());
                assert_eq!(summary.display_rows().len(), 5);
            }
            other => panic!("unexpected reply: {:?}", other),
        }
    }

    #[test]
    fn test_upload_error_reply_without_details() {
        let reply: UploadReply =
            serde_json::from_str(r#"{"status": "error", "message": "Tipo de arquivo não permitido"}"#)
                .unwrap();
        assert_eq!(
            reply,
            UploadReply::Error {
                message: "Tipo de arquivo não permitido".to_string(),
                details: None,
            }
        );
    }

    #[test]
    fn test_summary_options_and_failure() {
        let mut summary: FileSummary = serde_json::from_str(
            r#"{"filename": "a.mp4", "type": "mp4", "compressible": true,
                "compression_options": ["MP4 (CRF 28)", "MP4 (CRF 24)"]}"#,
        )
        .unwrap();
        let rows = summary.display_rows();
        assert_eq!(rows.last().unwrap(), &("Compression", "MP4 (CRF 28), MP4 (CRF 24)".to_string()));

        summary.error = Some("No such file".to_string());
        summary.error_type = Some("FileNotFoundError".to_string());
        assert_eq!(summary.failure().as_deref(), Some("No such file (FileNotFoundError)"));
    }

    #[test]
    fn test_process_result_download_link() {
        let result: ProcessResult = serde_json::from_str(
            r#"{"status": "success", "message": "OK", "download_url": "/f/x"}"#,
        )
        .unwrap();
        assert_eq!(result.download_link(), Some("/f/x"));

        let warning: ProcessResult = serde_json::from_str(
            r#"{"status": "warning", "message": "partial", "downloadUrl": "/f/y"}"#,
        )
        .unwrap();
        assert_eq!(warning.download_url.as_deref(), Some("/f/y"));
        assert_eq!(warning.download_link(), None);
    }
}
