use crate::constants::{COMMUNICATION_ERROR, PROCESSING_TEXT};
use crate::errors::{Severity, WorkflowError};
use crate::models::{ProcessResult, ProcessStatus};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultStyle {
    Processing,
    Success,
    Warning,
    Error,
}

impl ResultStyle {
    pub fn label(self) -> &'static str {
        match self {
            Self::Processing => "Processing",
            Self::Success => "Completed successfully",
            Self::Warning => "Completed with warnings",
            Self::Error => "Failed",
        }
    }
}

impl From<ProcessStatus> for ResultStyle {
    fn from(status: ProcessStatus) -> Self {
        match status {
            ProcessStatus::Success => Self::Success,
            ProcessStatus::Warning => Self::Warning,
            ProcessStatus::Error => Self::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DownloadState {
    Idle,
    InProgress { task_id: Uuid, percentage: f32 },
    Saved(PathBuf),
}

impl Default for DownloadState {
    fn default() -> Self {
        DownloadState::Idle
    }
}

/// Status area below the actions. Empty until something is processed.
#[derive(Debug, Clone, Default)]
pub struct ResultPresenter {
    style: Option<ResultStyle>,
    message: String,
    details: Option<String>,
    download_url: Option<String>,
    download: DownloadState,
}

impl ResultPresenter {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn show_processing(&mut self) {
        self.reset();
        self.style = Some(ResultStyle::Processing);
        self.message = PROCESSING_TEXT.to_string();
    }

    pub fn show_result(&mut self, result: &ProcessResult) {
        self.reset();
        self.style = Some(result.status.into());
        self.message = result.message.clone();
        self.details = result.details.clone().filter(|d| !d.is_empty());
        self.download_url = result.download_link().map(str::to_string);
    }

    /// Server-reported outcome of an upload that produced no session.
    pub fn show_report(&mut self, report: &WorkflowError) {
        self.reset();
        self.style = Some(match report.severity() {
            Severity::Error => ResultStyle::Error,
            Severity::Warning => ResultStyle::Warning,
        });
        self.message = report.to_string();
        self.details = report.details();
    }

    pub fn show_communication_error(&mut self) {
        self.reset();
        self.style = Some(ResultStyle::Error);
        self.message = COMMUNICATION_ERROR.to_string();
    }

    pub fn start_download(&mut self, task_id: Uuid) {
        self.download = DownloadState::InProgress {
            task_id,
            percentage: 0.0,
        };
    }

    /// Ignores progress from downloads the panel no longer tracks.
    pub fn update_download(&mut self, task_id: Uuid, percentage: f32) -> bool {
        match &mut self.download {
            DownloadState::InProgress {
                task_id: current,
                percentage: shown,
            } if *current == task_id => {
                *shown = percentage;
                true
            }
            _ => false,
        }
    }

    pub fn finish_download(&mut self, task_id: Uuid, path: Option<PathBuf>) -> bool {
        if !self.is_downloading(task_id) {
            return false;
        }
        self.download = match path {
            Some(path) => DownloadState::Saved(path),
            None => DownloadState::Idle,
        };
        true
    }

    fn is_downloading(&self, task_id: Uuid) -> bool {
        matches!(&self.download, DownloadState::InProgress { task_id: current, .. } if *current == task_id)
    }

    pub fn style(&self) -> Option<ResultStyle> {
        self.style
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    pub fn download_url(&self) -> Option<&str> {
        self.download_url.as_deref()
    }

    pub fn download(&self) -> &DownloadState {
        &self.download
    }

    pub fn is_empty(&self) -> bool {
        self.style.is_none() && self.message.is_empty() && self.download_url.is_none()
    }
}
