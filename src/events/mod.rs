use crate::errors::TransportError;
use crate::models::{ProcessResult, UploadReply};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub enum AppEvent {
    // Request completions
    UploadFinished {
        task_id: Uuid,
        outcome: Result<UploadReply, TransportError>,
    },
    ProcessFinished {
        task_id: Uuid,
        outcome: Result<ProcessResult, TransportError>,
    },

    // Download events
    DownloadProgress {
        task_id: Uuid,
        percentage: f32,
    },
    DownloadCompleted {
        task_id: Uuid,
        path: PathBuf,
    },
    DownloadFailed {
        task_id: Uuid,
        error: String,
    },
}

pub type EventSender = tokio::sync::mpsc::UnboundedSender<AppEvent>;
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<AppEvent>;

pub fn create_event_channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}
