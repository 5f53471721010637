use crate::constants::BUSY_LABEL;
use crate::errors::{TransportError, WorkflowError};
use crate::events::{AppEvent, EventSender};
use crate::models::UploadReply;
use crate::services::api_client::ConversionApi;
use crate::state::Workspace;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Handle;
use uuid::Uuid;

/// Drives one upload from the submit click to the applied reply.
#[derive(Clone)]
pub struct UploadService {
    api: Arc<dyn ConversionApi>,
    runtime: Handle,
    event_sender: EventSender,
}

impl UploadService {
    pub fn new(api: Arc<dyn ConversionApi>, runtime: Handle, event_sender: EventSender) -> Self {
        Self {
            api,
            runtime,
            event_sender,
        }
    }

    /// Resets the workspace, then starts the upload in the background.
    pub fn submit(
        &self,
        workspace: &mut Workspace,
        selection: Option<PathBuf>,
    ) -> Result<Uuid, WorkflowError> {
        if !workspace.panels.submit.is_enabled() {
            let error = WorkflowError::UploadInFlight;
            workspace.panels.notifications.report(&error);
            return Err(error);
        }

        workspace.reset_file_info();

        let path = match selection {
            Some(path) => path,
            None => {
                let error = WorkflowError::NoFileSelected;
                workspace.panels.notifications.report(&error);
                return Err(error);
            }
        };

        let task_id = Uuid::new_v4();
        workspace.panels.submit.begin(BUSY_LABEL);
        workspace.begin_upload(task_id);
        tracing::info!("Uploading {:?} (task {})", path, task_id);

        let api = Arc::clone(&self.api);
        let completion = UploadCompletion {
            task_id,
            event_sender: self.event_sender.clone(),
            sent: false,
        };
        self.runtime.spawn(async move {
            let outcome = api.upload(&path).await;
            completion.send(outcome);
        });

        Ok(task_id)
    }

    /// Applies the upload outcome and always releases the submit control.
    pub fn complete(
        &self,
        workspace: &mut Workspace,
        task_id: Uuid,
        outcome: Result<UploadReply, TransportError>,
    ) {
        if workspace.phase.get_task_id() != Some(task_id) {
            tracing::warn!("Discarding upload result for stale task {}", task_id);
            if !workspace.phase.is_uploading() {
                workspace.panels.submit.finish();
            }
            return;
        }

        match outcome {
            Ok(UploadReply::Success { filename, summary }) => {
                tracing::info!("Upload finished: {} ({})", filename, summary.file_type);
                workspace.establish_session(filename, summary);
            }
            Ok(UploadReply::Warning { message, details }) => {
                tracing::warn!("Upload warning: {}", message);
                workspace
                    .panels
                    .result
                    .show_report(&WorkflowError::ServerWarning { message, details });
            }
            Ok(UploadReply::Error { message, details }) => {
                workspace
                    .panels
                    .notifications
                    .report(&WorkflowError::ServerError { message, details });
            }
            Err(e) => {
                tracing::error!("Upload request failed: {}", e);
                workspace
                    .panels
                    .notifications
                    .report(&WorkflowError::from_transport(e));
            }
        }

        workspace.end_upload();
        workspace.panels.submit.finish();
    }
}

/// Delivers the upload completion exactly once. If the task unwinds before
/// the request resolves, the drop sends a transport failure instead.
struct UploadCompletion {
    task_id: Uuid,
    event_sender: EventSender,
    sent: bool,
}

impl UploadCompletion {
    fn send(mut self, outcome: Result<UploadReply, TransportError>) {
        self.sent = true;
        let event = AppEvent::UploadFinished {
            task_id: self.task_id,
            outcome,
        };
        if let Err(e) = self.event_sender.send(event) {
            tracing::error!("Failed to send upload result: {}", e);
        }
    }
}

impl Drop for UploadCompletion {
    fn drop(&mut self) {
        if self.sent {
            return;
        }

        tracing::error!("Upload task {} ended without a reply", self.task_id);
        let _ = self.event_sender.send(AppEvent::UploadFinished {
            task_id: self.task_id,
            outcome: Err(TransportError::Network(
                "Upload task ended without a reply".to_string(),
            )),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{COMMUNICATION_ERROR, FILE_TOO_LARGE, SUBMIT_LABEL};
    use crate::events::create_event_channel;
    use crate::models::{FileSummary, ProcessResult, ProcessStatus};
    use crate::panels::ResultStyle;
    use crate::services::testing::FakeApi;

    async fn run_upload(
        api: Arc<FakeApi>,
        workspace: &mut Workspace,
        selection: Option<PathBuf>,
    ) -> Result<Uuid, WorkflowError> {
        let (tx, mut rx) = create_event_channel();
        let service = UploadService::new(api, Handle::current(), tx);
        let task_id = service.submit(workspace, selection)?;

        match rx.recv().await {
            Some(AppEvent::UploadFinished { task_id, outcome }) => {
                service.complete(workspace, task_id, outcome)
            }
            other => panic!("unexpected event: {:?}", other),
        }
        Ok(task_id)
    }

    #[tokio::test]
    async fn test_no_file_selected_skips_request() {
        let api = Arc::new(FakeApi::new());
        let mut workspace = Workspace::new();
        workspace.establish_session("old.pdf".to_string(), FileSummary::new("old.pdf", "pdf"));
        workspace.panels.result.show_result(&ProcessResult {
            status: ProcessStatus::Success,
            message: "OK".to_string(),
            download_url: Some("/f/x".to_string()),
            details: None,
        });

        let result = run_upload(api.clone(), &mut workspace, None).await;

        assert_eq!(result, Err(WorkflowError::NoFileSelected));
        assert_eq!(api.upload_calls(), 0);
        assert!(workspace.panels.notifications.error().is_some());
        assert!(workspace.panels.submit.is_enabled());

        // The reset runs before the selection is checked.
        assert!(workspace.session.is_none());
        assert!(workspace.panels.result.is_empty());
        assert!(workspace.panels.actions.is_empty());
        assert!(!workspace.panels.summary.is_visible());
    }

    #[tokio::test]
    async fn test_success_establishes_session() {
        let api = Arc::new(FakeApi::new().with_upload(Ok(UploadReply::Success {
            filename: "movie.mp4".to_string(),
            summary: FileSummary::new("movie.mp4", "mp4"),
        })));
        let mut workspace = Workspace::new();

        run_upload(api.clone(), &mut workspace, Some(PathBuf::from("movie.mp4")))
            .await
            .unwrap();

        assert_eq!(api.upload_calls(), 1);
        assert_eq!(workspace.session.as_ref().unwrap().filename, "movie.mp4");
        assert!(workspace.panels.summary.is_visible());
        assert!(workspace.panels.actions.get("compress_mp4_24").is_some());
        assert!(workspace.panels.submit.is_enabled());
        assert_eq!(workspace.panels.submit.label(), SUBMIT_LABEL);
    }

    #[tokio::test]
    async fn test_submit_resets_before_request() {
        let api = Arc::new(FakeApi::new());
        let (tx, _rx) = create_event_channel();
        let service = UploadService::new(api.clone(), Handle::current(), tx);

        let mut workspace = Workspace::new();
        workspace.establish_session("old.pdf".to_string(), FileSummary::new("old.pdf", "pdf"));
        workspace.panels.result.show_result(&ProcessResult {
            status: ProcessStatus::Success,
            message: "OK".to_string(),
            download_url: Some("/f/x".to_string()),
            details: None,
        });

        service
            .submit(&mut workspace, Some(PathBuf::from("new.wav")))
            .unwrap();

        // The spawned request has not run yet on this single-threaded runtime.
        assert_eq!(api.upload_calls(), 0);
        assert!(workspace.session.is_none());
        assert!(workspace.panels.result.is_empty());
        assert!(workspace.panels.actions.is_empty());
        assert!(!workspace.panels.submit.is_enabled());
        assert!(workspace.phase.is_uploading());

        assert_eq!(
            service.submit(&mut workspace, Some(PathBuf::from("again.wav"))),
            Err(WorkflowError::UploadInFlight)
        );
    }

    #[tokio::test]
    async fn test_warning_reply_goes_to_result_panel() {
        let api = Arc::new(FakeApi::new().with_upload(Ok(UploadReply::Warning {
            message: "Arquivo vazio".to_string(),
            details: None,
        })));
        let mut workspace = Workspace::new();

        run_upload(api, &mut workspace, Some(PathBuf::from("a.csv")))
            .await
            .unwrap();

        assert!(workspace.session.is_none());
        assert_eq!(workspace.panels.result.style(), Some(ResultStyle::Warning));
        assert_eq!(workspace.panels.result.message(), "Arquivo vazio");
        assert!(workspace.panels.notifications.warning().is_none());
    }

    #[tokio::test]
    async fn test_error_reply_shows_error_banner() {
        let api = Arc::new(FakeApi::new().with_upload(Ok(UploadReply::Error {
            message: "Tipo de arquivo não permitido".to_string(),
            details: Some("exe".to_string()),
        })));
        let mut workspace = Workspace::new();

        run_upload(api, &mut workspace, Some(PathBuf::from("a.exe")))
            .await
            .unwrap();

        let banner = workspace.panels.notifications.error().unwrap();
        assert_eq!(banner.message, "Tipo de arquivo não permitido");
        assert_eq!(banner.details.as_deref(), Some("exe"));
        assert!(workspace.session.is_none());
    }

    #[tokio::test]
    async fn test_size_limit_failure_is_a_warning() {
        let api = Arc::new(FakeApi::new().with_upload(Err(TransportError::Http {
            status: 400,
            message: "O arquivo excede o tamanho máximo permitido de 1GB.".to_string(),
            code: None,
        })));
        let mut workspace = Workspace::new();

        run_upload(api, &mut workspace, Some(PathBuf::from("huge.mkv")))
            .await
            .unwrap();

        assert!(workspace.panels.notifications.error().is_none());
        let banner = workspace.panels.notifications.warning().unwrap();
        assert_eq!(banner.message, FILE_TOO_LARGE);
        assert!(workspace.panels.submit.is_enabled());
    }

    #[tokio::test]
    async fn test_network_failure_is_communication_error() {
        let api = Arc::new(
            FakeApi::new().with_upload(Err(TransportError::Network("connection refused".to_string()))),
        );
        let mut workspace = Workspace::new();

        run_upload(api, &mut workspace, Some(PathBuf::from("a.mp4")))
            .await
            .unwrap();

        let banner = workspace.panels.notifications.error().unwrap();
        assert_eq!(banner.message, COMMUNICATION_ERROR);
        assert!(workspace.panels.notifications.warning().is_none());
        assert!(workspace.panels.submit.is_enabled());
        assert!(!workspace.phase.is_uploading());
    }

    #[tokio::test]
    async fn test_crashed_upload_task_releases_submit() {
        let api = Arc::new(FakeApi::new().with_upload_panic());
        let mut workspace = Workspace::new();

        run_upload(api.clone(), &mut workspace, Some(PathBuf::from("a.mp4")))
            .await
            .unwrap();

        assert_eq!(api.upload_calls(), 1);
        let banner = workspace.panels.notifications.error().unwrap();
        assert_eq!(banner.message, COMMUNICATION_ERROR);
        assert!(workspace.panels.submit.is_enabled());
        assert_eq!(workspace.panels.submit.label(), SUBMIT_LABEL);
        assert!(!workspace.phase.is_uploading());
    }

    #[tokio::test]
    async fn test_stale_completion_releases_idle_submit() {
        let api = Arc::new(FakeApi::new());
        let (tx, _rx) = create_event_channel();
        let service = UploadService::new(api, Handle::current(), tx);

        let mut workspace = Workspace::new();
        workspace.panels.submit.begin(BUSY_LABEL);

        service.complete(
            &mut workspace,
            Uuid::new_v4(),
            Ok(UploadReply::Success {
                filename: "late.pdf".to_string(),
                summary: FileSummary::new("late.pdf", "pdf"),
            }),
        );

        assert!(workspace.session.is_none());
        assert!(workspace.panels.submit.is_enabled());
    }

    #[tokio::test]
    async fn test_stale_completion_keeps_live_upload_locked() {
        let api = Arc::new(FakeApi::new());
        let (tx, _rx) = create_event_channel();
        let service = UploadService::new(api, Handle::current(), tx);

        let mut workspace = Workspace::new();
        service
            .submit(&mut workspace, Some(PathBuf::from("new.wav")))
            .unwrap();

        service.complete(
            &mut workspace,
            Uuid::new_v4(),
            Err(TransportError::Network("late".to_string())),
        );

        assert!(!workspace.panels.submit.is_enabled());
        assert!(workspace.phase.is_uploading());
        assert!(workspace.panels.notifications.error().is_none());
    }
}
