use crate::errors::{TransportError, WorkflowError};
use crate::events::{AppEvent, EventSender};
use crate::models::ProcessResult;
use crate::panels::ResultStyle;
use crate::services::api_client::ConversionApi;
use crate::state::Workspace;
use std::sync::Arc;
use tokio::runtime::Handle;
use uuid::Uuid;

/// Submits a concrete action for the session's file.
#[derive(Clone)]
pub struct ProcessService {
    api: Arc<dyn ConversionApi>,
    runtime: Handle,
    event_sender: EventSender,
}

impl ProcessService {
    pub fn new(api: Arc<dyn ConversionApi>, runtime: Handle, event_sender: EventSender) -> Self {
        Self {
            api,
            runtime,
            event_sender,
        }
    }

    pub fn execute(&self, workspace: &mut Workspace, action: &str) -> Result<Uuid, WorkflowError> {
        let filename = match &workspace.session {
            Some(session) => session.filename.clone(),
            None => {
                let error = WorkflowError::NoActiveSession;
                workspace.panels.notifications.report(&error);
                return Err(error);
            }
        };

        if workspace.is_process_locked() {
            let error = WorkflowError::ProcessInFlight;
            workspace.panels.notifications.report(&error);
            return Err(error);
        }

        let task_id = Uuid::new_v4();
        workspace.lock_process(task_id, action);
        workspace.panels.result.show_processing();
        tracing::info!("Submitting {} for {} (task {})", action, filename, task_id);

        let api = Arc::clone(&self.api);
        let event_sender = self.event_sender.clone();
        let action = action.to_string();
        self.runtime.spawn(async move {
            let outcome = api.process(&filename, &action).await;
            if let Err(e) = event_sender.send(AppEvent::ProcessFinished { task_id, outcome }) {
                tracing::error!("Failed to send process result: {}", e);
            }
        });

        Ok(task_id)
    }

    pub fn complete(
        &self,
        workspace: &mut Workspace,
        task_id: Uuid,
        outcome: Result<ProcessResult, TransportError>,
    ) {
        if !workspace.release_process(task_id) {
            tracing::warn!("Discarding process result for stale task {}", task_id);
            return;
        }

        match outcome {
            Ok(result) => {
                tracing::info!("Process finished ({:?}): {}", result.status, result.message);
                workspace.panels.result.show_result(&result);
                workspace.show_result_phase(result.status.into());
            }
            Err(e) => {
                tracing::error!("Process request failed: {}", e);
                workspace.panels.result.show_communication_error();
                workspace.show_result_phase(ResultStyle::Error);
            }
        }
    }
}
