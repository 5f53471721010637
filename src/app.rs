use crate::config::AppConfig;
use crate::errors::{Severity, TransportError};
use crate::events::{create_event_channel, AppEvent, EventReceiver};
use crate::services::{HttpConversionApi, ServiceManager};
use crate::state::{ActionChoice, Workspace};
use std::path::PathBuf;
use tokio::runtime::Handle;

pub struct ConvertFlowApp {
    pub workspace: Workspace,
    pub services: ServiceManager,
    pub config: AppConfig,
    pub selected_file: Option<PathBuf>,
    event_receiver: EventReceiver,
}

impl ConvertFlowApp {
    pub fn new(config: AppConfig, runtime: Handle) -> Result<Self, TransportError> {
        let (event_sender, event_receiver) = create_event_channel();
        let api = HttpConversionApi::new(config.server_url())?;
        tracing::info!("Using conversion service at {}", api.base_url());

        Ok(Self {
            workspace: Workspace::new(),
            services: ServiceManager::new(api, runtime, event_sender),
            config,
            selected_file: None,
            event_receiver,
        })
    }

    pub fn pick_file(&mut self) {
        let mut dialog = rfd::FileDialog::new();
        if let Some(folder) = &self.config.last_input_folder {
            dialog = dialog.set_directory(folder);
        }

        if let Some(path) = dialog.pick_file() {
            self.config
                .update_input_folder(path.parent().map(|p| p.to_path_buf()));
            self.selected_file = Some(path);
        }
    }

    pub fn submit_upload(&mut self) {
        if let Err(e) = self
            .services
            .upload
            .submit(&mut self.workspace, self.selected_file.clone())
        {
            tracing::debug!("Upload not started: {}", e);
        }
    }

    pub fn select_action(&mut self, id: &str) {
        match self.workspace.choose_action(id) {
            ActionChoice::Execute(action) => self.run_action(action),
            ActionChoice::OpenedSubMenu(parent) => tracing::debug!("Opened variants of {}", parent),
            ActionChoice::Unknown => {}
        }
    }

    pub fn select_sub_action(&mut self, id: &str) {
        if let Some(action) = self.workspace.choose_sub_action(id) {
            self.run_action(action);
        }
    }

    fn run_action(&mut self, action: &str) {
        if let Err(e) = self.services.process.execute(&mut self.workspace, action) {
            tracing::debug!("Action {} not started: {}", action, e);
        }
    }

    pub fn open_download(&mut self) {
        let Some(href) = self.workspace.panels.result.download_url().map(str::to_string) else {
            return;
        };

        if let Err(e) = self.services.download.open_in_browser(&href) {
            self.workspace.panels.notifications.show(
                Severity::Error,
                "Could not open the download link".to_string(),
                Some(e.to_string()),
            );
        }
    }

    pub fn save_download(&mut self) {
        let Some(href) = self.workspace.panels.result.download_url().map(str::to_string) else {
            return;
        };

        let file_name = href
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .unwrap_or("download");
        let mut dialog = rfd::FileDialog::new().set_file_name(file_name);
        if let Some(folder) = &self.config.download_folder {
            dialog = dialog.set_directory(folder);
        }

        if let Some(destination) = dialog.save_file() {
            self.config
                .update_download_folder(destination.parent().map(|p| p.to_path_buf()));
            let task_id = self.services.download.save(&href, destination);
            self.workspace.panels.result.start_download(task_id);
        }
    }

    pub fn is_downloading(&self) -> bool {
        matches!(
            self.workspace.panels.result.download(),
            crate::panels::DownloadState::InProgress { .. }
        )
    }

    /// Applies every completion that arrived since the last frame.
    pub fn process_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            self.handle_event(event);
        }
    }

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::UploadFinished { task_id, outcome } => {
                self.services
                    .upload
                    .complete(&mut self.workspace, task_id, outcome);
            }
            AppEvent::ProcessFinished { task_id, outcome } => {
                self.services
                    .process
                    .complete(&mut self.workspace, task_id, outcome);
            }
            AppEvent::DownloadProgress {
                task_id,
                percentage,
            } => {
                self.workspace
                    .panels
                    .result
                    .update_download(task_id, percentage);
            }
            AppEvent::DownloadCompleted { task_id, path } => {
                self.workspace
                    .panels
                    .result
                    .finish_download(task_id, Some(path));
            }
            AppEvent::DownloadFailed { task_id, error } => {
                if self.workspace.panels.result.finish_download(task_id, None) {
                    self.workspace.panels.notifications.show(
                        Severity::Error,
                        "Download failed".to_string(),
                        Some(error),
                    );
                }
            }
        }
    }
}
