use crate::models::FileSummary;
use crate::panels::{Panels, ResultStyle, SubOptionMenu};
use std::time::Instant;
use uuid::Uuid;

/// The most recently uploaded file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSession {
    pub filename: String,
    pub summary: FileSummary,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowPhase {
    NoFile,
    Uploading {
        task_id: Uuid,
        start_time: Instant,
    },
    Summarized,
    ChoosingVariant {
        parent_id: &'static str,
    },
    Processing {
        task_id: Uuid,
        action: String,
        start_time: Instant,
    },
    ResultShown {
        style: ResultStyle,
    },
}

impl Default for WorkflowPhase {
    fn default() -> Self {
        WorkflowPhase::NoFile
    }
}

impl WorkflowPhase {
    pub fn is_uploading(&self) -> bool {
        matches!(self, WorkflowPhase::Uploading { .. })
    }

    pub fn is_processing(&self) -> bool {
        matches!(self, WorkflowPhase::Processing { .. })
    }

    pub fn is_busy(&self) -> bool {
        self.is_uploading() || self.is_processing()
    }

    /// One-line status shown in the window header.
    pub fn status_text(&self) -> String {
        match self {
            WorkflowPhase::NoFile => "No file uploaded".to_string(),
            WorkflowPhase::Uploading { start_time, .. } => {
                format!("Uploading... {}s", start_time.elapsed().as_secs())
            }
            WorkflowPhase::Summarized => "Choose an action".to_string(),
            WorkflowPhase::ChoosingVariant { parent_id } => format!("Choose a variant of {}", parent_id),
            WorkflowPhase::Processing {
                action, start_time, ..
            } => format!("Running {}... {}s", action, start_time.elapsed().as_secs()),
            WorkflowPhase::ResultShown { style } => style.label().to_string(),
        }
    }

    pub fn get_task_id(&self) -> Option<Uuid> {
        match self {
            WorkflowPhase::Uploading { task_id, .. }
            | WorkflowPhase::Processing { task_id, .. } => Some(*task_id),
            _ => None,
        }
    }
}

/// Outcome of clicking a primary action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionChoice {
    Execute(&'static str),
    OpenedSubMenu(&'static str),
    Unknown,
}

/// Everything the workflow mutates: the session, the phase and the panels.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    pub session: Option<FileSession>,
    pub phase: WorkflowPhase,
    pub panels: Panels,
    process_lock: Option<Uuid>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the summary, actions, sub-menu, result and session. Releases the
    /// process lock so a late process completion is discarded.
    pub fn reset_file_info(&mut self) {
        self.session = None;
        self.panels.summary.clear();
        self.panels.actions.clear();
        self.panels.sub_menu = None;
        self.panels.result.reset();
        self.process_lock = None;
        if !self.phase.is_uploading() {
            self.phase = WorkflowPhase::NoFile;
        }
    }

    /// Replaces the session and rebuilds everything derived from it.
    pub fn establish_session(&mut self, filename: String, summary: FileSummary) {
        self.panels.actions.rebuild(&summary);
        self.panels.summary.show(summary.clone());
        self.session = Some(FileSession { filename, summary });
        self.phase = WorkflowPhase::Summarized;
    }

    pub fn choose_action(&mut self, id: &str) -> ActionChoice {
        let action = match self.panels.actions.get(id) {
            Some(action) => action,
            None => {
                tracing::warn!("Action {} is not on the panel", id);
                return ActionChoice::Unknown;
            }
        };

        match SubOptionMenu::open(action) {
            Some(menu) => {
                self.panels.sub_menu = Some(menu);
                if !self.phase.is_processing() {
                    self.phase = WorkflowPhase::ChoosingVariant {
                        parent_id: action.id,
                    };
                }
                ActionChoice::OpenedSubMenu(action.id)
            }
            None => {
                self.panels.sub_menu = None;
                ActionChoice::Execute(action.id)
            }
        }
    }

    /// Closes the sub-menu and returns the concrete action to execute.
    pub fn choose_sub_action(&mut self, id: &str) -> Option<&'static str> {
        let chosen = self.panels.sub_menu.as_ref()?.option(id)?;
        self.close_sub_menu();
        Some(chosen.id)
    }

    /// A click outside the action panel and the sub-menu.
    pub fn outside_interaction(&mut self) {
        if self.panels.sub_menu.is_some() {
            self.close_sub_menu();
        }
    }

    fn close_sub_menu(&mut self) {
        self.panels.sub_menu = None;
        if matches!(self.phase, WorkflowPhase::ChoosingVariant { .. }) {
            self.phase = WorkflowPhase::Summarized;
        }
    }

    pub fn begin_upload(&mut self, task_id: Uuid) {
        self.phase = WorkflowPhase::Uploading {
            task_id,
            start_time: Instant::now(),
        };
    }

    pub fn end_upload(&mut self) {
        if self.phase.is_uploading() {
            self.phase = if self.session.is_some() {
                WorkflowPhase::Summarized
            } else {
                WorkflowPhase::NoFile
            };
        }
    }

    pub fn is_process_locked(&self) -> bool {
        self.process_lock.is_some()
    }

    pub fn lock_process(&mut self, task_id: Uuid, action: &str) {
        self.process_lock = Some(task_id);
        self.phase = WorkflowPhase::Processing {
            task_id,
            action: action.to_string(),
            start_time: Instant::now(),
        };
    }

    /// Releases the lock if `task_id` still holds it.
    pub fn release_process(&mut self, task_id: Uuid) -> bool {
        if self.process_lock != Some(task_id) {
            return false;
        }
        self.process_lock = None;
        true
    }

    pub fn show_result_phase(&mut self, style: ResultStyle) {
        if !self.phase.is_uploading() {
            self.phase = WorkflowPhase::ResultShown { style };
        }
    }
}
