//! View models for each region of the window. The workflow mutates these;
//! the `ui` module only draws them.

use crate::constants::SUBMIT_LABEL;
use crate::models::FileSummary;

pub mod action_panel;
pub mod banners;
pub mod result_panel;
pub mod sub_menu;

pub use action_panel::ActionPanel;
pub use banners::{Banner, NotificationPresenter};
pub use result_panel::{DownloadState, ResultPresenter, ResultStyle};
pub use sub_menu::SubOptionMenu;

#[derive(Debug, Clone, Default)]
pub struct SummaryPanel {
    visible: bool,
    summary: Option<FileSummary>,
}

impl SummaryPanel {
    pub fn show(&mut self, summary: FileSummary) {
        self.summary = Some(summary);
        self.visible = true;
    }

    pub fn clear(&mut self) {
        self.summary = None;
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn summary(&self) -> Option<&FileSummary> {
        self.summary.as_ref()
    }
}

/// The upload button, which doubles as the upload lock.
#[derive(Debug, Clone)]
pub struct SubmitControl {
    label: String,
    original_label: Option<String>,
    enabled: bool,
}

impl Default for SubmitControl {
    fn default() -> Self {
        Self {
            label: SUBMIT_LABEL.to_string(),
            original_label: None,
            enabled: true,
        }
    }
}

impl SubmitControl {
    pub fn begin(&mut self, busy_label: &str) {
        if self.original_label.is_none() {
            self.original_label = Some(std::mem::replace(&mut self.label, busy_label.to_string()));
        }
        self.enabled = false;
    }

    pub fn finish(&mut self) {
        if let Some(label) = self.original_label.take() {
            self.label = label;
        }
        self.enabled = true;
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[derive(Debug, Clone, Default)]
pub struct Panels {
    pub notifications: NotificationPresenter,
    pub summary: SummaryPanel,
    pub actions: ActionPanel,
    pub sub_menu: Option<SubOptionMenu>,
    pub result: ResultPresenter,
    pub submit: SubmitControl,
}
