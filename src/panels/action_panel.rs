use crate::actions::{self, ActionDescriptor};
use crate::models::FileSummary;

/// Primary action buttons for the current session.
#[derive(Debug, Clone, Default)]
pub struct ActionPanel {
    actions: Vec<&'static ActionDescriptor>,
}

impl ActionPanel {
    /// Rebuilds from scratch. A summary the builder rejects is logged and the
    /// panel keeps its last built contents.
    pub fn rebuild(&mut self, summary: &FileSummary) {
        match actions::primary_actions_for(summary) {
            Ok(actions) => {
                tracing::debug!(
                    "Action panel rebuilt for {} with {} actions",
                    summary.filename,
                    actions.len()
                );
                self.actions = actions;
            }
            Err(e) => tracing::error!("Failed to build action menu: {}", e),
        }
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }

    pub fn actions(&self) -> &[&'static ActionDescriptor] {
        &self.actions
    }

    pub fn get(&self, id: &str) -> Option<&'static ActionDescriptor> {
        self.actions.iter().copied().find(|a| a.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
