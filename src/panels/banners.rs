use crate::errors::{Severity, WorkflowError};

#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub severity: Severity,
    pub message: String,
    pub details: Option<String>,
    /// Cleared by the renderer once the banner has been scrolled into view.
    pub scroll_pending: bool,
}

/// Holds at most one banner per severity class.
#[derive(Debug, Clone, Default)]
pub struct NotificationPresenter {
    error: Option<Banner>,
    warning: Option<Banner>,
}

impl NotificationPresenter {
    pub fn report(&mut self, error: &WorkflowError) {
        self.show(error.severity(), error.to_string(), error.details());
    }

    /// Replaces any banner of the same class. The other class is untouched.
    pub fn show(&mut self, severity: Severity, message: String, details: Option<String>) {
        match severity {
            Severity::Error => tracing::error!("{}", message),
            Severity::Warning => tracing::warn!("{}", message),
        }

        *self.slot_mut(severity) = Some(Banner {
            severity,
            message,
            details,
            scroll_pending: true,
        });
    }

    pub fn dismiss(&mut self, severity: Severity) {
        *self.slot_mut(severity) = None;
    }

    pub fn error(&self) -> Option<&Banner> {
        self.error.as_ref()
    }

    pub fn warning(&self) -> Option<&Banner> {
        self.warning.as_ref()
    }

    pub fn banners_mut(&mut self) -> impl Iterator<Item = &mut Banner> {
        self.error.iter_mut().chain(self.warning.iter_mut())
    }

    fn slot_mut(&mut self, severity: Severity) -> &mut Option<Banner> {
        match severity {
            Severity::Error => &mut self.error,
            Severity::Warning => &mut self.warning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_class_replaces() {
        let mut presenter = NotificationPresenter::default();
        presenter.report(&WorkflowError::NoFileSelected);
        presenter.report(&WorkflowError::ServerError {
            message: "Tipo de arquivo não permitido".to_string(),
            details: Some("ext".to_string()),
        });

        let banner = presenter.error().unwrap();
        assert_eq!(banner.message, "Tipo de arquivo não permitido");
        assert_eq!(banner.details.as_deref(), Some("ext"));
        assert!(banner.scroll_pending);
        assert!(presenter.warning().is_none());
    }

    #[test]
    fn test_classes_coexist() {
        let mut presenter = NotificationPresenter::default();
        presenter.report(&WorkflowError::NoActiveSession);
        presenter.report(&WorkflowError::SizeLimit {
            message: "too big".to_string(),
        });

        assert!(presenter.error().is_some());
        assert!(presenter.warning().is_some());

        presenter.dismiss(Severity::Error);
        assert!(presenter.error().is_none());
        assert!(presenter.warning().is_some());
    }
}
