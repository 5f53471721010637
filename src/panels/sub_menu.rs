use crate::actions::{self, ActionDescriptor};

/// Variants of one compound action. The workspace keeps at most one.
#[derive(Debug, Clone, PartialEq)]
pub struct SubOptionMenu {
    parent_id: &'static str,
    options: Vec<&'static ActionDescriptor>,
}

impl SubOptionMenu {
    /// Returns `None` for actions that are not compound.
    pub fn open(parent: &'static ActionDescriptor) -> Option<Self> {
        if !parent.is_compound() {
            return None;
        }

        Some(Self {
            parent_id: parent.id,
            options: actions::sub_actions_for(parent.id),
        })
    }

    pub fn parent_id(&self) -> &'static str {
        self.parent_id
    }

    pub fn options(&self) -> &[&'static ActionDescriptor] {
        &self.options
    }

    pub fn option(&self, id: &str) -> Option<&'static ActionDescriptor> {
        self.options.iter().copied().find(|a| a.id == id)
    }
}
