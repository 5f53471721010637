//! Declarative action table.
//!
//! Every action the client can show lives in [`ACTIONS`]. A primary action
//! with sub-actions pointing at it is compound: choosing it opens a sub-option
//! menu instead of submitting. [`MENU_RULES`] decides which primary actions a
//! file summary gets; the first matching rule wins.

use crate::errors::MenuError;
use crate::models::FileSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionDescriptor {
    /// Token sent to the processing endpoint.
    pub id: &'static str,
    pub label: &'static str,
    pub color_hint: &'static str,
    pub parent_id: Option<&'static str>,
}

impl ActionDescriptor {
    const fn primary(id: &'static str, label: &'static str, color_hint: &'static str) -> Self {
        Self {
            id,
            label,
            color_hint,
            parent_id: None,
        }
    }

    const fn sub(
        parent: &'static str,
        id: &'static str,
        label: &'static str,
        color_hint: &'static str,
    ) -> Self {
        Self {
            id,
            label,
            color_hint,
            parent_id: Some(parent),
        }
    }

    pub fn is_sub_action(&self) -> bool {
        self.parent_id.is_some()
    }

    pub fn is_compound(&self) -> bool {
        !self.is_sub_action() && ACTIONS.iter().any(|a| a.parent_id == Some(self.id))
    }
}

pub const ACTIONS: &[ActionDescriptor] = &[
    // PDF
    ActionDescriptor::primary("compress_pdf", "Compress PDF", "#4CAF50"),
    ActionDescriptor::primary("split_pdf", "Split PDF", "#2196F3"),
    ActionDescriptor::primary("merge_pdf", "Merge PDF", "#9C27B0"),
    ActionDescriptor::sub("compress_pdf", "compress_pdf_low", "Low compression", "#81C784"),
    ActionDescriptor::sub("compress_pdf", "compress_pdf_medium", "Medium compression", "#4CAF50"),
    ActionDescriptor::sub("compress_pdf", "compress_pdf_high", "High compression", "#2E7D32"),
    ActionDescriptor::sub("split_pdf", "split_pdf_range", "Split at page", "#64B5F6"),
    ActionDescriptor::sub("split_pdf", "split_pdf_single", "One file per page", "#1976D2"),
    // Video and audio
    ActionDescriptor::primary("compress_mp4_28", "Compress (good quality)", "#4CAF50"),
    ActionDescriptor::primary("compress_mp4_24", "Compress (better quality)", "#2196F3"),
    ActionDescriptor::primary("convert_to_mp3", "Convert to MP3", "#FF9800"),
    ActionDescriptor::primary("convert_to_mp4", "Convert to MP4", "#FF9800"),
];

pub struct MenuRule {
    pub name: &'static str,
    pub matches: fn(&FileSummary) -> bool,
    pub actions: &'static [&'static str],
}

pub const MENU_RULES: &[MenuRule] = &[
    MenuRule {
        name: "pdf",
        matches: |s| s.file_type == "pdf",
        actions: &["compress_pdf", "split_pdf", "merge_pdf"],
    },
    MenuRule {
        name: "mp4",
        matches: |s| s.file_type == "mp4",
        actions: &["compress_mp4_28", "compress_mp4_24"],
    },
    MenuRule {
        name: "wav",
        matches: |s| s.file_type == "wav",
        actions: &["convert_to_mp3"],
    },
    MenuRule {
        name: "convertible",
        matches: |s| s.convertible || s.file_type == "asf",
        actions: &["convert_to_mp4"],
    },
];

pub fn find(id: &str) -> Option<&'static ActionDescriptor> {
    ACTIONS.iter().find(|a| a.id == id)
}

/// Primary actions for a summary, in display order. Unknown types get none.
pub fn primary_actions_for(
    summary: &FileSummary,
) -> Result<Vec<&'static ActionDescriptor>, MenuError> {
    if let Some(reason) = summary.failure() {
        return Err(MenuError::SummaryUnavailable {
            filename: summary.filename.clone(),
            reason,
        });
    }

    let rule = match MENU_RULES.iter().find(|rule| (rule.matches)(summary)) {
        Some(rule) => rule,
        None => return Ok(Vec::new()),
    };
    tracing::debug!("Menu rule '{}' matched {}", rule.name, summary.filename);

    Ok(rule.actions.iter().filter_map(|id| find(id)).collect())
}

/// Concrete variants of a compound action, in declaration order.
pub fn sub_actions_for(parent_id: &str) -> Vec<&'static ActionDescriptor> {
    ACTIONS
        .iter()
        .filter(|a| a.parent_id == Some(parent_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(actions: &[&ActionDescriptor]) -> Vec<&'static str> {
        actions.iter().map(|a| a.id).collect()
    }

    #[test]
    fn test_pdf_actions() {
        let actions = primary_actions_for(&FileSummary::new("a.pdf", "pdf")).unwrap();
        assert_eq!(ids(&actions), vec!["compress_pdf", "split_pdf", "merge_pdf"]);
        assert!(actions[0].is_compound());
        assert!(actions[1].is_compound());
        assert!(!actions[2].is_compound());
    }

    #[test]
    fn test_mp4_actions_are_not_compound() {
        let actions = primary_actions_for(&FileSummary::new("a.mp4", "mp4")).unwrap();
        assert_eq!(ids(&actions), vec!["compress_mp4_28", "compress_mp4_24"]);
        assert!(actions.iter().all(|a| !a.is_compound()));
    }

    #[test]
    fn test_audio_and_convertible_actions() {
        let wav = primary_actions_for(&FileSummary::new("a.wav", "wav")).unwrap();
        assert_eq!(ids(&wav), vec!["convert_to_mp3"]);

        let mkv = primary_actions_for(&FileSummary::new("a.mkv", "mkv").with_convertible(true))
            .unwrap();
        assert_eq!(ids(&mkv), vec!["convert_to_mp4"]);

        let asf = primary_actions_for(&FileSummary::new("a.asf", "asf")).unwrap();
        assert_eq!(ids(&asf), vec!["convert_to_mp4"]);
    }

    #[test]
    fn test_type_rule_wins_over_convertible_flag() {
        let summary = FileSummary::new("a.mp4", "mp4").with_convertible(true);
        let actions = primary_actions_for(&summary).unwrap();
        assert_eq!(ids(&actions), vec!["compress_mp4_28", "compress_mp4_24"]);
    }

    #[test]
    fn test_unknown_type_has_no_actions() {
        assert!(primary_actions_for(&FileSummary::new("a.csv", "csv"))
            .unwrap()
            .is_empty());
        assert!(primary_actions_for(&FileSummary::new("a.mkv", "mkv"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_summary_error_is_rejected() {
        let mut summary = FileSummary::new("broken.pdf", "pdf");
        summary.error = Some("Permission denied".to_string());
        assert!(matches!(
            primary_actions_for(&summary),
            Err(MenuError::SummaryUnavailable { .. })
        ));
    }

    #[test]
    fn test_sub_actions() {
        assert_eq!(
            ids(&sub_actions_for("compress_pdf")),
            vec!["compress_pdf_low", "compress_pdf_medium", "compress_pdf_high"]
        );
        assert_eq!(
            ids(&sub_actions_for("split_pdf")),
            vec!["split_pdf_range", "split_pdf_single"]
        );
        assert!(sub_actions_for("merge_pdf").is_empty());
        assert!(!find("compress_pdf_low").unwrap().is_compound());
        assert!(find("compress_pdf_low").unwrap().is_sub_action());
        assert!(find("split_pdf").unwrap().is_compound());
    }

    #[test]
    fn test_action_ids_are_unique() {
        for (i, action) in ACTIONS.iter().enumerate() {
            assert!(
                ACTIONS[i + 1..].iter().all(|other| other.id != action.id),
                "duplicate action id {}",
                action.id
            );
        }
    }
}
