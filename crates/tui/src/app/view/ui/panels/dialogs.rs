use crate::app::state::PromptDialogState;

use super::PanelView;

pub(super) fn build_prompt_panel_view(panel: &PromptDialogState) -> PanelView {
    let mut lines = Vec::new();
    if !panel.message.trim().is_empty() {
        lines.extend(panel.message.lines().map(|line| line.to_string()));
    }
    lines.push(String::new());
    lines.push("Enter to attach, Esc to cancel".to_string());
    PanelView {
        title: Some(panel.title.clone()),
        lines,
        selected: None,
        wrap_lines: true,
    }
}
