mod dialogs;
mod render;
mod suggestions;

use crate::app::AppState;

use dialogs::build_prompt_panel_view;
use suggestions::{build_attachment_panel_view, build_command_panel_view};

pub(super) use render::{build_panel_render, render_input_panel};

pub(super) struct PanelView {
    pub(super) title: Option<String>,
    pub(super) lines: Vec<String>,
    pub(super) selected: Option<usize>,
    pub(super) wrap_lines: bool,
}

/// The panel drawn above the input: the path prompt, else the command menu,
/// else the attachment list.
pub(super) fn build_panel_view(app: &AppState) -> Option<PanelView> {
    if let Some(dialog) = &app.prompt_dialog {
        return Some(build_prompt_panel_view(dialog));
    }
    build_command_panel_view(app).or_else(|| build_attachment_panel_view(app))
}
