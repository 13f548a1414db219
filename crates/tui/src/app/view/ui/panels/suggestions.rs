use crate::app::state::{command_row, Attachment};
use crate::app::util::format_file_size;
use crate::app::AppState;

use super::PanelView;

pub(super) fn build_command_panel_view(app: &AppState) -> Option<PanelView> {
    let menu = app.composer.menu();
    if !menu.visible() {
        return None;
    }
    Some(PanelView {
        title: Some("Commands (Tab/Enter to use, Esc to dismiss)".to_string()),
        lines: menu.candidates().iter().map(|command| command_row(command)).collect(),
        selected: Some(menu.highlight()),
        wrap_lines: false,
    })
}

pub(super) fn attachment_row(index: usize, attachment: &Attachment) -> String {
    let mut row = format!(
        "[{}] {}  {}  {}",
        index + 1,
        attachment.name,
        attachment.mime_type,
        format_file_size(attachment.size)
    );
    if let Some((width, height)) = attachment.preview.as_ref().and_then(|p| p.dimensions()) {
        row.push_str(&format!("  {width}x{height}"));
    }
    row
}

pub(super) fn build_attachment_panel_view(app: &AppState) -> Option<PanelView> {
    let items = app.composer.attachments.items();
    if items.is_empty() {
        return None;
    }
    Some(PanelView {
        title: Some(format!("Attachments: {} (Alt+1-9 to remove)", items.len())),
        lines: items
            .iter()
            .enumerate()
            .map(|(index, attachment)| attachment_row(index, attachment))
            .collect(),
        selected: None,
        wrap_lines: false,
    })
}

#[cfg(test)]
mod tests {
    use super::{attachment_row, build_attachment_panel_view, build_command_panel_view};
    use crate::app::state::RawFile;
    use crate::app::AppState;

    #[test]
    fn command_panel_tracks_menu_highlight() {
        let mut app = AppState::new("s");
        assert!(build_command_panel_view(&app).is_none());
        app.composer.input.set_from("/");
        app.composer.on_text_changed();
        let view = build_command_panel_view(&app).expect("menu");
        assert_eq!(view.lines.len(), 3);
        assert_eq!(view.selected, Some(0));
        assert!(view.lines[2].contains("/tldr"));
    }

    #[test]
    fn attachment_rows_show_position_size_and_type() {
        let mut app = AppState::new("s");
        app.composer
            .attachments
            .add(vec![RawFile::new("report.pdf", "application/pdf", vec![0; 2048])]);
        let view = build_attachment_panel_view(&app).expect("attachments");
        assert_eq!(view.lines, vec!["[1] report.pdf  application/pdf  2.0 KB"]);
        let first = &app.composer.attachments.items()[0];
        assert_eq!(attachment_row(0, first), view.lines[0]);
    }
}
