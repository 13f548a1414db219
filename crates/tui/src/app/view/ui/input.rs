use crate::app::state::InputState;
use crate::app::util::text::{char_width, text_width, truncate_to_width};
use crate::app::view::render::INPUT_PLACEHOLDER;
use crate::app::AppState;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::constants::INPUT_BG;

const PROMPT_PREFIX: &str = "> ";
const CONTINUATION_PREFIX: &str = "  ";

pub(super) struct InputLayout {
    pub(super) lines: Vec<String>,
    pub(super) cursor_x: u16,
    pub(super) cursor_y: u16,
    pub(super) placeholder: Option<&'static str>,
}

fn input_prefix(line_index: usize) -> &'static str {
    if line_index == 0 {
        PROMPT_PREFIX
    } else {
        CONTINUATION_PREFIX
    }
}

pub(super) fn compute_input_layout(width: usize, input: &InputState) -> InputLayout {
    if width == 0 {
        return InputLayout {
            lines: vec![String::new()],
            cursor_x: 0,
            cursor_y: 0,
            placeholder: None,
        };
    }

    let mut lines: Vec<String> = Vec::new();
    let mut line_index = 0_usize;
    let mut line = input_prefix(line_index).to_string();
    let mut col = text_width(&line);
    let mut line_prefix_width = col;

    let cursor = input.cursor.min(input.buffer.len());
    let mut cursor_x = col;
    let mut cursor_y = 0_usize;
    let mut cursor_set = cursor == 0;

    for (idx, &ch) in input.buffer.iter().enumerate() {
        if idx == cursor && !cursor_set {
            cursor_x = col;
            cursor_y = line_index;
            cursor_set = true;
        }

        if ch == '\n' {
            lines.push(line);
            line_index += 1;
            line = input_prefix(line_index).to_string();
            col = text_width(&line);
            line_prefix_width = col;
            continue;
        }

        let ch_width = char_width(ch);
        if col + ch_width > width && col > line_prefix_width {
            lines.push(line);
            line_index += 1;
            line = input_prefix(line_index).to_string();
            col = text_width(&line);
            line_prefix_width = col;
        }

        line.push(ch);
        col += ch_width;
    }

    if !cursor_set {
        cursor_x = col;
        cursor_y = line_index;
    }
    lines.push(line);

    let max_x = width.saturating_sub(1);
    InputLayout {
        cursor_x: cursor_x.min(max_x) as u16,
        cursor_y: cursor_y.min(lines.len().saturating_sub(1)) as u16,
        lines,
        placeholder: None,
    }
}

/// Layout of whichever field has focus: the path prompt or the composer.
pub(super) fn active_input_layout(app: &AppState, width: usize) -> InputLayout {
    if let Some(dialog) = app.prompt_dialog.as_ref() {
        return compute_input_layout(width, &dialog.input);
    }
    let mut layout = compute_input_layout(width, &app.composer.input);
    if app.composer.input.is_empty() {
        layout.placeholder = Some(INPUT_PLACEHOLDER);
    }
    layout
}

pub(super) fn render_input(f: &mut Frame, area: Rect, layout: &InputLayout) {
    if area.height == 0 || area.width == 0 {
        return;
    }

    let total = layout.lines.len();
    let height = area.height as usize;
    let cursor_y = layout.cursor_y as usize;

    let mut start = 0_usize;
    if total > height {
        start = cursor_y.saturating_add(1).saturating_sub(height);
        start = start.min(total - height);
    }
    let end = usize::min(start + height, total);

    let visible: Vec<Line> = layout.lines[start..end]
        .iter()
        .enumerate()
        .map(|(offset, line)| match layout.placeholder {
            Some(placeholder) if start + offset == 0 => {
                let room = (area.width as usize).saturating_sub(text_width(PROMPT_PREFIX));
                Line::from(vec![
                    Span::raw(line.clone()),
                    Span::styled(
                        truncate_to_width(placeholder, room),
                        Style::default()
                            .fg(Color::DarkGray)
                            .add_modifier(Modifier::ITALIC),
                    ),
                ])
            }
            _ => Line::from(line.clone()),
        })
        .collect();
    f.render_widget(
        Paragraph::new(Text::from(visible)).style(Style::default().bg(INPUT_BG)),
        area,
    );

    let cursor_visible_y = cursor_y.saturating_sub(start).min(height.saturating_sub(1));
    f.set_cursor_position((area.x + layout.cursor_x, area.y + cursor_visible_y as u16));
}
