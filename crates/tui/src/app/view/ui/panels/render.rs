use crate::app::util::text::{truncate_to_width, wrap_line};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

use super::super::constants::{INPUT_BG, INPUT_PADDING_X, INPUT_PADDING_Y};
use super::super::input::{render_input, InputLayout};
use super::PanelView;

const HIGHLIGHT_FG: Color = Color::Rgb(137, 180, 250);

pub(in crate::app::view::ui) fn build_panel_render(
    panel: &PanelView,
    max_lines: u16,
    max_width: usize,
) -> Vec<Line<'static>> {
    if max_lines == 0 {
        return Vec::new();
    }
    let mut out = Vec::new();
    let mut remaining = max_lines;
    if let Some(title) = panel.title.as_ref() {
        out.push(Line::from(Span::styled(
            truncate_to_width(title, max_width),
            Style::default().add_modifier(Modifier::DIM),
        )));
        remaining = remaining.saturating_sub(1);
    }
    if remaining == 0 || panel.lines.is_empty() {
        return out;
    }

    let content_width = max_width.saturating_sub(2).max(1);
    let mut expanded: Vec<(usize, String)> = Vec::new();
    for (line_index, line) in panel.lines.iter().enumerate() {
        if line.is_empty() {
            expanded.push((line_index, String::new()));
        } else if panel.wrap_lines {
            expanded.extend(
                wrap_line(line, content_width)
                    .into_iter()
                    .map(|wrapped| (line_index, wrapped)),
            );
        } else {
            expanded.push((line_index, truncate_to_width(line, content_width)));
        }
    }

    let total = expanded.len();
    let visible = usize::min(total, remaining as usize);
    let selected = panel
        .selected
        .and_then(|selected_line| expanded.iter().position(|(idx, _)| *idx == selected_line))
        .unwrap_or(0);
    let mut start = 0_usize;
    if total > visible && selected >= visible {
        start = (selected + 1 - visible).min(total - visible);
    }

    let mut prev_line_index: Option<usize> = None;
    for (line_index, line) in &expanded[start..start + visible] {
        let is_selected = panel.selected == Some(*line_index);
        let is_first_visual_line = prev_line_index != Some(*line_index);
        let style = if is_selected {
            Style::default()
                .fg(HIGHLIGHT_FG)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let marker = if is_selected && is_first_visual_line {
            "> "
        } else {
            "  "
        };
        out.push(Line::from(Span::styled(format!("{marker}{line}"), style)));
        prev_line_index = Some(*line_index);
    }
    out
}

pub(in crate::app::view::ui) fn render_input_panel(
    f: &mut Frame,
    area: Rect,
    layout: &InputLayout,
    panel_lines: &[Line<'static>],
    panel_gap: u16,
) {
    if area.height == 0 || area.width == 0 {
        return;
    }

    f.render_widget(Block::default().style(Style::default().bg(INPUT_BG)), area);

    let inner = Rect {
        x: area.x + INPUT_PADDING_X,
        y: area.y + INPUT_PADDING_Y,
        width: area.width.saturating_sub(INPUT_PADDING_X.saturating_mul(2)),
        height: area
            .height
            .saturating_sub(INPUT_PADDING_Y.saturating_mul(2)),
    };
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let panel_height = (panel_lines.len() as u16).min(inner.height);
    if panel_height > 0 {
        let panel_area = Rect {
            height: panel_height,
            ..inner
        };
        f.render_widget(
            Paragraph::new(Text::from(panel_lines.to_vec())).style(Style::default().bg(INPUT_BG)),
            panel_area,
        );
    }

    let gap_height = panel_gap.min(inner.height.saturating_sub(panel_height));
    if gap_height > 0 {
        let gap_area = Rect {
            y: inner.y + panel_height,
            height: gap_height,
            ..inner
        };
        let line = Line::from(Span::styled(
            "─".repeat(inner.width as usize),
            Style::default().fg(Color::DarkGray).bg(INPUT_BG),
        ));
        f.render_widget(Paragraph::new(Text::from(vec![line])), gap_area);
    }

    let input_area = Rect {
        y: inner.y + panel_height + gap_height,
        height: inner.height.saturating_sub(panel_height + gap_height),
        ..inner
    };
    render_input(f, input_area, layout);
}
