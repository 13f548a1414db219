mod constants;
mod input;
mod log;
mod panels;
mod status;
mod style;
mod text;

use crate::app::AppState;
use ratatui::layout::Rect;
use ratatui::text::{Line, Text};
use ratatui::widgets::{Clear, Paragraph};
use ratatui::Frame;

use self::constants::{
    INPUT_PADDING_X, INPUT_PADDING_Y, MAX_INPUT_HEIGHT, PANEL_GAP, PANEL_MAX_LINES,
};
use self::input::active_input_layout;
use self::log::{cached_wrap_log_lines, log_lines_to_lines};
use self::panels::{build_panel_render, build_panel_view, render_input_panel};
use self::status::{build_run_line, build_status_line};

const RUN_HEIGHT: u16 = 1;
const STATUS_HEIGHT: u16 = 1;

pub fn draw_ui(f: &mut Frame, app: &mut AppState) {
    let size = f.area();
    if size.width == 0 || size.height == 0 {
        return;
    }
    f.render_widget(Clear, size);

    let footer_height = RUN_HEIGHT + STATUS_HEIGHT;
    let log_width = size.width as usize;
    let input_width =
        (size.width.saturating_sub(INPUT_PADDING_X.saturating_mul(2)) as usize).max(1);
    let input_layout = active_input_layout(app, input_width);
    let max_input_height = size
        .height
        .saturating_sub(footer_height + INPUT_PADDING_Y.saturating_mul(2))
        .clamp(1, MAX_INPUT_HEIGHT);
    let input_height = (input_layout.lines.len() as u16).clamp(1, max_input_height);
    let base_input_total = input_height + INPUT_PADDING_Y.saturating_mul(2);
    let max_panel_height = size.height.saturating_sub(footer_height);
    if max_panel_height < base_input_total {
        return;
    }

    let available_for_panel = max_panel_height
        .saturating_sub(base_input_total)
        .min(PANEL_MAX_LINES + PANEL_GAP);
    let mut panel_gap_height = 0_u16;
    let mut panel_lines: Vec<Line<'static>> = Vec::new();
    if let Some(view) = build_panel_view(app) {
        let max_lines = if available_for_panel > PANEL_GAP {
            panel_gap_height = PANEL_GAP;
            available_for_panel - PANEL_GAP
        } else {
            available_for_panel
        };
        panel_lines = build_panel_render(&view, max_lines, input_width);
        if panel_lines.is_empty() {
            panel_gap_height = 0;
        }
    }
    let input_total_height = base_input_total + panel_lines.len() as u16 + panel_gap_height;

    // The log takes what the composer and footer leave; with a short
    // conversation the composer sits right under the last line.
    let max_log_height = size.height.saturating_sub(input_total_height + footer_height);
    let wrapped_total = cached_wrap_log_lines(app, log_width).len();
    let log_height = (wrapped_total as u16).min(max_log_height);
    app.last_log_viewport_height = max_log_height as usize;

    let max_scroll = wrapped_total.saturating_sub(log_height as usize);
    app.scroll_from_bottom = app.scroll_from_bottom.min(max_scroll);
    let visible_end = wrapped_total.saturating_sub(app.scroll_from_bottom);
    let visible_start = visible_end.saturating_sub(log_height as usize);

    let log_area = Rect {
        height: log_height,
        ..size
    };
    if log_area.height > 0 {
        let wrapped = cached_wrap_log_lines(app, log_width);
        let visible = log_lines_to_lines(&wrapped[visible_start..visible_end]);
        f.render_widget(Paragraph::new(Text::from(visible)), log_area);
    }

    let run_area = Rect {
        y: size.y + log_height,
        height: RUN_HEIGHT,
        ..size
    };
    f.render_widget(Paragraph::new(build_run_line(app)), run_area);

    let input_area = Rect {
        y: run_area.y + RUN_HEIGHT,
        height: input_total_height,
        ..size
    };
    render_input_panel(f, input_area, &input_layout, &panel_lines, panel_gap_height);

    let status_area = Rect {
        y: input_area.y + input_total_height,
        height: STATUS_HEIGHT,
        ..size
    };
    if status_area.bottom() <= size.bottom() {
        f.render_widget(Paragraph::new(build_status_line(app)), status_area);
    }
}
