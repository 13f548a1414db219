use crate::app::state::{LogKind, LogSpan, LogTone};
use ratatui::style::{Color, Modifier, Style};

use super::constants::INPUT_BG;

const CODE_BLOCK_BG: Color = Color::Rgb(24, 30, 36);

pub(super) fn style_for(span: &LogSpan) -> Style {
    let mut style = style_for_kind(span.kind, span.tone);
    if let Some(fg) = span.fg {
        style = style.fg(Color::Rgb(fg.r, fg.g, fg.b));
    }
    style
}

fn style_for_kind(kind: LogKind, tone: LogTone) -> Style {
    let (summary, detail) = match kind {
        LogKind::System => (
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::DIM),
        ),
        LogKind::User => (
            Style::default().fg(Color::White).bg(INPUT_BG),
            Style::default().fg(Color::White).bg(INPUT_BG),
        ),
        LogKind::Assistant => (
            Style::default().fg(Color::White),
            Style::default().fg(Color::Gray),
        ),
        LogKind::AssistantCode => (
            Style::default().fg(Color::LightGreen).bg(CODE_BLOCK_BG),
            Style::default()
                .fg(Color::LightGreen)
                .bg(CODE_BLOCK_BG)
                .add_modifier(Modifier::DIM),
        ),
        LogKind::Status => (
            Style::default().fg(Color::Blue),
            Style::default().fg(Color::Blue).add_modifier(Modifier::DIM),
        ),
        LogKind::Space => (
            Style::default().fg(Color::Black),
            Style::default().fg(Color::Black),
        ),
        LogKind::Error => (
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD)
                .add_modifier(Modifier::DIM),
        ),
    };

    match tone {
        LogTone::Summary => summary,
        LogTone::Detail => detail,
    }
}
