use crate::app::runtime::SessionStats;
use crate::app::{AppState, PlaybackPhase, StatusLineMode};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use super::style::style_for;

const SEPARATOR: &str = "  •  ";

fn push_segment(spans: &mut Vec<Span<'static>>, text: String, style: Style) {
    if !spans.is_empty() {
        spans.push(Span::styled(
            SEPARATOR,
            Style::default().add_modifier(Modifier::DIM),
        ));
    }
    spans.push(Span::styled(text, style));
}

/// Activity line between the log and the composer: request progress, voice
/// capture, playback, and the latest status note.
pub(super) fn build_run_line(app: &AppState) -> Line<'static> {
    let mut spans = Vec::new();
    let busy = Style::default().fg(Color::Yellow);
    if app.is_submitting() {
        push_segment(&mut spans, format!("{} Thinking...", app.spinner_frame()), busy);
    }
    if app.reset_pending {
        push_segment(
            &mut spans,
            format!("{} Resetting session...", app.spinner_frame()),
            busy,
        );
    }
    if app.voice.recording {
        let text = if app.voice.interim.is_empty() {
            "● Listening...".to_string()
        } else {
            format!("● {}", app.voice.interim)
        };
        push_segment(
            &mut spans,
            text,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        );
    }
    match app.playback.phase {
        PlaybackPhase::Idle => {}
        PlaybackPhase::Loading => push_segment(
            &mut spans,
            format!("{} Preparing audio...", app.spinner_frame()),
            busy,
        ),
        PlaybackPhase::Playing => push_segment(
            &mut spans,
            "♪ Reading aloud (Ctrl+R to stop)".to_string(),
            Style::default().fg(Color::Green),
        ),
    }
    if let Some(note) = app.status_note.as_ref() {
        for span in note.spans() {
            push_segment(&mut spans, span.text.clone(), style_for(span));
        }
    }
    Line::from(spans)
}

fn stats_segment(stats: &SessionStats) -> String {
    format!(
        "tokens: {} in / {} out  {:.1}s  {:.1} tok/s  ${:.4}",
        stats.input_tokens,
        stats.output_tokens,
        stats.total_time_sec,
        stats.tokens_per_sec,
        stats.estimated_cost_usd
    )
}

fn help_segments(app: &AppState) -> Vec<String> {
    let mut segments = vec![
        "Enter send".to_string(),
        "Ctrl+J/Shift+Enter newline".to_string(),
        "/ commands".to_string(),
        "Ctrl+O attach".to_string(),
        "Alt+V paste image".to_string(),
        "Alt+1-9 remove".to_string(),
    ];
    if app.voice_supported {
        segments.push("Ctrl+T voice".to_string());
    }
    if app.playback_supported {
        segments.push("Ctrl+R read aloud".to_string());
    }
    segments.push("Ctrl+L reset".to_string());
    segments.push("Ctrl+C quit".to_string());
    segments.push("Alt+H info".to_string());
    segments
}

pub(super) fn build_status_line(app: &AppState) -> Line<'static> {
    let segments = match app.status_line_mode {
        StatusLineMode::Info => {
            let mut segments = vec![format!("session: {}", app.session_id)];
            if let Some(stats) = app.conversation.stats() {
                segments.push(stats_segment(stats));
            }
            if app.conversation.requires_clarification() {
                segments.push("clarification requested".to_string());
            }
            let attached = app.composer.attachments.len();
            if attached > 0 {
                segments.push(format!("files: {attached}"));
            }
            segments.push("Alt+H help".to_string());
            segments
        }
        StatusLineMode::Help => help_segments(app),
    };
    Line::from(Span::styled(
        segments.join(SEPARATOR),
        Style::default().add_modifier(Modifier::DIM),
    ))
}

#[cfg(test)]
mod tests {
    use super::{build_run_line, build_status_line};
    use crate::app::runtime::SessionStats;
    use crate::app::state::LogKind;
    use crate::app::{AppState, PlaybackPhase};

    #[test]
    fn help_hides_unsupported_speech_controls() {
        let mut app = AppState::new("s");
        app.toggle_status_line_mode();
        let text = build_status_line(&app).to_string();
        assert!(!text.contains("Ctrl+T"));
        assert!(!text.contains("Ctrl+R"));

        app.voice_supported = true;
        app.playback_supported = true;
        let text = build_status_line(&app).to_string();
        assert!(text.contains("Ctrl+T voice"));
        assert!(text.contains("Ctrl+R read aloud"));
    }

    #[test]
    fn info_shows_session_stats_and_clarification() {
        let mut app = AppState::new("default-session");
        app.conversation.record_response_meta(
            Some(SessionStats {
                input_tokens: 12,
                output_tokens: 30,
                total_tokens: 42,
                tokens_per_sec: 15.0,
                total_time_sec: 2.0,
                estimated_cost_usd: 0.0012,
            }),
            true,
        );
        let text = build_status_line(&app).to_string();
        assert!(text.contains("session: default-session"));
        assert!(text.contains("12 in / 30 out"));
        assert!(text.contains("clarification requested"));
    }

    #[test]
    fn run_line_shows_activity_and_notes() {
        let mut app = AppState::new("s");
        assert_eq!(build_run_line(&app).to_string(), "");

        app.composer.submitting = true;
        app.voice.recording = true;
        app.voice.interim = "hello wor".to_string();
        app.playback.phase = PlaybackPhase::Playing;
        app.set_status(LogKind::Error, "Reset failed");
        let text = build_run_line(&app).to_string();
        assert!(text.contains("Thinking..."));
        assert!(text.contains("● hello wor"));
        assert!(text.contains("Reading aloud"));
        assert!(text.ends_with("Reset failed"));
    }
}
