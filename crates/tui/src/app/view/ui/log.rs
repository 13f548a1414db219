use crate::app::state::{LogKind, LogLine, LogSpan};
use crate::app::util::text::{char_width, text_width};
use crate::app::view::render::{conversation_lines, MarkdownRenderer};
use crate::app::{AppState, WrappedLogCache};
use ratatui::text::{Line, Span};

use super::style::style_for;
use super::text::pad_to_width;

fn take_spans_until_width(spans: &[LogSpan], width: usize) -> (Vec<LogSpan>, usize) {
    let mut taken = Vec::new();
    let mut consumed = 0usize;
    let mut consumed_width = 0usize;

    for span in spans {
        if consumed_width >= width {
            break;
        }
        let mut part = String::new();
        let mut part_width = 0usize;

        for ch in span.text.chars() {
            let ch_width = char_width(ch);
            if consumed_width + part_width + ch_width > width {
                break;
            }
            part.push(ch);
            part_width += ch_width;
        }

        if part.is_empty() {
            if span.text.is_empty() {
                continue;
            }
            break;
        }

        let taken_chars = part.chars().count();
        let span_chars = span.text.chars().count();
        consumed += taken_chars;
        consumed_width += part_width;

        let mut next = span.clone();
        next.text = part;
        taken.push(next);

        if taken_chars < span_chars {
            break;
        }
    }

    (taken, consumed)
}

fn trim_spans_front(spans: &[LogSpan], chars_to_trim: usize) -> Vec<LogSpan> {
    let mut remaining_trim = chars_to_trim;
    let mut out = Vec::new();

    for span in spans {
        if remaining_trim == 0 {
            out.push(span.clone());
            continue;
        }

        let span_chars = span.text.chars().count();
        if remaining_trim >= span_chars {
            remaining_trim -= span_chars;
            continue;
        }

        let mut next = span.clone();
        next.text = span.text.chars().skip(remaining_trim).collect();
        remaining_trim = 0;
        out.push(next);
    }

    out
}

fn wrap_spans(line: &LogLine, width: usize) -> Vec<LogLine> {
    let mut remaining = line.spans().to_vec();
    let mut out = Vec::new();

    while !remaining.is_empty() {
        let (chunk, consumed_chars) = take_spans_until_width(&remaining, width);
        if chunk.is_empty() {
            break;
        }
        out.push(LogLine::new_with_spans(chunk));
        remaining = trim_spans_front(&remaining, consumed_chars);
    }

    if out.is_empty() {
        out.push(LogLine::new(line.kind(), line.plain_text()));
    }
    out
}

/// Code rows get their background carried to the right edge.
fn pad_code_line(mut line: LogLine, width: usize) -> LogLine {
    if line.kind() != LogKind::AssistantCode {
        return line;
    }
    let used = text_width(&line.plain_text());
    if used >= width {
        return line;
    }
    let (kind, tone) = line.first_style();
    line.spans.push(LogSpan::new(kind, tone, " ".repeat(width - used)));
    line
}

fn wrap_log_lines(lines: &[LogLine], width: usize) -> Vec<LogLine> {
    let mut out = Vec::new();
    for line in lines {
        if line.plain_text().is_empty() {
            out.push(pad_code_line(line.clone(), width));
            continue;
        }
        if line.kind() == LogKind::User {
            let (kind, tone) = line.first_style();
            let inner = width.saturating_sub(4).max(1);
            for wrapped in wrap_spans(line, inner) {
                let padded = pad_to_width(format!(" {} ", wrapped.plain_text()), width);
                out.push(LogLine::new_with_spans(vec![LogSpan::new(kind, tone, padded)]));
            }
            continue;
        }
        out.extend(
            wrap_spans(line, width)
                .into_iter()
                .map(|wrapped| pad_code_line(wrapped, width)),
        );
    }
    out
}

/// Wrapped log for the current conversation, rebuilt only when the
/// conversation version or the width changes.
pub(super) fn cached_wrap_log_lines(app: &mut AppState, width: usize) -> &[LogLine] {
    if width == 0 {
        return &[];
    }
    let version = app.conversation.version();
    let cache_hit = matches!(
        app.wrapped_log_cache.as_ref(),
        Some(cache) if cache.width == width && cache.version == version
    );
    if !cache_hit {
        let lines = conversation_lines(&app.conversation, &MarkdownRenderer);
        let wrapped = wrap_log_lines(&lines, width);
        tracing::trace!(width, lines = wrapped.len(), "log wrap cache rebuilt");
        app.wrapped_log_cache = Some(WrappedLogCache {
            width,
            version,
            wrapped,
        });
    }
    app.wrapped_log_cache
        .as_ref()
        .map(|cache| cache.wrapped.as_slice())
        .unwrap_or(&[])
}

pub(super) fn log_lines_to_lines(lines: &[LogLine]) -> Vec<Line<'static>> {
    lines
        .iter()
        .map(|line| {
            let styled = line
                .spans()
                .iter()
                .map(|span| Span::styled(span.text.clone(), style_for(span)))
                .collect::<Vec<_>>();
            Line::from(styled)
        })
        .collect()
}
