use crate::app::util::text::sanitize_for_tui;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogKind {
    System,
    User,
    Assistant,
    AssistantCode,
    Status,
    Space,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogTone {
    Summary,
    Detail,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl LogColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Clone, Debug)]
pub struct LogSpan {
    pub kind: LogKind,
    pub tone: LogTone,
    pub text: String,
    pub fg: Option<LogColor>,
}

impl LogSpan {
    pub fn new(kind: LogKind, tone: LogTone, text: impl Into<String>) -> Self {
        Self::new_with_fg(kind, tone, text, None)
    }

    pub fn new_with_fg(
        kind: LogKind,
        tone: LogTone,
        text: impl Into<String>,
        fg: Option<LogColor>,
    ) -> Self {
        let raw = text.into();
        Self {
            kind,
            tone,
            text: sanitize_for_tui(&raw),
            fg,
        }
    }
}

/// One rendered row of the conversation log, made of styled spans.
#[derive(Clone, Debug)]
pub struct LogLine {
    pub spans: Vec<LogSpan>,
}

impl LogLine {
    pub fn new(kind: LogKind, text: impl Into<String>) -> Self {
        Self::new_with_tone(kind, LogTone::Summary, text)
    }

    pub fn new_with_tone(kind: LogKind, tone: LogTone, text: impl Into<String>) -> Self {
        Self {
            spans: vec![LogSpan::new(kind, tone, text)],
        }
    }

    pub fn new_with_spans(spans: Vec<LogSpan>) -> Self {
        Self { spans }
    }

    pub fn spans(&self) -> &[LogSpan] {
        &self.spans
    }

    pub fn first_style(&self) -> (LogKind, LogTone) {
        self.spans
            .first()
            .map(|span| (span.kind, span.tone))
            .unwrap_or((LogKind::System, LogTone::Summary))
    }

    pub fn kind(&self) -> LogKind {
        self.first_style().0
    }

    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }
}
