use crate::app::state::{command_row, Conversation, LogKind, LogLine, LogTone, Role, COMMANDS};

use super::markdown::render_markdown_lines;

pub const WELCOME_TITLE: &str = "Welcome to Datasmith AI";
pub const WELCOME_SUBTITLE: &str = "Chat, attach files, or use voice input";
pub const INPUT_PLACEHOLDER: &str = "Type a message, / for commands, or attach files...";

/// Turns assistant text into styled lines.
pub trait Renderer {
    fn render(&self, text: &str) -> Vec<LogLine>;
}

pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, text: &str) -> Vec<LogLine> {
        render_markdown_lines(text)
    }
}

fn welcome_lines() -> Vec<LogLine> {
    let mut lines = vec![
        LogLine::new(LogKind::Space, ""),
        LogLine::new(LogKind::System, WELCOME_TITLE),
        LogLine::new_with_tone(LogKind::System, LogTone::Detail, WELCOME_SUBTITLE),
        LogLine::new(LogKind::Space, ""),
        LogLine::new_with_tone(LogKind::Status, LogTone::Detail, "Commands"),
    ];
    lines.extend(
        COMMANDS
            .iter()
            .map(|command| LogLine::new_with_tone(LogKind::Status, LogTone::Detail, command_row(command))),
    );
    lines
}

fn user_lines(content: &str) -> Vec<LogLine> {
    content
        .split('\n')
        .map(|line| LogLine::new(LogKind::User, line))
        .collect()
}

fn ai_lines(content: &str, renderer: &dyn Renderer) -> Vec<LogLine> {
    if content.starts_with("Error") {
        return content
            .split('\n')
            .map(|line| LogLine::new(LogKind::Error, line))
            .collect();
    }
    renderer.render(content)
}

/// Log lines for the whole conversation, or the welcome view when it is empty.
pub fn conversation_lines(conversation: &Conversation, renderer: &dyn Renderer) -> Vec<LogLine> {
    if conversation.is_empty() {
        return welcome_lines();
    }
    let mut out = Vec::new();
    for message in conversation.messages() {
        out.push(LogLine::new(LogKind::Space, ""));
        match message.role {
            Role::User => out.extend(user_lines(&message.content)),
            Role::Ai => out.extend(ai_lines(&message.content, renderer)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{conversation_lines, MarkdownRenderer, Renderer, WELCOME_TITLE};
    use crate::app::state::{Conversation, LogKind, LogLine, Message};

    struct Verbatim;

    impl Renderer for Verbatim {
        fn render(&self, text: &str) -> Vec<LogLine> {
            vec![LogLine::new(LogKind::Assistant, text)]
        }
    }

    #[test]
    fn empty_conversation_shows_welcome_and_catalog() {
        let lines = conversation_lines(&Conversation::default(), &Verbatim);
        let text: Vec<String> = lines.iter().map(LogLine::plain_text).collect();
        assert!(text.iter().any(|line| line == WELCOME_TITLE));
        for token in ["/code_analysis", "/summarize", "/tldr"] {
            assert!(text.iter().any(|line| line.contains(token)));
        }
    }

    #[test]
    fn messages_render_by_role_with_spacing() {
        let mut conversation = Conversation::default();
        conversation.push(Message::user("hi\nthere"));
        conversation.push(Message::ai("hello"));
        let kinds: Vec<LogKind> = conversation_lines(&conversation, &Verbatim)
            .iter()
            .map(LogLine::kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                LogKind::Space,
                LogKind::User,
                LogKind::User,
                LogKind::Space,
                LogKind::Assistant
            ]
        );
    }

    #[test]
    fn error_replies_bypass_markdown() {
        let mut conversation = Conversation::default();
        conversation.push(Message::ai("Error: HTTP Error 500"));
        let lines = conversation_lines(&conversation, &MarkdownRenderer);
        assert_eq!(lines[1].kind(), LogKind::Error);
        assert_eq!(lines[1].plain_text(), "Error: HTTP Error 500");
    }

    #[test]
    fn markdown_renderer_highlights_code() {
        let mut conversation = Conversation::default();
        conversation.push(Message::ai("```python\nprint('x')\n```"));
        let lines = conversation_lines(&conversation, &MarkdownRenderer);
        assert_eq!(lines[1].kind(), LogKind::AssistantCode);
    }
}
