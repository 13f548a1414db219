mod language_aliases;

use crate::app::state::{LogColor, LogKind, LogLine, LogSpan, LogTone};
use std::sync::OnceLock;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};

use language_aliases::language_aliases;

const SYNTECT_THEME: &str = "base16-ocean.dark";
const RULE_WIDTH: usize = 32;

pub(crate) const HEADING_FG: LogColor = LogColor::rgb(124, 193, 255);
pub(crate) const BOLD_FG: LogColor = LogColor::rgb(169, 218, 255);
pub(crate) const INLINE_CODE_FG: LogColor = LogColor::rgb(229, 192, 123);
const RULE_FG: LogColor = LogColor::rgb(92, 99, 112);

struct HighlightAssets {
    syntax_set: SyntaxSet,
    theme: Theme,
}

static HIGHLIGHT_ASSETS: OnceLock<Option<HighlightAssets>> = OnceLock::new();

fn highlight_assets() -> Option<&'static HighlightAssets> {
    HIGHLIGHT_ASSETS
        .get_or_init(|| {
            let syntax_set = SyntaxSet::load_defaults_newlines();
            let theme_set = ThemeSet::load_defaults();
            let theme = theme_set
                .themes
                .get(SYNTECT_THEME)
                .cloned()
                .or_else(|| theme_set.themes.get("Solarized (dark)").cloned())
                .or_else(|| theme_set.themes.values().next().cloned())?;
            Some(HighlightAssets { syntax_set, theme })
        })
        .as_ref()
}

fn push_assistant_span(spans: &mut Vec<LogSpan>, text: &str, fg: Option<LogColor>) {
    if text.is_empty() {
        return;
    }
    spans.push(LogSpan::new_with_fg(
        LogKind::Assistant,
        LogTone::Summary,
        text,
        fg,
    ));
}

/// Splits `**bold**` and `` `code` `` runs out of a line; unmatched markers stay literal.
fn parse_inline_spans(value: &str) -> Vec<LogSpan> {
    let mut spans = Vec::new();
    let mut plain_start = 0usize;
    let mut cursor = 0usize;

    while cursor < value.len() {
        let rest = &value[cursor..];
        let marked = [("`", INLINE_CODE_FG), ("**", BOLD_FG)]
            .into_iter()
            .find_map(|(marker, fg)| {
                let after = rest.strip_prefix(marker)?;
                let close = after.find(marker)?;
                (close > 0).then_some((marker.len(), close, fg))
            });

        if let Some((marker_len, close, fg)) = marked {
            push_assistant_span(&mut spans, &value[plain_start..cursor], None);
            let inner_start = cursor + marker_len;
            let inner_end = inner_start + close;
            push_assistant_span(&mut spans, &value[inner_start..inner_end], Some(fg));
            cursor = inner_end + marker_len;
            plain_start = cursor;
            continue;
        }

        cursor += rest.chars().next().map(char::len_utf8).unwrap_or(1);
    }

    push_assistant_span(&mut spans, &value[plain_start..], None);
    spans
}

fn parse_fence_language(trimmed: &str) -> Option<String> {
    let rest = trimmed.strip_prefix("```")?.trim();
    rest.split_whitespace().next().map(str::to_string)
}

fn is_plain_text_syntax(syntax: &SyntaxReference) -> bool {
    syntax.name.eq_ignore_ascii_case("Plain Text")
}

fn syntax_for_language<'a>(syntax_set: &'a SyntaxSet, language: Option<&str>) -> &'a SyntaxReference {
    let Some(token) = language.map(str::trim).filter(|value| !value.is_empty()) else {
        return syntax_set.find_syntax_plain_text();
    };

    let aliases = language_aliases(token);
    let by_token = aliases
        .iter()
        .filter_map(|alias| syntax_set.find_syntax_by_token(alias));
    let by_extension = aliases
        .iter()
        .filter_map(|alias| syntax_set.find_syntax_by_extension(alias));
    let by_name = aliases.iter().filter_map(|alias| {
        syntax_set
            .syntaxes()
            .iter()
            .find(|syntax| syntax.name.eq_ignore_ascii_case(alias))
    });
    by_token
        .chain(by_extension)
        .chain(by_name)
        .find(|syntax| !is_plain_text_syntax(syntax))
        .unwrap_or_else(|| syntax_set.find_syntax_plain_text())
}

fn render_plain_code_lines(lines: &[String]) -> Vec<LogLine> {
    lines
        .iter()
        .map(|line| LogLine::new(LogKind::AssistantCode, line.clone()))
        .collect()
}

fn render_highlighted_code_lines(lines: &[String], language: Option<&str>) -> Option<Vec<LogLine>> {
    let assets = highlight_assets()?;
    let syntax = syntax_for_language(&assets.syntax_set, language);
    let mut highlighter = HighlightLines::new(syntax, &assets.theme);

    let mut rendered = Vec::with_capacity(lines.len());
    for line in lines {
        if line.is_empty() {
            rendered.push(LogLine::new(LogKind::AssistantCode, ""));
            continue;
        }

        let line_with_newline = format!("{line}\n");
        let ranges = highlighter
            .highlight_line(&line_with_newline, &assets.syntax_set)
            .ok()?;
        let spans = ranges
            .into_iter()
            .filter_map(|(style, text)| {
                let text = text.strip_suffix('\n').unwrap_or(text);
                if text.is_empty() {
                    return None;
                }
                Some(LogSpan::new_with_fg(
                    LogKind::AssistantCode,
                    LogTone::Summary,
                    text,
                    Some(LogColor::rgb(
                        style.foreground.r,
                        style.foreground.g,
                        style.foreground.b,
                    )),
                ))
            })
            .collect::<Vec<_>>();
        if spans.is_empty() {
            rendered.push(LogLine::new(LogKind::AssistantCode, line.clone()));
        } else {
            rendered.push(LogLine::new_with_spans(spans));
        }
    }

    Some(rendered)
}

fn render_code_block_lines(lines: &[String], language: Option<&str>) -> Vec<LogLine> {
    render_highlighted_code_lines(lines, language).unwrap_or_else(|| render_plain_code_lines(lines))
}

fn heading_text(trimmed: &str) -> Option<&str> {
    let level = trimmed.chars().take_while(|ch| *ch == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &trimmed[level..];
    (rest.is_empty() || rest.starts_with(' ')).then(|| rest.trim())
}

fn is_rule(trimmed: &str) -> bool {
    let compact: String = trimmed.chars().filter(|ch| !ch.is_whitespace()).collect();
    compact.len() >= 3
        && ["-", "*", "_"]
            .iter()
            .any(|marker| compact.chars().all(|ch| ch.to_string() == *marker))
}

fn render_prose_line(raw: &str) -> LogLine {
    let trimmed = raw.trim_start();
    let indent = &raw[..raw.len() - trimmed.len()];

    if let Some(text) = heading_text(trimmed) {
        let mut spans = parse_inline_spans(text);
        for span in &mut spans {
            span.fg.get_or_insert(HEADING_FG);
        }
        return LogLine::new_with_spans(spans);
    }
    if is_rule(trimmed) {
        return LogLine::new_with_spans(vec![LogSpan::new_with_fg(
            LogKind::Assistant,
            LogTone::Detail,
            "─".repeat(RULE_WIDTH),
            Some(RULE_FG),
        )]);
    }

    let line = if let Some(rest) = trimmed.strip_prefix("> ") {
        format!("{indent}│ {rest}")
    } else if let Some(rest) = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
        .or_else(|| trimmed.strip_prefix("+ "))
    {
        format!("{indent}• {rest}")
    } else {
        raw.to_string()
    };
    LogLine::new_with_spans(parse_inline_spans(&line))
}

/// Renders assistant markdown into styled log lines. Fenced code blocks are
/// syntax highlighted; an unterminated fence runs to the end of the text.
pub fn render_markdown_lines(value: &str) -> Vec<LogLine> {
    let mut out = Vec::new();
    let mut code_block: Option<(Option<String>, Vec<String>)> = None;

    for raw in value.split('\n') {
        let raw = raw.trim_end_matches('\r');
        let trimmed = raw.trim_start();
        if trimmed.starts_with("```") {
            match code_block.take() {
                Some((language, lines)) => {
                    out.extend(render_code_block_lines(&lines, language.as_deref()));
                }
                None => code_block = Some((parse_fence_language(trimmed), Vec::new())),
            }
            continue;
        }

        if let Some((_, lines)) = code_block.as_mut() {
            lines.push(raw.to_string());
            continue;
        }

        out.push(render_prose_line(raw));
    }

    if let Some((language, lines)) = code_block {
        out.extend(render_code_block_lines(&lines, language.as_deref()));
    }

    if out.is_empty() {
        out.push(LogLine::new(LogKind::Assistant, String::new()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{
        highlight_assets, render_markdown_lines, syntax_for_language, BOLD_FG, HEADING_FG,
        INLINE_CODE_FG,
    };
    use crate::app::state::{LogColor, LogKind};

    fn distinct_colors(lines: &[crate::app::state::LogLine]) -> Vec<LogColor> {
        let mut colors: Vec<LogColor> = Vec::new();
        for span in lines.iter().flat_map(|line| line.spans()) {
            if let Some(color) = span.fg {
                if !colors.contains(&color) {
                    colors.push(color);
                }
            }
        }
        colors
    }

    #[test]
    fn fenced_code_block_uses_assistant_code_lines() {
        let lines = render_markdown_lines("```\nlet x = 1;\n```");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].kind(), LogKind::AssistantCode);
    }

    #[test]
    fn python_block_gets_token_colors() {
        let lines = render_markdown_lines(
            "Here is the fix:\n```python\ndef total(items):\n    return sum(items)\n```",
        );
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].kind(), LogKind::Assistant);
        assert_eq!(lines[1].kind(), LogKind::AssistantCode);
        assert!(distinct_colors(&lines[1..]).len() >= 2);
    }

    #[test]
    fn unterminated_fence_still_renders_code() {
        let lines = render_markdown_lines("```rust\nfn main() {}");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].kind(), LogKind::AssistantCode);
        assert_eq!(lines[0].plain_text(), "fn main() {}");
    }

    #[test]
    fn py_alias_resolves_non_plain_syntax() {
        let assets = highlight_assets().expect("highlight assets");
        let syntax = syntax_for_language(&assets.syntax_set, Some("py"));
        assert_ne!(syntax.name, "Plain Text");
        let unknown = syntax_for_language(&assets.syntax_set, Some("no-such-lang"));
        assert_eq!(unknown.name, "Plain Text");
    }

    #[test]
    fn inline_bold_and_code_strip_markers() {
        let lines = render_markdown_lines("run **now** with `pytest -q`");
        let spans = lines[0].spans();
        assert_eq!(lines[0].plain_text(), "run now with pytest -q");
        assert_eq!(spans.len(), 4);
        assert_eq!(spans[1].fg, Some(BOLD_FG));
        assert_eq!(spans[3].text, "pytest -q");
        assert_eq!(spans[3].fg, Some(INLINE_CODE_FG));
    }

    #[test]
    fn unmatched_marker_is_literal() {
        let lines = render_markdown_lines("2 ** 3 and a stray `tick");
        assert_eq!(lines[0].plain_text(), "2 ** 3 and a stray `tick");
        assert!(lines[0].spans().iter().all(|span| span.fg.is_none()));
    }

    #[test]
    fn heading_bullets_and_quotes_are_restyled() {
        let lines = render_markdown_lines("## Summary\n- first\n  * nested\n> quoted\n#hashtag");
        assert_eq!(lines[0].plain_text(), "Summary");
        assert_eq!(lines[0].spans()[0].fg, Some(HEADING_FG));
        assert_eq!(lines[1].plain_text(), "• first");
        assert_eq!(lines[2].plain_text(), "  • nested");
        assert_eq!(lines[3].plain_text(), "│ quoted");
        assert_eq!(lines[4].plain_text(), "#hashtag");
    }

    #[test]
    fn horizontal_rule_becomes_a_line() {
        let lines = render_markdown_lines("above\n---\nbelow");
        assert!(lines[1].plain_text().starts_with("───"));
    }

    #[test]
    fn empty_text_yields_one_blank_line() {
        let lines = render_markdown_lines("");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].plain_text(), "");
    }
}
