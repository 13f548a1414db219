#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommandSpec {
    pub token: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        token: "/code_analysis",
        label: "Code Analysis",
        description: "Analyze code for bugs and complexity",
        icon: "</>",
    },
    CommandSpec {
        token: "/summarize",
        label: "Summarize",
        description: "Create a structured summary",
        icon: "≡",
    },
    CommandSpec {
        token: "/tldr",
        label: "TL;DR",
        description: "Quick summary in bullet points",
        icon: "✦",
    },
];

/// Catalog entries whose token starts with `input`, ignoring case, in catalog order.
///
/// Input that does not begin with `/` never matches.
pub fn match_commands(input: &str) -> Vec<&'static CommandSpec> {
    if !input.starts_with('/') {
        return Vec::new();
    }
    let needle = input.to_lowercase();
    COMMANDS
        .iter()
        .filter(|command| command.token.to_lowercase().starts_with(&needle))
        .collect()
}

pub fn command_row(command: &CommandSpec) -> String {
    format!("{:<3} {:<16} {}", command.icon, command.token, command.description)
}
