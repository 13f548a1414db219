pub(crate) fn language_aliases(token: &str) -> Vec<String> {
    let lower = token.trim().to_ascii_lowercase();
    if lower.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::new();
    for alias in aliases_for(&lower).iter().copied().chain([lower.as_str()]) {
        if !out.iter().any(|current: &String| current == alias) {
            out.push(alias.to_string());
        }
    }
    out
}

fn aliases_for(token: &str) -> &'static [&'static str] {
    match token {
        "py" | "python" | "python3" => &["python", "py"],
        "ipynb" | "jupyter" => &["python", "py"],
        "ts" | "typescript" => &["typescript", "ts", "javascript", "js"],
        "tsx" => &["tsx", "typescript", "ts", "jsx", "javascript", "js"],
        "js" | "javascript" | "mjs" | "cjs" => &["javascript", "js"],
        "jsx" => &["jsx", "javascript", "js"],
        "html" | "htm" => &["html", "htm"],
        "css" | "scss" => &["css"],
        "json" | "jsonc" => &["json"],
        "yaml" | "yml" => &["yaml", "yml"],
        "toml" => &["toml"],
        "sh" | "shell" | "bash" | "zsh" | "console" => &["bash", "sh"],
        "c" | "h" => &["c"],
        "cpp" | "cxx" | "cc" | "hpp" => &["cpp", "c++", "cxx", "cc"],
        "cs" | "csharp" => &["c#", "csharp", "cs"],
        "go" | "golang" => &["go"],
        "rs" | "rust" => &["rust", "rs"],
        "java" => &["java"],
        "kt" | "kotlin" => &["kotlin", "kt"],
        "rb" | "ruby" => &["ruby", "rb"],
        "php" => &["php"],
        "sql" | "postgres" | "postgresql" | "sqlite" => &["sql"],
        "r" => &["r"],
        "md" | "markdown" => &["markdown", "md"],
        "text" | "txt" | "plain" | "plaintext" => &["txt", "text"],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::language_aliases;

    #[test]
    fn python_variants_share_a_syntax() {
        assert_eq!(language_aliases("python3"), vec!["python", "py", "python3"]);
        assert_eq!(language_aliases("PY"), vec!["python", "py"]);
    }

    #[test]
    fn shell_family_maps_to_bash() {
        let aliases = language_aliases("console");
        assert!(aliases.contains(&"bash".to_string()));
    }

    #[test]
    fn unknown_token_is_kept() {
        assert_eq!(language_aliases("mycustomlang"), vec!["mycustomlang".to_string()]);
        assert!(language_aliases("  ").is_empty());
    }
}
