use crate::app::state::RawFile;
use std::fs;
use std::path::{Path, PathBuf};

const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} is not a file")]
    NotAFile(String),
}

fn expand_home(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}

pub fn load_file(path: &Path) -> Result<RawFile, FileError> {
    let display = path.display().to_string();
    let metadata = fs::metadata(path).map_err(|source| FileError::Read {
        path: display.clone(),
        source,
    })?;
    if !metadata.is_file() {
        return Err(FileError::NotAFile(display));
    }
    let content = fs::read(path).map_err(|source| FileError::Read {
        path: display.clone(),
        source,
    })?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or(display);
    let mime_type = mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(FALLBACK_MIME);
    Ok(RawFile::new(name, mime_type, content))
}

/// Splits a shell-quoted path list, expanding a leading `~/`.
pub fn split_paths(text: &str) -> Result<Vec<PathBuf>, shell_words::ParseError> {
    Ok(shell_words::split(text.trim())?
        .iter()
        .map(|raw| expand_home(raw))
        .collect())
}

/// Paths from a paste that looks like a file drop: every word names an existing file.
pub fn parse_dropped_paths(text: &str) -> Option<Vec<PathBuf>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let joined = trimmed
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let raw: Vec<String> = shell_words::split(&joined)
        .ok()?
        .into_iter()
        .map(|word| word.strip_prefix("file://").map(str::to_string).unwrap_or(word))
        .collect();
    if raw.is_empty() {
        return None;
    }
    let paths: Vec<PathBuf> = raw.iter().map(|word| expand_home(word)).collect();
    paths.iter().all(|path| path.is_file()).then_some(paths)
}

#[cfg(test)]
mod tests {
    use super::{load_file, parse_dropped_paths, split_paths, FileError};
    use std::fs;

    #[test]
    fn load_file_guesses_mime_from_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let csv = dir.path().join("sales.csv");
        fs::write(&csv, "a,b\n1,2\n").expect("write");
        let blob = dir.path().join("blob.unknownext");
        fs::write(&blob, [0u8, 1, 2]).expect("write");

        let file = load_file(&csv).expect("csv");
        assert_eq!(file.name, "sales.csv");
        assert_eq!(file.mime_type, "text/csv");
        assert_eq!(file.size, 8);

        let file = load_file(&blob).expect("blob");
        assert_eq!(file.mime_type, "application/octet-stream");
    }

    #[test]
    fn load_file_rejects_directories_and_missing_paths() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(matches!(load_file(dir.path()), Err(FileError::NotAFile(_))));
        assert!(matches!(
            load_file(&dir.path().join("missing.txt")),
            Err(FileError::Read { .. })
        ));
    }

    #[test]
    fn quoted_paths_are_split() {
        let paths = split_paths("'/tmp/a b.txt' /tmp/c.pdf").expect("split");
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].to_string_lossy(), "/tmp/a b.txt");
        assert!(split_paths("'unterminated").is_err());
    }

    #[test]
    fn paste_is_a_drop_only_when_every_path_exists() {
        let dir = tempfile::tempdir().expect("tempdir");
        let first = dir.path().join("one file.txt");
        let second = dir.path().join("two.png");
        fs::write(&first, "x").expect("write");
        fs::write(&second, "y").expect("write");

        let pasted = format!(
            "{} {}",
            shell_words::quote(&first.to_string_lossy()),
            second.display()
        );
        let paths = parse_dropped_paths(&pasted).expect("drop");
        assert_eq!(paths, vec![first.clone(), second.clone()]);

        let uri = format!("file://{}", second.display());
        assert_eq!(parse_dropped_paths(&uri), Some(vec![second.clone()]));

        let mixed = format!("{} nope.txt", second.display());
        assert!(parse_dropped_paths(&mixed).is_none());
        assert!(parse_dropped_paths("just some prose").is_none());
        assert!(parse_dropped_paths("   ").is_none());
    }
}
