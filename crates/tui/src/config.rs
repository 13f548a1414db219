use crate::app::runtime::DEFAULT_BASE_URL;
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_SESSION_ID: &str = "default-session";

/// Terminal chat client for the Datasmith analysis service.
#[derive(Debug, Parser)]
#[command(name = "datasmith", version, about)]
pub struct Config {
    /// Base URL of the analysis API.
    #[arg(long, env = "DATASMITH_API_BASE", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Session id sent with every request; constant for the process lifetime.
    #[arg(long, env = "DATASMITH_SESSION_ID", default_value = DEFAULT_SESSION_ID)]
    pub session_id: String,

    /// Speech-to-text command. Prints `partial: ...` / `final: ...` lines on stdout.
    #[arg(long, env = "DATASMITH_STT_CMD")]
    pub stt_cmd: Option<String>,

    /// Text-to-speech command. Receives the text as its last argument.
    #[arg(long, env = "DATASMITH_TTS_CMD")]
    pub tts_cmd: Option<String>,

    /// Message submitted once at startup.
    #[arg(long)]
    pub initial_message: Option<String>,

    #[arg(long, env = "DATASMITH_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("datasmith")
                .join("datasmith-tui.log")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, DEFAULT_SESSION_ID};
    use crate::app::runtime::DEFAULT_BASE_URL;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "datasmith",
            "--base-url",
            "http://localhost:9000/api/v1",
            "--session-id",
            "abc",
            "--stt-cmd",
            "whisper-stream --lang en",
            "--initial-message",
            "/tldr hello",
            "--log-file",
            "/tmp/ds.log",
        ])
        .expect("parse");
        assert_eq!(config.base_url, "http://localhost:9000/api/v1");
        assert_eq!(config.session_id, "abc");
        assert_eq!(config.stt_cmd.as_deref(), Some("whisper-stream --lang en"));
        assert_eq!(config.initial_message.as_deref(), Some("/tldr hello"));
        assert_eq!(config.log_path(), PathBuf::from("/tmp/ds.log"));
    }

    #[test]
    fn defaults_apply_without_flags() {
        let config = Config::try_parse_from(["datasmith"]).expect("parse");
        if std::env::var_os("DATASMITH_API_BASE").is_none() {
            assert_eq!(config.base_url, DEFAULT_BASE_URL);
        }
        if std::env::var_os("DATASMITH_SESSION_ID").is_none() {
            assert_eq!(config.session_id, DEFAULT_SESSION_ID);
        }
        if config.log_file.is_none() {
            assert!(config.log_path().ends_with("datasmith/datasmith-tui.log"));
        }
    }
}
