use std::io::{BufRead, BufReader};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use thiserror::Error;

use super::worker::AppEvent;

const PLAYBACK_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VoiceEvent {
    Interim(String),
    Final(String),
    Ended,
    Failed(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlaybackEvent {
    Started,
    Finished,
    Failed(String),
}

#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("{0} is not available")]
    Unsupported(&'static str),

    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

pub trait SpeechRecognizer {
    fn is_supported(&self) -> bool;
    fn start(&mut self, generation: u64, tx: Sender<AppEvent>) -> Result<(), CapabilityError>;
    fn stop(&mut self);
}

pub trait SpeechSynthesizer {
    fn is_supported(&self) -> bool;
    fn speak(
        &mut self,
        generation: u64,
        text: &str,
        tx: Sender<AppEvent>,
    ) -> Result<(), CapabilityError>;
    fn cancel(&mut self);
}

/// Stand-in when no command is configured or it is missing from `PATH`.
pub struct Unsupported;

impl SpeechRecognizer for Unsupported {
    fn is_supported(&self) -> bool {
        false
    }

    fn start(&mut self, _generation: u64, _tx: Sender<AppEvent>) -> Result<(), CapabilityError> {
        Err(CapabilityError::Unsupported("speech recognition"))
    }

    fn stop(&mut self) {}
}

impl SpeechSynthesizer for Unsupported {
    fn is_supported(&self) -> bool {
        false
    }

    fn speak(
        &mut self,
        _generation: u64,
        _text: &str,
        _tx: Sender<AppEvent>,
    ) -> Result<(), CapabilityError> {
        Err(CapabilityError::Unsupported("speech playback"))
    }

    fn cancel(&mut self) {}
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    fn parse(value: &str) -> Option<Self> {
        let mut parts = match shell_words::split(value) {
            Ok(parts) => parts,
            Err(error) => {
                tracing::warn!(%error, command = value, "could not parse speech command");
                return None;
            }
        };
        if parts.is_empty() {
            return None;
        }
        let program = parts.remove(0);
        Some(Self {
            program,
            args: parts,
        })
    }

    fn resolves(&self) -> bool {
        which::which(&self.program).is_ok()
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }

    fn spawn_error(&self, source: std::io::Error) -> CapabilityError {
        CapabilityError::Spawn {
            program: self.program.clone(),
            source,
        }
    }
}

/// Classifies one line of recognizer output. Unprefixed lines count as final.
pub fn parse_transcript_line(line: &str) -> Option<VoiceEvent> {
    let line = line.trim();
    if let Some(rest) = line.strip_prefix("partial:") {
        return Some(VoiceEvent::Interim(rest.trim().to_string()));
    }
    let text = line.strip_prefix("final:").unwrap_or(line).trim();
    if text.is_empty() {
        return None;
    }
    Some(VoiceEvent::Final(text.to_string()))
}

/// Speech capture through an external program that prints transcripts on stdout.
pub struct CommandRecognizer {
    command: CommandLine,
    supported: bool,
    child: Option<Child>,
}

impl CommandRecognizer {
    pub fn new(command_line: &str) -> Option<Self> {
        let command = CommandLine::parse(command_line)?;
        let supported = command.resolves();
        if !supported {
            tracing::warn!(program = %command.program, "speech recognizer not found on PATH");
        }
        Some(Self {
            command,
            supported,
            child: None,
        })
    }
}

impl SpeechRecognizer for CommandRecognizer {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn start(&mut self, generation: u64, tx: Sender<AppEvent>) -> Result<(), CapabilityError> {
        self.stop();
        let mut child = self
            .command
            .command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|error| self.command.spawn_error(error))?;
        let Some(stdout) = child.stdout.take() else {
            let _ = child.kill();
            return Err(self.command.spawn_error(std::io::Error::other("stdout missing")));
        };
        tracing::debug!(generation, program = %self.command.program, "voice capture started");
        self.child = Some(child);

        thread::spawn(move || {
            let mut reader = BufReader::new(stdout);
            let mut line = String::new();
            let last = loop {
                line.clear();
                match reader.read_line(&mut line) {
                    Ok(0) => break VoiceEvent::Ended,
                    Ok(_) => {
                        if let Some(event) = parse_transcript_line(&line) {
                            if tx.send(AppEvent::Voice { generation, event }).is_err() {
                                return;
                            }
                        }
                    }
                    Err(error) => break VoiceEvent::Failed(error.to_string()),
                }
            };
            let _ = tx.send(AppEvent::Voice {
                generation,
                event: last,
            });
        });
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Drop for CommandRecognizer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Speech playback through an external program that receives the text as
/// its last argument.
pub struct CommandSynthesizer {
    command: CommandLine,
    supported: bool,
    child: Option<Arc<Mutex<Child>>>,
}

impl CommandSynthesizer {
    pub fn new(command_line: &str) -> Option<Self> {
        let command = CommandLine::parse(command_line)?;
        let supported = command.resolves();
        if !supported {
            tracing::warn!(program = %command.program, "speech synthesizer not found on PATH");
        }
        Some(Self {
            command,
            supported,
            child: None,
        })
    }
}

impl SpeechSynthesizer for CommandSynthesizer {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn speak(
        &mut self,
        generation: u64,
        text: &str,
        tx: Sender<AppEvent>,
    ) -> Result<(), CapabilityError> {
        self.cancel();
        let child = self
            .command
            .command()
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|error| self.command.spawn_error(error))?;
        let child = Arc::new(Mutex::new(child));
        self.child = Some(Arc::clone(&child));
        let _ = tx.send(AppEvent::Playback {
            generation,
            event: PlaybackEvent::Started,
        });

        thread::spawn(move || {
            let event = loop {
                let status = match child.lock() {
                    Ok(mut child) => child.try_wait(),
                    Err(_) => break PlaybackEvent::Failed("playback state poisoned".to_string()),
                };
                match status {
                    Ok(Some(status)) if status.success() => break PlaybackEvent::Finished,
                    Ok(Some(status)) => break PlaybackEvent::Failed(format!("player {status}")),
                    Ok(None) => thread::sleep(PLAYBACK_POLL_INTERVAL),
                    Err(error) => break PlaybackEvent::Failed(error.to_string()),
                }
            };
            let _ = tx.send(AppEvent::Playback { generation, event });
        });
        Ok(())
    }

    fn cancel(&mut self) {
        if let Some(child) = self.child.take() {
            if let Ok(mut child) = child.lock() {
                let _ = child.kill();
            }
        }
    }
}

impl Drop for CommandSynthesizer {
    fn drop(&mut self) {
        self.cancel();
    }
}

pub fn recognizer_from_config(command_line: Option<&str>) -> Box<dyn SpeechRecognizer> {
    match command_line.and_then(CommandRecognizer::new) {
        Some(recognizer) => Box::new(recognizer),
        None => Box::new(Unsupported),
    }
}

pub fn synthesizer_from_config(command_line: Option<&str>) -> Box<dyn SpeechSynthesizer> {
    match command_line.and_then(CommandSynthesizer::new) {
        Some(synthesizer) => Box::new(synthesizer),
        None => Box::new(Unsupported),
    }
}
