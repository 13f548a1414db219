pub(crate) mod handlers;
pub(crate) mod runtime;
pub(crate) mod state;
pub(crate) mod util;
pub(crate) mod view;

use crate::app::runtime::{AnalyzeClient, AppEvent, SpeechRecognizer, SpeechSynthesizer};
use crate::app::state::{Attachment, ComposerState, Conversation, LogKind, LogLine, PromptDialogState};
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

const SPINNER_INTERVAL: Duration = Duration::from_millis(120);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusLineMode {
    #[default]
    Info,
    Help,
}

#[derive(Default)]
pub struct VoiceState {
    pub recording: bool,
    pub interim: String,
    pub generation: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackPhase {
    #[default]
    Idle,
    Loading,
    Playing,
}

#[derive(Default)]
pub struct PlaybackState {
    pub phase: PlaybackPhase,
    pub generation: u64,
}

/// The attachments of the submission currently on the wire. Their previews
/// are released when the round trip completes.
pub struct InFlightSubmission {
    pub attachments: Vec<Attachment>,
    pub started_at: Instant,
}

pub struct WrappedLogCache {
    pub width: usize,
    pub version: u64,
    pub wrapped: Vec<LogLine>,
}

pub struct AppState {
    pub session_id: String,
    pub conversation: Conversation,
    pub composer: ComposerState,
    pub in_flight: Option<InFlightSubmission>,
    pub prompt_dialog: Option<PromptDialogState>,
    pub voice: VoiceState,
    pub playback: PlaybackState,
    pub voice_supported: bool,
    pub playback_supported: bool,
    pub reset_pending: bool,
    pub status_note: Option<LogLine>,
    pub status_line_mode: StatusLineMode,
    pub scroll_from_bottom: usize,
    pub last_log_viewport_height: usize,
    pub wrapped_log_cache: Option<WrappedLogCache>,
    pub spinner_index: usize,
    pub spinner_last_tick: Instant,
    pub clipboard_image_count: u64,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            conversation: Conversation::default(),
            composer: ComposerState::default(),
            in_flight: None,
            prompt_dialog: None,
            voice: VoiceState::default(),
            playback: PlaybackState::default(),
            voice_supported: false,
            playback_supported: false,
            reset_pending: false,
            status_note: None,
            status_line_mode: StatusLineMode::Info,
            scroll_from_bottom: 0,
            last_log_viewport_height: 0,
            wrapped_log_cache: None,
            spinner_index: 0,
            spinner_last_tick: Instant::now(),
            clipboard_image_count: 0,
            should_quit: false,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.composer.submitting
    }

    pub fn set_status(&mut self, kind: LogKind, text: impl Into<String>) {
        self.status_note = Some(LogLine::new(kind, text));
    }

    pub fn clear_status(&mut self) {
        self.status_note = None;
    }

    pub fn toggle_status_line_mode(&mut self) {
        self.status_line_mode = match self.status_line_mode {
            StatusLineMode::Info => StatusLineMode::Help,
            StatusLineMode::Help => StatusLineMode::Info,
        };
    }

    pub fn spinner_frame(&self) -> &'static str {
        const FRAMES: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];
        FRAMES[self.spinner_index % FRAMES.len()]
    }

    pub fn update_spinner(&mut self, now: Instant) -> bool {
        let busy = self.is_submitting()
            || self.reset_pending
            || self.playback.phase == PlaybackPhase::Loading;
        if !busy {
            self.spinner_index = 0;
            self.spinner_last_tick = now;
            return false;
        }
        if now.duration_since(self.spinner_last_tick) >= SPINNER_INTERVAL {
            self.spinner_last_tick = now;
            self.spinner_index = self.spinner_index.wrapping_add(1);
            return true;
        }
        false
    }

    pub fn scroll_page_up(&mut self) {
        let page = self.last_log_viewport_height.saturating_sub(1).max(1);
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(page);
    }

    pub fn scroll_page_down(&mut self) {
        let page = self.last_log_viewport_height.saturating_sub(1).max(1);
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(page);
    }

    /// Releases every preview still held: live attachments and any in-flight snapshot.
    pub fn teardown(&mut self) {
        let live = self.composer.attachments.take_all();
        self.composer.attachments.release_all(live);
        if let Some(in_flight) = self.in_flight.take() {
            self.composer.attachments.release_all(in_flight.attachments);
        }
        tracing::debug!(
            outstanding = self.composer.attachments.previews().outstanding(),
            "state torn down"
        );
    }
}

/// Handles to the outside world used by the key and event handlers.
pub struct Services {
    pub client: AnalyzeClient,
    pub events: Sender<AppEvent>,
    pub recognizer: Box<dyn SpeechRecognizer>,
    pub synthesizer: Box<dyn SpeechSynthesizer>,
}

impl Services {
    pub fn shutdown(&mut self) {
        self.recognizer.stop();
        self.synthesizer.cancel();
    }
}
