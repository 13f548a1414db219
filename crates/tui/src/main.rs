mod app;
mod config;
mod logging;

use crate::app::handlers::{handle_app_event, handle_key, handle_paste, submit};
use crate::app::runtime::{
    recognizer_from_config, synthesizer_from_config, AnalyzeClient, AppEvent, HttpTransport,
};
use crate::app::view::draw_ui;
use crate::app::{AppState, Services};
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::cursor::Show;
use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::Stdout;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, Instant};

const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(50);

struct TerminalRestoreGuard;

impl TerminalRestoreGuard {
    fn install(stdout: &mut Stdout) -> Result<Self> {
        stdout
            .execute(EnterAlternateScreen)
            .context("failed to enter alternate screen")?;
        let guard = Self;
        enable_raw_mode().context("failed to enable raw mode")?;
        // Lets terminals that support it report Shift+Enter distinctly. A no-op elsewhere.
        let _ = stdout.execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                | KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ));
        // Multi-line pastes and file drops arrive as one Event::Paste.
        let _ = stdout.execute(EnableBracketedPaste);
        Ok(guard)
    }
}

impl Drop for TerminalRestoreGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = std::io::stdout();
        let _ = stdout.execute(PopKeyboardEnhancementFlags);
        let _ = stdout.execute(DisableBracketedPaste);
        let _ = stdout.execute(LeaveAlternateScreen);
        let _ = stdout.execute(Show);
    }
}

fn drain_app_events(app: &mut AppState, rx: &Receiver<AppEvent>) -> bool {
    let mut changed = false;
    loop {
        match rx.try_recv() {
            Ok(event) => {
                handle_app_event(app, event);
                changed = true;
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return changed,
        }
    }
}

fn run(app: &mut AppState, services: &mut Services, rx: &Receiver<AppEvent>) -> Result<()> {
    let mut stdout = std::io::stdout();
    let _restore_guard = TerminalRestoreGuard::install(&mut stdout)?;
    let mut terminal =
        Terminal::new(CrosstermBackend::new(stdout)).context("failed to initialize terminal")?;

    let mut needs_redraw = true;
    while !app.should_quit {
        if needs_redraw {
            terminal.draw(|f| draw_ui(f, app))?;
            needs_redraw = false;
        }

        if event::poll(INPUT_POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) => needs_redraw |= handle_key(app, services, key),
                Event::Paste(text) => needs_redraw |= handle_paste(app, &text),
                Event::Resize(_, _) => needs_redraw = true,
                _ => {}
            }
        }

        needs_redraw |= drain_app_events(app, rx);
        needs_redraw |= app.update_spinner(Instant::now());
    }
    Ok(())
}

fn main() -> Result<()> {
    let config = Config::parse();
    let _log_guard = logging::init(&config.log_path())?;
    tracing::info!(
        base_url = %config.base_url,
        session = %config.session_id,
        "starting datasmith"
    );

    let transport = HttpTransport::new(&config.base_url).context("failed to build HTTP client")?;
    let (events, rx) = mpsc::channel();
    let recognizer = recognizer_from_config(config.stt_cmd.as_deref());
    let synthesizer = synthesizer_from_config(config.tts_cmd.as_deref());

    let mut app = AppState::new(config.session_id.clone());
    app.voice_supported = recognizer.is_supported();
    app.playback_supported = synthesizer.is_supported();
    let mut services = Services {
        client: AnalyzeClient::new(Arc::new(transport)),
        events,
        recognizer,
        synthesizer,
    };

    if let Some(message) = config.initial_message.as_deref() {
        app.composer.input.set_from(message);
        app.composer.on_text_changed();
        submit(&mut app, &services);
    }

    let result = run(&mut app, &mut services, &rx);
    services.shutdown();
    app.teardown();
    tracing::info!("exiting datasmith");
    result
}
