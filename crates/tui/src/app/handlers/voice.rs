use crate::app::runtime::{PlaybackEvent, VoiceEvent};
use crate::app::state::LogKind;
use crate::app::{AppState, PlaybackPhase, Services};

pub fn toggle_voice(app: &mut AppState, services: &mut Services) -> bool {
    if !app.voice_supported || app.is_submitting() {
        return false;
    }

    app.voice.generation = app.voice.generation.wrapping_add(1);
    app.voice.interim.clear();
    if app.voice.recording {
        services.recognizer.stop();
        app.voice.recording = false;
        tracing::debug!("voice capture stopped");
        return true;
    }

    match services
        .recognizer
        .start(app.voice.generation, services.events.clone())
    {
        Ok(()) => app.voice.recording = true,
        Err(error) => {
            tracing::warn!(%error, "voice capture failed to start");
            app.set_status(LogKind::Error, format!("Voice input unavailable: {error}"));
        }
    }
    true
}

pub fn handle_voice_event(app: &mut AppState, generation: u64, event: VoiceEvent) {
    if generation != app.voice.generation || !app.voice.recording {
        tracing::debug!(generation, "dropping stale voice event");
        return;
    }
    match event {
        VoiceEvent::Interim(text) => app.voice.interim = text,
        VoiceEvent::Final(text) => {
            app.composer.append_transcript(&text);
            app.voice.interim = text;
        }
        VoiceEvent::Ended => {
            app.voice.recording = false;
            app.voice.interim.clear();
        }
        VoiceEvent::Failed(message) => {
            tracing::warn!(%message, "voice capture failed");
            app.voice.recording = false;
            app.voice.interim.clear();
            app.set_status(LogKind::Error, format!("Voice input error: {message}"));
        }
    }
}

/// Reads the latest assistant reply aloud, or stops playback if it is running.
pub fn toggle_read_aloud(app: &mut AppState, services: &mut Services) -> bool {
    if !app.playback_supported {
        return false;
    }
    if app.playback.phase != PlaybackPhase::Idle {
        services.synthesizer.cancel();
        app.playback.generation = app.playback.generation.wrapping_add(1);
        app.playback.phase = PlaybackPhase::Idle;
        return true;
    }
    let Some(text) = app.conversation.latest_reply().map(str::to_string) else {
        app.set_status(LogKind::Status, "No reply to read aloud yet");
        return true;
    };

    app.playback.generation = app.playback.generation.wrapping_add(1);
    match services
        .synthesizer
        .speak(app.playback.generation, &text, services.events.clone())
    {
        Ok(()) => app.playback.phase = PlaybackPhase::Loading,
        Err(error) => {
            tracing::warn!(%error, "speech playback failed to start");
            app.set_status(LogKind::Error, format!("Read aloud unavailable: {error}"));
        }
    }
    true
}

pub fn handle_playback_event(app: &mut AppState, generation: u64, event: PlaybackEvent) {
    if generation != app.playback.generation || app.playback.phase == PlaybackPhase::Idle {
        return;
    }
    app.playback.phase = match event {
        PlaybackEvent::Started => PlaybackPhase::Playing,
        PlaybackEvent::Finished => PlaybackPhase::Idle,
        PlaybackEvent::Failed(message) => {
            tracing::warn!(%message, "speech playback failed");
            PlaybackPhase::Idle
        }
    };
}

#[cfg(test)]
mod tests {
    use super::{handle_playback_event, handle_voice_event, toggle_read_aloud, toggle_voice};
    use crate::app::handlers::test_support::{services, Reply};
    use crate::app::runtime::{PlaybackEvent, VoiceEvent};
    use crate::app::state::{ComposerMode, Message};
    use crate::app::{AppState, PlaybackPhase};

    fn voice_app() -> AppState {
        let mut app = AppState::new("s");
        app.voice_supported = true;
        app.playback_supported = true;
        app
    }

    #[test]
    fn toggle_is_ignored_when_unsupported_or_submitting() {
        let (mut services, _rx, _transport) = services(Reply::Immediate);
        let mut app = AppState::new("s");
        assert!(!toggle_voice(&mut app, &mut services));

        let mut app = voice_app();
        app.composer.submitting = true;
        assert!(!toggle_voice(&mut app, &mut services));
        assert!(!app.voice.recording);
    }

    #[test]
    fn final_transcript_appends_and_runs_menu_transition() {
        let (mut services, _rx, _transport) = services(Reply::Immediate);
        let mut app = voice_app();
        assert!(toggle_voice(&mut app, &mut services));
        assert!(app.voice.recording);
        let generation = app.voice.generation;

        handle_voice_event(&mut app, generation, VoiceEvent::Interim("/su".to_string()));
        assert_eq!(app.voice.interim, "/su");
        assert_eq!(app.composer.text(), "");

        handle_voice_event(&mut app, generation, VoiceEvent::Final("/su".to_string()));
        assert_eq!(app.composer.text(), "/su ");
        assert_eq!(app.composer.mode(), ComposerMode::Idle);
    }

    #[test]
    fn stopping_discards_interim_and_later_events() {
        let (mut services, _rx, _transport) = services(Reply::Immediate);
        let mut app = voice_app();
        toggle_voice(&mut app, &mut services);
        let old = app.voice.generation;
        handle_voice_event(&mut app, old, VoiceEvent::Interim("hal".to_string()));

        toggle_voice(&mut app, &mut services);
        assert!(!app.voice.recording);
        assert!(app.voice.interim.is_empty());

        handle_voice_event(&mut app, old, VoiceEvent::Final("hello".to_string()));
        assert_eq!(app.composer.text(), "");
    }

    #[test]
    fn recognizer_end_turns_recording_off() {
        let (mut services, _rx, _transport) = services(Reply::Immediate);
        let mut app = voice_app();
        toggle_voice(&mut app, &mut services);
        let generation = app.voice.generation;
        handle_voice_event(&mut app, generation, VoiceEvent::Failed("no-speech".to_string()));
        assert!(!app.voice.recording);
        assert!(app.status_note.is_some());
    }

    #[test]
    fn read_aloud_walks_loading_playing_idle() {
        let (mut services, _rx, _transport) = services(Reply::Immediate);
        let mut app = voice_app();
        app.conversation.push(Message::ai("**Summary** ready"));

        assert!(toggle_read_aloud(&mut app, &mut services));
        assert_eq!(app.playback.phase, PlaybackPhase::Loading);
        let generation = app.playback.generation;
        handle_playback_event(&mut app, generation, PlaybackEvent::Started);
        assert_eq!(app.playback.phase, PlaybackPhase::Playing);
        handle_playback_event(&mut app, generation, PlaybackEvent::Finished);
        assert_eq!(app.playback.phase, PlaybackPhase::Idle);
    }

    #[test]
    fn read_aloud_while_playing_cancels_and_ignores_late_events() {
        let (mut services, _rx, _transport) = services(Reply::Immediate);
        let mut app = voice_app();
        app.conversation.push(Message::ai("answer"));
        toggle_read_aloud(&mut app, &mut services);
        let generation = app.playback.generation;
        handle_playback_event(&mut app, generation, PlaybackEvent::Started);

        assert!(toggle_read_aloud(&mut app, &mut services));
        assert_eq!(app.playback.phase, PlaybackPhase::Idle);
        handle_playback_event(&mut app, generation, PlaybackEvent::Started);
        assert_eq!(app.playback.phase, PlaybackPhase::Idle);
    }

    #[test]
    fn read_aloud_skips_error_replies() {
        let (mut services, _rx, _transport) = services(Reply::Immediate);
        let mut app = voice_app();
        app.conversation.push(Message::ai("Error: HTTP Error 500"));
        toggle_read_aloud(&mut app, &mut services);
        assert_eq!(app.playback.phase, PlaybackPhase::Idle);
        let note = app.status_note.as_ref().map(|line| line.plain_text());
        assert_eq!(note.as_deref(), Some("No reply to read aloud yet"));
    }
}
