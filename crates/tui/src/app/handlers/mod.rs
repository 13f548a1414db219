pub(crate) mod files;
pub(crate) mod keys;
pub(crate) mod submit;
pub(crate) mod voice;

use crate::app::runtime::AppEvent;
use crate::app::AppState;

pub(crate) use keys::{handle_key, handle_paste};
pub(crate) use submit::submit;

/// Applies a background completion to the state. Runs on the UI thread only.
pub fn handle_app_event(app: &mut AppState, event: AppEvent) {
    match event {
        AppEvent::SubmitFinished(result) => submit::complete_submit(app, result),
        AppEvent::ResetFinished(result) => submit::complete_reset(app, result),
        AppEvent::Voice { generation, event } => voice::handle_voice_event(app, generation, event),
        AppEvent::Playback { generation, event } => {
            voice::handle_playback_event(app, generation, event)
        }
    }
}
