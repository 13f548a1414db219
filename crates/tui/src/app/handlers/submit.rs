use crate::app::runtime::{
    dispatch_reset, dispatch_submit, AnalyzeResponse, FilePart, TransportError, TransportRequest,
};
use crate::app::state::{LogKind, Message};
use crate::app::{AppState, InFlightSubmission, Services};
use std::time::Instant;

/// Steps before the network call: validate, record the user turn, snapshot
/// and clear the composer. Returns the request to send, or `None` when the
/// submission is rejected.
pub fn begin_submit(app: &mut AppState) -> Option<TransportRequest> {
    let text = app.composer.text();
    let file_count = app.composer.attachments.len();
    if app.is_submitting() || app.in_flight.is_some() {
        tracing::debug!("submit ignored: a submission is already in flight");
        return None;
    }
    if app.reset_pending {
        tracing::debug!("submit ignored: session reset in progress");
        return None;
    }
    if text.trim().is_empty() && file_count == 0 {
        return None;
    }

    app.composer.hide_menu();
    let content = if file_count > 0 {
        format!("{text} [{file_count} file(s) attached]")
    } else {
        text.clone()
    };
    app.conversation.push(Message::user(content));

    let attachments = app.composer.attachments.take_all();
    app.composer.input.record_history(&text);
    app.composer.input.clear();
    app.composer.submitting = true;
    app.scroll_from_bottom = 0;
    app.clear_status();

    let session_id = app.session_id.clone();
    let request = if attachments.is_empty() {
        TransportRequest::Analyze { text, session_id }
    } else {
        let files = attachments
            .iter()
            .map(|attachment| FilePart {
                file_name: attachment.name.clone(),
                mime_type: attachment.mime_type.clone(),
                content: attachment.content.clone(),
            })
            .collect();
        TransportRequest::Upload {
            text,
            files,
            session_id,
        }
    };
    app.in_flight = Some(InFlightSubmission {
        attachments,
        started_at: Instant::now(),
    });
    tracing::info!(files = request.file_count(), "submitting message");
    Some(request)
}

/// Steps after the round trip: append the reply or the error, clear the
/// submitting flag, release the snapshot's previews.
pub fn complete_submit(app: &mut AppState, result: Result<AnalyzeResponse, TransportError>) {
    let Some(in_flight) = app.in_flight.take() else {
        tracing::warn!("completion arrived with no submission in flight");
        return;
    };

    match result {
        Ok(response) => {
            tracing::info!(
                elapsed_ms = in_flight.started_at.elapsed().as_millis() as u64,
                "response received"
            );
            app.conversation
                .record_response_meta(response.stats, response.requires_clarification);
            app.conversation.push(Message::ai(response.response));
        }
        Err(error) => {
            app.conversation.push(Message::ai(format!("Error: {error}")));
        }
    }

    app.composer.submitting = false;
    app.composer.attachments.release_all(in_flight.attachments);
}

pub fn submit(app: &mut AppState, services: &Services) -> bool {
    let Some(request) = begin_submit(app) else {
        return false;
    };
    dispatch_submit(services.client.clone(), request, services.events.clone());
    true
}

pub fn request_reset(app: &mut AppState, services: &Services) -> bool {
    if app.is_submitting() || app.reset_pending {
        return false;
    }
    app.reset_pending = true;
    app.set_status(LogKind::Status, "Resetting session...");
    dispatch_reset(
        services.client.clone(),
        app.session_id.clone(),
        services.events.clone(),
    );
    true
}

pub fn complete_reset(app: &mut AppState, result: Result<(), TransportError>) {
    app.reset_pending = false;
    match result {
        Ok(()) => {
            app.conversation.reset();
            app.scroll_from_bottom = 0;
            tracing::info!(session = %app.session_id, "session reset");
            app.set_status(LogKind::Status, "Session reset");
        }
        Err(error) => {
            tracing::warn!(%error, "session reset failed");
            app.set_status(LogKind::Error, format!("Reset failed: {error}"));
        }
    }
}
