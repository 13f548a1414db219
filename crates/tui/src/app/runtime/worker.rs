use std::sync::mpsc::Sender;
use std::thread;

use super::client::{AnalyzeClient, AnalyzeResponse, TransportRequest};
use super::error::TransportError;
use super::speech::{PlaybackEvent, VoiceEvent};

/// Everything background threads report back to the UI loop.
#[derive(Debug)]
pub enum AppEvent {
    SubmitFinished(Result<AnalyzeResponse, TransportError>),
    ResetFinished(Result<(), TransportError>),
    Voice { generation: u64, event: VoiceEvent },
    Playback { generation: u64, event: PlaybackEvent },
}

pub fn dispatch_submit(client: AnalyzeClient, request: TransportRequest, tx: Sender<AppEvent>) {
    thread::spawn(move || {
        let result = client.execute(&request);
        if let Err(error) = &result {
            tracing::warn!(%error, "analyze request failed");
        }
        let _ = tx.send(AppEvent::SubmitFinished(result));
    });
}

pub fn dispatch_reset(client: AnalyzeClient, session_id: String, tx: Sender<AppEvent>) {
    thread::spawn(move || {
        let result = client.reset_session(&session_id);
        let _ = tx.send(AppEvent::ResetFinished(result));
    });
}

#[cfg(test)]
mod tests {
    use super::{dispatch_reset, dispatch_submit, AppEvent};
    use crate::app::runtime::{
        AnalyzeClient, MultipartForm, Transport, TransportError, TransportRequest,
    };
    use serde_json::{json, Value};
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::time::Duration;

    struct Echo;

    impl Transport for Echo {
        fn post_json(&self, path: &str, body: &Value) -> Result<Value, TransportError> {
            if path.starts_with("/reset/") {
                return Err(TransportError::Network("connection refused".to_string()));
            }
            Ok(json!({ "response": body["text"] }))
        }

        fn post_multipart(&self, _path: &str, _form: MultipartForm) -> Result<Value, TransportError> {
            Ok(json!({ "response": "uploaded" }))
        }
    }

    #[test]
    fn submit_posts_one_completion_event() {
        let (tx, rx) = mpsc::channel();
        dispatch_submit(
            AnalyzeClient::new(Arc::new(Echo)),
            TransportRequest::Analyze {
                text: "ping".to_string(),
                session_id: "s".to_string(),
            },
            tx,
        );
        match rx.recv_timeout(Duration::from_secs(5)).expect("event") {
            AppEvent::SubmitFinished(Ok(response)) => assert_eq!(response.response, "ping"),
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }

    #[test]
    fn reset_failure_is_reported() {
        let (tx, rx) = mpsc::channel();
        dispatch_reset(AnalyzeClient::new(Arc::new(Echo)), "s".to_string(), tx);
        match rx.recv_timeout(Duration::from_secs(5)).expect("event") {
            AppEvent::ResetFinished(Err(error)) => assert_eq!(error.to_string(), "connection refused"),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
