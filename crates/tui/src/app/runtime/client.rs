use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use super::error::{error_from_response, TransportError};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api/v1";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilePart {
    pub file_name: String,
    pub mime_type: String,
    pub content: Arc<[u8]>,
}

/// Transport-neutral multipart body; converted to a reqwest form on send.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MultipartForm {
    pub fields: Vec<(String, String)>,
    pub files: Vec<(String, FilePart)>,
}

impl MultipartForm {
    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.push((name.to_string(), value.into()));
        self
    }

    pub fn file(mut self, name: &str, part: FilePart) -> Self {
        self.files.push((name.to_string(), part));
        self
    }

    fn into_reqwest(self) -> Result<reqwest::blocking::multipart::Form, TransportError> {
        let mut form = reqwest::blocking::multipart::Form::new();
        for (name, value) in self.fields {
            form = form.text(name, value);
        }
        for (name, part) in self.files {
            let body = reqwest::blocking::multipart::Part::bytes(part.content.to_vec())
                .file_name(part.file_name)
                .mime_str(&part.mime_type)?;
            form = form.part(name, body);
        }
        Ok(form)
    }
}

/// The two HTTP shapes the client speaks. Implemented over reqwest in
/// production and by in-process fakes in tests.
pub trait Transport: Send + Sync {
    fn post_json(&self, path: &str, body: &Value) -> Result<Value, TransportError>;
    fn post_multipart(&self, path: &str, form: MultipartForm) -> Result<Value, TransportError>;
}

pub struct HttpTransport {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        // Requests never time out; the caller waits for the backend.
        let http = reqwest::blocking::Client::builder().timeout(None::<Duration>).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn read(response: reqwest::blocking::Response) -> Result<Value, TransportError> {
        let status = response.status();
        let body = response.bytes()?;
        if !status.is_success() {
            return Err(error_from_response(status.as_u16(), &body));
        }
        serde_json::from_slice(&body).map_err(|error| TransportError::Decode(error.to_string()))
    }
}

impl Transport for HttpTransport {
    fn post_json(&self, path: &str, body: &Value) -> Result<Value, TransportError> {
        tracing::debug!(path, "POST json");
        let response = self.http.post(self.url(path)).json(body).send()?;
        Self::read(response)
    }

    fn post_multipart(&self, path: &str, form: MultipartForm) -> Result<Value, TransportError> {
        tracing::debug!(path, files = form.files.len(), "POST multipart");
        let response = self
            .http
            .post(self.url(path))
            .multipart(form.into_reqwest()?)
            .send()?;
        Self::read(response)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionStats {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
    pub tokens_per_sec: f64,
    pub total_time_sec: f64,
    pub estimated_cost_usd: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AnalyzeResponse {
    pub response: String,
    #[serde(default)]
    pub requires_clarification: bool,
    #[serde(default)]
    pub stats: Option<SessionStats>,
}

/// One outbound submission, built on the UI thread and sent from a worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportRequest {
    Analyze {
        text: String,
        session_id: String,
    },
    Upload {
        text: String,
        files: Vec<FilePart>,
        session_id: String,
    },
}

impl TransportRequest {
    pub fn file_count(&self) -> usize {
        match self {
            Self::Analyze { .. } => 0,
            Self::Upload { files, .. } => files.len(),
        }
    }
}

#[derive(Clone)]
pub struct AnalyzeClient {
    transport: Arc<dyn Transport>,
}

impl AnalyzeClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn execute(&self, request: &TransportRequest) -> Result<AnalyzeResponse, TransportError> {
        let value = match request {
            TransportRequest::Analyze { text, session_id } => self.transport.post_json(
                "/analyze",
                &json!({ "text": text, "session_id": session_id }),
            )?,
            TransportRequest::Upload {
                text,
                files,
                session_id,
            } => self
                .transport
                .post_multipart("/analyze/upload", upload_form(text, files, session_id))?,
        };
        parse_analyze_response(value)
    }

    pub fn reset_session(&self, session_id: &str) -> Result<(), TransportError> {
        let path = format!("/reset/{session_id}");
        self.transport.post_json(&path, &json!({}))?;
        Ok(())
    }
}

pub fn upload_form(text: &str, files: &[FilePart], session_id: &str) -> MultipartForm {
    files.iter().fold(
        MultipartForm::default()
            .text("text", text)
            .text("session_id", session_id),
        |form, part| form.file("files", part.clone()),
    )
}

pub fn parse_analyze_response(value: Value) -> Result<AnalyzeResponse, TransportError> {
    serde_json::from_value(value).map_err(|error| TransportError::Decode(error.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{
        parse_analyze_response, upload_form, AnalyzeClient, FilePart, MultipartForm, Transport,
        TransportRequest,
    };
    use crate::app::runtime::TransportError;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<(String, Option<Value>, Option<MultipartForm>)>>,
    }

    impl Transport for Recorder {
        fn post_json(&self, path: &str, body: &Value) -> Result<Value, TransportError> {
            self.calls
                .lock()
                .expect("lock")
                .push((path.to_string(), Some(body.clone()), None));
            Ok(json!({ "response": "ok", "status": "reset" }))
        }

        fn post_multipart(&self, path: &str, form: MultipartForm) -> Result<Value, TransportError> {
            self.calls
                .lock()
                .expect("lock")
                .push((path.to_string(), None, Some(form)));
            Ok(json!({ "response": "ok" }))
        }
    }

    fn part(name: &str, mime: &str) -> FilePart {
        FilePart {
            file_name: name.to_string(),
            mime_type: mime.to_string(),
            content: Arc::from(&b"bytes"[..]),
        }
    }

    #[test]
    fn upload_form_orders_text_session_then_files() {
        let form = upload_form("", &[part("a.png", "image/png"), part("b.pdf", "application/pdf")], "s1");
        assert_eq!(
            form.fields,
            vec![
                ("text".to_string(), String::new()),
                ("session_id".to_string(), "s1".to_string())
            ]
        );
        let names: Vec<_> = form
            .files
            .iter()
            .map(|(field, part)| (field.as_str(), part.file_name.as_str()))
            .collect();
        assert_eq!(names, vec![("files", "a.png"), ("files", "b.pdf")]);
    }

    #[test]
    fn analyze_posts_json_body() {
        let recorder = Arc::new(Recorder::default());
        let client = AnalyzeClient::new(recorder.clone());
        let response = client
            .execute(&TransportRequest::Analyze {
                text: "hi".to_string(),
                session_id: "default-session".to_string(),
            })
            .expect("response");
        assert_eq!(response.response, "ok");

        let calls = recorder.calls.lock().expect("lock");
        assert_eq!(calls[0].0, "/analyze");
        assert_eq!(
            calls[0].1,
            Some(json!({ "text": "hi", "session_id": "default-session" }))
        );
    }

    #[test]
    fn upload_uses_multipart_endpoint() {
        let recorder = Arc::new(Recorder::default());
        let client = AnalyzeClient::new(recorder.clone());
        client
            .execute(&TransportRequest::Upload {
                text: "look".to_string(),
                files: vec![part("a.png", "image/png")],
                session_id: "s".to_string(),
            })
            .expect("response");

        let calls = recorder.calls.lock().expect("lock");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "/analyze/upload");
        assert_eq!(calls[0].2.as_ref().map(|form| form.files.len()), Some(1));
    }

    #[test]
    fn reset_targets_session_path() {
        let recorder = Arc::new(Recorder::default());
        let client = AnalyzeClient::new(recorder.clone());
        client.reset_session("abc").expect("reset");
        assert_eq!(recorder.calls.lock().expect("lock")[0].0, "/reset/abc");
    }

    #[test]
    fn response_parses_stats_and_clarification() {
        let parsed = parse_analyze_response(json!({
            "response": "# Title",
            "requires_clarification": true,
            "stats": { "input_tokens": 10, "output_tokens": 5, "total_tokens": 15,
                       "tokens_per_sec": 7.5, "total_time_sec": 2.0, "estimated_cost_usd": 0.0001 }
        }))
        .expect("parse");
        assert!(parsed.requires_clarification);
        assert_eq!(parsed.stats.map(|s| s.total_tokens), Some(15));
    }

    #[test]
    fn response_without_text_is_decode_error() {
        let error = parse_analyze_response(json!({ "status": "ok" })).expect_err("decode");
        assert!(matches!(error, TransportError::Decode(_)));
    }
}
