mod client;
mod error;
mod speech;
mod worker;

pub use client::{
    AnalyzeClient, AnalyzeResponse, FilePart, HttpTransport, SessionStats, TransportRequest,
    DEFAULT_BASE_URL,
};
#[cfg(test)]
pub use client::{MultipartForm, Transport};
pub use error::TransportError;
#[cfg(test)]
pub use speech::CapabilityError;
pub use speech::{
    recognizer_from_config, synthesizer_from_config, PlaybackEvent, SpeechRecognizer,
    SpeechSynthesizer, VoiceEvent,
};
pub use worker::{dispatch_reset, dispatch_submit, AppEvent};
