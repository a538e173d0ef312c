use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outgoing request as captured by the recorder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedRequest {
    pub method: String,
    pub url: String,
    #[serde(default)]
    pub headers: IndexMap<String, String>,
    #[serde(default)]
    pub body: Value,
    #[serde(default)]
    pub timestamp: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedError {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedResponse {
    pub status: u16,
    #[serde(default)]
    pub status_text: Option<String>,
    #[serde(default)]
    pub headers: IndexMap<String, String>,
    #[serde(default)]
    pub body: Value,
    #[serde(default)]
    pub error: Option<CapturedError>,
    #[serde(default)]
    pub timestamp: Option<f64>,
}

/// Plain request/response exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpRestCapture {
    #[serde(default)]
    pub request_id: String,
    pub request: CapturedRequest,
    #[serde(default)]
    pub response: Option<CapturedResponse>,
    #[serde(default)]
    pub total_duration: Option<f64>,
}

/// One chunk of a captured event stream, before normalization.
///
/// Recorders disagree on where the event name goes, so both `event` and
/// `type` are accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStreamChunk {
    #[serde(default, alias = "type")]
    pub event: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub delay: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<f64>,
    /// `open`, `message`, `error` or `close`
    #[serde(default)]
    pub phase: Option<String>,
}

/// Streaming exchange (server-sent events)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpStreamCapture {
    #[serde(default)]
    pub request_id: String,
    pub request: CapturedRequest,
    #[serde(default)]
    pub response: Option<CapturedResponse>,
    #[serde(default)]
    pub stream_events: Vec<RawStreamChunk>,
    #[serde(default)]
    pub total_duration: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocketIoConnection {
    pub url: String,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub timestamp: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocketIoMessage {
    /// `emit` or `receive`
    pub direction: String,
    pub event: String,
    #[serde(default)]
    pub data: Vec<Value>,
    #[serde(default)]
    pub timestamp: Option<f64>,
}

/// Socket.IO session. Kept in scenario files but not turned into handlers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocketIoCapture {
    #[serde(default)]
    pub request_id: String,
    pub connection: SocketIoConnection,
    #[serde(default)]
    pub messages: Vec<SocketIoMessage>,
}

/// Entry of a scenario's `demoData`, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CapturedEvent {
    #[serde(rename = "http-rest")]
    HttpRest(HttpRestCapture),
    #[serde(rename = "http-stream")]
    HttpStream(HttpStreamCapture),
    #[serde(rename = "socketio")]
    SocketIo(SocketIoCapture),
}

impl CapturedEvent {
    /// The captured request for HTTP events
    pub fn request(&self) -> Option<&CapturedRequest> {
        match self {
            CapturedEvent::HttpRest(capture) => Some(&capture.request),
            CapturedEvent::HttpStream(capture) => Some(&capture.request),
            CapturedEvent::SocketIo(_) => None,
        }
    }
}

/// Normalized stream event name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamEventKind {
    MessageStart,
    MessageDelta,
    MessageEnd,
}

impl StreamEventKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "message_start" => Some(StreamEventKind::MessageStart),
            "message_delta" => Some(StreamEventKind::MessageDelta),
            "message_end" => Some(StreamEventKind::MessageEnd),
            _ => None,
        }
    }
}

/// Stream chunk ready for replay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamChunk {
    pub event: StreamEventKind,
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<u64>,
}
