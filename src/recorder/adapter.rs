use super::types::{
    CapturedEvent, CapturedResponse, HttpRestCapture, HttpStreamCapture, RawStreamChunk,
    StreamChunk, StreamEventKind,
};
use crate::error::MockGenError;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

/// Response replayed for one occurrence of a recorded request
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedResponse {
    Rest {
        status: u16,
        headers: IndexMap<String, String>,
        body: Value,
    },
    Stream {
        status: u16,
        headers: IndexMap<String, String>,
        chunks: Vec<StreamChunk>,
    },
}

impl RecordedResponse {
    pub fn status(&self) -> u16 {
        match self {
            RecordedResponse::Rest { status, .. } | RecordedResponse::Stream { status, .. } => {
                *status
            }
        }
    }
}

/// All recorded responses of one `method:url` pair, in capture order
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequestGroup {
    /// Method exactly as captured
    pub method: String,
    pub url: String,
    pub responses: Vec<RecordedResponse>,
}

/// `method:url`, with the method kept as captured so `get` and `GET` stay
/// separate groups.
///
/// # Errors
///
/// A method containing `:` would make the key ambiguous and is rejected.
pub fn group_key(method: &str, url: &str) -> Result<String, MockGenError> {
    if method.contains(':') {
        return Err(MockGenError::MalformedGroupKey {
            key: format!("{method}:{url}"),
        });
    }
    Ok(format!("{method}:{url}"))
}

/// Split a key on its first `:`; the url half keeps any later colons
/// (`GET:http://host:8080/x` → `GET`, `http://host:8080/x`).
///
/// # Errors
///
/// `MalformedGroupKey` when there is no `:` at all.
pub fn split_group_key(key: &str) -> Result<(&str, &str), MockGenError> {
    key.split_once(':')
        .ok_or_else(|| MockGenError::MalformedGroupKey {
            key: key.to_string(),
        })
}

fn stream_data(data: Option<&Value>) -> String {
    match data {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn event_kind(chunk: &RawStreamChunk) -> StreamEventKind {
    if let Some(raw) = chunk.event.as_deref() {
        if let Some(kind) = StreamEventKind::parse(raw) {
            return kind;
        }
        warn!(event = raw, "unknown stream event type, replaying as message_delta");
        return StreamEventKind::MessageDelta;
    }
    match chunk.phase.as_deref() {
        Some("open") => StreamEventKind::MessageStart,
        Some("message") => StreamEventKind::MessageDelta,
        Some("close") => StreamEventKind::MessageEnd,
        other => {
            warn!(
                phase = other.unwrap_or("<none>"),
                "stream chunk without event type, replaying as message_delta"
            );
            StreamEventKind::MessageDelta
        }
    }
}

/// Map captured chunks onto the three replayable event kinds, keeping order.
pub fn normalize_stream_events(chunks: &[RawStreamChunk]) -> Vec<StreamChunk> {
    chunks
        .iter()
        .map(|chunk| StreamChunk {
            event: event_kind(chunk),
            data: stream_data(chunk.data.as_ref()),
            delay: chunk.delay.map(|d| d.max(0.0).round() as u64),
        })
        .collect()
}

fn response_parts(response: Option<&CapturedResponse>) -> (u16, IndexMap<String, String>, Value) {
    match response {
        Some(r) => (r.status, r.headers.clone(), r.body.clone()),
        None => (200, IndexMap::new(), Value::Null),
    }
}

fn rest_response(capture: &HttpRestCapture) -> RecordedResponse {
    let (status, headers, body) = response_parts(capture.response.as_ref());
    RecordedResponse::Rest {
        status,
        headers,
        body,
    }
}

fn stream_response(capture: &HttpStreamCapture) -> RecordedResponse {
    let (status, headers, _) = response_parts(capture.response.as_ref());
    RecordedResponse::Stream {
        status,
        headers,
        chunks: normalize_stream_events(&capture.stream_events),
    }
}

/// Group captured HTTP traffic by `method:url`.
///
/// Groups appear in first-capture order. Socket.IO sessions are skipped.
///
/// # Errors
///
/// `MalformedGroupKey` when a captured method contains `:`.
pub fn request_groups(events: &[CapturedEvent]) -> Result<Vec<RecordedRequestGroup>, MockGenError> {
    let mut grouped: IndexMap<String, Vec<RecordedResponse>> = IndexMap::new();
    for event in events {
        let Some(request) = event.request() else {
            debug!("socket.io capture has no HTTP handler, skipping");
            continue;
        };
        let response = match event {
            CapturedEvent::HttpRest(capture) => rest_response(capture),
            CapturedEvent::HttpStream(capture) => stream_response(capture),
            CapturedEvent::SocketIo(_) => continue,
        };
        let key = group_key(&request.method, &request.url)?;
        grouped.entry(key).or_default().push(response);
    }

    grouped
        .into_iter()
        .map(|(key, responses)| -> Result<RecordedRequestGroup, MockGenError> {
            let (method, url) = split_group_key(&key)?;
            Ok(RecordedRequestGroup {
                method: method.to_string(),
                url: url.to_string(),
                responses,
            })
        })
        .collect()
}
