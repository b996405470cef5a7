use std::fmt::Display;

use futures_util::{Stream, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::debug;

/// Events emitted while an answer streams in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Next fragment of the answer text.
    TextDelta { text: String },

    /// The backend signalled the end of the answer.
    Done,

    /// The stream broke after it had started.
    Error { message: String },
}

/// What a single response line contributes.
#[derive(Debug, PartialEq, Eq)]
pub enum LineParsed {
    Delta(String),
    Done,
    /// Blank, malformed, or a frame type we do not consume.
    Skip,
}

#[derive(Deserialize)]
struct Frame {
    #[serde(rename = "type")]
    frame_type: String,
    #[serde(default)]
    delta: String,
}

/// Parse one line of the assistant's response body.
///
/// Lines are either SSE style (`data: <json>`) or bare JSON. Only
/// `{"type":"text-delta","delta":...}` frames carry answer text.
pub fn parse_stream_line(line: &str) -> LineParsed {
    let line = line.trim();
    let payload = line.strip_prefix("data:").map(str::trim).unwrap_or(line);

    if payload.is_empty() {
        return LineParsed::Skip;
    }
    if payload == "[DONE]" {
        return LineParsed::Done;
    }

    match serde_json::from_str::<Frame>(payload) {
        Ok(frame) if frame.frame_type == "text-delta" => LineParsed::Delta(frame.delta),
        Ok(frame) => {
            debug!(frame_type = %frame.frame_type, "skipping stream frame");
            LineParsed::Skip
        }
        Err(e) => {
            debug!(error = %e, len = payload.len(), "skipping malformed stream line");
            LineParsed::Skip
        }
    }
}

/// Longest response line accepted before the stream is abandoned.
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

/// Split a chunked byte stream into lines and emit [`StreamEvent`]s.
///
/// Chunk boundaries may fall anywhere, including inside a UTF-8 sequence, so
/// bytes are buffered until a full line is available. Always ends with
/// either `Done` or `Error` unless the receiver is gone.
pub async fn pump_lines<S, B, E>(chunks: S, tx: mpsc::Sender<StreamEvent>)
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
{
    pump_lines_capped(chunks, tx, MAX_LINE_BYTES).await
}

async fn pump_lines_capped<S, B, E>(chunks: S, tx: mpsc::Sender<StreamEvent>, max_line: usize)
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
{
    let mut chunks = std::pin::pin!(chunks);
    let mut buf: Vec<u8> = Vec::new();
    // bytes of `buf` already known to hold no newline
    let mut scanned = 0;

    while let Some(chunk) = chunks.next().await {
        let chunk = match chunk {
            Ok(c) => c,
            Err(e) => {
                let _ = tx
                    .send(StreamEvent::Error {
                        message: e.to_string(),
                    })
                    .await;
                return;
            }
        };
        buf.extend_from_slice(chunk.as_ref());

        while let Some(offset) = buf[scanned..].iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = buf.drain(..=scanned + offset).collect();
            scanned = 0;
            match emit_line(&line, &tx).await {
                Flow::Continue => {}
                Flow::Stop => return,
            }
        }
        scanned = buf.len();

        if buf.len() > max_line {
            debug!(len = buf.len(), max_line, "response line too long");
            let _ = tx
                .send(StreamEvent::Error {
                    message: format!("response line exceeds {max_line} bytes"),
                })
                .await;
            return;
        }
    }

    // last line may lack a trailing newline
    if !buf.is_empty() && matches!(emit_line(&buf, &tx).await, Flow::Stop) {
        return;
    }
    let _ = tx.send(StreamEvent::Done).await;
}

enum Flow {
    Continue,
    Stop,
}

async fn emit_line(raw: &[u8], tx: &mpsc::Sender<StreamEvent>) -> Flow {
    let line = String::from_utf8_lossy(raw);
    match parse_stream_line(&line) {
        LineParsed::Delta(text) => {
            if tx.send(StreamEvent::TextDelta { text }).await.is_err() {
                return Flow::Stop; // receiver dropped
            }
            Flow::Continue
        }
        LineParsed::Done => {
            let _ = tx.send(StreamEvent::Done).await;
            Flow::Stop
        }
        LineParsed::Skip => Flow::Continue,
    }
}
