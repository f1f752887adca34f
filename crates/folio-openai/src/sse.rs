// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SSE parser for streamed chat completions.
//!
//! Each `data:` line carries a JSON chunk with `choices[0].delta.content`;
//! the stream ends with the literal `data: [DONE]`.

use eventsource_stream::Eventsource;
use folio_core::{ChatStream, FolioError, StreamChunk};
use futures::stream::StreamExt;

use crate::types::StreamChunkPayload;

/// Converts a streaming response into a stream of non-empty text chunks.
pub fn parse_chat_stream(response: reqwest::Response) -> ChatStream {
    let events = response
        .bytes_stream()
        .eventsource()
        .take_while(|result| {
            let done = matches!(result, Ok(event) if event.data.trim() == "[DONE]");
            async move { !done }
        })
        .filter_map(|result| async move {
            match result {
                Ok(event) => parse_data(&event.data),
                Err(e) => Some(Err(FolioError::provider(format!("SSE stream error: {e}")))),
            }
        });
    Box::pin(events)
}

fn parse_data(data: &str) -> Option<Result<StreamChunk, FolioError>> {
    if data.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<StreamChunkPayload>(data) {
        Ok(payload) => {
            let text: String = payload
                .choices
                .into_iter()
                .filter_map(|c| c.delta.content)
                .collect();
            (!text.is_empty()).then_some(Ok(StreamChunk { text }))
        }
        Err(e) => Some(Err(FolioError::Provider {
            message: format!("failed to parse stream chunk: {e}"),
            source: Some(Box::new(e)),
        })),
    }
}
