//! Newline-delimited JSON processing for streaming responses.
//!
//! This module handles parsing of NDJSON streams from the local completion
//! runtime, converting raw byte streams into structured [`ChatChunk`]
//! objects.

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};

use crate::error::{Error, Result};
use crate::observability::{STREAM_BYTES, STREAM_CHUNKS, STREAM_ERRORS};
use crate::types::ChatChunk;

/// Process a stream of bytes into a stream of chat chunks.
///
/// This function takes a byte stream from an HTTP response and converts it
/// into a stream of parsed [`ChatChunk`] objects, handling line buffering
/// and error conditions. Chunks arrive one JSON object per line; a chunk
/// may be split across several reads or share a read with its neighbors.
pub fn process_ndjson<S>(byte_stream: S) -> impl Stream<Item = Result<ChatChunk>>
where
    S: Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Unpin + 'static,
{
    // Convert reqwest errors to our error type
    let stream = byte_stream.map(|result| {
        result
            .map_err(|e| Error::streaming(format!("Error in HTTP stream: {e}"), Some(Box::new(e))))
    });

    // Use a state machine to process the NDJSON stream
    let buffer = String::new();

    stream::unfold(
        (stream, buffer),
        move |(mut stream, mut buffer)| async move {
            loop {
                // First check if we have a complete line in the buffer
                if let Some((chunk, remaining)) = extract_line(&buffer) {
                    buffer = remaining;
                    if let Some(chunk) = chunk {
                        return Some((chunk, (stream, buffer)));
                    }
                    continue;
                }

                // Read more data
                match stream.next().await {
                    Some(Ok(bytes)) => {
                        STREAM_BYTES.count(bytes.len() as u64);
                        match String::from_utf8(bytes.to_vec()) {
                            Ok(text) => buffer.push_str(&text),
                            Err(e) => {
                                STREAM_ERRORS.click();
                                return Some((
                                    Err(Error::encoding(
                                        format!("Invalid UTF-8 in stream: {e}"),
                                        Some(Box::new(e)),
                                    )),
                                    (stream, buffer),
                                ));
                            }
                        }
                    }
                    Some(Err(e)) => {
                        STREAM_ERRORS.click();
                        return Some((Err(e), (stream, buffer)));
                    }
                    None => {
                        // End of stream; a trailing line may lack a newline
                        if !buffer.trim().is_empty() {
                            let line = std::mem::take(&mut buffer);
                            return Some((parse_chunk(line.trim()), (stream, buffer)));
                        }
                        return None;
                    }
                }
            }
        },
    )
}

/// Extract a complete line from a buffer string.
///
/// Returns `None` when no full line is buffered yet; returns `Some((None,
/// rest))` for blank lines so the caller keeps draining.
fn extract_line(buffer: &str) -> Option<(Option<Result<ChatChunk>>, String)> {
    let newline = buffer.find('\n')?;
    let line = buffer[..newline].trim().to_string();
    let rest = buffer[newline + 1..].to_string();
    if line.is_empty() {
        return Some((None, rest));
    }
    Some((Some(parse_chunk(&line)), rest))
}

fn parse_chunk(line: &str) -> Result<ChatChunk> {
    match serde_json::from_str::<ChatChunk>(line) {
        Ok(mut chunk) => {
            STREAM_CHUNKS.click();
            if let Some(error) = chunk.error.take() {
                STREAM_ERRORS.click();
                return Err(Error::streaming(error, None));
            }
            Ok(chunk)
        }
        Err(e) => {
            STREAM_ERRORS.click();
            Err(Error::serialization(
                format!("Failed to parse chunk JSON: {e}"),
                Some(Box::new(e)),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream::iter;

    fn byte_stream(
        parts: Vec<&'static str>,
    ) -> impl Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Unpin {
        iter(parts.into_iter().map(|part| Ok(Bytes::from(part))))
    }

    #[tokio::test]
    async fn parses_one_chunk_per_line() {
        let stream = byte_stream(vec![
            "{\"message\":{\"role\":\"assistant\",\"content\":\"Hel\"},\"done\":false}\n",
            "{\"message\":{\"role\":\"assistant\",\"content\":\"lo\"},\"done\":false}\n",
            "{\"done\":true}\n",
        ]);
        let chunks: Vec<_> = process_ndjson(stream).collect().await;
        assert_eq!(chunks.len(), 3);
        assert_eq!(
            chunks[0].as_ref().unwrap().message.as_ref().unwrap().content,
            "Hel"
        );
        assert!(chunks[2].as_ref().unwrap().done);
    }

    #[tokio::test]
    async fn reassembles_lines_split_across_reads() {
        let stream = byte_stream(vec![
            "{\"message\":{\"role\":\"assis",
            "tant\",\"content\":\"Hi\"},\"done\":false}\n{\"done\":",
            "true}\n",
        ]);
        let chunks: Vec<_> = process_ndjson(stream).collect().await;
        assert_eq!(chunks.len(), 2);
        assert_eq!(
            chunks[0].as_ref().unwrap().message.as_ref().unwrap().content,
            "Hi"
        );
        assert!(chunks[1].as_ref().unwrap().done);
    }

    #[tokio::test]
    async fn trailing_line_without_newline_is_parsed() {
        let stream = byte_stream(vec![
            "{\"message\":{\"role\":\"assistant\",\"content\":\"x\"},\"done\":false}\n{\"done\":true}",
        ]);
        let chunks: Vec<_> = process_ndjson(stream).collect().await;
        assert_eq!(chunks.len(), 2);
        assert!(chunks[1].as_ref().unwrap().done);
    }

    #[tokio::test]
    async fn runtime_error_object_becomes_streaming_error() {
        let stream = byte_stream(vec![
            "{\"message\":{\"role\":\"assistant\",\"content\":\"Hel\"},\"done\":false}\n",
            "{\"error\":\"model stopped unexpectedly\"}\n",
        ]);
        let chunks: Vec<_> = process_ndjson(stream).collect().await;
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].is_ok());
        assert!(chunks[1].as_ref().unwrap_err().is_streaming());
    }

    #[tokio::test]
    async fn malformed_json_becomes_serialization_error() {
        let stream = byte_stream(vec!["not json\n"]);
        let chunks: Vec<_> = process_ndjson(stream).collect().await;
        assert_eq!(chunks.len(), 1);
        assert!(matches!(
            chunks[0].as_ref().unwrap_err(),
            Error::Serialization { .. }
        ));
    }

    #[tokio::test]
    async fn blank_lines_are_skipped() {
        let stream = byte_stream(vec!["\n\n{\"done\":true}\n\n"]);
        let chunks: Vec<_> = process_ndjson(stream).collect().await;
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].as_ref().unwrap().done);
    }
}
