//! The per-turn response streamer.
//!
//! This module drives a single completion stream to a terminal state,
//! accumulating output and reporting live progress to a renderer.

use std::time::{Duration, Instant};

use futures::{Stream, StreamExt, pin_mut};

use crate::error::Result;
use crate::observability::{TURN_DURATION, TURN_FAILURES, TURNS};
use crate::render::Renderer;

/// The assistant message recorded when a turn fails.
///
/// Partial text is displayed live as it streams but is not persisted on
/// failure; the session records this fixed fallback instead.
pub const FALLBACK_MESSAGE: &str = "Sorry, there was an issue processing your request.";

/// State of a single turn.
///
/// Every turn moves `Idle → AwaitingFirstChunk → Streaming` and ends in
/// exactly one of the terminal states.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TurnState {
    /// No stream has been started.
    Idle,

    /// The request was issued; nothing has arrived yet.
    AwaitingFirstChunk,

    /// At least one chunk has arrived.
    Streaming,

    /// The stream drained successfully. Terminal.
    Completed,

    /// The stream failed. Terminal.
    Failed,
}

impl TurnState {
    /// Returns true for `Completed` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TurnState::Completed | TurnState::Failed)
    }
}

/// The result of driving one turn to a terminal state.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// The turn's response text: the full accumulation on success, the
    /// fixed fallback on failure.
    pub text: String,

    /// Wall-clock time from request to terminal state.
    pub elapsed: Duration,

    /// Whitespace-word-count estimate of the response size. An estimate,
    /// never a tokenizer count.
    pub est_tokens: usize,

    /// The terminal state reached.
    pub state: TurnState,
}

impl TurnOutcome {
    /// Elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Estimates the token count of a text as its whitespace word count.
pub fn estimate_tokens(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Drives a completion stream to a terminal state.
///
/// Each chunk is appended to the accumulator, forwarded to the renderer,
/// and reported as progress together with a live token estimate. On
/// exhaustion the outcome carries the full accumulation. On a stream error
/// the accumulated text is dropped from the outcome; the error is surfaced
/// through the renderer and the outcome carries [`FALLBACK_MESSAGE`] with
/// the elapsed time up to the failure. No retry is performed.
pub async fn drive_turn<S>(chunks: S, renderer: &mut dyn Renderer) -> TurnOutcome
where
    S: Stream<Item = Result<String>>,
{
    let start = Instant::now();
    let mut accumulated = String::new();
    TURNS.click();

    pin_mut!(chunks);
    while let Some(chunk) = chunks.next().await {
        match chunk {
            Ok(text) => {
                accumulated.push_str(&text);
                renderer.print_text(&text);
                renderer.progress(&accumulated, estimate_tokens(&accumulated));
            }
            Err(e) => {
                let elapsed = start.elapsed();
                TURN_FAILURES.click();
                TURN_DURATION.add(elapsed.as_secs_f64());
                renderer.print_error(&e.to_string());
                return TurnOutcome {
                    text: FALLBACK_MESSAGE.to_string(),
                    elapsed,
                    est_tokens: estimate_tokens(FALLBACK_MESSAGE),
                    state: TurnState::Failed,
                };
            }
        }
    }

    let elapsed = start.elapsed();
    TURN_DURATION.add(elapsed.as_secs_f64());
    renderer.finish_response();
    let est_tokens = estimate_tokens(&accumulated);
    TurnOutcome {
        text: accumulated,
        elapsed,
        est_tokens,
        state: TurnState::Completed,
    }
}

#[cfg(test)]
pub(crate) mod tests_support {
    use crate::render::Renderer;

    /// Renderer that captures everything reported to it.
    #[derive(Default)]
    pub(crate) struct CaptureRenderer {
        pub(crate) text: String,
        pub(crate) progress: Vec<(String, usize)>,
        pub(crate) errors: Vec<String>,
        pub(crate) infos: Vec<String>,
        pub(crate) finished: bool,
    }

    impl Renderer for CaptureRenderer {
        fn print_text(&mut self, text: &str) {
            self.text.push_str(text);
        }

        fn progress(&mut self, accumulated: &str, est_tokens: usize) {
            self.progress.push((accumulated.to_string(), est_tokens));
        }

        fn print_error(&mut self, error: &str) {
            self.errors.push(error.to_string());
        }

        fn print_info(&mut self, info: &str) {
            self.infos.push(info.to_string());
        }

        fn finish_response(&mut self) {
            self.finished = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::tests_support::CaptureRenderer;
    use super::*;
    use crate::error::Error;
    use futures::stream;

    fn ok_chunks(chunks: &[&str]) -> Vec<Result<String>> {
        chunks.iter().map(|c| Ok(c.to_string())).collect()
    }

    #[tokio::test]
    async fn accumulation_equals_concatenation_of_chunks() {
        let mut renderer = CaptureRenderer::default();
        let chunks = stream::iter(ok_chunks(&["The ", "quick ", "brown fox"]));
        let outcome = drive_turn(chunks, &mut renderer).await;
        assert_eq!(outcome.text, "The quick brown fox");
        assert_eq!(outcome.state, TurnState::Completed);
        assert!(outcome.state.is_terminal());
        assert_eq!(renderer.text, "The quick brown fox");
        assert!(renderer.finished);
        assert!(renderer.errors.is_empty());
    }

    #[tokio::test]
    async fn error_after_chunks_yields_fallback_not_partial() {
        let mut renderer = CaptureRenderer::default();
        let chunks = stream::iter(vec![
            Ok("Hel".to_string()),
            Ok("lo".to_string()),
            Err(Error::streaming("connection reset", None)),
        ]);
        let outcome = drive_turn(chunks, &mut renderer).await;
        assert_eq!(outcome.text, FALLBACK_MESSAGE);
        assert_ne!(outcome.text, "Hello");
        assert_eq!(outcome.state, TurnState::Failed);
        assert!(outcome.elapsed_seconds() >= 0.0);
        // The partial text was displayed live even though it was not kept.
        assert_eq!(renderer.text, "Hello");
        assert_eq!(renderer.errors.len(), 1);
        assert!(!renderer.finished);
    }

    #[tokio::test]
    async fn progress_reports_running_word_count() {
        let mut renderer = CaptureRenderer::default();
        let chunks = stream::iter(ok_chunks(&["one ", "two ", "three"]));
        drive_turn(chunks, &mut renderer).await;
        assert_eq!(
            renderer.progress,
            vec![
                ("one ".to_string(), 1),
                ("one two ".to_string(), 2),
                ("one two three".to_string(), 3),
            ]
        );
    }

    #[tokio::test]
    async fn empty_stream_completes_with_empty_text() {
        let mut renderer = CaptureRenderer::default();
        let chunks = stream::iter(Vec::<Result<String>>::new());
        let outcome = drive_turn(chunks, &mut renderer).await;
        assert_eq!(outcome.text, "");
        assert_eq!(outcome.est_tokens, 0);
        assert_eq!(outcome.state, TurnState::Completed);
    }

    #[test]
    fn token_estimate_is_whitespace_word_count() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("hello"), 1);
        assert_eq!(estimate_tokens("  spaced   out  words "), 3);
        assert_eq!(estimate_tokens("line\nbreaks\tand tabs"), 4);
    }
}
