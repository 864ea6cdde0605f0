use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("banter.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("banter.client.request_errors");
pub(crate) static CLIENT_REBUILDS: Counter = Counter::new("banter.client.rebuilds");

pub(crate) static STREAM_CHUNKS: Counter = Counter::new("banter.stream.chunks");
pub(crate) static STREAM_ERRORS: Counter = Counter::new("banter.stream.errors");
pub(crate) static STREAM_BYTES: Counter = Counter::new("banter.stream.bytes");

pub(crate) static TURNS: Counter = Counter::new("banter.turn.turns");
pub(crate) static TURN_FAILURES: Counter = Counter::new("banter.turn.failures");
pub(crate) static TURN_DURATION: Moments = Moments::new("banter.turn.duration_seconds");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_counter(&CLIENT_REBUILDS);

    collector.register_counter(&STREAM_CHUNKS);
    collector.register_counter(&STREAM_ERRORS);
    collector.register_counter(&STREAM_BYTES);

    collector.register_counter(&TURNS);
    collector.register_counter(&TURN_FAILURES);
    collector.register_moments(&TURN_DURATION);
}
