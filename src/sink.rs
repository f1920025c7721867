#![doc = r#"
The output boundary the scheduler dispatches into.

The core never opens or closes a device; a sink is handed in already open and
outlives the scheduler. [`MidirSink`](crate::midir::MidirSink) (behind the
`midir` feature) implements this over a hardware or virtual output port.
"#]

use thiserror::Error;

/// A message the output device refused or failed to deliver.
///
/// Fatal to the current playback session; events already dispatched are not
/// undone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct SinkError(String);

impl SinkError {
    /// Wrap a device's failure message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A real-time MIDI output.
///
/// `Send` so a spawned dispatch thread can own the sink for the duration of
/// playback.
pub trait OutputSink: Send {
    /// Send a 2-3 byte channel message. `data` holds the 1 or 2 data bytes
    /// that follow the status byte.
    fn send_short(&mut self, status: u8, data: &[u8]) -> Result<(), SinkError>;

    /// Send an arbitrary-length system-exclusive block verbatim. The sink
    /// owns any device-specific buffer preparation and cleanup.
    fn send_exclusive(&mut self, bytes: &[u8]) -> Result<(), SinkError>;
}
