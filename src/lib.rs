#![doc = r#"
Decode Standard MIDI Files and replay them against a real-time output sink.

# Overview

`smfplay` is split into two halves that share one data model:

- The **parser** ([`file`]) reads the self-describing, variable-length-encoded
  SMF chunk format into an immutable [`MidiFile`](file::MidiFile): a header
  plus one event list per track, with running-status channel messages already
  resolved.
- The **scheduler** ([`scheduler`]) walks the merged, time-ordered event
  stream ([`timeline`]) and dispatches each event at its wall-clock deadline,
  converting ticks to elapsed time piecewise as tempo meta-events are
  encountered ([`tempo`]).

The scheduler talks to the outside world only through the
[`OutputSink`](sink::OutputSink) trait. Enable the `midir` feature for a sink
backed by a hardware (or virtual) MIDI output port.

```no_run
use smfplay::prelude::*;

# fn main() -> Result<(), smfplay::Error> {
let file = MidiFile::open("song.mid")?;
# struct NullSink;
# impl smfplay::sink::OutputSink for NullSink {
#     fn send_short(&mut self, _: u8, _: &[u8]) -> Result<(), smfplay::sink::SinkError> { Ok(()) }
#     fn send_exclusive(&mut self, _: &[u8]) -> Result<(), smfplay::sink::SinkError> { Ok(()) }
# }
# let sink = NullSink;
Scheduler::new(file.into_timeline(), sink).play()?;
# Ok(())
# }
```
"#]

pub mod error;
pub mod file;
pub mod reader;
pub mod scheduler;
pub mod sink;
pub mod tempo;
pub mod timeline;
pub mod varlen;

#[cfg(feature = "midir")]
pub mod midir;

pub use error::Error;

/// Re-exports of the types most callers need.
pub mod prelude {
    pub use crate::error::{Error, ParseError, StateError};
    pub use crate::file::{EventKind, Format, Header, MidiFile, RawEvent, SmfParser, Track};
    pub use crate::reader::{ReadResult, Reader, ReaderError, ReaderErrorKind};
    pub use crate::scheduler::{Clock, MonotonicClock, PlaybackHandle, Scheduler};
    pub use crate::sink::{OutputSink, SinkError};
    pub use crate::tempo::{Tempo, TempoMap};
    pub use crate::timeline::{TimedEvent, Timeline};
}
