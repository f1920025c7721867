#![doc = r#"
The playback scheduler: one dispatch loop that owns all playback state.

For each merged event the loop computes a deadline in elapsed time from the
current [`TempoMap`] segment, sleeps until the deadline, and dispatches:
channel events to [`OutputSink::send_short`], sysex events to
[`OutputSink::send_exclusive`], and meta events internally (a type-`0x51`
event updates the tempo map, everything else is consumed with no external
effect). The cursor only moves forward, so no event is dispatched out of
order or twice.

[`Scheduler::play`] runs the loop on the calling thread.
[`Scheduler::spawn`] moves it to a dedicated thread that exclusively owns the
cursor, tempo state and sink; the caller observes progress only through the
returned [`PlaybackHandle`] — a monotonically-increasing dispatched-events
counter and a completion channel. There is no cancellation primitive:
stopping mid-playback is dropping the handle and letting the thread run out.
"#]

mod clock;
pub use clock::*;

use crate::error::Error;
use crate::file::EventKind;
use crate::sink::OutputSink;
use crate::tempo::TempoMap;
use crate::timeline::Timeline;
use crossbeam_channel::{bounded, Receiver, TryRecvError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

#[doc = r#"
Walks a merged [`Timeline`] against a clock, emitting events into a sink.

The timeline is held immutably; the only mutable playback state is the
cursor and the tempo map, both owned here.
"#]
#[derive(Debug)]
pub struct Scheduler<S, C = MonotonicClock> {
    timeline: Timeline,
    sink: S,
    clock: C,
    tempo_map: TempoMap,
    cursor: usize,
    dispatched: Arc<AtomicU64>,
}

impl<S: OutputSink> Scheduler<S, MonotonicClock> {
    /// A scheduler over wall-clock time, starting the clock immediately.
    pub fn new(timeline: Timeline, sink: S) -> Self {
        Self::with_clock(timeline, sink, MonotonicClock::new())
    }
}

impl<S: OutputSink, C: Clock> Scheduler<S, C> {
    /// A scheduler driven by an explicit clock (tests use a simulated one).
    pub fn with_clock(timeline: Timeline, sink: S, clock: C) -> Self {
        let tempo_map = TempoMap::new(timeline.ticks_per_quarter_note());
        Self {
            timeline,
            sink,
            clock,
            tempo_map,
            cursor: 0,
            dispatched: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Run the dispatch loop to completion on the calling thread.
    ///
    /// Returns the sink on success so the caller can keep using the device
    /// (it owns opening and closing it either way). A sink failure aborts
    /// playback with [`Error::Output`].
    pub fn play(mut self) -> Result<S, Error> {
        self.run()?;
        Ok(self.sink)
    }

    fn run(&mut self) -> Result<(), Error> {
        tracing::debug!(events = self.timeline.len(), "playback started");
        while self.cursor < self.timeline.len() {
            let event = &self.timeline.events()[self.cursor];
            let deadline = self.tempo_map.deadline(event.absolute_tick());
            self.clock.wait_until(deadline);

            match event.kind() {
                EventKind::Channel => {
                    let payload = event.payload();
                    self.sink.send_short(payload[0], &payload[1..])?;
                }
                EventKind::SysEx => {
                    self.sink.send_exclusive(event.payload())?;
                }
                EventKind::Meta => {
                    // Only tempo has an effect here; other meta events are
                    // consumed silently.
                    if let Some(tempo) = event.tempo_change() {
                        self.tempo_map.set_tempo(tempo, event.absolute_tick());
                        tracing::debug!(
                            bpm = tempo.bpm(),
                            tick = event.absolute_tick(),
                            "tempo change"
                        );
                    }
                }
            }

            self.cursor += 1;
            self.dispatched.fetch_add(1, Ordering::Release);
        }
        tracing::debug!(dispatched = self.cursor, "playback finished");
        Ok(())
    }
}

impl<S: OutputSink + 'static> Scheduler<S, MonotonicClock> {
    /// Run the dispatch loop on a dedicated thread.
    ///
    /// The thread exclusively owns the cursor, tempo map and sink; the
    /// returned handle is the caller's only window into playback.
    pub fn spawn(mut self) -> Result<PlaybackHandle, Error> {
        let dispatched = Arc::clone(&self.dispatched);
        let (done_tx, done_rx) = bounded(1);
        thread::Builder::new()
            .name("smfplay-dispatch".into())
            .spawn(move || {
                let result = self.run();
                // The receiver may have been dropped; nothing to do then.
                let _ = done_tx.send(result);
            })?;
        Ok(PlaybackHandle {
            dispatched,
            done: done_rx,
        })
    }
}

#[doc = r#"
The caller's read-only view of a spawned playback.

The dispatch thread never shares its cursor or tempo state; this handle
exposes only a monotonically-increasing event counter and completion.
Dropping the handle detaches — the thread plays the file out on its own.
"#]
pub struct PlaybackHandle {
    dispatched: Arc<AtomicU64>,
    done: Receiver<Result<(), Error>>,
}

impl PlaybackHandle {
    /// Number of events dispatched so far. Monotonically increasing.
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Acquire)
    }

    /// True once the dispatch loop has terminated (successfully or not).
    pub fn is_done(&self) -> bool {
        !self.done.is_empty()
    }

    /// Block until playback terminates, returning its outcome.
    pub fn wait(self) -> Result<(), Error> {
        match self.done.recv() {
            Ok(result) => result,
            // The dispatch thread can only drop the sender by panicking.
            Err(_) => Err(Error::Output(crate::sink::SinkError::new(
                "dispatch thread exited without reporting a result",
            ))),
        }
    }

    /// Non-blocking completion check, consuming the result if ready.
    pub fn try_wait(&mut self) -> Option<Result<(), Error>> {
        match self.done.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(Error::Output(
                crate::sink::SinkError::new("dispatch thread exited without reporting a result"),
            ))),
        }
    }
}
