#![doc = r#"
Merging independently-timed tracks into one globally ordered event stream.

Each track's delta-times are prefix-summed into absolute ticks, every event
is tagged with its originating track, and the concatenation is stable-sorted
by `(absolute_tick, origin_track)`. The stable sort preserves original
intra-track order, and the track tie-break keeps simultaneous events from
different tracks in a deterministic order — which matters when a note-off in
one track coincides with a note-on in another.
"#]

use crate::file::{EventKind, MidiFile, RawEvent};
use crate::tempo::Tempo;

/// An event positioned on the merged global timeline.
///
/// The merged sequence exclusively owns its events; nothing is shared with
/// the per-track lists it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedEvent {
    absolute_tick: u64,
    origin_track: u16,
    kind: EventKind,
    payload: Vec<u8>,
}

impl TimedEvent {
    /// Create a timed event directly, mostly useful in tests.
    pub const fn new(absolute_tick: u64, origin_track: u16, kind: EventKind, payload: Vec<u8>) -> Self {
        Self {
            absolute_tick,
            origin_track,
            kind,
            payload,
        }
    }

    /// Ticks from the start of the file to this event.
    pub const fn absolute_tick(&self) -> u64 {
        self.absolute_tick
    }

    /// Index of the track this event came from (tie-break only).
    pub const fn origin_track(&self) -> u16 {
        self.origin_track
    }

    /// Which class of event this is.
    pub const fn kind(&self) -> EventKind {
        self.kind
    }

    /// The event's bytes, laid out as in [`RawEvent`].
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// The new tempo, if this is a tempo meta event.
    pub fn tempo_change(&self) -> Option<Tempo> {
        if self.kind != EventKind::Meta || self.payload.first() != Some(&crate::file::META_TEMPO) {
            return None;
        }
        Tempo::from_payload(&self.payload[1..]).ok()
    }
}

#[doc = r#"
The canonical playback order: every track's events on one tick axis.

Holds the file's ticks-per-quarter-note alongside the merged events, which is
everything the scheduler needs to convert ticks to wall-clock time.
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    ticks_per_quarter_note: u16,
    events: Vec<TimedEvent>,
}

impl Timeline {
    /// Fold a parsed file into one globally ordered event sequence.
    pub fn merge(file: MidiFile) -> Self {
        let (header, tracks) = file.into_parts();

        let mut events = Vec::with_capacity(tracks.iter().map(|t| t.len()).sum());
        for (index, track) in tracks.into_iter().enumerate() {
            let origin_track = index as u16;
            let mut absolute_tick: u64 = 0;
            for event in track.into_events() {
                absolute_tick += u64::from(event.delta_ticks());
                events.push(convert(event, absolute_tick, origin_track));
            }
        }

        // Stable sort: equal (tick, track) pairs keep their original
        // intra-track order.
        events.sort_by_key(|e| (e.absolute_tick, e.origin_track));

        Self {
            ticks_per_quarter_note: header.ticks_per_quarter_note(),
            events,
        }
    }

    /// The file's division, carried over from the header.
    pub const fn ticks_per_quarter_note(&self) -> u16 {
        self.ticks_per_quarter_note
    }

    /// The merged events, non-decreasing in absolute tick.
    pub fn events(&self) -> &[TimedEvent] {
        &self.events
    }

    /// Number of merged events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if no track contributed any events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

fn convert(event: RawEvent, absolute_tick: u64, origin_track: u16) -> TimedEvent {
    let kind = event.kind();
    TimedEvent {
        absolute_tick,
        origin_track,
        kind,
        payload: event.into_payload(),
    }
}
