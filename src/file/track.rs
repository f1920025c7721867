use super::RawEvent;

/// One `MTrk` chunk's worth of events, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Track {
    events: Vec<RawEvent>,
}

impl Track {
    /// Create a track from a list of events.
    pub const fn new(events: Vec<RawEvent>) -> Self {
        Self { events }
    }

    /// The track's events, deltas unresolved.
    pub fn events(&self) -> &[RawEvent] {
        &self.events
    }

    /// Number of events in the track.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if the track decoded to no events at all.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub(crate) fn into_events(self) -> Vec<RawEvent> {
        self.events
    }
}
