use crate::tempo::Tempo;

/// Meta type byte for a tempo change (microseconds per quarter note).
pub const META_TEMPO: u8 = 0x51;

/// Meta type byte marking the end of a track.
pub const META_END_OF_TRACK: u8 = 0x2F;

/// The three classes of event an SMF track can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A channel voice/mode message; payload byte 0 is the status byte.
    Channel,
    /// Non-sounding metadata; payload byte 0 is the meta type byte.
    Meta,
    /// A system-exclusive block, stored verbatim.
    SysEx,
}

#[doc = r#"
A single track event as decoded from the file.

For [`EventKind::Channel`] the first payload byte is the status byte,
reconstructed from running status if the encoded byte was omitted — it is
never in the data-byte range `0x00..=0x7F`. For [`EventKind::Meta`] the first
payload byte is the meta type, followed by the declared payload. SysEx
payloads are the declared bytes with no escaping applied.
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    delta_ticks: u32,
    kind: EventKind,
    payload: Vec<u8>,
}

impl RawEvent {
    /// Create an event from its parts.
    pub const fn new(delta_ticks: u32, kind: EventKind, payload: Vec<u8>) -> Self {
        Self {
            delta_ticks,
            kind,
            payload,
        }
    }

    /// Ticks since the previous event in the same track.
    pub const fn delta_ticks(&self) -> u32 {
        self.delta_ticks
    }

    /// Which class of event this is.
    pub const fn kind(&self) -> EventKind {
        self.kind
    }

    /// The event's bytes (see the type-level docs for the layout per kind).
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub(crate) fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    /// The status byte, for channel events.
    pub fn status(&self) -> Option<u8> {
        match self.kind {
            EventKind::Channel => self.payload.first().copied(),
            _ => None,
        }
    }

    /// The meta type byte, for meta events.
    pub fn meta_type(&self) -> Option<u8> {
        match self.kind {
            EventKind::Meta => self.payload.first().copied(),
            _ => None,
        }
    }

    /// The new tempo, if this is a tempo meta event.
    ///
    /// The parser guarantees tempo payloads are exactly 3 bytes, so this is
    /// `Some` for every type-`0x51` meta event it produces.
    pub fn tempo_change(&self) -> Option<Tempo> {
        if self.meta_type() != Some(META_TEMPO) {
            return None;
        }
        Tempo::from_payload(&self.payload[1..]).ok()
    }
}
