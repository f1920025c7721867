use num_enum::TryFromPrimitive;

/// How a file's tracks relate to one another (the header's format word).
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u16)]
pub enum Format {
    /// Format 0: a single track carrying all sixteen channels.
    SingleMultiChannel = 0,
    /// Format 1: multiple tracks played simultaneously against one timeline.
    Simultaneous = 1,
    /// Format 2: multiple independent single-track patterns.
    SequentiallyIndependent = 2,
}

#[doc = r#"
The parsed `MThd` chunk. Immutable once parsed.

`track_count` is the count the header *declares*; the authoritative count is
the number of `MTrk` chunks actually present (see
[`MidiFile::tracks`](super::MidiFile::tracks)).
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    format: Format,
    track_count: u16,
    ticks_per_quarter_note: u16,
}

impl Header {
    /// Create a header from its three fields.
    pub const fn new(format: Format, track_count: u16, ticks_per_quarter_note: u16) -> Self {
        Self {
            format,
            track_count,
            ticks_per_quarter_note,
        }
    }

    /// The file's format.
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Number of tracks the header declares.
    pub const fn track_count(&self) -> u16 {
        self.track_count
    }

    /// Ticks per quarter note (the file's division). Always metrical timing;
    /// SMPTE division is rejected at parse time.
    pub const fn ticks_per_quarter_note(&self) -> u16 {
        self.ticks_per_quarter_note
    }
}
