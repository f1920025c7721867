use super::{EventKind, Format, Header, RawEvent, Track, META_TEMPO};
use crate::error::{Error, ParseError, StateError};
use crate::reader::{ReadResult, Reader};
use crate::varlen::read_varlen;

const HEADER_MAGIC: [u8; 4] = *b"MThd";
const TRACK_MAGIC: [u8; 4] = *b"MTrk";

/// The header chunk's length field is fixed by the format.
const HEADER_LENGTH: u32 = 6;

/// Division values with the high bit set request SMPTE time-code timing.
const SMPTE_DIVISION_BIT: u16 = 0x8000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    Idle,
    HeaderRead,
    Done,
}

#[doc = r#"
A stateful SMF parser: header first, then track chunks, strictly forward.

```text
Idle --read_header()--> HeaderRead --read_tracks()--> Done
```

Calling an operation out of order is a [`StateError`], kept distinct from
format errors so "misuse" never masquerades as "bad input". Most callers
want [`MidiFile::parse`](super::MidiFile::parse), which drives the whole
sequence.
"#]
#[derive(Debug)]
pub struct SmfParser<'a> {
    reader: Reader<'a>,
    state: ParserState,
    header: Option<Header>,
    tracks: Vec<Track>,
}

impl<'a> SmfParser<'a> {
    /// Create a parser over a byte slice, in the idle state.
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self {
            reader: Reader::from_byte_slice(bytes),
            state: ParserState::Idle,
            header: None,
            tracks: Vec::new(),
        }
    }

    /// Consume the 14-byte `MThd` chunk.
    ///
    /// Verifies the magic and the mandatory length field of 6, then decodes
    /// format, track count and division as big-endian 16-bit fields. SMPTE
    /// division is rejected.
    pub fn read_header(&mut self) -> Result<(), Error> {
        if self.state != ParserState::Idle {
            return Err(StateError::HeaderAlreadyRead.into());
        }

        let magic = self.reader.read_array::<4>()?;
        if magic != HEADER_MAGIC {
            return Err(self.reader.parse_err(ParseError::BadMagic(magic)).into());
        }
        let length = self.reader.read_u32_be()?;
        if length != HEADER_LENGTH {
            return Err(self
                .reader
                .parse_err(ParseError::UnexpectedHeaderLength(length))
                .into());
        }

        let format_word = self.reader.read_u16_be()?;
        let format = Format::try_from(format_word)
            .map_err(|_| self.reader.parse_err(ParseError::UnknownFormat(format_word)))?;
        let track_count = self.reader.read_u16_be()?;
        let division = self.reader.read_u16_be()?;
        if division & SMPTE_DIVISION_BIT != 0 {
            return Err(self
                .reader
                .parse_err(ParseError::SmpteTimingUnsupported)
                .into());
        }

        let header = Header::new(format, track_count, division);
        tracing::debug!(?format, track_count, ticks_per_quarter_note = division, "read header");
        self.header = Some(header);
        self.state = ParserState::HeaderRead;
        Ok(())
    }

    /// Consume every `MTrk` chunk until the end of the stream.
    ///
    /// Reaching end-of-stream exactly at a chunk boundary is success; ending
    /// mid-chunk is truncation. Each chunk's declared length must match the
    /// bytes event decode actually consumes.
    pub fn read_tracks(&mut self) -> Result<(), Error> {
        match self.state {
            ParserState::Idle => return Err(StateError::NotInitialized.into()),
            ParserState::Done => return Err(StateError::TracksAlreadyRead.into()),
            ParserState::HeaderRead => {}
        }

        while !self.reader.is_at_end() {
            let track = self.read_track_chunk()?;
            self.tracks.push(track);
        }

        let declared = self.header.map(|h| h.track_count()).unwrap_or_default();
        if usize::from(declared) != self.tracks.len() {
            tracing::warn!(
                declared,
                present = self.tracks.len(),
                "header track count disagrees with chunks present"
            );
        }
        self.state = ParserState::Done;
        Ok(())
    }

    /// The parsed header. [`StateError::NotInitialized`] before
    /// [`read_header`](Self::read_header) has succeeded.
    pub fn header(&self) -> Result<&Header, StateError> {
        self.header.as_ref().ok_or(StateError::NotInitialized)
    }

    /// The parsed tracks. [`StateError::NotInitialized`] before
    /// [`read_tracks`](Self::read_tracks) has succeeded.
    pub fn tracks(&self) -> Result<&[Track], StateError> {
        match self.state {
            ParserState::Done => Ok(&self.tracks),
            _ => Err(StateError::NotInitialized),
        }
    }

    pub(super) fn into_parts(self) -> Result<(Header, Vec<Track>), StateError> {
        match (self.state, self.header) {
            (ParserState::Done, Some(header)) => Ok((header, self.tracks)),
            _ => Err(StateError::NotInitialized),
        }
    }

    fn read_track_chunk(&mut self) -> Result<Track, Error> {
        let magic = self.reader.read_array::<4>()?;
        if magic != TRACK_MAGIC {
            return Err(self.reader.parse_err(ParseError::BadChunkMagic(magic)).into());
        }
        let declared = self.reader.read_u32_be()?;
        let chunk_start = self.reader.buffer_position();
        let chunk_end = chunk_start + declared as usize;

        let mut events = Vec::new();
        let mut running_status: Option<u8> = None;
        while self.reader.buffer_position() < chunk_end {
            events.push(read_event(&mut self.reader, &mut running_status)?);
        }

        // Byte accounting: decode must land exactly on the declared boundary.
        let consumed = (self.reader.buffer_position() - chunk_start) as u32;
        if consumed != declared {
            return Err(self
                .reader
                .parse_err(ParseError::ChunkLengthMismatch { declared, consumed })
                .into());
        }
        tracing::debug!(track = self.tracks.len(), events = events.len(), "read track chunk");
        Ok(Track::new(events))
    }
}

/// Decode one delta-time + event pair, carrying running status across calls.
fn read_event(reader: &mut Reader<'_>, running_status: &mut Option<u8>) -> ReadResult<RawEvent> {
    let delta_ticks = read_varlen(reader)?;

    let first = reader.peek_byte()?;
    let status = if first & 0x80 != 0 {
        reader.read_byte()?;
        first
    } else {
        // A data byte in status position: reuse the running status and leave
        // the peeked byte in place as the first data byte.
        running_status.ok_or_else(|| reader.parse_err(ParseError::MissingRunningStatus(first)))?
    };

    match status {
        0xFF => {
            *running_status = None;
            let meta_type = reader.read_byte()?;
            let length = read_varlen(reader)? as usize;
            let data = reader.read_exact(length)?;
            if meta_type == META_TEMPO && length != 3 {
                return Err(reader.parse_err(ParseError::BadTempoPayload(length)));
            }
            let mut payload = Vec::with_capacity(1 + length);
            payload.push(meta_type);
            payload.extend_from_slice(data);
            Ok(RawEvent::new(delta_ticks, EventKind::Meta, payload))
        }
        0xF0 | 0xF7 => {
            *running_status = None;
            let length = read_varlen(reader)? as usize;
            let data = reader.read_exact(length)?;
            Ok(RawEvent::new(delta_ticks, EventKind::SysEx, data.to_vec()))
        }
        0x80..=0xEF => {
            *running_status = Some(status);
            // Program change and channel pressure carry one data byte;
            // every other channel message carries two.
            let data_len = match status >> 4 {
                0xC | 0xD => 1,
                _ => 2,
            };
            let mut payload = Vec::with_capacity(1 + data_len);
            payload.push(status);
            payload.extend_from_slice(reader.read_exact(data_len)?);
            Ok(RawEvent::new(delta_ticks, EventKind::Channel, payload))
        }
        other => Err(reader.parse_err(ParseError::UnknownStatusByte(other))),
    }
}
