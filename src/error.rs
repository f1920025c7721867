#![doc = r#"
The crate's error taxonomy.

Four categories are kept distinct so callers can tell "bad input" apart from
"misuse" and from device trouble:

- I/O errors from the underlying byte source ([`Error::Io`])
- format errors in the file's bytes ([`ParseError`], carried with the byte
  offset by [`ReaderError`](crate::reader::ReaderError))
- output errors from the sink ([`SinkError`](crate::sink::SinkError))
- state errors from calling operations out of order ([`StateError`])

No error is swallowed and converted to a default value; every fallible
operation returns one of these.
"#]

use thiserror::Error;

/// A format error: the file's bytes do not describe a valid SMF document.
///
/// All of these are fatal to parsing that file; no partial document is ever
/// returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The first chunk did not start with `MThd`.
    #[error("expected `MThd` magic, found {0:02x?}")]
    BadMagic([u8; 4]),
    /// The header chunk must declare a length of exactly 6.
    #[error("header chunk declares length {0}, expected 6")]
    UnexpectedHeaderLength(u32),
    /// A chunk after the header did not start with `MTrk`.
    #[error("expected `MTrk` chunk magic, found {0:02x?}")]
    BadChunkMagic([u8; 4]),
    /// Event decode consumed a different number of bytes than the track
    /// chunk declared.
    #[error("track chunk declares {declared} bytes, event decode consumed {consumed}")]
    ChunkLengthMismatch {
        /// Length from the chunk header.
        declared: u32,
        /// Bytes actually consumed by event decode.
        consumed: u32,
    },
    /// A variable-length quantity ran past its 4-byte maximum.
    #[error("variable-length quantity exceeds 4 bytes")]
    MalformedVarLen,
    /// A data byte appeared where a status byte was required, with no
    /// running status in effect.
    #[error("data byte {0:#04x} with no running status in effect")]
    MissingRunningStatus(u8),
    /// A status byte outside the channel/meta/sysex ranges.
    #[error("unknown status byte {0:#04x}")]
    UnknownStatusByte(u8),
    /// The header's format field was not 0, 1 or 2.
    #[error("unknown file format {0}")]
    UnknownFormat(u16),
    /// The division field requested SMPTE time-code timing.
    #[error("SMPTE time-code division is not supported")]
    SmpteTimingUnsupported,
    /// A tempo meta event (type `0x51`) must carry exactly 3 payload bytes.
    #[error("tempo meta payload is {0} bytes, expected 3")]
    BadTempoPayload(usize),
}

/// A contract violation: an operation was invoked in the wrong order.
///
/// Reported distinctly from [`ParseError`] so "bad input" and "misuse" never
/// blur together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
    /// An accessor was called before the corresponding parse stage finished.
    #[error("the parser has not produced this data yet")]
    NotInitialized,
    /// `read_header` was called twice.
    #[error("the header was already read")]
    HeaderAlreadyRead,
    /// `read_tracks` was called twice, or before `read_header`.
    #[error("the tracks were already read")]
    TracksAlreadyRead,
}

/// Any error the crate can surface, for callers that drive the whole
/// parse-merge-play pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Failure reading the byte source itself.
    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),
    /// A format error, positioned at the offending byte offset.
    #[error(transparent)]
    Read(#[from] crate::reader::ReaderError),
    /// An operation was invoked out of order.
    #[error(transparent)]
    State(#[from] StateError),
    /// The output sink rejected a message; playback is aborted.
    #[error("output sink rejected a message: {0}")]
    Output(#[from] crate::sink::SinkError),
}
