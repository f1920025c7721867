use crate::error::ParseError;
use thiserror::Error;

#[doc = r#"
A format or truncation error, tagged with the byte offset it occurred at.
"#]
#[derive(Debug, Error)]
#[error("at byte {position}: {kind}")]
pub struct ReaderError {
    position: usize,
    pub(crate) kind: ReaderErrorKind,
}

/// A kind of error that a [`Reader`](super::Reader) can produce.
#[derive(Debug, Error)]
pub enum ReaderErrorKind {
    /// The bytes at this position do not form valid SMF data.
    #[error("{0}")]
    Parse(#[from] ParseError),
    /// The byte source ended before the structure being read was complete.
    #[error("stream ended mid-structure")]
    TruncatedStream,
}

impl ReaderError {
    /// Create a reader error from a position and kind.
    pub const fn new(position: usize, kind: ReaderErrorKind) -> Self {
        Self { position, kind }
    }

    /// The kind of failure.
    pub fn kind(&self) -> &ReaderErrorKind {
        &self.kind
    }

    /// Byte offset into the stream where the error occurred.
    pub const fn position(&self) -> usize {
        self.position
    }

    /// True if the stream ended before a structure was complete.
    pub const fn is_truncated(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::TruncatedStream)
    }

    /// True if this is a format error of the given kind.
    pub fn is_parse(&self, expected: &ParseError) -> bool {
        matches!(&self.kind, ReaderErrorKind::Parse(e) if e == expected)
    }
}

/// The read result type (see [`ReaderError`]).
pub type ReadResult<T> = Result<T, ReaderError>;
