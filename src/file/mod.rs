#![doc = r#"
The parsed representation of a Standard MIDI File.

A file is a header chunk (`MThd`) followed by one or more track chunks
(`MTrk`). [`SmfParser`] decodes the chunks stage by stage; [`MidiFile`] is
the immutable result, which [`into_timeline`](MidiFile::into_timeline) folds
into a single playback-ordered event stream.
"#]

mod event;
pub use event::*;

mod header;
pub use header::*;

mod parser;
pub use parser::*;

mod track;
pub use track::*;

use crate::error::Error;
use crate::timeline::Timeline;
use std::path::Path;

#[doc = r#"
A fully parsed SMF document: header plus per-track event lists.

Parsed once, held immutably for the duration of playback. Convert to a
[`Timeline`] to obtain the merged, globally ordered event stream the
scheduler consumes.
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiFile {
    header: Header,
    tracks: Vec<Track>,
}

impl MidiFile {
    /// Parse a complete file from a byte slice.
    pub fn parse(bytes: &[u8]) -> Result<Self, Error> {
        let mut parser = SmfParser::new(bytes);
        parser.read_header()?;
        parser.read_tracks()?;
        let (header, tracks) = parser.into_parts()?;
        Ok(Self { header, tracks })
    }

    /// Read and parse a file from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let bytes = std::fs::read(path)?;
        Self::parse(&bytes)
    }

    /// The parsed header.
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// The tracks actually present in the file, in chunk order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Merge all tracks into one time-ordered event stream.
    pub fn into_timeline(self) -> Timeline {
        Timeline::merge(self)
    }

    pub(crate) fn into_parts(self) -> (Header, Vec<Track>) {
        (self.header, self.tracks)
    }
}
