use pretty_assertions::assert_eq;
use smfplay::prelude::*;
use smfplay::varlen::write_varlen;

fn header_chunk(format: u16, track_count: u16, division: u16) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&6u32.to_be_bytes());
    bytes.extend_from_slice(&format.to_be_bytes());
    bytes.extend_from_slice(&track_count.to_be_bytes());
    bytes.extend_from_slice(&division.to_be_bytes());
    bytes
}

fn track_chunk(body: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
    bytes.extend_from_slice(body);
    bytes
}

fn delta(ticks: u32, body: &mut Vec<u8>) {
    write_varlen(ticks, body);
}

const END_OF_TRACK: [u8; 3] = [0xFF, 0x2F, 0x00];

/// Unwrap the format error out of a failed parse.
fn parse_error(result: Result<MidiFile, Error>) -> ParseError {
    match result.unwrap_err() {
        Error::Read(e) => match e.kind() {
            ReaderErrorKind::Parse(p) => p.clone(),
            other => panic!("expected a parse error, got {other:?}"),
        },
        other => panic!("expected a read error, got {other:?}"),
    }
}

#[test]
fn parses_a_minimal_single_track_file() {
    let mut body = Vec::new();
    delta(0, &mut body);
    body.extend_from_slice(&[0x90, 0x3C, 0x64]);
    delta(96, &mut body);
    body.extend_from_slice(&[0x80, 0x3C, 0x00]);
    delta(0, &mut body);
    body.extend_from_slice(&END_OF_TRACK);

    let mut bytes = header_chunk(0, 1, 96);
    bytes.extend_from_slice(&track_chunk(&body));

    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.header().format(), Format::SingleMultiChannel);
    assert_eq!(file.header().track_count(), 1);
    assert_eq!(file.header().ticks_per_quarter_note(), 96);
    assert_eq!(file.tracks().len(), 1);

    let events = file.tracks()[0].events();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].kind(), EventKind::Channel);
    assert_eq!(events[0].status(), Some(0x90));
    assert_eq!(events[0].payload(), &[0x90, 0x3C, 0x64]);
    assert_eq!(events[1].delta_ticks(), 96);
    assert_eq!(events[2].kind(), EventKind::Meta);
    assert_eq!(events[2].meta_type(), Some(0x2F));
}

#[test]
fn running_status_reuses_the_previous_status_byte() {
    let mut body = Vec::new();
    delta(0, &mut body);
    body.extend_from_slice(&[0x90, 0x3C, 0x64]);
    // No status byte: the 0x90 above is still in effect.
    delta(0x60, &mut body);
    body.extend_from_slice(&[0x3E, 0x64]);
    delta(0, &mut body);
    body.extend_from_slice(&END_OF_TRACK);

    let mut bytes = header_chunk(0, 1, 96);
    bytes.extend_from_slice(&track_chunk(&body));

    let file = MidiFile::parse(&bytes).unwrap();
    let events = file.tracks()[0].events();
    assert_eq!(events[0].status(), Some(0x90));
    assert_eq!(events[1].status(), Some(0x90));
    assert_eq!(events[1].payload(), &[0x90, 0x3E, 0x64]);
    assert_eq!(events[1].delta_ticks(), 0x60);
}

#[test]
fn data_byte_without_running_status_is_rejected() {
    let mut body = Vec::new();
    delta(0, &mut body);
    body.extend_from_slice(&[0x3C, 0x64]);

    let mut bytes = header_chunk(0, 1, 96);
    bytes.extend_from_slice(&track_chunk(&body));

    assert_eq!(
        parse_error(MidiFile::parse(&bytes)),
        ParseError::MissingRunningStatus(0x3C)
    );
}

#[test]
fn one_data_byte_statuses_consume_exactly_one_byte() {
    // Program change (0xC0) then channel pressure (0xD3), back to back.
    let mut body = Vec::new();
    delta(0, &mut body);
    body.extend_from_slice(&[0xC0, 0x05]);
    delta(0, &mut body);
    body.extend_from_slice(&[0xD3, 0x40]);
    delta(0, &mut body);
    body.extend_from_slice(&END_OF_TRACK);

    let mut bytes = header_chunk(0, 1, 96);
    bytes.extend_from_slice(&track_chunk(&body));

    let file = MidiFile::parse(&bytes).unwrap();
    let events = file.tracks()[0].events();
    assert_eq!(events[0].payload(), &[0xC0, 0x05]);
    assert_eq!(events[1].payload(), &[0xD3, 0x40]);
}

#[test]
fn meta_payload_is_prefixed_with_its_type_byte() {
    let mut body = Vec::new();
    delta(0, &mut body);
    body.extend_from_slice(&[0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20]);
    delta(0, &mut body);
    body.extend_from_slice(&END_OF_TRACK);

    let mut bytes = header_chunk(0, 1, 480);
    bytes.extend_from_slice(&track_chunk(&body));

    let file = MidiFile::parse(&bytes).unwrap();
    let tempo = &file.tracks()[0].events()[0];
    assert_eq!(tempo.kind(), EventKind::Meta);
    assert_eq!(tempo.payload(), &[0x51, 0x07, 0xA1, 0x20]);
    assert_eq!(tempo.tempo_change(), Some(Tempo::new(500_000)));
}

#[test]
fn sysex_payload_is_stored_verbatim() {
    let mut body = Vec::new();
    delta(0, &mut body);
    body.extend_from_slice(&[0xF0, 0x05, 0x7E, 0x7F, 0x09, 0x01, 0xF7]);
    delta(0, &mut body);
    body.extend_from_slice(&END_OF_TRACK);

    let mut bytes = header_chunk(0, 1, 96);
    bytes.extend_from_slice(&track_chunk(&body));

    let file = MidiFile::parse(&bytes).unwrap();
    let sysex = &file.tracks()[0].events()[0];
    assert_eq!(sysex.kind(), EventKind::SysEx);
    assert_eq!(sysex.payload(), &[0x7E, 0x7F, 0x09, 0x01, 0xF7]);
}

#[test]
fn header_magic_is_mandatory() {
    let mut bytes = header_chunk(0, 1, 96);
    bytes[0..4].copy_from_slice(b"RIFF");
    assert_eq!(
        parse_error(MidiFile::parse(&bytes)),
        ParseError::BadMagic(*b"RIFF")
    );
}

#[test]
fn header_length_other_than_six_is_rejected() {
    // No best-effort parse with ignored trailing bytes.
    let mut bytes = header_chunk(0, 1, 96);
    bytes[4..8].copy_from_slice(&7u32.to_be_bytes());
    assert_eq!(
        parse_error(MidiFile::parse(&bytes)),
        ParseError::UnexpectedHeaderLength(7)
    );
}

#[test]
fn unknown_format_is_rejected() {
    let bytes = header_chunk(3, 1, 96);
    assert_eq!(parse_error(MidiFile::parse(&bytes)), ParseError::UnknownFormat(3));
}

#[test]
fn smpte_division_is_rejected() {
    let bytes = header_chunk(1, 1, 0xE728);
    assert_eq!(
        parse_error(MidiFile::parse(&bytes)),
        ParseError::SmpteTimingUnsupported
    );
}

#[test]
fn non_mtrk_chunk_is_rejected() {
    let mut bytes = header_chunk(0, 1, 96);
    bytes.extend_from_slice(b"Mtrk");
    bytes.extend_from_slice(&0u32.to_be_bytes());
    assert_eq!(
        parse_error(MidiFile::parse(&bytes)),
        ParseError::BadChunkMagic(*b"Mtrk")
    );
}

#[test]
fn chunk_length_must_match_bytes_consumed() {
    let mut body = Vec::new();
    delta(0, &mut body);
    body.extend_from_slice(&[0x90, 0x3C, 0x64]);

    let mut bytes = header_chunk(0, 1, 96);
    bytes.extend_from_slice(b"MTrk");
    // Declare one byte less than the event actually occupies.
    bytes.extend_from_slice(&((body.len() - 1) as u32).to_be_bytes());
    bytes.extend_from_slice(&body);

    assert_eq!(
        parse_error(MidiFile::parse(&bytes)),
        ParseError::ChunkLengthMismatch {
            declared: 3,
            consumed: 4
        }
    );
}

#[test]
fn unknown_status_byte_is_fatal() {
    let mut body = Vec::new();
    delta(0, &mut body);
    body.push(0xF5);

    let mut bytes = header_chunk(0, 1, 96);
    bytes.extend_from_slice(&track_chunk(&body));

    assert_eq!(
        parse_error(MidiFile::parse(&bytes)),
        ParseError::UnknownStatusByte(0xF5)
    );
}

#[test]
fn tempo_meta_must_carry_three_bytes() {
    let mut body = Vec::new();
    delta(0, &mut body);
    body.extend_from_slice(&[0xFF, 0x51, 0x02, 0x07, 0xA1]);

    let mut bytes = header_chunk(0, 1, 96);
    bytes.extend_from_slice(&track_chunk(&body));

    assert_eq!(
        parse_error(MidiFile::parse(&bytes)),
        ParseError::BadTempoPayload(2)
    );
}

#[test]
fn truncated_header_is_a_truncation_error() {
    let bytes = &header_chunk(0, 1, 96)[..9];
    match MidiFile::parse(bytes).unwrap_err() {
        Error::Read(e) => assert!(e.is_truncated()),
        other => panic!("expected a read error, got {other:?}"),
    }
}

#[test]
fn eof_at_a_chunk_boundary_is_success() {
    // The header may promise more tracks than the stream carries; the chunks
    // actually present win.
    let bytes = header_chunk(1, 2, 96);
    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.header().track_count(), 2);
    assert_eq!(file.tracks().len(), 0);
}

#[test]
fn stream_ending_mid_chunk_is_truncation() {
    let mut body = Vec::new();
    delta(0, &mut body);
    body.extend_from_slice(&[0x90, 0x3C, 0x64]);

    let mut bytes = header_chunk(0, 1, 96);
    bytes.extend_from_slice(b"MTrk");
    // Declare more bytes than the stream has left.
    bytes.extend_from_slice(&64u32.to_be_bytes());
    bytes.extend_from_slice(&body);

    match MidiFile::parse(&bytes).unwrap_err() {
        Error::Read(e) => assert!(e.is_truncated()),
        other => panic!("expected a read error, got {other:?}"),
    }
}

#[test]
fn accessors_before_parsing_are_state_errors() {
    let parser = SmfParser::new(&[]);
    assert_eq!(parser.header(), Err(StateError::NotInitialized));
    assert!(parser.tracks().is_err());
}

#[test]
fn parse_stages_must_run_in_order() {
    let bytes = header_chunk(0, 0, 96);

    let mut parser = SmfParser::new(&bytes);
    assert!(matches!(
        parser.read_tracks(),
        Err(Error::State(StateError::NotInitialized))
    ));

    parser.read_header().unwrap();
    assert!(matches!(
        parser.read_header(),
        Err(Error::State(StateError::HeaderAlreadyRead))
    ));

    parser.read_tracks().unwrap();
    assert!(matches!(
        parser.read_tracks(),
        Err(Error::State(StateError::TracksAlreadyRead))
    ));
    assert!(parser.header().is_ok());
    assert!(parser.tracks().is_ok());
}

#[test]
fn reader_errors_carry_the_byte_offset() {
    let mut bytes = header_chunk(0, 1, 96);
    bytes[4..8].copy_from_slice(&7u32.to_be_bytes());
    match MidiFile::parse(&bytes).unwrap_err() {
        Error::Read(e) => assert_eq!(e.position(), 8),
        other => panic!("expected a read error, got {other:?}"),
    }
}
