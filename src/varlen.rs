#![doc = r#"
The SMF variable-length quantity: a big-endian integer packed 7 bits per
byte, where a set high bit means "more groups follow". Delta-times and the
length fields of meta and sysex events are all encoded this way.
"#]

use crate::error::ParseError;
use crate::reader::{ReadResult, Reader};

/// The format caps an encoded quantity at 4 bytes (28 payload bits).
const MAX_ENCODED_LEN: u32 = 4;

/// Largest value a legal encoding can carry.
pub const MAX_VARLEN_VALUE: u32 = 0x0FFF_FFFF;

/// Decode one variable-length quantity from the stream.
///
/// Accumulates most-significant group first and stops on the first byte with
/// the high bit clear. Fails with `TruncatedStream` if the source ends before
/// a terminating byte, and with [`ParseError::MalformedVarLen`] on a fifth
/// continuation byte rather than silently accepting oversized values.
pub fn read_varlen(reader: &mut Reader<'_>) -> ReadResult<u32> {
    let mut value: u32 = 0;
    for _ in 0..MAX_ENCODED_LEN {
        let byte = reader.read_byte()?;
        value = (value << 7) | u32::from(byte & 0x7F);
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(reader.parse_err(ParseError::MalformedVarLen))
}

/// Encode `value` as a variable-length quantity, appending to `out`.
///
/// `value` must not exceed [`MAX_VARLEN_VALUE`]; the encoding round-trips
/// exactly through [`read_varlen`].
pub fn write_varlen(value: u32, out: &mut Vec<u8>) {
    debug_assert!(value <= MAX_VARLEN_VALUE);
    let mut emitting = false;
    for shift in [21u32, 14, 7] {
        let group = ((value >> shift) & 0x7F) as u8;
        if emitting || group != 0 {
            out.push(group | 0x80);
            emitting = true;
        }
    }
    out.push((value & 0x7F) as u8);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn decode(bytes: &[u8]) -> ReadResult<u32> {
        read_varlen(&mut Reader::from_byte_slice(bytes))
    }

    fn encode(value: u32) -> Vec<u8> {
        let mut out = Vec::new();
        write_varlen(value, &mut out);
        out
    }

    #[test]
    fn known_encodings() {
        // Reference pairs from the SMF specification appendix.
        assert_eq!(encode(0x00), [0x00]);
        assert_eq!(encode(0x40), [0x40]);
        assert_eq!(encode(0x7F), [0x7F]);
        assert_eq!(encode(0x80), [0x81, 0x00]);
        assert_eq!(encode(0x2000), [0xC0, 0x00]);
        assert_eq!(encode(0x3FFF), [0xFF, 0x7F]);
        assert_eq!(encode(0x4000), [0x81, 0x80, 0x00]);
        assert_eq!(encode(0x001F_FFFF), [0xFF, 0xFF, 0x7F]);
        assert_eq!(encode(0x0020_0000), [0x81, 0x80, 0x80, 0x00]);
        assert_eq!(encode(MAX_VARLEN_VALUE), [0xFF, 0xFF, 0xFF, 0x7F]);
    }

    #[test]
    fn round_trip_preserves_value_and_length() {
        let boundaries = [
            0u32, 1, 0x7E, 0x7F, 0x80, 0x81, 0x3FFF, 0x4000, 0x001F_FFFF, 0x0020_0000, 12345,
            987_654, MAX_VARLEN_VALUE,
        ];
        for value in boundaries {
            let bytes = encode(value);
            let mut reader = Reader::from_byte_slice(&bytes);
            assert_eq!(read_varlen(&mut reader).unwrap(), value);
            assert_eq!(reader.buffer_position(), bytes.len());
        }
    }

    #[test]
    fn truncated_quantity_is_an_error() {
        // High bit set on the last available byte: no terminator was seen.
        let err = decode(&[0x81]).unwrap_err();
        assert!(err.is_truncated());
    }

    #[test]
    fn five_byte_quantity_is_malformed() {
        let err = decode(&[0xFF, 0xFF, 0xFF, 0xFF, 0x7F]).unwrap_err();
        assert!(err.is_parse(&ParseError::MalformedVarLen));
    }

    #[test]
    fn decode_stops_at_the_terminating_byte() {
        let mut reader = Reader::from_byte_slice(&[0x81, 0x00, 0x90, 0x3C]);
        assert_eq!(read_varlen(&mut reader).unwrap(), 0x80);
        assert_eq!(reader.buffer_position(), 2);
    }
}
