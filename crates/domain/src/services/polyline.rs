//! Encoded polyline codec
//!
//! Implements the Google Encoded Polyline Algorithm Format: each coordinate
//! is stored as the delta from the previous one, scaled by a power of ten,
//! zig-zag encoded and split into 5-bit chunks offset by 63. Chunks with
//! bit `0x20` set are followed by more chunks of the same value.
//!
//! The precision is always supplied by the caller; see [`Precision`].

use thiserror::Error;

use crate::value_objects::{Coordinate, Precision};

/// Offset added to every chunk so it lands in printable ASCII
const CHUNK_OFFSET: u8 = 63;
/// Continuation flag within a chunk
const CONTINUATION_BIT: u64 = 0x20;
/// Payload bits within a chunk
const CHUNK_MASK: u64 = 0x1f;
/// Highest byte a chunk can produce (`63 + 0x3f`)
const MAX_CHUNK_BYTE: u8 = b'~';

/// Malformed polyline input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Input ended while a value still expected continuation chunks,
    /// or a latitude was not followed by a longitude
    #[error("Polyline truncated: value starting at byte {position} is incomplete")]
    Truncated {
        /// Byte offset where the incomplete value starts
        position: usize,
    },

    /// Byte outside the polyline alphabet (`?` to `~`)
    #[error("Invalid polyline character {character:?} at byte {position}")]
    InvalidCharacter {
        /// Byte offset of the offending character
        position: usize,
        /// The offending character
        character: char,
    },

    /// Value does not fit in 64 bits
    #[error("Polyline value starting at byte {position} overflows 64 bits")]
    Overflow {
        /// Byte offset where the value starts
        position: usize,
    },
}

/// Decode a polyline into coordinates
///
/// An empty string decodes to an empty path. Every call starts from a
/// zero origin.
///
/// # Errors
///
/// Returns [`DecodeError`] on truncated input, characters outside the
/// polyline alphabet, or values wider than 64 bits.
pub fn decode(encoded: &str, precision: Precision) -> Result<Vec<Coordinate>, DecodeError> {
    let divisor = precision.divisor();
    let mut cursor = 0;
    let mut lat: i64 = 0;
    let mut lon: i64 = 0;
    // Shortest possible point is two bytes
    let mut coordinates = Vec::with_capacity(encoded.len() / 2);

    while cursor < encoded.len() {
        lat = lat.wrapping_add(next_value(encoded, &mut cursor)?);
        lon = lon.wrapping_add(next_value(encoded, &mut cursor)?);
        coordinates.push(Coordinate::new(lat as f64 / divisor, lon as f64 / divisor));
    }

    Ok(coordinates)
}

/// Read one zig-zag encoded varint starting at `cursor`
fn next_value(encoded: &str, cursor: &mut usize) -> Result<i64, DecodeError> {
    let bytes = encoded.as_bytes();
    let start = *cursor;
    let mut accumulated: u64 = 0;
    let mut shift: u32 = 0;

    loop {
        let Some(&byte) = bytes.get(*cursor) else {
            return Err(DecodeError::Truncated { position: start });
        };
        if !(CHUNK_OFFSET..=MAX_CHUNK_BYTE).contains(&byte) {
            // All earlier bytes were ASCII, so `cursor` is a char boundary
            let character = encoded[*cursor..].chars().next().unwrap_or(char::from(byte));
            return Err(DecodeError::InvalidCharacter {
                position: *cursor,
                character,
            });
        }

        let chunk = u64::from(byte - CHUNK_OFFSET);
        let payload = chunk & CHUNK_MASK;
        if shift >= u64::BITS || (payload << shift) >> shift != payload {
            return Err(DecodeError::Overflow { position: start });
        }
        accumulated |= payload << shift;
        shift += 5;
        *cursor += 1;

        if chunk & CONTINUATION_BIT == 0 {
            break;
        }
    }

    let magnitude = (accumulated >> 1) as i64;
    Ok(if accumulated & 1 == 1 {
        !magnitude
    } else {
        magnitude
    })
}

/// Encode coordinates as a polyline
///
/// Coordinates are rounded to the nearest multiple of `1 / precision`.
#[must_use]
pub fn encode(coordinates: &[Coordinate], precision: Precision) -> String {
    let divisor = precision.divisor();
    let mut out = String::with_capacity(coordinates.len() * 8);
    let mut previous_lat: i64 = 0;
    let mut previous_lon: i64 = 0;

    for coordinate in coordinates {
        let lat = (coordinate.lat * divisor).round() as i64;
        let lon = (coordinate.lon * divisor).round() as i64;
        push_value(&mut out, lat.wrapping_sub(previous_lat));
        push_value(&mut out, lon.wrapping_sub(previous_lon));
        previous_lat = lat;
        previous_lon = lon;
    }

    out
}

fn push_value(out: &mut String, value: i64) {
    let mut zigzag = ((value << 1) ^ (value >> 63)) as u64;
    while zigzag >= CONTINUATION_BIT {
        out.push(chunk_char((zigzag & CHUNK_MASK) | CONTINUATION_BIT));
        zigzag >>= 5;
    }
    out.push(chunk_char(zigzag));
}

fn chunk_char(chunk: u64) -> char {
    char::from(chunk as u8 + CHUNK_OFFSET)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    fn assert_close(actual: &[Coordinate], expected: &[(f64, f64)], tolerance: f64) {
        assert_eq!(actual.len(), expected.len(), "point count");
        for (a, (lat, lon)) in actual.iter().zip(expected) {
            assert!((a.lat - lat).abs() <= tolerance, "lat {} vs {lat}", a.lat);
            assert!((a.lon - lon).abs() <= tolerance, "lon {} vs {lon}", a.lon);
        }
    }

    #[test]
    fn empty_string_decodes_to_empty_path() {
        assert!(decode("", Precision::TRIP_PLANNER).unwrap().is_empty());
        assert!(decode("", Precision::VALHALLA).unwrap().is_empty());
    }

    #[test]
    fn single_point_reference() {
        let points = decode("_p~iF~ps|U", Precision::TRIP_PLANNER).unwrap();
        assert_close(&points, &[(38.5, -120.2)], 1e-9);
    }

    #[test]
    fn three_point_reference() {
        let points = decode(REFERENCE, Precision::TRIP_PLANNER).unwrap();
        assert_close(
            &points,
            &[(38.5, -120.2), (40.7, -120.95), (43.252, -126.453)],
            1e-9,
        );
    }

    #[test]
    fn wrong_precision_is_off_by_ten() {
        let points = decode(REFERENCE, Precision::VALHALLA).unwrap();
        assert_close(
            &points,
            &[(3.85, -12.02), (4.07, -12.095), (4.3252, -12.6453)],
            1e-9,
        );
    }

    #[test]
    fn decode_restarts_from_zero() {
        let first = decode("_p~iF~ps|U", Precision::TRIP_PLANNER).unwrap();
        let second = decode("_p~iF~ps|U", Precision::TRIP_PLANNER).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn encode_matches_reference() {
        let points = [
            Coordinate::new(38.5, -120.2),
            Coordinate::new(40.7, -120.95),
            Coordinate::new(43.252, -126.453),
        ];
        assert_eq!(encode(&points, Precision::TRIP_PLANNER), REFERENCE);
    }

    #[test]
    fn valhalla_round_trip() {
        let points = [
            Coordinate::new(45.070_312, 7.686_856),
            Coordinate::new(45.071_001, 7.690_002),
        ];
        let encoded = encode(&points, Precision::VALHALLA);
        let decoded = decode(&encoded, Precision::VALHALLA).unwrap();
        assert_close(
            &decoded,
            &[(45.070_312, 7.686_856), (45.071_001, 7.690_002)],
            1e-6,
        );
    }

    #[test]
    fn unterminated_value_is_truncated() {
        assert_eq!(
            decode("_p~i", Precision::TRIP_PLANNER),
            Err(DecodeError::Truncated { position: 0 })
        );
    }

    #[test]
    fn latitude_without_longitude_is_truncated() {
        assert_eq!(
            decode("_p~iF", Precision::TRIP_PLANNER),
            Err(DecodeError::Truncated { position: 5 })
        );
    }

    #[test]
    fn character_below_alphabet_is_rejected() {
        assert_eq!(
            decode("_p~iF ps|U", Precision::TRIP_PLANNER),
            Err(DecodeError::InvalidCharacter {
                position: 5,
                character: ' ',
            })
        );
    }

    #[test]
    fn non_ascii_character_is_rejected() {
        assert_eq!(
            decode("_p~iF\u{e9}", Precision::TRIP_PLANNER),
            Err(DecodeError::InvalidCharacter {
                position: 5,
                character: '\u{e9}',
            })
        );
    }

    #[test]
    fn overlong_value_overflows() {
        let encoded = "~".repeat(13);
        assert_eq!(
            decode(&encoded, Precision::TRIP_PLANNER),
            Err(DecodeError::Overflow { position: 0 })
        );

        // Zero payload chunks still hit the width limit
        let encoded = "_".repeat(20);
        assert_eq!(
            decode(&encoded, Precision::TRIP_PLANNER),
            Err(DecodeError::Overflow { position: 0 })
        );
    }

    #[test]
    fn error_messages_carry_position() {
        let err = decode("_p~iF", Precision::TRIP_PLANNER).unwrap_err();
        assert!(err.to_string().contains('5'));
    }
}
